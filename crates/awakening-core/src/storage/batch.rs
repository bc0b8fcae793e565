//! Write batches.
//!
//! An operation reads what it needs, validates every precondition, and only then
//! hands the store a batch of writes. Stores apply a batch all-or-nothing.

use super::types::{Enrollment, EnrollmentKey, Program, ProgramId};

/// A single write against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWrite {
    /// Set the last allocated program id
    SetProgramCounter(ProgramId),

    /// Insert or replace a program record
    PutProgram(Program),

    /// Insert or replace an enrollment record
    PutEnrollment(EnrollmentKey, Enrollment),
}

/// Ordered set of writes committed atomically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    writes: Vec<StoreWrite>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_program_counter(mut self, id: ProgramId) -> Self {
        self.writes.push(StoreWrite::SetProgramCounter(id));
        self
    }

    pub fn put_program(mut self, program: Program) -> Self {
        self.writes.push(StoreWrite::PutProgram(program));
        self
    }

    pub fn put_enrollment(mut self, key: EnrollmentKey, enrollment: Enrollment) -> Self {
        self.writes.push(StoreWrite::PutEnrollment(key, enrollment));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn writes(&self) -> &[StoreWrite] {
        &self.writes
    }

    pub fn into_writes(self) -> Vec<StoreWrite> {
        self.writes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::types::Principal;

    #[test]
    fn test_batch_preserves_order() {
        let key = EnrollmentKey::new(Principal::from("user1"), ProgramId(1));
        let batch = WriteBatch::new()
            .set_program_counter(ProgramId(1))
            .put_enrollment(key.clone(), Enrollment::new(10));

        assert_eq!(batch.len(), 2);
        assert!(matches!(batch.writes()[0], StoreWrite::SetProgramCounter(ProgramId(1))));
        assert!(matches!(batch.writes()[1], StoreWrite::PutEnrollment(ref k, _) if *k == key));
    }

    #[test]
    fn test_empty_batch() {
        assert!(WriteBatch::new().is_empty());
    }
}
