//! In-memory store, for tests and for embedding the protocol in a host that
//! persists state itself.

use std::collections::BTreeMap;

use chrono::Utc;
use uuid::Uuid;

use super::batch::{StoreWrite, WriteBatch};
use super::traits::ProtocolStore;
use super::types::{
    Enrollment, EnrollmentEntry, EnrollmentFilter, EnrollmentKey, Program, ProgramFilter,
    ProgramId, StoreMetadata,
};
use super::FORMAT_VERSION;
use crate::error::Result;

/// `BTreeMap`-backed store.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    metadata: StoreMetadata,
    counter: ProgramId,
    programs: BTreeMap<ProgramId, Program>,
    enrollments: BTreeMap<EnrollmentKey, Enrollment>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            metadata: StoreMetadata {
                format_version: FORMAT_VERSION.to_string(),
                store_id: Uuid::new_v4(),
                created_at: Utc::now(),
            },
            counter: ProgramId(0),
            programs: BTreeMap::new(),
            enrollments: BTreeMap::new(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtocolStore for MemoryStore {
    fn metadata(&self) -> Result<StoreMetadata> {
        Ok(self.metadata.clone())
    }

    fn program_counter(&self) -> Result<ProgramId> {
        Ok(self.counter)
    }

    fn get_program(&self, id: ProgramId) -> Result<Option<Program>> {
        Ok(self.programs.get(&id).cloned())
    }

    fn list_programs(&self, filter: &ProgramFilter) -> Result<Vec<Program>> {
        let matching = self
            .programs
            .values()
            .filter(|program| filter.matches(program))
            .cloned();
        Ok(match filter.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        })
    }

    fn get_enrollment(&self, key: &EnrollmentKey) -> Result<Option<Enrollment>> {
        Ok(self.enrollments.get(key).cloned())
    }

    fn list_enrollments(&self, filter: &EnrollmentFilter) -> Result<Vec<EnrollmentEntry>> {
        let mut entries: Vec<EnrollmentEntry> = self
            .enrollments
            .iter()
            .filter(|(key, enrollment)| filter.matches(key, enrollment))
            .map(|(key, enrollment)| EnrollmentEntry {
                key: key.clone(),
                enrollment: enrollment.clone(),
            })
            .collect();
        entries.sort_by(|a, b| {
            (a.key.program_id, &a.key.user_id).cmp(&(b.key.program_id, &b.key.user_id))
        });
        Ok(entries)
    }

    fn apply(&mut self, batch: WriteBatch) -> Result<()> {
        for write in batch.into_writes() {
            match write {
                StoreWrite::SetProgramCounter(id) => self.counter = id,
                StoreWrite::PutProgram(program) => {
                    self.programs.insert(program.id, program);
                }
                StoreWrite::PutEnrollment(key, enrollment) => {
                    self.enrollments.insert(key, enrollment);
                }
            }
        }
        Ok(())
    }
}
