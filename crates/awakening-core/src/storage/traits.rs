//! Store trait definition.
//!
//! The `ProtocolStore` trait is the host-supplied key-value store the protocol runs
//! on: two maps (`ProgramId -> Program`, `(UserId, ProgramId) -> Enrollment`) plus the
//! program counter. Reads are side-effect free; all mutation goes through `apply`.

use super::batch::WriteBatch;
use super::types::{
    Enrollment, EnrollmentEntry, EnrollmentFilter, EnrollmentKey, Program, ProgramFilter,
    ProgramId, StoreMetadata,
};
use crate::error::Result;

/// Persistent key-value store backing the protocol.
///
/// All implementations must ensure:
/// - `apply` commits every write in the batch or none of them
/// - reads observe every previously applied batch
/// - records are never deleted
pub trait ProtocolStore {
    /// Get store metadata.
    fn metadata(&self) -> Result<StoreMetadata>;

    /// Last allocated program id, `ProgramId(0)` for an empty store.
    fn program_counter(&self) -> Result<ProgramId>;

    /// Get a program by id.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(program))` if found, `Ok(None)` if not found.
    fn get_program(&self, id: ProgramId) -> Result<Option<Program>>;

    /// List programs matching the filter, ordered by id.
    fn list_programs(&self, filter: &ProgramFilter) -> Result<Vec<Program>>;

    /// Get the enrollment stored under a key.
    fn get_enrollment(&self, key: &EnrollmentKey) -> Result<Option<Enrollment>>;

    /// List enrollments matching the filter, ordered by program id then user.
    fn list_enrollments(&self, filter: &EnrollmentFilter) -> Result<Vec<EnrollmentEntry>>;

    /// Apply a batch of writes atomically.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Storage` if the backend fails; in that case no write
    /// from the batch is visible.
    fn apply(&mut self, batch: WriteBatch) -> Result<()>;
}
