//! The protocol's entry points over a single store.

use crate::context::TxContext;
use crate::enrollment;
use crate::error::Result;
use crate::integrity::{self, IntegrityReport};
use crate::registry;
use crate::storage::{
    Enrollment, EnrollmentEntry, EnrollmentFilter, EnrollmentKey, NewProgram, Principal,
    Program, ProgramFilter, ProgramId, ProgramStats, ProtocolStore, StoreMetadata,
};

/// Program Registry and Enrollment Ledger bound to one store.
///
/// Each mutating method is one transaction: it validates every precondition before
/// writing, then commits a single batch. Mutating methods return `Ok(true)` on
/// success so callers see the same `{type: "ok", value: true}` shape everywhere.
pub struct Protocol<S: ProtocolStore> {
    store: S,
}

impl<S: ProtocolStore> Protocol<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn metadata(&self) -> Result<StoreMetadata> {
        self.store.metadata()
    }

    // --- Program Registry ---

    pub fn create_program(&mut self, ctx: &TxContext, program: &NewProgram) -> Result<ProgramId> {
        registry::create_program(&mut self.store, ctx, program)
    }

    pub fn get_program(&self, id: ProgramId) -> Result<Option<Program>> {
        registry::get_program(&self.store, id)
    }

    pub fn set_active(&mut self, ctx: &TxContext, id: ProgramId, active: bool) -> Result<bool> {
        registry::set_active(&mut self.store, ctx, id, active)?;
        Ok(true)
    }

    pub fn list_programs(&self, filter: &ProgramFilter) -> Result<Vec<Program>> {
        registry::list_programs(&self.store, filter)
    }

    // --- Enrollment Ledger ---

    pub fn enroll(&mut self, ctx: &TxContext, program_id: ProgramId) -> Result<bool> {
        enrollment::enroll(&mut self.store, ctx, program_id)?;
        Ok(true)
    }

    pub fn update_progress(
        &mut self,
        ctx: &TxContext,
        program_id: ProgramId,
        percentage: u32,
    ) -> Result<bool> {
        enrollment::update_progress(&mut self.store, ctx, program_id, percentage)?;
        Ok(true)
    }

    pub fn get_enrollment(
        &self,
        user_id: &Principal,
        program_id: ProgramId,
    ) -> Result<Option<Enrollment>> {
        let key = EnrollmentKey::new(user_id.clone(), program_id);
        enrollment::get_enrollment(&self.store, &key)
    }

    pub fn list_enrollments(&self, filter: &EnrollmentFilter) -> Result<Vec<EnrollmentEntry>> {
        enrollment::list_enrollments(&self.store, filter)
    }

    pub fn program_stats(&self, program_id: ProgramId) -> Result<Option<ProgramStats>> {
        enrollment::program_stats(&self.store, program_id)
    }

    // --- Maintenance ---

    pub fn check_integrity(&self) -> Result<IntegrityReport> {
        integrity::check_store(&self.store)
    }
}
