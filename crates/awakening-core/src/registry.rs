//! Program Registry: creation, lookup and activation of programs.
//!
//! The registry owns the program counter. It never reads enrollment state.

use crate::context::TxContext;
use crate::error::{ErrorCode, ProtocolError, Result};
use crate::storage::{NewProgram, Program, ProgramFilter, ProgramId, ProtocolStore, WriteBatch};

/// Create a program owned by the caller and return its id.
///
/// Ids are allocated sequentially from 1. The counter and the record are written
/// in one batch.
///
/// # Errors
///
/// Returns `Rejected(InvalidProgram)` if the definition fails validation.
pub fn create_program<S: ProtocolStore + ?Sized>(
    store: &mut S,
    ctx: &TxContext,
    new_program: &NewProgram,
) -> Result<ProgramId> {
    if let Err(reason) = new_program.validate() {
        tracing::debug!(guide = %ctx.caller(), %reason, "program rejected");
        return Err(ErrorCode::InvalidProgram.into());
    }

    let last = store.program_counter()?;
    let id = last
        .get()
        .checked_add(1)
        .map(ProgramId)
        .ok_or_else(|| ProtocolError::Corrupt("program counter overflow".to_string()))?;
    if store.get_program(id)?.is_some() {
        return Err(ProtocolError::Corrupt(format!(
            "program {} exists beyond counter {}",
            id, last
        )));
    }

    let program = Program {
        id,
        guide_id: ctx.caller().clone(),
        title: new_program.title.clone(),
        description: new_program.description.clone(),
        duration_days: new_program.duration_days,
        difficulty_level: new_program.difficulty_level,
        active: true,
        created_at: ctx.block_height(),
    };

    store.apply(WriteBatch::new().set_program_counter(id).put_program(program))?;

    tracing::debug!(program_id = %id, guide = %ctx.caller(), "program created");
    Ok(id)
}

/// Look up a program. Unknown ids yield `None`.
pub fn get_program<S: ProtocolStore + ?Sized>(store: &S, id: ProgramId) -> Result<Option<Program>> {
    store.get_program(id)
}

/// Look up a program that must exist.
pub(crate) fn require_program<S: ProtocolStore + ?Sized>(store: &S, id: ProgramId) -> Result<Program> {
    store
        .get_program(id)?
        .ok_or(ProtocolError::Rejected(ErrorCode::ProgramNotFound))
}

/// Toggle whether a program accepts new enrollments.
///
/// Only the guide that created the program may change it. Setting the flag to
/// its current value succeeds without writing.
///
/// # Errors
///
/// Returns `Rejected(ProgramNotFound)` for an unknown id and
/// `Rejected(Unauthorized)` if the caller is not the program's guide.
pub fn set_active<S: ProtocolStore + ?Sized>(
    store: &mut S,
    ctx: &TxContext,
    id: ProgramId,
    active: bool,
) -> Result<()> {
    let mut program = require_program(store, id)?;
    if &program.guide_id != ctx.caller() {
        tracing::debug!(program_id = %id, caller = %ctx.caller(), "activation change refused");
        return Err(ErrorCode::Unauthorized.into());
    }
    if program.active == active {
        return Ok(());
    }

    program.active = active;
    store.apply(WriteBatch::new().put_program(program))?;

    tracing::debug!(program_id = %id, active, "program activation changed");
    Ok(())
}

/// List programs matching the filter, ordered by id.
pub fn list_programs<S: ProtocolStore + ?Sized>(
    store: &S,
    filter: &ProgramFilter,
) -> Result<Vec<Program>> {
    store.list_programs(filter)
}
