//! Enrollment Ledger: one enrollment per (user, program), tracking progress to
//! completion.
//!
//! Lifecycle: not enrolled -> enrolled at 0 -> partial progress -> completed at 100.
//! Completed is terminal and its completion date is written once.

use crate::context::TxContext;
use crate::error::{ErrorCode, ProtocolError, Result};
use crate::registry::require_program;
use crate::storage::{
    BlockHeight, Enrollment, EnrollmentEntry, EnrollmentFilter, EnrollmentKey, ProgramId,
    ProgramStats, ProtocolStore, WriteBatch, COMPLETE_PERCENTAGE,
};

/// Enroll the caller in a program.
///
/// Preconditions, first failure wins: the program exists (`ProgramNotFound`), it is
/// active (`ProgramNotActive`), the caller is not already enrolled (`AlreadyEnrolled`).
pub fn enroll<S: ProtocolStore + ?Sized>(
    store: &mut S,
    ctx: &TxContext,
    program_id: ProgramId,
) -> Result<()> {
    let program = require_program(store, program_id)?;
    if !program.active {
        return Err(ErrorCode::ProgramNotActive.into());
    }

    let key = EnrollmentKey::new(ctx.caller().clone(), program_id);
    if store.get_enrollment(&key)?.is_some() {
        return Err(ErrorCode::AlreadyEnrolled.into());
    }

    store.apply(WriteBatch::new().put_enrollment(key, Enrollment::new(ctx.block_height())))?;

    tracing::debug!(%program_id, user = %ctx.caller(), "enrolled");
    Ok(())
}

/// Record the caller's progress in a program.
///
/// # Errors
///
/// - `NotEnrolled` if the caller has no enrollment for the program
/// - `InvalidProgress` if the value exceeds 100, is below the recorded progress, or
///   the transaction's height precedes the enrollment
pub fn update_progress<S: ProtocolStore + ?Sized>(
    store: &mut S,
    ctx: &TxContext,
    program_id: ProgramId,
    percentage: u32,
) -> Result<()> {
    let key = EnrollmentKey::new(ctx.caller().clone(), program_id);
    let current = store
        .get_enrollment(&key)?
        .ok_or(ProtocolError::Rejected(ErrorCode::NotEnrolled))?;

    let Some(next) = advance(&current, percentage, ctx.block_height())? else {
        return Ok(());
    };
    let completed_now = next.completed && !current.completed;

    store.apply(WriteBatch::new().put_enrollment(key, next))?;

    if completed_now {
        tracing::debug!(%program_id, user = %ctx.caller(), "enrollment completed");
    } else {
        tracing::debug!(%program_id, user = %ctx.caller(), percentage, "progress updated");
    }
    Ok(())
}

/// Compute the enrollment after a progress update.
///
/// Returns `Ok(None)` when the update changes nothing (same value, or 100 on an
/// already completed enrollment). A write at a height below `enrolled_at` is
/// rejected so that a completion never predates its enrollment.
fn advance(
    current: &Enrollment,
    percentage: u32,
    at: BlockHeight,
) -> Result<Option<Enrollment>> {
    let percentage = u8::try_from(percentage)
        .ok()
        .filter(|value| *value <= COMPLETE_PERCENTAGE)
        .ok_or(ProtocolError::Rejected(ErrorCode::InvalidProgress))?;
    if percentage < current.progress_percentage {
        return Err(ErrorCode::InvalidProgress.into());
    }
    if percentage == current.progress_percentage {
        return Ok(None);
    }
    if at < current.enrolled_at {
        return Err(ErrorCode::InvalidProgress.into());
    }

    let mut next = current.clone();
    next.progress_percentage = percentage;
    if percentage == COMPLETE_PERCENTAGE {
        next.completed = true;
        next.completion_date = at;
    }
    Ok(Some(next))
}

/// Look up an enrollment. Unknown pairs yield `None`.
pub fn get_enrollment<S: ProtocolStore + ?Sized>(
    store: &S,
    key: &EnrollmentKey,
) -> Result<Option<Enrollment>> {
    store.get_enrollment(key)
}

/// List enrollments matching the filter.
pub fn list_enrollments<S: ProtocolStore + ?Sized>(
    store: &S,
    filter: &EnrollmentFilter,
) -> Result<Vec<EnrollmentEntry>> {
    store.list_enrollments(filter)
}

/// Enrollment counts for a program, `None` if the program does not exist.
pub fn program_stats<S: ProtocolStore + ?Sized>(
    store: &S,
    program_id: ProgramId,
) -> Result<Option<ProgramStats>> {
    if store.get_program(program_id)?.is_none() {
        return Ok(None);
    }

    let entries = store.list_enrollments(&EnrollmentFilter::new().program(program_id))?;
    let completed = entries
        .iter()
        .filter(|entry| entry.enrollment.completed)
        .count();
    Ok(Some(ProgramStats {
        enrolled: entries.len() as u64,
        completed: completed as u64,
    }))
}
