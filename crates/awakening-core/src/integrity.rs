//! Store integrity verification against the data-model invariants.

use serde::Serialize;

use crate::error::{ProtocolError, Result};
use crate::storage::{
    EnrollmentFilter, ProgramFilter, ProgramId, ProtocolStore, COMPLETE_PERCENTAGE,
    MAX_DIFFICULTY, MIN_DIFFICULTY,
};

/// Summary of a store that passed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub programs: u64,
    pub enrollments: u64,
    pub completed: u64,
}

/// Verify stored state.
///
/// Checks that program ids are dense from 1 and match the counter, that program
/// fields are in range, that every enrollment references an existing program, and
/// that `completed`, `completion_date > 0` and `progress == 100` agree.
///
/// # Errors
///
/// Returns `ProtocolError::Corrupt` describing the first violation found.
pub fn check_store<S: ProtocolStore + ?Sized>(store: &S) -> Result<IntegrityReport> {
    let counter = store.program_counter()?;
    let programs = store.list_programs(&ProgramFilter::new())?;

    for (index, program) in programs.iter().enumerate() {
        let expected = ProgramId(index as u64 + 1);
        if program.id != expected {
            return Err(corrupt(format!(
                "program ids not dense: expected {}, found {}",
                expected, program.id
            )));
        }
        if program.duration_days == 0 {
            return Err(corrupt(format!("program {} has zero duration", program.id)));
        }
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&program.difficulty_level) {
            return Err(corrupt(format!(
                "program {} difficulty {} out of range",
                program.id, program.difficulty_level
            )));
        }
        if program.created_at == 0 {
            return Err(corrupt(format!("program {} has no creation height", program.id)));
        }
    }

    if counter.get() != programs.len() as u64 {
        return Err(corrupt(format!(
            "program counter {} does not match {} stored programs",
            counter,
            programs.len()
        )));
    }

    let enrollments = store.list_enrollments(&EnrollmentFilter::new())?;
    let mut completed = 0u64;
    for entry in &enrollments {
        let key = &entry.key;
        let enrollment = &entry.enrollment;
        if key.program_id.get() == 0 || key.program_id > counter {
            return Err(corrupt(format!(
                "enrollment of {} references missing program {}",
                key.user_id, key.program_id
            )));
        }
        if enrollment.progress_percentage > COMPLETE_PERCENTAGE {
            return Err(corrupt(format!(
                "enrollment {}/{} progress {} out of range",
                key.user_id, key.program_id, enrollment.progress_percentage
            )));
        }

        let at_full = enrollment.progress_percentage == COMPLETE_PERCENTAGE;
        let dated = enrollment.completion_date > 0;
        if enrollment.completed != at_full || enrollment.completed != dated {
            return Err(corrupt(format!(
                "enrollment {}/{} completion state inconsistent",
                key.user_id, key.program_id
            )));
        }
        if dated && enrollment.completion_date < enrollment.enrolled_at {
            return Err(corrupt(format!(
                "enrollment {}/{} completed before it was created",
                key.user_id, key.program_id
            )));
        }
        if enrollment.completed {
            completed += 1;
        }
    }

    Ok(IntegrityReport {
        programs: programs.len() as u64,
        enrollments: enrollments.len() as u64,
        completed,
    })
}

fn corrupt(message: String) -> ProtocolError {
    ProtocolError::Corrupt(message)
}
