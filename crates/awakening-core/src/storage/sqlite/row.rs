//! Row types for database queries.

use crate::error::{ProtocolError, Result};
use crate::storage::types::{
    BlockHeight, Enrollment, EnrollmentEntry, EnrollmentKey, Principal, Program, ProgramId,
};

/// Raw row data from the programs table, before parsing into domain types.
#[derive(Debug)]
pub struct ProgramRow {
    pub id: i64,
    pub guide_id: String,
    pub title: String,
    pub description: String,
    pub duration_days: i64,
    pub difficulty_level: i64,
    pub active: bool,
    pub created_at: i64,
}

impl ProgramRow {
    pub const COLUMNS: &'static str =
        "id, guide_id, title, description, duration_days, difficulty_level, active, created_at";

    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            guide_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            duration_days: row.get(4)?,
            difficulty_level: row.get(5)?,
            active: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}

impl TryFrom<ProgramRow> for Program {
    type Error = ProtocolError;

    fn try_from(row: ProgramRow) -> Result<Self> {
        Ok(Program {
            id: ProgramId(from_sql_int(row.id, "program id")?),
            guide_id: Principal::new(row.guide_id),
            title: row.title,
            description: row.description,
            duration_days: u32::try_from(row.duration_days)
                .map_err(|e| ProtocolError::Storage(format!("Invalid duration_days: {}", e)))?,
            difficulty_level: u8::try_from(row.difficulty_level)
                .map_err(|e| ProtocolError::Storage(format!("Invalid difficulty_level: {}", e)))?,
            active: row.active,
            created_at: from_sql_int(row.created_at, "created_at")?,
        })
    }
}

/// Raw row data from the enrollments table.
#[derive(Debug)]
pub struct EnrollmentRow {
    pub user_id: String,
    pub program_id: i64,
    pub enrolled_at: i64,
    pub progress_percentage: i64,
    pub completed: bool,
    pub completion_date: i64,
}

impl EnrollmentRow {
    pub const COLUMNS: &'static str =
        "user_id, program_id, enrolled_at, progress_percentage, completed, completion_date";

    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get(0)?,
            program_id: row.get(1)?,
            enrolled_at: row.get(2)?,
            progress_percentage: row.get(3)?,
            completed: row.get(4)?,
            completion_date: row.get(5)?,
        })
    }
}

impl TryFrom<EnrollmentRow> for EnrollmentEntry {
    type Error = ProtocolError;

    fn try_from(row: EnrollmentRow) -> Result<Self> {
        let key = EnrollmentKey::new(
            Principal::new(row.user_id),
            ProgramId(from_sql_int(row.program_id, "program_id")?),
        );
        let enrollment = Enrollment {
            enrolled_at: from_sql_int(row.enrolled_at, "enrolled_at")?,
            progress_percentage: u8::try_from(row.progress_percentage).map_err(|e| {
                ProtocolError::Storage(format!("Invalid progress_percentage: {}", e))
            })?,
            completed: row.completed,
            completion_date: from_sql_int(row.completion_date, "completion_date")?,
        };
        Ok(EnrollmentEntry { key, enrollment })
    }
}

/// SQLite integers are signed; heights and ids are stored as non-negative i64.
pub fn to_sql_int(value: u64, what: &str) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| ProtocolError::Storage(format!("{} out of range: {}", what, value)))
}

/// Key for a read. An id beyond `i64::MAX` can never have been stored, so
/// lookups treat it as absent.
pub fn lookup_key(value: u64) -> Option<i64> {
    i64::try_from(value).ok()
}

pub fn from_sql_int(value: i64, what: &str) -> Result<BlockHeight> {
    u64::try_from(value)
        .map_err(|_| ProtocolError::Storage(format!("Invalid {}: {}", what, value)))
}
