//! SQLite storage backend.
//!
//! State lives in a single SQLite file. Each `apply` runs inside one SQLite
//! transaction, so a batch is either fully committed or leaves the file untouched.

mod row;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use crate::error::{ProtocolError, Result};
use crate::storage::batch::{StoreWrite, WriteBatch};
use crate::storage::traits::ProtocolStore;
use crate::storage::types::{
    Enrollment, EnrollmentEntry, EnrollmentFilter, EnrollmentKey, Program, ProgramFilter,
    ProgramId, StoreMetadata,
};
use crate::storage::FORMAT_VERSION;

use row::{lookup_key, to_sql_int, EnrollmentRow, ProgramRow};

const SCHEMA: &str = r#"
    CREATE TABLE meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE programs (
        id INTEGER PRIMARY KEY,
        guide_id TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        duration_days INTEGER NOT NULL,
        difficulty_level INTEGER NOT NULL,
        active INTEGER NOT NULL,
        created_at INTEGER NOT NULL
    );

    CREATE INDEX programs_guide ON programs (guide_id);

    CREATE TABLE enrollments (
        user_id TEXT NOT NULL,
        program_id INTEGER NOT NULL,
        enrolled_at INTEGER NOT NULL,
        progress_percentage INTEGER NOT NULL,
        completed INTEGER NOT NULL,
        completion_date INTEGER NOT NULL,

        PRIMARY KEY (user_id, program_id),
        FOREIGN KEY (program_id) REFERENCES programs(id)
    );

    CREATE INDEX enrollments_program ON enrollments (program_id);
"#;

const REQUIRED_META_KEYS: [&str; 5] = [
    "format_version",
    "store_id",
    "created_at",
    "last_modified",
    "program_counter",
];

/// SQLite-backed store.
pub struct SqliteStore {
    path: PathBuf,
    conn: Connection,
}

impl SqliteStore {
    /// Create a new store file at `path`.
    ///
    /// # Returns
    ///
    /// Returns the store id written to the metadata table.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Storage` if the file already exists or cannot be written.
    pub fn create(path: &Path) -> Result<Uuid> {
        if path.exists() {
            return Err(ProtocolError::Storage(format!(
                "Store already exists: {}",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut conn = Connection::open(path)?;
        let store_id = Self::initialize(&mut conn)?;
        tracing::debug!(path = %path.display(), %store_id, "created store");
        Ok(store_id)
    }

    /// Open an existing store file.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Storage` if the file is missing or is not a store.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ProtocolError::Storage(format!(
                "Store not found: {}",
                path.display()
            )));
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let format_version: Option<String> = conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'format_version'",
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| ProtocolError::Storage(format!("Not a protocol store: {}", e)))?;
        match format_version.as_deref() {
            Some(FORMAT_VERSION) => {}
            Some(other) => {
                return Err(ProtocolError::Storage(format!(
                    "Unsupported store format version: {}",
                    other
                )))
            }
            None => {
                return Err(ProtocolError::Storage(
                    "Store metadata missing format_version".to_string(),
                ))
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            conn,
        })
    }

    /// Open a fresh store that lives only in memory.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        Self::initialize(&mut conn)?;
        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn initialize(conn: &mut Connection) -> Result<Uuid> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let store_id = Uuid::new_v4();
        let created_at = Utc::now().to_rfc3339();

        let tx = conn.transaction()?;
        tx.execute_batch(SCHEMA)?;
        let store_id_str = store_id.to_string();
        for (key, value) in [
            ("format_version", FORMAT_VERSION),
            ("store_id", store_id_str.as_str()),
            ("created_at", created_at.as_str()),
            ("last_modified", created_at.as_str()),
            ("program_counter", "0"),
        ] {
            tx.execute("INSERT INTO meta (key, value) VALUES (?, ?)", [key, value])?;
        }
        tx.commit()?;

        Ok(store_id)
    }

    fn meta_value(&self, key: &str) -> Result<String> {
        self.conn
            .query_row("SELECT value FROM meta WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?
            .ok_or_else(|| ProtocolError::Storage(format!("Metadata missing key: {}", key)))
    }

    /// Check the database file itself: foreign keys and required metadata.
    ///
    /// Data-model invariants are checked separately by `integrity::check_store`.
    pub fn check_database(&self) -> Result<()> {
        let mut stmt = self.conn.prepare("PRAGMA foreign_key_check")?;
        let mut rows = stmt.query([])?;
        if rows.next()?.is_some() {
            return Err(ProtocolError::Storage(
                "Foreign key integrity check failed".to_string(),
            ));
        }

        let placeholders = vec!["?"; REQUIRED_META_KEYS.len()].join(", ");
        let metadata_count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM meta WHERE key IN ({})", placeholders),
            rusqlite::params_from_iter(REQUIRED_META_KEYS.iter()),
            |row| row.get(0),
        )?;
        if metadata_count < REQUIRED_META_KEYS.len() as i64 {
            return Err(ProtocolError::Storage(
                "Metadata table missing required keys".to_string(),
            ));
        }

        Ok(())
    }
}

impl ProtocolStore for SqliteStore {
    fn metadata(&self) -> Result<StoreMetadata> {
        let format_version = self.meta_value("format_version")?;

        let store_id_str = self.meta_value("store_id")?;
        let store_id = Uuid::parse_str(&store_id_str)
            .map_err(|e| ProtocolError::Storage(format!("Invalid store_id in metadata: {}", e)))?;

        let created_at_str = self.meta_value("created_at")?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| ProtocolError::Storage(format!("Invalid created_at timestamp: {}", e)))?
            .with_timezone(&Utc);

        Ok(StoreMetadata {
            format_version,
            store_id,
            created_at,
        })
    }

    fn program_counter(&self) -> Result<ProgramId> {
        let value = self.meta_value("program_counter")?;
        let counter = value
            .parse::<u64>()
            .map_err(|e| ProtocolError::Storage(format!("Invalid program_counter: {}", e)))?;
        Ok(ProgramId(counter))
    }

    fn get_program(&self, id: ProgramId) -> Result<Option<Program>> {
        let Some(id) = lookup_key(id.get()) else {
            return Ok(None);
        };
        let row = self
            .conn
            .query_row(
                &format!("SELECT {} FROM programs WHERE id = ?", ProgramRow::COLUMNS),
                [id],
                ProgramRow::from_row,
            )
            .optional()?;

        row.map(Program::try_from).transpose()
    }

    fn list_programs(&self, filter: &ProgramFilter) -> Result<Vec<Program>> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref guide) = filter.guide_id {
            conditions.push("guide_id = ?");
            params.push(Box::new(guide.as_str().to_string()));
        }

        if let Some(active) = filter.active {
            conditions.push("active = ?");
            params.push(Box::new(active));
        }

        let mut query = format!("SELECT {} FROM programs", ProgramRow::COLUMNS);
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY id ASC");

        if let Some(limit) = filter.limit {
            query.push_str(" LIMIT ?");
            params.push(Box::new(limit as i64));
        }

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(params.iter()),
            ProgramRow::from_row,
        )?;

        let mut programs = Vec::new();
        for row in rows {
            programs.push(Program::try_from(row?)?);
        }
        Ok(programs)
    }

    fn get_enrollment(&self, key: &EnrollmentKey) -> Result<Option<Enrollment>> {
        let Some(program_id) = lookup_key(key.program_id.get()) else {
            return Ok(None);
        };
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM enrollments WHERE user_id = ? AND program_id = ?",
                    EnrollmentRow::COLUMNS
                ),
                (key.user_id.as_str(), program_id),
                EnrollmentRow::from_row,
            )
            .optional()?;

        row.map(|row| EnrollmentEntry::try_from(row).map(|entry| entry.enrollment))
            .transpose()
    }

    fn list_enrollments(&self, filter: &EnrollmentFilter) -> Result<Vec<EnrollmentEntry>> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref user) = filter.user_id {
            conditions.push("user_id = ?");
            params.push(Box::new(user.as_str().to_string()));
        }

        if let Some(program_id) = filter.program_id {
            let Some(program_id) = lookup_key(program_id.get()) else {
                return Ok(Vec::new());
            };
            conditions.push("program_id = ?");
            params.push(Box::new(program_id));
        }

        if let Some(completed) = filter.completed {
            conditions.push("completed = ?");
            params.push(Box::new(completed));
        }

        let mut query = format!("SELECT {} FROM enrollments", EnrollmentRow::COLUMNS);
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY program_id ASC, user_id ASC");

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(params.iter()),
            EnrollmentRow::from_row,
        )?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(EnrollmentEntry::try_from(row?)?);
        }
        Ok(entries)
    }

    fn apply(&mut self, batch: WriteBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let tx = self.conn.transaction()?;

        for write in batch.into_writes() {
            match write {
                StoreWrite::SetProgramCounter(id) => {
                    tx.execute(
                        "UPDATE meta SET value = ? WHERE key = 'program_counter'",
                        [id.get().to_string()],
                    )?;
                }
                StoreWrite::PutProgram(program) => {
                    tx.execute(
                        r#"
                        INSERT INTO programs (
                            id,
                            guide_id,
                            title,
                            description,
                            duration_days,
                            difficulty_level,
                            active,
                            created_at
                        )
                        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                        ON CONFLICT(id) DO UPDATE SET active = excluded.active
                        "#,
                        (
                            to_sql_int(program.id.get(), "program id")?,
                            program.guide_id.as_str(),
                            program.title.as_str(),
                            program.description.as_str(),
                            i64::from(program.duration_days),
                            i64::from(program.difficulty_level),
                            program.active,
                            to_sql_int(program.created_at, "created_at")?,
                        ),
                    )?;
                }
                StoreWrite::PutEnrollment(key, enrollment) => {
                    tx.execute(
                        r#"
                        INSERT INTO enrollments (
                            user_id,
                            program_id,
                            enrolled_at,
                            progress_percentage,
                            completed,
                            completion_date
                        )
                        VALUES (?, ?, ?, ?, ?, ?)
                        ON CONFLICT(user_id, program_id) DO UPDATE SET
                            progress_percentage = excluded.progress_percentage,
                            completed = excluded.completed,
                            completion_date = excluded.completion_date
                        "#,
                        (
                            key.user_id.as_str(),
                            to_sql_int(key.program_id.get(), "program id")?,
                            to_sql_int(enrollment.enrolled_at, "enrolled_at")?,
                            i64::from(enrollment.progress_percentage),
                            enrollment.completed,
                            to_sql_int(enrollment.completion_date, "completion_date")?,
                        ),
                    )?;
                }
            }
        }

        tx.execute(
            "UPDATE meta SET value = ? WHERE key = 'last_modified'",
            [Utc::now().to_rfc3339()],
        )?;

        tx.commit()?;

        Ok(())
    }
}
