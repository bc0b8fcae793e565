//! Core data types for the storage layer.
//!
//! Records serialize with kebab-case field names (`guide-id`, `progress-percentage`)
//! to match the record shape existing callers read.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Host timestamp: a logical clock or block height. Always > 0 for a real transaction.
pub type BlockHeight = u64;

/// Lowest accepted difficulty level.
pub const MIN_DIFFICULTY: u8 = 1;

/// Highest accepted difficulty level.
pub const MAX_DIFFICULTY: u8 = 5;

/// Progress value that completes an enrollment.
pub const COMPLETE_PERCENTAGE: u8 = 100;

/// Sequential program identifier, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramId(pub u64);

impl ProgramId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProgramId {
    fn from(value: u64) -> Self {
        ProgramId(value)
    }
}

/// An authenticated principal (guide or user), as resolved by the host.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A program created by a guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Program {
    /// Sequential identifier
    pub id: ProgramId,

    /// Guide that created the program
    pub guide_id: Principal,

    pub title: String,

    pub description: String,

    /// Length of the program in days (> 0)
    pub duration_days: u32,

    /// Difficulty in `MIN_DIFFICULTY..=MAX_DIFFICULTY`
    pub difficulty_level: u8,

    /// Whether new enrollments are accepted
    pub active: bool,

    /// Block height of creation
    pub created_at: BlockHeight,
}

/// A user's participation in one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Enrollment {
    /// Block height of enrollment
    pub enrolled_at: BlockHeight,

    /// Progress in `0..=100`, never decreasing
    pub progress_percentage: u8,

    /// True exactly when progress reached 100
    pub completed: bool,

    /// Block height of completion, 0 until completed
    pub completion_date: BlockHeight,
}

impl Enrollment {
    /// A fresh enrollment at zero progress.
    pub fn new(enrolled_at: BlockHeight) -> Self {
        Self {
            enrolled_at,
            progress_percentage: 0,
            completed: false,
            completion_date: 0,
        }
    }
}

/// Composite key of an enrollment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EnrollmentKey {
    pub user_id: Principal,
    pub program_id: ProgramId,
}

impl EnrollmentKey {
    pub fn new(user_id: Principal, program_id: ProgramId) -> Self {
        Self {
            user_id,
            program_id,
        }
    }
}

/// An enrollment together with the key it is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EnrollmentEntry {
    #[serde(flatten)]
    pub key: EnrollmentKey,

    #[serde(flatten)]
    pub enrollment: Enrollment,
}

/// Builder for creating new programs.
#[derive(Debug, Clone)]
pub struct NewProgram {
    pub title: String,
    pub description: String,
    pub duration_days: u32,
    pub difficulty_level: u8,
}

impl NewProgram {
    pub fn new(title: impl Into<String>, duration_days: u32, difficulty_level: u8) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            duration_days,
            difficulty_level,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check the fields a program must satisfy, returning the first problem found.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
        if self.duration_days == 0 {
            return Err("duration-days must be positive".to_string());
        }
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty_level) {
            return Err(format!(
                "difficulty-level must be within {}..={}",
                MIN_DIFFICULTY, MAX_DIFFICULTY
            ));
        }
        Ok(())
    }
}

/// Filter for listing programs.
#[derive(Debug, Clone, Default)]
pub struct ProgramFilter {
    /// Only programs created by this guide
    pub guide_id: Option<Principal>,

    /// Only programs with this activation state
    pub active: Option<bool>,

    /// Maximum number of results
    pub limit: Option<usize>,
}

impl ProgramFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guide(mut self, guide_id: Principal) -> Self {
        self.guide_id = Some(guide_id);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, program: &Program) -> bool {
        if let Some(ref guide) = self.guide_id {
            if &program.guide_id != guide {
                return false;
            }
        }
        if let Some(active) = self.active {
            if program.active != active {
                return false;
            }
        }
        true
    }
}

/// Filter for listing enrollments.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentFilter {
    pub user_id: Option<Principal>,
    pub program_id: Option<ProgramId>,
    pub completed: Option<bool>,
}

impl EnrollmentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, user_id: Principal) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn program(mut self, program_id: ProgramId) -> Self {
        self.program_id = Some(program_id);
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn matches(&self, key: &EnrollmentKey, enrollment: &Enrollment) -> bool {
        if let Some(ref user) = self.user_id {
            if &key.user_id != user {
                return false;
            }
        }
        if let Some(program_id) = self.program_id {
            if key.program_id != program_id {
                return false;
            }
        }
        if let Some(completed) = self.completed {
            if enrollment.completed != completed {
                return false;
            }
        }
        true
    }
}

/// Enrollment counts for one program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramStats {
    pub enrolled: u64,
    pub completed: u64,
}

/// Metadata for a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreMetadata {
    /// Format version (e.g., "0.1")
    pub format_version: String,

    /// Random identifier assigned when the store was created
    pub store_id: Uuid,

    /// When this store was created
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_program_builder() {
        let program = NewProgram::new("Mindful Awakening", 21, 3)
            .with_description("21-day consciousness expansion program");

        assert_eq!(program.title, "Mindful Awakening");
        assert_eq!(program.duration_days, 21);
        assert_eq!(program.difficulty_level, 3);
        assert!(program.validate().is_ok());
    }

    #[test]
    fn test_new_program_validation() {
        assert!(NewProgram::new("   ", 21, 3).validate().is_err());
        assert!(NewProgram::new("Stillness", 0, 3).validate().is_err());
        assert!(NewProgram::new("Stillness", 7, 0).validate().is_err());
        assert!(NewProgram::new("Stillness", 7, 6).validate().is_err());
        assert!(NewProgram::new("Stillness", 7, 1).validate().is_ok());
        assert!(NewProgram::new("Stillness", 7, 5).validate().is_ok());
    }

    #[test]
    fn test_program_serializes_kebab_case() {
        let program = Program {
            id: ProgramId(1),
            guide_id: Principal::new("ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG"),
            title: "Mindful Awakening".to_string(),
            description: "21-day consciousness expansion program".to_string(),
            duration_days: 21,
            difficulty_level: 3,
            active: true,
            created_at: 1000,
        };

        let value = serde_json::to_value(&program).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["duration-days"], 21);
        assert_eq!(value["difficulty-level"], 3);
        assert_eq!(value["created-at"], 1000);
        assert_eq!(value["guide-id"], "ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG");
    }

    #[test]
    fn test_enrollment_entry_flattens() {
        let entry = EnrollmentEntry {
            key: EnrollmentKey::new(Principal::from("user1"), ProgramId(4)),
            enrollment: Enrollment::new(1000),
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["user-id"], "user1");
        assert_eq!(value["program-id"], 4);
        assert_eq!(value["progress-percentage"], 0);
        assert_eq!(value["completion-date"], 0);
    }

    #[test]
    fn test_filters_match() {
        let guide = Principal::from("guide1");
        let program = Program {
            id: ProgramId(2),
            guide_id: guide.clone(),
            title: "t".to_string(),
            description: String::new(),
            duration_days: 1,
            difficulty_level: 1,
            active: false,
            created_at: 5,
        };

        assert!(ProgramFilter::new().matches(&program));
        assert!(ProgramFilter::new().guide(guide).active(false).matches(&program));
        assert!(!ProgramFilter::new().active(true).matches(&program));

        let key = EnrollmentKey::new(Principal::from("user1"), ProgramId(2));
        let enrollment = Enrollment::new(5);
        assert!(EnrollmentFilter::new().program(ProgramId(2)).matches(&key, &enrollment));
        assert!(!EnrollmentFilter::new().completed(true).matches(&key, &enrollment));
        assert!(!EnrollmentFilter::new()
            .user(Principal::from("user2"))
            .matches(&key, &enrollment));
    }
}
