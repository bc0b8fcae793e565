//! Error types for protocol operations.
//!
//! Contract rejections are carried as an [`ErrorCode`], whose numeric values are
//! fixed for compatibility with existing callers. Everything else (storage faults,
//! a malformed transaction context, corrupt state) is an infrastructure error the
//! host handles by aborting the transaction.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Contract error codes returned in the `{type: "error", value: code}` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum ErrorCode {
    /// Caller is not the guide that owns the program
    Unauthorized,
    /// Referenced program does not exist
    ProgramNotFound,
    /// User already holds an enrollment for the program
    AlreadyEnrolled,
    /// User has no enrollment for the program
    NotEnrolled,
    /// Program is not accepting new enrollments
    ProgramNotActive,
    /// Progress is out of range or would decrease
    InvalidProgress,
    /// Program fields failed validation at creation
    InvalidProgram,
}

impl ErrorCode {
    /// Every code, in numeric order.
    pub const ALL: [ErrorCode; 7] = [
        ErrorCode::Unauthorized,
        ErrorCode::ProgramNotFound,
        ErrorCode::AlreadyEnrolled,
        ErrorCode::NotEnrolled,
        ErrorCode::ProgramNotActive,
        ErrorCode::InvalidProgress,
        ErrorCode::InvalidProgram,
    ];

    /// Numeric wire value.
    pub fn code(self) -> u32 {
        match self {
            ErrorCode::Unauthorized => 200,
            ErrorCode::ProgramNotFound => 201,
            ErrorCode::AlreadyEnrolled => 202,
            ErrorCode::NotEnrolled => 203,
            ErrorCode::ProgramNotActive => 204,
            ErrorCode::InvalidProgress => 205,
            ErrorCode::InvalidProgram => 206,
        }
    }

    /// Look up a code by its numeric value.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|candidate| candidate.code() == code)
    }

    /// Stable SCREAMING_SNAKE name, as used in logs and plain output.
    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "ERR_UNAUTHORIZED",
            ErrorCode::ProgramNotFound => "ERR_PROGRAM_NOT_FOUND",
            ErrorCode::AlreadyEnrolled => "ERR_ALREADY_ENROLLED",
            ErrorCode::NotEnrolled => "ERR_NOT_ENROLLED",
            ErrorCode::ProgramNotActive => "ERR_PROGRAM_NOT_ACTIVE",
            ErrorCode::InvalidProgress => "ERR_INVALID_PROGRESS",
            ErrorCode::InvalidProgram => "ERR_INVALID_PROGRAM",
        }
    }

    fn message(self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "caller does not own this program",
            ErrorCode::ProgramNotFound => "program not found",
            ErrorCode::AlreadyEnrolled => "already enrolled in this program",
            ErrorCode::NotEnrolled => "not enrolled in this program",
            ErrorCode::ProgramNotActive => "program is not active",
            ErrorCode::InvalidProgress => "progress must be within 0..=100 and must not decrease",
            ErrorCode::InvalidProgram => "invalid program definition",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.code())
    }
}

impl From<ErrorCode> for u32 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl TryFrom<u32> for ErrorCode {
    type Error = String;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        ErrorCode::from_code(value).ok_or_else(|| format!("Unknown error code: {}", value))
    }
}

/// Core error type for protocol operations.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Contract precondition failed; reported to the caller as a value
    #[error("Rejected: {0}")]
    Rejected(ErrorCode),

    /// Transaction context is unusable (empty caller, zero block height)
    #[error("Invalid context: {0}")]
    InvalidContext(String),

    /// Stored state violates a data-model invariant
    #[error("Corrupt state: {0}")]
    Corrupt(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ProtocolError {
    /// The contract code, if this is a rejection rather than an infrastructure fault.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ProtocolError::Rejected(code) => Some(*code),
            _ => None,
        }
    }
}

impl From<ErrorCode> for ProtocolError {
    fn from(code: ErrorCode) -> Self {
        ProtocolError::Rejected(code)
    }
}

impl From<rusqlite::Error> for ProtocolError {
    fn from(err: rusqlite::Error) -> Self {
        ProtocolError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for ProtocolError {
    fn from(err: std::io::Error) -> Self {
        ProtocolError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        ProtocolError::Storage(err.to_string())
    }
}
