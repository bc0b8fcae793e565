//! CLI error types for structured error handling.
//!
//! Typed errors map to specific exit codes so scripts can tell a contract
//! rejection apart from a usage problem.

use std::fmt;

use awakening_core::ErrorCode;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// The contract rejected the transaction; the result has already been printed
    Rejected(ErrorCode),

    /// Invalid or missing user input
    Usage { message: String, hint: Option<String> },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Rejected(code) => write!(f, "{} {}", code.name(), code),
            CliError::Usage { message, hint } => match hint {
                Some(h) => write!(f, "{}\n{}", message, h),
                None => write!(f, "{}", message),
            },
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        CliError::Usage {
            message: message.into(),
            hint: None,
        }
    }

    pub fn usage_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::Usage {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Rejected(_) => exit_codes::FAILURE,
            CliError::Usage { .. } => exit_codes::USAGE,
        }
    }
}

/// Exit code for any error reaching `main`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<CliError>()
        .map(CliError::exit_code)
        .unwrap_or(exit_codes::FAILURE)
}
