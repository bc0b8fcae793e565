//! The `{type, value}` result shape returned to callers.

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, ProtocolError, Result};

/// Outcome of a mutating entry point, as callers see it.
///
/// Serializes as `{"type": "ok", "value": T}` or `{"type": "error", "value": 202}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CallResult<T> {
    Ok(T),
    Error(ErrorCode),
}

impl<T> CallResult<T> {
    /// Convert an operation result into the caller-facing shape.
    ///
    /// Contract rejections become `Error(code)`. Infrastructure faults have no code
    /// and are passed back to the host, which aborts the transaction.
    pub fn from_result(result: Result<T>) -> Result<Self> {
        match result {
            Ok(value) => Ok(CallResult::Ok(value)),
            Err(ProtocolError::Rejected(code)) => Ok(CallResult::Error(code)),
            Err(err) => Err(err),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CallResult::Ok(_))
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            CallResult::Ok(_) => None,
            CallResult::Error(code) => Some(*code),
        }
    }

    pub fn into_result(self) -> Result<T> {
        match self {
            CallResult::Ok(value) => Ok(value),
            CallResult::Error(code) => Err(ProtocolError::Rejected(code)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ProgramId;

    #[test]
    fn test_ok_shape() {
        let result = CallResult::Ok(ProgramId(1));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({"type": "ok", "value": 1}));
    }

    #[test]
    fn test_error_shape() {
        let result: CallResult<bool> = CallResult::Error(ErrorCode::AlreadyEnrolled);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({"type": "error", "value": 202}));

        let parsed: CallResult<bool> =
            serde_json::from_value(serde_json::json!({"type": "error", "value": 204})).unwrap();
        assert_eq!(parsed.error_code(), Some(ErrorCode::ProgramNotActive));
    }

    #[test]
    fn test_from_result_passes_storage_faults_through() {
        let rejected = CallResult::<bool>::from_result(Err(ErrorCode::NotEnrolled.into())).unwrap();
        assert_eq!(rejected, CallResult::Error(ErrorCode::NotEnrolled));

        let fault =
            CallResult::<bool>::from_result(Err(ProtocolError::Storage("io".to_string())));
        assert!(fault.is_err());

        let ok = CallResult::from_result(Ok(true)).unwrap();
        assert!(ok.is_ok());
        assert!(ok.into_result().unwrap());
    }
}
