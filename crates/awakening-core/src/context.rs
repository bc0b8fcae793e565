//! Per-transaction context supplied by the host.

use crate::error::{ProtocolError, Result};
use crate::storage::{BlockHeight, Principal};

/// Authenticated caller and current block height for one transaction.
///
/// The host resolves both before invoking an operation; the protocol never reads a
/// global "current caller".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxContext {
    caller: Principal,
    block_height: BlockHeight,
}

impl TxContext {
    /// Build a context.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidContext` if the caller is empty or the block
    /// height is 0. Height 0 is reserved as the "not completed" marker.
    pub fn new(caller: Principal, block_height: BlockHeight) -> Result<Self> {
        if caller.as_str().trim().is_empty() {
            return Err(ProtocolError::InvalidContext(
                "caller must not be empty".to_string(),
            ));
        }
        if block_height == 0 {
            return Err(ProtocolError::InvalidContext(
                "block height must be positive".to_string(),
            ));
        }
        Ok(Self {
            caller,
            block_height,
        })
    }

    pub fn caller(&self) -> &Principal {
        &self.caller
    }

    pub fn block_height(&self) -> BlockHeight {
        self.block_height
    }
}
