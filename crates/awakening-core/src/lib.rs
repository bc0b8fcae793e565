//! # Awakening Core
//!
//! Deterministic state machine for guided programs and user enrollments.
//!
//! The host ledger invokes one operation per transaction with an authenticated
//! caller and a block height ([`TxContext`]). Every operation validates all of its
//! preconditions against the store before it writes anything.
//!
//! ## Architecture
//!
//! - **storage**: the `ProtocolStore` trait, write batches, memory and SQLite backends
//! - **registry**: program creation, lookup and activation
//! - **enrollment**: enrollment creation, progress and completion
//! - **protocol**: the entry points bound to one store
//! - **integrity**: verification of stored state against the data-model invariants
//! - **result**: the `{type, value}` shape returned to callers

pub mod context;
pub mod enrollment;
pub mod error;
pub mod integrity;
pub mod protocol;
pub mod registry;
pub mod result;
pub mod storage;

pub use context::TxContext;
pub use error::{ErrorCode, ProtocolError, Result};
pub use integrity::IntegrityReport;
pub use protocol::Protocol;
pub use result::CallResult;
pub use storage::ProtocolStore;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
