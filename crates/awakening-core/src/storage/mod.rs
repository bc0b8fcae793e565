//! Storage abstraction and backends.

mod batch;
mod memory;
mod sqlite;
mod traits;
mod types;

pub use batch::{StoreWrite, WriteBatch};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::ProtocolStore;
pub use types::{
    BlockHeight, Enrollment, EnrollmentEntry, EnrollmentFilter, EnrollmentKey, NewProgram,
    Principal, Program, ProgramFilter, ProgramId, ProgramStats, StoreMetadata,
    COMPLETE_PERCENTAGE, MAX_DIFFICULTY, MIN_DIFFICULTY,
};

/// On-disk and in-memory store format version.
pub const FORMAT_VERSION: &str = "0.1";
