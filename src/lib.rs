// Job Ledger - Core Library
// Validated job entries, a ledger that enforces daily hour limits,
// queries, aggregates and CSV persistence.

pub mod config;
pub mod error;
pub mod job;
pub mod manager;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use error::{ErrorKind, JobError, Result};
pub use job::{Job, MAX_HOURS_PER_JOB};
pub use manager::{JobManager, DEFAULT_DAILY_HOUR_LIMIT};
pub use storage::HEADER;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
