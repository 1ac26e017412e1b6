//! shiftcheck Store - durable history log
//!
//! The persistence half of the checklist:
//! - [`SubmissionRow`] / [`HistoryLog`]: the flat tabular data model
//! - [`CsvStore`]: file-backed load/submit/clear with same-day
//!   overwrite semantics
//!
//! The durable format is a UTF-8 CSV with the deployed Japanese column
//! headers; see [`record::CSV_HEADERS`]. Loading tolerates a missing,
//! empty, or malformed file by substituting an empty log; submitting
//! with an empty staff id is rejected before any mutation.

#![warn(unreachable_pub)]

pub mod record;
pub mod store;

// Re-exports for convenience
pub use record::{day_key, format_timestamp, HistoryLog, SubmissionRow, TIMESTAMP_FORMAT};
pub use store::{snapshot_rows, CsvStore, StoreError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
