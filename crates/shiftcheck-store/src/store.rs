//! Durable CSV store with same-day overwrite
//!
//! [`CsvStore`] owns the path of the history log and implements the
//! persistence contract:
//! - `load` never fails the caller: absent, empty, or unreadable files
//!   come back as an empty log
//! - `submit` validates the staff id, replaces the current day's rows
//!   with a fresh full-grid snapshot, and persists
//! - `clear` deletes the log; a missing file is success
//!
//! Writes go through a temp file in the same directory followed by a
//! rename, so a crashed write never truncates the existing log.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use shiftcheck_core::{GridConfig, Session};

use crate::record::{day_key, format_timestamp, HistoryLog, SubmissionRow};

/// Errors surfaced by the persistence layer.
///
/// Read-path failures are absorbed into an empty log and never appear
/// here; validation and write-path failures are always surfaced.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Submission attempted without a staff id
    #[error("staff id must not be empty")]
    EmptyStaffId,

    /// History log could not be encoded or decoded
    #[error("history log encoding error: {0}")]
    Csv(#[from] csv::Error),

    /// History log could not be written
    #[error("failed to write history log: {0}")]
    Write(std::io::Error),

    /// History log could not be deleted
    #[error("failed to delete history log: {0}")]
    Delete(std::io::Error),
}

/// File-backed history log store.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    /// Create a store over the given log path. The file is not touched
    /// until the first submit.
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the durable log file.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the history log.
    ///
    /// Never fails: a missing file is an empty log, and an unreadable
    /// or malformed file is recovered as an empty log with a warning.
    #[must_use]
    pub fn load(&self) -> HistoryLog {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return HistoryLog::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "history log unreadable, starting empty");
                return HistoryLog::new();
            }
        };
        match HistoryLog::from_csv_bytes(&bytes) {
            Ok(log) => log,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "history log malformed, starting empty");
                HistoryLog::new()
            }
        }
    }

    /// Submit the session's snapshot, overwriting today's rows.
    ///
    /// Replaces every row of `log` whose timestamp falls on `now`'s
    /// calendar day with one freshly generated row per grid cell, then
    /// persists the updated log. Rows from other days are untouched.
    ///
    /// On a write failure the in-memory `log` already reflects the
    /// attempted write; a retry re-attempts persisting the same
    /// snapshot.
    ///
    /// # Errors
    /// - [`StoreError::EmptyStaffId`] if `staff_id` is empty or
    ///   whitespace; `log` is not mutated.
    /// - [`StoreError::Write`] / [`StoreError::Csv`] if persisting
    ///   fails.
    pub fn submit(
        &self,
        log: &mut HistoryLog,
        grid: &GridConfig,
        session: &Session,
        staff_id: &str,
        now: NaiveDateTime,
    ) -> Result<(), StoreError> {
        let staff_id = staff_id.trim();
        if staff_id.is_empty() {
            return Err(StoreError::EmptyStaffId);
        }

        let today = day_key(now);
        log.retain_other_days(&today);
        log.append(snapshot_rows(grid, session, staff_id, now));
        tracing::info!(
            day = %today,
            staff_id,
            rows = grid.total_cells(),
            "recorded submission"
        );

        self.persist(log)
    }

    /// Write the log to disk via temp-then-rename.
    ///
    /// # Errors
    /// Returns [`StoreError::Csv`] on encoding failure or
    /// [`StoreError::Write`] on I/O failure.
    pub fn persist(&self, log: &HistoryLog) -> Result<(), StoreError> {
        let bytes = log.to_csv_bytes()?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(StoreError::Write)?;
        tmp.write_all(&bytes).map_err(StoreError::Write)?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::Write(e.error))?;
        Ok(())
    }

    /// Delete the durable log. A missing file is success.
    ///
    /// # Errors
    /// Returns [`StoreError::Delete`] only on a real filesystem
    /// failure (e.g. permissions).
    pub fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "history log deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Delete(e)),
        }
    }
}

/// Materialize one submission row per grid cell.
///
/// Walks [`GridConfig::all_triples`] in its stable order; each row takes
/// its state from the session (blank if never touched) and its comment
/// from the session's comment for the row's section (empty if unset).
#[must_use]
pub fn snapshot_rows(
    grid: &GridConfig,
    session: &Session,
    staff_id: &str,
    now: NaiveDateTime,
) -> Vec<SubmissionRow> {
    let timestamp = format_timestamp(now);
    grid.all_triples()
        .map(|key| {
            let state = session.state(&key);
            let comment = session.comment(&key.section).to_string();
            SubmissionRow {
                timestamp: timestamp.clone(),
                staff_id: staff_id.to_string(),
                section: key.section,
                item: key.item,
                machine: key.machine,
                state,
                comment,
            }
        })
        .collect()
}
