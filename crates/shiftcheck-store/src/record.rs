//! Submission records and the in-memory history log
//!
//! One [`SubmissionRow`] per checklist cell per submission; a
//! [`HistoryLog`] is the ordered sequence of rows the durable store
//! holds. Column names and value encodings match the deployed CSV
//! format exactly, so re-encoding a loaded log is byte-identical.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use shiftcheck_core::TriState;

use crate::store::StoreError;

/// Timestamp format used in the 日時 column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column headers of the durable store, in order.
pub const CSV_HEADERS: [&str; 7] = [
    "日時",
    "担当者ID",
    "セクション",
    "項目",
    "号機",
    "状態",
    "コメント",
];

/// Format a timestamp for the 日時 column.
#[inline]
#[must_use]
pub fn format_timestamp(now: NaiveDateTime) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// Calendar-day key of a timestamp (`YYYY-MM-DD`), used for same-day
/// overwrite filtering.
#[inline]
#[must_use]
pub fn day_key(now: NaiveDateTime) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// One persisted checklist cell: a single row of the history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRow {
    /// Submission timestamp, `YYYY-MM-DD HH:MM:SS`
    #[serde(rename = "日時")]
    pub timestamp: String,
    /// Staff identifier entered at submit time
    #[serde(rename = "担当者ID")]
    pub staff_id: String,
    /// Section name
    #[serde(rename = "セクション")]
    pub section: String,
    /// Checklist item
    #[serde(rename = "項目")]
    pub item: String,
    /// Machine identifier
    #[serde(rename = "号機")]
    pub machine: String,
    /// Cell state, encoded `""`/`"〇"`/`"×"`
    #[serde(rename = "状態")]
    pub state: TriState,
    /// Per-section free-text comment
    #[serde(rename = "コメント")]
    pub comment: String,
}

impl SubmissionRow {
    /// Whether this row's timestamp falls on the given calendar day.
    ///
    /// Matches on the date prefix of the timestamp string, exactly how
    /// the log format defines the day boundary.
    #[inline]
    #[must_use]
    pub fn is_on_day(&self, day: &str) -> bool {
        self.timestamp.starts_with(day)
    }
}

/// Ordered sequence of submission rows.
///
/// Insertion order across days is preserved; within a day only the most
/// recent submission's rows remain after a same-day overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryLog {
    rows: Vec<SubmissionRow>,
}

impl HistoryLog {
    /// Create an empty log.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log from existing rows, preserving their order.
    #[inline]
    #[must_use]
    pub fn from_rows(rows: Vec<SubmissionRow>) -> Self {
        Self { rows }
    }

    /// All rows in order.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[SubmissionRow] {
        &self.rows
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the log holds no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drop every row whose timestamp falls on `day`.
    ///
    /// This is the destructive half of same-day overwrite: an older
    /// submission from the same day is superseded wholesale, never
    /// merged cell by cell.
    pub fn retain_other_days(&mut self, day: &str) {
        self.rows.retain(|row| !row.is_on_day(day));
    }

    /// Rows whose timestamp falls on `day`.
    pub fn rows_on_day<'a>(&'a self, day: &'a str) -> impl Iterator<Item = &'a SubmissionRow> {
        self.rows.iter().filter(move |row| row.is_on_day(day))
    }

    /// Append rows, preserving existing rows unchanged.
    pub fn append(&mut self, rows: impl IntoIterator<Item = SubmissionRow>) {
        self.rows.extend(rows);
    }

    /// Encode the log in the durable store's CSV format.
    ///
    /// The header row is always present, so the encoding of a loaded
    /// log is byte-identical to the file it was loaded from. This is
    /// also the export encoding handed to download/`export` paths.
    ///
    /// # Errors
    /// Returns [`StoreError::Csv`] if a row fails to encode.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, StoreError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(CSV_HEADERS)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| StoreError::Write(e.into_error()))
    }

    /// Decode a log from the durable store's CSV format.
    ///
    /// # Errors
    /// Returns [`StoreError::Csv`] on a malformed header or row.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes);
        let mut rows = Vec::new();
        for result in reader.deserialize() {
            rows.push(result?);
        }
        Ok(Self::from_rows(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(timestamp: &str, state: TriState) -> SubmissionRow {
        SubmissionRow {
            timestamp: timestamp.to_string(),
            staff_id: "S1".to_string(),
            section: "Bench".to_string(),
            item: "Pencil".to_string(),
            machine: "M1".to_string(),
            state,
            comment: String::new(),
        }
    }

    #[test]
    fn day_filtering_uses_date_prefix() {
        let r = row("2024-01-01 09:00:00", TriState::Ok);
        assert!(r.is_on_day("2024-01-01"));
        assert!(!r.is_on_day("2024-01-02"));
    }

    #[test]
    fn retain_other_days_drops_only_that_day() {
        let mut log = HistoryLog::from_rows(vec![
            row("2024-01-01 09:00:00", TriState::Ok),
            row("2024-01-02 09:00:00", TriState::Ng),
            row("2024-01-01 17:00:00", TriState::Blank),
        ]);
        log.retain_other_days("2024-01-01");
        assert_eq!(log.len(), 1);
        assert_eq!(log.rows()[0].timestamp, "2024-01-02 09:00:00");
    }

    #[test]
    fn csv_round_trip_preserves_rows() {
        let log = HistoryLog::from_rows(vec![
            row("2024-01-01 09:00:00", TriState::Ok),
            row("2024-01-01 09:00:00", TriState::Ng),
        ]);
        let bytes = log.to_csv_bytes().unwrap();
        let reloaded = HistoryLog::from_csv_bytes(&bytes).unwrap();
        assert_eq!(reloaded, log);
    }

    #[test]
    fn csv_header_row_is_always_written() {
        let bytes = HistoryLog::new().to_csv_bytes().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text.lines().next().unwrap(),
            "日時,担当者ID,セクション,項目,号機,状態,コメント"
        );
    }

    #[test]
    fn state_encodes_as_wire_symbols() {
        let log = HistoryLog::from_rows(vec![row("2024-01-01 09:00:00", TriState::Ng)]);
        let text = String::from_utf8(log.to_csv_bytes().unwrap()).unwrap();
        assert!(text.contains(",×,"));
    }

    #[test]
    fn unknown_state_value_loads_as_blank() {
        let bytes = "日時,担当者ID,セクション,項目,号機,状態,コメント\n\
                     2024-01-01 09:00:00,S1,Bench,Pencil,M1,maybe,\n"
            .as_bytes();
        let log = HistoryLog::from_csv_bytes(bytes).unwrap();
        assert_eq!(log.rows()[0].state, TriState::Blank);
    }

    #[test]
    fn comment_with_comma_survives_round_trip() {
        let mut r = row("2024-01-01 09:00:00", TriState::Ok);
        r.comment = "left guard loose, retighten".to_string();
        let log = HistoryLog::from_rows(vec![r]);
        let bytes = log.to_csv_bytes().unwrap();
        let reloaded = HistoryLog::from_csv_bytes(&bytes).unwrap();
        assert_eq!(reloaded.rows()[0].comment, "left guard loose, retighten");
    }

    #[test]
    fn timestamp_helpers_match_column_format() {
        let now = NaiveDateTime::parse_from_str("2024-01-01 09:05:00", TIMESTAMP_FORMAT).unwrap();
        assert_eq!(format_timestamp(now), "2024-01-01 09:05:00");
        assert_eq!(day_key(now), "2024-01-01");
    }
}
