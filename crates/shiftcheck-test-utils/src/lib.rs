//! Testing utilities for the shiftcheck workspace
//!
//! Shared fixtures: a small English-named grid, session builders, and
//! temp-dir-backed stores.

#![allow(missing_docs)]

use chrono::NaiveDateTime;
use shiftcheck_core::{CellKey, GridConfig, SectionSpec, Session, TriState};
use shiftcheck_store::{CsvStore, TIMESTAMP_FORMAT};

/// Two-section fixture grid: Bench (3 items) and Molder (4 items) over
/// machines M1..M10, 70 cells total. "Debris" carries the section
/// comment in both sections.
#[must_use]
pub fn fixture_grid() -> GridConfig {
    GridConfig::new(
        vec![
            SectionSpec::new(
                "Bench",
                vec!["Pencil".into(), "Eraser".into(), "Debris".into()],
            ),
            SectionSpec::new(
                "Molder",
                vec!["Rod".into(), "EJ".into(), "Pan".into(), "Debris".into()],
            ),
        ],
        (1..=10).map(|i| format!("M{i}")).collect(),
        "Debris",
    )
    .expect("fixture grid is valid")
}

/// Session with explicit cell values set.
#[must_use]
pub fn session_with(cells: &[(&str, &str, &str, TriState)]) -> Session {
    let mut session = Session::new();
    for (section, item, machine, state) in cells {
        session.set(CellKey::new(*section, *item, *machine), *state);
    }
    session
}

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp.
///
/// # Panics
/// Panics on malformed input; fixtures use literals.
#[must_use]
pub fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).expect("valid fixture timestamp")
}

/// Store backed by a fresh temp directory. Keep the `TempDir` alive for
/// the duration of the test.
///
/// # Panics
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn temp_store() -> (tempfile::TempDir, CsvStore) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = CsvStore::new(dir.path().join("checklist_history.csv"));
    (dir, store)
}
