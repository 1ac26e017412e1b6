//! Per-user session state
//!
//! A [`Session`] is the explicit context object for one user's visit:
//! the tri-state value of every touched cell plus the free-text comment
//! per section. It is created at session start, passed into toggle and
//! submit operations, and discarded at session end — never ambient
//! global state.

use indexmap::IndexMap;

use crate::grid::CellKey;
use crate::state::TriState;

/// In-memory state of one user session.
///
/// Cells are created implicitly: a key that was never toggled reads as
/// [`TriState::Blank`]. Iteration order over touched cells follows
/// insertion order, which keeps rendering deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    cells: IndexMap<CellKey, TriState>,
    comments: IndexMap<String, String>,
}

impl Session {
    /// Create an empty session.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a cell; blank if never touched.
    #[inline]
    #[must_use]
    pub fn state(&self, key: &CellKey) -> TriState {
        self.cells.get(key).copied().unwrap_or_default()
    }

    /// Advance a cell one step through the toggle cycle and store the
    /// result. Returns the new value.
    pub fn toggle(&mut self, key: &CellKey) -> TriState {
        let next = self.state(key).advance();
        self.cells.insert(key.clone(), next);
        next
    }

    /// Set a cell to an explicit value.
    #[inline]
    pub fn set(&mut self, key: CellKey, state: TriState) {
        self.cells.insert(key, state);
    }

    /// Overwrite the comment for a section.
    #[inline]
    pub fn set_comment(&mut self, section: impl Into<String>, text: impl Into<String>) {
        self.comments.insert(section.into(), text.into());
    }

    /// Comment for a section; empty if never set.
    #[inline]
    #[must_use]
    pub fn comment(&self, section: &str) -> &str {
        self.comments.get(section).map_or("", String::as_str)
    }

    /// Cells that have been touched, in insertion order.
    pub fn touched_cells(&self) -> impl Iterator<Item = (&CellKey, TriState)> + '_ {
        self.cells.iter().map(|(key, state)| (key, *state))
    }

    /// Number of cells that currently read non-blank.
    #[must_use]
    pub fn marked_count(&self) -> usize {
        self.cells.values().filter(|s| !s.is_blank()).count()
    }

    /// Discard all cell values and comments.
    pub fn reset(&mut self) {
        self.cells.clear();
        self.comments.clear();
    }
}
