//! shiftcheck Core - checklist model and session state
//!
//! The in-memory half of the daily pre-work equipment checklist:
//! - Tri-state cell values with the blank → OK → NG toggle cycle
//! - The static checklist grid (sections, items, machines) and its
//!   deterministic cell enumeration
//! - Per-user session state holding toggled cells and section comments
//! - Site configuration (history path, shared secret, grid layout)
//!
//! # Example
//!
//! ```rust
//! use shiftcheck_core::{CellKey, GridConfig, Session, TriState};
//!
//! let grid = GridConfig::default();
//! let mut session = Session::new();
//!
//! let key = CellKey::new("作業台", "シャーペン", "1号機");
//! session.toggle(&key);
//! session.toggle(&key);
//! assert_eq!(session.state(&key), TriState::Ng);
//! assert_eq!(grid.all_triples().count(), grid.total_cells());
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod grid;
pub mod session;
pub mod state;

// Re-exports for convenience
pub use config::{AppConfig, ConfigError, DEFAULT_HISTORY_FILE, DEFAULT_PASSWORD};
pub use grid::{CellKey, GridConfig, GridError, SectionSpec};
pub use session::Session;
pub use state::TriState;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the checklist core
    pub use crate::{AppConfig, CellKey, GridConfig, Session, TriState};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
