//! Checklist grid model
//!
//! Defines the static layout of the checklist — ordered sections, the
//! ordered items within each section, and the ordered machine list —
//! plus the deterministic enumeration of every (section, item, machine)
//! cell. Rendering and snapshot generation both walk the same
//! enumeration so row counts and ordering always agree.

use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Composite key of one checklist cell.
///
/// Used directly as a map key; identifiers are never concatenated into
/// a single string, so section/item/machine names cannot collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellKey {
    /// Section the cell belongs to
    pub section: String,
    /// Checklist item within the section
    pub item: String,
    /// Machine identifier
    pub machine: String,
}

impl CellKey {
    /// Create a new cell key.
    #[inline]
    #[must_use]
    pub fn new(
        section: impl Into<String>,
        item: impl Into<String>,
        machine: impl Into<String>,
    ) -> Self {
        Self {
            section: section.into(),
            item: item.into(),
            machine: machine.into(),
        }
    }
}

impl Display for CellKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.section, self.item, self.machine)
    }
}

/// One checklist section: a name and its ordered items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSpec {
    /// Section name
    pub name: String,
    /// Ordered checklist items
    pub items: Vec<String>,
}

impl SectionSpec {
    /// Create a new section spec.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

/// Static checklist layout: sections, items, and machines.
///
/// The default grid matches the original deployment; a site can
/// override it via [`GridConfig::from_toml_str`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Ordered sections
    pub sections: Vec<SectionSpec>,
    /// Ordered machine identifiers
    pub machines: Vec<String>,
    /// Item name that carries the per-section free-text comment
    pub comment_item: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        let machines = (1..=10).map(|i| format!("{i}号機")).collect();
        Self {
            sections: vec![
                SectionSpec::new(
                    "作業台",
                    vec![
                        "シャーペン".to_string(),
                        "消しゴム".to_string(),
                        "不要物".to_string(),
                    ],
                ),
                SectionSpec::new(
                    "成形機",
                    vec![
                        "真鍮棒".to_string(),
                        "EJロッド".to_string(),
                        "フライパン".to_string(),
                        "不要物".to_string(),
                    ],
                ),
            ],
            machines,
            comment_item: "不要物".to_string(),
        }
    }
}

impl GridConfig {
    /// Create a validated grid.
    ///
    /// # Errors
    /// Returns [`GridError`] if the layout is empty or contains
    /// duplicate names.
    #[inline]
    pub fn new(
        sections: Vec<SectionSpec>,
        machines: Vec<String>,
        comment_item: impl Into<String>,
    ) -> Result<Self, GridError> {
        let grid = Self {
            sections,
            machines,
            comment_item: comment_item.into(),
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Parse and validate a grid from its TOML representation.
    ///
    /// # Errors
    /// Returns [`GridError`] on malformed TOML or an invalid layout.
    pub fn from_toml_str(input: &str) -> Result<Self, GridError> {
        let grid: Self = toml::from_str(input)?;
        grid.validate()?;
        Ok(grid)
    }

    /// Check structural invariants of the layout.
    ///
    /// # Errors
    /// Returns the first violation found: no sections, no machines, an
    /// empty section, or a duplicate section/item/machine name.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.sections.is_empty() {
            return Err(GridError::NoSections);
        }
        if self.machines.is_empty() {
            return Err(GridError::NoMachines);
        }
        let mut section_names = HashSet::new();
        for section in &self.sections {
            if !section_names.insert(section.name.as_str()) {
                return Err(GridError::DuplicateSection(section.name.clone()));
            }
            if section.items.is_empty() {
                return Err(GridError::EmptySection(section.name.clone()));
            }
            let mut item_names = HashSet::new();
            for item in &section.items {
                if !item_names.insert(item.as_str()) {
                    return Err(GridError::DuplicateItem {
                        section: section.name.clone(),
                        item: item.clone(),
                    });
                }
            }
        }
        let mut machine_names = HashSet::new();
        for machine in &self.machines {
            if !machine_names.insert(machine.as_str()) {
                return Err(GridError::DuplicateMachine(machine.clone()));
            }
        }
        Ok(())
    }

    /// Total number of cells: the (section, item) pairs times machines.
    #[inline]
    #[must_use]
    pub fn total_cells(&self) -> usize {
        let items: usize = self.sections.iter().map(|s| s.items.len()).sum();
        items * self.machines.len()
    }

    /// Enumerate every cell in stable order: section-major, then item,
    /// then machine.
    ///
    /// This order is shared by the rendering layer and by snapshot-row
    /// generation.
    pub fn all_triples(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.sections.iter().flat_map(move |section| {
            section.items.iter().flat_map(move |item| {
                self.machines
                    .iter()
                    .map(move |machine| CellKey::new(&section.name, item, machine))
            })
        })
    }

    /// Sections that contain the designated comment-bearing item.
    ///
    /// Comments attach at section granularity, one per such section.
    pub fn comment_sections(&self) -> impl Iterator<Item = &str> + '_ {
        self.sections
            .iter()
            .filter(|s| s.items.iter().any(|item| *item == self.comment_item))
            .map(|s| s.name.as_str())
    }
}

/// Errors raised by grid configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Grid declares no sections
    #[error("grid has no sections")]
    NoSections,

    /// Grid declares no machines
    #[error("grid has no machines")]
    NoMachines,

    /// A section declares no items
    #[error("section {0:?} has no items")]
    EmptySection(String),

    /// Two sections share a name
    #[error("duplicate section name: {0:?}")]
    DuplicateSection(String),

    /// Two items within one section share a name
    #[error("duplicate item {item:?} in section {section:?}")]
    DuplicateItem {
        /// Section containing the duplicate
        section: String,
        /// Duplicated item name
        item: String,
    },

    /// Two machines share an identifier
    #[error("duplicate machine identifier: {0:?}")]
    DuplicateMachine(String),

    /// Grid TOML could not be parsed
    #[error("grid config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
