//! Tri-state cell values and the toggle cycle
//!
//! Provides [`TriState`], the value of a single checklist cell, and its
//! three-step toggle cycle: blank → OK → NG → blank.

use std::fmt::{self, Display, Formatter};

/// State of one checklist cell.
///
/// Exactly three states exist; there is no error state. Cells start
/// blank and advance through the cycle one step per toggle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TriState {
    /// Not yet inspected
    #[default]
    Blank,
    /// Inspected, no issue found
    Ok,
    /// Inspected, issue found
    Ng,
}

impl TriState {
    /// Wire encoding for [`TriState::Ok`] in the history log.
    pub const WIRE_OK: &'static str = "〇";
    /// Wire encoding for [`TriState::Ng`] in the history log.
    pub const WIRE_NG: &'static str = "×";

    /// Next state in the toggle cycle: blank → OK → NG → blank.
    ///
    /// Pure and total; applying it three times returns the input.
    #[inline]
    #[must_use]
    pub const fn advance(self) -> Self {
        match self {
            Self::Blank => Self::Ok,
            Self::Ok => Self::Ng,
            Self::Ng => Self::Blank,
        }
    }

    /// Wire encoding used by the history log (`""`, `"〇"`, `"×"`).
    #[inline]
    #[must_use]
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Blank => "",
            Self::Ok => Self::WIRE_OK,
            Self::Ng => Self::WIRE_NG,
        }
    }

    /// Decode a wire value.
    ///
    /// Anything outside the three known encodings decodes to
    /// [`TriState::Blank`] rather than failing.
    #[inline]
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value {
            Self::WIRE_OK => Self::Ok,
            Self::WIRE_NG => Self::Ng,
            _ => Self::Blank,
        }
    }

    /// Whether this cell has been marked at all.
    #[inline]
    #[must_use]
    pub const fn is_blank(self) -> bool {
        matches!(self, Self::Blank)
    }
}

impl Display for TriState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

// Serialized as the wire string so CSV and TOML carry the exact
// encodings the history log format defines.
impl serde::Serialize for TriState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> serde::Deserialize<'de> for TriState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct TriStateVisitor;

        impl serde::de::Visitor<'_> for TriStateVisitor {
            type Value = TriState;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                formatter.write_str("a tri-state wire value (\"\", \"〇\", or \"×\")")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(TriState::from_wire(value))
            }
        }

        deserializer.deserialize_str(TriStateVisitor)
    }
}
