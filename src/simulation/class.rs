use std::fmt;

use colored::Color;
use serde::{Deserialize, Serialize};

/// Stable identifier of a social class.
///
/// Labels come from outside the engine (the baseline table or a name generator) and are treated as
/// opaque keys. Tier order lives in the [`Snapshot`](crate::simulation::Snapshot), never in the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(String);

impl ClassId {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClassId {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for ClassId {
    fn from(label: String) -> Self {
        Self(label)
    }
}

/// Log color for a tier position, highest tier first.
pub fn tier_color(tier: usize) -> Color {
    match tier {
        0 => Color::BrightYellow,
        1 => Color::BrightBlue,
        2 => Color::BrightGreen,
        3 => Color::BrightMagenta,
        4 => Color::BrightRed,
        _ => Color::White,
    }
}
