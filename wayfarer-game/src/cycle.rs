//! Content cycles (base game and expansions).
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named content set scoping which locations, terrains and calendars are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Cycle {
    /// The base game. Persisted campaigns that predate cycles carry an empty id.
    #[default]
    #[serde(rename = "core", alias = "")]
    Core,
    #[serde(rename = "loa")]
    LegacyOfTheAncestors,
}

pub const ALL_CYCLES: [Cycle; 2] = [Cycle::Core, Cycle::LegacyOfTheAncestors];

impl Cycle {
    /// Stable id used in persisted campaign records.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::LegacyOfTheAncestors => "loa",
        }
    }

    /// Resolve a persisted cycle id. An empty id resolves to the base cycle.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim() {
            "" | "core" => Some(Self::Core),
            "loa" => Some(Self::LegacyOfTheAncestors),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_base(self) -> bool {
        matches!(self, Self::Core)
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
