//! Terrain and connection restriction registries.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cycle::Cycle;

const EVERY_CYCLE: &[Cycle] = &[Cycle::Core, Cycle::LegacyOfTheAncestors];
const LOA_ONLY: &[Cycle] = &[Cycle::LegacyOfTheAncestors];

/// Type of path joining two locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathTerrain {
    Woods,
    MountainPass,
    OldGrowth,
    Lakeshore,
    Grassland,
    Ravine,
    Swamp,
    River,
    AncientRuins,
    FloodedRuins,
    DeepRoots,
    FungalForest,
    CaveSystem,
    None,
}

/// Static registry record for a terrain variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainInfo {
    pub terrain: PathTerrain,
    pub id: &'static str,
    pub cycles: &'static [Cycle],
}

pub static TERRAINS: [TerrainInfo; 14] = [
    TerrainInfo { terrain: PathTerrain::Woods, id: "woods", cycles: EVERY_CYCLE },
    TerrainInfo { terrain: PathTerrain::MountainPass, id: "mountain_pass", cycles: EVERY_CYCLE },
    TerrainInfo { terrain: PathTerrain::OldGrowth, id: "old_growth", cycles: EVERY_CYCLE },
    TerrainInfo { terrain: PathTerrain::Lakeshore, id: "lakeshore", cycles: EVERY_CYCLE },
    TerrainInfo { terrain: PathTerrain::Grassland, id: "grassland", cycles: EVERY_CYCLE },
    TerrainInfo { terrain: PathTerrain::Ravine, id: "ravine", cycles: EVERY_CYCLE },
    TerrainInfo { terrain: PathTerrain::Swamp, id: "swamp", cycles: EVERY_CYCLE },
    TerrainInfo { terrain: PathTerrain::River, id: "river", cycles: EVERY_CYCLE },
    TerrainInfo { terrain: PathTerrain::AncientRuins, id: "ancient_ruins", cycles: LOA_ONLY },
    TerrainInfo { terrain: PathTerrain::FloodedRuins, id: "flooded_ruins", cycles: LOA_ONLY },
    TerrainInfo { terrain: PathTerrain::DeepRoots, id: "deep_roots", cycles: LOA_ONLY },
    TerrainInfo { terrain: PathTerrain::FungalForest, id: "fungal_forest", cycles: LOA_ONLY },
    TerrainInfo { terrain: PathTerrain::CaveSystem, id: "cave_system", cycles: LOA_ONLY },
    TerrainInfo { terrain: PathTerrain::None, id: "none", cycles: EVERY_CYCLE },
];

impl PathTerrain {
    /// Registry record for this terrain.
    #[must_use]
    pub fn info(self) -> &'static TerrainInfo {
        &TERRAINS[self as usize]
    }

    #[must_use]
    pub fn id(self) -> &'static str {
        self.info().id
    }

    #[must_use]
    pub fn is_in_cycle(self, cycle: Cycle) -> bool {
        self.info().cycles.contains(&cycle)
    }

    /// Every terrain valid in `cycle`, in registry order.
    pub fn for_cycle(cycle: Cycle) -> impl Iterator<Item = Self> {
        TERRAINS
            .iter()
            .filter(move |info| info.cycles.contains(&cycle))
            .map(|info| info.terrain)
    }
}

/// One-directional precondition on entering a location along a specific edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionRestriction {
    FloodedPassage,
    LockedPassage,
    OvergrownPassage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestrictionInfo {
    pub restriction: ConnectionRestriction,
    pub id: &'static str,
    pub cycles: &'static [Cycle],
}

pub static RESTRICTIONS: [RestrictionInfo; 3] = [
    RestrictionInfo {
        restriction: ConnectionRestriction::FloodedPassage,
        id: "flooded_passage",
        cycles: LOA_ONLY,
    },
    RestrictionInfo {
        restriction: ConnectionRestriction::LockedPassage,
        id: "locked_passage",
        cycles: LOA_ONLY,
    },
    RestrictionInfo {
        restriction: ConnectionRestriction::OvergrownPassage,
        id: "overgrown_passage",
        cycles: LOA_ONLY,
    },
];

impl ConnectionRestriction {
    #[must_use]
    pub fn info(self) -> &'static RestrictionInfo {
        &RESTRICTIONS[self as usize]
    }

    #[must_use]
    pub fn id(self) -> &'static str {
        self.info().id
    }

    #[must_use]
    pub fn is_in_cycle(self, cycle: Cycle) -> bool {
        self.info().cycles.contains(&cycle)
    }
}

/// Restrictions the party has cleared for a single travel action.
pub type RestrictionSet = SmallVec<[ConnectionRestriction; 3]>;
