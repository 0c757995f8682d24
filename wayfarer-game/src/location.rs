//! Location graph: named locations joined by terrain-typed paths.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::cycle::Cycle;
use crate::error::ContentError;
use crate::terrain::{ConnectionRestriction, PathTerrain};

/// A location from the master location table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    /// Cycles this location appears in. Empty means the base cycle only.
    #[serde(default)]
    pub cycles: Vec<Cycle>,
}

impl Location {
    #[must_use]
    pub fn is_in_cycle(&self, cycle: Cycle) -> bool {
        if self.cycles.is_empty() {
            cycle.is_base()
        } else {
            self.cycles.contains(&cycle)
        }
    }
}

/// Edge definition from a cycle's connection table.
///
/// `restriction` guards entering `to` from `from`; the reverse direction is
/// always unrestricted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
    pub terrain: PathTerrain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restriction: Option<ConnectionRestriction>,
}

/// One directed adjacency record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectedEdge {
    pub neighbor: String,
    pub terrain: PathTerrain,
    pub restriction: Option<ConnectionRestriction>,
}

/// Filter the master location list down to the locations of `cycle`.
#[must_use]
pub fn locations_for(locations: &[Location], cycle: Cycle) -> Vec<&Location> {
    locations.iter().filter(|loc| loc.is_in_cycle(cycle)).collect()
}

/// Immutable adjacency for a single cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationGraph {
    cycle: Cycle,
    locations: BTreeMap<String, Location>,
    adjacency: BTreeMap<String, Vec<DirectedEdge>>,
}

impl LocationGraph {
    /// Build the graph for `cycle` from the master location list and the
    /// cycle's connection table.
    ///
    /// Every location of the cycle is allocated first; the adjacency is then
    /// computed in one pass. A pair referenced by several connections keeps
    /// the records of the first definition.
    ///
    /// # Errors
    ///
    /// Returns a [`ContentError`] if a connection references a location outside
    /// the cycle, joins a location to itself, or uses a terrain or restriction
    /// that does not belong to the cycle.
    pub fn build(
        cycle: Cycle,
        locations: &[Location],
        connections: &[Connection],
    ) -> Result<Self, ContentError> {
        let mut members = BTreeMap::new();
        for loc in locations_for(locations, cycle) {
            if members.insert(loc.id.clone(), loc.clone()).is_some() {
                return Err(ContentError::DuplicateLocation {
                    location: loc.id.clone(),
                });
            }
        }

        let mut adjacency: BTreeMap<String, Vec<DirectedEdge>> = members
            .keys()
            .map(|id| (id.clone(), Vec::new()))
            .collect();
        let mut seen: HashSet<(String, String)> = HashSet::new();

        for conn in connections {
            validate_connection(cycle, &members, conn)?;

            let forward = (conn.from.clone(), conn.to.clone());
            if seen.contains(&forward) {
                if !repeat_agrees(&adjacency, conn) {
                    return Err(ContentError::ConflictingConnection {
                        cycle,
                        from: conn.from.clone(),
                        to: conn.to.clone(),
                    });
                }
                log::debug!(
                    "{cycle}: ignoring repeated connection {} -> {}",
                    conn.from,
                    conn.to
                );
                continue;
            }
            let reverse = (conn.to.clone(), conn.from.clone());

            push_edge(&mut adjacency, &conn.from, DirectedEdge {
                neighbor: conn.to.clone(),
                terrain: conn.terrain,
                restriction: conn.restriction,
            });
            push_edge(&mut adjacency, &conn.to, DirectedEdge {
                neighbor: conn.from.clone(),
                terrain: conn.terrain,
                restriction: None,
            });
            seen.insert(forward);
            seen.insert(reverse);
        }

        Ok(Self {
            cycle,
            locations: members,
            adjacency,
        })
    }

    #[must_use]
    pub const fn cycle(&self) -> Cycle {
        self.cycle
    }

    #[must_use]
    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.locations.contains_key(id)
    }

    /// Locations of this cycle, ordered by id.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    /// Directed adjacency of `id`. Unknown ids have no neighbors.
    #[must_use]
    pub fn neighbors(&self, id: &str) -> &[DirectedEdge] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The directed record for travelling from `from` into `to`.
    #[must_use]
    pub fn edge(&self, from: &str, to: &str) -> Option<&DirectedEdge> {
        self.neighbors(from).iter().find(|edge| edge.neighbor == to)
    }

    /// Number of undirected paths in the graph.
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }
}

fn validate_connection(
    cycle: Cycle,
    members: &BTreeMap<String, Location>,
    conn: &Connection,
) -> Result<(), ContentError> {
    for endpoint in [&conn.from, &conn.to] {
        if !members.contains_key(endpoint) {
            return Err(ContentError::UnknownEndpoint {
                cycle,
                location: endpoint.clone(),
            });
        }
    }
    if conn.from == conn.to {
        return Err(ContentError::SelfLoop {
            cycle,
            location: conn.from.clone(),
        });
    }
    if !conn.terrain.is_in_cycle(cycle) {
        return Err(ContentError::TerrainOutsideCycle {
            cycle,
            from: conn.from.clone(),
            to: conn.to.clone(),
            terrain: conn.terrain,
        });
    }
    if let Some(restriction) = conn.restriction
        && !restriction.is_in_cycle(cycle)
    {
        return Err(ContentError::RestrictionOutsideCycle {
            cycle,
            from: conn.from.clone(),
            to: conn.to.clone(),
            restriction,
        });
    }
    Ok(())
}

/// A repeated pair is tolerated only if it would produce the directed records
/// already in place.
fn repeat_agrees(adjacency: &BTreeMap<String, Vec<DirectedEdge>>, conn: &Connection) -> bool {
    let directed = |from: &str, to: &str| {
        adjacency
            .get(from)
            .and_then(|edges| edges.iter().find(|edge| edge.neighbor == to))
    };
    let forward = directed(&conn.from, &conn.to);
    let reverse = directed(&conn.to, &conn.from);
    forward.is_some_and(|edge| edge.terrain == conn.terrain && edge.restriction == conn.restriction)
        && reverse.is_some_and(|edge| edge.terrain == conn.terrain && edge.restriction.is_none())
}

fn push_edge(adjacency: &mut BTreeMap<String, Vec<DirectedEdge>>, from: &str, edge: DirectedEdge) {
    if let Some(edges) = adjacency.get_mut(from) {
        edges.push(edge);
    }
}
