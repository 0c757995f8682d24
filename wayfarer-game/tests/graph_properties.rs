use std::collections::HashSet;

use wayfarer_game::{
    ALL_CYCLES, ConnectionRestriction, Cycle, PathTerrain, content, locations_for,
};

#[test]
fn shipped_graphs_are_symmetric() {
    let content = content();
    for cycle in ALL_CYCLES {
        let graph = content.graph(cycle);
        for location in graph.locations() {
            for edge in graph.neighbors(&location.id) {
                let back = graph
                    .edge(&edge.neighbor, &location.id)
                    .unwrap_or_else(|| panic!("{cycle}: {} -> {} has no return", location.id, edge.neighbor));
                assert_eq!(back.terrain, edge.terrain, "{cycle}: terrain mismatch");
                assert!(
                    back.restriction.is_none() || edge.restriction.is_none(),
                    "{cycle}: {} <-> {} restricted both ways",
                    location.id,
                    edge.neighbor
                );
            }
        }
    }
}

#[test]
fn shipped_graphs_have_no_duplicate_neighbors() {
    let content = content();
    for cycle in ALL_CYCLES {
        let graph = content.graph(cycle);
        for location in graph.locations() {
            let mut seen = HashSet::new();
            for edge in graph.neighbors(&location.id) {
                assert!(
                    seen.insert(edge.neighbor.as_str()),
                    "{cycle}: {} lists {} twice",
                    location.id,
                    edge.neighbor
                );
            }
        }
    }
}

#[test]
fn every_location_is_reachable_from_the_station() {
    let content = content();
    for cycle in ALL_CYCLES {
        let graph = content.graph(cycle);
        let mut seen = HashSet::from(["lone_tree_station".to_string()]);
        let mut frontier = vec!["lone_tree_station".to_string()];
        while let Some(current) = frontier.pop() {
            for edge in graph.neighbors(&current) {
                if seen.insert(edge.neighbor.clone()) {
                    frontier.push(edge.neighbor.clone());
                }
            }
        }
        assert_eq!(seen.len(), graph.locations().count(), "{cycle} graph is split");
    }
}

#[test]
fn graph_membership_follows_location_tags() {
    let content = content();
    for cycle in ALL_CYCLES {
        let tagged: HashSet<_> = locations_for(content.locations(), cycle)
            .into_iter()
            .map(|loc| loc.id.as_str())
            .collect();
        let graphed: HashSet<_> = content
            .graph(cycle)
            .locations()
            .map(|loc| loc.id.as_str())
            .collect();
        assert_eq!(tagged, graphed, "{cycle}");
    }
    // Untagged locations stay in the base game.
    assert!(content.graph(Cycle::Core).contains("sunken_outpost"));
    assert!(!content.graph(Cycle::LegacyOfTheAncestors).contains("sunken_outpost"));
}

#[test]
fn terrains_and_restrictions_respect_cycles() {
    let content = content();
    for cycle in ALL_CYCLES {
        let graph = content.graph(cycle);
        for location in graph.locations() {
            for edge in graph.neighbors(&location.id) {
                assert!(edge.terrain.is_in_cycle(cycle));
                if let Some(restriction) = edge.restriction {
                    assert!(restriction.is_in_cycle(cycle));
                }
            }
        }
    }
}

#[test]
fn expansion_vault_is_locked_from_the_grove_only() {
    let graph = content().graph(Cycle::LegacyOfTheAncestors);
    let inbound = graph.edge("ancestors_grove", "the_ancestral_vault").unwrap();
    assert_eq!(inbound.terrain, PathTerrain::AncientRuins);
    assert_eq!(inbound.restriction, Some(ConnectionRestriction::LockedPassage));
    let outbound = graph.edge("the_ancestral_vault", "ancestors_grove").unwrap();
    assert_eq!(outbound.restriction, None);
}
