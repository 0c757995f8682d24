//! Travel history: flat chronological log and its per-day view.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::terrain::PathTerrain;

/// One leg of travel as persisted in the campaign history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelStep {
    pub day: u32,
    pub location: String,
    pub path_terrain: PathTerrain,
    pub camped: bool,
}

/// Travel taken on a single day. Derived from the history, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TravelDay {
    pub day: u32,
    pub starting_location: String,
    pub steps: Vec<TravelStep>,
}

/// Where the party ended a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub final_location: String,
    pub camped: bool,
    /// Terrain of the last path walked, `None` when the party stayed put.
    pub last_path: Option<PathTerrain>,
}

impl DaySummary {
    #[must_use]
    pub const fn traveled(&self) -> bool {
        self.last_path.is_some()
    }
}

impl TravelDay {
    /// Resolve where the day ended and whether the party made camp.
    /// A day without steps ends where it started, not camped.
    #[must_use]
    pub fn summary(&self) -> DaySummary {
        self.steps.last().map_or_else(
            || DaySummary {
                final_location: self.starting_location.clone(),
                camped: false,
                last_path: None,
            },
            |step| DaySummary {
                final_location: step.location.clone(),
                camped: step.camped,
                last_path: Some(step.path_terrain),
            },
        )
    }
}

/// Starting location of every day from 1 through `through_day`, computed in
/// one pass over the history.
#[must_use]
pub fn starting_locations(
    history: &[TravelStep],
    initial_location: &str,
    through_day: u32,
) -> BTreeMap<u32, String> {
    let last_day = history
        .last()
        .map_or(through_day, |step| step.day.max(through_day));
    let mut ends_by_day: BTreeMap<u32, &str> = BTreeMap::new();
    for step in history {
        ends_by_day.insert(step.day, step.location.as_str());
    }

    let mut starts = BTreeMap::new();
    let mut current = initial_location;
    for day in 1..=last_day {
        starts.insert(day, current.to_string());
        if let Some(&end) = ends_by_day.get(&day) {
            current = end;
        }
    }
    starts
}

/// Group the flat history by day, producing one entry per day from 1 through
/// `through_day` (or the last day in the history, if later). Steps keep their
/// original order; days without travel get an empty entry.
pub fn group_by_day<F>(history: &[TravelStep], through_day: u32, mut start_of: F) -> Vec<TravelDay>
where
    F: FnMut(u32) -> String,
{
    let last_day = history
        .last()
        .map_or(through_day, |step| step.day.max(through_day));
    let mut days: Vec<TravelDay> = (1..=last_day)
        .map(|day| TravelDay {
            day,
            starting_location: start_of(day),
            steps: Vec::new(),
        })
        .collect();

    for step in history {
        let Some(idx) = step.day.checked_sub(1) else {
            log::warn!("skipping history step recorded on day 0 at {}", step.location);
            continue;
        };
        if let Some(entry) = days.get_mut(idx as usize) {
            entry.steps.push(step.clone());
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(day: u32, location: &str, camped: bool) -> TravelStep {
        TravelStep {
            day,
            location: location.to_string(),
            path_terrain: PathTerrain::Woods,
            camped,
        }
    }

    fn sample_history() -> Vec<TravelStep> {
        vec![
            step(1, "boulder_field", false),
            step(1, "meadow", true),
            step(3, "kobos_market", false),
        ]
    }

    #[test]
    fn starting_locations_carry_previous_day_end() {
        let starts = starting_locations(&sample_history(), "lone_tree_station", 4);
        assert_eq!(starts[&1], "lone_tree_station");
        assert_eq!(starts[&2], "meadow");
        assert_eq!(starts[&3], "meadow");
        assert_eq!(starts[&4], "kobos_market");
    }

    #[test]
    fn grouping_keeps_order_and_empty_days() {
        let history = sample_history();
        let starts = starting_locations(&history, "lone_tree_station", 4);
        let days = group_by_day(&history, 4, |day| starts[&day].clone());
        assert_eq!(days.len(), 4);
        assert_eq!(days[0].steps.len(), 2);
        assert_eq!(days[0].steps[0].location, "boulder_field");
        assert!(days[1].steps.is_empty());

        let first = days[0].summary();
        assert_eq!(first.final_location, "meadow");
        assert!(first.camped);
        assert!(first.traveled());

        let idle = days[1].summary();
        assert_eq!(idle.final_location, "meadow");
        assert!(!idle.camped);
        assert!(!idle.traveled());

        let last = days[3].summary();
        assert_eq!(last.final_location, "kobos_market");
        assert!(!last.camped);
    }

    #[test]
    fn empty_history_yields_idle_days() {
        let days = group_by_day(&[], 2, |_| "lone_tree_station".to_string());
        assert_eq!(days.len(), 2);
        assert!(days.iter().all(|day| day.summary().final_location == "lone_tree_station"));
    }

    #[test]
    fn step_serializes_with_camel_case_terrain() {
        let json = serde_json::to_value(step(5, "boulder_field", false)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "day": 5,
                "location": "boulder_field",
                "pathTerrain": "woods",
                "camped": false
            })
        );
    }
}
