//! Campaign record and the mutations the engine performs on it.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calendar::{MoonIcon, WeatherBand};
use crate::content::Content;
use crate::cycle::Cycle;
use crate::error::TransitionError;
use crate::history::{DaySummary, TravelDay, TravelStep, group_by_day, starting_locations};
use crate::location::DirectedEdge;
use crate::terrain::{ConnectionRestriction, PathTerrain};

/// Persisted campaign progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub day: u32,
    #[serde(default)]
    pub cycle_id: Cycle,
    /// Where the campaign began; the start of day 1.
    #[serde(default = "default_starting_location")]
    pub starting_location: String,
    pub current_location: String,
    /// Path the party last walked today. `None` once they have arrived for the day.
    #[serde(default)]
    pub current_path_terrain: Option<PathTerrain>,
    #[serde(default)]
    pub history: Vec<TravelStep>,
    /// Notes the players added to calendar days.
    #[serde(default)]
    pub calendar: BTreeMap<u32, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_calendar: Option<bool>,
}

fn default_starting_location() -> String {
    crate::constants::DEFAULT_STARTING_LOCATION.to_string()
}

impl Campaign {
    /// Start a campaign on day 1 at `starting_location`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::UnknownLocation`] if the location is not part
    /// of `cycle`.
    pub fn new(
        content: &Content,
        cycle: Cycle,
        starting_location: &str,
    ) -> Result<Self, TransitionError> {
        if !content.graph(cycle).contains(starting_location) {
            return Err(TransitionError::UnknownLocation {
                cycle,
                location: starting_location.to_string(),
            });
        }
        Ok(Self {
            day: 1,
            cycle_id: cycle,
            starting_location: starting_location.to_string(),
            current_location: starting_location.to_string(),
            current_path_terrain: None,
            history: Vec::new(),
            calendar: BTreeMap::new(),
            extended_calendar: None,
        })
    }

    #[must_use]
    pub fn is_extended(&self) -> bool {
        self.extended_calendar.unwrap_or(false)
    }

    /// The last day the campaign may reach, or `None` with the extended calendar.
    #[must_use]
    pub fn last_day(&self, content: &Content) -> Option<u32> {
        if self.is_extended() {
            None
        } else {
            Some(content.calendar(self.cycle_id).ceiling())
        }
    }

    /// Whether the party already made camp today.
    #[must_use]
    pub fn camped_today(&self) -> bool {
        self.history
            .last()
            .is_some_and(|step| step.day == self.day && step.camped)
    }

    /// Paths leading out of the current location.
    #[must_use]
    pub fn exits<'c>(&self, content: &'c Content) -> &'c [DirectedEdge] {
        content
            .graph(self.cycle_id)
            .neighbors(&self.current_location)
    }

    /// Travel from the current location to `destination`, optionally making
    /// camp on arrival. `cleared` lists the restrictions the party can pass.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] if the party already camped today, no path
    /// leads to `destination`, or the path into it carries a restriction not in
    /// `cleared`. The campaign is unchanged on error.
    pub fn travel(
        &mut self,
        content: &Content,
        destination: &str,
        camp: bool,
        cleared: &[ConnectionRestriction],
    ) -> Result<TravelStep, TransitionError> {
        if self.camped_today() {
            return Err(TransitionError::AlreadyCamped { day: self.day });
        }
        let graph = content.graph(self.cycle_id);
        if !graph.contains(destination) {
            return Err(TransitionError::UnknownLocation {
                cycle: self.cycle_id,
                location: destination.to_string(),
            });
        }
        let edge = graph.edge(&self.current_location, destination).ok_or_else(|| {
            TransitionError::NoConnection {
                from: self.current_location.clone(),
                to: destination.to_string(),
            }
        })?;
        if let Some(restriction) = edge.restriction
            && !cleared.contains(&restriction)
        {
            return Err(TransitionError::RestrictedPassage {
                to: destination.to_string(),
                restriction,
            });
        }

        log::debug!(
            "day {}: {} -> {} via {}{}",
            self.day,
            self.current_location,
            destination,
            edge.terrain.id(),
            if camp { ", making camp" } else { "" }
        );
        self.current_location = destination.to_string();
        self.current_path_terrain = Some(edge.terrain);
        let step = TravelStep {
            day: self.day,
            location: destination.to_string(),
            path_terrain: edge.terrain,
            camped: camp,
        };
        self.history.push(step.clone());
        Ok(step)
    }

    /// Close out the current day. The party starts the next day at its
    /// current location, not en route.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::CalendarEnded`] on the last authored day
    /// unless the extended calendar is active.
    pub fn end_day(&mut self, content: &Content) -> Result<u32, TransitionError> {
        if let Some(last) = self.last_day(content)
            && self.day >= last
        {
            return Err(TransitionError::CalendarEnded { day: self.day });
        }
        self.day = self.day.saturating_add(1);
        self.current_path_terrain = None;
        log::debug!("day {} begins at {}", self.day, self.current_location);
        Ok(self.day)
    }

    /// Allow the campaign to continue past the authored calendar.
    pub fn extend_calendar(&mut self) {
        if !self.is_extended() {
            log::info!("extended calendar enabled on day {}", self.day);
        }
        self.extended_calendar = Some(true);
    }

    /// Today's weather, or `None` past the authored calendar.
    #[must_use]
    pub fn weather<'c>(&self, content: &'c Content) -> Option<&'c WeatherBand> {
        content.weather(self.cycle_id, self.day)
    }

    #[must_use]
    pub fn moon_icon(&self, content: &Content) -> Option<MoonIcon> {
        content.moon_icon(self.day)
    }

    /// Guide entries for `day`: the printed entries first, then player notes.
    #[must_use]
    pub fn guide_entries(&self, content: &Content, day: u32) -> Vec<String> {
        let mut entries = content.fixed_guide_entries(self.cycle_id, day).to_vec();
        if let Some(notes) = self.calendar.get(&day) {
            entries.extend(notes.iter().cloned());
        }
        entries
    }

    /// Add a player note to `day`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::InvalidDay`] for day 0 or a day past the
    /// calendar the campaign can reach.
    pub fn add_calendar_entry(
        &mut self,
        content: &Content,
        day: u32,
        entry: impl Into<String>,
    ) -> Result<(), TransitionError> {
        if day == 0 || self.last_day(content).is_some_and(|last| day > last) {
            return Err(TransitionError::InvalidDay { day });
        }
        self.calendar.entry(day).or_default().push(entry.into());
        Ok(())
    }

    /// Remove the first matching player note from `day`. Returns whether a
    /// note was removed.
    pub fn remove_calendar_entry(&mut self, day: u32, entry: &str) -> bool {
        let Some(notes) = self.calendar.get_mut(&day) else {
            return false;
        };
        let Some(idx) = notes.iter().position(|note| note == entry) else {
            return false;
        };
        notes.remove(idx);
        if notes.is_empty() {
            self.calendar.remove(&day);
        }
        true
    }

    /// Every day from 1 through today with the travel taken on it.
    #[must_use]
    pub fn travel_days(&self) -> Vec<TravelDay> {
        let starts = starting_locations(&self.history, &self.starting_location, self.day);
        group_by_day(&self.history, self.day, |day| {
            starts
                .get(&day)
                .cloned()
                .unwrap_or_else(|| self.starting_location.clone())
        })
    }

    /// Where today stands: the day's final location so far and whether the
    /// party camped.
    #[must_use]
    pub fn today(&self) -> DaySummary {
        self.travel_days()
            .pop()
            .map_or_else(
                || DaySummary {
                    final_location: self.current_location.clone(),
                    camped: false,
                    last_path: None,
                },
                |day| day.summary(),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::content;

    fn core_campaign() -> Campaign {
        Campaign::new(content(), Cycle::Core, "lone_tree_station").unwrap()
    }

    #[test]
    fn unknown_starting_location_is_rejected() {
        let err = Campaign::new(content(), Cycle::Core, "drowned_archive").unwrap_err();
        assert!(matches!(err, TransitionError::UnknownLocation { .. }));
    }

    #[test]
    fn travel_without_path_leaves_state_untouched() {
        let mut campaign = core_campaign();
        let before = campaign.clone();
        let err = campaign
            .travel(content(), "spire", false, &[])
            .unwrap_err();
        assert_eq!(
            err,
            TransitionError::NoConnection {
                from: "lone_tree_station".to_string(),
                to: "spire".to_string()
            }
        );
        assert_eq!(campaign, before);
    }

    #[test]
    fn camping_ends_travel_for_the_day() {
        let mut campaign = core_campaign();
        campaign
            .travel(content(), "boulder_field", true, &[])
            .unwrap();
        assert!(campaign.camped_today());
        assert_eq!(
            campaign.travel(content(), "meadow", false, &[]),
            Err(TransitionError::AlreadyCamped { day: 1 })
        );
        campaign.end_day(content()).unwrap();
        assert_eq!(campaign.current_path_terrain, None);
        campaign.travel(content(), "meadow", false, &[]).unwrap();
        assert_eq!(campaign.current_path_terrain, Some(PathTerrain::Grassland));
    }

    #[test]
    fn calendar_stops_at_ceiling_until_extended() {
        let mut campaign = core_campaign();
        campaign.day = 30;
        assert_eq!(
            campaign.end_day(content()),
            Err(TransitionError::CalendarEnded { day: 30 })
        );
        campaign.extend_calendar();
        assert_eq!(campaign.end_day(content()), Ok(31));
        assert!(campaign.weather(content()).is_none());
        assert!(campaign.moon_icon(content()).is_none());
    }

    #[test]
    fn guide_entries_merge_fixed_and_player_notes() {
        let mut campaign = core_campaign();
        campaign
            .add_calendar_entry(content(), 1, "ask about the biscuits")
            .unwrap();
        assert_eq!(
            campaign.guide_entries(content(), 1),
            vec!["1".to_string(), "ask about the biscuits".to_string()]
        );
        assert_eq!(
            campaign.add_calendar_entry(content(), 31, "too late"),
            Err(TransitionError::InvalidDay { day: 31 })
        );
        assert!(campaign.remove_calendar_entry(1, "ask about the biscuits"));
        assert!(!campaign.remove_calendar_entry(1, "ask about the biscuits"));
        assert!(campaign.calendar.is_empty());
    }

    #[test]
    fn today_reports_stay_or_travel() {
        let mut campaign = core_campaign();
        let idle = campaign.today();
        assert_eq!(idle.final_location, "lone_tree_station");
        assert!(!idle.traveled());

        campaign
            .travel(content(), "kobos_market", false, &[])
            .unwrap();
        let moved = campaign.today();
        assert_eq!(moved.final_location, "kobos_market");
        assert_eq!(moved.last_path, Some(PathTerrain::Grassland));
        assert!(!moved.camped);
    }
}
