//! Wayfarer Campaign Engine
//!
//! Platform-agnostic campaign progression for the Wayfarer companion app: the
//! location graph, calendar and weather tables, travel history, and the
//! challenge deck. This crate performs no I/O; callers persist what it returns.

pub mod calendar;
pub mod campaign;
pub mod challenge;
pub mod constants;
pub mod content;
pub mod cycle;
pub mod error;
pub mod history;
pub mod location;
pub mod seed;
pub mod terrain;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use calendar::{CycleCalendar, MoonIcon, MoonTable, WeatherBand};
pub use campaign::Campaign;
pub use challenge::{
    CardIcon, CardId, ChallengeCard, ChallengeCatalog, ChallengeDeck, ChallengeDeckRecord,
    DeckPhase, DrawOutcome,
};
pub use constants::{CHALLENGE_CARD_COUNT, DEFAULT_STARTING_LOCATION};
pub use content::{Content, ContentSource, EmbeddedContent, content};
pub use cycle::{ALL_CYCLES, Cycle};
pub use error::{CalendarError, ContentError, DeckStateError, TransitionError};
pub use history::{DaySummary, TravelDay, TravelStep, group_by_day, starting_locations};
pub use location::{Connection, DirectedEdge, Location, LocationGraph, locations_for};
pub use seed::{derive_stream_seed, stream_rng};
pub use terrain::{ConnectionRestriction, PathTerrain, RestrictionSet};

/// Everything persisted for one campaign slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSave {
    pub campaign: Campaign,
    pub challenge_deck: ChallengeDeck,
}

/// Trait for abstracting save/load operations.
/// Platform-specific implementations should provide this.
pub trait CampaignStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save a campaign slot
    ///
    /// # Errors
    ///
    /// Returns an error if the campaign cannot be saved.
    fn save_campaign(&self, slot: &str, save: &CampaignSave) -> Result<(), Self::Error>;

    /// Load a campaign slot
    ///
    /// # Errors
    ///
    /// Returns an error if the campaign cannot be loaded.
    fn load_campaign(&self, slot: &str) -> Result<Option<CampaignSave>, Self::Error>;

    /// Delete a campaign slot
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be deleted.
    fn delete_campaign(&self, slot: &str) -> Result<(), Self::Error>;
}

/// Entry point tying the content tables to a storage backend.
pub struct CampaignEngine<'c, S>
where
    S: CampaignStorage,
{
    content: &'c Content,
    storage: S,
}

impl<S> CampaignEngine<'static, S>
where
    S: CampaignStorage,
{
    /// Create an engine over the embedded content.
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self::with_content(content(), storage)
    }
}

impl<'c, S> CampaignEngine<'c, S>
where
    S: CampaignStorage,
{
    #[must_use]
    pub const fn with_content(content: &'c Content, storage: S) -> Self {
        Self { content, storage }
    }

    #[must_use]
    pub const fn content(&self) -> &'c Content {
        self.content
    }

    /// Start a fresh campaign with a deck shuffled from `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the starting location is not part of `cycle`.
    pub fn start_campaign(
        &self,
        cycle: Cycle,
        starting_location: &str,
        seed: u64,
    ) -> Result<CampaignSave, TransitionError> {
        let campaign = Campaign::new(self.content, cycle, starting_location)?;
        log::info!("starting {cycle} campaign at {starting_location} (seed {seed:#x})");
        Ok(CampaignSave {
            campaign,
            challenge_deck: ChallengeDeck::with_seed(seed),
        })
    }

    /// Persist a campaign slot
    ///
    /// # Errors
    ///
    /// Returns an error if the campaign cannot be saved.
    pub fn save_campaign(&self, slot: &str, save: &CampaignSave) -> Result<(), S::Error> {
        self.storage.save_campaign(slot, save)
    }

    /// Load a campaign slot and check it against the content tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be loaded or references a location
    /// outside its cycle.
    pub fn load_campaign(&self, slot: &str) -> Result<Option<CampaignSave>, anyhow::Error> {
        let Some(save) = self
            .storage
            .load_campaign(slot)
            .with_context(|| format!("loading campaign slot {slot}"))?
        else {
            return Ok(None);
        };
        let graph = self.content.graph(save.campaign.cycle_id);
        if !graph.contains(&save.campaign.current_location) {
            bail!(
                "campaign slot {slot} is at {}, which is not part of the {} cycle",
                save.campaign.current_location,
                save.campaign.cycle_id
            );
        }
        Ok(Some(save))
    }

    /// Delete a campaign slot
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be deleted.
    pub fn delete_campaign(&self, slot: &str) -> Result<(), S::Error> {
        self.storage.delete_campaign(slot)
    }
}
