//! Shipped static content: locations, connections, calendars, moon table and
//! the challenge card catalog.
//!
//! Content is parsed and validated once into an immutable [`Content`] value.
//! [`content`] exposes the embedded tables process-wide.
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::sync::OnceLock;

use crate::calendar::{CalendarAsset, CycleCalendar, MoonAsset, MoonIcon, MoonTable, WeatherBand};
use crate::challenge::{ChallengeCard, ChallengeCatalog};
use crate::constants::{
    CHALLENGE_CARDS_ASSET, CORE_CALENDAR_ASSET, CORE_CONNECTIONS_ASSET, LOA_CALENDAR_ASSET,
    LOA_CONNECTIONS_ASSET, LOCATIONS_ASSET, MOON_ASSET,
};
use crate::cycle::Cycle;
use crate::error::ContentError;
use crate::location::{Connection, Location, LocationGraph};

/// Trait for abstracting where content assets come from.
/// The engine ships [`EmbeddedContent`]; tests and tools may provide fixtures.
pub trait ContentSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Raw JSON text of the named asset.
    ///
    /// # Errors
    ///
    /// Returns an error if the asset cannot be produced.
    fn asset(&self, name: &'static str) -> Result<Cow<'static, str>, Self::Error>;
}

/// Assets compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedContent;

#[derive(Debug, thiserror::Error)]
#[error("no embedded asset named {0}")]
pub struct MissingAsset(pub &'static str);

impl ContentSource for EmbeddedContent {
    type Error = MissingAsset;

    fn asset(&self, name: &'static str) -> Result<Cow<'static, str>, Self::Error> {
        let text = match name {
            LOCATIONS_ASSET => include_str!("../assets/data/locations.json"),
            MOON_ASSET => include_str!("../assets/data/moon.json"),
            CHALLENGE_CARDS_ASSET => include_str!("../assets/data/challenge_cards.json"),
            CORE_CONNECTIONS_ASSET => include_str!("../assets/data/core/connections.json"),
            CORE_CALENDAR_ASSET => include_str!("../assets/data/core/calendar.json"),
            LOA_CONNECTIONS_ASSET => include_str!("../assets/data/loa/connections.json"),
            LOA_CALENDAR_ASSET => include_str!("../assets/data/loa/calendar.json"),
            _ => return Err(MissingAsset(name)),
        };
        Ok(Cow::Borrowed(text))
    }
}

/// One value per cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerCycle<T> {
    pub core: T,
    pub loa: T,
}

impl<T> PerCycle<T> {
    #[must_use]
    pub const fn get(&self, cycle: Cycle) -> &T {
        match cycle {
            Cycle::Core => &self.core,
            Cycle::LegacyOfTheAncestors => &self.loa,
        }
    }

    fn try_build<F>(mut build: F) -> Result<Self, ContentError>
    where
        F: FnMut(Cycle) -> Result<T, ContentError>,
    {
        Ok(Self {
            core: build(Cycle::Core)?,
            loa: build(Cycle::LegacyOfTheAncestors)?,
        })
    }
}

const fn connections_asset(cycle: Cycle) -> &'static str {
    match cycle {
        Cycle::Core => CORE_CONNECTIONS_ASSET,
        Cycle::LegacyOfTheAncestors => LOA_CONNECTIONS_ASSET,
    }
}

const fn calendar_asset(cycle: Cycle) -> &'static str {
    match cycle {
        Cycle::Core => CORE_CALENDAR_ASSET,
        Cycle::LegacyOfTheAncestors => LOA_CALENDAR_ASSET,
    }
}

/// Every static table the engine reads, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    locations: Vec<Location>,
    graphs: PerCycle<LocationGraph>,
    calendars: PerCycle<CycleCalendar>,
    moon: MoonTable,
    challenge: ChallengeCatalog,
}

fn parse<S, T>(source: &S, name: &'static str) -> Result<T, ContentError>
where
    S: ContentSource + ?Sized,
    T: DeserializeOwned,
{
    let text = source.asset(name).map_err(|err| ContentError::Unavailable {
        asset: name,
        reason: err.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|source| ContentError::Parse { asset: name, source })
}

impl Content {
    /// Load and validate every table from `source`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ContentError`] found: unreadable or malformed
    /// assets, graph endpoints outside their cycle, calendar gaps or overlaps,
    /// moon table gaps, or an incomplete card catalog.
    pub fn load<S>(source: &S) -> Result<Self, ContentError>
    where
        S: ContentSource + ?Sized,
    {
        let locations: Vec<Location> = parse(source, LOCATIONS_ASSET)?;
        let graphs = PerCycle::try_build(|cycle| {
            let connections: Vec<Connection> = parse(source, connections_asset(cycle))?;
            LocationGraph::build(cycle, &locations, &connections)
        })?;
        let calendars = PerCycle::try_build(|cycle| {
            let asset: CalendarAsset = parse(source, calendar_asset(cycle))?;
            CycleCalendar::from_asset(cycle, asset)
        })?;
        let last_day = calendars.core.ceiling().max(calendars.loa.ceiling());
        let moon_asset: MoonAsset = parse(source, MOON_ASSET)?;
        let moon = MoonTable::from_asset(moon_asset, last_day)?;
        let cards: Vec<ChallengeCard> = parse(source, CHALLENGE_CARDS_ASSET)?;
        let challenge = ChallengeCatalog::from_cards(cards)?;

        log::debug!(
            "content loaded: {} locations, {} core paths, {} loa paths",
            locations.len(),
            graphs.core.path_count(),
            graphs.loa.path_count()
        );
        Ok(Self {
            locations,
            graphs,
            calendars,
            moon,
            challenge,
        })
    }

    /// Master location list across all cycles.
    #[must_use]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    #[must_use]
    pub const fn graph(&self, cycle: Cycle) -> &LocationGraph {
        self.graphs.get(cycle)
    }

    #[must_use]
    pub const fn calendar(&self, cycle: Cycle) -> &CycleCalendar {
        self.calendars.get(cycle)
    }

    #[must_use]
    pub const fn moon(&self) -> &MoonTable {
        &self.moon
    }

    #[must_use]
    pub const fn challenge(&self) -> &ChallengeCatalog {
        &self.challenge
    }

    /// Weather for `day`, or `None` past the authored calendar.
    #[must_use]
    pub fn weather(&self, cycle: Cycle, day: u32) -> Option<&WeatherBand> {
        match self.calendar(cycle).weather_for(day) {
            Ok(band) => Some(band),
            Err(err) => {
                log::debug!("{err}; no special weather");
                None
            }
        }
    }

    #[must_use]
    pub fn moon_icon(&self, day: u32) -> Option<MoonIcon> {
        self.moon.icon_for(day)
    }

    #[must_use]
    pub fn fixed_guide_entries(&self, cycle: Cycle, day: u32) -> &[String] {
        self.calendar(cycle).fixed_guide_entries(day)
    }
}

/// The embedded content tables.
///
/// # Panics
///
/// Panics if the embedded assets fail validation. Shipped content is covered
/// by tests, so this only fires on a broken build.
#[must_use]
pub fn content() -> &'static Content {
    static CONTENT: OnceLock<Content> = OnceLock::new();
    CONTENT.get_or_init(|| {
        Content::load(&EmbeddedContent)
            .unwrap_or_else(|err| panic!("embedded campaign content is invalid: {err}"))
    })
}
