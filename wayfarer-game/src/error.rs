//! Error taxonomy for the campaign engine.
use thiserror::Error;

use crate::cycle::Cycle;
use crate::terrain::{ConnectionRestriction, PathTerrain};

/// Defects in shipped static content. These are fatal: they indicate a broken
/// content table, never bad user input.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to parse content asset {asset}: {source}")]
    Parse {
        asset: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("content asset {asset} unavailable: {reason}")]
    Unavailable { asset: &'static str, reason: String },
    #[error("{cycle} connection references unknown location {location}")]
    UnknownEndpoint { cycle: Cycle, location: String },
    #[error("{cycle} connection {from} -> {to} uses terrain {terrain:?} outside the cycle")]
    TerrainOutsideCycle {
        cycle: Cycle,
        from: String,
        to: String,
        terrain: PathTerrain,
    },
    #[error(
        "{cycle} connection {from} -> {to} uses restriction {restriction:?} outside the cycle"
    )]
    RestrictionOutsideCycle {
        cycle: Cycle,
        from: String,
        to: String,
        restriction: ConnectionRestriction,
    },
    #[error("{cycle} connection {from} -> {to} is redefined with a different terrain or restriction")]
    ConflictingConnection {
        cycle: Cycle,
        from: String,
        to: String,
    },
    #[error("{cycle} connection joins {location} to itself")]
    SelfLoop { cycle: Cycle, location: String },
    #[error("duplicate location id {location}")]
    DuplicateLocation { location: String },
    #[error("{cycle} calendar has no weather for day {day}")]
    CalendarGap { cycle: Cycle, day: u32 },
    #[error("{cycle} calendar band {start}..={end} overlaps or is out of order")]
    CalendarOverlap { cycle: Cycle, start: u32, end: u32 },
    #[error("{cycle} calendar has weather past its ceiling (day {day} > {ceiling})")]
    CalendarOverrun { cycle: Cycle, day: u32, ceiling: u32 },
    #[error("moon table has no icon for day {day}")]
    MoonGap { day: u32 },
    #[error("{cycle} guide entry keyed to day {day}, outside 1..={ceiling}")]
    GuideDayOutOfRange { cycle: Cycle, day: u32, ceiling: u32 },
    #[error("moon fallback for day {day} must point at the nearest earlier authored day, not {source_day}")]
    MoonFallback { day: u32, source_day: u32 },
    #[error("challenge catalog is malformed: {reason}")]
    Catalog { reason: String },
}

/// Lookup failures against the calendar tables.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("day {day} is outside the authored {cycle} calendar")]
    DayOutOfRange { cycle: Cycle, day: u32 },
}

/// A requested state change that is not legal from the current state.
/// The state the operation was called on is left untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot draw while {scouted} card(s) are scouted")]
    DrawWhileScouted { scouted: usize },
    #[error("every remaining card has already been scouted")]
    ScoutExhausted,
    #[error("no cards are scouted")]
    NothingScouted,
    #[error("location {location} does not exist in the {cycle} cycle")]
    UnknownLocation { cycle: Cycle, location: String },
    #[error("no path connects {from} to {to}")]
    NoConnection { from: String, to: String },
    #[error("entering {to} requires clearing {restriction:?}")]
    RestrictedPassage {
        to: String,
        restriction: ConnectionRestriction,
    },
    #[error("the party already made camp on day {day}")]
    AlreadyCamped { day: u32 },
    #[error("day {day} is the last day of the calendar")]
    CalendarEnded { day: u32 },
    #[error("day {day} is not a valid calendar day")]
    InvalidDay { day: u32 },
}

/// Rejections raised while decoding a persisted challenge deck.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeckStateError {
    #[error("card id {id} is not in the challenge catalog")]
    UnknownCard { id: u8 },
    #[error("card id {id} appears more than once")]
    DuplicateCard { id: u8 },
    #[error("scout position {position} exceeds stack size {size}")]
    ScoutPastEnd { position: usize, size: usize },
}
