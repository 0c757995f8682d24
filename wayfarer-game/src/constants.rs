//! Fixed sizes and asset locations for the campaign engine.
//!
//! Content tables ship as JSON under `assets/data`; the values here are the
//! structural constants the engine relies on regardless of content.

/// Number of cards in the challenge catalog (ids `1..=24`).
pub const CHALLENGE_CARD_COUNT: u8 = 24;

/// Location a campaign starts at when none is given.
pub const DEFAULT_STARTING_LOCATION: &str = "lone_tree_station";

// Embedded assets ------------------------------------------------------------
pub(crate) const LOCATIONS_ASSET: &str = "locations.json";
pub(crate) const MOON_ASSET: &str = "moon.json";
pub(crate) const CHALLENGE_CARDS_ASSET: &str = "challenge_cards.json";
pub(crate) const CORE_CONNECTIONS_ASSET: &str = "core/connections.json";
pub(crate) const CORE_CALENDAR_ASSET: &str = "core/calendar.json";
pub(crate) const LOA_CONNECTIONS_ASSET: &str = "loa/connections.json";
pub(crate) const LOA_CALENDAR_ASSET: &str = "loa/calendar.json";
