//! Day calendar: weather bands, moon icons and fixed guide entries.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cycle::Cycle;
use crate::error::{CalendarError, ContentError};

/// Contiguous run of days sharing the same weather.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherBand {
    pub start: u32,
    pub end: u32,
    pub weather: String,
    /// Effect layered on top of the primary weather for the whole band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
}

impl WeatherBand {
    #[must_use]
    pub const fn contains(&self, day: u32) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Raw per-cycle calendar asset as shipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarAsset {
    pub ceiling: u32,
    pub weather: Vec<WeatherBand>,
    #[serde(default)]
    pub guide: BTreeMap<u32, Vec<String>>,
}

/// Validated calendar for one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleCalendar {
    cycle: Cycle,
    ceiling: u32,
    bands: Vec<WeatherBand>,
    guide: BTreeMap<u32, Vec<String>>,
}

impl CycleCalendar {
    /// Validate a shipped calendar asset.
    ///
    /// # Errors
    ///
    /// Returns a [`ContentError`] if the bands leave a gap, overlap, run past
    /// the ceiling, or if a guide entry is keyed outside `1..=ceiling`.
    pub fn from_asset(cycle: Cycle, asset: CalendarAsset) -> Result<Self, ContentError> {
        let mut next_day = 1;
        for band in &asset.weather {
            if band.start > band.end || band.start < next_day {
                return Err(ContentError::CalendarOverlap {
                    cycle,
                    start: band.start,
                    end: band.end,
                });
            }
            if band.start > next_day {
                return Err(ContentError::CalendarGap {
                    cycle,
                    day: next_day,
                });
            }
            if band.end > asset.ceiling {
                return Err(ContentError::CalendarOverrun {
                    cycle,
                    day: band.end,
                    ceiling: asset.ceiling,
                });
            }
            next_day = band.end + 1;
        }
        if next_day <= asset.ceiling {
            return Err(ContentError::CalendarGap {
                cycle,
                day: next_day,
            });
        }
        if let Some(day) = asset
            .guide
            .keys()
            .copied()
            .find(|day| *day == 0 || *day > asset.ceiling)
        {
            return Err(ContentError::GuideDayOutOfRange {
                cycle,
                day,
                ceiling: asset.ceiling,
            });
        }

        Ok(Self {
            cycle,
            ceiling: asset.ceiling,
            bands: asset.weather,
            guide: asset.guide,
        })
    }

    #[must_use]
    pub const fn cycle(&self) -> Cycle {
        self.cycle
    }

    /// Last authored day; campaigns only pass it with the extended calendar.
    #[must_use]
    pub const fn ceiling(&self) -> u32 {
        self.ceiling
    }

    #[must_use]
    pub fn bands(&self) -> &[WeatherBand] {
        &self.bands
    }

    /// Band covering `day`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::DayOutOfRange`] for days no band covers, which
    /// happens once a campaign runs past the authored calendar.
    pub fn weather_for(&self, day: u32) -> Result<&WeatherBand, CalendarError> {
        let idx = self.bands.partition_point(|band| band.end < day);
        self.bands
            .get(idx)
            .filter(|band| band.contains(day))
            .ok_or(CalendarError::DayOutOfRange {
                cycle: self.cycle,
                day,
            })
    }

    /// Guide entries printed on the calendar for `day`, independent of any
    /// notes the players added.
    #[must_use]
    pub fn fixed_guide_entries(&self, day: u32) -> &[String] {
        self.guide.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Moon phase icon shown next to a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonIcon {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoonAsset {
    pub icons: BTreeMap<u32, MoonIcon>,
    /// Days that reuse another authored day's icon, keyed by day.
    #[serde(default)]
    pub fallback: BTreeMap<u32, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoonTable {
    icons: BTreeMap<u32, MoonIcon>,
    fallback: BTreeMap<u32, u32>,
    last_day: u32,
}

impl MoonTable {
    /// Validate the moon asset against the longest authored calendar.
    ///
    /// # Errors
    ///
    /// Returns a [`ContentError`] if a day in `1..=last_day` has neither an
    /// icon nor a fallback, or if a fallback does not point at the nearest
    /// earlier authored day.
    pub fn from_asset(asset: MoonAsset, last_day: u32) -> Result<Self, ContentError> {
        for (&day, &source_day) in &asset.fallback {
            let nearest = asset.icons.range(..day).next_back().map(|(&d, _)| d);
            if nearest != Some(source_day) {
                return Err(ContentError::MoonFallback { day, source_day });
            }
        }
        for day in 1..=last_day {
            if !asset.icons.contains_key(&day) && !asset.fallback.contains_key(&day) {
                return Err(ContentError::MoonGap { day });
            }
        }
        Ok(Self {
            icons: asset.icons,
            fallback: asset.fallback,
            last_day,
        })
    }

    /// Icon for `day`. Days past the authored table have no icon.
    #[must_use]
    pub fn icon_for(&self, day: u32) -> Option<MoonIcon> {
        self.icons.get(&day).copied().or_else(|| {
            self.fallback
                .get(&day)
                .and_then(|source| self.icons.get(source).copied())
        })
    }

    #[must_use]
    pub const fn last_day(&self) -> u32 {
        self.last_day
    }
}
