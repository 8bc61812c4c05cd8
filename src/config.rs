use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};
use indexmap::IndexMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::window::MAX_WINDOW_DAYS;
use crate::dataset::CreativeExample;
use crate::errors::GeneratorError;
use crate::series::ViralityTier;
use crate::templates::TemplateCatalog;
use crate::types::{CategoryId, Hashtag, RegionCode};

/// Half-open uniform range of real values (`min..max`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    /// Inclusive lower bound.
    pub min: f64,
    /// Exclusive upper bound, except for collapsed ranges.
    pub max: f64,
}

impl ValueRange {
    /// Range from `min` to `max`.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Draw a value; a collapsed range always yields `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..self.max)
    }

    /// Whether `value` lies within the closed bounds.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Inclusive uniform range of counts (`min..=max`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    /// Inclusive lower bound.
    pub min: u64,
    /// Inclusive upper bound.
    pub max: u64,
}

impl CountRange {
    /// Range from `min` to `max`, both inclusive.
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Draw a count; a collapsed range always yields `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }

    /// Scale both bounds, keeping at least one count at the low end.
    pub fn scaled(&self, factor: f64) -> Self {
        let min = ((self.min as f64 * factor).round() as u64).max(1);
        let max = ((self.max as f64 * factor).round() as u64).max(min);
        Self { min, max }
    }
}

/// Length of the analysis window the dataset describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisWindow {
    /// 30-day analysis period.
    Days30,
    /// 90-day analysis period.
    Days90,
    /// Any other positive number of days.
    Custom(u32),
}

impl AnalysisWindow {
    /// Map a day count onto a preset when one matches.
    pub fn from_days(days: u32) -> Self {
        match days {
            30 => Self::Days30,
            90 => Self::Days90,
            other => Self::Custom(other),
        }
    }

    /// Number of days in the window.
    pub fn days(&self) -> u32 {
        match self {
            Self::Days30 => 30,
            Self::Days90 => 90,
            Self::Custom(days) => *days,
        }
    }

    /// Human label used in the timeline summary, e.g. `30 days`.
    pub fn label(&self) -> String {
        format!("{} days", self.days())
    }

    /// Multiplier applied to 30-day baselines such as video targets.
    pub fn scale_from_baseline(&self) -> f64 {
        f64::from(self.days()) / 30.0
    }
}

/// Day-of-week activity multipliers applied after the phase value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPattern {
    /// Monday through Thursday.
    pub weekday: ValueRange,
    /// Friday.
    pub friday: ValueRange,
    /// Saturday and Sunday.
    pub weekend: ValueRange,
}

impl Default for WeeklyPattern {
    fn default() -> Self {
        Self {
            weekday: ValueRange::new(0.95, 1.05),
            friday: ValueRange::new(1.05, 1.10),
            weekend: ValueRange::new(1.10, 1.20),
        }
    }
}

impl WeeklyPattern {
    /// Multiplier range that applies on `day`.
    pub fn range_for(&self, day: Weekday) -> ValueRange {
        match day {
            Weekday::Fri => self.friday,
            Weekday::Sat | Weekday::Sun => self.weekend,
            _ => self.weekday,
        }
    }

    /// Draw the multiplier for `date`.
    pub fn multiplier<R: Rng + ?Sized>(&self, date: NaiveDate, rng: &mut R) -> f64 {
        self.range_for(date.weekday()).sample(rng)
    }
}

/// Tunables of the daily curve that are not tied to a virality tier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesPolicy {
    /// Day-of-week multipliers.
    pub weekly: WeeklyPattern,
    /// Multiplicative per-day noise.
    pub noise: ValueRange,
}

impl Default for SeriesPolicy {
    fn default() -> Self {
        Self {
            weekly: WeeklyPattern::default(),
            noise: ValueRange::new(0.95, 1.05),
        }
    }
}

/// Tier and video budget assigned to one trend slot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlotProfile {
    /// Virality tier of the slot.
    pub tier: ViralityTier,
    /// Detected-video target for a 30-day window; scaled for other windows.
    pub videos: CountRange,
}

impl SlotProfile {
    /// Profile for tier `tier` with a 30-day video budget of `min_videos..=max_videos`.
    pub const fn new(tier: u8, min_videos: u64, max_videos: u64) -> Self {
        Self {
            tier: ViralityTier::new(tier),
            videos: CountRange::new(min_videos, max_videos),
        }
    }
}

/// Video count and engagement ranges for a market tier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketProfile {
    /// Videos reported per region.
    pub video_count: CountRange,
    /// Engagement rate reported per region.
    pub engagement_rate: ValueRange,
}

/// Genre-driven regional override: a fixed priority list replaces random regions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AffinityGroup {
    /// Identifier used in logs.
    pub name: String,
    /// Case-insensitive substring matched against the song genre.
    pub genre_keyword: String,
    /// Priority-ordered regions with their base weight ranges.
    pub priority: Vec<(RegionCode, ValueRange)>,
    /// Regions reported with the `primary_market` profile.
    pub primary_markets: Vec<RegionCode>,
    /// Profile used for `primary_markets`.
    pub primary_market: MarketProfile,
    /// Genre hashtags appended to every trend of a matching song.
    pub hashtags: Vec<Hashtag>,
}

impl AffinityGroup {
    /// Whether `genre` contains the group's keyword, ignoring case.
    pub fn matches(&self, genre: &str) -> bool {
        genre
            .to_lowercase()
            .contains(&self.genre_keyword.to_lowercase())
    }

    /// Whether `code` is one of the group's primary markets.
    pub fn is_primary_market(&self, code: &str) -> bool {
        self.primary_markets.iter().any(|market| market == code)
    }

    /// Regional Mexican songs skew toward Mexico and the US diaspora.
    pub fn regional_mexican() -> Self {
        let regions = [
            ("MX", 0.35, 0.45),
            ("US", 0.25, 0.35),
            ("BR", 0.08, 0.12),
            ("CA", 0.03, 0.05),
            ("FR", 0.02, 0.04),
        ];
        Self {
            name: "regional_mexican".to_string(),
            genre_keyword: "mexican".to_string(),
            priority: regions
                .iter()
                .map(|(code, min, max)| (code.to_string(), ValueRange::new(*min, *max)))
                .collect(),
            primary_markets: vec!["MX".to_string(), "US".to_string()],
            primary_market: MarketProfile {
                video_count: CountRange::new(100, 500),
                engagement_rate: ValueRange::new(0.12, 0.18),
            },
            hashtags: vec![
                "#corridos".to_string(),
                "#mexicanmusic".to_string(),
                "#regionalmusic".to_string(),
            ],
        }
    }
}

/// Controls how regional splits are drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionalPolicy {
    /// Number of regions reported per trend.
    pub regions_per_trend: usize,
    /// Weight range for regions drawn without an affinity override.
    pub open_market_weight: ValueRange,
    /// Profile used for regions outside any primary market.
    pub standard_market: MarketProfile,
    /// Genre overrides checked in order.
    pub affinity_groups: Vec<AffinityGroup>,
}

impl Default for RegionalPolicy {
    fn default() -> Self {
        Self {
            regions_per_trend: 5,
            open_market_weight: ValueRange::new(0.05, 0.15),
            standard_market: MarketProfile {
                video_count: CountRange::new(20, 100),
                engagement_rate: ValueRange::new(0.08, 0.12),
            },
            affinity_groups: vec![AffinityGroup::regional_mexican()],
        }
    }
}

impl RegionalPolicy {
    /// First affinity group whose keyword appears in `genre`.
    pub fn affinity_for(&self, genre: &str) -> Option<&AffinityGroup> {
        self.affinity_groups.iter().find(|group| group.matches(genre))
    }
}

/// Top-level generator configuration.
///
/// Immutable once handed to the generator; the current timestamp lives here
/// so a run never reads the clock on its own. `Default` pins `now` to the
/// Unix epoch; use [`GeneratorConfig::new`] to anchor the window elsewhere.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// RNG seed that controls every draw of a run.
    pub seed: u64,
    /// Number of trend slots in the dataset.
    pub num_trends: usize,
    /// Length of the analysis window.
    pub window: AnalysisWindow,
    /// End of the analysis window and the `generated_at` stamp.
    pub now: DateTime<Utc>,
    /// Region codes eligible for open-market regional splits.
    pub regions: Vec<RegionCode>,
    /// Display names for region codes.
    pub country_names: IndexMap<RegionCode, String>,
    /// How regional splits are drawn.
    pub regional: RegionalPolicy,
    /// Per-slot tier and video budget; slots past the end reuse the last entry.
    pub slot_profiles: Vec<SlotProfile>,
    /// Category forced onto slot 0 (the best performer).
    pub lead_category: Option<CategoryId>,
    /// Daily curve tunables.
    pub series: SeriesPolicy,
    /// Genres picked from when the research notes carry none.
    pub fallback_genres: Vec<String>,
    /// Template table keyed by trend category.
    pub catalog: TemplateCatalog,
    /// Optional real-world reference attached to the lead trend.
    pub real_creative_example: Option<CreativeExample>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let countries = [
            ("US", "United States"),
            ("UK", "United Kingdom"),
            ("CA", "Canada"),
            ("AU", "Australia"),
            ("BR", "Brazil"),
            ("MX", "Mexico"),
            ("FR", "France"),
            ("DE", "Germany"),
            ("JP", "Japan"),
            ("KR", "South Korea"),
        ];
        Self {
            seed: 42,
            num_trends: 3,
            window: AnalysisWindow::Days30,
            now: DateTime::<Utc>::UNIX_EPOCH,
            regions: countries.iter().map(|(code, _)| code.to_string()).collect(),
            country_names: countries
                .iter()
                .map(|(code, name)| (code.to_string(), name.to_string()))
                .collect(),
            regional: RegionalPolicy::default(),
            slot_profiles: vec![
                SlotProfile::new(5, 900, 1100),
                SlotProfile::new(3, 500, 700),
                SlotProfile::new(2, 200, 400),
            ],
            lead_category: Some("dance".to_string()),
            series: SeriesPolicy::default(),
            fallback_genres: ["Pop", "Hip-Hop", "Electronic", "Indie", "R&B"]
                .iter()
                .map(|genre| genre.to_string())
                .collect(),
            catalog: TemplateCatalog::default(),
            real_creative_example: None,
        }
    }
}

impl GeneratorConfig {
    /// Default configuration whose analysis window ends at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }

    /// Reject configurations the generator cannot honor.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.num_trends == 0 {
            return Err(GeneratorError::Configuration(
                "num_trends must be greater than zero".to_string(),
            ));
        }
        if self.window.days() == 0 {
            return Err(GeneratorError::Configuration(
                "analysis window must span at least one day".to_string(),
            ));
        }
        if self.window.days() > MAX_WINDOW_DAYS || self.checked_window_start().is_none() {
            return Err(GeneratorError::Configuration(format!(
                "analysis window of {} days is out of range (max {MAX_WINDOW_DAYS} days ending {})",
                self.window.days(),
                self.window_end()
            )));
        }
        if self.regions.is_empty() {
            return Err(GeneratorError::Configuration(
                "region list must not be empty".to_string(),
            ));
        }
        if self.slot_profiles.is_empty() {
            return Err(GeneratorError::Configuration(
                "at least one slot profile is required".to_string(),
            ));
        }
        if self.catalog.is_empty() {
            return Err(GeneratorError::Configuration(
                "template catalog must define at least one category".to_string(),
            ));
        }
        let weekly = &self.series.weekly;
        let ranges = [
            ("weekday multiplier", weekly.weekday),
            ("friday multiplier", weekly.friday),
            ("weekend multiplier", weekly.weekend),
            ("daily noise", self.series.noise),
            ("open market weight", self.regional.open_market_weight),
        ];
        for (label, range) in ranges {
            if !range.is_valid() {
                return Err(GeneratorError::Configuration(format!(
                    "{label} range is invalid (min={}, max={})",
                    range.min, range.max
                )));
            }
        }
        for profile in &self.slot_profiles {
            if profile.videos.min > profile.videos.max {
                return Err(GeneratorError::Configuration(format!(
                    "slot video range is inverted ({}..={})",
                    profile.videos.min, profile.videos.max
                )));
            }
        }
        Ok(())
    }

    /// Slot profile for `slot`, reusing the last entry for overflow slots.
    pub fn slot_profile(&self, slot: usize) -> SlotProfile {
        self.slot_profiles
            .get(slot)
            .or_else(|| self.slot_profiles.last())
            .copied()
            .unwrap_or(SlotProfile::new(2, 200, 400))
    }

    /// Last day of the analysis window.
    pub fn window_end(&self) -> NaiveDate {
        self.now.date_naive()
    }

    /// First day of the analysis window, clamped to the earliest
    /// representable date for windows `validate` would reject.
    pub fn window_start(&self) -> NaiveDate {
        self.checked_window_start().unwrap_or(NaiveDate::MIN)
    }

    fn checked_window_start(&self) -> Option<NaiveDate> {
        self.window_end()
            .checked_sub_days(Days::new(u64::from(self.window.days())))
    }

    /// Display name for `code`, or the code itself when unknown.
    pub fn country_name(&self, code: &str) -> String {
        self.country_names
            .get(code)
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }
}
