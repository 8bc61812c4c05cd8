use chrono::{Duration, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{CountRange, SeriesPolicy, ValueRange};
use crate::constants::series::{
    CHALLENGE_DECAY, CHALLENGE_MARKER, DANCE_DECAY, DANCE_MARKER, DECLINE_START_SHARE,
    DEFAULT_DECAY, DISCOVERY_START_SHARE, PEAK_PLATEAU_DECAY,
};

/// Virality level 1-5 controlling curve shape and scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViralityTier(u8);

impl ViralityTier {
    /// Lowest tier.
    pub const MIN: u8 = 1;
    /// Highest tier.
    pub const MAX: u8 = 5;

    /// Build a tier, clamping out-of-range levels into `1..=5`.
    pub const fn new(level: u8) -> Self {
        let level = if level < Self::MIN {
            Self::MIN
        } else if level > Self::MAX {
            Self::MAX
        } else {
            level
        };
        Self(level)
    }

    /// Numeric level in `1..=5`.
    pub const fn level(self) -> u8 {
        self.0
    }

    /// Tiers 4 and 5 behave as viral trends.
    pub const fn is_viral(self) -> bool {
        self.0 >= 4
    }
}

/// Share of the active window spent in each lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseFractions {
    /// Share spent discovering the audio.
    pub discovery: f64,
    /// Share spent ramping toward the peak.
    pub growth: f64,
    /// Share spent on the peak plateau.
    pub peak: f64,
    /// Share spent declining.
    pub decline: f64,
}

/// Scale constants and phase split fixed by a virality tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierProfile {
    /// Share of active days per phase.
    pub phases: PhaseFractions,
    /// Videos per day at the end of discovery.
    pub discovery_base: CountRange,
    /// Peak value as a multiple of the discovery base.
    pub peak_multiplier: ValueRange,
    /// Average views earned by each detected video.
    pub views_per_video: CountRange,
}

impl TierProfile {
    /// Profile for `tier`; tiers 1 and 2 share the low profile.
    pub fn for_tier(tier: ViralityTier) -> Self {
        match tier.level() {
            4.. => Self {
                phases: PhaseFractions {
                    discovery: 0.10,
                    growth: 0.20,
                    peak: 0.25,
                    decline: 0.45,
                },
                discovery_base: CountRange::new(5, 15),
                peak_multiplier: ValueRange::new(8.0, 12.0),
                views_per_video: CountRange::new(30_000, 50_000),
            },
            3 => Self {
                phases: PhaseFractions {
                    discovery: 0.15,
                    growth: 0.25,
                    peak: 0.20,
                    decline: 0.40,
                },
                discovery_base: CountRange::new(3, 10),
                peak_multiplier: ValueRange::new(5.0, 8.0),
                views_per_video: CountRange::new(10_000, 25_000),
            },
            _ => Self {
                phases: PhaseFractions {
                    discovery: 0.25,
                    growth: 0.30,
                    peak: 0.30,
                    decline: 0.15,
                },
                discovery_base: CountRange::new(2, 5),
                peak_multiplier: ValueRange::new(3.0, 5.0),
                views_per_video: CountRange::new(2_000, 8_000),
            },
        }
    }
}

/// Lifecycle stage of a trend's daily curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Early adopters find the audio.
    Discovery,
    /// Accelerating uptake.
    Growth,
    /// Plateau near the highest daily count.
    Peak,
    /// Tail-off after the peak.
    Decline,
}

/// Contiguous day spans of the four phases over one active window.
///
/// Discovery, growth, and peak lengths are truncated from their fractions;
/// whatever remains belongs to decline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhasePlan {
    /// Days in discovery.
    pub discovery: usize,
    /// Days in growth.
    pub growth: usize,
    /// Days on the peak.
    pub peak: usize,
    /// Days in decline.
    pub decline: usize,
}

impl PhasePlan {
    /// Split `num_days` by `fractions`.
    pub fn new(fractions: &PhaseFractions, num_days: usize) -> Self {
        let span = |fraction: f64| (num_days as f64 * fraction.max(0.0)) as usize;
        let discovery = span(fractions.discovery).min(num_days);
        let growth = span(fractions.growth).min(num_days - discovery);
        let peak = span(fractions.peak).min(num_days - discovery - growth);
        Self {
            discovery,
            growth,
            peak,
            decline: num_days - discovery - growth - peak,
        }
    }

    /// Sum of all phase lengths; always the planned day count.
    pub fn total_days(&self) -> usize {
        self.discovery + self.growth + self.peak + self.decline
    }

    /// Phase of `day` and the fractional progress through it (`0.0..=1.0`).
    pub fn locate(&self, day: usize) -> (Phase, f64) {
        let spans = [
            (Phase::Discovery, self.discovery),
            (Phase::Growth, self.growth),
            (Phase::Peak, self.peak),
        ];
        let mut start = 0;
        for (phase, len) in spans {
            if day < start + len {
                return (phase, phase_progress(day - start, len));
            }
            start += len;
        }
        (
            Phase::Decline,
            phase_progress(day.saturating_sub(start), self.decline),
        )
    }
}

fn phase_progress(offset: usize, len: usize) -> f64 {
    if len == 0 {
        return 1.0;
    }
    (offset as f64 / len as f64).clamp(0.0, 1.0)
}

/// Decline curve chosen from the trend category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecayCurve {
    /// Dance-like content fades slowly.
    Gradual,
    /// Challenge-like content drops off early.
    FrontLoaded,
    /// Everything else declines linearly.
    Linear,
}

impl DecayCurve {
    /// Curve for `category`, matched by substring.
    pub fn for_category(category: &str) -> Self {
        let category = category.to_lowercase();
        if category.contains(DANCE_MARKER) {
            Self::Gradual
        } else if category.contains(CHALLENGE_MARKER) {
            Self::FrontLoaded
        } else {
            Self::Linear
        }
    }

    /// Decay multiplier at `progress` (0 to 1) through the decline.
    pub fn factor(self, progress: f64) -> f64 {
        match self {
            Self::Gradual => 1.0 - DANCE_DECAY * progress,
            Self::FrontLoaded => 1.0 - CHALLENGE_DECAY * progress.sqrt(),
            Self::Linear => 1.0 - DEFAULT_DECAY * progress,
        }
    }
}

/// Phase model for one trend: base and peak levels plus its decay curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveShape {
    /// Videos per day at the end of discovery.
    pub discovery_base: f64,
    /// Videos per day at the start of the peak.
    pub peak_value: f64,
    /// Curve used in the decline phase.
    pub decay: DecayCurve,
}

impl CurveShape {
    /// Draw base and peak levels from `profile`.
    pub fn draw<R: Rng + ?Sized>(profile: &TierProfile, category: &str, rng: &mut R) -> Self {
        let discovery_base = profile.discovery_base.sample(rng) as f64;
        let peak_value = discovery_base * profile.peak_multiplier.sample(rng);
        Self {
            discovery_base,
            peak_value,
            decay: DecayCurve::for_category(category),
        }
    }

    /// Noise-free activity level at `progress` through `phase`.
    pub fn value_at(&self, phase: Phase, progress: f64) -> f64 {
        match phase {
            Phase::Discovery => {
                self.discovery_base * (DISCOVERY_START_SHARE + (1.0 - DISCOVERY_START_SHARE) * progress)
            }
            Phase::Growth => {
                self.discovery_base + (self.peak_value - self.discovery_base) * progress.powi(2)
            }
            Phase::Peak => self.peak_value * (1.0 - PEAK_PLATEAU_DECAY * progress),
            Phase::Decline => self.peak_value * DECLINE_START_SHARE * self.decay.factor(progress),
        }
    }
}

/// Detected-video count for one calendar day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPoint {
    /// Calendar day.
    pub date: NaiveDate,
    /// Detected videos that day.
    pub value: u64,
}

/// Generate one daily point per active day, starting at `start_date`.
///
/// A zero-day request still yields a single day; every value is at least 1.
pub fn generate_series<R: Rng + ?Sized>(
    tier: ViralityTier,
    start_date: NaiveDate,
    num_days: usize,
    category: &str,
    policy: &SeriesPolicy,
    rng: &mut R,
) -> Vec<DailyPoint> {
    let num_days = num_days.max(1);
    let profile = TierProfile::for_tier(tier);
    let plan = PhasePlan::new(&profile.phases, num_days);
    let curve = CurveShape::draw(&profile, category, rng);

    let mut series = Vec::with_capacity(num_days);
    for day in 0..num_days {
        let date = start_date + Duration::days(day as i64);
        let (phase, progress) = plan.locate(day);
        let base_value = curve.value_at(phase, progress);
        let day_multiplier = policy.weekly.multiplier(date, rng);
        let daily_noise = policy.noise.sample(rng);
        let value = (base_value * day_multiplier * daily_noise).max(0.0) as u64;
        series.push(DailyPoint {
            date,
            value: value.max(1),
        });
    }
    series
}

/// Rescale `series` so its values sum to `target_total`.
///
/// Values are floored and clamped to 1, then the shortfall is handed out one
/// unit at a time by largest fractional remainder (ties go to earlier days).
/// Overshoot from clamping is taken back from days above 1. The sum is exact
/// whenever `target_total >= series.len()`; below that every day sits at the
/// minimum of 1.
pub fn rescale(series: &[DailyPoint], target_total: u64) -> Vec<DailyPoint> {
    let current: u64 = series.iter().map(|point| point.value).sum();
    if series.is_empty() {
        return Vec::new();
    }
    if current == 0 || target_total <= series.len() as u64 {
        return series
            .iter()
            .map(|point| DailyPoint {
                date: point.date,
                value: 1,
            })
            .collect();
    }

    let scale = target_total as f64 / current as f64;
    let mut scaled: Vec<(u64, f64)> = series
        .iter()
        .map(|point| {
            let exact = point.value as f64 * scale;
            let floor = exact.floor();
            ((floor as u64).max(1), exact - floor)
        })
        .collect();

    let assigned: u64 = scaled.iter().map(|(value, _)| value).sum();
    let mut order: Vec<usize> = (0..scaled.len()).collect();
    if assigned < target_total {
        order.sort_by(|&a, &b| scaled[b].1.total_cmp(&scaled[a].1).then(a.cmp(&b)));
        let deficit = (target_total - assigned) as usize;
        for idx in order.into_iter().cycle().take(deficit) {
            scaled[idx].0 += 1;
        }
    } else if assigned > target_total {
        // Clamping quiet days up to 1 overshot; take units back from the
        // days with the smallest remainders that can spare one.
        order.sort_by(|&a, &b| scaled[a].1.total_cmp(&scaled[b].1).then(a.cmp(&b)));
        let mut excess = assigned - target_total;
        while excess > 0 {
            for &idx in &order {
                if excess == 0 {
                    break;
                }
                if scaled[idx].0 > 1 {
                    scaled[idx].0 -= 1;
                    excess -= 1;
                }
            }
        }
    }

    series
        .iter()
        .zip(scaled)
        .map(|(point, (value, _))| DailyPoint {
            date: point.date,
            value,
        })
        .collect()
}

/// Coarse lifecycle label reported for a trend's position in the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LifecyclePhase {
    /// Under 15% of the window elapsed.
    Discovery,
    /// Under 40% elapsed.
    Growth,
    /// Under 60% elapsed.
    Peak,
    /// Under 80% elapsed.
    Decline,
    /// The rest of the window.
    #[serde(rename = "Fade-out")]
    FadeOut,
}

impl LifecyclePhase {
    /// Classify by the share of the window elapsed since the trend began.
    pub fn classify(elapsed_days: u32, window_days: u32) -> Self {
        let share = elapsed_share(elapsed_days, window_days);
        if share < 0.15 {
            Self::Discovery
        } else if share < 0.40 {
            Self::Growth
        } else if share < 0.60 {
            Self::Peak
        } else if share < 0.80 {
            Self::Decline
        } else {
            Self::FadeOut
        }
    }
}

/// Recommendation label shown alongside a trend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MomentumStatus {
    /// Just started.
    New,
    /// Gaining fast; viral tiers only.
    Rising,
    /// Worth joining now.
    Recommended,
    /// Past its prime.
    Dying,
}

impl MomentumStatus {
    /// Classify by elapsed share of the window and the tier.
    pub fn classify(tier: ViralityTier, elapsed_days: u32, window_days: u32) -> Self {
        let share = elapsed_share(elapsed_days, window_days);
        if share < 0.10 {
            Self::New
        } else if share < 0.40 && tier.is_viral() {
            Self::Rising
        } else if share < 0.60 {
            Self::Recommended
        } else {
            Self::Dying
        }
    }
}

fn elapsed_share(elapsed_days: u32, window_days: u32) -> f64 {
    f64::from(elapsed_days) / f64::from(window_days.max(1))
}
