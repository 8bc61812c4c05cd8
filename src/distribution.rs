use indexmap::IndexMap;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::config::{GeneratorConfig, ValueRange};
use crate::constants::normalization::{
    DEFAULT_FLOOR, DOMINANT_GENDER_SHARE, RECORD_JITTER, SHARE_DECIMALS,
};
use crate::constants::output::RACE_AND_ETHNICITY;
use crate::research::ResearchRecord;
use crate::types::{BucketLabel, RegionCode};
use crate::utils::round_to;

/// Unnormalized bucket weights in insertion order.
pub type RawWeights = IndexMap<BucketLabel, f64>;

/// Bucket -> fraction map whose values sum to 1.0 once normalized.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistributionMap(IndexMap<BucketLabel, f64>);

impl DistributionMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the share of `bucket`, keeping its original position.
    pub fn insert(&mut self, bucket: impl Into<BucketLabel>, share: f64) {
        self.0.insert(bucket.into(), share);
    }

    /// Share of `bucket`, if present.
    pub fn get(&self, bucket: &str) -> Option<f64> {
        self.0.get(bucket).copied()
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map holds no buckets.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Buckets and shares in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&BucketLabel, &f64)> {
        self.0.iter()
    }

    /// Sum of all shares.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// First bucket holding the largest share.
    pub fn argmax(&self) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (bucket, share) in &self.0 {
            if best.is_none_or(|(_, top)| *share > top) {
                best = Some((bucket.as_str(), *share));
            }
        }
        best
    }

    /// Borrow the shares as raw weights.
    pub fn as_weights(&self) -> &RawWeights {
        &self.0
    }
}

impl From<RawWeights> for DistributionMap {
    fn from(weights: RawWeights) -> Self {
        Self(weights)
    }
}

impl FromIterator<(BucketLabel, f64)> for DistributionMap {
    fn from_iter<I: IntoIterator<Item = (BucketLabel, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Normalize `raw` into shares summing to 1.0, each at least `floor`.
///
/// Negative and non-finite weights count as zero. An all-zero input yields an
/// empty map. Shares below the floor are pinned to it and the remaining mass
/// is spread over the other buckets in proportion to their weights. Shares are
/// rounded to three decimals and the rounding residual is folded into the
/// largest share, so a normalized map is a fixed point.
pub fn normalize(raw: &RawWeights, floor: f64) -> DistributionMap {
    let weights: Vec<f64> = raw
        .values()
        .map(|weight| {
            if weight.is_finite() && *weight > 0.0 {
                *weight
            } else {
                0.0
            }
        })
        .collect();
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || weights.is_empty() {
        return DistributionMap::new();
    }

    let count = weights.len();
    let floor = floor.max(0.0).min(1.0 / count as f64);
    let mut pinned = vec![false; count];
    let mut shares = vec![floor; count];
    loop {
        let pinned_count = pinned.iter().filter(|is_pinned| **is_pinned).count();
        let free_mass = 1.0 - floor * pinned_count as f64;
        let free_weight: f64 = weights
            .iter()
            .zip(&pinned)
            .filter(|(_, is_pinned)| !**is_pinned)
            .map(|(weight, _)| weight)
            .sum();
        let mut changed = false;
        for idx in 0..count {
            if pinned[idx] {
                continue;
            }
            let share = if free_weight > 0.0 {
                weights[idx] / free_weight * free_mass
            } else {
                0.0
            };
            if share < floor {
                pinned[idx] = true;
                shares[idx] = floor;
                changed = true;
            } else {
                shares[idx] = share;
            }
        }
        if !changed {
            break;
        }
    }

    let mut rounded: Vec<f64> = shares
        .iter()
        .map(|share| round_to(*share, SHARE_DECIMALS))
        .collect();
    let residual = round_to(1.0 - rounded.iter().sum::<f64>(), SHARE_DECIMALS);
    if residual != 0.0 {
        let mut largest = 0;
        for idx in 1..count {
            if rounded[idx] > rounded[largest] {
                largest = idx;
            }
        }
        rounded[largest] = round_to(rounded[largest] + residual, SHARE_DECIMALS);
    }

    raw.keys().cloned().zip(rounded).collect()
}

/// Jitter a distribution carried by the research notes, or fall back to
/// `default_weights` when the notes have none.
pub fn seed_from_record_or_default<R, F>(
    record_value: Option<&DistributionMap>,
    rng: &mut R,
    default_weights: F,
) -> DistributionMap
where
    R: Rng + ?Sized,
    F: FnOnce(&mut R) -> RawWeights,
{
    match record_value.filter(|distribution| !distribution.is_empty()) {
        Some(distribution) => {
            let jittered: RawWeights = distribution
                .iter()
                .map(|(bucket, share)| {
                    let variation = rng.random_range(-RECORD_JITTER..RECORD_JITTER) * share;
                    (bucket.clone(), (share + variation).max(DEFAULT_FLOOR))
                })
                .collect();
            normalize(&jittered, DEFAULT_FLOOR)
        }
        None => normalize(&default_weights(rng), DEFAULT_FLOOR),
    }
}

/// Draw one weight per bucket from its range.
pub fn sample_weights<R: Rng + ?Sized>(table: &[(&str, ValueRange)], rng: &mut R) -> RawWeights {
    table
        .iter()
        .map(|(bucket, range)| (bucket.to_string(), range.sample(rng)))
        .collect()
}

static YOUTH_AGE_SKEW: [(&str, ValueRange); 5] = [
    ("13-17", ValueRange::new(0.25, 0.35)),
    ("18-24", ValueRange::new(0.35, 0.45)),
    ("25-34", ValueRange::new(0.15, 0.25)),
    ("35-44", ValueRange::new(0.05, 0.10)),
    ("45+", ValueRange::new(0.02, 0.05)),
];

static BROAD_AGE_SPREAD: [(&str, ValueRange); 5] = [
    ("13-17", ValueRange::new(0.10, 0.20)),
    ("18-24", ValueRange::new(0.30, 0.40)),
    ("25-34", ValueRange::new(0.25, 0.35)),
    ("35-44", ValueRange::new(0.10, 0.20)),
    ("45+", ValueRange::new(0.05, 0.10)),
];

static FEMALE_SKEW: [(&str, ValueRange); 3] = [
    ("female", ValueRange::new(0.70, 0.85)),
    ("male", ValueRange::new(0.10, 0.25)),
    ("other", ValueRange::new(0.03, 0.08)),
];

static BALANCED_GENDER: [(&str, ValueRange); 3] = [
    ("female", ValueRange::new(0.45, 0.55)),
    ("male", ValueRange::new(0.40, 0.50)),
    ("other", ValueRange::new(0.03, 0.08)),
];

/// Age ranges for a category: dance and challenge content skews young.
pub fn age_table(category: &str) -> &'static [(&'static str, ValueRange)] {
    let category = category.to_lowercase();
    if category.contains("dance") || category.contains("challenge") {
        &YOUTH_AGE_SKEW
    } else {
        &BROAD_AGE_SPREAD
    }
}

/// Gender ranges for a category: fashion and transformation skew female.
pub fn gender_table(category: &str) -> &'static [(&'static str, ValueRange)] {
    let category = category.to_lowercase();
    if category.contains("fashion") || category.contains("transformation") {
        &FEMALE_SKEW
    } else {
        &BALANCED_GENDER
    }
}

/// Dominant gender reported next to a split.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum GenderLabel {
    /// Female share above the dominance threshold.
    Female,
    /// Male share above the dominance threshold.
    Male,
    /// Neither share dominates.
    Mixed,
}

impl GenderLabel {
    /// Label for `split`, using the female then male share.
    pub fn from_split(split: &DistributionMap) -> Self {
        if split.get("female").unwrap_or(0.0) > DOMINANT_GENDER_SHARE {
            Self::Female
        } else if split.get("male").unwrap_or(0.0) > DOMINANT_GENDER_SHARE {
            Self::Male
        } else {
            Self::Mixed
        }
    }
}

/// Audience breakdown attached to every trend.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Demographics {
    /// Bucket with the largest age share.
    pub age_range: BucketLabel,
    /// Age bucket shares.
    pub age_distribution: DistributionMap,
    /// Confidence in the age split.
    pub age_confidence: f64,
    /// Dominant gender label.
    pub gender: GenderLabel,
    /// Gender shares.
    pub gender_split: DistributionMap,
    /// Confidence in the gender split.
    pub gender_confidence: f64,
    /// Ethnicity labels reported for every trend.
    pub race_and_ethnicity: Vec<String>,
    /// Confidence in the ethnicity labels.
    pub race_ethnicity_confidence: f64,
}

/// Audience breakdown for one trend, seeded from the notes when they carry demographics.
pub fn generate_demographics<R: Rng + ?Sized>(
    record: &ResearchRecord,
    category: &str,
    rng: &mut R,
) -> Demographics {
    let age_distribution = seed_from_record_or_default(record.age_distribution.as_ref(), rng, |rng| {
        sample_weights(age_table(category), rng)
    });
    let age_range = age_distribution
        .argmax()
        .map(|(bucket, _)| bucket.to_string())
        .unwrap_or_else(|| "18-24".to_string());
    let age_confidence = round_to(ValueRange::new(0.65, 0.85).sample(rng), 3);

    let gender_split =
        seed_from_record_or_default(record.gender_distribution.as_ref(), rng, |rng| {
            sample_weights(gender_table(category), rng)
        });
    let gender = GenderLabel::from_split(&gender_split);
    let gender_confidence = round_to(ValueRange::new(0.70, 0.90).sample(rng), 3);

    Demographics {
        age_range,
        age_distribution,
        age_confidence,
        gender,
        gender_split,
        gender_confidence,
        race_and_ethnicity: RACE_AND_ETHNICITY.iter().map(|label| label.to_string()).collect(),
        race_ethnicity_confidence: round_to(ValueRange::new(0.75, 0.95).sample(rng), 3),
    }
}

/// Creator archetype ranges keyed by the trend category.
pub fn archetype_table(category: &str) -> [(&'static str, ValueRange); 4] {
    let category = category.to_lowercase();
    if category.contains("dance") {
        [
            ("Relationship", ValueRange::new(0.40, 0.45)),
            ("Dancer", ValueRange::new(0.25, 0.30)),
            ("Lifestyle", ValueRange::new(0.15, 0.20)),
            ("Beauty", ValueRange::new(0.08, 0.12)),
        ]
    } else if category.contains("storytelling") {
        [
            ("Lifestyle", ValueRange::new(0.38, 0.43)),
            ("Relationship", ValueRange::new(0.25, 0.30)),
            ("Dancer", ValueRange::new(0.15, 0.20)),
            ("Beauty", ValueRange::new(0.10, 0.15)),
        ]
    } else if category.contains("transformation") {
        [
            ("Beauty", ValueRange::new(0.45, 0.50)),
            ("Lifestyle", ValueRange::new(0.25, 0.30)),
            ("Dancer", ValueRange::new(0.12, 0.17)),
            ("Relationship", ValueRange::new(0.08, 0.12)),
        ]
    } else {
        [
            ("Lifestyle", ValueRange::new(0.30, 0.35)),
            ("Beauty", ValueRange::new(0.25, 0.30)),
            ("Dancer", ValueRange::new(0.20, 0.25)),
            ("Relationship", ValueRange::new(0.15, 0.20)),
        ]
    }
}

/// Normalized creator archetype shares for `category`.
pub fn creator_archetypes<R: Rng + ?Sized>(category: &str, rng: &mut R) -> DistributionMap {
    normalize(&sample_weights(&archetype_table(category), rng), DEFAULT_FLOOR)
}

/// One row of a trend's regional split.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegionShare {
    /// Region code.
    pub code: RegionCode,
    /// Display name of the region.
    pub country: String,
    /// Share of the trend's activity.
    pub percentage: f64,
    /// Videos attributed to the region.
    pub video_count: u64,
    /// Mean engagement rate in the region.
    pub avg_engagement_rate: f64,
}

/// Regional split for a song, sorted by descending share.
///
/// A genre matching an affinity group uses that group's priority list and
/// weight ranges; otherwise a random subset of the configured regions gets
/// open-market weights.
pub fn regional_distribution<R: Rng + ?Sized>(
    genre: Option<&str>,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Vec<RegionShare> {
    let policy = &config.regional;
    let limit = policy.regions_per_trend.max(1);
    let affinity = genre.and_then(|genre| policy.affinity_for(genre));

    let weighted: Vec<(RegionCode, f64)> = match affinity {
        Some(group) => group
            .priority
            .iter()
            .take(limit)
            .map(|(code, range)| (code.clone(), range.sample(rng)))
            .collect(),
        None => {
            let picked: Vec<RegionCode> = config
                .regions
                .choose_multiple(rng, limit.min(config.regions.len()))
                .cloned()
                .collect();
            picked
                .into_iter()
                .map(|code| {
                    let weight = policy.open_market_weight.sample(rng);
                    (code, weight)
                })
                .collect()
        }
    };

    let raw: RawWeights = weighted.into_iter().collect();
    let shares = normalize(&raw, DEFAULT_FLOOR);

    let mut rows: Vec<RegionShare> = shares
        .iter()
        .map(|(code, share)| {
            let market = match affinity {
                Some(group) if group.is_primary_market(code) => group.primary_market,
                _ => policy.standard_market,
            };
            RegionShare {
                code: code.clone(),
                country: config.country_name(code),
                percentage: *share,
                video_count: market.video_count.sample(rng),
                avg_engagement_rate: round_to(market.engagement_rate.sample(rng), 3),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::DeterministicRng;

    fn weights(pairs: &[(&str, f64)]) -> RawWeights {
        pairs
            .iter()
            .map(|(bucket, weight)| (bucket.to_string(), *weight))
            .collect()
    }

    fn assert_normalized(map: &DistributionMap) {
        assert!((map.total() - 1.0).abs() <= 0.01, "sum was {}", map.total());
        for (bucket, share) in map.iter() {
            assert!(*share >= DEFAULT_FLOOR, "{bucket} fell below the floor");
        }
    }

    #[test]
    fn normalize_divides_by_total() {
        let map = normalize(&weights(&[("a", 1.0), ("b", 3.0)]), DEFAULT_FLOOR);
        assert_eq!(map.get("a"), Some(0.25));
        assert_eq!(map.get("b"), Some(0.75));
    }

    #[test]
    fn normalize_lifts_tiny_shares_to_floor() {
        let map = normalize(&weights(&[("big", 100.0), ("zero", 0.0), ("neg", -4.0)]), 0.01);
        assert_eq!(map.get("zero"), Some(0.01));
        assert_eq!(map.get("neg"), Some(0.01));
        assert_eq!(map.get("big"), Some(0.98));
        assert_normalized(&map);
    }

    #[test]
    fn normalize_all_zero_returns_empty() {
        assert!(normalize(&weights(&[("a", 0.0), ("b", 0.0)]), 0.01).is_empty());
        assert!(normalize(&RawWeights::new(), 0.01).is_empty());
    }

    #[test]
    fn normalize_is_a_fixed_point() {
        let once = normalize(&weights(&[("x", 0.3), ("y", 0.5), ("z", 0.21)]), 0.01);
        let twice = normalize(once.as_weights(), 0.01);
        assert_eq!(once, twice);
    }

    #[test]
    fn normalize_keeps_input_order() {
        let map = normalize(&weights(&[("z", 1.0), ("a", 2.0), ("m", 3.0)]), 0.01);
        let keys: Vec<&str> = map.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn record_distribution_is_jittered_not_replaced() {
        let mut record = DistributionMap::new();
        record.insert("female", 0.8);
        record.insert("male", 0.2);
        let mut rng = DeterministicRng::new(4);
        let seeded = seed_from_record_or_default(Some(&record), &mut rng, |_| {
            panic!("default generator must not run when the notes carry a split")
        });
        assert_normalized(&seeded);
        let female = seeded.get("female").unwrap();
        assert!((0.7..=0.9).contains(&female));
        assert_eq!(GenderLabel::from_split(&seeded), GenderLabel::Female);
    }

    #[test]
    fn default_tables_follow_category() {
        let mut rng = DeterministicRng::new(9);
        let youth = normalize(&sample_weights(age_table("dance"), &mut rng), 0.01);
        assert_eq!(youth.argmax().map(|(bucket, _)| bucket), Some("18-24"));
        let female = normalize(&sample_weights(gender_table("transformation"), &mut rng), 0.01);
        assert_eq!(GenderLabel::from_split(&female), GenderLabel::Female);
        assert_eq!(gender_table("lifestyle")[0].1, ValueRange::new(0.45, 0.55));
    }

    #[test]
    fn demographics_default_to_category_tables() {
        let mut rng = DeterministicRng::new(21);
        let demographics = generate_demographics(&ResearchRecord::default(), "storytelling", &mut rng);
        assert_normalized(&demographics.age_distribution);
        assert_normalized(&demographics.gender_split);
        assert_eq!(demographics.age_distribution.len(), 5);
        assert_eq!(demographics.gender, GenderLabel::Mixed);
        assert!((0.65..=0.85).contains(&demographics.age_confidence));
        assert_eq!(demographics.race_and_ethnicity.len(), 5);
    }

    #[test]
    fn archetypes_lead_with_category_specialists() {
        let mut rng = DeterministicRng::new(2);
        let dance = creator_archetypes("dance", &mut rng);
        assert_eq!(dance.argmax().map(|(bucket, _)| bucket), Some("Relationship"));
        let glow = creator_archetypes("transformation", &mut rng);
        assert_eq!(glow.argmax().map(|(bucket, _)| bucket), Some("Beauty"));
        assert_normalized(&glow);
    }

    #[test]
    fn affinity_genre_puts_priority_region_first() {
        let config = GeneratorConfig::default();
        for seed in 0..16 {
            let mut rng = DeterministicRng::new(seed);
            let rows = regional_distribution(Some("Regional Mexican"), &config, &mut rng);
            assert_eq!(rows.len(), 5);
            assert_eq!(rows[0].code, "MX");
            assert_eq!(rows[0].country, "Mexico");
            assert!(rows[1..].iter().all(|row| row.percentage < rows[0].percentage));
            assert!((100..=500).contains(&rows[0].video_count));
        }
    }

    #[test]
    fn open_market_split_is_sorted_and_normalized() {
        let config = GeneratorConfig::default();
        let mut rng = DeterministicRng::new(5);
        let rows = regional_distribution(Some("Pop"), &config, &mut rng);
        assert_eq!(rows.len(), 5);
        let total: f64 = rows.iter().map(|row| row.percentage).sum();
        assert!((total - 1.0).abs() <= 0.01);
        assert!(rows.windows(2).all(|pair| pair[0].percentage >= pair[1].percentage));
        assert!(rows.iter().all(|row| (20..=100).contains(&row.video_count)));
    }
}
