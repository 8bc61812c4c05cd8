#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command-line entry point shared by the `trendgen` binary.
pub mod cli;
/// Generation configuration types.
pub mod config;
/// Centralized constants used across generation stages.
pub mod constants;
/// Serialized dataset types.
pub mod dataset;
/// Normalized distributions and the demographic, archetype, and regional builders.
pub mod distribution;
/// Trend dataset generator.
pub mod generator;
mod hash;
/// Aggregate metrics helpers.
pub mod metrics;
/// Research notes parsing and merging.
pub mod research;
/// Deterministic random number generation.
pub mod rng;
/// Weekly rollups and engagement statistics.
pub mod rollup;
/// Daily series synthesis and lifecycle classification.
pub mod series;
/// Trend templates and text rendering.
pub mod templates;
/// Input and output transports (filesystem today).
pub mod transport;
/// Shared type aliases.
pub mod types;
/// Text and number formatting helpers.
pub mod utils;

mod errors;

pub use config::{AnalysisWindow, GeneratorConfig, SeriesPolicy};
pub use dataset::{AggregateMetrics, Dataset, Trend};
pub use distribution::{DistributionMap, normalize};
pub use errors::GeneratorError;
pub use generator::TrendGenerator;
pub use research::{ResearchRecord, merge_records, parse_research_notes, parse_research_notes_with};
pub use rng::DeterministicRng;
pub use rollup::{EngagementStats, WeeklySummary, weekly_rollup};
pub use series::{
    DailyPoint, LifecyclePhase, MomentumStatus, ViralityTier, generate_series, rescale,
};
pub use templates::{TemplateCatalog, TrendTemplate};
pub use types::{BucketLabel, CategoryId, Hashtag, MoodKeyword, PlatformId, RegionCode};
