//! Serializable shape of a generated dataset.
//!
//! Field names follow the JSON contract consumed downstream; structs here
//! carry no behavior beyond serialization.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::distribution::{Demographics, DistributionMap, RegionShare};
use crate::rollup::{EngagementStats, WeeklySummary};
use crate::series::{DailyPoint, LifecyclePhase, MomentumStatus, ViralityTier};
use crate::templates::{CreativeAnalysis, CreativeBrief};
use crate::types::{Hashtag, PlatformId};

/// Root aggregate written once per run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dataset {
    /// Title, artist, and identifiers of the analyzed song.
    pub song_metadata: SongMetadata,
    /// Streaming-service figures for the song.
    pub spotify_data: StreamingStats,
    /// Trends in slot order; slot 0 is the recommended one.
    pub trends: Vec<Trend>,
    /// Cross-trend totals and timeline.
    pub aggregate_metrics: AggregateMetrics,
    /// Timestamp the analysis window ends at.
    pub generated_at: DateTime<Utc>,
    /// Schema version of this layout.
    pub data_version: String,
}

/// Song-level metadata reported alongside the trends.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SongMetadata {
    /// Song title from the notes.
    pub title: String,
    /// Artist from the notes.
    pub artist: String,
    /// Platform id of the song's audio.
    pub music_id: PlatformId,
    /// Track length in milliseconds.
    pub duration_ms: u64,
    /// Synthetic release date before the window end.
    pub release_date: NaiveDate,
    /// Genre from the notes, or a fallback pick.
    pub genre: String,
}

/// Streaming-service figures for the song.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StreamingStats {
    /// Alphanumeric track id.
    pub spotify_id: String,
    /// Lifetime stream count.
    pub total_streams: u64,
    /// Streams on an average day.
    pub daily_streams: u64,
    /// Unique listeners in the last month.
    pub monthly_listeners: u64,
    /// Times the track was added to a playlist.
    pub playlist_adds: u64,
    /// Share of listeners who saved the track.
    pub save_rate: f64,
    /// Share of plays skipped early.
    pub skip_rate: f64,
    /// Share of listeners who replayed the track.
    pub replay_rate: f64,
    /// Where listeners found the track.
    pub discovery_source: DistributionMap,
}

/// One synthetic trend with its curve, audience, and creative copy.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trend {
    /// Rendered trend name.
    pub name: String,
    /// One-line summary.
    pub summary: String,
    /// Longer description of the format.
    pub description: String,
    /// Virality tier of the slot.
    pub virality_level: ViralityTier,
    /// Momentum at the end of the window.
    pub momentum_status: MomentumStatus,
    /// Whether this trend is the one to join.
    pub recommended: bool,
    /// Sum of `count_by_date`.
    pub detected_videos: u64,
    /// Synthetic example videos, most played first.
    pub top_examples: Vec<VideoExample>,
    /// Per-video engagement figures.
    pub engagement_stats: EngagementStats,
    /// Audience age and gender split.
    pub demographics: Demographics,
    /// Creator archetype shares.
    pub creator_archetypes: DistributionMap,
    /// Regions in priority order with their shares.
    pub regional_distribution: Vec<RegionShare>,
    /// Content formats the trend covers.
    pub type_of_content: Vec<String>,
    /// Confidence in `type_of_content`.
    pub content_type_confidence: f64,
    /// Why the trend works.
    pub creative_analysis: CreativeAnalysis,
    /// How to join the trend.
    pub creative_brief: CreativeBrief,
    /// When the trend was active.
    pub active_date_range: ActiveDateRange,
    /// Daily video counts.
    pub count_by_date: Vec<DailyPoint>,
    /// Seven-day rollups of `count_by_date`.
    pub weekly_summary: Vec<WeeklySummary>,
    /// Ordered, de-duplicated hashtags.
    pub trending_hashtags: Vec<Hashtag>,
    /// Audio cues creators sync to.
    pub audio_features: AudioFeatures,
    /// Real reference video, lead trend only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_creative_example: Option<CreativeExample>,
}

/// Synthetic example video for a trend.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VideoExample {
    /// Video id.
    pub id: PlatformId,
    /// Creator id.
    pub author_uid: PlatformId,
    /// Audio id shared with the song metadata.
    pub music_id: PlatformId,
    /// Caption.
    pub desc: String,
    /// Public link to the video.
    pub share_url: String,
    /// Unix timestamp in seconds.
    pub create_time: i64,
    /// Region the video was posted from.
    pub region: String,
    /// Thumbnail link.
    pub thumbnail: String,
    /// Engagement counters.
    pub statistics: VideoStatistics,
}

/// Counters reported for an example video.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct VideoStatistics {
    /// Plays.
    pub play_count: u64,
    /// Shares.
    pub share_count: u64,
    /// Comments.
    pub comment_count: u64,
    /// Likes.
    pub like_count: u64,
}

/// Days a trend was active; `end_date` is the last day in `count_by_date`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActiveDateRange {
    /// First active day.
    pub start_date: NaiveDate,
    /// Last active day.
    pub end_date: NaiveDate,
    /// Number of active days.
    pub days_active: u32,
    /// Lifecycle phase at the end of the active range.
    pub current_phase: LifecyclePhase,
}

/// Audio cues for a trend.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AudioFeatures {
    /// Tempo in beats per minute.
    pub bpm: u32,
    /// Timestamps creators sync to.
    pub key_moments: Vec<String>,
    /// Dominant mood.
    pub mood: String,
}

/// Real-world reference video attached to the lead trend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreativeExample {
    /// What happens in the video.
    pub description: String,
    /// Link to the video.
    pub video_url: String,
    /// Reported engagement.
    pub engagement: CreativeEngagement,
}

/// Engagement counters of a creative example.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreativeEngagement {
    /// Views.
    pub views: u64,
    /// Likes.
    pub likes: u64,
    /// Shares.
    pub shares: u64,
}

/// Cross-trend totals.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AggregateMetrics {
    /// Number of trends.
    pub total_trends: usize,
    /// Detected videos across all trends.
    pub total_videos: u64,
    /// Views across all trends.
    pub total_views: u64,
    /// Mean virality tier.
    pub avg_virality: f64,
    /// Estimated views by platform.
    pub platform_reach: PlatformReach,
    /// Window bounds and per-trend phases.
    pub timeline_summary: TimelineSummary,
}

/// Views projected onto other short-video platforms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PlatformReach {
    /// Views measured on the source platform.
    pub tiktok: u64,
    /// Projected Instagram Reels views.
    pub instagram_reels: u64,
    /// Projected YouTube Shorts views.
    pub youtube_shorts: u64,
    /// Projected views across all platforms.
    pub estimated_total: u64,
}

/// Analysis window and where each trend stands in it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelineSummary {
    /// Window label, e.g. `30 days`.
    pub analysis_period: String,
    /// First day of the window.
    pub start_date: NaiveDate,
    /// Last day of the window.
    pub end_date: NaiveDate,
    /// Name of the trend with the most total views.
    pub peak_trend: String,
    /// Phase of each trend at the window end.
    pub trend_phases: Vec<TrendPhase>,
}

/// Lifecycle phase of one named trend.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrendPhase {
    /// Trend name.
    pub name: String,
    /// Phase at the window end.
    pub phase: LifecyclePhase,
}
