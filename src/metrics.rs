use chrono::NaiveDate;

use crate::config::AnalysisWindow;
use crate::constants::reach::{ESTIMATED_TOTAL_RATIO, INSTAGRAM_REELS_RATIO, YOUTUBE_SHORTS_RATIO};
use crate::dataset::{AggregateMetrics, PlatformReach, TimelineSummary, Trend, TrendPhase};
use crate::utils::round_to;

/// Cross-platform reach projected from the primary platform's views.
pub fn platform_reach(total_views: u64) -> PlatformReach {
    let project = |ratio: f64| (total_views as f64 * ratio).round() as u64;
    PlatformReach {
        tiktok: total_views,
        instagram_reels: project(INSTAGRAM_REELS_RATIO),
        youtube_shorts: project(YOUTUBE_SHORTS_RATIO),
        estimated_total: project(ESTIMATED_TOTAL_RATIO),
    }
}

/// Index of the first entry with the most views.
pub fn peak_index(views: &[u64]) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;
    for (idx, value) in views.iter().enumerate() {
        if best.is_none_or(|(_, top)| *value > top) {
            best = Some((idx, *value));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Roll per-trend numbers into the dataset-level summary.
/// `total_videos` is the sum of `detected_videos`; the peak trend is the
/// first trend with the highest total views.
pub fn aggregate_metrics(
    trends: &[Trend],
    window: AnalysisWindow,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> AggregateMetrics {
    let total_videos: u64 = trends.iter().map(|trend| trend.detected_videos).sum();
    let views: Vec<u64> = trends
        .iter()
        .map(|trend| trend.engagement_stats.total_views)
        .collect();
    let total_views: u64 = views.iter().sum();
    let avg_virality = if trends.is_empty() {
        0.0
    } else {
        let levels: u32 = trends
            .iter()
            .map(|trend| u32::from(trend.virality_level.level()))
            .sum();
        round_to(f64::from(levels) / trends.len() as f64, 1)
    };
    let peak_trend = peak_index(&views)
        .and_then(|idx| trends.get(idx))
        .map(|trend| trend.name.clone())
        .unwrap_or_default();

    AggregateMetrics {
        total_trends: trends.len(),
        total_videos,
        total_views,
        avg_virality,
        platform_reach: platform_reach(total_views),
        timeline_summary: TimelineSummary {
            analysis_period: window.label(),
            start_date,
            end_date,
            peak_trend,
            trend_phases: trends
                .iter()
                .map(|trend| TrendPhase {
                    name: trend.name.clone(),
                    phase: trend.active_date_range.current_phase,
                })
                .collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reach_uses_fixed_ratios() {
        let reach = platform_reach(1_000_000);
        assert_eq!(reach.tiktok, 1_000_000);
        assert_eq!(reach.instagram_reels, 400_000);
        assert_eq!(reach.youtube_shorts, 250_000);
        assert_eq!(reach.estimated_total, 1_650_000);
    }

    #[test]
    fn peak_prefers_first_maximum() {
        assert_eq!(peak_index(&[5, 9, 9, 1]), Some(1));
        assert_eq!(peak_index(&[3]), Some(0));
        assert_eq!(peak_index(&[]), None);
    }

    #[test]
    fn empty_trend_list_aggregates_to_zero() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let metrics = aggregate_metrics(&[], AnalysisWindow::Days30, day, day);
        assert_eq!(metrics.total_trends, 0);
        assert_eq!(metrics.total_videos, 0);
        assert_eq!(metrics.avg_virality, 0.0);
        assert!(metrics.timeline_summary.peak_trend.is_empty());
        assert_eq!(metrics.timeline_summary.analysis_period, "30 days");
    }
}
