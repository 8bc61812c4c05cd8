use chrono::NaiveDate;
use serde::Serialize;

use crate::constants::engagement::{
    COMMENTS_RATIO, LIKES_RATIO, MEDIAN_VIEWS_RATIO, SHARES_RATIO, TOTAL_ENGAGEMENT_RATIO,
};
use crate::constants::series::ROLLUP_WINDOW_DAYS;
use crate::series::DailyPoint;
use crate::utils::round_to;

/// Rollup of up to seven consecutive daily points.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeeklySummary {
    /// First day of the window.
    pub week_start: NaiveDate,
    /// Last day of the window.
    pub week_end: NaiveDate,
    /// Videos posted across the window.
    pub total_videos: u64,
    /// Mean videos per day, one decimal.
    pub avg_daily_videos: f64,
    /// Busiest day in the window.
    pub peak_day_videos: u64,
    /// Percent change against the previous window's total.
    pub growth_rate: f64,
}

/// Roll `series` into consecutive 7-day windows anchored at its first date.
///
/// The final window keeps whatever days remain (1 to 7).
pub fn weekly_rollup(series: &[DailyPoint]) -> Vec<WeeklySummary> {
    let mut summaries = Vec::with_capacity(series.len().div_ceil(ROLLUP_WINDOW_DAYS));
    let mut previous_total = None;
    for window in series.chunks(ROLLUP_WINDOW_DAYS) {
        let (Some(first), Some(last)) = (window.first(), window.last()) else {
            continue;
        };
        let total_videos: u64 = window.iter().map(|point| point.value).sum();
        let peak_day_videos = window.iter().map(|point| point.value).max().unwrap_or(0);
        summaries.push(WeeklySummary {
            week_start: first.date,
            week_end: last.date,
            total_videos,
            avg_daily_videos: round_to(total_videos as f64 / window.len() as f64, 1),
            peak_day_videos,
            growth_rate: week_over_week_growth(previous_total, total_videos),
        });
        previous_total = Some(total_videos);
    }
    summaries
}

/// Growth percentage of `current` over `previous`, rounded to one decimal.
///
/// `None` marks the first window and yields 0.0; a zero previous total yields
/// 100.0 when activity appeared and 0.0 otherwise.
pub fn week_over_week_growth(previous: Option<u64>, current: u64) -> f64 {
    match previous {
        None => 0.0,
        Some(0) if current > 0 => 100.0,
        Some(0) => 0.0,
        Some(prev) => round_to((current as f64 - prev as f64) / prev as f64 * 100.0, 1),
    }
}

/// Top-line per-video statistics derived from a view total.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EngagementStats {
    /// Mean views per video.
    pub avg_views: f64,
    /// Estimated median views per video.
    pub median_views: f64,
    /// Mean likes per video.
    pub avg_likes: f64,
    /// Mean comments per video.
    pub avg_comments: f64,
    /// Mean shares per video.
    pub avg_shares: f64,
    /// Engagements per view, four decimals.
    pub avg_engagement_rate: f64,
    /// Views across all videos.
    pub total_views: u64,
    /// Likes, comments, and shares across all videos.
    pub total_engagements: u64,
}

impl EngagementStats {
    /// Derive stats from fixed per-video ratios. A zero video count is
    /// treated as a single video.
    pub fn derive(total_views: u64, video_count: u64) -> Self {
        let avg_views = total_views as f64 / video_count.max(1) as f64;
        Self {
            avg_views: round_to(avg_views, 2),
            median_views: round_to(avg_views * MEDIAN_VIEWS_RATIO, 2),
            avg_likes: round_to(avg_views * LIKES_RATIO, 2),
            avg_comments: round_to(avg_views * COMMENTS_RATIO, 2),
            avg_shares: round_to(avg_views * SHARES_RATIO, 2),
            avg_engagement_rate: 0.0,
            total_views,
            total_engagements: (total_views as f64 * TOTAL_ENGAGEMENT_RATIO).round() as u64,
        }
    }

    /// Replace the engagement rate, rounded to four decimals.
    pub fn with_engagement_rate(mut self, rate: f64) -> Self {
        self.avg_engagement_rate = round_to(rate, 4);
        self
    }
}

/// Same as [`EngagementStats::derive`].
pub fn derive_engagement_stats(total_views: u64, video_count: u64) -> EngagementStats {
    EngagementStats::derive(total_views, video_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn series(values: &[u64]) -> Vec<DailyPoint> {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(idx, value)| DailyPoint {
                date: start + Duration::days(idx as i64),
                value: *value,
            })
            .collect()
    }

    #[test]
    fn rollup_keeps_partial_final_week() {
        let daily = series(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        let weeks = weekly_rollup(&daily);
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].total_videos, 28);
        assert_eq!(weeks[0].peak_day_videos, 7);
        assert_eq!(weeks[0].avg_daily_videos, 4.0);
        assert_eq!(weeks[1].total_videos, 27);
        assert_eq!(weeks[1].week_start, daily[7].date);
        assert_eq!(weeks[1].week_end, daily[9].date);
        assert_eq!(weeks[1].avg_daily_videos, 9.0);
        assert!(weekly_rollup(&[]).is_empty());
    }

    #[test]
    fn growth_matches_reference_cases() {
        assert_eq!(week_over_week_growth(None, 100), 0.0);
        assert_eq!(week_over_week_growth(Some(100), 150), 50.0);
        assert_eq!(week_over_week_growth(Some(0), 5), 100.0);
        assert_eq!(week_over_week_growth(Some(0), 0), 0.0);
        assert_eq!(week_over_week_growth(Some(3), 2), -33.3);
    }

    #[test]
    fn engagement_ratios_are_fixed() {
        let stats = derive_engagement_stats(1_000_000, 100).with_engagement_rate(0.123456);
        assert_eq!(stats.avg_views, 10_000.0);
        assert_eq!(stats.median_views, 7_000.0);
        assert_eq!(stats.avg_likes, 1_200.0);
        assert_eq!(stats.avg_comments, 80.0);
        assert_eq!(stats.avg_shares, 250.0);
        assert_eq!(stats.total_engagements, 153_000);
        assert_eq!(stats.avg_engagement_rate, 0.1235);
    }

    #[test]
    fn zero_videos_do_not_divide_by_zero() {
        let stats = EngagementStats::derive(500, 0);
        assert_eq!(stats.avg_views, 500.0);
    }
}
