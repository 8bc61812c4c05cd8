use std::fs;

use chrono::{DateTime, Utc};
use tempfile::tempdir;
use trendgen::transport::fs::write_dataset;
use trendgen::{
    AnalysisWindow, Dataset, GeneratorConfig, ResearchRecord, TrendGenerator, parse_research_notes,
};

const NOTES: &str = "Artist: Grupo Aurora\n\
Song Title: Luz de Neon\n\
Genre: Regional Mexican\n\
\n\
Context: A slow couples dance with a story twist. Fans post #LuzDeNeon videos.\n\
\n\
Mood: romantic and nostalgic\n";

fn fixed_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-06-30T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn config(seed: u64, num_trends: usize, window: AnalysisWindow) -> GeneratorConfig {
    GeneratorConfig {
        seed,
        num_trends,
        window,
        ..GeneratorConfig::new(fixed_now())
    }
}

fn generate(record: ResearchRecord, config: GeneratorConfig) -> Dataset {
    TrendGenerator::new(config, record)
        .unwrap()
        .generate_complete_dataset()
        .unwrap()
}

#[test]
fn aggregates_agree_with_trends() {
    let dataset = generate(ResearchRecord::default(), config(3, 3, AnalysisWindow::Days30));
    let metrics = &dataset.aggregate_metrics;
    assert_eq!(dataset.trends.len(), 3);
    assert_eq!(metrics.total_trends, 3);
    assert_eq!(
        metrics.total_videos,
        dataset.trends.iter().map(|trend| trend.detected_videos).sum::<u64>()
    );
    assert_eq!(
        metrics.total_views,
        dataset
            .trends
            .iter()
            .map(|trend| trend.engagement_stats.total_views)
            .sum::<u64>()
    );
    let peak = dataset
        .trends
        .iter()
        .map(|trend| trend.engagement_stats.total_views)
        .max()
        .unwrap();
    let peak_trend = dataset
        .trends
        .iter()
        .find(|trend| trend.engagement_stats.total_views == peak)
        .unwrap();
    assert_eq!(metrics.timeline_summary.peak_trend, peak_trend.name);
    assert_eq!(metrics.timeline_summary.trend_phases.len(), 3);
    assert_eq!(metrics.platform_reach.tiktok, metrics.total_views);
}

#[test]
fn every_trend_stays_inside_the_window() {
    let cfg = config(19, 5, AnalysisWindow::Days30);
    let window_start = cfg.window_start();
    let window_end = cfg.window_end();
    let dataset = generate(ResearchRecord::default(), cfg);
    for trend in &dataset.trends {
        let range = &trend.active_date_range;
        assert!(range.start_date >= window_start);
        assert!(range.end_date <= window_end);
        assert_eq!(range.days_active as usize, trend.count_by_date.len());
        assert_eq!(
            trend.detected_videos,
            trend.count_by_date.iter().map(|point| point.value).sum::<u64>()
        );
        assert_eq!(
            trend.detected_videos,
            trend
                .weekly_summary
                .iter()
                .map(|week| week.total_videos)
                .sum::<u64>()
        );
        assert_eq!(trend.top_examples.len(), 3);
        assert!(
            trend
                .top_examples
                .windows(2)
                .all(|pair| pair[0].statistics.play_count >= pair[1].statistics.play_count)
        );
    }
    assert!(dataset.trends[0].recommended);
    assert!(dataset.trends[1..].iter().all(|trend| !trend.recommended));
}

#[test]
fn notes_flow_into_the_dataset() {
    let record = parse_research_notes(NOTES);
    let dataset = generate(record, config(11, 3, AnalysisWindow::Days30));
    assert_eq!(dataset.song_metadata.artist, "Grupo Aurora");
    assert_eq!(dataset.song_metadata.title, "Luz de Neon");
    assert_eq!(dataset.song_metadata.genre, "Regional Mexican");
    for trend in &dataset.trends {
        assert_eq!(trend.regional_distribution[0].code, "MX");
        assert!(trend.trending_hashtags.iter().any(|tag| tag == "#corridos"));
        assert_eq!(trend.audio_features.mood, "romantic");
    }
}

#[test]
fn ninety_day_window_scales_volume() {
    let short = generate(ResearchRecord::default(), config(5, 1, AnalysisWindow::Days30));
    let long = generate(ResearchRecord::default(), config(5, 1, AnalysisWindow::Days90));
    assert!((900..=1100).contains(&short.trends[0].detected_videos));
    assert!((2700..=3300).contains(&long.trends[0].detected_videos));
    assert_eq!(long.aggregate_metrics.timeline_summary.analysis_period, "90 days");
}

#[test]
fn same_seed_writes_identical_json() {
    let temp = tempdir().unwrap();
    let first = temp.path().join("first.json");
    let second = temp.path().join("nested").join("second.json");
    let record = parse_research_notes(NOTES);
    write_dataset(&first, &generate(record.clone(), config(42, 4, AnalysisWindow::Days30))).unwrap();
    write_dataset(&second, &generate(record, config(42, 4, AnalysisWindow::Days30))).unwrap();

    let first_text = fs::read_to_string(&first).unwrap();
    assert_eq!(first_text, fs::read_to_string(&second).unwrap());

    let json: serde_json::Value = serde_json::from_str(&first_text).unwrap();
    assert_eq!(json["data_version"], "2.0");
    assert_eq!(json["trends"].as_array().unwrap().len(), 4);
    let trend = &json["trends"][0];
    for key in [
        "name",
        "virality_level",
        "momentum_status",
        "count_by_date",
        "weekly_summary",
        "demographics",
        "regional_distribution",
        "creative_brief",
        "active_date_range",
    ] {
        assert!(trend.get(key).is_some(), "missing {key}");
    }
    assert!(trend.get("real_creative_example").is_none());
    assert!(json["spotify_data"]["discovery_source"].is_object());
}

#[test]
fn different_seeds_diverge() {
    let a = generate(ResearchRecord::default(), config(1, 3, AnalysisWindow::Days30));
    let b = generate(ResearchRecord::default(), config(2, 3, AnalysisWindow::Days30));
    assert_ne!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}
