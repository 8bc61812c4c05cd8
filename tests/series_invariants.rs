use chrono::NaiveDate;
use trendgen::{
    DailyPoint, DeterministicRng, LifecyclePhase, MomentumStatus, SeriesPolicy, ViralityTier,
    generate_series, rescale, weekly_rollup,
};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
}

#[test]
fn series_covers_every_active_day_with_positive_values() {
    let policy = SeriesPolicy::default();
    for level in 1..=5 {
        for days in [1usize, 2, 7, 20, 30, 90] {
            let mut rng = DeterministicRng::new(level as u64 * 1_000 + days as u64);
            let series = generate_series(
                ViralityTier::new(level),
                start(),
                days,
                "dance",
                &policy,
                &mut rng,
            );
            assert_eq!(series.len(), days);
            assert_eq!(series[0].date, start());
            for pair in series.windows(2) {
                assert_eq!(pair[1].date, pair[0].date.succ_opt().unwrap());
            }
            assert!(series.iter().all(|point| point.value >= 1));
        }
    }
}

#[test]
fn zero_day_request_yields_single_day() {
    let mut rng = DeterministicRng::new(3);
    let series = generate_series(
        ViralityTier::new(4),
        start(),
        0,
        "challenge",
        &SeriesPolicy::default(),
        &mut rng,
    );
    assert_eq!(series.len(), 1);
}

#[test]
fn same_seed_reproduces_series() {
    let policy = SeriesPolicy::default();
    let a = generate_series(
        ViralityTier::new(5),
        start(),
        30,
        "storytelling",
        &policy,
        &mut DeterministicRng::new(99),
    );
    let b = generate_series(
        ViralityTier::new(5),
        start(),
        30,
        "storytelling",
        &policy,
        &mut DeterministicRng::new(99),
    );
    assert_eq!(a, b);
}

#[test]
fn rescaled_series_hits_target_and_keeps_shape_dates() {
    let policy = SeriesPolicy::default();
    let mut rng = DeterministicRng::new(11);
    let series = generate_series(ViralityTier::new(3), start(), 25, "dance", &policy, &mut rng);
    for target in [25u64, 26, 600, 1_000, 3_333] {
        let scaled = rescale(&series, target);
        assert_eq!(scaled.len(), series.len());
        assert_eq!(scaled.iter().map(|point| point.value).sum::<u64>(), target);
        assert!(scaled.iter().all(|point| point.value >= 1));
        assert!(
            scaled
                .iter()
                .zip(&series)
                .all(|(after, before)| after.date == before.date)
        );
    }
}

#[test]
fn rescale_below_day_count_pins_every_day_to_one() {
    let policy = SeriesPolicy::default();
    let mut rng = DeterministicRng::new(12);
    let series = generate_series(ViralityTier::new(2), start(), 10, "lifestyle", &policy, &mut rng);
    let scaled = rescale(&series, 4);
    assert!(scaled.iter().all(|point| point.value == 1));
}

#[test]
fn weekly_rollup_partitions_the_series() {
    let policy = SeriesPolicy::default();
    let mut rng = DeterministicRng::new(21);
    let series = generate_series(ViralityTier::new(5), start(), 23, "dance", &policy, &mut rng);
    let weeks = weekly_rollup(&series);
    assert_eq!(weeks.len(), 4);
    assert_eq!(
        weeks.iter().map(|week| week.total_videos).sum::<u64>(),
        series.iter().map(|point| point.value).sum::<u64>()
    );
    assert_eq!(weeks[0].week_start, series[0].date);
    assert_eq!(weeks[3].week_start, series[21].date);
    assert_eq!(weeks[3].week_end, series[22].date);
    assert_eq!(weeks[0].growth_rate, 0.0);
    for week in &weeks {
        assert!(week.peak_day_videos as f64 >= week.avg_daily_videos - 0.05);
    }
}

#[test]
fn second_week_growth_is_relative_to_first() {
    let values = [10u64, 15, 20, 15, 10, 15, 15, 20, 25, 20, 25, 20, 20, 20];
    let series: Vec<DailyPoint> = values
        .iter()
        .enumerate()
        .map(|(day, value)| DailyPoint {
            date: start() + chrono::Duration::days(day as i64),
            value: *value,
        })
        .collect();
    let weeks = weekly_rollup(&series);
    assert_eq!(weeks.len(), 2);
    assert_eq!((weeks[0].total_videos, weeks[1].total_videos), (100, 150));
    assert_eq!(weeks[1].growth_rate, 50.0);
    assert_eq!(weeks[1].peak_day_videos, 25);
}

#[test]
fn lifecycle_and_momentum_follow_elapsed_share() {
    assert_eq!(LifecyclePhase::classify(2, 30), LifecyclePhase::Discovery);
    assert_eq!(LifecyclePhase::classify(10, 30), LifecyclePhase::Growth);
    assert_eq!(LifecyclePhase::classify(15, 30), LifecyclePhase::Peak);
    assert_eq!(LifecyclePhase::classify(20, 30), LifecyclePhase::Decline);
    assert_eq!(LifecyclePhase::classify(29, 30), LifecyclePhase::FadeOut);

    let viral = ViralityTier::new(5);
    let modest = ViralityTier::new(2);
    assert_eq!(MomentumStatus::classify(viral, 1, 30), MomentumStatus::New);
    assert_eq!(MomentumStatus::classify(viral, 9, 30), MomentumStatus::Rising);
    assert_eq!(MomentumStatus::classify(modest, 9, 30), MomentumStatus::Recommended);
    assert_eq!(MomentumStatus::classify(modest, 25, 30), MomentumStatus::Dying);
}
