use chrono::{Days, Duration, NaiveDate};
use rand::Rng;
use rand::seq::IndexedRandom;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::{CountRange, GeneratorConfig, ValueRange};
use crate::constants::output::{
    DATA_VERSION, EXAMPLE_VIDEO_REGIONS, FALLBACK_MOODS, KEY_MOMENTS, PLATFORM_ID_MAX,
    PLATFORM_ID_MIN, SHARE_URL_PREFIX, STREAMING_ID_ALPHABET, STREAMING_ID_LEN,
    THUMBNAIL_URL_PREFIX, TOP_EXAMPLES_PER_TREND,
};
use crate::constants::normalization::DEFAULT_FLOOR;
use crate::dataset::{
    ActiveDateRange, AudioFeatures, Dataset, SongMetadata, StreamingStats, Trend, VideoExample,
    VideoStatistics,
};
use crate::distribution::{
    RawWeights, creator_archetypes, generate_demographics, normalize, regional_distribution,
    sample_weights,
};
use crate::errors::GeneratorError;
use crate::hash::stream_seed;
use crate::metrics::aggregate_metrics;
use crate::research::ResearchRecord;
use crate::rng::DeterministicRng;
use crate::rollup::{EngagementStats, weekly_rollup};
use crate::series::{
    LifecyclePhase, MomentumStatus, TierProfile, generate_series, rescale,
};
use crate::templates::{TemplateVars, TrendTemplate};
use crate::types::{CategoryId, PlatformId};
use crate::utils::round_to;

/// Assembles trends and the final dataset from a research record.
///
/// Every slot draws from its own seeded generator, so slots can be built in
/// parallel and a given seed always reproduces the same dataset.
#[derive(Clone, Debug)]
pub struct TrendGenerator {
    config: GeneratorConfig,
    record: ResearchRecord,
    music_id: PlatformId,
}

impl TrendGenerator {
    /// Validate `config` and derive the song's music id from its seed.
    pub fn new(config: GeneratorConfig, record: ResearchRecord) -> Result<Self, GeneratorError> {
        config.validate()?;
        let mut rng = DeterministicRng::new(stream_seed(config.seed, "music_id"));
        let music_id = platform_id(&mut rng);
        Ok(Self {
            config,
            record,
            music_id,
        })
    }

    /// Configuration the generator was built with.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Research record trends are built from.
    pub fn record(&self) -> &ResearchRecord {
        &self.record
    }

    /// Platform id shared by the song and every example video.
    pub fn music_id(&self) -> &str {
        &self.music_id
    }

    /// Build every trend slot plus song, streaming, and aggregate sections.
    pub fn generate_complete_dataset(&self) -> Result<Dataset, GeneratorError> {
        let trends: Vec<Trend> = (0..self.config.num_trends)
            .into_par_iter()
            .map(|slot| {
                let mut rng = DeterministicRng::for_slot(self.config.seed, slot);
                self.generate_trend(slot, &mut rng)
            })
            .collect::<Result<_, _>>()?;

        let mut song_rng = DeterministicRng::new(stream_seed(self.config.seed, "song_metadata"));
        let song_metadata = self.song_metadata(&mut song_rng);
        let mut streaming_rng = DeterministicRng::new(stream_seed(self.config.seed, "streaming"));
        let spotify_data = streaming_stats(&mut streaming_rng);

        let aggregate_metrics = aggregate_metrics(
            &trends,
            self.config.window,
            self.config.window_start(),
            self.config.window_end(),
        );
        info!(
            "[trendgen] generated {} trends for '{}' by {} ({} videos)",
            trends.len(),
            song_metadata.title,
            song_metadata.artist,
            aggregate_metrics.total_videos
        );

        Ok(Dataset {
            song_metadata,
            spotify_data,
            trends,
            aggregate_metrics,
            generated_at: self.config.now,
            data_version: DATA_VERSION.to_string(),
        })
    }

    /// Category assigned to `slot`: the lead category first, then categories
    /// suggested by the notes, then the catalog in order.
    pub fn category_for_slot(&self, slot: usize) -> CategoryId {
        if let (0, Some(lead)) = (slot, &self.config.lead_category) {
            return lead.clone();
        }
        if let Some(tag) = self.record.category_tags.get_index(slot) {
            return tag.clone();
        }
        self.config
            .catalog
            .by_index(slot)
            .map(|template| template.category.clone())
            .unwrap_or_default()
    }

    fn template_for(&self, category: &str) -> Result<&TrendTemplate, GeneratorError> {
        self.config.catalog.resolve(category).ok_or_else(|| {
            GeneratorError::Configuration(format!(
                "no template available for category '{category}'"
            ))
        })
    }

    /// Build the trend for `slot`, drawing only from `rng`.
    pub fn generate_trend<R: Rng + ?Sized>(
        &self,
        slot: usize,
        rng: &mut R,
    ) -> Result<Trend, GeneratorError> {
        let config = &self.config;
        let record = &self.record;
        let profile = config.slot_profile(slot);
        let tier = profile.tier;
        let category = self.category_for_slot(slot);
        let template = self.template_for(&category)?;

        let window_days = config.window.days();
        let offset = rng.random_range(0..=window_days / 3);
        let min_active = (2 * window_days / 3).max(1);
        let drawn_days = rng.random_range(min_active..=window_days);
        let days_active = drawn_days.min(window_days - offset).max(1);
        let start_date = config.window_start() + Duration::days(i64::from(offset));

        let raw_series = generate_series(
            tier,
            start_date,
            days_active as usize,
            &category,
            &config.series,
            rng,
        );
        let target_videos = profile
            .videos
            .scaled(config.window.scale_from_baseline())
            .sample(rng);
        let count_by_date = rescale(&raw_series, target_videos);
        let detected_videos: u64 = count_by_date.iter().map(|point| point.value).sum();
        let end_date = count_by_date
            .last()
            .map(|point| point.date)
            .unwrap_or(start_date);

        let views_per_video = TierProfile::for_tier(tier).views_per_video.sample(rng);
        let total_views = detected_videos * views_per_video;
        let engagement_stats = EngagementStats::derive(total_views, detected_videos)
            .with_engagement_rate(ValueRange::new(0.08, 0.15).sample(rng));

        let elapsed = offset + days_active;
        let momentum_status = MomentumStatus::classify(tier, elapsed, window_days);
        let current_phase = LifecyclePhase::classify(elapsed, window_days);

        let demographics = generate_demographics(record, &category, rng);
        let creator_archetypes = creator_archetypes(&category, rng);
        let genre = record.genre.as_deref();
        let regional_distribution = regional_distribution(genre, config, rng);

        let vars = TemplateVars::new(&record.title, &record.artist);
        let has_context = record.has_context();
        let affinity_hashtags = genre
            .and_then(|genre| config.regional.affinity_for(genre))
            .map(|group| group.hashtags.as_slice())
            .unwrap_or(&[]);
        let trending_hashtags = config.catalog.hashtags(
            template,
            &vars,
            has_context,
            &record.hashtags,
            affinity_hashtags,
        );
        let top_examples = self.video_examples(&vars, rng);
        let content_type_confidence = round_to(ValueRange::new(0.85, 0.98).sample(rng), 3);
        let audio_features = self.audio_features(rng);

        debug!(
            slot,
            tier = tier.level(),
            category = %category,
            days_active,
            detected_videos,
            total_views,
            "trend slot assembled"
        );

        Ok(Trend {
            name: vars.render(&template.name),
            summary: vars.render(&template.summary),
            description: vars.render(&template.description),
            virality_level: tier,
            momentum_status,
            recommended: slot == 0,
            detected_videos,
            top_examples,
            engagement_stats,
            demographics,
            creator_archetypes,
            regional_distribution,
            type_of_content: template.content_types.clone(),
            content_type_confidence,
            creative_analysis: config.catalog.creative_analysis(template, has_context, &vars),
            creative_brief: config.catalog.creative_brief(template, has_context, &vars),
            active_date_range: ActiveDateRange {
                start_date,
                end_date,
                days_active,
                current_phase,
            },
            weekly_summary: weekly_rollup(&count_by_date),
            count_by_date,
            trending_hashtags,
            audio_features,
            real_creative_example: if slot == 0 {
                config.real_creative_example.clone()
            } else {
                None
            },
        })
    }

    fn video_examples<R: Rng + ?Sized>(&self, vars: &TemplateVars, rng: &mut R) -> Vec<VideoExample> {
        let window_days = i64::from(self.config.window.days());
        let mut examples: Vec<VideoExample> = (0..TOP_EXAMPLES_PER_TREND)
            .map(|idx| {
                let age_days = rng.random_range(1..=window_days.max(1));
                VideoExample {
                    id: platform_id(rng),
                    author_uid: platform_id(rng),
                    music_id: self.music_id.clone(),
                    desc: self.config.catalog.video_description(vars, rng),
                    share_url: format!(
                        "{SHARE_URL_PREFIX}@creator{idx}/video/{}",
                        platform_id(rng)
                    ),
                    create_time: (self.config.now - Duration::days(age_days)).timestamp(),
                    region: EXAMPLE_VIDEO_REGIONS
                        .choose(rng)
                        .map(|region| region.to_string())
                        .unwrap_or_default(),
                    thumbnail: format!("{THUMBNAIL_URL_PREFIX}thumb_{}.png", platform_id(rng)),
                    statistics: VideoStatistics {
                        play_count: CountRange::new(100_000, 10_000_000).sample(rng),
                        share_count: CountRange::new(1_000, 100_000).sample(rng),
                        comment_count: CountRange::new(100, 50_000).sample(rng),
                        like_count: CountRange::new(10_000, 2_000_000).sample(rng),
                    },
                }
            })
            .collect();
        examples.sort_by(|a, b| b.statistics.play_count.cmp(&a.statistics.play_count));
        examples
    }

    fn audio_features<R: Rng + ?Sized>(&self, rng: &mut R) -> AudioFeatures {
        let bpm = rng.random_range(100..=180);
        let mood = match self.record.mood_keywords.first() {
            Some(mood) => mood.clone(),
            None => FALLBACK_MOODS
                .choose(rng)
                .map(|mood| mood.to_string())
                .unwrap_or_default(),
        };
        AudioFeatures {
            bpm,
            key_moments: KEY_MOMENTS.iter().map(|moment| moment.to_string()).collect(),
            mood,
        }
    }

    fn song_metadata<R: Rng + ?Sized>(&self, rng: &mut R) -> SongMetadata {
        let duration_ms = CountRange::new(150_000, 240_000).sample(rng);
        let release_age = rng.random_range(30..=365);
        let genre = match &self.record.genre {
            Some(genre) => genre.clone(),
            None => self
                .config
                .fallback_genres
                .choose(rng)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string()),
        };
        SongMetadata {
            title: self.record.title.clone(),
            artist: self.record.artist.clone(),
            music_id: self.music_id.clone(),
            duration_ms,
            release_date: self
                .config
                .window_end()
                .checked_sub_days(Days::new(release_age))
                .unwrap_or(NaiveDate::MIN),
            genre,
        }
    }
}

/// Random 19-digit id in the platform's video id range.
pub fn platform_id<R: Rng + ?Sized>(rng: &mut R) -> PlatformId {
    rng.random_range(PLATFORM_ID_MIN..=PLATFORM_ID_MAX)
        .to_string()
}

/// Random alphanumeric streaming-service track id.
pub fn streaming_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..STREAMING_ID_LEN)
        .map(|_| {
            let idx = rng.random_range(0..STREAMING_ID_ALPHABET.len());
            char::from(STREAMING_ID_ALPHABET[idx])
        })
        .collect()
}

/// Streaming-service figures with a normalized discovery split.
pub fn streaming_stats<R: Rng + ?Sized>(rng: &mut R) -> StreamingStats {
    let discovery_table = [
        ("algorithmic_playlists", ValueRange::new(0.30, 0.50)),
        ("user_playlists", ValueRange::new(0.15, 0.25)),
        ("search", ValueRange::new(0.10, 0.20)),
        ("artist_profile", ValueRange::new(0.05, 0.15)),
        ("other", ValueRange::new(0.10, 0.20)),
    ];
    let spotify_id = streaming_id(rng);
    let total_streams = CountRange::new(10_000_000, 500_000_000).sample(rng);
    let daily_streams = CountRange::new(500_000, 5_000_000).sample(rng);
    let monthly_listeners = CountRange::new(1_000_000, 20_000_000).sample(rng);
    let playlist_adds = CountRange::new(10_000, 500_000).sample(rng);
    let save_rate = round_to(ValueRange::new(0.15, 0.45).sample(rng), 3);
    let skip_rate = round_to(ValueRange::new(0.20, 0.40).sample(rng), 3);
    let replay_rate = round_to(ValueRange::new(0.25, 0.55).sample(rng), 3);
    let discovery: RawWeights = sample_weights(&discovery_table, rng);
    StreamingStats {
        spotify_id,
        total_streams,
        daily_streams,
        monthly_listeners,
        playlist_adds,
        save_rate,
        skip_rate,
        replay_rate,
        discovery_source: normalize(&discovery, DEFAULT_FLOOR),
    }
}
