/// Constants used by the time-series phase model.
pub mod series {
    /// Length of one rollup window in days.
    pub const ROLLUP_WINDOW_DAYS: usize = 7;
    /// Fraction of the base value a discovery phase starts from.
    pub const DISCOVERY_START_SHARE: f64 = 0.5;
    /// Total decay applied across the peak plateau.
    pub const PEAK_PLATEAU_DECAY: f64 = 0.2;
    /// Share of the peak value the decline phase starts from.
    pub const DECLINE_START_SHARE: f64 = 0.8;
    /// Linear decay used by dance-like categories.
    pub const DANCE_DECAY: f64 = 0.7;
    /// Square-root decay used by challenge-like categories.
    pub const CHALLENGE_DECAY: f64 = 0.85;
    /// Linear decay used by every other category.
    pub const DEFAULT_DECAY: f64 = 0.8;
    /// Category substring selecting the slow decay curve.
    pub const DANCE_MARKER: &str = "dance";
    /// Category substring selecting the front-loaded decay curve.
    pub const CHALLENGE_MARKER: &str = "challenge";
}

/// Per-video ratios used to derive engagement statistics from view totals.
pub mod engagement {
    /// Median views as a share of average views.
    pub const MEDIAN_VIEWS_RATIO: f64 = 0.7;
    /// Average likes as a share of average views.
    pub const LIKES_RATIO: f64 = 0.12;
    /// Average comments as a share of average views.
    pub const COMMENTS_RATIO: f64 = 0.008;
    /// Average shares as a share of average views.
    pub const SHARES_RATIO: f64 = 0.025;
    /// Total engagements as a share of total views.
    pub const TOTAL_ENGAGEMENT_RATIO: f64 = 0.153;
}

/// Cross-platform reach multipliers applied to total views.
pub mod reach {
    /// Instagram Reels views as a share of source-platform views.
    pub const INSTAGRAM_REELS_RATIO: f64 = 0.4;
    /// YouTube Shorts views as a share of source-platform views.
    pub const YOUTUBE_SHORTS_RATIO: f64 = 0.25;
    /// All-platform views as a multiple of source-platform views.
    pub const ESTIMATED_TOTAL_RATIO: f64 = 1.65;
}

/// Bounds on the analysis window.
pub mod window {
    /// Longest accepted analysis window, ten years of days.
    pub const MAX_WINDOW_DAYS: u32 = 3_660;
}

/// Constants used by distribution normalization.
pub mod normalization {
    /// Minimum share any category keeps after normalization.
    pub const DEFAULT_FLOOR: f64 = 0.01;
    /// Decimal places kept in normalized shares.
    pub const SHARE_DECIMALS: u32 = 3;
    /// Relative jitter applied to shares seeded from research notes.
    pub const RECORD_JITTER: f64 = 0.1;
    /// Share above which a gender is reported as dominant.
    pub const DOMINANT_GENDER_SHARE: f64 = 0.6;
}

/// Constants used by the research-notes parser.
pub mod research {
    /// Artist used when the notes name none.
    pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
    /// Title used when the notes name none.
    pub const UNKNOWN_SONG: &str = "Unknown Song";
    /// Age buckets recognized in notes, in output order.
    pub const AGE_BUCKETS: [&str; 5] = ["13-17", "18-24", "25-34", "35-44", "45+"];
    /// Gender categories recognized in notes, in output order.
    pub const GENDER_BUCKETS: [&str; 3] = ["female", "male", "other"];
    /// Mood vocabulary matched against the mood/vibe/style paragraph.
    pub const MOOD_VOCABULARY: [&str; 14] = [
        "energetic",
        "emotional",
        "upbeat",
        "chill",
        "dramatic",
        "melancholic",
        "aggressive",
        "romantic",
        "nostalgic",
        "dark",
        "happy",
        "sad",
        "powerful",
        "vulnerable",
    ];
    /// Label prefixes used when merging context from two sources.
    pub const MERGED_CONTEXT_LABELS: [&str; 2] = ["[Research 1]", "[Research 2]"];
}

/// Constants shaping the serialized dataset.
pub mod output {
    /// Schema version stamped into every dataset.
    pub const DATA_VERSION: &str = "2.0";
    /// Number of synthetic example videos attached to each trend.
    pub const TOP_EXAMPLES_PER_TREND: usize = 3;
    /// Regions example videos are attributed to.
    pub const EXAMPLE_VIDEO_REGIONS: [&str; 3] = ["US", "UK", "CA"];
    /// Inclusive lower bound for synthetic 19-digit platform ids.
    pub const PLATFORM_ID_MIN: u64 = 7_400_000_000_000_000_000;
    /// Inclusive upper bound for platform ids.
    pub const PLATFORM_ID_MAX: u64 = 7_599_999_999_999_999_999;
    /// Alphabet used for streaming-service track ids.
    pub const STREAMING_ID_ALPHABET: &[u8] =
        b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    /// Length of a streaming-service track id.
    pub const STREAMING_ID_LEN: usize = 22;
    /// Share link prefix for example videos; `@creator{n}/video/{id}` follows.
    pub const SHARE_URL_PREFIX: &str = "https://www.tiktok.com/";
    /// Thumbnail link prefix for example videos; `thumb_{id}.png` follows.
    pub const THUMBNAIL_URL_PREFIX: &str = "https://thumbnails.trendgen.invalid/";
    /// Audio timestamps highlighted on every trend.
    pub const KEY_MOMENTS: [&str; 4] = ["0:15", "0:32", "0:45", "1:02"];
    /// Mood fallback when the notes carry no mood keywords.
    pub const FALLBACK_MOODS: [&str; 5] = ["energetic", "emotional", "upbeat", "chill", "dramatic"];
    /// Ethnicity labels reported on every demographics block.
    pub const RACE_AND_ETHNICITY: [&str; 5] =
        ["White", "Hispanic/Latino", "Asian", "Black", "Other"];
}

/// Defaults for the command line runner.
pub mod cli {
    /// First notes file read when no paths are given.
    pub const DEFAULT_PRIMARY_INPUT: &str = "perplexity_research.txt";
    /// Second notes file read when no paths are given.
    pub const DEFAULT_SECONDARY_INPUT: &str = "openai_research.txt";
    /// Read instead when neither default file exists.
    pub const FALLBACK_INPUT: &str = "input.txt";
    /// Dataset path used without `--output`.
    pub const DEFAULT_OUTPUT: &str = "trend_analysis_output.json";
}
