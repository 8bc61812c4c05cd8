use std::sync::LazyLock;

use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use tracing::debug;

use crate::constants::research::{
    AGE_BUCKETS, GENDER_BUCKETS, MERGED_CONTEXT_LABELS, MOOD_VOCABULARY, UNKNOWN_ARTIST,
    UNKNOWN_SONG,
};
use crate::distribution::{DistributionMap, RawWeights, normalize};
use crate::templates::TemplateCatalog;
use crate::types::{CategoryId, Hashtag, MoodKeyword};
use crate::utils::normalize_inline_whitespace;

/// Best-effort structured view of free-text research notes.
///
/// Missing fields stay empty or `None`; nothing here is ever fatal.
#[derive(Clone, Debug, PartialEq)]
pub struct ResearchRecord {
    /// Artist name, or a placeholder when absent.
    pub artist: String,
    /// Song title, or a placeholder when absent.
    pub title: String,
    /// Genre line, when present.
    pub genre: Option<String>,
    /// Free-text context paragraph.
    pub context: String,
    /// Mood words found in the mood/vibe/style paragraph, in vocabulary order.
    pub mood_keywords: IndexSet<MoodKeyword>,
    /// Trend categories suggested by the context, in catalog order.
    pub category_tags: IndexSet<CategoryId>,
    /// Hashtags quoted in the context, lower-cased with the leading `#`.
    pub hashtags: IndexSet<Hashtag>,
    /// Age bucket shares, when an age section was found.
    pub age_distribution: Option<DistributionMap>,
    /// Gender shares, when a gender section was found.
    pub gender_distribution: Option<DistributionMap>,
}

impl Default for ResearchRecord {
    fn default() -> Self {
        Self {
            artist: UNKNOWN_ARTIST.to_string(),
            title: UNKNOWN_SONG.to_string(),
            genre: None,
            context: String::new(),
            mood_keywords: IndexSet::new(),
            category_tags: IndexSet::new(),
            hashtags: IndexSet::new(),
            age_distribution: None,
            gender_distribution: None,
        }
    }
}

impl ResearchRecord {
    /// Whether the notes carried a non-blank context.
    pub fn has_context(&self) -> bool {
        !self.context.trim().is_empty()
    }

    /// Whether the notes carried any demographic section.
    pub fn has_demographics(&self) -> bool {
        self.age_distribution.is_some() || self.gender_distribution.is_some()
    }
}

static ARTIST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Artist(?:\s+Name)?:\s*([^\n]+)").expect("artist pattern is valid")
});
static SONG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Song(?:\s+(?:Title|Name))?:\s*([^\n]+)").expect("song pattern is valid")
});
static GENRE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Genre:\s*([^\n]+)").expect("genre pattern is valid"));
static AGE_SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)Age(?:\s+Demographics)?:(.*?)(?:Gender|$)").expect("age pattern is valid")
});
static GENDER_SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)Gender(?:\s+Demographics)?:(.*?)(?:Region|Location|Additional|$)")
        .expect("gender pattern is valid")
});
static CONTEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)Context:(.*?)(?:Demographics|$)").expect("context pattern is valid")
});
static MOOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(?:Mood|Vibe|Style):(.*?)(?:\n\n|$)").expect("mood pattern is valid")
});
static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([A-Za-z0-9_]+)").expect("hashtag pattern is valid"));

static AGE_BUCKET_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    AGE_BUCKETS
        .iter()
        .map(|bucket| {
            let pattern = format!(r"{}[:\s]+(\d+)%?", regex::escape(bucket));
            (*bucket, Regex::new(&pattern).expect("age bucket pattern is valid"))
        })
        .collect()
});
static GENDER_BUCKET_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    GENDER_BUCKETS
        .iter()
        .map(|bucket| {
            let pattern = format!(r"(?im)^[ \t*•-]*{bucket}[:\s]+(\d+)%?");
            (*bucket, Regex::new(&pattern).expect("gender bucket pattern is valid"))
        })
        .collect()
});

fn capture_line(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|value| normalize_inline_whitespace(value.as_str()))
        .filter(|value| !value.is_empty())
}

fn capture_section<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|section| section.as_str())
}

/// Read `NN%` values for each bucket; `None` when no bucket matched.
fn parse_percentages(section: &str, patterns: &[(&str, Regex)]) -> Option<DistributionMap> {
    let mut distribution = DistributionMap::new();
    for (bucket, re) in patterns {
        let share = re
            .captures(section)
            .and_then(|caps| caps.get(1))
            .and_then(|value| value.as_str().parse::<f64>().ok());
        if let Some(percent) = share {
            distribution.insert(*bucket, percent / 100.0);
        }
    }
    (!distribution.is_empty()).then_some(distribution)
}

static DEFAULT_CATALOG: LazyLock<TemplateCatalog> = LazyLock::new(TemplateCatalog::default);

/// Parse free-text research notes into a [`ResearchRecord`], suggesting
/// categories from the built-in template catalog.
pub fn parse_research_notes(text: &str) -> ResearchRecord {
    parse_research_notes_with(text, &DEFAULT_CATALOG)
}

/// Parse research notes, suggesting categories from `catalog`'s keywords.
pub fn parse_research_notes_with(text: &str, catalog: &TemplateCatalog) -> ResearchRecord {
    let text = text.replace("\r\n", "\n");

    let artist = capture_line(&ARTIST_RE, &text).unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
    let title = capture_line(&SONG_RE, &text).unwrap_or_else(|| UNKNOWN_SONG.to_string());
    let genre = capture_line(&GENRE_RE, &text);
    let age_distribution = capture_section(&AGE_SECTION_RE, &text)
        .and_then(|section| parse_percentages(section, &AGE_BUCKET_RES));
    let gender_distribution = capture_section(&GENDER_SECTION_RE, &text)
        .and_then(|section| parse_percentages(section, &GENDER_BUCKET_RES));
    let context = capture_section(&CONTEXT_RE, &text)
        .map(|section| section.trim().to_string())
        .unwrap_or_default();

    let mood_keywords: IndexSet<MoodKeyword> = capture_section(&MOOD_RE, &text)
        .map(|section| {
            let section = section.to_lowercase();
            MOOD_VOCABULARY
                .iter()
                .filter(|mood| section.contains(*mood))
                .map(|mood| mood.to_string())
                .collect()
        })
        .unwrap_or_default();

    let category_tags = catalog.suggest_categories(&context);
    let hashtags: IndexSet<Hashtag> = HASHTAG_RE
        .captures_iter(&context)
        .filter_map(|caps| caps.get(1))
        .map(|tag| format!("#{}", tag.as_str().to_lowercase()))
        .collect();

    let record = ResearchRecord {
        artist,
        title,
        genre,
        context,
        mood_keywords,
        category_tags,
        hashtags,
        age_distribution,
        gender_distribution,
    };
    debug!(
        artist = %record.artist,
        title = %record.title,
        moods = record.mood_keywords.len(),
        tags = record.category_tags.len(),
        "[trendgen] parsed research notes"
    );
    record
}

/// Combine two optional records into one.
///
/// Artist and title come from the first record, genre from the first that has
/// one. Contexts are labeled and joined; sets are unioned in first-seen order.
/// Age buckets are averaged with missing buckets counted as zero; gender
/// categories are averaged over the records reporting a non-zero share. Both
/// are renormalized.
pub fn merge_records(
    first: Option<ResearchRecord>,
    second: Option<ResearchRecord>,
) -> ResearchRecord {
    let (first, second) = match (first, second) {
        (None, None) => return ResearchRecord::default(),
        (Some(record), None) | (None, Some(record)) => return record,
        (Some(first), Some(second)) => (first, second),
    };

    let context = [&first.context, &second.context]
        .iter()
        .zip(MERGED_CONTEXT_LABELS)
        .filter(|(context, _)| !context.trim().is_empty())
        .map(|(context, label)| format!("{label}: {context}"))
        .collect::<Vec<_>>()
        .join("\n\n");

    let union = |a: &IndexSet<String>, b: &IndexSet<String>| -> IndexSet<String> {
        a.iter().chain(b.iter()).cloned().collect()
    };

    ResearchRecord {
        genre: first.genre.clone().or_else(|| second.genre.clone()),
        mood_keywords: union(&first.mood_keywords, &second.mood_keywords),
        category_tags: union(&first.category_tags, &second.category_tags),
        hashtags: union(&first.hashtags, &second.hashtags),
        age_distribution: merge_distribution(
            first.age_distribution.as_ref(),
            second.age_distribution.as_ref(),
            MergeRule::ZeroFilled,
        ),
        gender_distribution: merge_distribution(
            first.gender_distribution.as_ref(),
            second.gender_distribution.as_ref(),
            MergeRule::ReportedOnly,
        ),
        context,
        artist: first.artist,
        title: first.title,
    }
}

#[derive(Clone, Copy)]
enum MergeRule {
    /// Missing buckets count as zero in the mean.
    ZeroFilled,
    /// Only non-zero reports contribute to the mean.
    ReportedOnly,
}

fn merge_distribution(
    first: Option<&DistributionMap>,
    second: Option<&DistributionMap>,
    rule: MergeRule,
) -> Option<DistributionMap> {
    let (first, second) = match (first, second) {
        (Some(a), Some(b)) => (a, b),
        (Some(only), None) | (None, Some(only)) => return Some(only.clone()),
        (None, None) => return None,
    };
    let buckets: IndexSet<&String> = first.iter().chain(second.iter()).map(|(k, _)| k).collect();
    let mut merged: RawWeights = IndexMap::new();
    for bucket in buckets {
        let a = first.get(bucket).unwrap_or(0.0);
        let b = second.get(bucket).unwrap_or(0.0);
        let mean = match rule {
            MergeRule::ZeroFilled => (a + b) / 2.0,
            MergeRule::ReportedOnly => {
                let reporters = u8::from(a > 0.0) + u8::from(b > 0.0);
                if reporters == 0 {
                    continue;
                }
                (a + b) / f64::from(reporters)
            }
        };
        merged.insert(bucket.to_string(), mean);
    }
    let normalized = normalize(&merged, 0.0);
    (!normalized.is_empty()).then_some(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTES: &str = "Artist Name: Grupo Aurora\n\
Song Title: Luz de Neón\n\
Genre: Regional Mexican\n\
\n\
Context: Couples do a slow dance with a magnetic pull move; #LuzDeNeon is everywhere.\n\
\n\
Demographics\n\
Age Demographics:\n\
13-17: 20%\n\
18-24: 45%\n\
25-34: 25%\n\
Gender:\n\
Female: 65%\n\
Male: 33%\n\
Region: Mexico\n\
Mood: romantic and nostalgic with a dramatic chorus\n";

    #[test]
    fn parses_header_fields() {
        let record = parse_research_notes(NOTES);
        assert_eq!(record.artist, "Grupo Aurora");
        assert_eq!(record.title, "Luz de Neón");
        assert_eq!(record.genre.as_deref(), Some("Regional Mexican"));
        assert!(record.context.starts_with("Couples do a slow dance"));
    }

    #[test]
    fn parses_demographic_sections() {
        let record = parse_research_notes(NOTES);
        let age = record.age_distribution.expect("age section");
        assert_eq!(age.get("18-24"), Some(0.45));
        assert_eq!(age.get("45+"), None);
        let gender = record.gender_distribution.expect("gender section");
        assert_eq!(gender.get("female"), Some(0.65));
        assert_eq!(gender.get("male"), Some(0.33));
        assert_eq!(gender.get("other"), None);
    }

    #[test]
    fn derives_moods_tags_and_hashtags() {
        let record = parse_research_notes(NOTES);
        let moods: Vec<&str> = record.mood_keywords.iter().map(String::as_str).collect();
        assert_eq!(moods, vec!["dramatic", "romantic", "nostalgic"]);
        let tags: Vec<&str> = record.category_tags.iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["dance"]);
        assert!(record.hashtags.contains("#luzdeneon"));
    }

    #[test]
    fn custom_catalog_keywords_change_suggested_tags() {
        let mut catalog = TemplateCatalog::default();
        for template in &mut catalog.templates {
            template.keywords.clear();
        }
        catalog.templates[4].keywords = vec!["magnetic".to_string()];
        let record = parse_research_notes_with(NOTES, &catalog);
        let tags: Vec<&str> = record.category_tags.iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["challenge"]);
        assert_eq!(record.artist, parse_research_notes(NOTES).artist);
    }

    #[test]
    fn empty_notes_fall_back_to_defaults() {
        let record = parse_research_notes("nothing useful here");
        assert_eq!(record, ResearchRecord::default());
        assert!(!record.has_context());
        assert!(!record.has_demographics());
    }

    #[test]
    fn merge_handles_missing_sides() {
        assert_eq!(merge_records(None, None), ResearchRecord::default());
        let only = parse_research_notes(NOTES);
        assert_eq!(merge_records(None, Some(only.clone())), only);
        assert_eq!(merge_records(Some(only.clone()), None), only);
    }

    #[test]
    fn merge_averages_and_labels() {
        let first = parse_research_notes(NOTES);
        let second = parse_research_notes(
            "Artist: Someone Else\nGenre: Pop\nContext: A glow up reveal trend\n\
Gender:\nFemale: 75%\nOther: 4%\n",
        );
        let merged = merge_records(Some(first), Some(second));
        assert_eq!(merged.artist, "Grupo Aurora");
        assert_eq!(merged.genre.as_deref(), Some("Regional Mexican"));
        assert!(merged.context.starts_with("[Research 1]: "));
        assert!(merged.context.contains("\n\n[Research 2]: A glow up reveal trend"));
        let tags: Vec<&str> = merged.category_tags.iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["dance", "transformation", "challenge"]);

        let gender = merged.gender_distribution.expect("merged gender");
        // female (0.65 + 0.75) / 2 = 0.70, male 0.33, other 0.04; total 1.07.
        // The 0.001 rounding residual lands on female.
        assert_eq!(gender.get("female"), Some(0.655));
        assert_eq!(gender.get("male"), Some(0.308));
        assert_eq!(gender.get("other"), Some(0.037));
        let age = merged.age_distribution.expect("age passes through");
        assert_eq!(age.get("18-24"), Some(0.45));
    }
}
