use std::error::Error;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{Parser, error::ErrorKind};
use tracing::info;

use crate::config::{AnalysisWindow, GeneratorConfig};
use crate::constants::cli::{
    DEFAULT_OUTPUT, DEFAULT_PRIMARY_INPUT, DEFAULT_SECONDARY_INPUT, FALLBACK_INPUT,
};
use crate::constants::window::MAX_WINDOW_DAYS;
use crate::dataset::Dataset;
use crate::generator::TrendGenerator;
use crate::research::{ResearchRecord, merge_records};
use crate::templates::TemplateCatalog;
use crate::transport::fs::{
    read_creative_example, read_research_notes, read_template_catalog, write_dataset,
};
use crate::utils::format_with_commas;

#[derive(Debug, Parser)]
#[command(
    name = "trendgen",
    version,
    disable_help_subcommand = true,
    about = "Generate a synthetic trend-analytics dataset for a song",
    long_about = "Parse one or two research notes files, merge them, and write a seeded synthetic trend-analytics dataset as JSON.",
    after_help = "Without NOTES, perplexity_research.txt and openai_research.txt are read from the working directory, falling back to input.txt when neither exists."
)]
struct GenerateCli {
    #[arg(value_name = "NOTES", help = "Up to two research notes files to merge")]
    inputs: Vec<PathBuf>,
    #[arg(
        long,
        short,
        value_name = "PATH",
        default_value = DEFAULT_OUTPUT,
        help = "Where the dataset JSON is written"
    )]
    output: PathBuf,
    #[arg(
        long,
        default_value_t = 3,
        value_parser = parse_positive_usize,
        help = "Number of trends to generate"
    )]
    trends: usize,
    #[arg(
        long,
        value_name = "DAYS",
        default_value_t = 30,
        value_parser = parse_window_days,
        help = "Analysis window length in days (30 and 90 are the presets)"
    )]
    window: u32,
    #[arg(long, help = "Seed for reproducible output; random when omitted")]
    seed: Option<u64>,
    #[arg(
        long,
        value_name = "RFC3339",
        value_parser = parse_timestamp,
        help = "Override the current time the analysis window ends at"
    )]
    now: Option<DateTime<Utc>>,
    #[arg(long, value_name = "PATH", help = "JSON template catalog replacing the built-in one")]
    templates: Option<PathBuf>,
    #[arg(
        long = "creative-example",
        value_name = "PATH",
        help = "JSON creative example attached to the lead trend"
    )]
    creative_example: Option<PathBuf>,
}

/// Run the generator CLI with `args_iter` (program name excluded).
pub fn run_generate<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let Some(cli) =
        parse_cli::<GenerateCli, _>(std::iter::once("trendgen".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };
    if cli.inputs.len() > 2 {
        return Err(format!(
            "expected at most 2 research notes files, got {}",
            cli.inputs.len()
        )
        .into());
    }

    let catalog = match &cli.templates {
        Some(path) => read_template_catalog(path)?,
        None => TemplateCatalog::default(),
    };
    let inputs = resolve_input_paths(cli.inputs, Path::new(""));
    println!("Reading research files...");
    let record = load_record(&inputs, &catalog);
    print_record_summary(&record);

    let seed = cli.seed.unwrap_or_else(rand::random);
    info!("[trendgen] using seed {}", seed);
    let real_creative_example = cli
        .creative_example
        .as_deref()
        .map(read_creative_example)
        .transpose()?;

    let config = GeneratorConfig {
        seed,
        num_trends: cli.trends,
        window: AnalysisWindow::from_days(cli.window),
        catalog,
        real_creative_example,
        ..GeneratorConfig::new(cli.now.unwrap_or_else(Utc::now))
    };
    let generator = TrendGenerator::new(config, record)?;
    let dataset = generator.generate_complete_dataset()?;
    write_dataset(&cli.output, &dataset)?;
    print_dataset_summary(&dataset, &cli.output);
    Ok(())
}

/// Resolve which notes files to read.
///
/// Explicit paths win. Otherwise the two default files under `base` are used,
/// or the single fallback file when neither default exists.
pub fn resolve_input_paths(explicit: Vec<PathBuf>, base: &Path) -> Vec<PathBuf> {
    if !explicit.is_empty() {
        return explicit;
    }
    let primary = base.join(DEFAULT_PRIMARY_INPUT);
    let secondary = base.join(DEFAULT_SECONDARY_INPUT);
    let fallback = base.join(FALLBACK_INPUT);
    if !primary.exists() && !secondary.exists() && fallback.exists() {
        println!("Research files not found. Using {} as fallback.", fallback.display());
        return vec![fallback];
    }
    vec![primary, secondary]
}

/// Read up to two notes files and merge what could be parsed.
pub fn load_record(paths: &[PathBuf], catalog: &TemplateCatalog) -> ResearchRecord {
    let first = paths
        .first()
        .and_then(|path| read_research_notes(path, catalog));
    let second = match (paths.first(), paths.get(1)) {
        (Some(a), Some(b)) if a != b => read_research_notes(b, catalog),
        _ => None,
    };
    match (&first, &second, paths) {
        (Some(_), Some(_), [a, b]) => println!("Merged data from: {} + {}", a.display(), b.display()),
        (Some(_), None, [a, ..]) => println!("Using data from: {}", a.display()),
        (None, Some(_), [_, b]) => println!("Using data from: {}", b.display()),
        _ => println!("No research data found; using defaults."),
    }
    merge_records(first, second)
}

fn print_record_summary(record: &ResearchRecord) {
    println!("Song: '{}' by {}", record.title, record.artist);
    if let Some(genre) = &record.genre {
        println!("Genre: {}", genre);
    }
    if record.has_demographics() {
        println!("Found demographic data from research");
        if let Some(age) = &record.age_distribution {
            let buckets: Vec<&str> = age.iter().map(|(bucket, _)| bucket.as_str()).collect();
            println!("  Age ranges: {}", buckets.join(", "));
        }
        if let Some(gender) = &record.gender_distribution {
            let split: Vec<String> = gender
                .iter()
                .map(|(bucket, share)| format!("{}: {:.1}%", bucket, share * 100.0))
                .collect();
            println!("  Gender split: {}", split.join(", "));
        }
    }
    if !record.mood_keywords.is_empty() {
        let moods: Vec<&str> = record.mood_keywords.iter().map(String::as_str).collect();
        println!("Mood keywords: {}", moods.join(", "));
    }
    if !record.category_tags.is_empty() {
        let tags: Vec<&str> = record.category_tags.iter().map(String::as_str).collect();
        println!("Suggested trend types: {}", tags.join(", "));
    }
}

fn print_dataset_summary(dataset: &Dataset, output: &Path) {
    let metrics = &dataset.aggregate_metrics;
    println!();
    println!(
        "Generated data for '{}' by {}",
        dataset.song_metadata.title, dataset.song_metadata.artist
    );
    println!(
        "Created {} trends with {} total videos",
        metrics.total_trends,
        format_with_commas(metrics.total_videos)
    );
    println!("Total views: {}", format_with_commas(metrics.total_views));
    println!("Saved to: {}", output.display());
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    let parsed = raw
        .parse::<usize>()
        .map_err(|_| format!("Could not parse --trends value '{}' as a positive integer", raw))?;
    if parsed == 0 {
        return Err("--trends must be greater than zero".to_string());
    }
    Ok(parsed)
}

fn parse_window_days(raw: &str) -> Result<u32, String> {
    let parsed = raw
        .parse::<u32>()
        .map_err(|_| format!("Could not parse --window value '{}' as a number of days", raw))?;
    if parsed == 0 {
        return Err("--window must span at least one day".to_string());
    }
    if parsed > MAX_WINDOW_DAYS {
        return Err(format!("--window may span at most {} days", MAX_WINDOW_DAYS));
    }
    Ok(parsed)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| format!("invalid --now timestamp '{}': {}", raw, err))
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}
