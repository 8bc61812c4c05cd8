use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::dataset::{CreativeExample, Dataset};
use crate::errors::GeneratorError;
use crate::research::{ResearchRecord, parse_research_notes_with};
use crate::templates::TemplateCatalog;

/// Read and parse a research notes file, suggesting categories from `catalog`.
///
/// Missing or unreadable files are logged and yield `None`; callers fall back
/// to an empty record.
pub fn read_research_notes(path: &Path, catalog: &TemplateCatalog) -> Option<ResearchRecord> {
    match fs::read_to_string(path) {
        Ok(text) => {
            debug!("[trendgen:fs] read {} bytes from {}", text.len(), path.display());
            Some(parse_research_notes_with(&text, catalog))
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(
                "[trendgen:fs] {} not found; using default values",
                path.display()
            );
            None
        }
        Err(err) => {
            warn!(
                "[trendgen:fs] failed to read {}: {}; using default values",
                path.display(),
                err
            );
            None
        }
    }
}

/// Write `dataset` as pretty-printed JSON, replacing any existing file.
pub fn write_dataset(path: &Path, dataset: &Dataset) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, dataset)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!(
        "[trendgen:fs] wrote {} trends to {}",
        dataset.trends.len(),
        path.display()
    );
    Ok(())
}

/// Load a template catalog from a JSON file.
pub fn read_template_catalog(path: &Path) -> Result<TemplateCatalog, GeneratorError> {
    let reader = BufReader::new(File::open(path)?);
    let catalog: TemplateCatalog = serde_json::from_reader(reader)?;
    if catalog.is_empty() {
        return Err(GeneratorError::Configuration(format!(
            "template catalog {} defines no categories",
            path.display()
        )));
    }
    Ok(catalog)
}

/// Load a real-world creative example from a JSON file.
pub fn read_creative_example(path: &Path) -> Result<CreativeExample, GeneratorError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
