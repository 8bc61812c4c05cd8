use std::io;

use thiserror::Error;

/// Error type for configuration, IO, and serialization failures.
///
/// Degenerate inputs map to defined outputs; generation only fails on a
/// configuration it cannot honor.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The configuration cannot produce a dataset.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Reading inputs or writing the dataset failed.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// JSON could not be read or written.
    #[error("dataset serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
