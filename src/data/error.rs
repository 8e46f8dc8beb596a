use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while reading the processed dataset.
///
/// All variants are fatal for the dashboard: without data there is nothing
/// to render.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("arrow: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: {message}")]
    Parse { row: usize, message: String },
}

impl LoadError {
    /// True for the "file is absent" kind, false for every malformed-input kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound { .. })
    }
}
