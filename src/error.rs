use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a submissions export from loading.
///
/// Cell-level coercion failures never show up here; they become absent
/// values on the [`Submission`](crate::data::model::Submission).
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("{} has no header row", path.display())]
    MissingHeader { path: PathBuf },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("unexpected layout: {0}")]
    Shape(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

impl LoadError {
    /// The file could not be opened or read at all.
    pub fn is_io(&self) -> bool {
        matches!(self, LoadError::Io { .. })
    }

    /// The file was read but its contents are not a usable export.
    pub fn is_parse(&self) -> bool {
        !self.is_io()
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
