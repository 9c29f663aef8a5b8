//! Error types for the BOM engine

use std::path::PathBuf;

use thiserror::Error;

/// An edit referenced a row id that is not in the tree
#[derive(Debug, Error)]
#[error("unknown row '{id}'")]
pub struct RowNotFound {
    pub id: String,
}

/// Errors that can occur while importing a BOM file.
///
/// Import is all-or-nothing: any of these aborts the load and no partial
/// data reaches the tree.
#[derive(Debug, Error)]
pub enum ImportError {
    /// File extension is neither .csv nor .json
    #[error("unsupported file format '{extension}'; use a CSV or JSON file")]
    UnsupportedFormat { extension: String },

    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON parsed, but is not an array of objects
    #[error("JSON file must contain an array of objects")]
    NotAnArray,

    /// The file parsed but produced no rows
    #[error("file contains no data rows")]
    Empty,
}

impl ImportError {
    pub fn unsupported(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors that can occur while exporting
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
