// hotel_catalog/src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// The catalog source is unreadable or malformed.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported catalog format {path:?} (expected .csv or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("malformed CSV catalog")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON catalog")]
    Json(#[from] serde_json::Error),

    #[error("catalog must contain a '{column}' column")]
    MissingIdentifier { column: &'static str },

    #[error("record {row} has an empty or non-text '{column}'")]
    InvalidIdentifier { row: usize, column: &'static str },

    #[error("record {row} is not a flat object")]
    InvalidRecord { row: usize },
}

/// The category grouping resource is malformed.
#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("failed to read category file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("category resource is not valid JSON")]
    Json(#[from] serde_json::Error),

    #[error("category resource must be a JSON object")]
    NotAnObject,

    #[error("category '{category}' must map to a list of strings")]
    NotAList { category: String },

    #[error("category '{category}' has a non-string entry at position {index}")]
    NotAString { category: String, index: usize },
}
