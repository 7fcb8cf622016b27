use std::path::PathBuf;

use thiserror::Error;

/// Validation and contract errors exposed by `sectormap-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("sector code must be exactly 4 ASCII alphanumeric characters: '{value}'")]
    InvalidSectorCode { value: String },

    #[error("security code cannot be empty")]
    EmptySecurityCode,
    #[error("security code length {len} exceeds max {max}")]
    SecurityCodeTooLong { len: usize, max: usize },
    #[error("security code contains invalid character '{ch}' at index {index}")]
    SecurityCodeInvalidChar { ch: char, index: usize },

    #[error("invalid source '{value}', expected one of kabutan, minkabu, yahoo_japan")]
    InvalidSource { value: String },

    #[error("catalog must contain at least one sector")]
    EmptyCatalog,
    #[error("sector code '{code}' appears more than once in the catalog")]
    DuplicateSector { code: String },
    #[error("sector '{code}' must list between 1 and {max} leaders, got {count}")]
    LeaderCount {
        code: String,
        count: usize,
        max: usize,
    },
    #[error("sector '{code}' lists leader '{leader}' more than once")]
    DuplicateLeader { code: String, leader: String },

    #[error("invalid CSS selector '{selector}'")]
    InvalidSelector { selector: String },
    #[error("invalid extraction pattern for marker '{marker}': {reason}")]
    InvalidPattern { marker: String, reason: String },
    #[error("base url must start with http:// or https://: '{value}'")]
    InvalidBaseUrl { value: String },

    #[error("invalid missing-value style '{value}', expected null or dash")]
    InvalidMissingValueStyle { value: String },
}

/// Failure to persist the snapshot document. Always fatal for a run.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to write snapshot to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize snapshot: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
