use std::io;
use thiserror::Error;

use bedlite_core::errors::{AdaptationError, ValidationError};

/// Error type for bedlite-io operations.
#[derive(Error, Debug)]
pub enum BedError {
    /// IO error occurred during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A line of a BED source could not be turned into a record.
    #[error("Error parsing line {line} of {source_name}: {message}")]
    Parse {
        source_name: String,
        line: usize,
        message: String,
    },

    /// A record or writer setting is invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A record read from a source could not be indexed.
    #[error(transparent)]
    Adaptation(#[from] AdaptationError),

    /// The record carries more fields than the writer outputs and truncation is off.
    #[error(
        "Record has {observed} fields but the writer outputs {expected}; enable truncation to write it"
    )]
    TooManyFields { expected: usize, observed: usize },

    /// The record carries fewer fields than the writer outputs and padding is off.
    #[error(
        "Record has {observed} fields but the writer outputs {expected}; enable add_missing to pad it"
    )]
    TooFewFields { expected: usize, observed: usize },
}

/// Result type alias for bedlite-io operations.
pub type Result<T> = std::result::Result<T, BedError>;
