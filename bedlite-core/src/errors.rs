use thiserror::Error;

/// A value type was built with fields that can never describe a real record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("start is out of range: {0}")]
    StartOutOfRange(i64),

    #[error("end <= start: {end} <= {start}")]
    EndNotAfterStart { start: u64, end: u64 },

    #[error("Error parsing UCSC position: {0}")]
    InvalidUcscPosition(String),

    #[error("Error parsing strand: {0}")]
    InvalidStrand(String),

    #[error("Number of items in block_sizes ({sizes}) must match block_starts ({starts})")]
    BlockCountMismatch { sizes: usize, starts: usize },

    #[error("Blocks must contain at least one block")]
    EmptyBlocks,

    #[error("Block start at first position should be zero, found {0}")]
    FirstBlockNotAtStart(u64),

    #[error("Last block end ({block_end}) must equal the interval end ({end})")]
    LastBlockEndMismatch { block_end: u64, end: u64 },

    #[error("BED records can only contain between 3 and 12 fields, requested {0}")]
    FieldCountOutOfRange(usize),
}

/// A value could not be turned into a span the index understands.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdaptationError {
    #[error("Span has an empty reference name")]
    EmptyReferenceName,

    #[error("One-based start must be at least 1 (reference {0})")]
    OneBasedStartIsZero(String),

    #[error("Span end precedes its start: {refname}:{start}-{end}")]
    EndBeforeStart { refname: String, start: u64, end: u64 },
}
