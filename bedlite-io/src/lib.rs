//! # Reading and writing BED files.
//!
//! This small crate provides the BED adapters used around the overlap index:
//! [`BedSource`] streams [`BedRecord`](bedlite_core::models::BedRecord)s out of
//! a file or any buffered reader, and [`BedWriter`] writes them back with a fixed
//! number of fields. Paths ending in `.gz` are (de)compressed transparently.
//!
pub mod error;
pub mod reader;
pub mod writer;

// re-expose core types
pub use error::*;
pub use reader::BedSource;
pub use writer::{BedWrite, BedWriter};
