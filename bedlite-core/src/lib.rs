//! Core models for bedlite.
//!
//! - [`models::Interval`]: a validated, 0-based half-open region with optional
//!   strand, name and payload
//! - [`models::BedRecord`]: one line of a BED file, validated on construction
//! - [`span::GenomicSpan`]: the capability the overlap index needs from any
//!   stored or query value, and [`span::adapt`] which normalizes it
//!
//! Reading and writing BED files lives in `bedlite-io`; overlap queries live
//! in `bedlite-overlaprs`.
pub mod errors;
pub mod models;
pub mod span;
pub mod utils;
