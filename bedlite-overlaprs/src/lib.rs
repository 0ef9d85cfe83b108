//! Genomic interval overlap detection in Rust.
//!
//! This crate answers "what overlaps this region?" for collections of
//! intervals spread across many reference sequences:
//!
//! - [`ContigIndex`] holds the intervals of one contig and keeps them in an
//!   implicit, max-end augmented binary tree that is rebuilt lazily on the first
//!   query after an insertion
//! - [`OverlapDetector`] routes caller values to one `ContigIndex` per contig
//!   and returns the stored values themselves, deduplicated and in genomic order
//!
//! ## Quick Start
//!
//! ```rust
//! use bedlite_core::models::Interval;
//! use bedlite_overlaprs::OverlapDetector;
//!
//! let genes = vec![
//!     Interval::new("chr17", 1000, 2000)?.with_name("BRCA1"),
//!     Interval::new("chr17", 3000, 4000)?.with_name("TP53"),
//!     Interval::new("chr7", 5000, 6000)?.with_name("EGFR"),
//! ];
//! let detector = OverlapDetector::from_source(genes)?;
//!
//! // query a specific region (chr17:1500-3500)
//! let names: Vec<&str> = detector
//!     .get_overlaps(&("chr17", 1500u64, 3500u64))?
//!     .into_iter()
//!     .filter_map(|gene| gene.name())
//!     .collect();
//! assert_eq!(names, vec!["BRCA1", "TP53"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Features
//!
//! - `bed`: build a detector straight from a BED file with
//!   `OverlapDetector::from_bed`

/// Per-contig lazily built interval tree.
///
/// See [`ContigIndex`] for details.
pub mod contig_index;

/// Genome-wide overlap detection.
///
/// See [`OverlapDetector`] for details.
pub mod overlap_detector;

#[cfg(feature = "bed")]
pub mod bed;

// re-exports
pub use self::contig_index::{ContigIndex, Entry, IndexState, IterFind};
pub use self::overlap_detector::OverlapDetector;

/// Constants used throughout the crate.
pub mod consts {
    /// The command name for overlap operations.
    pub const OVERLAP_CMD: &str = "overlap";
}
