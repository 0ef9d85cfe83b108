//! The span capability: anything that can name a reference sequence and a
//! half-open range on it.
//!
//! Record types from different sources disagree on field names and on whether
//! a start is 0- or 1-based. Each type states its own convention once, by
//! implementing [`GenomicSpan`], and [`adapt`] turns it into a
//! [`NormalizedSpan`]: zero-based, half-open, with an explicit strand flag.
//! Everything downstream of the adapter only ever sees normalized spans.
//!
//! ```
//! use bedlite_core::span::{adapt, GenomicSpan, StartCoordinate};
//!
//! // a feature whose start is stored one-based
//! struct Exon {
//!     contig: String,
//!     one_based_start: u64,
//!     end: u64,
//! }
//!
//! impl GenomicSpan for Exon {
//!     fn reference_name(&self) -> &str {
//!         &self.contig
//!     }
//!     fn start_coordinate(&self) -> StartCoordinate {
//!         StartCoordinate::OneBased(self.one_based_start)
//!     }
//!     fn zero_based_end(&self) -> u64 {
//!         self.end
//!     }
//! }
//!
//! let exon = Exon { contig: "chr1".to_string(), one_based_start: 10, end: 60 };
//! let span = adapt(&exon).unwrap();
//! assert_eq!((span.refname, span.start, span.end, span.negative), ("chr1", 9, 60, false));
//! ```

use crate::errors::AdaptationError;
use crate::models::Strand;

/// The convention a start coordinate is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartCoordinate {
    /// 0-based, inclusive.
    ZeroBased(u64),
    /// 1-based, inclusive. Must be at least 1.
    OneBased(u64),
}

///
/// A value that sits on a reference sequence.
///
/// Only the reference name, start and (0-based, exclusive) end are required.
/// Types that know their orientation override [`GenomicSpan::strand`]; for
/// everything else the strand is absent, which orders and negates as positive.
///
pub trait GenomicSpan {
    /// The reference sequence (contig/chromosome) name.
    fn reference_name(&self) -> &str;

    /// The start position, tagged with the convention it is stored in.
    fn start_coordinate(&self) -> StartCoordinate;

    /// The 0-based, exclusive end position.
    fn zero_based_end(&self) -> u64;

    /// The strand, if this type records one.
    fn strand(&self) -> Option<Strand> {
        None
    }
}

/// A span reduced to the four fields the overlap index works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedSpan<'a> {
    pub refname: &'a str,
    pub start: u64,
    pub end: u64,
    pub negative: bool,
}

impl NormalizedSpan<'_> {
    /// `true` if the two spans share a reference and at least one base.
    #[inline]
    pub fn overlaps(&self, other: &NormalizedSpan<'_>) -> bool {
        self.refname == other.refname && self.start < other.end && self.end > other.start
    }

    /// `true` if `other` lies wholly within this span.
    #[inline]
    pub fn encloses(&self, other: &NormalizedSpan<'_>) -> bool {
        self.refname == other.refname && self.start <= other.start && other.end <= self.end
    }
}

///
/// Normalize any [`GenomicSpan`] into a [`NormalizedSpan`].
///
/// # Errors
/// - the reference name is empty
/// - a one-based start is 0
/// - the end lies before the normalized start
///
pub fn adapt<S>(value: &S) -> Result<NormalizedSpan<'_>, AdaptationError>
where
    S: GenomicSpan + ?Sized,
{
    let refname = value.reference_name();
    if refname.is_empty() {
        return Err(AdaptationError::EmptyReferenceName);
    }

    let start = match value.start_coordinate() {
        StartCoordinate::ZeroBased(start) => start,
        StartCoordinate::OneBased(0) => {
            return Err(AdaptationError::OneBasedStartIsZero(refname.to_string()));
        }
        StartCoordinate::OneBased(start) => start - 1,
    };

    let end = value.zero_based_end();
    if end < start {
        return Err(AdaptationError::EndBeforeStart {
            refname: refname.to_string(),
            start,
            end,
        });
    }

    Ok(NormalizedSpan {
        refname,
        start,
        end,
        negative: value.strand() == Some(Strand::Negative),
    })
}

// plain (chrom, start, end) tuples, zero-based half-open
impl<S: AsRef<str>> GenomicSpan for (S, u64, u64) {
    fn reference_name(&self) -> &str {
        self.0.as_ref()
    }

    fn start_coordinate(&self) -> StartCoordinate {
        StartCoordinate::ZeroBased(self.1)
    }

    fn zero_based_end(&self) -> u64 {
        self.2
    }
}

impl<S: GenomicSpan + ?Sized> GenomicSpan for &S {
    fn reference_name(&self) -> &str {
        (**self).reference_name()
    }

    fn start_coordinate(&self) -> StartCoordinate {
        (**self).start_coordinate()
    }

    fn zero_based_end(&self) -> u64 {
        (**self).zero_based_end()
    }

    fn strand(&self) -> Option<Strand> {
        (**self).strand()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    struct Stranded {
        chrom: &'static str,
        start: u64,
        end: u64,
        negative: bool,
    }

    impl GenomicSpan for Stranded {
        fn reference_name(&self) -> &str {
            self.chrom
        }

        fn start_coordinate(&self) -> StartCoordinate {
            StartCoordinate::ZeroBased(self.start)
        }

        fn zero_based_end(&self) -> u64 {
            self.end
        }

        fn strand(&self) -> Option<Strand> {
            Some(if self.negative {
                Strand::Negative
            } else {
                Strand::Positive
            })
        }
    }

    struct OneBased(u64, u64);

    impl GenomicSpan for OneBased {
        fn reference_name(&self) -> &str {
            "chr2"
        }

        fn start_coordinate(&self) -> StartCoordinate {
            StartCoordinate::OneBased(self.0)
        }

        fn zero_based_end(&self) -> u64 {
            self.1
        }
    }

    #[rstest]
    fn test_adapt_tuple_defaults_to_positive() {
        let span = adapt(&("chr1", 5u64, 10u64)).unwrap();
        assert_eq!(
            span,
            NormalizedSpan {
                refname: "chr1",
                start: 5,
                end: 10,
                negative: false
            }
        );
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn test_adapt_stranded(#[case] negative: bool) {
        let value = Stranded {
            chrom: "chrX",
            start: 1,
            end: 2,
            negative,
        };
        assert_eq!(adapt(&value).unwrap().negative, negative);
    }

    #[rstest]
    fn test_adapt_one_based_start() {
        let span = adapt(&OneBased(10, 60)).unwrap();
        assert_eq!((span.start, span.end), (9, 60));
    }

    #[rstest]
    fn test_adapt_one_based_zero_fails() {
        let err = adapt(&OneBased(0, 60)).unwrap_err();
        assert_eq!(err, AdaptationError::OneBasedStartIsZero("chr2".to_string()));
    }

    #[rstest]
    fn test_adapt_empty_refname_fails() {
        let err = adapt(&(String::new(), 1u64, 2u64)).unwrap_err();
        assert_eq!(err, AdaptationError::EmptyReferenceName);
    }

    #[rstest]
    fn test_adapt_inverted_span_fails() {
        assert!(matches!(
            adapt(&("chr1", 10u64, 9u64)),
            Err(AdaptationError::EndBeforeStart { start: 10, end: 9, .. })
        ));
    }

    #[rstest]
    fn test_adapt_zero_length_span() {
        let span = adapt(&("chr1", 10u64, 10u64)).unwrap();
        assert_eq!((span.start, span.end), (10, 10));
    }

    #[rstest]
    fn test_adapt_through_reference() {
        let value = ("chr3".to_string(), 7, 9);
        let by_ref = &value;
        assert_eq!(adapt(&by_ref).unwrap().refname, "chr3");
    }

    #[rstest]
    #[case(("chr1", 0, 10), ("chr1", 9, 20), true)]
    #[case(("chr1", 0, 10), ("chr1", 10, 20), false)]
    #[case(("chr1", 0, 10), ("chr2", 0, 10), false)]
    fn test_normalized_overlaps(
        #[case] a: (&str, u64, u64),
        #[case] b: (&str, u64, u64),
        #[case] expected: bool,
    ) {
        let a = adapt(&a).unwrap();
        let b = adapt(&b).unwrap();
        assert_eq!(a.overlaps(&b), expected);
        assert_eq!(b.overlaps(&a), expected);
    }

    #[rstest]
    fn test_normalized_encloses() {
        let outer = adapt(&("chr1", 0u64, 100u64)).unwrap();
        let inner = adapt(&("chr1", 10u64, 100u64)).unwrap();
        assert!(outer.encloses(&inner));
        assert!(!inner.encloses(&outer));
    }
}
