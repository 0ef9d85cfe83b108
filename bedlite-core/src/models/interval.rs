use std::cmp::{max, min};
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::ValidationError;
use crate::models::{BedRecord, Strand};
use crate::span::{GenomicSpan, StartCoordinate};

///
/// A region of a reference sequence, 0-based and half-open: `[start, end)`.
///
/// An `Interval` always satisfies `start < end`; constructors fail with a
/// [`ValidationError`] rather than produce anything else. An optional strand,
/// name and payload (`item`) ride along with the coordinates and take part in
/// equality and hashing.
///
/// ```
/// use bedlite_core::models::{Interval, Strand};
///
/// let exon = Interval::new("chr1", 100, 200)?.with_strand(Strand::Negative);
/// assert_eq!(exon.length(), 100);
/// assert_eq!(exon.to_string(), "chr1:101-200(-)");
///
/// let other: Interval = "chr1:151-300".parse()?;
/// assert_eq!(exon.overlap(&other), 50);
/// # Ok::<(), bedlite_core::errors::ValidationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval<T = ()> {
    refname: String,
    start: u64,
    end: u64,
    strand: Option<Strand>,
    name: Option<String>,
    item: Option<T>,
}

impl Interval<()> {
    ///
    /// Create a new interval without strand, name or payload.
    ///
    /// # Arguments
    /// - refname: the reference sequence (chromosome) name
    /// - start: 0-based inclusive start
    /// - end: 0-based exclusive end, must be greater than `start`
    ///
    pub fn new(refname: impl Into<String>, start: u64, end: u64) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::EndNotAfterStart { start, end });
        }
        Ok(Interval {
            refname: refname.into(),
            start,
            end,
            strand: None,
            name: None,
            item: None,
        })
    }

    ///
    /// Build an interval covering the same region as a BED record.
    ///
    /// A record without a strand produces an interval without a strand, which
    /// behaves as positive everywhere strand matters.
    ///
    pub fn from_bed_record(record: &BedRecord) -> Self {
        Interval {
            refname: record.chrom().to_string(),
            start: record.start(),
            end: record.end(),
            strand: record.strand(),
            name: record.name().map(str::to_string),
            item: None,
        }
    }
}

impl<T> Interval<T> {
    pub fn with_strand(mut self, strand: Strand) -> Self {
        self.strand = Some(strand);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach a payload, replacing any previous one.
    pub fn with_item<U>(self, item: U) -> Interval<U> {
        Interval {
            refname: self.refname,
            start: self.start,
            end: self.end,
            strand: self.strand,
            name: self.name,
            item: Some(item),
        }
    }

    pub fn refname(&self) -> &str {
        &self.refname
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn strand(&self) -> Option<Strand> {
        self.strand
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn item(&self) -> Option<&T> {
        self.item.as_ref()
    }

    /// `true` only for an explicit negative strand.
    pub fn is_negative(&self) -> bool {
        self.strand == Some(Strand::Negative)
    }

    pub fn length(&self) -> u64 {
        self.end - self.start
    }

    /// Number of bases shared with `other`; 0 on different references.
    #[inline]
    pub fn overlap<U>(&self, other: &Interval<U>) -> u64 {
        if self.refname != other.refname {
            return 0;
        }
        min(self.end, other.end).saturating_sub(max(self.start, other.start))
    }
}

impl<T> GenomicSpan for Interval<T> {
    fn reference_name(&self) -> &str {
        &self.refname
    }

    fn start_coordinate(&self) -> StartCoordinate {
        StartCoordinate::ZeroBased(self.start)
    }

    fn zero_based_end(&self) -> u64 {
        self.end
    }

    fn strand(&self) -> Option<Strand> {
        self.strand
    }
}

///
/// Parse a UCSC-style position, `chr1:101-200` or `chr1:101-200(+)`.
///
/// The position is 1-based and fully closed; the interval is 0-based and
/// half-open, so `chr1:101-200` becomes `[100, 200)`. The reference name is
/// everything before the last `:`, which lets names like `HLA-DRB1*15:01:01:02`
/// through untouched. Thousands separators are accepted in the coordinates.
///
impl FromStr for Interval<()> {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidUcscPosition(s.to_string());

        let (position, strand) = match s.strip_suffix(')') {
            Some(rest) => {
                let (position, strand) = rest.rsplit_once('(').ok_or_else(invalid)?;
                (position, Some(strand.parse::<Strand>()?))
            }
            None => (s, None),
        };

        let (refname, range) = position.rsplit_once(':').ok_or_else(invalid)?;
        if refname.is_empty() {
            return Err(invalid());
        }
        let (start, end) = range.split_once('-').ok_or_else(invalid)?;

        let one_based_start: i64 = start.replace(',', "").parse().map_err(|_| invalid())?;
        let end: u64 = end.replace(',', "").parse().map_err(|_| invalid())?;

        let start = one_based_start - 1;
        if start < 0 {
            return Err(ValidationError::StartOutOfRange(start));
        }

        let interval = Interval::new(refname, start as u64, end)?;
        Ok(match strand {
            Some(strand) => interval.with_strand(strand),
            None => interval,
        })
    }
}

impl<T> Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.refname, self.start + 1, self.end)?;
        if let Some(strand) = self.strand {
            write!(f, "({})", strand)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(10, 10)]
    #[case(10, 9)]
    fn test_end_must_follow_start(#[case] start: u64, #[case] end: u64) {
        let result = Interval::new("chr1", start, end);
        assert_eq!(result, Err(ValidationError::EndNotAfterStart { start, end }));
    }

    #[rstest]
    fn test_length() {
        assert_eq!(Interval::new("chr1", 0, 1).unwrap().length(), 1);
        assert_eq!(Interval::new("chr1", 10, 250).unwrap().length(), 240);
    }

    #[rstest]
    #[case(("chr1", 10, 20), ("chr1", 15, 25), 5)]
    #[case(("chr1", 10, 20), ("chr1", 20, 30), 0)]
    #[case(("chr1", 10, 20), ("chr1", 0, 100), 10)]
    #[case(("chr1", 10, 20), ("chr2", 10, 20), 0)]
    fn test_overlap(
        #[case] a: (&str, u64, u64),
        #[case] b: (&str, u64, u64),
        #[case] expected: u64,
    ) {
        let a = Interval::new(a.0, a.1, a.2).unwrap();
        let b = Interval::new(b.0, b.1, b.2).unwrap();
        assert_eq!(a.overlap(&b), expected);
        assert_eq!(b.overlap(&a), expected);
    }

    #[rstest]
    fn test_value_equality() {
        let a = Interval::new("chr1", 1, 2).unwrap().with_name("a");
        let b = Interval::new("chr1", 1, 2).unwrap().with_name("a");
        let c = Interval::new("chr1", 1, 2).unwrap().with_name("c");
        assert_eq!(a, b);
        assert!(a != c);
    }

    #[rstest]
    fn test_item_and_strand() {
        let iv = Interval::new("chr7", 5, 9)
            .unwrap()
            .with_strand(Strand::Negative)
            .with_item(42u32);
        assert_eq!(iv.item(), Some(&42));
        assert!(iv.is_negative());
        assert_eq!(iv.refname(), "chr7");
    }

    #[rstest]
    fn test_from_ucsc() {
        let iv: Interval = "chr1:101-200".parse().unwrap();
        assert_eq!(iv, Interval::new("chr1", 100, 200).unwrap());
    }

    #[rstest]
    #[case("+", Strand::Positive)]
    #[case("-", Strand::Negative)]
    fn test_from_ucsc_with_strand(#[case] raw: &str, #[case] strand: Strand) {
        let iv: Interval = format!("chr1:101-200({raw})").parse().unwrap();
        assert_eq!(iv, Interval::new("chr1", 100, 200).unwrap().with_strand(strand));
    }

    #[rstest]
    #[case("chrUn_JTFH01001499v1_decoy")]
    #[case("HLA-DRB1*15:01:01:02")]
    #[case("chr10_GL383545v1_alt")]
    fn test_from_ucsc_other_contigs(#[case] contig: &str) {
        let iv: Interval = format!("{contig}:101-200").parse().unwrap();
        assert_eq!(iv, Interval::new(contig, 100, 200).unwrap());
    }

    #[rstest]
    fn test_from_ucsc_with_separators() {
        let iv: Interval = "chr1:1,001-2,000".parse().unwrap();
        assert_eq!((iv.start(), iv.end()), (1000, 2000));
    }

    #[rstest]
    fn test_from_ucsc_start_out_of_range() {
        let result = "chr1:0-200".parse::<Interval>();
        assert_eq!(result, Err(ValidationError::StartOutOfRange(-1)));
    }

    #[rstest]
    #[case("chr1")]
    #[case("chr1:100")]
    #[case(":1-10")]
    #[case("chr1:a-10")]
    #[case("chr1:1-10(x)")]
    fn test_from_ucsc_malformed(#[case] raw: &str) {
        assert!(raw.parse::<Interval>().is_err());
    }

    #[rstest]
    #[case("chr1:101-200")]
    #[case("chr1:101-200(-)")]
    #[case("HLA-DRB1*15:01:01:02:1-5(+)")]
    fn test_display_matches_ucsc(#[case] raw: &str) {
        let iv: Interval = raw.parse().unwrap();
        assert_eq!(iv.to_string(), raw);
    }
}
