//! Genome-wide overlap detection over arbitrary interval-like values.
//!
//! [`OverlapDetector`] keeps one [`ContigIndex`] per reference sequence and
//! stores the caller's own values, so queries hand back exactly what was added.
//! Anything implementing [`GenomicSpan`] can be stored, and anything
//! implementing it can be used as a query, so the two sides do not need to be
//! the same type.
//!
//! # Examples
//!
//! ```
//! use bedlite_core::models::Interval;
//! use bedlite_overlaprs::OverlapDetector;
//!
//! let mut detector = OverlapDetector::new();
//! let query = Interval::new("chr1", 2, 20)?;
//! assert_eq!(detector.overlaps_any(&query)?, false);
//!
//! detector.add(Interval::new("chr2", 1, 100)?)?;
//! detector.add(Interval::new("chr1", 21, 100)?)?;
//! assert_eq!(detector.overlaps_any(&query)?, false);
//!
//! // [1, 2) ends where the query starts, so only [3, 10) overlaps
//! detector.add(Interval::new("chr1", 1, 2)?)?;
//! detector.add(Interval::new("chr1", 3, 10)?)?;
//! let hits = detector.get_overlaps(&query)?;
//! assert_eq!(hits, vec![&Interval::new("chr1", 3, 10)?]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Deduplication needs `Hash + Eq` on the stored type. A type without them can
//! still be added and iterated, but asking for overlaps does not compile:
//!
//! ```compile_fail
//! use bedlite_core::span::{GenomicSpan, StartCoordinate};
//! use bedlite_overlaprs::OverlapDetector;
//!
//! struct Feature(f64);
//!
//! impl GenomicSpan for Feature {
//!     fn reference_name(&self) -> &str { "chr1" }
//!     fn start_coordinate(&self) -> StartCoordinate { StartCoordinate::ZeroBased(0) }
//!     fn zero_based_end(&self) -> u64 { 30 }
//! }
//!
//! let detector = OverlapDetector::from_source([Feature(0.5)]).unwrap();
//! detector.get_overlaps(&("chr1", 0u64, 30u64));
//! ```

use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;

use fxhash::FxHashMap as HashMap;

use bedlite_core::errors::AdaptationError;
use bedlite_core::span::{GenomicSpan, NormalizedSpan, adapt};

use crate::contig_index::{ContigIndex, Entry, IndexState};

///
/// Detects and returns overlaps between a set of stored genomic values and a
/// query region.
///
/// The same value may be added more than once. Iteration yields every
/// insertion; the query methods return each distinct value at most once, in
/// ascending genomic order.
///
/// The detector is most efficient when everything is added before the first
/// query: each contig rebuilds its tree on the first query after an `add`.
///
#[derive(Debug)]
pub struct OverlapDetector<T> {
    /// contigs in first-seen order
    contigs: Vec<(String, ContigIndex<u64, T>)>,
    slots: HashMap<String, usize>,
}

impl<T> Default for OverlapDetector<T> {
    fn default() -> Self {
        OverlapDetector {
            contigs: Vec::new(),
            slots: HashMap::default(),
        }
    }
}

impl<T> OverlapDetector<T>
where
    T: GenomicSpan,
{
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Build a detector holding every value of `values`, in order.
    ///
    /// # Errors
    /// - the first value that cannot be adapted to a span
    ///
    pub fn from_source<V>(values: V) -> Result<Self, AdaptationError>
    where
        V: IntoIterator<Item = T>,
    {
        let mut detector = Self::new();
        detector.add_all(values)?;
        Ok(detector)
    }

    ///
    /// Add a value to the detector.
    ///
    /// The value is adapted once, here; one that cannot be adapted is
    /// rejected and the detector is left unchanged.
    ///
    pub fn add(&mut self, value: T) -> Result<(), AdaptationError> {
        let span = adapt(&value)?;
        let (start, end, negative) = (span.start, span.end, span.negative);

        let slot = match self.slots.get(span.refname) {
            Some(&slot) => slot,
            None => {
                let refname = span.refname.to_string();
                self.contigs.push((refname.clone(), ContigIndex::new()));
                self.slots.insert(refname, self.contigs.len() - 1);
                self.contigs.len() - 1
            }
        };

        self.contigs[slot].1.add(start, end, negative, value);
        Ok(())
    }

    ///
    /// Add each value in turn.
    ///
    /// Not atomic: when a value fails, every value before it stays added.
    ///
    pub fn add_all<V>(&mut self, values: V) -> Result<(), AdaptationError>
    where
        V: IntoIterator<Item = T>,
    {
        for value in values {
            self.add(value)?;
        }
        Ok(())
    }
}

impl<T> OverlapDetector<T> {
    fn contig(&self, refname: &str) -> Option<&ContigIndex<u64, T>> {
        self.slots.get(refname).map(|&slot| &self.contigs[slot].1)
    }

    ///
    /// Whether `query` overlaps anything in the detector. Stops at the first hit.
    ///
    pub fn overlaps_any<Q>(&self, query: &Q) -> Result<bool, AdaptationError>
    where
        Q: GenomicSpan + ?Sized,
    {
        let span = adapt(query)?;
        Ok(self
            .contig(span.refname)
            .is_some_and(|index| index.overlaps_any(span.start, span.end)))
    }

    /// Number of stored values, duplicates included.
    pub fn len(&self) -> usize {
        self.contigs.iter().map(|(_, index)| index.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.contigs.iter().all(|(_, index)| index.is_empty())
    }

    /// Reference names in the order they were first seen.
    pub fn contig_names(&self) -> impl Iterator<Item = &str> {
        self.contigs.iter().map(|(name, _)| name.as_str())
    }

    /// Index state of a contig, or `None` if nothing was added for it.
    pub fn contig_state(&self, refname: &str) -> Option<IndexState> {
        self.contig(refname).map(ContigIndex::state)
    }

    ///
    /// Every stored value: contigs in first-seen order, values within a contig
    /// in insertion order. Duplicates are kept.
    ///
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.contigs
            .iter()
            .flat_map(|(_, index)| index.entries().iter().map(|entry| &entry.val))
    }
}

impl<T> OverlapDetector<T>
where
    T: Hash + Eq,
{
    ///
    /// Every distinct stored value that overlaps `query`.
    ///
    /// Values are sorted by start, then end, then strand (positive or absent
    /// before negative), then reference name. Value-equal entries collapse to
    /// the one inserted first; entries with equal sort keys keep insertion order.
    ///
    pub fn get_overlaps<Q>(&self, query: &Q) -> Result<Vec<&T>, AdaptationError>
    where
        Q: GenomicSpan + ?Sized,
    {
        let span = adapt(query)?;
        Ok(self.overlapping_entries(&span))
    }

    ///
    /// Stored values that wholly enclose `query`:
    /// `stored.start <= query.start && query.end <= stored.end`.
    ///
    pub fn get_enclosing_intervals<Q>(&self, query: &Q) -> Result<Vec<&T>, AdaptationError>
    where
        Q: GenomicSpan + ?Sized,
    {
        let span = adapt(query)?;
        Ok(self.filter_overlaps(&span, |entry| {
            entry.start <= span.start && span.end <= entry.end
        }))
    }

    ///
    /// Stored values wholly enclosed by `query`:
    /// `stored.start >= query.start && stored.end <= query.end`.
    ///
    pub fn get_enclosed<Q>(&self, query: &Q) -> Result<Vec<&T>, AdaptationError>
    where
        Q: GenomicSpan + ?Sized,
    {
        let span = adapt(query)?;
        Ok(self.filter_overlaps(&span, |entry| {
            entry.start >= span.start && entry.end <= span.end
        }))
    }

    fn filter_overlaps<F>(&self, span: &NormalizedSpan<'_>, keep: F) -> Vec<&T>
    where
        F: Fn(&Entry<u64, T>) -> bool,
    {
        self.sorted_unique_entries(span)
            .into_iter()
            .filter(|entry| keep(entry))
            .map(|entry| &entry.val)
            .collect()
    }

    fn overlapping_entries(&self, span: &NormalizedSpan<'_>) -> Vec<&T> {
        self.sorted_unique_entries(span)
            .into_iter()
            .map(|entry| &entry.val)
            .collect()
    }

    fn sorted_unique_entries(&self, span: &NormalizedSpan<'_>) -> Vec<&Entry<u64, T>> {
        let Some(index) = self.contig(span.refname) else {
            return Vec::new();
        };

        let mut hits = index.find(span.start, span.end);
        hits.sort_unstable();

        let mut seen: HashSet<&T> = HashSet::with_capacity(hits.len());
        let mut entries: Vec<&Entry<u64, T>> = Vec::with_capacity(hits.len());
        for entry in hits.into_iter().filter_map(|i| index.get(i)) {
            if seen.insert(&entry.val) {
                entries.push(entry);
            }
        }

        // every entry here shares the query's reference name, which makes the
        // final refname tie-break a no-op
        entries.sort_by(|a, b| genomic_order(a, b));
        entries
    }
}

fn genomic_order<T>(a: &Entry<u64, T>, b: &Entry<u64, T>) -> Ordering {
    (a.start, a.end, a.negative).cmp(&(b.start, b.end, b.negative))
}

impl<'a, T> IntoIterator for &'a OverlapDetector<T> {
    type Item = &'a T;
    type IntoIter = Box<dyn Iterator<Item = &'a T> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
