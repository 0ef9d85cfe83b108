use crate::errors::ValidationError;
use crate::models::{Interval, Strand};
use crate::span::{GenomicSpan, StartCoordinate};

/// Maximum number of fields in a well-formed BED line.
pub const MAX_BED_FIELDS: usize = 12;

/// Token used for a field that is present in the line but has no value.
pub const MISSING_VALUE: &str = ".";

///
/// One record of a BED file. Only `chrom`, `start` and `end` are required; the
/// optional columns follow <https://genome.ucsc.edu/FAQ/FAQformat.html#format1>.
///
/// Grouped columns are set together: the thick region is a `(start, end)` pair
/// and blocks are given as sizes and starts, from which the block count is
/// derived. Every constructor and setter validates, so a `BedRecord` is always
/// well formed.
///
/// ```
/// use bedlite_core::models::{BedRecord, Strand};
///
/// let record = BedRecord::new("chr1", 100, 150)?
///     .with_name("peak1")
///     .with_strand(Strand::Negative);
/// assert_eq!(record.bed_field_num(), 6);
/// assert_eq!(record.as_bed_line(None)?, "chr1\t100\t150\tpeak1\t.\t-");
/// # Ok::<(), bedlite_core::errors::ValidationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BedRecord {
    chrom: String,
    start: u64,
    end: u64,
    name: Option<String>,
    score: Option<i64>,
    strand: Option<Strand>,
    thick: Option<(u64, u64)>,
    item_rgb: Option<(u8, u8, u8)>,
    blocks: Option<Blocks>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Blocks {
    sizes: Vec<u64>,
    starts: Vec<u64>,
}

impl BedRecord {
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::EndNotAfterStart { start, end });
        }
        Ok(BedRecord {
            chrom: chrom.into(),
            start,
            end,
            name: None,
            score: None,
            strand: None,
            thick: None,
            item_rgb: None,
            blocks: None,
        })
    }

    ///
    /// Build a record from an [`Interval`].
    ///
    /// An interval without a strand becomes a **positive** record, so a record
    /// read without a strand does not survive a round trip through `Interval`
    /// unchanged.
    ///
    pub fn from_interval<T>(interval: &Interval<T>) -> Self {
        BedRecord {
            chrom: interval.refname().to_string(),
            start: interval.start(),
            end: interval.end(),
            name: interval.name().map(str::to_string),
            score: None,
            strand: Some(if interval.is_negative() {
                Strand::Negative
            } else {
                Strand::Positive
            }),
            thick: None,
            item_rgb: None,
            blocks: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_score(mut self, score: i64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_strand(mut self, strand: Strand) -> Self {
        self.strand = Some(strand);
        self
    }

    pub fn with_thick(mut self, thick_start: u64, thick_end: u64) -> Self {
        self.thick = Some((thick_start, thick_end));
        self
    }

    pub fn with_item_rgb(mut self, r: u8, g: u8, b: u8) -> Self {
        self.item_rgb = Some((r, g, b));
        self
    }

    ///
    /// Attach blocks (exons).
    ///
    /// # Arguments
    /// - sizes: length of each block
    /// - starts: start of each block relative to the record start
    ///
    /// Both lists must have the same, non-zero length; the first block must
    /// begin at the record start and the last must finish at the record end.
    ///
    pub fn with_blocks(mut self, sizes: Vec<u64>, starts: Vec<u64>) -> Result<Self, ValidationError> {
        if sizes.len() != starts.len() {
            return Err(ValidationError::BlockCountMismatch {
                sizes: sizes.len(),
                starts: starts.len(),
            });
        }
        let (Some(&first_start), Some(&last_start), Some(&last_size)) =
            (starts.first(), starts.last(), sizes.last())
        else {
            return Err(ValidationError::EmptyBlocks);
        };
        if first_start != 0 {
            return Err(ValidationError::FirstBlockNotAtStart(first_start));
        }
        let block_end = self.start + last_start + last_size;
        if block_end != self.end {
            return Err(ValidationError::LastBlockEndMismatch {
                block_end,
                end: self.end,
            });
        }
        self.blocks = Some(Blocks { sizes, starts });
        Ok(self)
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn score(&self) -> Option<i64> {
        self.score
    }

    pub fn strand(&self) -> Option<Strand> {
        self.strand
    }

    pub fn thick_start(&self) -> Option<u64> {
        self.thick.map(|(start, _)| start)
    }

    pub fn thick_end(&self) -> Option<u64> {
        self.thick.map(|(_, end)| end)
    }

    pub fn item_rgb(&self) -> Option<(u8, u8, u8)> {
        self.item_rgb
    }

    pub fn block_count(&self) -> Option<usize> {
        self.blocks.as_ref().map(|b| b.sizes.len())
    }

    pub fn block_sizes(&self) -> Option<&[u64]> {
        self.blocks.as_ref().map(|b| b.sizes.as_slice())
    }

    pub fn block_starts(&self) -> Option<&[u64]> {
        self.blocks.as_ref().map(|b| b.starts.as_slice())
    }

    /// `true` only for an explicit negative strand.
    pub fn is_negative(&self) -> bool {
        self.strand == Some(Strand::Negative)
    }

    ///
    /// The number of fields needed to write this record without losing data:
    /// the highest populated column group decides (3, 4, 5, 6, 8, 9 or 12).
    ///
    pub fn bed_field_num(&self) -> usize {
        if self.blocks.is_some() {
            12
        } else if self.item_rgb.is_some() {
            9
        } else if self.thick.is_some() {
            8
        } else if self.strand.is_some() {
            6
        } else if self.score.is_some() {
            5
        } else if self.name.is_some() {
            4
        } else {
            3
        }
    }

    /// All twelve BED fields as strings, with [`MISSING_VALUE`] for anything absent.
    pub fn bed_fields(&self) -> Vec<String> {
        fn or_missing<T>(value: Option<T>, f: impl FnOnce(T) -> String) -> String {
            value.map_or_else(|| MISSING_VALUE.to_string(), f)
        }
        fn join(values: &[u64]) -> String {
            values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(",")
        }

        vec![
            self.chrom.clone(),
            self.start.to_string(),
            self.end.to_string(),
            or_missing(self.name.as_deref(), str::to_string),
            or_missing(self.score, |s| s.to_string()),
            or_missing(self.strand, |s| s.to_string()),
            or_missing(self.thick_start(), |s| s.to_string()),
            or_missing(self.thick_end(), |s| s.to_string()),
            or_missing(self.item_rgb, |(r, g, b)| format!("{r},{g},{b}")),
            or_missing(self.block_count(), |c| c.to_string()),
            or_missing(self.block_sizes(), join),
            or_missing(self.block_starts(), join),
        ]
    }

    ///
    /// Render the record as a tab-delimited BED line.
    ///
    /// # Arguments
    /// - number_of_output_fields: how many leading fields to write (3..=12);
    ///   `None` uses [`BedRecord::bed_field_num`]
    ///
    pub fn as_bed_line(&self, number_of_output_fields: Option<usize>) -> Result<String, ValidationError> {
        let n = number_of_output_fields.unwrap_or_else(|| self.bed_field_num());
        if !(3..=MAX_BED_FIELDS).contains(&n) {
            return Err(ValidationError::FieldCountOutOfRange(n));
        }
        let mut fields = self.bed_fields();
        fields.truncate(n);
        Ok(fields.join("\t"))
    }
}

impl GenomicSpan for BedRecord {
    fn reference_name(&self) -> &str {
        &self.chrom
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

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn bed_records() -> Vec<BedRecord> {
        vec![
            BedRecord::new("1", 100, 150)
                .unwrap()
                .with_name("test_record1")
                .with_score(100)
                .with_strand(Strand::Positive)
                .with_thick(100, 100)
                .with_item_rgb(0, 0, 0)
                .with_blocks(vec![50], vec![0])
                .unwrap(),
            BedRecord::new("1", 200, 300)
                .unwrap()
                .with_name("test_record2")
                .with_score(100)
                .with_strand(Strand::Negative)
                .with_thick(210, 290)
                .with_item_rgb(0, 0, 0)
                .with_blocks(vec![100], vec![0])
                .unwrap(),
            BedRecord::new("2", 200, 300)
                .unwrap()
                .with_name("test_record3"),
        ]
    }

    #[rstest]
    fn test_end_must_follow_start() {
        assert_eq!(
            BedRecord::new("chr1", 5, 5),
            Err(ValidationError::EndNotAfterStart { start: 5, end: 5 })
        );
    }

    #[rstest]
    fn test_bed_field_num() {
        let base = BedRecord::new("chr1", 0, 10).unwrap();
        assert_eq!(base.bed_field_num(), 3);
        assert_eq!(base.clone().with_name("n").bed_field_num(), 4);
        assert_eq!(base.clone().with_score(1).bed_field_num(), 5);
        assert_eq!(base.clone().with_strand(Strand::Positive).bed_field_num(), 6);
        assert_eq!(base.clone().with_thick(1, 2).bed_field_num(), 8);
        assert_eq!(base.clone().with_item_rgb(1, 2, 3).bed_field_num(), 9);
        assert_eq!(
            base.with_blocks(vec![4, 3], vec![0, 7]).unwrap().bed_field_num(),
            12
        );
    }

    #[rstest]
    fn test_as_bed_line(bed_records: Vec<BedRecord>) {
        assert_eq!(
            bed_records[0].as_bed_line(None).unwrap(),
            "1\t100\t150\ttest_record1\t100\t+\t100\t100\t0,0,0\t1\t50\t0"
        );
        assert_eq!(
            bed_records[1].as_bed_line(Some(6)).unwrap(),
            "1\t200\t300\ttest_record2\t100\t-"
        );
        assert_eq!(
            bed_records[2].as_bed_line(Some(12)).unwrap(),
            "2\t200\t300\ttest_record3\t.\t.\t.\t.\t.\t.\t.\t."
        );
    }

    #[rstest]
    #[case(2)]
    #[case(13)]
    fn test_as_bed_line_field_count_out_of_range(bed_records: Vec<BedRecord>, #[case] n: usize) {
        assert_eq!(
            bed_records[0].as_bed_line(Some(n)),
            Err(ValidationError::FieldCountOutOfRange(n))
        );
    }

    #[rstest]
    fn test_block_validation() {
        let record = || BedRecord::new("chr1", 100, 200).unwrap();

        assert_eq!(
            record().with_blocks(vec![10, 10], vec![0]),
            Err(ValidationError::BlockCountMismatch { sizes: 2, starts: 1 })
        );
        assert_eq!(
            record().with_blocks(vec![], vec![]),
            Err(ValidationError::EmptyBlocks)
        );
        assert_eq!(
            record().with_blocks(vec![100], vec![5]),
            Err(ValidationError::FirstBlockNotAtStart(5))
        );
        assert_eq!(
            record().with_blocks(vec![10, 10], vec![0, 50]),
            Err(ValidationError::LastBlockEndMismatch {
                block_end: 160,
                end: 200
            })
        );

        let ok = record().with_blocks(vec![10, 20], vec![0, 80]).unwrap();
        assert_eq!(ok.block_count(), Some(2));
        assert_eq!(ok.block_sizes(), Some(&[10, 20][..]));
        assert_eq!(ok.block_starts(), Some(&[0, 80][..]));
    }

    #[rstest]
    fn test_conversion_to_interval(bed_records: Vec<BedRecord>) {
        for record in &bed_records {
            let interval = Interval::from_bed_record(record);

            assert_eq!(interval.refname(), record.chrom());
            assert_eq!(interval.start(), record.start());
            assert_eq!(interval.end(), record.end());
            assert_eq!(interval.is_negative(), record.strand() == Some(Strand::Negative));
            assert_eq!(interval.name(), record.name());
        }
    }

    #[rstest]
    fn test_construction_from_interval(bed_records: Vec<BedRecord>) {
        for record in &bed_records {
            let new_record = BedRecord::from_interval(&Interval::from_bed_record(record));

            assert_eq!(new_record.chrom(), record.chrom());
            assert_eq!(new_record.start(), record.start());
            assert_eq!(new_record.end(), record.end());
            assert_eq!(new_record.name(), record.name());

            match record.strand() {
                None => assert_eq!(new_record.strand(), Some(Strand::Positive)),
                Some(strand) => assert_eq!(new_record.strand(), Some(strand)),
            }
        }
    }
}
