//! Building an [`OverlapDetector`] from BED files.

use std::path::Path;

use log::debug;

use bedlite_core::models::BedRecord;
use bedlite_io::{BedError, BedSource};

use crate::OverlapDetector;

impl OverlapDetector<BedRecord> {
    ///
    /// Read every record of a BED file (optionally gzipped) into a new detector.
    ///
    /// # Arguments
    /// - path: the BED file to load
    ///
    /// ```no_run
    /// use bedlite_overlaprs::OverlapDetector;
    ///
    /// let targets = OverlapDetector::from_bed("targets.bed.gz")?;
    /// let hit = targets.overlaps_any(&("chr1", 10_000u64, 10_100u64))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_bed<P: AsRef<Path>>(path: P) -> Result<Self, BedError> {
        let mut detector = OverlapDetector::new();
        for record in BedSource::from_path(path.as_ref())? {
            detector.add(record?)?;
        }
        debug!(
            "loaded {} intervals on {} contigs from {}",
            detector.len(),
            detector.contig_names().count(),
            path.as_ref().display()
        );
        Ok(detector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use bedlite_io::BedWrite;

    #[rstest]
    #[case("targets.bed")]
    #[case("targets.bed.gz")]
    fn test_from_bed(#[case] file_name: &str) {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join(file_name);

        let records = vec![
            BedRecord::new("chr1", 100, 200).unwrap().with_name("a"),
            BedRecord::new("chr1", 150, 400).unwrap().with_name("b"),
            BedRecord::new("chr2", 100, 200).unwrap().with_name("c"),
        ];
        records.write_bed(&path).unwrap();

        let detector = OverlapDetector::from_bed(&path).unwrap();
        assert_eq!(detector.len(), 3);
        assert_eq!(detector.contig_names().collect::<Vec<_>>(), vec!["chr1", "chr2"]);

        let hits = detector.get_overlaps(&("chr1", 180u64, 190u64)).unwrap();
        assert_eq!(hits, vec![&records[0], &records[1]]);
        assert!(!detector.overlaps_any(&("chr3", 0u64, 1000u64)).unwrap());
    }

    #[rstest]
    fn test_from_bed_parse_error() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("broken.bed");
        std::fs::write(&path, "chr1\t1\t2\nchr1\tx\t5\n").unwrap();

        assert!(matches!(
            OverlapDetector::from_bed(&path),
            Err(BedError::Parse { line: 2, .. })
        ));
    }

    #[rstest]
    fn test_from_missing_bed() {
        let tempdir = tempfile::tempdir().unwrap();
        assert!(matches!(
            OverlapDetector::from_bed(tempdir.path().join("missing.bed")),
            Err(BedError::Io(_))
        ));
    }
}
