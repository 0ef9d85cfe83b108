use std::io::{self, BufRead, BufWriter, Write};

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::{debug, info};

use bedlite_core::models::BedRecord;
use bedlite_core::utils::get_dynamic_reader_w_stdin;
use bedlite_io::BedSource;
use bedlite_overlaprs::OverlapDetector;

use super::cli::OverlapMode;

pub fn run_overlap(matches: &ArgMatches) -> Result<()> {
    let targets = matches
        .get_one::<String>("targets")
        .context("A path to a targets file is required.")?;
    let queries = matches
        .get_one::<String>("queries")
        .context("A path to a queries file is required.")?;
    let mode = matches
        .get_one::<OverlapMode>("mode")
        .copied()
        .unwrap_or(OverlapMode::Overlaps);

    let detector = OverlapDetector::from_bed(targets)
        .with_context(|| format!("Failed to load targets from {targets}"))?;
    info!("indexed {} target intervals", detector.len());

    let reader = get_dynamic_reader_w_stdin(queries)
        .with_context(|| format!("Failed to open queries {queries}"))?;
    let source_name = if queries == "-" { "stdin" } else { queries.as_str() };

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    let reported = report_overlaps(
        &detector,
        BedSource::new(reader, source_name),
        mode,
        &mut writer,
    )?;
    writer.flush()?;

    debug!("reported {reported} lines in {mode:?} mode");
    Ok(())
}

///
/// Write, for each query record, the lines `mode` asks for. Returns the number
/// of lines written.
///
fn report_overlaps<R: BufRead, W: Write>(
    detector: &OverlapDetector<BedRecord>,
    queries: BedSource<R>,
    mode: OverlapMode,
    out: &mut W,
) -> Result<usize> {
    let mut reported = 0;

    for query in queries {
        let query = query?;

        let hits = match mode {
            OverlapMode::Any => {
                if detector.overlaps_any(&query)? {
                    writeln!(out, "{}", query.as_bed_line(None)?)?;
                    reported += 1;
                }
                continue;
            }
            OverlapMode::Overlaps => detector.get_overlaps(&query)?,
            OverlapMode::Enclosing => detector.get_enclosing_intervals(&query)?,
            OverlapMode::Enclosed => detector.get_enclosed(&query)?,
        };

        for hit in hits {
            writeln!(out, "{}", hit.as_bed_line(None)?)?;
            reported += 1;
        }
    }

    Ok(reported)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    const TARGETS: &str = "\
chr1\t100\t200\ta
chr1\t150\t400\tb
chr1\t160\t170\tc
chr2\t100\t200\td
";

    const QUERIES: &str = "\
# two queries
chr1\t155\t180\tq1
chr3\t1\t10\tq2
";

    #[fixture]
    fn detector() -> OverlapDetector<BedRecord> {
        let records = BedSource::new(TARGETS.as_bytes(), "targets")
            .collect::<bedlite_io::Result<Vec<_>>>()
            .unwrap();
        OverlapDetector::from_source(records).unwrap()
    }

    fn run(detector: &OverlapDetector<BedRecord>, mode: OverlapMode) -> String {
        let mut out = Vec::new();
        report_overlaps(detector, BedSource::new(QUERIES.as_bytes(), "queries"), mode, &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[rstest]
    #[case(OverlapMode::Any, "chr1\t155\t180\tq1\n")]
    #[case(OverlapMode::Overlaps, "chr1\t100\t200\ta\nchr1\t150\t400\tb\nchr1\t160\t170\tc\n")]
    #[case(OverlapMode::Enclosing, "chr1\t100\t200\ta\nchr1\t150\t400\tb\n")]
    #[case(OverlapMode::Enclosed, "chr1\t160\t170\tc\n")]
    fn test_report_overlaps(
        detector: OverlapDetector<BedRecord>,
        #[case] mode: OverlapMode,
        #[case] expected: &str,
    ) {
        assert_eq!(run(&detector, mode), expected);
    }

    #[rstest]
    fn test_bad_query_line_fails(detector: OverlapDetector<BedRecord>) {
        let mut out = Vec::new();
        let queries = BedSource::new("chr1\t10\n".as_bytes(), "queries");
        assert!(report_overlaps(&detector, queries, OverlapMode::Any, &mut out).is_err());
    }

    #[rstest]
    fn test_run_overlap_from_files() {
        let tempdir = tempfile::tempdir().unwrap();
        let targets = tempdir.path().join("targets.bed.gz");
        let queries = tempdir.path().join("queries.bed");
        let mut writer = bedlite_core::utils::get_dynamic_writer(&targets).unwrap();
        writer.write_all(TARGETS.as_bytes()).unwrap();
        writer.finish().unwrap();
        std::fs::write(&queries, QUERIES).unwrap();

        let matches = super::super::cli::create_overlap_cli()
            .try_get_matches_from([
                "overlap",
                "-t",
                targets.to_str().unwrap(),
                "-q",
                queries.to_str().unwrap(),
                "-m",
                "enclosed",
            ])
            .unwrap();
        assert!(run_overlap(&matches).is_ok());
    }
}
