use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use log::{debug, trace};

use bedlite_core::models::bed_record::MISSING_VALUE;
use bedlite_core::models::{BedRecord, Strand};
use bedlite_core::utils::get_dynamic_reader;

use crate::error::{BedError, Result};

/// Prefixes of lines that carry no record.
const HEADER_PREFIXES: [&str; 3] = ["#", "browser", "track"];

///
/// Reader over the records of a BED source.
///
/// Comment (`#`), `browser` and `track` lines and blank lines are skipped.
/// Each remaining line must have at least three tab-separated fields; optional
/// columns are read only when the line is long enough to hold them, and `.`
/// marks a column with no value.
///
/// The first error ends the iteration.
///
/// ```
/// use bedlite_io::BedSource;
///
/// let bed = "# header\nchr1\t10\t20\tpeak1\n\nchr2\t5\t9\n";
/// let mut source = BedSource::new(bed.as_bytes(), "inline");
///
/// let records = source.by_ref().collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0].name(), Some("peak1"));
/// assert_eq!(source.num_fields(), Some(4));
/// # Ok::<(), bedlite_io::BedError>(())
/// ```
pub struct BedSource<R> {
    reader: R,
    source_name: String,
    line_number: usize,
    num_fields: Option<usize>,
    buf: String,
    done: bool,
}

impl BedSource<BufReader<Box<dyn Read>>> {
    ///
    /// Open a BED file, gunzipping it if the name ends in `.gz`.
    ///
    /// # Arguments
    /// - path: the path to the file to read
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("opening BED source {}", path.display());
        let reader = get_dynamic_reader(path)?;
        Ok(BedSource::new(reader, path.display().to_string()))
    }
}

impl<R: BufRead> BedSource<R> {
    ///
    /// Wrap an already open reader.
    ///
    /// # Arguments
    /// - reader: where the lines come from
    /// - source_name: how errors refer to this source
    pub fn new(reader: R, source_name: impl Into<String>) -> Self {
        BedSource {
            reader,
            source_name: source_name.into(),
            line_number: 0,
            num_fields: None,
            buf: String::new(),
            done: false,
        }
    }

    /// Field count of the first record read, once one has been read.
    ///
    /// BED files should use one field count throughout, but later lines are
    /// not checked against it.
    pub fn num_fields(&self) -> Option<usize> {
        self.num_fields
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    fn error(&self, message: impl Into<String>) -> BedError {
        BedError::Parse {
            source_name: self.source_name.clone(),
            line: self.line_number,
            message: message.into(),
        }
    }

    fn parse_line(&self, line: &str) -> Result<BedRecord> {
        let fields: Vec<&str> = line.split('\t').collect();
        let num_fields = fields.len();
        if num_fields < 3 {
            return Err(self.error(format!(
                "BED records require at least 3 fields, found {num_fields}"
            )));
        }

        let start: u64 = self.parse_field(fields[1], "start")?;
        let end: u64 = self.parse_field(fields[2], "end")?;
        let mut record =
            BedRecord::new(fields[0], start, end).map_err(|e| self.error(e.to_string()))?;

        if num_fields >= 4 {
            if let Some(name) = optional(&fields, 3) {
                record = record.with_name(name);
            }
        }
        if num_fields >= 5 {
            if let Some(score) = optional(&fields, 4) {
                record = record.with_score(self.parse_field(score, "score")?);
            }
        }
        if num_fields >= 6 {
            if let Some(strand) = optional(&fields, 5) {
                record = record.with_strand(self.parse_field::<Strand>(strand, "strand")?);
            }
        }
        if num_fields >= 7 {
            let thick_start = optional(&fields, 6);
            let thick_end = optional(&fields, 7);
            match (thick_start, thick_end) {
                (Some(s), Some(e)) => {
                    record = record.with_thick(
                        self.parse_field(s, "thick start")?,
                        self.parse_field(e, "thick end")?,
                    );
                }
                (None, None) => {}
                _ => {
                    return Err(self.error("thick start and thick end must be defined together"));
                }
            }
        }
        if num_fields >= 9 {
            if let Some(rgb) = optional(&fields, 8) {
                let (r, g, b) = self.parse_rgb(rgb)?;
                record = record.with_item_rgb(r, g, b);
            }
        }
        if num_fields >= 10 {
            let count = optional(&fields, 9);
            let sizes = optional(&fields, 10);
            let starts = optional(&fields, 11);
            match (count, sizes, starts) {
                (Some(count), Some(sizes), Some(starts)) => {
                    let count: usize = self.parse_field(count, "block count")?;
                    let sizes = self.parse_list(sizes, "block sizes")?;
                    let starts = self.parse_list(starts, "block starts")?;
                    if sizes.len() != count {
                        return Err(self.error(format!(
                            "block count is {count} but {} block sizes were given",
                            sizes.len()
                        )));
                    }
                    record = record
                        .with_blocks(sizes, starts)
                        .map_err(|e| self.error(e.to_string()))?;
                }
                (None, None, None) => {}
                _ => {
                    return Err(
                        self.error("block count, sizes and starts must be defined together")
                    );
                }
            }
        }

        Ok(record)
    }

    fn parse_field<T: FromStr>(&self, raw: &str, what: &str) -> Result<T> {
        raw.parse()
            .map_err(|_| self.error(format!("invalid {what}: '{raw}'")))
    }

    fn parse_list(&self, raw: &str, what: &str) -> Result<Vec<u64>> {
        // UCSC writes a trailing comma after list fields
        raw.trim_end_matches(',')
            .split(',')
            .map(|v| self.parse_field(v, what))
            .collect()
    }

    fn parse_rgb(&self, raw: &str) -> Result<(u8, u8, u8)> {
        let values: Vec<u8> = raw
            .split(',')
            .map(|v| self.parse_field(v, "item rgb"))
            .collect::<Result<_>>()?;
        match values.as_slice() {
            [r, g, b] => Ok((*r, *g, *b)),
            _ => Err(self.error(format!(
                "item rgb must contain 3 comma separated integers, found '{raw}'"
            ))),
        }
    }

    fn next_record(&mut self) -> Result<Option<BedRecord>> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }
            if HEADER_PREFIXES.iter().any(|p| line.starts_with(p)) {
                trace!("skipping header line {} of {}", self.line_number, self.source_name);
                continue;
            }

            let record = self.parse_line(line)?;
            if self.num_fields.is_none() {
                self.num_fields = Some(line.split('\t').count());
            }
            return Ok(Some(record));
        }
    }
}

fn optional<'a>(fields: &[&'a str], index: usize) -> Option<&'a str> {
    fields.get(index).copied().filter(|f| *f != MISSING_VALUE)
}

impl<R: BufRead> Iterator for BedSource<R> {
    type Item = Result<BedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
