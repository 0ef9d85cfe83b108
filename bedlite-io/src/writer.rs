use std::io::Write;
use std::path::Path;

use log::debug;

use bedlite_core::errors::ValidationError;
use bedlite_core::models::BedRecord;
use bedlite_core::models::bed_record::MAX_BED_FIELDS;
use bedlite_core::utils::{DynamicWriter, get_dynamic_writer};

use crate::error::{BedError, Result};

///
/// Writer of BED records with a fixed number of fields per line.
///
/// The field count is either given up front or taken from the first record
/// written. A record that needs more fields than that is refused unless
/// `truncate` is set; one that needs fewer is refused unless `add_missing` is
/// set, in which case the extra columns are written as `.`.
///
/// ```
/// use bedlite_core::models::{BedRecord, Strand};
/// use bedlite_io::BedWriter;
///
/// let mut writer = BedWriter::new(Vec::new()).with_num_fields(6)?.add_missing(true);
/// writer.write(&BedRecord::new("chr1", 10, 20)?.with_strand(Strand::Negative))?;
///
/// let bytes = writer.finish()?;
/// assert_eq!(String::from_utf8(bytes).unwrap(), "chr1\t10\t20\t.\t.\t-\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct BedWriter<W: Write> {
    writer: W,
    num_fields: Option<usize>,
    truncate: bool,
    add_missing: bool,
}

impl BedWriter<DynamicWriter> {
    ///
    /// Create (or overwrite) a BED file, gzip-compressing it if the name ends in
    /// `.gz`. Missing parent directories are created.
    ///
    /// Finish with [`BedWriter::close`] so a failure completing the file is
    /// reported instead of lost on drop.
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    pub fn to_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("writing BED records to {}", path.display());
        Ok(BedWriter::new(get_dynamic_writer(path)?))
    }

    /// Flush, write the gzip trailer if compressing, and close the file.
    pub fn close(self) -> Result<()> {
        self.finish()?.finish()?;
        Ok(())
    }
}

impl<W: Write> BedWriter<W> {
    pub fn new(writer: W) -> Self {
        BedWriter {
            writer,
            num_fields: None,
            truncate: false,
            add_missing: false,
        }
    }

    /// Fix the number of fields per line; must be in `3..=12`.
    pub fn with_num_fields(mut self, num_fields: usize) -> Result<Self> {
        if !(3..=MAX_BED_FIELDS).contains(&num_fields) {
            return Err(ValidationError::FieldCountOutOfRange(num_fields).into());
        }
        self.num_fields = Some(num_fields);
        Ok(self)
    }

    /// Allow records with more fields than the writer's count, dropping the extras.
    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    /// Allow records with fewer fields than the writer's count, padding with `.`.
    pub fn add_missing(mut self, add_missing: bool) -> Self {
        self.add_missing = add_missing;
        self
    }

    /// The fixed field count, once known.
    pub fn num_fields(&self) -> Option<usize> {
        self.num_fields
    }

    pub fn write(&mut self, record: &BedRecord) -> Result<()> {
        let observed = record.bed_field_num();
        let expected = *self.num_fields.get_or_insert(observed);

        if observed > expected && !self.truncate {
            return Err(BedError::TooManyFields { expected, observed });
        }
        if observed < expected && !self.add_missing {
            return Err(BedError::TooFewFields { expected, observed });
        }

        writeln!(self.writer, "{}", record.as_bed_line(Some(expected))?)?;
        Ok(())
    }

    /// Write each record in turn, stopping at the first failure.
    pub fn write_records<'a, I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a BedRecord>,
    {
        for record in records {
            self.write(record)?;
        }
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

pub trait BedWrite {
    ///
    /// Write data to disk as a BED file, gzip-compressed if the path ends in `.gz`
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    fn write_bed<T: AsRef<Path>>(&self, path: T) -> Result<()>;
}

impl BedWrite for [BedRecord] {
    fn write_bed<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let mut writer = BedWriter::to_path(path)?.add_missing(true);
        if let Some(widest) = self.iter().map(BedRecord::bed_field_num).max() {
            writer = writer.with_num_fields(widest)?;
        }
        writer.write_records(self)?;
        writer.close()
    }
}
