use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

fn is_gzipped(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("gz"))
}

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> io::Result<BufReader<Box<dyn Read>>> {
    let file = File::open(path).map_err(|e| {
        io::Error::new(e.kind(), format!("Failed to open file {}: {}", path.display(), e))
    })?;
    let file: Box<dyn Read> = match is_gzipped(path) {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

/// Get a reader for either a gzipped, non-gzipped file, or stdin
///
/// # Arguments
///
/// - file_path: path to the file to read, or '-' for stdin
pub fn get_dynamic_reader_w_stdin(file_path_str: &str) -> io::Result<Box<dyn BufRead>> {
    if file_path_str == "-" {
        Ok(Box::new(BufReader::new(io::stdin())))
    } else {
        Ok(Box::new(get_dynamic_reader(Path::new(file_path_str))?))
    }
}

///
/// A file writer that is either plain or gzip-compressed.
///
/// Dropping a gzip writer writes the trailer but discards any error doing so;
/// call [`DynamicWriter::finish`] to complete the file and see failures.
///
#[derive(Debug)]
pub enum DynamicWriter {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl DynamicWriter {
    ///
    /// Write the gzip trailer (if any), flush, and hand back the file.
    ///
    pub fn finish(self) -> io::Result<File> {
        let buffered = match self {
            DynamicWriter::Plain(file) => file,
            DynamicWriter::Gzip(encoder) => encoder.finish()?,
        };
        buffered.into_inner().map_err(|e| e.into_error())
    }
}

impl Write for DynamicWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            DynamicWriter::Plain(file) => file.write(buf),
            DynamicWriter::Gzip(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            DynamicWriter::Plain(file) => file.flush(),
            DynamicWriter::Gzip(encoder) => encoder.flush(),
        }
    }
}

///
/// Get a writer for a file, gzip-compressing when the path ends in `.gz`.
/// Parent directories are created as needed.
///
pub fn get_dynamic_writer(path: &Path) -> io::Result<DynamicWriter> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = BufWriter::new(File::create(path)?);
    Ok(match is_gzipped(path) {
        true => DynamicWriter::Gzip(GzEncoder::new(file, Compression::best())),
        false => DynamicWriter::Plain(file),
    })
}
