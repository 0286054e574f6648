//! Delimited file reader producing a [`Dataset`].

use crate::core::Dataset;
use crate::error::{DecompositionError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Character encoding of the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// ISO-8859-1, one byte per character.
    #[default]
    Latin1,
    Utf8,
}

/// How to read the input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    delimiter: u8,
    encoding: Encoding,
    key_column: Option<String>,
}

impl CsvOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Use the named column as the identity column instead of the default.
    pub fn with_key_column(mut self, name: impl Into<String>) -> Self {
        self.key_column = Some(name.into());
        self
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn key_column(&self) -> Option<&str> {
        self.key_column.as_deref()
    }
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            encoding: Encoding::Latin1,
            key_column: None,
        }
    }
}

/// Read a dataset from a file.
pub fn read_dataset(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| DecompositionError::Io(format!("{}: {}", path.display(), e)))?;
    let dataset = read_dataset_from_reader(file, options)?;
    tracing::debug!(
        path = %path.display(),
        rows = dataset.len(),
        columns = dataset.headers().len(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Read a dataset from any byte source. The first record is the header.
pub fn read_dataset_from_reader<R: Read>(reader: R, options: &CsvOptions) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = rdr.byte_records();
    let header = records
        .next()
        .ok_or_else(|| DecompositionError::InvalidDataset("file is empty".to_string()))??;

    let mut headers = decode_record(&header, options.encoding)?;
    if let Some(first) = headers.first_mut() {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }

    let rows = records
        .map(|record| decode_record(&record?, options.encoding))
        .collect::<Result<Vec<_>>>()?;

    let dataset = Dataset::new(headers, rows)?;
    match options.key_column() {
        Some(name) => dataset.with_key_column(name),
        None => Ok(dataset),
    }
}

fn decode_record(record: &csv::ByteRecord, encoding: Encoding) -> Result<Vec<String>> {
    record.iter().map(|field| decode(field, encoding)).collect()
}

fn decode(bytes: &[u8], encoding: Encoding) -> Result<String> {
    match encoding {
        Encoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        Encoding::Utf8 => String::from_utf8(bytes.to_vec())
            .map_err(|e| DecompositionError::Csv(format!("invalid UTF-8: {}", e))),
    }
}
