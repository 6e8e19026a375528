//! Recipient rows read from a delimited text file

use crate::{CertError, Result};
use csv::{Reader, ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Column holding the recipient's name (required)
pub const NAME_FIELD: &str = "name";

/// Column holding the date printed on the certificate (optional)
pub const DATE_FIELD: &str = "date";

/// One recipient: column name -> cell value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientRecord {
    /// Line of the input the row started on (the header is line 1)
    line: u64,
    fields: HashMap<String, String>,
}

impl RecipientRecord {
    pub fn new(line: u64, fields: HashMap<String, String>) -> Self {
        Self { line, fields }
    }

    /// Map a parsed row onto the header names
    ///
    /// Missing trailing cells become empty strings and cells beyond the header
    /// are dropped. With duplicate header names the rightmost column wins.
    fn from_row(line: u64, headers: &[String], row: &StringRecord) -> Self {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(index, header)| (header.clone(), row.get(index).unwrap_or("").to_string()))
            .collect();

        Self { line, fields }
    }

    /// Value of a column, if the column exists
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn line(&self) -> u64 {
        self.line
    }

    /// Human readable identifier used in error reports
    pub fn label(&self) -> String {
        match self.get(NAME_FIELD).map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("<unnamed, line {}>", self.line),
        }
    }
}

/// Single-pass iterator over the recipients of a delimited file
///
/// The first row supplies the column names. A read or decode error ends the
/// iteration after yielding a [`CertError::Stream`].
pub struct RowSource<R: Read = File> {
    reader: Reader<R>,
    headers: Vec<String>,
    record: StringRecord,
    finished: bool,
}

impl RowSource<File> {
    /// Open a delimited file
    pub fn open(path: impl AsRef<Path>, delimiter: u8) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| CertError::io(path, e))?;
        Self::from_reader(file, delimiter)
    }
}

impl<R: Read> RowSource<R> {
    /// Wrap any reader; the header row is read immediately
    pub fn from_reader(reader: R, delimiter: u8) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| CertError::Stream(format!("failed to read header row: {e}")))?
            .iter()
            .map(str::to_string)
            .collect();

        Ok(Self {
            reader,
            headers,
            record: StringRecord::new(),
            finished: false,
        })
    }

    /// Column names from the header row
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl<R: Read> Iterator for RowSource<R> {
    type Item = Result<RecipientRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.reader.read_record(&mut self.record) {
            Ok(true) => {
                let line = self
                    .record
                    .position()
                    .map(|position| position.line())
                    .unwrap_or_default();
                Some(Ok(RecipientRecord::from_row(
                    line,
                    &self.headers,
                    &self.record,
                )))
            }
            Ok(false) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(CertError::Stream(e.to_string())))
            }
        }
    }
}
