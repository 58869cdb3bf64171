use crate::errors::SalesError;
use csv::{ByteRecord, ReaderBuilder, Trim};
use std::{fs::File, io::Read, ops::Index, path::Path};

pub const FIELD_DELIMITER: u8 = b';';

/// One input line split on `;`. Trailing empty fields are dropped, so
/// `001;3;` counts as two fields. Text that is not valid UTF-8 is decoded
/// lossily instead of failing the read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    values: Vec<String>,
    line: u64,
}

impl Fields {
    pub fn from_byte_record(record: &ByteRecord) -> Self {
        let mut values: Vec<String> = record
            .iter()
            .map(|field| String::from_utf8_lossy(field).into_owned())
            .collect();
        while values.last().is_some_and(|v| v.is_empty()) {
            values.pop();
        }
        Fields {
            values,
            line: record.position().map(|p| p.line()).unwrap_or_default(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 1-based line number in the source, 0 when unknown.
    pub fn line(&self) -> u64 {
        self.line
    }
}

impl Index<usize> for Fields {
    type Output = str;

    fn index(&self, i: usize) -> &str {
        &self.values[i]
    }
}

impl From<Vec<&str>> for Fields {
    fn from(values: Vec<&str>) -> Self {
        let record = ByteRecord::from(values);
        Fields::from_byte_record(&record)
    }
}

/// Reads the `;`-separated record files. Records carry no header and no
/// quoting, and may have any number of fields.
pub fn read_fields<R: Read>(reader: R) -> impl Iterator<Item = csv::Result<Fields>> {
    ReaderBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(reader)
        .into_byte_records()
        .map(|rec| rec.map(|rec| Fields::from_byte_record(&rec)))
}

pub fn open_file(path: &Path) -> Result<File, SalesError> {
    File::open(path).map_err(|e| SalesError::io(path, e))
}
