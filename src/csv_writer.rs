use crate::{errors::SalesError, records::FIELD_DELIMITER, traits::ReportWrite};
use anyhow::Result;
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use serde::Serialize;
use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

/// Line ending of the host platform.
fn terminator() -> Terminator {
    if cfg!(windows) {
        Terminator::CRLF
    } else {
        Terminator::Any(b'\n')
    }
}

/// Builds a headerless `;` writer that never quotes fields.
pub fn report_writer<W: Write>(inner: W) -> Writer<W> {
    WriterBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .terminator(terminator())
        .from_writer(inner)
}

/// Writes report rows to a file, truncating whatever was there.
pub struct FileCSVWriter {
    path: PathBuf,
    file_writer: Writer<File>,
}

impl FileCSVWriter {
    pub fn create(path: &Path) -> Result<Self, SalesError> {
        let file = File::create(path).map_err(|e| SalesError::io(path, e))?;
        Ok(FileCSVWriter {
            path: path.to_path_buf(),
            file_writer: report_writer(file),
        })
    }
}

impl ReportWrite for FileCSVWriter {
    fn write_record<T: Serialize>(&mut self, record: &T) -> Result<()> {
        Ok(self.file_writer.serialize(record)?)
    }

    fn finish(&mut self) -> Result<()> {
        self.file_writer
            .flush()
            .map_err(|e| SalesError::io(&self.path, e))?;
        Ok(())
    }
}
