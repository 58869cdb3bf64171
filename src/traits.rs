use std::io::Read;

use anyhow::Result;
use serde::Serialize;

use crate::ledger::FileOutcome;

/// ReportWrite trait provides a method to write one report row.
pub trait ReportWrite {
    /// Writes a record to the report.
    ///
    /// # Arguments
    /// * `record` - The row to write, serialized field by field.
    ///
    /// # Returns
    /// A Result indicating success or failure.
    fn write_record<T: Serialize>(&mut self, record: &T) -> Result<()>;

    /// Pushes buffered rows to the destination.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// ReportExport trait provides a method to emit sorted report rows.
pub trait ReportExport {
    /// Exports every row in report order.
    ///
    /// # Arguments
    /// * `writer` - The writer receiving the rows.
    ///
    /// # Returns
    /// A Result indicating success or failure.
    fn export(&self, writer: &mut impl ReportWrite) -> Result<()>;
}

/// Aggregating trait folds the contents of one sales file into running totals.
pub trait Aggregating {
    /// Applies one sales file.
    ///
    /// # Arguments
    /// * `source` - Name of the file, used in diagnostics.
    /// * `reader` - The file contents.
    ///
    /// # Returns
    /// What happened to the file, or a fatal error.
    fn apply_sales_file<R: Read>(&mut self, source: &str, reader: R) -> Result<FileOutcome>;
}
