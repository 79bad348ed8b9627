use crate::output::result::CrawlResult;
use crate::RippleError;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes a `CrawlResult` as a JSON document
pub struct CrawlResultWriter<'a> {
    result: &'a CrawlResult,
}

impl<'a> CrawlResultWriter<'a> {
    pub fn new(result: &'a CrawlResult) -> Self {
        Self { result }
    }

    /// Appends the result to the file at `path`, creating it if needed
    ///
    /// Existing content is never truncated; each call adds one document.
    pub fn write_to_path(&self, path: &Path) -> Result<(), RippleError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the result followed by a newline
    ///
    /// The writer is flushed but stays open and owned by the caller.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), RippleError> {
        serde_json::to_writer_pretty(&mut *writer, self.result)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
