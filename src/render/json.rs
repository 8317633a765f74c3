//! JSON lines rendering.

use std::io::Write;

use super::RecordWriter;
use crate::error::{Error, Result};
use crate::model::ExtractedRecord;

/// Render one record as a single-line JSON object.
pub fn to_json_line(record: &ExtractedRecord) -> Result<String> {
    serde_json::to_string(record)
        .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Streams records as JSON lines.
pub struct JsonLinesWriter<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesWriter<W> {
    /// Create a writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the writer, returning the underlying output.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RecordWriter for JsonLinesWriter<W> {
    fn write_record(&mut self, record: &ExtractedRecord) -> Result<()> {
        let line = to_json_line(record)?;
        writeln!(self.out, "{}", line)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
