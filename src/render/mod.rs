//! Record output: CSV and JSON lines.
//!
//! Writers stream one [`ExtractedRecord`] at a time so a batch never holds
//! more than the records in flight.

mod csv;
mod json;

pub use self::csv::{to_csv_row, CsvWriter, CSV_HEADER};
pub use self::json::{to_json_line, JsonLinesWriter};

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::ExtractedRecord;

/// Output format for extracted records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated values with a header row
    #[default]
    Csv,
    /// One JSON object per line
    #[serde(rename = "jsonl")]
    JsonLines,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::JsonLines => "jsonl",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "jsonl" | "json" | "jsonlines" => Ok(OutputFormat::JsonLines),
            other => Err(Error::Config(format!("unknown output format: {}", other))),
        }
    }
}

/// Sink for extracted records.
pub trait RecordWriter {
    /// Write one record.
    fn write_record(&mut self, record: &ExtractedRecord) -> Result<()>;

    /// Flush buffered output.
    fn finish(&mut self) -> Result<()>;
}

/// Create a writer for `format`.
///
/// CSV writers emit the header immediately.
pub fn writer_for<'a, W: Write + 'a>(
    format: OutputFormat,
    out: W,
) -> Result<Box<dyn RecordWriter + 'a>> {
    Ok(match format {
        OutputFormat::Csv => Box::new(CsvWriter::new(out)?),
        OutputFormat::JsonLines => Box::new(JsonLinesWriter::new(out)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetadataRecord;

    fn record() -> ExtractedRecord {
        let meta = MetadataRecord {
            department: "Department Of Biology".into(),
            university: "Stanford University".into(),
        };
        ExtractedRecord::new("Dear Dr. Lee,\n\nI recommend her.".into(), meta, "smith.pdf")
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("JSONL".parse::<OutputFormat>().unwrap(), OutputFormat::JsonLines);
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::JsonLines.to_string(), "jsonl");

        let format: OutputFormat = serde_json::from_str("\"jsonl\"").unwrap();
        assert_eq!(format, OutputFormat::JsonLines);
    }

    #[test]
    fn test_writer_for() {
        let mut buf = Vec::new();
        {
            let mut writer = writer_for(OutputFormat::Csv, &mut buf).unwrap();
            writer.write_record(&record()).unwrap();
            writer.finish().unwrap();
        }
        let out = String::from_utf8(buf).unwrap();
        assert!(out.starts_with(CSV_HEADER));
        assert_eq!(out.lines().next(), Some(CSV_HEADER));
        assert!(out.contains("smith.pdf"));
    }
}
