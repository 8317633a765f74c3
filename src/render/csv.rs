//! CSV rendering with RFC 4180 quoting.

use std::io::Write;

use super::RecordWriter;
use crate::error::Result;
use crate::model::ExtractedRecord;

/// Header row, in record field order.
pub const CSV_HEADER: &str = "contents,department,filename,university";

/// Render one record as a CSV row, without the line terminator.
pub fn to_csv_row(record: &ExtractedRecord) -> String {
    record
        .fields()
        .iter()
        .map(|field| quote(field))
        .collect::<Vec<_>>()
        .join(",")
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Streams records as CSV.
pub struct CsvWriter<W: Write> {
    out: W,
}

impl<W: Write> CsvWriter<W> {
    /// Create a writer and emit the header row.
    pub fn new(mut out: W) -> Result<Self> {
        writeln!(out, "{}", CSV_HEADER)?;
        Ok(Self { out })
    }

    /// Consume the writer, returning the underlying output.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RecordWriter for CsvWriter<W> {
    fn write_record(&mut self, record: &ExtractedRecord) -> Result<()> {
        writeln!(self.out, "{}", to_csv_row(record))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MetadataRecord, NONE_FOUND};

    #[test]
    fn test_quote() {
        assert_eq!(quote("plain"), "plain");
        assert_eq!(quote("a,b"), "\"a,b\"");
        assert_eq!(quote("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(quote("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_csv_writer() {
        let record = ExtractedRecord::new(
            "Dear Dr. Lee,\n\nShe is \"exceptional\".".into(),
            MetadataRecord::default(),
            "lee.pdf",
        );
        let mut writer = CsvWriter::new(Vec::new()).unwrap();
        writer.write_record(&record).unwrap();
        writer.finish().unwrap();

        let out = String::from_utf8(writer.into_inner()).unwrap();
        let expected = format!(
            "{}\n\"Dear Dr. Lee,\n\nShe is \"\"exceptional\"\".\",{},lee.pdf,{}\n",
            CSV_HEADER, NONE_FOUND, NONE_FOUND
        );
        assert_eq!(out, expected);
    }
}
