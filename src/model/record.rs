//! Extraction results.

use serde::{Deserialize, Serialize};

/// Value recorded when a metadata field could not be found.
pub const NONE_FOUND: &str = "None Found";

/// Affiliation metadata for one letter.
///
/// Both fields are always strings: title-cased when found, [`NONE_FOUND`]
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Department, lab, school or similar unit
    pub department: String,
    /// University or institution
    pub university: String,
}

impl MetadataRecord {
    /// Whether the department was found.
    pub fn has_department(&self) -> bool {
        self.department != NONE_FOUND
    }

    /// Whether the university was found.
    pub fn has_university(&self) -> bool {
        self.university != NONE_FOUND
    }
}

impl Default for MetadataRecord {
    fn default() -> Self {
        Self {
            department: NONE_FOUND.to_string(),
            university: NONE_FOUND.to_string(),
        }
    }
}

/// Final output for one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    contents: String,
    department: String,
    filename: String,
    university: String,
}

impl ExtractedRecord {
    /// Assemble a record from body content and metadata.
    pub fn new(contents: String, metadata: MetadataRecord, filename: impl Into<String>) -> Self {
        Self {
            contents,
            department: metadata.department,
            filename: filename.into(),
            university: metadata.university,
        }
    }

    /// Body text with paragraph breaks.
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Department or sentinel.
    pub fn department(&self) -> &str {
        &self.department
    }

    /// Source file name.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// University or sentinel.
    pub fn university(&self) -> &str {
        &self.university
    }

    /// Field values in output column order.
    pub fn fields(&self) -> [&str; 4] {
        [
            &self.contents,
            &self.department,
            &self.filename,
            &self.university,
        ]
    }
}
