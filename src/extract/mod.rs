//! Affiliation metadata extraction.
//!
//! Works on the header pool: every non-body text run of a letter, plus the
//! short OCR blocks of scanned pages.

mod metadata;

pub use metadata::{title_case, Field, MetadataExtractor};
