//! Data model shared by the layout, extraction and OCR stages.
//!
//! Tokens come straight from the converter, span sets index into the token
//! sequence, and records are what the pipeline hands to output writers.

mod record;
mod span;
mod token;

pub use record::{ExtractedRecord, MetadataRecord, NONE_FOUND};
pub use span::SpanSet;
pub use token::{Document, Token};
