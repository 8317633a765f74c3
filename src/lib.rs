//! # letterparse
//!
//! Text and affiliation extraction for PDF recommendation letters.
//!
//! A letter is converted to positioned text fragments, the fragments are
//! merged into lines, the body is separated from letterheads and footers,
//! paragraph breaks are inferred from the geometry, and the department and
//! university are pulled out of the remaining header text. Scanned letters
//! go through OCR instead.
//!
//! ## Quick Start
//!
//! ```no_run
//! use letterparse::parse_file;
//!
//! fn main() -> letterparse::Result<()> {
//!     let record = parse_file("letters/smith.pdf")?;
//!     println!("{} / {}", record.department(), record.university());
//!     println!("{}", record.contents());
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - [`convert`]: PDF to positioned tokens (`pdftohtml -xml`)
//! - [`parser`]: fragment merging, body classification, paragraph segmentation
//! - [`extract`]: department and university pattern chains
//! - [`ocr`]: fallback for image-only pages (`tesseract`)
//! - [`assemble`]: the per-file pipeline tying the stages together
//! - [`batch`] and [`render`]: directory runs and CSV / JSON lines output
//!
//! The external tools sit behind the [`MarkupConverter`] and [`OcrEngine`]
//! traits, so the pipeline runs without them given other implementations.

pub mod assemble;
pub mod batch;
pub mod convert;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod ocr;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use assemble::{analyze_layout, LetterLayout, LetterParser};
pub use batch::{discover, BatchOptions, BatchRunner, BatchSummary, FileResult};
pub use convert::{MarkupConverter, PdftohtmlConverter, Scratch};
pub use detect::{ensure_pdf, is_candidate, is_pdf_bytes};
pub use error::{Error, Result};
pub use extract::{Field, MetadataExtractor};
pub use model::{Document, ExtractedRecord, MetadataRecord, SpanSet, Token, NONE_FOUND};
pub use ocr::{OcrEngine, OcrOutput, TesseractOcr};
pub use parser::ParseOptions;
pub use render::{writer_for, CsvWriter, JsonLinesWriter, OutputFormat, RecordWriter};

use std::path::Path;

/// Parse a letter with the default converter and OCR engine.
///
/// # Example
///
/// ```no_run
/// use letterparse::parse_file;
///
/// let record = parse_file("letters/smith.pdf").unwrap();
/// println!("{}", record.university());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ExtractedRecord> {
    LetterParser::new().parse(path)
}

/// Parse a letter with custom options.
///
/// # Example
///
/// ```no_run
/// use letterparse::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new().with_ocr_retry(false);
/// let record = parse_file_with_options("letters/smith.pdf", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> Result<ExtractedRecord> {
    LetterParser::new().with_options(options).parse(path)
}

/// Extract only the body text of a letter.
pub fn extract_contents<P: AsRef<Path>>(path: P) -> Result<String> {
    let record = parse_file(path)?;
    Ok(record.contents().to_string())
}
