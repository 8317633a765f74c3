//! OCR fallback for scanned letters.
//!
//! Image-only PDFs produce no converter tokens, and letterheads are often
//! embedded as images even in vector PDFs. Both cases go through the same
//! pipeline: locate the page images, OCR each one, and route the recognized
//! text blocks into header pool entries or body contents.

mod tesseract;

pub use tesseract::TesseractOcr;

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::parser::ParseOptions;

/// Characters that end a sentence-like OCR chunk.
const CHUNK_TERMINATORS: [char; 4] = ['.', '?', ':', '!'];

/// Trait for OCR engines.
pub trait OcrEngine: Send + Sync {
    /// Find the page images extracted for `source`, in page order.
    fn locate_images(&self, source: &Path, scratch: &Path) -> Result<Vec<PathBuf>>;

    /// Recognize the text of one image.
    fn ocr(&self, image: &Path) -> Result<String>;
}

/// Text recovered by OCR, already routed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OcrOutput {
    /// Short lines from letterheads, signatures and other sparse blocks
    pub header_pool: Vec<String>,
    /// Long-line chunks with paragraph breaks
    pub contents: String,
}

/// Run OCR over every image of `source` and route the results.
///
/// A failure to locate images is returned; a failure on a single image is
/// logged and that image is skipped.
pub fn run(
    engine: &dyn OcrEngine,
    source: &Path,
    scratch: &Path,
    options: &ParseOptions,
) -> Result<OcrOutput> {
    let images = engine.locate_images(source, scratch)?;
    log::debug!("Found {} page images for {}", images.len(), source.display());

    let texts: Vec<String> = images
        .iter()
        .filter_map(|image| match engine.ocr(image) {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!("Skipping {}: {}", image.display(), e);
                None
            }
        })
        .collect();

    Ok(route_blocks(&texts, options))
}

/// Route OCR text blocks into the header pool and contents.
///
/// Blocks shorter than `ocr_block_min_len` characters are header material
/// line by line. Longer blocks are split into chunks on blank lines; a chunk
/// whose mean line length exceeds `ocr_body_min_line_avg` is body text and
/// anything sparser joins the header pool.
///
/// Routing is decided per chunk, not per block, so a single long block can
/// contribute to both the contents and the header pool.
pub fn route_blocks<S: AsRef<str>>(texts: &[S], options: &ParseOptions) -> OcrOutput {
    let mut output = OcrOutput::default();

    for text in texts.iter().map(|text| text.as_ref()) {
        if text.chars().count() < options.ocr_block_min_len {
            push_lines(&mut output.header_pool, text);
            continue;
        }

        for chunk in text.trim_end().split("\n\n") {
            if chunk.trim().is_empty() {
                continue;
            }
            if mean_line_length(chunk) > options.ocr_body_min_line_avg {
                output.contents.push_str(chunk);
                if chunk.trim_end().ends_with(CHUNK_TERMINATORS) {
                    output.contents.push_str("\n\n");
                } else {
                    output.contents.push('\n');
                }
            } else {
                push_lines(&mut output.header_pool, chunk);
            }
        }
    }

    output
}

fn push_lines(pool: &mut Vec<String>, text: &str) {
    pool.extend(
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from),
    );
}

fn mean_line_length(chunk: &str) -> f64 {
    let lines: Vec<&str> = chunk.split('\n').collect();
    let total: usize = lines.iter().map(|line| line.chars().count()).sum();
    total as f64 / lines.len() as f64
}
