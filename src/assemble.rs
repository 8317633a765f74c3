//! Per-file pipeline: conversion, layout inference and metadata extraction.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::convert::{MarkupConverter, PdftohtmlConverter, Scratch};
use crate::detect;
use crate::error::Result;
use crate::extract::{Field, MetadataExtractor};
use crate::model::{Document, ExtractedRecord, MetadataRecord, Token, NONE_FOUND};
use crate::ocr::{self, OcrEngine, TesseractOcr};
use crate::parser::{classify, join_contents, normalize, segment, split_body, ParseOptions};

/// Result of the layout stages for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterLayout {
    /// Body text with paragraph breaks
    pub contents: String,
    /// Non-body text in document order
    pub header_pool: Vec<String>,
    /// Number of paragraph breaks inserted
    pub paragraph_breaks: usize,
}

/// Run normalization, body classification and paragraph segmentation.
pub fn analyze_layout(tokens: &[Token], options: &ParseOptions) -> LetterLayout {
    let normalized = normalize(tokens, options);
    let span = classify(&normalized.tokens, options);
    let mut split = split_body(&normalized.tokens, &span, normalized.special_identifier);
    let paragraph_breaks = segment(&mut split.body, normalized.special_identifier, options);

    LetterLayout {
        contents: join_contents(&split.body),
        header_pool: split.header_pool,
        paragraph_breaks,
    }
}

/// Parses recommendation letters into [`ExtractedRecord`]s.
///
/// Collaborators are shared trait objects, so one parser can serve many
/// worker threads.
///
/// # Example
///
/// ```no_run
/// use letterparse::{LetterParser, ParseOptions};
///
/// let parser = LetterParser::new()
///     .with_options(ParseOptions::new().with_wide_width_threshold(500));
/// let record = parser.parse("letters/smith.pdf")?;
/// println!("{}: {}", record.filename(), record.department());
/// # Ok::<(), letterparse::Error>(())
/// ```
#[derive(Clone)]
pub struct LetterParser {
    converter: Arc<dyn MarkupConverter>,
    ocr: Arc<dyn OcrEngine>,
    extractor: MetadataExtractor,
    options: ParseOptions,
    scratch_root: Option<PathBuf>,
}

impl LetterParser {
    /// Create a parser using `pdftohtml` and `tesseract`.
    pub fn new() -> Self {
        Self::with_collaborators(
            Arc::new(PdftohtmlConverter::new()),
            Arc::new(TesseractOcr::new()),
        )
    }

    /// Create a parser with explicit collaborators.
    pub fn with_collaborators(
        converter: Arc<dyn MarkupConverter>,
        ocr: Arc<dyn OcrEngine>,
    ) -> Self {
        Self {
            converter,
            ocr,
            extractor: MetadataExtractor::new(),
            options: ParseOptions::default(),
            scratch_root: None,
        }
    }

    /// Set parse options.
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the markup converter.
    pub fn with_converter(mut self, converter: Arc<dyn MarkupConverter>) -> Self {
        self.converter = converter;
        self
    }

    /// Replace the OCR engine.
    pub fn with_ocr(mut self, ocr: Arc<dyn OcrEngine>) -> Self {
        self.ocr = ocr;
        self
    }

    /// Create scratch directories under `dir` instead of the system default.
    pub fn with_scratch_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(dir.into());
        self
    }

    /// Get the parse options.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse one letter.
    ///
    /// Any failure is returned as [`Error::Parse`](crate::Error::Parse)
    /// naming the file.
    pub fn parse<P: AsRef<Path>>(&self, path: P) -> Result<ExtractedRecord> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.parse_inner(path, &filename)
            .map_err(|e| e.in_file(filename.as_str()))
    }

    fn parse_inner(&self, path: &Path, filename: &str) -> Result<ExtractedRecord> {
        self.options.validate()?;
        detect::ensure_pdf(path)?;

        let scratch = match &self.scratch_root {
            Some(root) => Scratch::new_in(root)?,
            None => Scratch::new()?,
        };

        let document = Document::new(self.converter.convert(path, scratch.path())?);

        let (header_pool, contents, retry) = if document.needs_ocr() {
            log::debug!("{}: no vector text, running OCR", filename);
            let output = ocr::run(self.ocr.as_ref(), path, scratch.path(), &self.options)?;
            (output.header_pool, output.contents, false)
        } else {
            let layout = analyze_layout(&document.tokens, &self.options);
            (layout.header_pool, layout.contents, self.options.ocr_retry)
        };

        let metadata = self.extract_metadata(&header_pool, path, scratch.path(), retry);

        if let Err(e) = scratch.close() {
            log::warn!("{}: failed to remove scratch directory: {}", filename, e);
        }

        log::info!(
            "Parsed {} (department: {}, university: {})",
            filename,
            metadata.department,
            metadata.university
        );
        Ok(ExtractedRecord::new(contents, metadata, filename))
    }

    /// Run both extraction chains, retrying misses against the OCR header
    /// pool when `retry` is set. OCR runs at most once.
    fn extract_metadata(
        &self,
        header_pool: &[String],
        source: &Path,
        scratch: &Path,
        retry: bool,
    ) -> MetadataRecord {
        let mut retry = OcrRetry {
            state: if retry {
                OcrState::Pending
            } else {
                OcrState::Unavailable
            },
            engine: self.ocr.as_ref(),
            source,
            scratch,
            options: &self.options,
        };

        MetadataRecord {
            department: self.resolve(Field::Department, header_pool, &mut retry),
            university: self.resolve(Field::University, header_pool, &mut retry),
        }
    }

    fn resolve(&self, field: Field, primary: &[String], retry: &mut OcrRetry<'_>) -> String {
        if let Some(found) = self.extractor.find(field, primary) {
            return MetadataExtractor::resolve(Some(found));
        }
        if let Some(pool) = retry.pool() {
            if let Some(found) = self.extractor.find(field, pool) {
                log::debug!("{} found by OCR retry", field.name());
                return MetadataExtractor::resolve(Some(found));
            }
        }
        log::debug!("No {} found", field.name());
        NONE_FOUND.to_string()
    }
}

impl Default for LetterParser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LetterParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LetterParser")
            .field("converter", &self.converter.name())
            .field("options", &self.options)
            .field("scratch_root", &self.scratch_root)
            .finish()
    }
}

enum OcrState {
    /// OCR already ran for this document, or retries are disabled
    Unavailable,
    Pending,
    Done(Vec<String>),
}

/// Lazily computed OCR header pool, shared by every field of one document.
struct OcrRetry<'a> {
    state: OcrState,
    engine: &'a dyn OcrEngine,
    source: &'a Path,
    scratch: &'a Path,
    options: &'a ParseOptions,
}

impl OcrRetry<'_> {
    fn pool(&mut self) -> Option<&[String]> {
        if let OcrState::Pending = self.state {
            let pool = match ocr::run(self.engine, self.source, self.scratch, self.options) {
                Ok(output) => output.header_pool,
                Err(e) => {
                    log::warn!("OCR retry failed for {}: {}", self.source.display(), e);
                    Vec::new()
                }
            };
            self.state = OcrState::Done(pool);
        }

        match &self.state {
            OcrState::Done(pool) => Some(pool),
            _ => None,
        }
    }
}
