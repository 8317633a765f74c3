//! Parsing options and layout thresholds.
//!
//! The defaults were tuned against `pdftohtml -xml` output at its default
//! zoom. Coordinates scale with the converter resolution, so anything that
//! changes the zoom should scale the geometric thresholds with it.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options for the layout and extraction pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Two fragments whose tops differ by less than this are on one line
    pub line_tolerance: i32,

    /// Fragments on one line further apart than this belong to separate blocks
    pub column_gap: i32,

    /// Tokens wider than this count as paragraph-width text
    pub wide_width_threshold: i32,

    /// Largest hole tolerated when filling font/height vote runs
    pub gap_fill_threshold: usize,

    /// Line gap above the dominant spacing that starts a paragraph candidate
    pub paragraph_gap_slack: i32,

    /// Line gap above the dominant spacing required after a sentence end
    pub paragraph_break_slack: i32,

    /// OCR blocks shorter than this are treated as header/footer text
    pub ocr_block_min_len: usize,

    /// OCR chunks whose mean line length exceeds this are body text
    pub ocr_body_min_line_avg: f64,

    /// Retry missing metadata against OCR output
    pub ocr_retry: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the same-line tolerance.
    pub fn with_line_tolerance(mut self, tolerance: i32) -> Self {
        self.line_tolerance = tolerance;
        self
    }

    /// Set the column gap.
    pub fn with_column_gap(mut self, gap: i32) -> Self {
        self.column_gap = gap;
        self
    }

    /// Set the paragraph-width threshold.
    pub fn with_wide_width_threshold(mut self, width: i32) -> Self {
        self.wide_width_threshold = width;
        self
    }

    /// Set the gap-fill threshold.
    pub fn with_gap_fill_threshold(mut self, threshold: usize) -> Self {
        self.gap_fill_threshold = threshold;
        self
    }

    /// Set both paragraph slacks.
    pub fn with_paragraph_slack(mut self, gap: i32, sentence_break: i32) -> Self {
        self.paragraph_gap_slack = gap;
        self.paragraph_break_slack = sentence_break;
        self
    }

    /// Set the OCR routing thresholds.
    pub fn with_ocr_routing(mut self, block_min_len: usize, body_min_line_avg: f64) -> Self {
        self.ocr_block_min_len = block_min_len;
        self.ocr_body_min_line_avg = body_min_line_avg;
        self
    }

    /// Enable or disable the OCR metadata retry.
    pub fn with_ocr_retry(mut self, retry: bool) -> Self {
        self.ocr_retry = retry;
        self
    }

    /// Check that the thresholds are usable.
    pub fn validate(&self) -> Result<()> {
        if self.line_tolerance <= 0 {
            return Err(Error::Config(format!(
                "line_tolerance must be positive, got {}",
                self.line_tolerance
            )));
        }
        if self.column_gap <= 0 {
            return Err(Error::Config(format!(
                "column_gap must be positive, got {}",
                self.column_gap
            )));
        }
        if self.paragraph_break_slack < self.paragraph_gap_slack {
            return Err(Error::Config(format!(
                "paragraph_break_slack ({}) is below paragraph_gap_slack ({})",
                self.paragraph_break_slack, self.paragraph_gap_slack
            )));
        }
        if !self.ocr_body_min_line_avg.is_finite() || self.ocr_body_min_line_avg < 0.0 {
            return Err(Error::Config(format!(
                "ocr_body_min_line_avg must be a non-negative number, got {}",
                self.ocr_body_min_line_avg
            )));
        }
        Ok(())
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            line_tolerance: 15,
            column_gap: 110,
            wide_width_threshold: 480,
            gap_fill_threshold: 2,
            paragraph_gap_slack: 2,
            paragraph_break_slack: 8,
            ocr_block_min_len: 500,
            ocr_body_min_line_avg: 75.0,
            ocr_retry: true,
        }
    }
}
