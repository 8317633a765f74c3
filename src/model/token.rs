//! Layout fragments emitted by the markup converter.

use serde::{Deserialize, Serialize};

/// One positioned text run from the converter.
///
/// Coordinates are integer converter units. A token whose text is empty is a
/// tombstone: its text was merged into a neighbour but it keeps its place so
/// that index spans stay valid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Token {
    /// Text content
    pub text: String,
    /// Vertical offset of the top edge
    pub top: i32,
    /// Horizontal offset of the left edge
    pub left: i32,
    /// Width of the run
    pub width: i32,
    /// Height of the run
    pub height: i32,
    /// Opaque style identifier
    pub font: String,
    /// Set on paragraph-end markers left by the converter's control sequence
    #[serde(default)]
    pub marker: bool,
}

impl Token {
    /// Create a token with the given text and geometry.
    pub fn new(text: impl Into<String>, top: i32, left: i32, width: i32, height: i32) -> Self {
        Self {
            text: text.into(),
            top,
            left,
            width,
            height,
            font: String::new(),
            marker: false,
        }
    }

    /// Set the style identifier.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    /// Flag the token as a paragraph-end marker.
    pub fn with_break_marker(mut self) -> Self {
        self.marker = true;
        self
    }

    /// Whether the text was merged away.
    pub fn is_tombstone(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether the text is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Converter output for one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Tokens in converter order
    pub tokens: Vec<Token>,
}

impl Document {
    /// Create a document from converter tokens.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// True when the converter found no vector text (image-only pages).
    pub fn needs_ocr(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the document has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
