//! Body text classification.
//!
//! Three independent votes decide which tokens are letter body and which are
//! letterhead, signature blocks, page numbers and the like:
//!
//! - **font**: tokens set in the most frequent font,
//! - **height**: tokens with the most frequent line height,
//! - **width**: blocks of paragraph-width lines.
//!
//! The body is where all three agree. When they share nothing, the width
//! vote wins on its own since it targets justified paragraph text directly.

use std::hash::Hash;

use crate::model::{SpanSet, Token};

use super::freq::FrequencyTable;
use super::options::ParseOptions;

/// Tokens split into body text and the header/footer pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodySplit {
    /// Body tokens in document order
    pub body: Vec<Token>,
    /// Text of every other non-blank token, in document order
    pub header_pool: Vec<String>,
}

/// Compute the span of body tokens.
pub fn classify(tokens: &[Token], options: &ParseOptions) -> SpanSet {
    if tokens.is_empty() {
        return SpanSet::new();
    }

    let threshold = options.gap_fill_threshold;
    let font = SpanSet::gap_filled(&majority_indices(tokens, |t| t.font.clone()), threshold);
    let height = SpanSet::gap_filled(&majority_indices(tokens, |t| t.height), threshold);
    let width = width_span(tokens, options.wide_width_threshold);

    let span = font.intersection(&height).intersection(&width);
    if span.is_empty() {
        log::debug!(
            "Body votes share no tokens (font {:?}, height {:?}, width {:?}); using width vote",
            font.ranges(),
            height.ranges(),
            width.ranges()
        );
        return width;
    }

    log::debug!("Body span: {:?}", span.ranges());
    span
}

/// Indices of tokens whose `key` equals the most frequent value.
pub fn majority_indices<K, F>(tokens: &[Token], key: F) -> Vec<usize>
where
    K: Eq + Hash + Clone,
    F: Fn(&Token) -> K,
{
    let table: FrequencyTable<K> = tokens.iter().map(&key).collect();
    let Some(target) = table.most_common() else {
        return Vec::new();
    };

    tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| key(*t) == target)
        .map(|(i, _)| i)
        .collect()
}

/// Boundaries of wide-text blocks.
///
/// Scanning starts in the "looking for wide" state; each time a token matches
/// the state its index is recorded and the state flips. The list always has
/// even length: a block still open at the end is closed at the last index.
pub fn width_boundaries(tokens: &[Token], wide_width_threshold: i32) -> Vec<usize> {
    let mut boundaries = Vec::new();
    let mut looking_for_wide = true;

    for (i, token) in tokens.iter().enumerate() {
        let wide = token.width > wide_width_threshold;
        if wide == looking_for_wide {
            boundaries.push(i);
            looking_for_wide = !looking_for_wide;
        }
    }

    if boundaries.len() % 2 == 1 {
        boundaries.push(tokens.len() - 1);
    }
    boundaries
}

/// Span covered by the wide-text blocks.
pub fn width_span(tokens: &[Token], wide_width_threshold: i32) -> SpanSet {
    SpanSet::from_boundaries(&width_boundaries(tokens, wide_width_threshold))
}

/// Separate body tokens from the header/footer pool.
///
/// Break markers inside the span are kept in the body when `keep_markers`
/// is set so the paragraph segmenter can turn them into breaks.
pub fn split_body(tokens: &[Token], span: &SpanSet, keep_markers: bool) -> BodySplit {
    let mut split = BodySplit::default();

    for (i, token) in tokens.iter().enumerate() {
        let in_span = span.contains(i);
        if in_span && !token.is_blank() {
            split.body.push(token.clone());
        } else if in_span && keep_markers && token.marker {
            split.body.push(token.clone());
        } else if !token.is_blank() {
            split.header_pool.push(token.text.clone());
        }
    }

    split
}
