//! Paragraph segmentation of body text.
//!
//! Letters rarely carry explicit paragraph markup, so breaks are inferred
//! from geometry: an unusually large line gap after a sentence end, or, when
//! line spacing is uniform, a recurring indentation offset.

use crate::model::Token;

use super::freq::FrequencyTable;
use super::options::ParseOptions;

/// Text appended to a token to end a paragraph.
pub const PARAGRAPH_BREAK: &str = "\n\n";

/// Insert paragraph breaks into `body` and return how many were inserted.
///
/// With `special_identifier` set only the line-gap method runs, followed by
/// conversion of break markers; otherwise the indentation method is the
/// fallback when line gaps produce no break.
pub fn segment(body: &mut [Token], special_identifier: bool, options: &ParseOptions) -> usize {
    let mut breaks = line_gap_breaks(body, options);

    if special_identifier {
        breaks += consume_markers(body);
    } else if breaks == 0 {
        breaks = indentation_breaks(body);
        log::debug!("No line-gap breaks, indentation method inserted {}", breaks);
    }

    breaks
}

/// The most common line gap, where each gap also votes for its neighbours
/// one unit away.
pub fn dominant_line_gap(deltas: &[i32]) -> Option<i32> {
    let votes = deltas
        .iter()
        .copied()
        .chain(deltas.iter().map(|d| d - 1))
        .chain(deltas.iter().map(|d| d + 1));
    votes.collect::<FrequencyTable<i32>>().most_common()
}

/// Break after lines followed by an unusually large vertical gap.
pub fn line_gap_breaks(body: &mut [Token], options: &ParseOptions) -> usize {
    let deltas: Vec<i32> = body.windows(2).map(|w| w[1].top - w[0].top).collect();
    let Some(dominant) = dominant_line_gap(&deltas) else {
        return 0;
    };

    let mut inserted = 0;
    for (pos, &delta) in deltas.iter().enumerate() {
        if delta <= dominant + options.paragraph_gap_slack {
            continue;
        }
        if pos == 0 {
            body[0].text.push_str(PARAGRAPH_BREAK);
            inserted += 1;
        } else if delta > dominant + options.paragraph_break_slack && body[pos].text.contains('.') {
            body[pos].text.push_str(PARAGRAPH_BREAK);
            inserted += 1;
        }
    }

    log::debug!(
        "Dominant line gap {} over {} lines, {} breaks",
        dominant,
        body.len(),
        inserted
    );
    inserted
}

/// Break before every line at the second most common left offset.
///
/// The most common offset is taken to be the paragraph body; the runner-up
/// is the first-line indent.
pub fn indentation_breaks(body: &mut [Token]) -> usize {
    let lefts: FrequencyTable<i32> = body.iter().map(|t| t.left).collect();
    if lefts.len() < 2 {
        return 0;
    }
    let Some(indent) = lefts.nth_most_common(1) else {
        return 0;
    };

    let mut inserted = 0;
    for pos in 1..body.len() {
        if body[pos].left == indent {
            body[pos - 1].text.push_str(PARAGRAPH_BREAK);
            inserted += 1;
        }
    }
    inserted
}

/// Turn break markers into a break on the preceding token.
pub fn consume_markers(body: &mut [Token]) -> usize {
    let mut inserted = 0;
    for pos in 0..body.len() {
        if !body[pos].marker {
            continue;
        }
        if pos > 0 {
            body[pos - 1].text.push_str(PARAGRAPH_BREAK);
            inserted += 1;
        }
        body[pos].text.clear();
        body[pos].marker = false;
    }
    inserted
}

/// Concatenate body tokens into the letter contents.
///
/// A single space separates two tokens unless the first already ends in
/// whitespace (including an inserted paragraph break).
pub fn join_contents(body: &[Token]) -> String {
    let mut contents = String::new();
    for token in body.iter().filter(|t| !t.text.is_empty()) {
        if !contents.is_empty() && !contents.ends_with(char::is_whitespace) {
            contents.push(' ');
        }
        contents.push_str(&token.text);
    }
    contents
}
