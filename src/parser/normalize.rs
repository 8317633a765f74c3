//! Token normalization: merging converter fragments into lines.
//!
//! The converter emits one fragment per style run, so a single visual line
//! often arrives as several tokens. Merging keeps every index in place: a
//! merged-away token is left behind as a tombstone with empty text.

use unicode_normalization::UnicodeNormalization;

use crate::model::Token;

use super::options::ParseOptions;

/// Control sequence some converters emit at paragraph ends.
pub const CONTROL_SEQUENCE: &str = "\t\n \u{a0}";

/// Text of a break marker, a token that consisted only of [`CONTROL_SEQUENCE`].
pub const BREAK_MARKER: &str = " ";

/// Output of [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// Tokens after merging, same length as the input
    pub tokens: Vec<Token>,
    /// Whether any token contained [`CONTROL_SEQUENCE`]
    pub special_identifier: bool,
}

/// Merge adjacent fragments and clean up their text.
///
/// Returns a new token sequence of the same length as `tokens`. Only a token
/// whose whole text is [`CONTROL_SEQUENCE`] becomes a break marker; any other
/// whitespace-only fragment is cleared to a tombstone.
pub fn normalize(tokens: &[Token], options: &ParseOptions) -> Normalized {
    let mut tokens = tokens.to_vec();
    let mut special_identifier = false;

    for token in &mut tokens {
        if token.marker {
            special_identifier = true;
            continue;
        }
        if token.text.contains(CONTROL_SEQUENCE) {
            special_identifier = true;
            if token.text == CONTROL_SEQUENCE {
                token.text = BREAK_MARKER.to_string();
                token.marker = true;
                continue;
            }
            token.text = token.text.replace(CONTROL_SEQUENCE, " ");
        }
        let stripped = token.text.trim_start();
        if stripped.len() != token.text.len() {
            token.text = stripped.to_string();
        }
    }

    merge_fragments(&mut tokens, options);

    for token in tokens.iter_mut().filter(|t| !t.marker) {
        token.text = to_ascii(&collapse_whitespace(&token.text));
    }

    if special_identifier {
        log::debug!("Control sequence found, paragraph markers retained");
    }

    Normalized {
        tokens,
        special_identifier,
    }
}

fn merge_fragments(tokens: &mut [Token], options: &ParseOptions) {
    let tolerance = options.line_tolerance;
    let mut anchor = 0;

    for pos in 1..tokens.len() {
        if tokens[pos].is_blank() {
            continue;
        }
        if tokens[anchor].is_blank() {
            anchor = pos;
            continue;
        }

        let top_diff = tokens[pos].top - tokens[anchor].top;

        if continues_line(&tokens[anchor], &tokens[pos], options) {
            absorb(tokens, anchor, pos);
        } else if top_diff <= -tolerance {
            // Wrapped-line artifact: the anchor belongs to the line before it.
            anchor = match (0..anchor).rev().find(|&i| !tokens[i].is_blank()) {
                Some(target) => {
                    let moved = std::mem::take(&mut tokens[anchor].text);
                    let previous = &mut tokens[target].text;
                    previous.push(' ');
                    previous.push_str(&moved);

                    if continues_line(&tokens[target], &tokens[pos], options) {
                        absorb(tokens, target, pos);
                        target
                    } else {
                        pos
                    }
                }
                None => pos,
            };
        } else {
            anchor = pos;
        }
    }
}

fn continues_line(anchor: &Token, token: &Token, options: &ParseOptions) -> bool {
    (token.top - anchor.top).abs() < options.line_tolerance
        && (anchor.left - token.left).abs() < options.column_gap
}

/// Append the text at `pos` to `anchor`, leaving a tombstone behind.
fn absorb(tokens: &mut [Token], anchor: usize, pos: usize) {
    let glue = tokens[anchor].text.chars().count() == 1 || tokens[pos - 1].width == 0;
    let fragment = std::mem::take(&mut tokens[pos].text);
    if fragment.chars().count() == 1 {
        tokens[pos].width = 0;
    }

    let added_width = tokens[pos].width;
    let target = &mut tokens[anchor];
    if !glue {
        target.text.push(' ');
    }
    target.text.push_str(&fragment);
    target.width += added_width;
}

/// Collapse every run of two or more whitespace characters into one space.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = String::new();

    for c in text.chars() {
        if c.is_whitespace() {
            run.push(c);
            continue;
        }
        flush_whitespace(&mut out, &mut run);
        out.push(c);
    }
    flush_whitespace(&mut out, &mut run);

    out
}

fn flush_whitespace(out: &mut String, run: &mut String) {
    match run.chars().count() {
        0 => {}
        1 => out.push_str(run),
        _ => out.push(' '),
    }
    run.clear();
}

/// Transliterate text to its closest ASCII spelling.
///
/// Text is composed first so decomposed accents transliterate like their
/// precomposed forms. Characters with no ASCII spelling are dropped.
pub fn to_ascii(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }
    let composed: String = text.nfc().collect();
    deunicode::deunicode_with_tofu(&composed, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, top: i32, left: i32, width: i32) -> Token {
        Token::new(text, top, left, width, 16).with_font("0")
    }

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_merges_fragments_on_one_line() {
        let input = vec![
            token("Dear", 100, 80, 40),
            token("Professor", 101, 125, 70),
            token("Smith,", 99, 180, 50),
        ];
        let out = normalize(&input, &ParseOptions::default());

        assert_eq!(texts(&out.tokens), vec!["Dear Professor Smith,", "", ""]);
        assert_eq!(out.tokens[0].width, 160);
        assert_eq!(out.tokens.len(), input.len());
        assert!(!out.special_identifier);
    }

    #[test]
    fn test_far_fragment_starts_new_block() {
        let input = vec![token("Sincerely,", 700, 80, 90), token("Page 2", 702, 500, 40)];
        let out = normalize(&input, &ParseOptions::default());
        assert_eq!(texts(&out.tokens), vec!["Sincerely,", "Page 2"]);
    }

    #[test]
    fn test_single_character_lead_in_is_glued() {
        let input = vec![
            token("J", 100, 80, 8),
            token("ohn", 100, 88, 30),
            token("Smith", 100, 125, 40),
        ];
        let out = normalize(&input, &ParseOptions::default());
        assert_eq!(out.tokens[0].text, "John Smith");
    }

    #[test]
    fn test_zero_width_fragment_is_glued_to_next() {
        let input = vec![
            token("Dear", 100, 80, 40),
            token("J", 100, 125, 8),
            token("ohn", 100, 133, 30),
        ];
        let out = normalize(&input, &ParseOptions::default());
        assert_eq!(out.tokens[0].text, "Dear John");
        assert_eq!(out.tokens[1].width, 0);
        assert_eq!(out.tokens[0].width, 70);
    }

    #[test]
    fn test_fragment_above_anchor_relocates_anchor_text() {
        let input = vec![
            token("Line one", 100, 80, 300),
            token("Wrapped", 160, 80, 300),
            token("Above", 130, 80, 300),
        ];
        let out = normalize(&input, &ParseOptions::default());
        assert_eq!(texts(&out.tokens), vec!["Line one Wrapped", "", "Above"]);
    }

    #[test]
    fn test_fragment_above_anchor_rejoins_relocated_line() {
        let input = vec![
            token("Line one", 100, 80, 300),
            token("Wrapped", 130, 80, 300),
            token("Above", 110, 80, 300),
        ];
        let out = normalize(&input, &ParseOptions::default());
        assert_eq!(texts(&out.tokens), vec!["Line one Wrapped Above", "", ""]);
    }

    #[test]
    fn test_relocation_skips_tombstones() {
        let input = vec![
            token("Dear", 100, 80, 40),
            token("Dr. Lee,", 100, 125, 50),
            token("Wrapped", 130, 80, 300),
            token("Above", 110, 80, 300),
        ];
        let options = ParseOptions::default();
        let once = normalize(&input, &options);
        let twice = normalize(&once.tokens, &options);

        assert_eq!(texts(&once.tokens), vec!["Dear Dr. Lee, Wrapped Above", "", "", ""]);
        assert_eq!(texts(&once.tokens), texts(&twice.tokens));
    }

    #[test]
    fn test_relocation_without_predecessor_keeps_text() {
        let input = vec![token("Wrapped", 130, 80, 300), token("Above", 100, 80, 300)];
        let out = normalize(&input, &ParseOptions::default());
        assert_eq!(texts(&out.tokens), vec!["Wrapped", "Above"]);
    }

    #[test]
    fn test_blank_fragment_does_not_move_anchor() {
        let input = vec![
            token("Hello", 100, 80, 40),
            token("   ", 300, 10, 5),
            token("world", 100, 130, 40),
        ];
        let out = normalize(&input, &ParseOptions::default());
        assert_eq!(texts(&out.tokens), vec!["Hello world", "", ""]);
    }

    #[test]
    fn test_whitespace_and_transliteration() {
        let input = vec![token("Caf\u{e9}   R\u{e9}sum\u{e9} \u{2014} na\u{ef}ve", 100, 80, 200)];
        let out = normalize(&input, &ParseOptions::default());
        let text = &out.tokens[0].text;
        assert!(text.is_ascii());
        assert!(text.starts_with("Cafe Resume "));
        assert!(text.ends_with(" naive"));
    }

    #[test]
    fn test_to_ascii_mappings() {
        assert_eq!(to_ascii("\u{201C}Gr\u{fc}\u{df}e\u{201D}"), "\"Grusse\"");
        assert_eq!(to_ascii("\u{fb01}eld"), "field");
        assert_eq!(to_ascii("Jose\u{301}"), "Jose");
        assert_eq!(to_ascii("plain"), "plain");
    }

    #[test]
    fn test_to_ascii_non_latin_scripts() {
        assert_eq!(to_ascii("\u{41c}\u{43e}\u{441}\u{43a}\u{432}\u{430}"), "Moskva");

        let greek = to_ascii("\u{3a3}\u{3c4}\u{3b1}\u{3b8}\u{3ac}\u{3ba}\u{3b7}\u{3c2}");
        assert!(greek.is_ascii());
        assert!(greek.starts_with("Stath"));
    }

    #[test]
    fn test_collapse_keeps_single_whitespace() {
        assert_eq!(collapse_whitespace("a\nb  c\t\t d"), "a\nb c d");
    }

    #[test]
    fn test_control_sequence_sets_special_identifier() {
        let input = vec![
            token("First paragraph ends.\t\n \u{a0}", 100, 80, 500),
            token("\t\n \u{a0}", 120, 80, 5),
        ];
        let out = normalize(&input, &ParseOptions::default());
        assert!(out.special_identifier);
        assert_eq!(out.tokens[0].text, "First paragraph ends. ");
        assert!(!out.tokens[0].marker);
        assert_eq!(out.tokens[1].text, BREAK_MARKER);
        assert!(out.tokens[1].marker);
    }

    #[test]
    fn test_raw_space_fragment_is_not_a_marker() {
        let input = vec![
            token("Opening line.\t\n \u{a0}", 100, 80, 500),
            token(" ", 120, 300, 4),
            token("\u{a0}", 140, 300, 4),
            token("Closing line.", 160, 80, 500),
        ];
        let out = normalize(&input, &ParseOptions::default());
        assert!(out.special_identifier);
        assert_eq!(texts(&out.tokens), vec!["Opening line. ", "", "", "Closing line."]);
        assert!(out.tokens.iter().all(|t| !t.marker));
    }

    #[test]
    fn test_markers_survive_renormalization() {
        let input = vec![
            token("Opening line.", 100, 80, 500),
            token("\t\n \u{a0}", 110, 80, 5),
            token("Closing line.", 140, 80, 500),
        ];
        let options = ParseOptions::default();
        let once = normalize(&input, &options);
        let twice = normalize(&once.tokens, &options);

        assert_eq!(once, twice);
        assert!(twice.special_identifier);
        assert!(twice.tokens[1].marker);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let input = vec![
            token("Department of", 60, 300, 120),
            token("Biology", 60, 390, 60),
            token("Dear", 120, 80, 40),
            token("Dr.", 121, 125, 25),
            token("Lee,", 119, 160, 30),
            token("I am writing to recommend", 160, 80, 520),
            token("one", 160, 150, 25),
            token("student.", 161, 170, 60),
            token("Sincerely,", 400, 80, 90),
        ];
        let options = ParseOptions::default();
        let once = normalize(&input, &options);
        let twice = normalize(&once.tokens, &options);

        assert_eq!(texts(&once.tokens), texts(&twice.tokens));
        assert_eq!(once.tokens[0].text, "Department of Biology");
        assert_eq!(once.tokens[5].text, "I am writing to recommend one student.");
    }
}
