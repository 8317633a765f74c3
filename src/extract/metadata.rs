//! Department and university extraction from header text.

use regex::Regex;

use crate::model::NONE_FOUND;

/// Metadata fields extracted from the header pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Department, lab, school or similar unit
    Department,
    /// University or institution
    University,
}

impl Field {
    /// Lowercase field name as used in output records.
    pub fn name(self) -> &'static str {
        match self {
            Field::Department => "department",
            Field::University => "university",
        }
    }
}

/// A marker and the run of name characters around it.
#[derive(Debug, Clone)]
struct MarkerRule {
    marker: Regex,
    run: Regex,
}

impl MarkerRule {
    fn new(marker: &str) -> Self {
        Self {
            marker: Regex::new(&format!("(?i){}", marker)).unwrap(),
            run: Regex::new(&format!("(?i)[a-zA-Z& ]*{}[a-zA-Z& ]*", marker)).unwrap(),
        }
    }

    fn apply(&self, pieces: &[&str]) -> Option<String> {
        let hit = pieces.iter().find(|p| self.marker.is_match(p))?;
        self.run.find(hit).map(|m| m.as_str().trim().to_string())
    }
}

/// "X of Y" phrase: the piece is flattened to words and the run starting at
/// the keyword is returned.
#[derive(Debug, Clone)]
struct OfRule {
    phrase: Regex,
    run: Regex,
}

impl OfRule {
    fn new(phrase: &str, run: &str) -> Self {
        Self {
            phrase: Regex::new(&format!("(?i){}", phrase)).unwrap(),
            run: Regex::new(&format!("(?i){}", run)).unwrap(),
        }
    }
}

/// Pattern chains for department and university names.
///
/// Both chains run over the header pool after splitting every entry on
/// `.`, `,` and `:` and reversing the pieces, so text nearest the body is
/// tried first. Within a chain the first rule that matches wins.
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    splitter: Regex,
    non_word: Regex,
    department_of: OfRule,
    department_markers: Vec<MarkerRule>,
    professor_of: Regex,
    professor_rewrite: Regex,
    unit_markers: Vec<MarkerRule>,
    university_of: OfRule,
    university_markers: Vec<MarkerRule>,
}

impl MetadataExtractor {
    /// Compile the pattern chains.
    pub fn new() -> Self {
        Self {
            splitter: Regex::new(r"[.,:]").unwrap(),
            non_word: Regex::new(r"\W+").unwrap(),
            department_of: OfRule::new(r"department[s]?\W+of", r"department[a-zA-Z& ]+"),
            department_markers: [r"department\s*", r"Dept\.", "center"]
                .into_iter()
                .map(MarkerRule::new)
                .collect(),
            professor_of: Regex::new(r"(?i)(?:Professor|Prof\.)\s{0,2}of").unwrap(),
            professor_rewrite: Regex::new(r"(?i)(?:Professor|Prof)\s{0,2}of([a-zA-Z& ]+)")
                .unwrap(),
            unit_markers: ["lab", "institu", "school", "college"]
                .into_iter()
                .map(MarkerRule::new)
                .collect(),
            university_of: OfRule::new(r"university\W+of", r"university[a-zA-Z& ]+"),
            university_markers: [r"universi\s*", "College", "center", r"Univ\.", "institut"]
                .into_iter()
                .map(MarkerRule::new)
                .collect(),
        }
    }

    /// Run the chain for `field`.
    pub fn find<S: AsRef<str>>(&self, field: Field, pool: &[S]) -> Option<String> {
        match field {
            Field::Department => self.department(pool),
            Field::University => self.university(pool),
        }
    }

    /// Find the department name in a header pool.
    pub fn department<S: AsRef<str>>(&self, pool: &[S]) -> Option<String> {
        let pieces = self.pieces(pool);

        self.apply_of_rule(&self.department_of, &pieces)
            .or_else(|| first_marker(&self.department_markers, &pieces))
            .or_else(|| self.professor(&pieces))
            .or_else(|| first_marker(&self.unit_markers, &pieces))
            .filter(|name| !name.is_empty())
    }

    /// Find the university name in a header pool.
    pub fn university<S: AsRef<str>>(&self, pool: &[S]) -> Option<String> {
        let pieces = self.pieces(pool);

        self.apply_of_rule(&self.university_of, &pieces)
            .or_else(|| first_marker(&self.university_markers, &pieces))
            .filter(|name| !name.is_empty())
    }

    /// Title-case a match, or fall back to the sentinel.
    pub fn resolve(found: Option<String>) -> String {
        match found {
            Some(name) => title_case(&name),
            None => NONE_FOUND.to_string(),
        }
    }

    fn pieces<'a, S: AsRef<str>>(&self, pool: &'a [S]) -> Vec<&'a str> {
        let mut pieces: Vec<&str> = pool
            .iter()
            .flat_map(|entry| self.splitter.split(entry.as_ref()))
            .filter(|piece| !piece.is_empty())
            .collect();
        pieces.reverse();
        pieces
    }

    fn apply_of_rule(&self, rule: &OfRule, pieces: &[&str]) -> Option<String> {
        let hit = pieces.iter().find(|p| rule.phrase.is_match(p))?;
        let flattened = self.non_word.replace_all(hit, " ");
        rule.run
            .find(&flattened)
            .map(|m| m.as_str().trim().to_string())
    }

    /// "Professor of Biology" names the department of the signer.
    fn professor(&self, pieces: &[&str]) -> Option<String> {
        let hit = pieces.iter().find(|p| self.professor_of.is_match(p))?;
        let flattened = self.non_word.replace_all(hit, " ");
        let name = self
            .professor_rewrite
            .captures(&flattened)
            .map(|caps| format!("Department of{}", &caps[1]))
            .unwrap_or_else(|| flattened.to_string());
        Some(name.trim().to_string())
    }
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn first_marker(rules: &[MarkerRule], pieces: &[&str]) -> Option<String> {
    rules.iter().find_map(|rule| rule.apply(pieces))
}

/// Upper-case the first letter of every alphabetic run and lower-case the
/// rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
