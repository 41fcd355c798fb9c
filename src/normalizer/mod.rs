//! The `normalizer` module canonicalizes street names across USPS abbreviations, directionals,
//! ordinals and common aliases (§4.1), and scores pairwise similarity between two canonical forms.
//! It also provides the regex battery the parser uses to lift candidate street names out of free
//! text.
mod tables;

use once_cell::sync::Lazy;
use regex::Regex;
use tables::{DIRECTIONS, HONORIFIC_EXPANSIONS, ORDINALS, STOP_WORDS, STREET_SUFFIXES, singularize};

/// Default similarity threshold for [`equiv`].
pub const DEFAULT_EQUIV_THRESHOLD: f64 = 0.85;

/// The `NormalizedStreetName` struct is the canonical form of a street name string plus the
/// components the canonicalization pipeline (§4.1 steps 1-11) identified along the way.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedStreetName {
    /// The input string, unmodified.
    pub original: String,
    /// Lowercase canonical form: tokens joined by single spaces, post-stopword-removal.
    pub normalized: String,
    /// Tokens making up `normalized`, in order.
    pub tokens: Vec<String>,
    /// Directional found as the leading token (e.g. "north" in "North Main Street").
    pub direction_prefix: Option<String>,
    /// Directional found as the trailing token (e.g. "northeast" in "Main Street Northeast").
    pub direction_suffix: Option<String>,
    /// Street type found in the expected position (e.g. "street", "boulevard").
    pub street_type: Option<String>,
    /// `tokens` with `direction_prefix`, `direction_suffix` and `street_type` removed, joined by
    /// single spaces.
    pub core_name: String,
}

/// The `canonicalize` function runs the full §4.1 pipeline on `input` and returns a
/// [`NormalizedStreetName`].
pub fn canonicalize(input: &str) -> NormalizedStreetName {
    // Step 1: lowercase, collapse whitespace, trim.
    let lower = input.to_lowercase();
    let collapsed = collapse_whitespace(&lower);
    let trimmed = collapsed.trim();

    // Step 2: strip punctuation except intra-token hyphens.
    let stripped = strip_punctuation(trimmed);

    // Step 3: expand ordinals.
    let mut tokens: Vec<String> = stripped
        .split_whitespace()
        .map(|t| ORDINALS.get(t).copied().unwrap_or(t).to_string())
        .collect();

    if tokens.is_empty() {
        return NormalizedStreetName {
            original: input.to_string(),
            ..Default::default()
        };
    }

    // Steps 5-6: leading/trailing directional.
    let mut direction_prefix = None;
    if let Some(expanded) = DIRECTIONS.get(tokens[0].as_str()) {
        direction_prefix = Some(expanded.to_string());
        tokens[0] = expanded.to_string();
    }
    let mut direction_suffix = None;
    if tokens.len() > 1 {
        let last = tokens.len() - 1;
        if let Some(expanded) = DIRECTIONS.get(tokens[last].as_str()) {
            direction_suffix = Some(expanded.to_string());
            tokens[last] = expanded.to_string();
        }
    }

    // Step 7: street type at `type_index`.
    let mut street_type = None;
    if tokens.len() > if direction_suffix.is_some() { 1 } else { 0 } {
        let type_index = if direction_suffix.is_some() {
            tokens.len() - 2
        } else {
            tokens.len() - 1
        };
        if let Some(expanded) = lookup_suffix(&tokens[type_index]) {
            street_type = Some(expanded.to_string());
            tokens[type_index] = expanded.to_string();
        }
    }

    // Step 8: honorific/acronym expansion, left to right, accounting for growth.
    let mut i = 0;
    while i < tokens.len() {
        let mut expanded_here = false;
        for (from, to) in HONORIFIC_EXPANSIONS.iter() {
            if tokens[i] == *from {
                let replacement: Vec<String> = to.iter().map(|s| s.to_string()).collect();
                let len = replacement.len();
                tokens.splice(i..=i, replacement);
                i += len;
                expanded_here = true;
                break;
            }
        }
        if !expanded_here {
            i += 1;
        }
    }

    // Step 9: drop stop words, keeping at least one token.
    if tokens.len() > 1 {
        let filtered: Vec<String> = tokens
            .iter()
            .filter(|t| !STOP_WORDS.contains(&t.as_str()))
            .cloned()
            .collect();
        if !filtered.is_empty() {
            tokens = filtered;
        }
    }

    // Step 10: core name with directionals and street type removed.
    let core_tokens: Vec<&String> = tokens
        .iter()
        .filter(|t| {
            Some(t.as_str()) != direction_prefix.as_deref()
                && Some(t.as_str()) != direction_suffix.as_deref()
                && Some(t.as_str()) != street_type.as_deref()
        })
        .collect();
    let core_name = core_tokens
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    // Step 11: normalized form.
    let normalized = tokens.join(" ");

    NormalizedStreetName {
        original: input.to_string(),
        normalized,
        tokens,
        direction_prefix,
        direction_suffix,
        street_type,
        core_name,
    }
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_punctuation(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect()
}

fn lookup_suffix(token: &str) -> Option<&'static str> {
    if let Some(expanded) = STREET_SUFFIXES.get(token) {
        return Some(expanded);
    }
    let singular = singularize(token)?;
    STREET_SUFFIXES.get(singular).copied()
}

/// The `sim` function scores the similarity of two [`NormalizedStreetName`]s in `[0, 1]`: exact
/// match on `normalized` scores `1.0`, a shared non-empty `core_name` scores `0.95`, and otherwise
/// the score is `1 - levenshtein(a, b) / max(len(a), len(b))`.
pub fn sim(a: &NormalizedStreetName, b: &NormalizedStreetName) -> f64 {
    if a.normalized == b.normalized {
        return 1.0;
    }
    if !a.core_name.is_empty() && a.core_name == b.core_name {
        return 0.95;
    }
    let max_len = a.normalized.chars().count().max(b.normalized.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(&a.normalized, &b.normalized) as f64 / max_len as f64
}

/// The `equiv` function returns true when `sim(a, b)` meets or exceeds `threshold`.
pub fn equiv(a: &NormalizedStreetName, b: &NormalizedStreetName, threshold: f64) -> bool {
    sim(a, b) >= threshold
}

/// The `levenshtein` function computes the edit distance between two strings using the standard
/// Wagner-Fischer dynamic-programming table.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (m, n) = (a.len(), b.len());
    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }
    let mut row: Vec<usize> = (0..=n).collect();
    for i in 1..=m {
        let mut prev_diag = row[0];
        row[0] = i;
        for j in 1..=n {
            let temp = row[j];
            row[j] = if a[i - 1] == b[j - 1] {
                prev_diag
            } else {
                1 + row[j].min(row[j - 1]).min(prev_diag)
            };
            prev_diag = temp;
        }
    }
    row[n]
}

static ALONG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\balong\s+([A-Z][\w' -]*?(?:\s+[A-Z][\w'-]*)*)").unwrap());
static ON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bon\s+([A-Z][\w' -]*?(?:\s+[A-Z][\w'-]*)*)").unwrap());
static DIRECTIONAL_ON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:north|south|east|west|ne|nw|se|sw)(?:erly)?\s+on\s+([A-Z][\w' -]*?(?:\s+[A-Z][\w'-]*)*)").unwrap()
});
static INTERSECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)intersection\s+of\s+([A-Z][\w' -]*?(?:\s+[A-Z][\w'-]*)*)\s+and\s+([A-Z][\w' -]*?(?:\s+[A-Z][\w'-]*)*)",
    )
    .unwrap()
});
static GENERIC_STREET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b((?:[A-Z][a-zA-Z'-]*\s+){1,4}(?:Street|Avenue|Boulevard|Drive|Road|Lane|Way|Court|Place|Parkway|Highway|Trail|Circle|Terrace|Loop))\b",
    )
    .unwrap()
});

/// The `extract_candidates` function lifts candidate street-name strings from free text using the
/// regex battery described in §4.1: `"along X"`, `"on X"`, `"<direction> on X"`, `"intersection of
/// X and Y"`, and the generic "capitalized words + suffix" pattern. Returns a deduplicated,
/// order-preserving list.
pub fn extract_candidates(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    let mut push = |candidate: &str| {
        let trimmed = candidate.trim().to_string();
        if !trimmed.is_empty() && seen.insert(trimmed.clone()) {
            out.push(trimmed);
        }
    };

    for caps in INTERSECTION_RE.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            push(m.as_str());
        }
        if let Some(m) = caps.get(2) {
            push(m.as_str());
        }
    }
    for caps in DIRECTIONAL_ON_RE.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            push(m.as_str());
        }
    }
    for caps in ALONG_RE.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            push(m.as_str());
        }
    }
    for caps in ON_RE.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            push(m.as_str());
        }
    }
    for caps in GENERIC_STREET_RE.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            push(m.as_str());
        }
    }
    out
}
