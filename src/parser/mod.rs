//! The `parser` module turns free-form legal description text into an ordered
//! [`crate::model::BoundarySegmentDescription`] list (§4.2): split the text into per-edge segments,
//! classify each by a fixed precedence of regex-driven rules, and attach direction/from/to clauses
//! and a confidence tier.
use crate::model::{
    BoundarySegmentDescription, CardinalDirection, ExtractionConfidence, SegmentReferenceType,
};
use crate::normalizer;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{instrument, warn};

/// Literal marker prefixed onto a segment's `raw_text` when the split produced a leading
/// intersection starting-point clause, preserved verbatim through classification.
pub const STARTING_POINT_MARKER: &str = "STARTING_POINT:";

/// Diagnostics attached to a [`ParseResult`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseDiagnostics {
    /// Total number of segments produced.
    pub total: usize,
    /// Count of segments classified with [`ExtractionConfidence::High`].
    pub high: usize,
    /// Count of segments classified with [`ExtractionConfidence::Medium`].
    pub medium: usize,
    /// Count of segments classified with [`ExtractionConfidence::Low`].
    pub low: usize,
    /// Human-readable warnings surfaced during finalization.
    pub warnings: Vec<String>,
}

/// The result of parsing a legal description: never an error, only a diagnosed outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseResult {
    /// True when at least one segment was produced.
    pub success: bool,
    /// Segments in split order, with ascending `index`.
    pub segments: Vec<BoundarySegmentDescription>,
    /// Diagnostics about the parse.
    pub diagnostics: ParseDiagnostics,
}

static THENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bthence\b").unwrap());
static NUMBERED_LIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(?:^|\s)(?:\d+[.)\]]|\([a-z]\)|\(\d+\))\s*").unwrap());
static AND_THEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\(?and\)?\s+then\b").unwrap());
static COMMA_DIRECTIONAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i),\s*(?=(?:north|south|east|west|ne|nw|se|sw)\w*|along|following|to the)")
        .unwrap()
});

static STARTING_POINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:ward\s+\d+:\s*)?beginning at (?:the )?intersection").unwrap()
});
static INTERSECTION_OF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)intersection of\s+([A-Z][\w' -]*?(?:\s+[A-Z][\w'-]*)*)\s+and\s+([A-Z][\w' -]*?(?:\s+[A-Z][\w'-]*)*)",
    )
    .unwrap()
});
static MUNICIPAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(city limits|municipal boundary|corporate limits)").unwrap());
static NATURAL_FEATURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([A-Z][\w'-]*(?:\s+[A-Z][\w'-]*)*)\s+(river|creek|stream|branch|bayou|run|brook)\b")
        .unwrap()
});
static RAILROAD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([A-Z][\w'-]*(?:\s+[A-Z][\w'-]*)*)\s+(railroad|railway|rail\s?line|rr)\b")
        .unwrap()
});
static HIGHWAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(i-\d+|us-\d+|state route \d+|interstate \d+)\b").unwrap()
});
static ALONG_ON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:along|on|following)\s+([A-Z][\w' -]*?(?:\s+[A-Z][\w'-]*)*?)(?:\s+to\b|[,;.]|$)")
        .unwrap()
});
static DIRECTION_WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bin an?\s+(north|south|east|west|northeast|northwest|southeast|southwest)(?:erly)?\s+direction\b|\b(north|south|east|west|ne|nw|se|sw|northeast|northwest|southeast|southwest)(?:erly)?\b")
        .unwrap()
});
static FROM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bfrom\s+([A-Z][\w' .,-]*?)(?=\s+to\b|[;.]|$)").unwrap());
static TO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bto\s+([A-Z][\w' .,-]*?)(?=[;.]|$)").unwrap());

/// The `split_segments` function applies the §4.2 splitting cascade: the first rule yielding at
/// least two non-empty pieces wins, falling back to the whole text as a single segment.
pub fn split_segments(text: &str) -> Vec<String> {
    let candidates: [fn(&str) -> Vec<String>; 4] = [
        |t| split_by_regex(t, &THENCE_RE),
        |t| split_literal(t, ";"),
        |t| split_by_regex(t, &NUMBERED_LIST_RE),
        |t| split_by_regex(t, &AND_THEN_RE),
    ];
    for split in candidates {
        let pieces = split(text);
        if pieces.len() >= 2 {
            return pieces;
        }
    }
    let by_comma = split_by_regex(text, &COMMA_DIRECTIONAL_RE);
    if by_comma.len() >= 2 {
        return by_comma;
    }
    vec![text.trim().to_string()]
}

fn split_by_regex(text: &str, re: &Regex) -> Vec<String> {
    re.split(text)
        .map(|s| s.trim().trim_matches(',').trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn split_literal(text: &str, sep: &str) -> Vec<String> {
    text.split(sep)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// The `parse_description` function runs the full §4.2 pipeline on `text`: split, classify each
/// piece, attach direction/from/to, and finalize diagnostics.
#[instrument(skip(text), fields(len = text.len()))]
pub fn parse_description(text: &str) -> ParseResult {
    let mut pieces = split_segments(text);
    if pieces.len() >= 2 && STARTING_POINT_RE.is_match(&pieces[0]) {
        pieces[0] = format!("{STARTING_POINT_MARKER}{}", pieces[0]);
    }

    let segments: Vec<BoundarySegmentDescription> = pieces
        .iter()
        .enumerate()
        .map(|(index, raw)| classify_segment(index, raw))
        .collect();

    let mut diagnostics = ParseDiagnostics {
        total: segments.len(),
        ..Default::default()
    };
    for seg in &segments {
        match seg.parse_confidence {
            ExtractionConfidence::High => diagnostics.high += 1,
            ExtractionConfidence::Medium => diagnostics.medium += 1,
            ExtractionConfidence::Low => diagnostics.low += 1,
        }
    }

    if let (Some(first), Some(last)) = (segments.first(), segments.last()) {
        if segments.len() > 1 {
            let first_name = normalizer::canonicalize(&first.feature_name);
            let last_name = normalizer::canonicalize(&last.feature_name);
            if normalizer::sim(&first_name, &last_name) < 0.85 && last.to.is_none() {
                diagnostics
                    .warnings
                    .push("ring may not close: first and last segments do not match".to_string());
            }
        }
    }
    if diagnostics.total > 0 && diagnostics.low * 2 > diagnostics.total {
        diagnostics
            .warnings
            .push("manual review recommended".to_string());
    }
    for warning in &diagnostics.warnings {
        warn!(warning, "parse diagnostic");
    }

    ParseResult {
        success: !segments.is_empty(),
        segments,
        diagnostics,
    }
}

fn classify_segment(index: usize, raw: &str) -> BoundarySegmentDescription {
    let body = raw.strip_prefix(STARTING_POINT_MARKER).unwrap_or(raw);

    let (reference_type, feature_name, confidence) = if raw.starts_with(STARTING_POINT_MARKER)
        && STARTING_POINT_RE.is_match(body)
    {
        if let Some(caps) = INTERSECTION_OF_RE.captures(body) {
            let s1 = caps.get(1).unwrap().as_str().trim();
            let s2 = caps.get(2).unwrap().as_str().trim();
            (
                SegmentReferenceType::Coordinate,
                BoundarySegmentDescription::intersection_feature_name(s1, s2),
                ExtractionConfidence::High,
            )
        } else {
            (
                SegmentReferenceType::Coordinate,
                body.to_string(),
                ExtractionConfidence::Low,
            )
        }
    } else if MUNICIPAL_RE.is_match(body) {
        (
            SegmentReferenceType::MunicipalBoundary,
            "city limits".to_string(),
            ExtractionConfidence::High,
        )
    } else if let Some(caps) = NATURAL_FEATURE_RE.captures(body) {
        (
            SegmentReferenceType::NaturalFeature,
            caps.get(0).unwrap().as_str().trim().to_string(),
            ExtractionConfidence::High,
        )
    } else if let Some(caps) = RAILROAD_RE.captures(body) {
        (
            SegmentReferenceType::Railroad,
            caps.get(0).unwrap().as_str().trim().to_string(),
            ExtractionConfidence::High,
        )
    } else if let Some(caps) = HIGHWAY_RE.captures(body) {
        (
            SegmentReferenceType::Highway,
            caps.get(1).unwrap().as_str().trim().to_string(),
            ExtractionConfidence::High,
        )
    } else if let Some(caps) = ALONG_ON_RE.captures(body) {
        (
            SegmentReferenceType::StreetCenterline,
            caps.get(1).unwrap().as_str().trim().to_string(),
            ExtractionConfidence::High,
        )
    } else if let Some(candidate) = normalizer::extract_candidates(body).into_iter().next() {
        (
            SegmentReferenceType::StreetCenterline,
            candidate,
            ExtractionConfidence::Medium,
        )
    } else {
        (
            SegmentReferenceType::StreetCenterline,
            body.trim().to_string(),
            ExtractionConfidence::Low,
        )
    };

    let direction = DIRECTION_WORD_RE.captures(body).and_then(|caps| {
        let word = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())?;
        CardinalDirection::match_text(word)
    });
    let from = FROM_RE
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string());
    let to = TO_RE
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string());

    BoundarySegmentDescription {
        index,
        reference_type,
        feature_name,
        direction,
        from,
        to,
        raw_text: raw.to_string(),
        parse_confidence: confidence,
    }
}

/// The `validate_parsed_segments` function flags structural problems in an already-parsed segment
/// list: too few segments to close a ring, consecutive duplicates, empty feature names, and
/// low-confidence segments (with a truncated preview of the offending raw text).
pub fn validate_parsed_segments(segments: &[BoundarySegmentDescription]) -> Vec<String> {
    let mut warnings = Vec::new();
    if segments.len() < 3 {
        warnings.push(format!(
            "fewer than 3 segments: found {}",
            segments.len()
        ));
    }
    for pair in segments.windows(2) {
        let a = normalizer::canonicalize(&pair[0].feature_name);
        let b = normalizer::canonicalize(&pair[1].feature_name);
        if a.normalized == b.normalized && !a.normalized.is_empty() {
            warnings.push(format!(
                "consecutive duplicate segment at index {}",
                pair[1].index
            ));
        }
    }
    for seg in segments {
        if seg.feature_name.trim().is_empty() {
            warnings.push(format!("empty feature name at index {}", seg.index));
        }
        if seg.parse_confidence == ExtractionConfidence::Low {
            let preview: String = seg.raw_text.chars().take(40).collect();
            warnings.push(format!(
                "low-confidence segment at index {}: \"{preview}...\"",
                seg.index
            ));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_thence() {
        let text = "Beginning at Main Street, thence along Oak Avenue, thence along Pine Street.";
        let pieces = split_segments(text);
        assert_eq!(pieces.len(), 3);
    }

    #[test]
    fn falls_back_to_whole_text() {
        let text = "A single unsplittable description of the boundary.";
        let pieces = split_segments(text);
        assert_eq!(pieces.len(), 1);
    }

    #[test]
    fn marks_starting_point_intersection() {
        let text = "Ward 3: Beginning at the intersection of Main Street and Oak Avenue, thence along Pine Street, thence along Elm Street.";
        let result = parse_description(text);
        assert!(result.segments[0].raw_text.starts_with(STARTING_POINT_MARKER));
        assert_eq!(
            result.segments[0].reference_type,
            SegmentReferenceType::Coordinate
        );
        assert_eq!(
            result.segments[0].intersection_streets(),
            Some(("Main Street", "Oak Avenue"))
        );
    }

    #[test]
    fn classifies_municipal_boundary() {
        let seg = classify_segment(0, "thence along the city limits");
        assert_eq!(seg.reference_type, SegmentReferenceType::MunicipalBoundary);
        assert_eq!(seg.parse_confidence, ExtractionConfidence::High);
    }

    #[test]
    fn classifies_natural_feature() {
        let seg = classify_segment(0, "thence along Mill Creek to the north");
        assert_eq!(seg.reference_type, SegmentReferenceType::NaturalFeature);
    }

    #[test]
    fn classifies_along_street() {
        let seg = classify_segment(0, "thence along Main Street to the intersection");
        assert_eq!(seg.reference_type, SegmentReferenceType::StreetCenterline);
        assert_eq!(seg.feature_name, "Main Street");
        assert_eq!(seg.parse_confidence, ExtractionConfidence::High);
    }

    #[test]
    fn attaches_direction() {
        let seg = classify_segment(0, "thence northerly along Main Street");
        assert_eq!(seg.direction, Some(CardinalDirection::N));
    }

    #[test]
    fn validate_flags_too_few_segments() {
        let result = parse_description("A single unsplittable description of the boundary.");
        let warnings = validate_parsed_segments(&result.segments);
        assert!(warnings.iter().any(|w| w.contains("fewer than 3")));
    }

    #[test]
    fn every_segment_gets_dense_index() {
        let text = "Beginning at Main Street, thence along Oak Avenue, thence along Pine Street.";
        let result = parse_description(text);
        assert!(result
            .segments
            .iter()
            .enumerate()
            .all(|(i, seg)| seg.index == i));
    }
}
