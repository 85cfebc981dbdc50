//! Lexical pieces shared by the format parsers: era markers, numbers,
//! month names, seasons and the prefix/suffix markers that decorate a date.

use crate::error::{Result, SpanError};

/// Regex fragment matching one era marker (BC, B.C.E., AD, CE, …).
/// Compose inside a case-insensitive pattern.
pub const ERA: &str = r"(?:B\.?\s?C\.?\s?E\.?|B\.?\s?C\.?|A\.?\s?D\.?|C\.?\s?E\.?)";

/// Regex fragment matching a whole number, optionally with thousands separators.
pub const NUMBER: &str = r"(?:\d{1,3}(?:,\d{3})+|\d+)";

/// Regex fragment matching any range separator between two dates.
pub const RANGE_SEP: &str = r"(?:\s*[-–—‒]\s*|\s+(?:to|until|till)\s+)";

/// `true` for BC/BCE, `false` for AD/CE, `None` for anything else.
pub fn parse_era(token: &str) -> Option<bool> {
    let norm: String = token
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    match norm.as_str() {
        "BC" | "BCE" => Some(true),
        "AD" | "CE" => Some(false),
        _ => None,
    }
}

/// Combine a prefix and suffix era for one date.
///
/// Disagreeing markers are an `EraConflict`; callers treat that as no match
/// rather than picking one.
pub fn merge_eras(prefix: Option<&str>, suffix: Option<&str>) -> Result<Option<bool>> {
    let a = prefix.and_then(parse_era);
    let b = suffix.and_then(parse_era);
    match (a, b) {
        (Some(x), Some(y)) if x != y => Err(SpanError::EraConflict(format!(
            "{} vs {}",
            prefix.unwrap_or_default(),
            suffix.unwrap_or_default()
        ))),
        (Some(x), _) | (None, Some(x)) => Ok(Some(x)),
        (None, None) => Ok(None),
    }
}

/// Parse a whole number, ignoring thousands separators.
pub fn parse_number(s: &str) -> Option<u64> {
    let digits: String = s.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Parse an English ordinal or cardinal ("2nd", "21st", "third", "12").
pub fn parse_ordinal(s: &str) -> Option<u64> {
    let lower = s.trim().to_ascii_lowercase();
    let words = [
        "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth",
        "tenth", "eleventh", "twelfth", "thirteenth", "fourteenth", "fifteenth", "sixteenth",
        "seventeenth", "eighteenth", "nineteenth", "twentieth", "twenty-first",
    ];
    if let Some(i) = words.iter().position(|w| *w == lower) {
        return Some(i as u64 + 1);
    }
    let digits = lower.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    let suffix = &lower[digits.len()..];
    if !matches!(suffix, "" | "st" | "nd" | "rd" | "th") {
        return None;
    }
    parse_number(digits)
}

/// Month name or abbreviation → 1..=12.
pub fn parse_month(s: &str) -> Option<u8> {
    let lower = s.trim().trim_end_matches('.').to_ascii_lowercase();
    let m = match lower.as_str() {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(m)
}

/// Regex fragment matching a month name or abbreviation.
pub const MONTH: &str = r"(?:January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec)\.?";

// ── Seasons ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// (first month, last month). Winter's last month falls in the next year.
    pub fn months(&self) -> (u8, u8) {
        match self {
            Self::Spring => (3, 5),
            Self::Summer => (6, 8),
            Self::Autumn => (9, 11),
            Self::Winter => (12, 2),
        }
    }

    pub fn wraps_year(&self) -> bool {
        matches!(self, Self::Winter)
    }
}

pub const SEASON: &str = r"(?:spring|summer|autumn|fall|winter)";

pub fn parse_season(s: &str) -> Option<Season> {
    match s.trim().to_ascii_lowercase().as_str() {
        "spring" => Some(Season::Spring),
        "summer" => Some(Season::Summer),
        "autumn" | "fall" => Some(Season::Autumn),
        "winter" => Some(Season::Winter),
        _ => None,
    }
}

// ── Markers ──────────────────────────────────────────────────────────

const CIRCA_PREFIXES: &[&str] = &[
    "approximately",
    "approx.",
    "approx",
    "circa",
    "around",
    "about",
    "ca.",
    "ca ",
    "c.",
    "c ",
    "≈",
    "~",
];

/// Strip a leading circa/approximation marker, returning the remainder.
pub fn strip_circa(text: &str) -> Option<&str> {
    let trimmed = text.trim_start();
    let lower = trimmed.to_ascii_lowercase();
    for prefix in CIRCA_PREFIXES {
        // Word markers must be followed by a space or digit, not letters ("century").
        if lower.starts_with(prefix) {
            let rest = &trimmed[prefix.len()..];
            let next = rest.chars().next();
            if prefix.ends_with(|c: char| c.is_ascii_alphabetic())
                && next.is_some_and(|c| c.is_ascii_alphabetic())
            {
                continue;
            }
            let rest = rest.trim_start();
            if !rest.is_empty() {
                return Some(rest);
            }
        }
    }
    None
}

/// Strip a leading or trailing "?" uncertainty marker.
pub fn strip_uncertainty(text: &str) -> (&str, bool) {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix('?') {
        return (rest.trim_start(), true);
    }
    if let Some(rest) = trimmed.strip_suffix('?') {
        return (rest.trim_end(), true);
    }
    (trimmed, false)
}

/// Trim whitespace and trailing sentence punctuation.
pub fn clean_fragment(text: &str) -> &str {
    text.trim()
        .trim_end_matches(['.', ',', ';', ':'])
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_era_variants() {
        for bc in ["BC", "bc", "B.C.", "BCE", "B.C.E.", "B. C."] {
            assert_eq!(parse_era(bc), Some(true), "{bc}");
        }
        for ad in ["AD", "A.D.", "CE", "C.E.", "ad"] {
            assert_eq!(parse_era(ad), Some(false), "{ad}");
        }
        assert_eq!(parse_era("BP"), None);
    }

    #[test]
    fn test_merge_eras_conflict() {
        assert_eq!(merge_eras(Some("AD"), Some("AD")), Ok(Some(false)));
        assert_eq!(merge_eras(None, Some("BC")), Ok(Some(true)));
        assert_eq!(merge_eras(None, None), Ok(None));
        assert!(matches!(
            merge_eras(Some("AD"), Some("BC")),
            Err(SpanError::EraConflict(_))
        ));
    }

    #[test]
    fn test_parse_number_with_separators() {
        assert_eq!(parse_number("250,000"), Some(250_000));
        assert_eq!(parse_number("753"), Some(753));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("7a"), None);
    }

    #[test]
    fn test_parse_ordinal() {
        assert_eq!(parse_ordinal("2nd"), Some(2));
        assert_eq!(parse_ordinal("21st"), Some(21));
        assert_eq!(parse_ordinal("Third"), Some(3));
        assert_eq!(parse_ordinal("5"), Some(5));
        assert_eq!(parse_ordinal("5xx"), None);
    }

    #[test]
    fn test_parse_month_names() {
        assert_eq!(parse_month("March"), Some(3));
        assert_eq!(parse_month("Sept."), Some(9));
        assert_eq!(parse_month("dec"), Some(12));
        assert_eq!(parse_month("Marchember"), None);
    }

    #[test]
    fn test_strip_circa() {
        assert_eq!(strip_circa("c. 500 BC"), Some("500 BC"));
        assert_eq!(strip_circa("circa 1200"), Some("1200"));
        assert_eq!(strip_circa("≈1200"), Some("1200"));
        assert_eq!(strip_circa("ca. 44 BC"), Some("44 BC"));
        // "century" must not be read as "c" + "entury"
        assert_eq!(strip_circa("century"), None);
        assert_eq!(strip_circa("500 BC"), None);
    }

    #[test]
    fn test_strip_uncertainty() {
        assert_eq!(strip_uncertainty("?44 BC"), ("44 BC", true));
        assert_eq!(strip_uncertainty("44 BC?"), ("44 BC", true));
        assert_eq!(strip_uncertainty("44 BC"), ("44 BC", false));
    }
}
