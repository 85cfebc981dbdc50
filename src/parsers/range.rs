use std::sync::LazyLock;

use regex::Regex;
use span_types::Confidence;

use super::{SpanParser, capture_era, capture_number, conflict_is_no_match, make_year, resolve_pair_eras};
use crate::error::{Result, SpanError};
use crate::span::{MatchType, ParseContext, Span};
use crate::tokens::{ERA, NUMBER, RANGE_SEP};

// "753–716 BC", "30 BC – AD 14", "from 1914 to 1918", "1939–45"
static RE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:from\s+)?(?:(?P<pre_a>{ERA})\s*)?(?P<a>{NUMBER})(?:\s*(?P<era_a>{ERA}))?{RANGE_SEP}(?:(?P<pre_b>{ERA})\s*)?(?P<b>{NUMBER})(?:\s*(?P<era_b>{ERA}))?$"
    ))
    .expect("range regex")
});

/// Explicit two-date range with optional era markers on either side.
pub struct YearRangeParser;

impl SpanParser for YearRangeParser {
    fn match_type(&self) -> MatchType {
        MatchType::YearRange
    }

    fn can_parse(&self, text: &str, _ctx: &ParseContext) -> bool {
        text.chars().any(|c| c.is_ascii_digit())
    }

    fn parse(&self, text: &str, ctx: &ParseContext) -> Result<Option<Span>> {
        conflict_is_no_match(parse_range(text, ctx))
    }
}

fn parse_range(text: &str, ctx: &ParseContext) -> Result<Option<Span>> {
    let Some(caps) = RE_RANGE.captures(text.trim()) else {
        return Ok(None);
    };
    let (Some(a), Some(raw_b)) = (capture_number(&caps, "a"), capture_number(&caps, "b")) else {
        return Ok(None);
    };
    let era_a = capture_era(&caps, "pre_a", "era_a")?;
    let era_b = capture_era(&caps, "pre_b", "era_b")?;
    let (a_bc, b_bc) = resolve_pair_eras(era_a, era_b, ctx);

    let start = make_year(a, a_bc)?;
    let b_digits = caps.name("b").map(|m| m.as_str()).unwrap_or_default();
    let b = if !a_bc && !b_bc {
        expand_abbreviated_end(a, raw_b, b_digits).ok_or_else(|| {
            SpanError::InvalidDate(format!("cannot expand range end {b_digits} after {a}"))
        })?
    } else {
        raw_b
    };

    let span = Span::years(
        start,
        make_year(b, b_bc)?,
        Confidence::Explicit,
        MatchType::YearRange,
    )?;
    Ok(Some(span))
}

/// "1914–18" → 1918, "1998–02" → 2002. Only applies when the end has fewer
/// digits than the start and would otherwise fall before it.
fn expand_abbreviated_end(start: u64, end: u64, end_text: &str) -> Option<u64> {
    let end_len = end_text.len() as u32;
    let start_len = start.to_string().len() as u32;
    if end_text.contains(',') || end_len >= start_len || end >= start {
        return Some(end);
    }
    let unit = 10u64.checked_pow(end_len)?;
    let candidate = (start - start % unit).checked_add(end)?;
    if candidate < start { candidate.checked_add(unit) } else { Some(candidate) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::SourceFamily;

    fn ctx() -> ParseContext {
        ParseContext::new(SourceFamily::Bullet)
    }

    #[test]
    fn test_range_shared_bc_suffix() {
        let span = YearRangeParser.parse("753–716 BC", &ctx()).unwrap().unwrap();
        assert_eq!((span.start_year, span.start_is_bc), (753, true));
        assert_eq!((span.end_year, span.end_is_bc), (716, true));
        assert_eq!(span.confidence, Confidence::Explicit);
    }

    #[test]
    fn test_range_crossing_era() {
        let span = YearRangeParser.parse("30 BC – AD 14", &ctx()).unwrap().unwrap();
        assert!(span.start_is_bc && !span.end_is_bc);
    }

    #[test]
    fn test_range_words() {
        let span = YearRangeParser
            .parse("from 1914 to 1918", &ctx())
            .unwrap()
            .unwrap();
        assert_eq!((span.start_year, span.end_year), (1914, 1918));
    }

    #[test]
    fn test_range_abbreviated_end() {
        let span = YearRangeParser.parse("1939–45", &ctx()).unwrap().unwrap();
        assert_eq!(span.end_year, 1945);
        let span = YearRangeParser.parse("1998-02", &ctx()).unwrap().unwrap();
        assert_eq!(span.end_year, 2002);
    }

    #[test]
    fn test_range_reversed_bc_is_invalid() {
        // 716 BC precedes 753 BC only in magnitude; chronologically it is later
        let res = YearRangeParser.parse("716–753 BC", &ctx());
        assert!(matches!(res, Err(SpanError::InvalidDate(_))));
    }

    #[test]
    fn test_range_conflict_within_one_date() {
        assert!(YearRangeParser.parse("AD 30 BC – 14", &ctx()).unwrap().is_none());
    }

    #[test]
    fn test_single_year_is_not_a_range() {
        assert!(YearRangeParser.parse("753 BC", &ctx()).unwrap().is_none());
    }

    #[test]
    fn test_range_start_beyond_supported_years() {
        let res = YearRangeParser.parse("18446744073709551615-4", &ctx());
        assert!(matches!(res, Err(SpanError::InvalidDate(_))));
        let res = YearRangeParser.parse("10000000001–5", &ctx());
        assert!(matches!(res, Err(SpanError::InvalidDate(_))));
    }

    #[test]
    fn test_expand_end_never_overflows() {
        assert_eq!(expand_abbreviated_end(u64::MAX, 4, "4"), None);
        assert_eq!(expand_abbreviated_end(1914, 18, "18"), Some(1918));
    }
}
