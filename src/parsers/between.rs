use std::sync::LazyLock;

use regex::Regex;
use span_types::Confidence;

use super::{SpanParser, capture_era, capture_number, conflict_is_no_match, make_year, resolve_pair_eras};
use crate::error::Result;
use crate::span::{MatchType, ParseContext, Span};
use crate::tokens::{ERA, NUMBER};

// "(Between 753 and 716 BC)", "between 30 BC and AD 14"
static RE_BETWEEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^\(?\s*between\s+(?:(?P<pre_a>{ERA})\s*)?(?P<a>{NUMBER})(?:\s*(?P<era_a>{ERA}))?\s+and\s+(?:(?P<pre_b>{ERA})\s*)?(?P<b>{NUMBER})(?:\s*(?P<era_b>{ERA}))?\s*\)?$"
    ))
    .expect("between regex")
});

/// Parenthetical or bare "between X and Y [era]".
///
/// Always approximate: the text only bounds the date.
pub struct BetweenParser;

impl SpanParser for BetweenParser {
    fn match_type(&self) -> MatchType {
        MatchType::Between
    }

    fn can_parse(&self, text: &str, _ctx: &ParseContext) -> bool {
        text.to_ascii_lowercase().contains("between")
    }

    fn parse(&self, text: &str, ctx: &ParseContext) -> Result<Option<Span>> {
        conflict_is_no_match(parse_between(text, ctx))
    }
}

fn parse_between(text: &str, ctx: &ParseContext) -> Result<Option<Span>> {
    let Some(caps) = RE_BETWEEN.captures(text.trim()) else {
        return Ok(None);
    };
    let (Some(a), Some(b)) = (capture_number(&caps, "a"), capture_number(&caps, "b")) else {
        return Ok(None);
    };
    let era_a = capture_era(&caps, "pre_a", "era_a")?;
    let era_b = capture_era(&caps, "pre_b", "era_b")?;
    let (a_bc, b_bc) = resolve_pair_eras(era_a, era_b, ctx);

    let span = Span::years(
        make_year(a, a_bc)?,
        make_year(b, b_bc)?,
        Confidence::Approximate,
        MatchType::Between,
    )?;
    Ok(Some(span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpanError;
    use crate::span::SourceFamily;

    fn ctx() -> ParseContext {
        ParseContext::new(SourceFamily::Bullet)
    }

    #[test]
    fn test_between_shared_suffix_era() {
        let span = BetweenParser
            .parse("(Between 753 and 716 BC)", &ctx())
            .unwrap()
            .unwrap();
        assert_eq!((span.start_year, span.start_is_bc), (753, true));
        assert_eq!((span.end_year, span.end_is_bc), (716, true));
        assert_eq!(span.confidence, Confidence::Approximate);
    }

    #[test]
    fn test_between_crossing_eras() {
        let span = BetweenParser
            .parse("between 30 BC and AD 14", &ctx())
            .unwrap()
            .unwrap();
        assert!(span.start_is_bc);
        assert!(!span.end_is_bc);
        assert_eq!(span.end_year, 14);
    }

    #[test]
    fn test_between_reversed_is_invalid() {
        let err = BetweenParser.parse("between 716 and 753 BC", &ctx());
        assert!(matches!(err, Err(SpanError::InvalidDate(_))));
    }

    #[test]
    fn test_between_conflicting_markers_is_no_match() {
        let res = BetweenParser.parse("between AD 30 BC and 14", &ctx()).unwrap();
        assert!(res.is_none());
    }

    #[test]
    fn test_between_non_matching_text() {
        assert!(BetweenParser.parse("between the wars", &ctx()).unwrap().is_none());
    }
}
