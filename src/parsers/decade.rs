use std::sync::LazyLock;

use regex::Regex;
use span_types::Confidence;

use super::SpanParser;
use crate::calendar::decade_range;
use crate::error::Result;
use crate::span::{MatchType, ParseContext, Span};
use crate::tokens::{self, ERA};

// "1990s", "the 1850s", "440s BC", "1960's"
static RE_DECADE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:the\s+)?(?P<decade>\d{{0,4}}0)'?s(?:\s+(?P<era>{ERA}))?$"
    ))
    .expect("decade regex")
});

pub struct DecadeParser;

impl SpanParser for DecadeParser {
    fn match_type(&self) -> MatchType {
        MatchType::Decade
    }

    fn can_parse(&self, text: &str, _ctx: &ParseContext) -> bool {
        text.trim_end().to_ascii_lowercase().contains("0s")
            || text.contains("0's")
    }

    fn parse(&self, text: &str, ctx: &ParseContext) -> Result<Option<Span>> {
        let Some(caps) = RE_DECADE.captures(text.trim()) else {
            return Ok(None);
        };
        let Some(start) = caps.name("decade").and_then(|m| tokens::parse_number(m.as_str())) else {
            return Ok(None);
        };
        let is_bc = caps
            .name("era")
            .and_then(|m| tokens::parse_era(m.as_str()))
            .unwrap_or_else(|| ctx.default_is_bc());

        let (first, last) = decade_range(start, is_bc)?;
        Ok(Some(Span::years(first, last, Confidence::Approximate, MatchType::Decade)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::SourceFamily;

    fn ctx() -> ParseContext {
        ParseContext::new(SourceFamily::Heading)
    }

    #[test]
    fn test_ad_decade() {
        let span = DecadeParser.parse("the 1850s", &ctx()).unwrap().unwrap();
        assert_eq!((span.start_year, span.end_year), (1850, 1859));
        assert_eq!(span.confidence, Confidence::Approximate);
    }

    #[test]
    fn test_bc_decade_runs_downward() {
        let span = DecadeParser.parse("440s BC", &ctx()).unwrap().unwrap();
        assert_eq!((span.start_year, span.end_year), (449, 440));
        assert!(span.start_is_bc);
    }

    #[test]
    fn test_apostrophe_form() {
        assert!(DecadeParser.parse("1960's", &ctx()).unwrap().is_some());
    }

    #[test]
    fn test_not_a_decade() {
        assert!(DecadeParser.parse("1995s", &ctx()).unwrap().is_none());
        assert!(DecadeParser.parse("1990", &ctx()).unwrap().is_none());
    }
}
