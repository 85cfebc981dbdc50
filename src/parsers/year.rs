use std::sync::LazyLock;

use regex::Regex;
use span_types::Confidence;

use super::{SpanParser, capture_era, capture_number, conflict_is_no_match, make_year};
use crate::calendar::HistoricalDate;
use crate::error::Result;
use crate::span::{MatchType, ParseContext, Span};
use crate::tokens::{self, ERA, MONTH, NUMBER};

// "753 BC", "AD 14", "15 March 44 BC", "March 15, 44 BC", "May 1453"
static RE_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:(?P<day_a>\d{{1,2}})\s+(?P<month_a>{MONTH})\s+|(?P<month_b>{MONTH})\s+(?:(?P<day_b>\d{{1,2}}),?\s+)?)?(?:(?P<pre>{ERA})\s*)?(?P<year>{NUMBER})(?:\s*(?P<era>{ERA}))?$"
    ))
    .expect("year regex")
});

/// Bare years without an era marker longer than this are not trusted.
const MAX_BARE_YEAR_DIGITS: usize = 4;

/// A single explicit year (optionally with month and day) plus era.
pub struct ExplicitYearParser;

impl SpanParser for ExplicitYearParser {
    fn match_type(&self) -> MatchType {
        MatchType::ExplicitYear
    }

    fn can_parse(&self, text: &str, _ctx: &ParseContext) -> bool {
        text.chars().any(|c| c.is_ascii_digit())
    }

    fn parse(&self, text: &str, ctx: &ParseContext) -> Result<Option<Span>> {
        conflict_is_no_match(parse_year(text, ctx))
    }
}

fn parse_year(text: &str, ctx: &ParseContext) -> Result<Option<Span>> {
    let Some(caps) = RE_YEAR.captures(text.trim()) else {
        return Ok(None);
    };
    let Some(year) = capture_number(&caps, "year") else {
        return Ok(None);
    };
    let year_text = caps.name("year").map(|m| m.as_str()).unwrap_or_default();
    let era = capture_era(&caps, "pre", "era")?;

    let month = caps
        .name("month_a")
        .or_else(|| caps.name("month_b"))
        .and_then(|m| tokens::parse_month(m.as_str()));
    let day = caps
        .name("day_a")
        .or_else(|| caps.name("day_b"))
        .and_then(|m| m.as_str().parse::<u8>().ok());

    if era.is_none() {
        if year_text.contains(',') || year_text.len() > MAX_BARE_YEAR_DIGITS {
            return Ok(None);
        }
        // "March 15" is a day, not AD 15
        if caps.name("month_b").is_some() && day.is_none() && year_text.len() <= 2 {
            return Ok(None);
        }
    }

    let is_bc = era.unwrap_or_else(|| ctx.default_is_bc());
    let date = HistoricalDate::new(make_year(year, is_bc)?, month, day)?;
    Ok(Some(Span::point(date, Confidence::Explicit, MatchType::ExplicitYear)?))
}
