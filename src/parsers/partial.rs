//! Month-only and season-only fragments. Both are low precision: they
//! either lack a year (taken from the enclosing anchor) or cover months.

use std::sync::LazyLock;

use regex::Regex;
use span_types::Confidence;

use super::{SpanParser, capture_era, capture_number, conflict_is_no_match, make_year};
use crate::calendar::{HistoricalDate, Year};
use crate::error::Result;
use crate::span::{MatchType, ParseContext, Span};
use crate::tokens::{self, ERA, MONTH, NUMBER, SEASON, Season};

// "March", "15 March", "March 15", "15 Mar."
static RE_DAY_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:(?P<day_a>\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?(?P<month_a>{MONTH})|(?P<month_b>{MONTH})(?:\s+(?P<day_b>\d{{1,2}})(?:st|nd|rd|th)?)?)$"
    ))
    .expect("day month regex")
});

// "Spring", "summer of 1066", "Winter 44 BC"
static RE_SEASON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?P<season>{SEASON})(?:\s+(?:of\s+)?(?:(?P<pre>{ERA})\s*)?(?P<year>{NUMBER})(?:\s*(?P<era>{ERA}))?)?$"
    ))
    .expect("season regex")
});

/// (month, day) from a month/day fragment without a year.
pub fn day_month(text: &str) -> Option<(u8, Option<u8>)> {
    let caps = RE_DAY_MONTH.captures(text.trim())?;
    let month = caps
        .name("month_a")
        .or_else(|| caps.name("month_b"))
        .and_then(|m| tokens::parse_month(m.as_str()))?;
    let day = caps
        .name("day_a")
        .or_else(|| caps.name("day_b"))
        .and_then(|m| m.as_str().parse::<u8>().ok());
    Some((month, day))
}

/// Season name alone (no year) from a fragment.
pub fn bare_season(text: &str) -> Option<Season> {
    tokens::parse_season(text)
}

/// Span covering `season` of `year`; winter runs into the following year.
pub fn season_span(season: Season, year: Year, match_type: MatchType) -> Result<Span> {
    let (first, last) = season.months();
    let end_year = if season.wraps_year() { year.shifted(1) } else { year };
    Span::new(
        HistoricalDate::new(year, Some(first), None)?,
        HistoricalDate::new(end_year, Some(last), None)?,
        Confidence::Approximate,
        match_type,
    )
}

// ── Month only ───────────────────────────────────────────────────────

/// A month (optionally with a day) whose year comes from the anchor.
pub struct MonthOnlyParser;

impl SpanParser for MonthOnlyParser {
    fn match_type(&self) -> MatchType {
        MatchType::MonthOnly
    }

    fn can_parse(&self, _text: &str, ctx: &ParseContext) -> bool {
        ctx.anchor_year.is_some()
    }

    fn parse(&self, text: &str, ctx: &ParseContext) -> Result<Option<Span>> {
        let Some(year) = ctx.anchor_year else {
            return Ok(None);
        };
        let Some((month, day)) = day_month(text) else {
            return Ok(None);
        };
        let date = HistoricalDate::new(year, Some(month), day)?;
        Ok(Some(Span::point(date, Confidence::Approximate, MatchType::MonthOnly)?))
    }
}

// ── Season only ──────────────────────────────────────────────────────

/// A season, with its own year or the anchor year.
pub struct SeasonOnlyParser;

impl SpanParser for SeasonOnlyParser {
    fn match_type(&self) -> MatchType {
        MatchType::SeasonOnly
    }

    fn can_parse(&self, text: &str, _ctx: &ParseContext) -> bool {
        let lower = text.to_ascii_lowercase();
        ["spring", "summer", "autumn", "fall", "winter"]
            .iter()
            .any(|s| lower.contains(s))
    }

    fn parse(&self, text: &str, ctx: &ParseContext) -> Result<Option<Span>> {
        conflict_is_no_match(parse_season(text, ctx))
    }
}

fn parse_season(text: &str, ctx: &ParseContext) -> Result<Option<Span>> {
    let Some(caps) = RE_SEASON.captures(text.trim()) else {
        return Ok(None);
    };
    let Some(season) = caps.name("season").and_then(|m| tokens::parse_season(m.as_str())) else {
        return Ok(None);
    };
    let year = match capture_number(&caps, "year") {
        Some(n) => {
            let is_bc = capture_era(&caps, "pre", "era")?.unwrap_or_else(|| ctx.default_is_bc());
            make_year(n, is_bc)?
        }
        None => match ctx.anchor_year {
            Some(y) => y,
            None => return Ok(None),
        },
    };
    Ok(Some(season_span(season, year, MatchType::SeasonOnly)?))
}
