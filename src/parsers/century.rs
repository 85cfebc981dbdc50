use std::sync::LazyLock;

use regex::Regex;
use span_types::Confidence;

use super::{SpanParser, conflict_is_no_match};
use crate::calendar::{CenturyModifier, century_range};
use crate::error::Result;
use crate::span::{MatchType, ParseContext, Span};
use crate::tokens::{self, ERA};

const ORDINAL: &str = r"(?:\d{1,2}(?:st|nd|rd|th)|first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth|eleventh|twelfth|thirteenth|fourteenth|fifteenth|sixteenth|seventeenth|eighteenth|nineteenth|twentieth|twenty-first)";

// "Early 2nd century BC", "the mid-5th century", "5th–4th centuries BC"
static RE_CENTURY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:the\s+)?(?:(?P<modifier>early|mid|middle|late)[\s-]+)?(?P<first>{ORDINAL})(?:\s*(?:[-–—]|to|and)\s*(?P<second>{ORDINAL}))?\s+centur(?:y|ies)(?:\s+(?P<era>{ERA}))?$"
    ))
    .expect("century regex")
});

/// Century descriptors with an optional early/mid/late modifier.
pub struct CenturyParser;

impl SpanParser for CenturyParser {
    fn match_type(&self) -> MatchType {
        MatchType::Century
    }

    fn can_parse(&self, text: &str, _ctx: &ParseContext) -> bool {
        text.to_ascii_lowercase().contains("centur")
    }

    fn parse(&self, text: &str, ctx: &ParseContext) -> Result<Option<Span>> {
        conflict_is_no_match(parse_century(text, ctx))
    }
}

fn parse_modifier(s: &str) -> Option<CenturyModifier> {
    match s.to_ascii_lowercase().as_str() {
        "early" => Some(CenturyModifier::Early),
        "mid" | "middle" => Some(CenturyModifier::Mid),
        "late" => Some(CenturyModifier::Late),
        _ => None,
    }
}

fn parse_century(text: &str, ctx: &ParseContext) -> Result<Option<Span>> {
    let Some(caps) = RE_CENTURY.captures(text.trim()) else {
        return Ok(None);
    };
    let Some(first) = caps.name("first").and_then(|m| tokens::parse_ordinal(m.as_str())) else {
        return Ok(None);
    };
    let second = caps
        .name("second")
        .and_then(|m| tokens::parse_ordinal(m.as_str()));
    let modifier = caps.name("modifier").and_then(|m| parse_modifier(m.as_str()));
    let is_bc = match caps.name("era").and_then(|m| tokens::parse_era(m.as_str())) {
        Some(bc) => bc,
        None => ctx.default_is_bc(),
    };

    let thirds = &ctx.century_thirds;
    let (start, mut end) = century_range(first, is_bc, modifier, thirds)?;
    if let Some(second) = second {
        // The modifier only narrows the opening century of a multi-century span
        let (_, last) = century_range(second, is_bc, None, thirds)?;
        end = last;
    }

    let span = Span::years(start, end, Confidence::Approximate, MatchType::Century)?;
    Ok(Some(span))
}
