use std::sync::LazyLock;

use regex::Regex;
use span_types::Confidence;

use super::SpanParser;
use crate::calendar::{MAX_YEAR_MAGNITUDE, Year};
use crate::error::{Result, SpanError};
use crate::span::{MatchType, ParseContext, Span};
use crate::tokens::{NUMBER, RANGE_SEP};

// "250,000 years ago", "2.5 million years ago", "12,000–10,000 BP", "3–2 million years ago"
static RE_YEARS_AGO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?P<a>{NUMBER}(?:\.\d+)?)(?:\s*(?P<mult_a>thousand|million|billion))?(?:{RANGE_SEP}(?P<b>{NUMBER}(?:\.\d+)?)(?:\s*(?P<mult_b>thousand|million|billion))?)?\s*(?:years?\s+ago|years?\s+before\s+present|years?\s+BP|BP|ya)$"
    ))
    .expect("years ago regex")
});

/// "N years ago", resolved against the context's reference year.
pub struct YearsAgoParser;

impl SpanParser for YearsAgoParser {
    fn match_type(&self) -> MatchType {
        MatchType::YearsAgo
    }

    fn can_parse(&self, text: &str, _ctx: &ParseContext) -> bool {
        let lower = text.to_ascii_lowercase();
        lower.contains("ago")
            || lower.contains("bp")
            || lower.contains("before present")
            || lower.trim_end().ends_with("ya")
    }

    fn parse(&self, text: &str, ctx: &ParseContext) -> Result<Option<Span>> {
        ctx.validate()?;
        let Some(caps) = RE_YEARS_AGO.captures(text.trim()) else {
            return Ok(None);
        };
        let mult_a = caps.name("mult_a").map(|m| m.as_str());
        let mult_b = caps.name("mult_b").map(|m| m.as_str());

        let Some(a) = caps
            .name("a")
            .and_then(|m| scaled_amount(m.as_str(), mult_a.or(mult_b)))
        else {
            return Ok(None);
        };
        let b = match caps.name("b") {
            Some(m) => match scaled_amount(m.as_str(), mult_b) {
                Some(b) => Some(b),
                None => return Ok(None),
            },
            None => None,
        };

        // A range may be written either way round; the larger figure is earlier.
        let (earliest, latest) = match b {
            Some(b) => (a.max(b), a.min(b)),
            None => (a, a),
        };
        let start = years_before(ctx.reference_year, earliest)?;
        let end = years_before(ctx.reference_year, latest)?;
        Ok(Some(Span::years(start, end, Confidence::Approximate, MatchType::YearsAgo)?))
    }
}

/// "2.5" + "million" → 2_500_000. Fractions finer than a year are dropped.
fn scaled_amount(number: &str, multiplier: Option<&str>) -> Option<u64> {
    let factor: u64 = match multiplier.map(|m| m.to_ascii_lowercase()).as_deref() {
        None => 1,
        Some("thousand") => 1_000,
        Some("million") => 1_000_000,
        Some("billion") => 1_000_000_000,
        Some(_) => return None,
    };
    let cleaned: String = number.chars().filter(|c| *c != ',').collect();
    let (whole, frac) = match cleaned.split_once('.') {
        Some((w, f)) => (w, f),
        None => (cleaned.as_str(), ""),
    };
    let whole: u64 = whole.parse().ok()?;
    let mut total = whole.checked_mul(factor)?;
    let mut scale = factor;
    for digit in frac.chars() {
        scale /= 10;
        if scale == 0 {
            break;
        }
        total = total.checked_add(digit.to_digit(10)? as u64 * scale)?;
    }
    Some(total)
}

/// Count `amount` years back from `reference` on the signed year line.
///
/// 250,000 years before 2000 is 248,000 BC. A result of exactly zero is
/// reported as 1 BC since year 0 does not exist.
pub fn years_before(reference: u64, amount: u64) -> Result<Year> {
    let value = reference as i128 - amount as i128;
    if value.unsigned_abs() > MAX_YEAR_MAGNITUDE as u128 {
        return Err(SpanError::InvalidDate(format!(
            "{amount} years before {reference} exceeds supported range"
        )));
    }
    match value {
        v if v > 0 => Year::ad(v as u64),
        0 => Year::bc(1),
        v => Year::bc((-v) as u64),
    }
}
