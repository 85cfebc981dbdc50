//! Format parsers: one strategy per textual date convention.
//!
//! Every parser is a unit struct implementing [`SpanParser`]. The patterns
//! are anchored: a parser only accepts a fragment that is entirely a date
//! in its convention. Splitting prose from the date part is the caller's job.

pub mod between;
pub mod century;
pub mod circa;
pub mod decade;
pub mod partial;
pub mod range;
pub mod table;
pub mod year;
pub mod years_ago;

use regex::Captures;

use crate::calendar::Year;
use crate::error::{Result, SpanError};
use crate::span::{MatchType, ParseContext, Span};
use crate::tokens;

pub use between::BetweenParser;
pub use century::CenturyParser;
pub use circa::CircaParser;
pub use decade::DecadeParser;
pub use partial::{MonthOnlyParser, SeasonOnlyParser};
pub use range::YearRangeParser;
pub use table::parse_table_cells;
pub use year::ExplicitYearParser;
pub use years_ago::YearsAgoParser;

/// The two-method interface every format strategy implements.
///
/// `parse` returns `Ok(None)` for an ordinary non-match (including an
/// era conflict) and only errors for invalid dates or a malformed context.
pub trait SpanParser: Sync {
    /// Tag reported when this parser produced the span.
    fn match_type(&self) -> MatchType;

    /// Cheap pre-check; `parse` may still return `None` when this is `true`.
    fn can_parse(&self, text: &str, ctx: &ParseContext) -> bool;

    fn parse(&self, text: &str, ctx: &ParseContext) -> Result<Option<Span>>;
}

// ── Shared helpers ───────────────────────────────────────────────────

/// Collapse an era conflict into a plain non-match.
pub(crate) fn conflict_is_no_match<T>(result: Result<Option<T>>) -> Result<Option<T>> {
    match result {
        Err(SpanError::EraConflict(_)) => Ok(None),
        other => other,
    }
}

/// Era of one date from its optional prefix/suffix capture groups.
pub(crate) fn capture_era(caps: &Captures, prefix: &str, suffix: &str) -> Result<Option<bool>> {
    tokens::merge_eras(
        caps.name(prefix).map(|m| m.as_str()),
        caps.name(suffix).map(|m| m.as_str()),
    )
}

/// Number capture → year magnitude (commas allowed).
pub(crate) fn capture_number(caps: &Captures, name: &str) -> Option<u64> {
    caps.name(name).and_then(|m| tokens::parse_number(m.as_str()))
}

/// Resolve the eras of a two-date range.
///
/// A date without its own marker borrows the other date's marker ("753 and
/// 716 BC"); if neither has one, the context default applies to both.
pub(crate) fn resolve_pair_eras(
    first: Option<bool>,
    second: Option<bool>,
    ctx: &ParseContext,
) -> (bool, bool) {
    match (first, second) {
        (Some(a), Some(b)) => (a, b),
        (Some(a), None) => (a, a),
        (None, Some(b)) => (b, b),
        (None, None) => (ctx.default_is_bc(), ctx.default_is_bc()),
    }
}

pub(crate) fn make_year(magnitude: u64, is_bc: bool) -> Result<Year> {
    Year::new(magnitude, is_bc)
}
