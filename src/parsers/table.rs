//! Two-cell table parser: a year cell fixes year and era, a date cell may
//! refine it with a month/day, a season, or an approximation marker.

use span_types::Confidence;

use super::partial::{bare_season, day_month, season_span};
use super::{
    BetweenParser, CenturyParser, CircaParser, DecadeParser, ExplicitYearParser, SpanParser,
    YearRangeParser,
};
use crate::calendar::{HistoricalDate, Year};
use crate::error::Result;
use crate::span::{MatchType, ParseContext, Span};
use crate::tokens;

/// Conventions accepted inside a year cell.
static YEAR_CELL: [&dyn SpanParser; 6] = [
    &BetweenParser,
    &YearRangeParser,
    &CenturyParser,
    &DecadeParser,
    &ExplicitYearParser,
    &CircaParser,
];

/// Year (or years) carried down from an earlier row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InheritedYears {
    pub first: Year,
    pub last: Year,
    pub source_row: usize,
}

/// Parse a year cell on its own.
pub fn parse_year_cell(cell: &str, ctx: &ParseContext) -> Result<Option<Span>> {
    let (cell, _) = tokens::strip_uncertainty(tokens::clean_fragment(cell));
    if cell.is_empty() {
        return Ok(None);
    }
    for parser in YEAR_CELL {
        if parser.can_parse(cell, ctx) {
            if let Some(span) = parser.parse(cell, ctx)? {
                return Ok(Some(span));
            }
        }
    }
    Ok(None)
}

/// `(year_cell, date_cell) → Span`.
///
/// An empty year cell takes its year from `inherited` and is always
/// `inferred`; with nothing inherited the row does not match.
pub fn parse_table_cells(
    year_cell: &str,
    date_cell: &str,
    inherited: Option<InheritedYears>,
    ctx: &ParseContext,
) -> Result<Option<Span>> {
    ctx.validate()?;
    let year_text = tokens::clean_fragment(year_cell);

    let (base, is_inherited) = if year_text.is_empty() {
        let Some(inh) = inherited else {
            return Ok(None);
        };
        let span = Span::years(inh.first, inh.last, Confidence::Inferred, MatchType::TableInherited)?;
        (span, true)
    } else {
        match parse_year_cell(year_text, ctx)? {
            Some(span) => (span, false),
            None => return Ok(None),
        }
    };

    let refined = apply_date_cell(&base, date_cell)?;
    let confidence = if is_inherited {
        Confidence::Inferred
    } else {
        refined.confidence
    };
    let match_type = if is_inherited {
        MatchType::TableInherited
    } else {
        MatchType::TableCells
    };
    Ok(Some(refined.with_confidence(confidence).with_match_type(match_type)))
}

/// Narrow a whole-year span with what the date cell says.
///
/// Only a single-year span without its own month is narrowed; anything the
/// cell says about a multi-year span is ignored.
fn apply_date_cell(base: &Span, date_cell: &str) -> Result<Span> {
    let (cell, _) = tokens::strip_uncertainty(tokens::clean_fragment(date_cell));
    let (cell, approximate) = match tokens::strip_circa(cell) {
        Some(rest) => (rest, true),
        None => (cell, false),
    };
    let marked = |span: Span| {
        if approximate {
            span.with_confidence(Confidence::Approximate)
        } else {
            span
        }
    };

    let start = base.start();
    let single_year = start.year == base.end().year && start.month.is_none();
    if cell.is_empty() || !single_year {
        return Ok(marked(base.clone()));
    }

    if let Some((month, day)) = day_month(cell) {
        let date = HistoricalDate::new(start.year, Some(month), day)?;
        let span = Span::point(date, base.confidence, base.match_type)?;
        return Ok(marked(span));
    }
    if let Some(season) = bare_season(cell) {
        let span = season_span(season, start.year, base.match_type)?;
        return Ok(span);
    }
    Ok(marked(base.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpanError;
    use crate::span::SourceFamily;

    fn ctx() -> ParseContext {
        ParseContext::new(SourceFamily::Table)
    }

    fn inherited(y: u64, row: usize) -> InheritedYears {
        let year = Year::bc(y).unwrap();
        InheritedYears {
            first: year,
            last: year,
            source_row: row,
        }
    }

    #[test]
    fn test_year_and_day_cells() {
        let span = parse_table_cells("44 BC", "15 March", None, &ctx())
            .unwrap()
            .unwrap();
        assert_eq!((span.start_year, span.start_is_bc), (44, true));
        assert_eq!((span.start_month, span.start_day), (Some(3), Some(15)));
        assert_eq!(span.confidence, Confidence::Explicit);
        assert_eq!(span.match_type, MatchType::TableCells);
    }

    #[test]
    fn test_empty_year_uses_inherited() {
        let span = parse_table_cells("", "20 March", Some(inherited(44, 0)), &ctx())
            .unwrap()
            .unwrap();
        assert_eq!((span.start_year, span.start_is_bc), (44, true));
        assert_eq!(span.start_day, Some(20));
        assert_eq!(span.confidence, Confidence::Inferred);
        assert_eq!(span.match_type, MatchType::TableInherited);
    }

    #[test]
    fn test_empty_year_without_context_is_no_match() {
        assert!(parse_table_cells("", "20 March", None, &ctx()).unwrap().is_none());
    }

    #[test]
    fn test_season_and_circa_date_cells() {
        let span = parse_table_cells("1066", "Autumn", None, &ctx())
            .unwrap()
            .unwrap();
        assert_eq!((span.start_month, span.end_month), (Some(9), Some(11)));
        assert_eq!(span.confidence, Confidence::Approximate);

        let span = parse_table_cells("1066", "c. October", None, &ctx())
            .unwrap()
            .unwrap();
        assert_eq!(span.start_month, Some(10));
        assert_eq!(span.confidence, Confidence::Approximate);
    }

    #[test]
    fn test_circa_year_cell() {
        let span = parse_table_cells("c. 500 BC", "", None, &ctx())
            .unwrap()
            .unwrap();
        assert_eq!(span.confidence, Confidence::Approximate);
    }

    #[test]
    fn test_invalid_day_in_date_cell() {
        let res = parse_table_cells("44 BC", "30 February", None, &ctx());
        assert!(matches!(res, Err(SpanError::InvalidDate(_))));
    }

    #[test]
    fn test_unreadable_year_cell() {
        assert!(parse_table_cells("unknown", "", None, &ctx()).unwrap().is_none());
    }
}
