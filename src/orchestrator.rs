//! Parser selection per source family.
//!
//! Each family has a fixed, ordered parser list. Selection is a linear scan:
//! `can_parse` then `parse`, first `Some` wins. When nothing matches the
//! result is `Ok(None)` and the caller decides the fallback.

use log::trace;

use crate::confidence::{Classifier, FragmentCues};
use crate::error::Result;
use crate::parsers::table::{InheritedYears, parse_table_cells};
use crate::parsers::{
    BetweenParser, CenturyParser, CircaParser, DecadeParser, ExplicitYearParser, MonthOnlyParser,
    SeasonOnlyParser, SpanParser, YearRangeParser, YearsAgoParser,
};
use crate::span::{MatchType, ParseContext, SourceFamily, Span};
use crate::tokens;

// ── Registries ───────────────────────────────────────────────────────

static BULLET_PARSERS: [&dyn SpanParser; 9] = [
    &BetweenParser,
    &YearRangeParser,
    &CenturyParser,
    &DecadeParser,
    &ExplicitYearParser,
    &YearsAgoParser,
    &MonthOnlyParser,
    &SeasonOnlyParser,
    &CircaParser,
];

static HEADING_PARSERS: [&dyn SpanParser; 7] = [
    &BetweenParser,
    &YearRangeParser,
    &CenturyParser,
    &DecadeParser,
    &ExplicitYearParser,
    &YearsAgoParser,
    &CircaParser,
];

static TABLE_PARSERS: [&dyn SpanParser; 8] = [
    &BetweenParser,
    &YearRangeParser,
    &CenturyParser,
    &DecadeParser,
    &ExplicitYearParser,
    &YearsAgoParser,
    &SeasonOnlyParser,
    &CircaParser,
];

/// Ordered parser list registered for a source family.
pub fn parsers_for(family: SourceFamily) -> &'static [&'static dyn SpanParser] {
    match family {
        SourceFamily::Bullet => &BULLET_PARSERS,
        SourceFamily::Heading => &HEADING_PARSERS,
        SourceFamily::Table => &TABLE_PARSERS,
    }
}

/// Run the family's parsers over `text` and return the first match,
/// unclassified. The span's `match_type` names the parser that matched.
pub fn select_span(text: &str, ctx: &ParseContext) -> Result<Option<Span>> {
    ctx.validate()?;
    let cleaned = tokens::clean_fragment(text);
    let (body, _) = tokens::strip_uncertainty(cleaned);
    if body.is_empty() {
        return Ok(None);
    }
    for parser in parsers_for(ctx.source_family) {
        if !parser.can_parse(body, ctx) {
            continue;
        }
        if let Some(span) = parser.parse(body, ctx)? {
            trace!("{:?} matched {body:?} via {}", ctx.source_family, parser.match_type());
            return Ok(Some(span));
        }
    }
    Ok(None)
}

// ── Orchestrator ─────────────────────────────────────────────────────

/// Parser selection plus confidence classification.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    classifier: Classifier,
}

impl Orchestrator {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Parse a free-text date fragment.
    pub fn parse(&self, text: &str, ctx: &ParseContext) -> Result<Option<Span>> {
        self.parse_with_prose(text, None, ctx)
    }

    /// Parse a date fragment; `prose` is the accompanying event text, which
    /// is only consulted for hedging language.
    pub fn parse_with_prose(
        &self,
        text: &str,
        prose: Option<&str>,
        ctx: &ParseContext,
    ) -> Result<Option<Span>> {
        let Some(span) = select_span(text, ctx)? else {
            return Ok(None);
        };
        let cues = self.classifier.cues(tokens::clean_fragment(text), prose);
        Ok(Some(self.classifier.classify(&span, cues)))
    }

    /// Parse one table row from its year and date cells.
    pub fn parse_table_row(
        &self,
        year_cell: &str,
        date_cell: &str,
        prose: Option<&str>,
        inherited: Option<InheritedYears>,
        ctx: &ParseContext,
    ) -> Result<Option<Span>> {
        let Some(span) = parse_table_cells(year_cell, date_cell, inherited, ctx)? else {
            return Ok(None);
        };
        let year_cues = self.classifier.cues(tokens::clean_fragment(year_cell), prose);
        let date_cues = self.classifier.cues(tokens::clean_fragment(date_cell), None);
        let cues = FragmentCues {
            uncertain: year_cues.uncertain || date_cues.uncertain,
            hedged: year_cues.hedged || date_cues.hedged,
        };
        Ok(Some(self.classifier.classify(&span, cues)))
    }

    /// Re-tier a caller-supplied default range as a fallback span.
    pub fn fallback(&self, default: &Span) -> Span {
        let span = default
            .with_confidence(span_types::Confidence::Fallback)
            .with_match_type(MatchType::Fallback);
        self.classifier.classify(&span, FragmentCues::default())
    }
}
