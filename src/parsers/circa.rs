use span_types::Confidence;

use super::{
    BetweenParser, CenturyParser, DecadeParser, ExplicitYearParser, SpanParser, YearRangeParser,
    YearsAgoParser,
};
use crate::error::Result;
use crate::span::{MatchType, ParseContext, Span};
use crate::tokens;

/// Numeric conventions that may sit behind a circa marker, in priority order.
static INNER: [&dyn SpanParser; 6] = [
    &BetweenParser,
    &YearRangeParser,
    &CenturyParser,
    &DecadeParser,
    &ExplicitYearParser,
    &YearsAgoParser,
];

/// "c. 500 BC", "circa 1200–1150 BC", "≈ 10,000 years ago".
///
/// The remainder after the marker goes through the numeric parsers as
/// usual; whatever matches, the tier is forced to approximate.
pub struct CircaParser;

impl SpanParser for CircaParser {
    fn match_type(&self) -> MatchType {
        MatchType::Circa
    }

    fn can_parse(&self, text: &str, _ctx: &ParseContext) -> bool {
        tokens::strip_circa(text).is_some()
    }

    fn parse(&self, text: &str, ctx: &ParseContext) -> Result<Option<Span>> {
        let Some(inner) = tokens::strip_circa(text) else {
            return Ok(None);
        };
        for parser in INNER {
            if !parser.can_parse(inner, ctx) {
                continue;
            }
            if let Some(span) = parser.parse(inner, ctx)? {
                return Ok(Some(
                    span.with_confidence(Confidence::Approximate)
                        .with_match_type(MatchType::Circa),
                ));
            }
        }
        Ok(None)
    }
}
