use log::warn;

use super::{DocumentOrigin, RunContext, SourceDocument, SourceStrategy, document_category};
use crate::error::PipelineError;
use crate::event::{Event, derive_description, derive_title, split_bullet};
use crate::span::{MatchType, ParseContext, SourceFamily, Span};

/// Sections of bullets under date-bearing headings.
///
/// A heading's span anchors its bullets: a single-year heading lets
/// month-only bullets resolve, a wholly BC heading makes bare years BC,
/// and an undatable bullet falls back to the heading's range.
pub struct BulletListStrategy {
    origin: DocumentOrigin,
}

impl BulletListStrategy {
    pub fn new(origin: DocumentOrigin) -> Self {
        Self { origin }
    }
}

/// Bullet context narrowed by what the heading resolved to.
fn bullet_context(base: ParseContext, heading: Option<&Span>) -> ParseContext {
    let Some(heading) = heading else {
        return base;
    };
    let (start, end) = (heading.start().year, heading.end().year);
    let anchor = (start == end).then_some(start);
    let era = (heading.start_is_bc && heading.end_is_bc).then_some(true);
    base.with_anchor_year(anchor).with_assumed_era(era)
}

impl SourceStrategy for BulletListStrategy {
    fn name(&self) -> &'static str {
        "bullets"
    }

    fn fetch(&self, _run: &RunContext) -> Result<SourceDocument, PipelineError> {
        self.origin.fetch()
    }

    fn parse(&self, doc: &SourceDocument, run: &mut RunContext) -> Vec<Event> {
        let category = document_category(doc, &run.config).to_string();
        let heading_ctx = run.config.parse_context(SourceFamily::Heading);
        let mut events = Vec::new();

        for (si, section) in doc.sections.iter().enumerate() {
            let heading_span = match run.orchestrator.parse(&section.heading, &heading_ctx) {
                Ok(span) => span,
                Err(e) => {
                    warn!("section {si} heading {:?}: {e}", section.heading);
                    None
                }
            };
            let ctx = bullet_context(
                run.config.parse_context(SourceFamily::Bullet),
                heading_span.as_ref(),
            );

            for (bi, bullet) in section.bullets.iter().enumerate() {
                let (date_part, body) = split_bullet(bullet);
                if body.is_empty() {
                    run.tally.record_skip(&doc.url, si, bi, bullet, "empty text".to_string());
                    continue;
                }
                let parsed = run.orchestrator.parse_with_prose(date_part, Some(body), &ctx);
                let (span, notes) = match (parsed, &heading_span) {
                    (Ok(Some(span)), _) => {
                        let notes = format!("bullet/{}", span.match_type);
                        (span, notes)
                    }
                    (Ok(None), Some(heading)) => {
                        let notes = format!("bullet/{} from heading {si}", MatchType::Fallback);
                        (run.orchestrator.fallback(heading), notes)
                    }
                    (Ok(None), None) => {
                        run.tally.record_skip(&doc.url, si, bi, bullet, "undated".to_string());
                        continue;
                    }
                    (Err(e), _) => {
                        run.tally.record_skip(&doc.url, si, bi, bullet, e.to_string());
                        continue;
                    }
                };
                let title = derive_title(body);
                let event = Event::new(
                    &title,
                    derive_description(body, &title),
                    span,
                    &category,
                    &doc.url,
                    notes,
                );
                run.tally.record_event(&event);
                events.push(event);
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractConfig;
    use crate::pipeline::document::{DocumentKind, Section};
    use crate::pipeline::run_strategy;
    use span_types::Confidence;

    fn doc(sections: Vec<(&str, Vec<&str>)>) -> SourceDocument {
        SourceDocument {
            url: "https://example.org/rome".to_string(),
            title: "Timeline of Rome".to_string(),
            category: None,
            kind: DocumentKind::Bullets,
            sections: sections
                .into_iter()
                .map(|(heading, bullets)| Section {
                    heading: heading.to_string(),
                    bullets: bullets.into_iter().map(str::to_string).collect(),
                })
                .collect(),
            tables: Vec::new(),
        }
    }

    fn run() -> RunContext {
        RunContext::new("test-run", ExtractConfig::default()).unwrap()
    }

    #[test]
    fn test_bullets_become_events() {
        let strategy = BulletListStrategy::new(DocumentOrigin::Inline(doc(vec![(
            "8th century BC",
            vec![
                "753 BC – Rome is founded. Romulus is king.",
                "(Between 753 and 716 BC) Reign of Romulus",
            ],
        )])));
        let mut run = run();
        let bundle = run_strategy(&strategy, &mut run).unwrap();
        assert_eq!(bundle.events.len(), 2);
        assert_eq!(bundle.run_id, "test-run");

        let first = &bundle.events[0];
        assert_eq!(first.title, "Rome is founded");
        assert_eq!((first.start_year, first.is_bc_start), (753, true));
        assert_eq!(first.category, "general");
        assert_eq!(first.span_match_notes, "bullet/explicit_year");

        let second = &bundle.events[1];
        assert_eq!((second.start_year, second.end_year), (753, 716));
        assert_eq!(second.precision, 0.6);
    }

    #[test]
    fn test_heading_fallback_and_undated_skip() {
        let strategy = BulletListStrategy::new(DocumentOrigin::Inline(doc(vec![
            ("1st century BC", vec!["Virgil writes the Aeneid"]),
            ("Miscellany", vec!["Something happened"]),
        ])));
        let mut run = run();
        let bundle = run_strategy(&strategy, &mut run).unwrap();

        assert_eq!(bundle.events.len(), 1);
        let ev = &bundle.events[0];
        assert_eq!((ev.start_year, ev.end_year), (100, 1));
        assert_eq!(ev.precision, 0.1);
        assert!(ev.span_match_notes.contains("fallback"));

        assert_eq!(bundle.summary.skipped_rows, 1);
        assert_eq!(bundle.skipped[0].group_index, 1);
        assert_eq!(bundle.skipped[0].reason, "undated");
        assert_eq!(
            bundle.summary.confidence_distribution.get(&Confidence::Fallback),
            Some(&1)
        );
    }

    #[test]
    fn test_bad_bullet_does_not_abort() {
        let strategy = BulletListStrategy::new(DocumentOrigin::Inline(doc(vec![(
            "Events",
            vec!["31 April 44 BC – Impossible day", "44 BC – Caesar assassinated"],
        )])));
        let mut run = run();
        let bundle = run_strategy(&strategy, &mut run).unwrap();
        assert_eq!(bundle.events.len(), 1);
        assert_eq!(bundle.skipped.len(), 1);
        assert_eq!(bundle.skipped[0].item_index, 0);
        assert!(bundle.skipped[0].reason.contains("invalid date"));
    }

    #[test]
    fn test_heading_anchors_month_and_era() {
        let strategy = BulletListStrategy::new(DocumentOrigin::Inline(doc(vec![
            ("1453", vec!["May – Fall of Constantinople"]),
            ("5th century BC", vec!["480 – Battle of Salamis"]),
        ])));
        let mut run = run();
        let bundle = run_strategy(&strategy, &mut run).unwrap();
        assert_eq!(bundle.events.len(), 2);
        assert_eq!(bundle.events[0].start_month, Some(5));
        assert_eq!(bundle.events[0].start_year, 1453);
        assert_eq!((bundle.events[1].start_year, bundle.events[1].is_bc_start), (480, true));
    }

    #[test]
    fn test_hedged_body_is_contentious() {
        let strategy = BulletListStrategy::new(DocumentOrigin::Inline(doc(vec![(
            "Events",
            vec!["753 BC – Rome founded, according to legend"],
        )])));
        let mut run = run();
        let bundle = run_strategy(&strategy, &mut run).unwrap();
        assert_eq!(bundle.events[0].precision, 0.3);
    }
}
