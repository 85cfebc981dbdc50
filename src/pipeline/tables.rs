use super::{DocumentOrigin, RunContext, SourceDocument, SourceStrategy, document_category};
use crate::error::PipelineError;
use crate::event::{Event, derive_description, derive_title};
use crate::rowspan::{RowCells, TableTraversal};
use crate::span::SourceFamily;

/// Tables with a year column, an optional date column and event text.
/// Each table gets its own traversal so rowspans never leak across tables.
pub struct TableStrategy {
    origin: DocumentOrigin,
}

impl TableStrategy {
    pub fn new(origin: DocumentOrigin) -> Self {
        Self { origin }
    }
}

impl SourceStrategy for TableStrategy {
    fn name(&self) -> &'static str {
        "table"
    }

    fn fetch(&self, _run: &RunContext) -> Result<SourceDocument, PipelineError> {
        self.origin.fetch()
    }

    fn parse(&self, doc: &SourceDocument, run: &mut RunContext) -> Vec<Event> {
        let category = document_category(doc, &run.config).to_string();
        let mut events = Vec::new();

        for (ti, table) in doc.tables.iter().enumerate() {
            let ctx = run.config.parse_context(SourceFamily::Table);
            let mut traversal = TableTraversal::new(&run.orchestrator, ctx);

            for (ri, row) in table.rows.iter().enumerate() {
                let raw = format!("{} | {} | {}", row.year, row.date, row.text);
                let cells = RowCells {
                    year: &row.year,
                    date: &row.date,
                    text: &row.text,
                    rowspan: row.rowspan,
                };
                // The row is consumed before the text check so an empty row
                // still uses up its share of an active rowspan.
                let resolved = traversal.resolve_row(ri, cells);
                if row.text.trim().is_empty() {
                    run.tally.record_skip(&doc.url, ti, ri, &raw, "empty text".to_string());
                    continue;
                }
                let resolved = match resolved {
                    Ok(Some(resolved)) => resolved,
                    Ok(None) => {
                        run.tally.record_skip(&doc.url, ti, ri, &raw, "undated".to_string());
                        continue;
                    }
                    Err(e) => {
                        run.tally.record_skip(&doc.url, ti, ri, &raw, e.to_string());
                        continue;
                    }
                };

                let mut notes = format!("table/{}", resolved.span.match_type);
                if let Some(source) = resolved.inherited_from {
                    notes.push_str(&format!(" from row {source}"));
                }
                let title = derive_title(&row.text);
                let event = Event::new(
                    &title,
                    derive_description(&row.text, &title),
                    resolved.span,
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
