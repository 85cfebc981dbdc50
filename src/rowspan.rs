//! Rowspan inheritance for tables whose year cell spans several rows.
//!
//! A [`RowspanContext`] belongs to exactly one table traversal. It is
//! created when the table starts and dropped when it ends.

use crate::calendar::Year;
use crate::error::{Result, SpanError};
use crate::orchestrator::Orchestrator;
use crate::parsers::table::InheritedYears;
use crate::span::{ParseContext, Span};

// ── Context state machine ────────────────────────────────────────────

/// Idle when `remaining_rows == 0`, active otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowspanContext {
    inherited: Option<(Year, Year)>,
    remaining_rows: u32,
    source_row_index: usize,
}

impl RowspanContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.remaining_rows > 0
    }

    pub fn remaining_rows(&self) -> u32 {
        self.remaining_rows
    }

    /// A row declared its own year. It replaces whatever was active and
    /// starts a new counted span only if it declares a rowspan above 1.
    pub fn declare(&mut self, row: usize, first: Year, last: Year, rowspan: Option<u32>) {
        match rowspan {
            Some(n) if n > 1 => {
                self.inherited = Some((first, last));
                self.remaining_rows = n - 1;
                self.source_row_index = row;
            }
            _ => self.reset(),
        }
    }

    /// A row without its own year takes one unit of the active span.
    pub fn consume(&mut self, row: usize) -> Result<InheritedYears> {
        match self.inherited {
            Some((first, last)) if self.remaining_rows > 0 => {
                self.remaining_rows -= 1;
                let inherited = InheritedYears {
                    first,
                    last,
                    source_row: self.source_row_index,
                };
                if self.remaining_rows == 0 {
                    self.inherited = None;
                }
                Ok(inherited)
            }
            _ => Err(SpanError::RowspanExhausted { row }),
        }
    }

    pub fn reset(&mut self) {
        self.inherited = None;
        self.remaining_rows = 0;
    }
}

// ── Table traversal ──────────────────────────────────────────────────

/// The cells of one table row that matter for dating.
#[derive(Debug, Clone, Copy)]
pub struct RowCells<'a> {
    pub year: &'a str,
    pub date: &'a str,
    pub text: &'a str,
    pub rowspan: Option<u32>,
}

/// Outcome of resolving one row.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRow {
    pub span: Span,
    /// Row the year was inherited from, when it was
    pub inherited_from: Option<usize>,
}

/// Walks one table top to bottom, threading the rowspan context.
pub struct TableTraversal<'a> {
    orchestrator: &'a Orchestrator,
    ctx: ParseContext,
    rowspan: RowspanContext,
}

impl<'a> TableTraversal<'a> {
    pub fn new(orchestrator: &'a Orchestrator, ctx: ParseContext) -> Self {
        Self {
            orchestrator,
            ctx,
            rowspan: RowspanContext::new(),
        }
    }

    pub fn context(&self) -> &RowspanContext {
        &self.rowspan
    }

    /// Resolve row `row` (0-based). `Ok(None)` means no date could be
    /// established; errors are invalid dates in the row's own cells.
    pub fn resolve_row(&mut self, row: usize, cells: RowCells<'_>) -> Result<Option<ResolvedRow>> {
        let prose = Some(cells.text).filter(|t| !t.trim().is_empty());

        if cells.year.trim().is_empty() {
            let inherited = match self.rowspan.consume(row) {
                Ok(inh) => inh,
                Err(SpanError::RowspanExhausted { .. }) => return Ok(None),
                Err(e) => return Err(e),
            };
            let span = self.orchestrator.parse_table_row(
                "",
                cells.date,
                prose,
                Some(inherited),
                &self.ctx,
            )?;
            return Ok(span.map(|span| ResolvedRow {
                span,
                inherited_from: Some(inherited.source_row),
            }));
        }

        // An explicit year cell always overrides the running context.
        let parsed = self
            .orchestrator
            .parse_table_row(cells.year, cells.date, prose, None, &self.ctx);
        match parsed {
            Ok(Some(span)) => {
                let (first, last) = (span.start().year, span.end().year);
                self.rowspan.declare(row, first, last, cells.rowspan);
                Ok(Some(ResolvedRow {
                    span,
                    inherited_from: None,
                }))
            }
            Ok(None) => {
                self.rowspan.reset();
                Ok(None)
            }
            Err(e) => {
                // A bad date cell does not void a good year cell: the rows
                // it spans still inherit that year.
                match self
                    .orchestrator
                    .parse_table_row(cells.year, "", None, None, &self.ctx)
                {
                    Ok(Some(span)) => {
                        let (first, last) = (span.start().year, span.end().year);
                        self.rowspan.declare(row, first, last, cells.rowspan);
                    }
                    _ => self.rowspan.reset(),
                }
                Err(e)
            }
        }
    }
}
