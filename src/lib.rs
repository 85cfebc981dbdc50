//! Date and span extraction for historical text.
//!
//! Fragments of bullet prose, headings and table cells are resolved into
//! calendar-accurate [`span::Span`]s with a confidence tier, then assembled
//! into content-addressed events by the [`pipeline`] strategies.

pub mod calendar;
pub mod confidence;
pub mod config;
pub mod error;
pub mod event;
pub mod event_key;
pub mod orchestrator;
pub mod parsers;
pub mod pipeline;
pub mod rowspan;
pub mod scanner;
pub mod span;
pub mod tokens;

pub use error::{PipelineError, SpanError};
pub use orchestrator::Orchestrator;
pub use span::{MatchType, ParseContext, SourceFamily, Span};
