//! Three-phase ingestion: fetch → parse → artifact.
//!
//! `fetch` is the only phase allowed to touch IO. `parse` turns the fetched
//! document into events and never aborts on a single bad item: the item is
//! recorded as skipped and the run continues.

pub mod bullets;
pub mod document;
pub mod tables;

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use span_types::{ArtifactBundle, RunSummary, SkippedItem};

use crate::config::ExtractConfig;
use crate::error::PipelineError;
use crate::event::Event;
use crate::orchestrator::Orchestrator;
use crate::scanner;

pub use bullets::BulletListStrategy;
pub use document::{DocumentKind, DocumentOrigin, SourceDocument, load_document};
pub use tables::TableStrategy;

// ── Run context ──────────────────────────────────────────────────────

/// Counters and skip records accumulated during one run.
#[derive(Debug, Clone, Default)]
pub struct RunTally {
    pub summary: RunSummary,
    pub skipped: Vec<SkippedItem>,
}

/// Everything a run's phases share. One per document.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub config: ExtractConfig,
    pub orchestrator: Orchestrator,
    pub tally: RunTally,
}

impl RunContext {
    pub fn new(run_id: impl Into<String>, config: ExtractConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let orchestrator = config.orchestrator()?;
        Ok(Self {
            run_id: run_id.into(),
            config,
            orchestrator,
            tally: RunTally::default(),
        })
    }
}

impl RunTally {
    pub fn record_event(&mut self, event: &Event) {
        self.summary.record_event(event.span.confidence);
    }

    pub fn record_skip(
        &mut self,
        source: &str,
        group_index: usize,
        item_index: usize,
        raw_text: &str,
        reason: String,
    ) {
        warn!("{source}: skipped item {group_index}/{item_index} ({reason}): {raw_text:?}");
        self.summary.record_skip();
        self.skipped.push(SkippedItem {
            group_index,
            item_index,
            raw_text: raw_text.to_string(),
            reason,
        });
    }
}

// ── Strategy contract ────────────────────────────────────────────────

pub trait SourceStrategy {
    fn name(&self) -> &'static str;

    fn fetch(&self, run: &RunContext) -> Result<SourceDocument, PipelineError>;

    fn parse(&self, doc: &SourceDocument, run: &mut RunContext) -> Vec<Event>;

    fn generate_artifact(
        &self,
        doc: &SourceDocument,
        events: &[Event],
        run: &RunContext,
    ) -> ArtifactBundle {
        ArtifactBundle {
            run_id: run.run_id.clone(),
            source_url: doc.url.clone(),
            events: events.iter().map(Event::to_artifact).collect(),
            skipped: run.tally.skipped.clone(),
            summary: run.tally.summary.clone(),
        }
    }
}

/// Category for events from `doc`.
pub fn document_category<'a>(doc: &'a SourceDocument, config: &'a ExtractConfig) -> &'a str {
    doc.category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(&config.default_category)
}

/// Drive one strategy through all three phases.
pub fn run_strategy<S: SourceStrategy + ?Sized>(
    strategy: &S,
    run: &mut RunContext,
) -> Result<ArtifactBundle, PipelineError> {
    let doc = strategy.fetch(run)?;
    debug!("[{}] {} fetched {}", run.run_id, strategy.name(), doc.url);
    let events = strategy.parse(&doc, run);
    let bundle = strategy.generate_artifact(&doc, &events, run);
    info!(
        "[{}] {}: {} events, {} skipped",
        run.run_id,
        doc.url,
        bundle.summary.events_extracted,
        bundle.summary.skipped_rows
    );
    Ok(bundle)
}

/// Run whichever strategy matches the document's kind.
pub fn run_document(doc: SourceDocument, run: &mut RunContext) -> Result<ArtifactBundle, PipelineError> {
    let kind = doc.kind;
    let origin = DocumentOrigin::Inline(doc);
    match kind {
        DocumentKind::Bullets => run_strategy(&BulletListStrategy::new(origin), run),
        DocumentKind::Table => run_strategy(&TableStrategy::new(origin), run),
    }
}

// ── Directory runs ───────────────────────────────────────────────────

/// Bundle location for a document, relative to the output directory.
///
/// Mirrors the document's place under `input` so `a/rome.json` and
/// `b/rome.json` land in `a/rome.events.json` and `b/rome.events.json`.
pub fn bundle_relative_path(input: &Path, path: &Path) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("document");
    let file_name = format!("{stem}.events.json");
    match path.strip_prefix(input).ok().and_then(Path::parent) {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

fn write_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<(), PipelineError> {
    let json = serde_json::to_string_pretty(data)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| PipelineError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }
    std::fs::write(path, &json).map_err(|source| PipelineError::Io {
        path: path.display().to_string(),
        source,
    })?;
    debug!("wrote {} ({} bytes)", path.display(), json.len());
    Ok(())
}

/// Outcome of [`run_directory`].
#[derive(Debug, Clone, Default)]
pub struct DirectoryReport {
    pub summary: RunSummary,
    pub written: Vec<PathBuf>,
    /// Documents that could not be loaded, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

/// Extract every source document under `input` into `output`.
///
/// A document that cannot be read or decoded is logged and counted in
/// `failed`; it does not stop the other documents.
pub fn run_directory(
    input: &Path,
    output: &Path,
    config: &ExtractConfig,
    run_id: &str,
) -> Result<DirectoryReport, PipelineError> {
    config.validate()?;
    std::fs::create_dir_all(output).map_err(|source| PipelineError::Io {
        path: output.display().to_string(),
        source,
    })?;

    let mut report = DirectoryReport::default();
    let documents = scanner::scan_documents(input);
    info!("found {} source documents under {}", documents.len(), input.display());

    for path in documents {
        let doc = match load_document(&path) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("cannot load {}: {e}", path.display());
                report.failed.push((path, e.to_string()));
                continue;
            }
        };
        let mut run = RunContext::new(run_id, config.clone())?;
        let bundle = run_document(doc, &mut run)?;
        let target = output.join(bundle_relative_path(input, &path));
        write_json(&target, &bundle)?;
        report.summary.merge(&bundle.summary);
        report.written.push(target);
    }

    write_json(&output.join("summary.json"), &report.summary)?;
    Ok(report)
}
