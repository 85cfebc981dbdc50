use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── Confidence tier ──────────────────────────────────────────────────────

/// Categorical reliability tier of a resolved date.
///
/// The variants are categories, not a ranking; the derived ordering only
/// exists so the tier can key a sorted map in run summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Direct numeric year with an era (or a bare year under an assumed era)
    Explicit,
    /// Year carried over from an earlier table row
    Inferred,
    /// Circa markers, centuries, decades, "years ago", month/season-only
    Approximate,
    /// Fragment carried an explicit uncertainty marker (leading "?")
    Uncertain,
    /// Fragment carried hedging language ("disputed", "traditionally", …)
    Contentious,
    /// Resolved at or before the configured mythological epoch boundary
    Legendary,
    /// No parser matched; the caller supplied an enclosing default range
    Fallback,
}

impl Confidence {
    pub const ALL: [Confidence; 7] = [
        Self::Explicit,
        Self::Inferred,
        Self::Approximate,
        Self::Uncertain,
        Self::Contentious,
        Self::Legendary,
        Self::Fallback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::Inferred => "inferred",
            Self::Approximate => "approximate",
            Self::Uncertain => "uncertain",
            Self::Contentious => "contentious",
            Self::Legendary => "legendary",
            Self::Fallback => "fallback",
        }
    }
}

// ── Event artifact (storage boundary) ────────────────────────────────────

/// One extracted event as handed to the storage/loading collaborator.
///
/// Field names are part of the loader contract and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventArtifact {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_year: u64,
    #[serde(default)]
    pub start_month: Option<u8>,
    #[serde(default)]
    pub start_day: Option<u8>,
    pub end_year: u64,
    #[serde(default)]
    pub end_month: Option<u8>,
    #[serde(default)]
    pub end_day: Option<u8>,
    pub is_bc_start: bool,
    pub is_bc_end: bool,
    pub weight: u64,
    pub precision: f64,
    pub category: String,
    pub url: String,
    pub span_match_notes: String,
    pub event_key: String,
}

// ── Skipped items ────────────────────────────────────────────────────────

/// A bullet or table row that produced no event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedItem {
    /// Section index (bullets) or table index (tables)
    pub group_index: usize,
    /// Bullet index within its section, or row index within its table
    pub item_index: usize,
    pub raw_text: String,
    pub reason: String,
}

// ── Run summary ──────────────────────────────────────────────────────────

/// Per-run aggregate consumed by observability tooling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub events_extracted: usize,
    pub skipped_rows: usize,
    pub confidence_distribution: BTreeMap<Confidence, usize>,
}

impl RunSummary {
    pub fn record_event(&mut self, confidence: Confidence) {
        self.events_extracted += 1;
        *self.confidence_distribution.entry(confidence).or_default() += 1;
    }

    pub fn record_skip(&mut self) {
        self.skipped_rows += 1;
    }

    /// Fold another summary into this one (used when aggregating documents).
    pub fn merge(&mut self, other: &RunSummary) {
        self.events_extracted += other.events_extracted;
        self.skipped_rows += other.skipped_rows;
        for (tier, count) in &other.confidence_distribution {
            *self.confidence_distribution.entry(*tier).or_default() += count;
        }
    }
}

// ── Artifact bundle ──────────────────────────────────────────────────────

/// Serializable output of one pipeline run over one source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactBundle {
    pub run_id: String,
    pub source_url: String,
    pub events: Vec<EventArtifact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedItem>,
    pub summary: RunSummary,
}
