//! Extraction settings.
//!
//! Loaded from an optional JSON file; every field has a default so an
//! empty object (or no file at all) is a valid configuration.
//!
//! ```json
//! {
//!   "reference_year": 1950,
//!   "legendary_epoch": { "year": 776, "is_bc": true },
//!   "century_thirds": { "early_end": 33, "mid_end": 66 },
//!   "hedging_terms": ["disputed", "traditionally"],
//!   "default_category": "general"
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calendar::{CenturyThirds, Year};
use crate::confidence::{Classifier, DEFAULT_HEDGING_TERMS};
use crate::error::{PipelineError, SpanError};
use crate::orchestrator::Orchestrator;
use crate::span::{DEFAULT_REFERENCE_YEAR, ParseContext, SourceFamily};

/// A year as written in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochBoundary {
    pub year: u64,
    #[serde(default)]
    pub is_bc: bool,
}

impl EpochBoundary {
    pub fn to_year(self) -> Result<Year, SpanError> {
        Year::new(self.year, self.is_bc)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Anchor for "years ago" expressions
    #[serde(default = "default_reference_year")]
    pub reference_year: u64,

    /// Spans starting at or before this year are legendary (null disables)
    #[serde(default = "default_legendary_epoch")]
    pub legendary_epoch: Option<EpochBoundary>,

    #[serde(default)]
    pub century_thirds: CenturyThirds,

    /// Words that mark a date as disputed
    #[serde(default = "default_hedging_terms")]
    pub hedging_terms: Vec<String>,

    /// Category for documents that do not name one
    #[serde(default = "default_category")]
    pub default_category: String,
}

fn default_reference_year() -> u64 {
    DEFAULT_REFERENCE_YEAR
}

fn default_legendary_epoch() -> Option<EpochBoundary> {
    Some(EpochBoundary {
        year: 776,
        is_bc: true,
    })
}

fn default_hedging_terms() -> Vec<String> {
    DEFAULT_HEDGING_TERMS.iter().map(|t| t.to_string()).collect()
}

fn default_category() -> String {
    "general".to_string()
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            reference_year: default_reference_year(),
            legendary_epoch: default_legendary_epoch(),
            century_thirds: CenturyThirds::default(),
            hedging_terms: default_hedging_terms(),
            default_category: default_category(),
        }
    }
}

impl ExtractConfig {
    /// Load from `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        // Same checks every parser applies to its context.
        self.parse_context(SourceFamily::Bullet).validate()?;
        if let Some(epoch) = self.legendary_epoch {
            epoch
                .to_year()
                .map_err(|e| PipelineError::Config(format!("legendary_epoch: {e}")))?;
        }
        Ok(())
    }

    pub fn classifier(&self) -> Result<Classifier, PipelineError> {
        let legendary_epoch = match self.legendary_epoch {
            Some(epoch) => Some(epoch.to_year()?),
            None => None,
        };
        Ok(Classifier {
            legendary_epoch,
            hedging_terms: self.hedging_terms.clone(),
        })
    }

    pub fn orchestrator(&self) -> Result<Orchestrator, PipelineError> {
        Ok(Orchestrator::new(self.classifier()?))
    }

    /// Parse context for `family` carrying the configured anchors.
    pub fn parse_context(&self, family: SourceFamily) -> ParseContext {
        ParseContext::new(family)
            .with_reference_year(self.reference_year)
            .with_century_thirds(self.century_thirds)
    }
}
