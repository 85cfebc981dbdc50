//! Confidence classification.
//!
//! Parsers assign a base tier. The classifier then applies textual cues and
//! the legendary epoch in a fixed order:
//!
//!   base → uncertain ("?" marker) → contentious (hedging language) → legendary
//!
//! Each later step overrides the earlier ones. `fallback` spans ignore textual
//! cues because their dates did not come from the text, but they can still
//! become legendary.

use span_types::Confidence;

use crate::calendar::Year;
use crate::span::Span;
use crate::tokens;

/// Fixed tier → precision lookup. Higher means more exact.
pub const PRECISION_TABLE: [(Confidence, f64); 7] = [
    (Confidence::Explicit, 1.0),
    (Confidence::Inferred, 0.8),
    (Confidence::Approximate, 0.6),
    (Confidence::Uncertain, 0.4),
    (Confidence::Contentious, 0.3),
    (Confidence::Legendary, 0.2),
    (Confidence::Fallback, 0.1),
];

pub fn precision_for(confidence: Confidence) -> f64 {
    PRECISION_TABLE
        .iter()
        .find(|(c, _)| *c == confidence)
        .map(|(_, p)| *p)
        .unwrap_or(0.0)
}

/// Hedging words recognised when no configuration overrides them.
pub const DEFAULT_HEDGING_TERMS: &[&str] = &[
    "disputed",
    "contested",
    "contentious",
    "possibly",
    "probably",
    "allegedly",
    "reputedly",
    "traditionally",
    "according to legend",
];

// ── Cues ─────────────────────────────────────────────────────────────

/// Textual signals found around a date fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FragmentCues {
    pub uncertain: bool,
    pub hedged: bool,
}

/// `true` when any hedging term occurs in `text` as a whole word or phrase.
pub fn contains_hedging<S: AsRef<str>>(text: &str, terms: &[S]) -> bool {
    let lower = text.to_lowercase();
    terms.iter().any(|term| {
        let term = term.as_ref().to_lowercase();
        if term.is_empty() {
            return false;
        }
        lower.match_indices(&term).any(|(i, _)| {
            let before = lower[..i].chars().next_back();
            let after = lower[i + term.len()..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        })
    })
}

// ── Classification ───────────────────────────────────────────────────

/// Resolve the final tier for a span whose chronological start is `start`.
pub fn classify_confidence(
    base: Confidence,
    start: Year,
    cues: FragmentCues,
    legendary_epoch: Option<Year>,
) -> Confidence {
    let mut tier = base;
    if base != Confidence::Fallback {
        if cues.uncertain {
            tier = Confidence::Uncertain;
        }
        if cues.hedged {
            tier = Confidence::Contentious;
        }
    }
    if legendary_epoch.is_some_and(|epoch| start <= epoch) {
        tier = Confidence::Legendary;
    }
    tier
}

/// Configured classifier: legendary boundary plus hedging vocabulary.
#[derive(Debug, Clone)]
pub struct Classifier {
    pub legendary_epoch: Option<Year>,
    pub hedging_terms: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            legendary_epoch: None,
            hedging_terms: DEFAULT_HEDGING_TERMS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl Classifier {
    /// Collect cues from the raw fragment and any surrounding prose.
    pub fn cues(&self, fragment: &str, surrounding: Option<&str>) -> FragmentCues {
        let (_, uncertain) = tokens::strip_uncertainty(fragment);
        let hedged = contains_hedging(fragment, &self.hedging_terms)
            || surrounding.is_some_and(|s| contains_hedging(s, &self.hedging_terms));
        FragmentCues { uncertain, hedged }
    }

    /// Return `span` re-tiered; precision follows the new tier.
    pub fn classify(&self, span: &Span, cues: FragmentCues) -> Span {
        let tier = classify_confidence(span.confidence, span.start().year, cues, self.legendary_epoch);
        span.with_confidence(tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bc(y: u64) -> Year {
        Year::bc(y).unwrap()
    }

    #[test]
    fn test_precision_is_monotone_in_table_order() {
        let values: Vec<f64> = PRECISION_TABLE.iter().map(|(_, p)| *p).collect();
        assert!(values.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(precision_for(Confidence::Explicit), 1.0);
    }

    #[test]
    fn test_legendary_overrides_explicit() {
        let tier = classify_confidence(
            Confidence::Explicit,
            bc(753),
            FragmentCues::default(),
            Some(bc(753)),
        );
        assert_eq!(tier, Confidence::Legendary);
    }

    #[test]
    fn test_after_epoch_keeps_base() {
        let tier = classify_confidence(
            Confidence::Explicit,
            bc(700),
            FragmentCues::default(),
            Some(bc(753)),
        );
        assert_eq!(tier, Confidence::Explicit);
    }

    #[test]
    fn test_cue_precedence() {
        let both = FragmentCues {
            uncertain: true,
            hedged: true,
        };
        let only_q = FragmentCues {
            uncertain: true,
            hedged: false,
        };
        assert_eq!(
            classify_confidence(Confidence::Approximate, bc(100), only_q, None),
            Confidence::Uncertain
        );
        assert_eq!(
            classify_confidence(Confidence::Explicit, bc(100), both, None),
            Confidence::Contentious
        );
        // Legendary still wins over the cues
        assert_eq!(
            classify_confidence(Confidence::Explicit, bc(1200), both, Some(bc(776))),
            Confidence::Legendary
        );
    }

    #[test]
    fn test_fallback_ignores_cues() {
        let cues = FragmentCues {
            uncertain: true,
            hedged: true,
        };
        assert_eq!(
            classify_confidence(Confidence::Fallback, bc(100), cues, None),
            Confidence::Fallback
        );
    }

    #[test]
    fn test_contains_hedging_whole_words() {
        let terms = DEFAULT_HEDGING_TERMS;
        assert!(contains_hedging("Date disputed by scholars", terms));
        assert!(contains_hedging("Founded, according to legend, by Romulus", terms));
        assert!(!contains_hedging("Undisputed victory", terms));
        assert!(!contains_hedging("A plain statement", terms));
    }

    #[test]
    fn test_classifier_cues() {
        let c = Classifier::default();
        let cues = c.cues("?44 BC", Some("Caesar possibly assassinated"));
        assert!(cues.uncertain);
        assert!(cues.hedged);
        assert_eq!(c.cues("44 BC", None), FragmentCues::default());
    }
}
