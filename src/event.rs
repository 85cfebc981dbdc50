//! Events: a dated span plus the text it was found with.
//!
//! Also holds the bullet-text helpers that separate a bullet's date
//! prefix from its body and derive a title from the body.

use span_types::EventArtifact;

use crate::event_key::compute_event_key;
use crate::span::Span;

/// Longest title kept before truncating at a character boundary.
const MAX_TITLE_CHARS: usize = 120;

/// Separators between a bullet's date prefix and its body, in preference order.
const BULLET_SEPARATORS: [&str; 4] = [" – ", " — ", ": ", " - "];

// ── Event ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub title: String,
    pub description: Option<String>,
    pub span: Span,
    pub category: String,
    pub url: String,
    /// How the span was found: family, match type, inheritance source
    pub span_match_notes: String,
    pub event_key: String,
}

impl Event {
    pub fn new(
        title: &str,
        description: Option<&str>,
        span: Span,
        category: &str,
        url: &str,
        span_match_notes: String,
    ) -> Self {
        let title = title.trim().to_string();
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        let event_key = compute_event_key(
            &title,
            span.signed_start(),
            span.signed_end(),
            description.as_deref(),
        );
        Self {
            title,
            description,
            span,
            category: category.to_string(),
            url: url.to_string(),
            span_match_notes,
            event_key,
        }
    }

    /// Flatten into the storage-boundary record.
    pub fn to_artifact(&self) -> EventArtifact {
        let s = &self.span;
        EventArtifact {
            title: self.title.clone(),
            description: self.description.clone(),
            start_year: s.start_year,
            start_month: s.start_month,
            start_day: s.start_day,
            end_year: s.end_year,
            end_month: s.end_month,
            end_day: s.end_day,
            is_bc_start: s.start_is_bc,
            is_bc_end: s.end_is_bc,
            weight: s.weight,
            precision: s.precision,
            category: self.category.clone(),
            url: self.url.clone(),
            span_match_notes: self.span_match_notes.clone(),
            event_key: self.event_key.clone(),
        }
    }
}

// ── Bullet text ──────────────────────────────────────────────────────

/// Split a bullet into `(date_part, body)`.
///
/// A leading parenthetical is the date part ("(c. 500 BC) Temple built").
/// Otherwise the earliest separator wins. Without either, the whole bullet
/// is both the candidate date and the body.
pub fn split_bullet(text: &str) -> (&str, &str) {
    let text = text.trim();
    if let Some(rest) = text.strip_prefix('(') {
        if let Some(close) = rest.find(')') {
            let body = rest[close + 1..].trim_start_matches([' ', ',', ':', '–', '—', '-']);
            return (&rest[..close], body.trim());
        }
    }
    let earliest = BULLET_SEPARATORS
        .iter()
        .filter_map(|sep| text.find(sep).map(|at| (at, sep.len())))
        .min_by_key(|(at, _)| *at);
    match earliest {
        Some((at, len)) => (text[..at].trim(), text[at + len..].trim()),
        None => (text, text),
    }
}

/// First sentence of `body`, capped at [`MAX_TITLE_CHARS`].
pub fn derive_title(body: &str) -> String {
    let body = body.trim();
    let sentence = match body.find(". ") {
        Some(end) => &body[..end],
        None => body.strip_suffix('.').unwrap_or(body),
    };
    match sentence.char_indices().nth(MAX_TITLE_CHARS) {
        Some((cut, _)) => format!("{}…", sentence[..cut].trim_end()),
        None => sentence.to_string(),
    }
}

/// The body as description when it says more than the title.
pub fn derive_description<'a>(body: &'a str, title: &str) -> Option<&'a str> {
    let body = body.trim();
    let bare = body.strip_suffix('.').unwrap_or(body);
    (!body.is_empty() && bare != title).then_some(body)
}
