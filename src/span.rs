use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use span_types::Confidence;

use crate::calendar::{self, CenturyThirds, HistoricalDate, Year};
use crate::confidence::precision_for;
use crate::error::{Result, SpanError};

/// Anchor year for "N years ago" when the caller does not supply one
/// (the radiocarbon "Before Present" convention).
pub const DEFAULT_REFERENCE_YEAR: u64 = 1950;

// ── Source family ────────────────────────────────────────────────────

/// Where a fragment came from; selects the parser list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFamily {
    Bullet,
    Table,
    Heading,
}

impl SourceFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bullet => "bullet",
            Self::Table => "table",
            Self::Heading => "heading",
        }
    }
}

impl FromStr for SourceFamily {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bullet" => Ok(Self::Bullet),
            "table" => Ok(Self::Table),
            "heading" => Ok(Self::Heading),
            other => Err(format!("unknown source family `{other}`")),
        }
    }
}

// ── Parse context ────────────────────────────────────────────────────

/// Per-call context record accompanying a text fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseContext {
    /// Year that "N years ago" counts back from
    pub reference_year: u64,
    /// Era for bare numbers: `Some(true)` = BC, `Some(false)` = AD, `None` = AD
    pub assumed_era: Option<bool>,
    pub source_family: SourceFamily,
    /// Enclosing year (section or row) used by month/season-only fragments
    pub anchor_year: Option<Year>,
    pub century_thirds: CenturyThirds,
}

impl ParseContext {
    pub fn new(source_family: SourceFamily) -> Self {
        Self {
            reference_year: DEFAULT_REFERENCE_YEAR,
            assumed_era: None,
            source_family,
            anchor_year: None,
            century_thirds: CenturyThirds::default(),
        }
    }

    pub fn with_reference_year(mut self, year: u64) -> Self {
        self.reference_year = year;
        self
    }

    pub fn with_assumed_era(mut self, is_bc: Option<bool>) -> Self {
        self.assumed_era = is_bc;
        self
    }

    pub fn with_anchor_year(mut self, year: Option<Year>) -> Self {
        self.anchor_year = year;
        self
    }

    pub fn with_century_thirds(mut self, thirds: CenturyThirds) -> Self {
        self.century_thirds = thirds;
        self
    }

    /// Era for a number that carried no marker of its own.
    pub fn default_is_bc(&self) -> bool {
        self.assumed_era.unwrap_or(false)
    }

    pub fn validate(&self) -> Result<()> {
        if self.reference_year == 0 {
            return Err(SpanError::MalformedContext(
                "reference_year must be at least 1".into(),
            ));
        }
        self.century_thirds.validate()
    }
}

// ── Match type ───────────────────────────────────────────────────────

/// Which strategy produced a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Between,
    YearRange,
    Century,
    Decade,
    ExplicitYear,
    YearsAgo,
    MonthOnly,
    SeasonOnly,
    Circa,
    TableCells,
    TableInherited,
    Fallback,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Between => "between",
            Self::YearRange => "year_range",
            Self::Century => "century",
            Self::Decade => "decade",
            Self::ExplicitYear => "explicit_year",
            Self::YearsAgo => "years_ago",
            Self::MonthOnly => "month_only",
            Self::SeasonOnly => "season_only",
            Self::Circa => "circa",
            Self::TableCells => "table_cells",
            Self::TableInherited => "table_inherited",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Span ─────────────────────────────────────────────────────────────

/// A normalized start/end date pair with reliability metadata.
///
/// Values are built once through [`Span::new`], which enforces
/// chronological order; refinements produce new values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start_year: u64,
    pub start_is_bc: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_month: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_day: Option<u8>,
    pub end_year: u64,
    pub end_is_bc: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_month: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_day: Option<u8>,
    pub precision: f64,
    pub confidence: Confidence,
    pub weight: u64,
    pub match_type: MatchType,
}

impl Span {
    pub fn new(
        start: HistoricalDate,
        end: HistoricalDate,
        confidence: Confidence,
        match_type: MatchType,
    ) -> Result<Self> {
        calendar::ensure_ordered(&start, &end)?;
        Ok(Self {
            start_year: start.year.magnitude(),
            start_is_bc: start.year.is_bc(),
            start_month: start.month,
            start_day: start.day,
            end_year: end.year.magnitude(),
            end_is_bc: end.year.is_bc(),
            end_month: end.month,
            end_day: end.day,
            precision: precision_for(confidence),
            confidence,
            weight: weight_between(&start, &end),
            match_type,
        })
    }

    /// A span covering a single date.
    pub fn point(date: HistoricalDate, confidence: Confidence, match_type: MatchType) -> Result<Self> {
        Self::new(date, date, confidence, match_type)
    }

    /// A span covering whole years from `first` to `last`.
    pub fn years(first: Year, last: Year, confidence: Confidence, match_type: MatchType) -> Result<Self> {
        Self::new(
            HistoricalDate::year_only(first),
            HistoricalDate::year_only(last),
            confidence,
            match_type,
        )
    }

    pub fn start(&self) -> HistoricalDate {
        HistoricalDate {
            year: Year::from_astronomical(calendar_astronomical(self.start_year, self.start_is_bc)),
            month: self.start_month,
            day: self.start_day,
        }
    }

    pub fn end(&self) -> HistoricalDate {
        HistoricalDate {
            year: Year::from_astronomical(calendar_astronomical(self.end_year, self.end_is_bc)),
            month: self.end_month,
            day: self.end_day,
        }
    }

    pub fn signed_start(&self) -> i64 {
        calendar::to_signed(self.start_year, self.start_is_bc)
    }

    pub fn signed_end(&self) -> i64 {
        calendar::to_signed(self.end_year, self.end_is_bc)
    }

    /// Same dates under a different tier; precision follows the tier.
    pub fn with_confidence(&self, confidence: Confidence) -> Self {
        Self {
            confidence,
            precision: precision_for(confidence),
            ..self.clone()
        }
    }

    pub fn with_match_type(&self, match_type: MatchType) -> Self {
        Self {
            match_type,
            ..self.clone()
        }
    }
}

fn calendar_astronomical(magnitude: u64, is_bc: bool) -> i64 {
    let m = magnitude.clamp(1, calendar::MAX_YEAR_MAGNITUDE) as i64;
    if is_bc { 1 - m } else { m }
}

// ── Weight ───────────────────────────────────────────────────────────

fn weight_between(start: &HistoricalDate, end: &HistoricalDate) -> u64 {
    let days = end
        .last_day_ordinal()
        .saturating_sub(start.first_day_ordinal())
        .saturating_add(1);
    days.max(1) as u64
}

/// Inclusive duration of a span in days, used to rank overlapping events.
pub fn compute_weight(span: &Span) -> u64 {
    weight_between(&span.start(), &span.end())
}
