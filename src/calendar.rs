//! BC/AD calendar arithmetic.
//!
//! Years are stored as an unsigned magnitude plus an era flag. There is no
//! year 0: 1 BC is immediately followed by AD 1. For ordering, BC years map
//! to negative numbers (`to_signed`); for distance arithmetic they map onto
//! the astronomical line where 1 BC = 0, 2 BC = -1, and so on.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpanError};

/// Largest year magnitude accepted (ten billion years covers deep time).
pub const MAX_YEAR_MAGNITUDE: u64 = 10_000_000_000;

/// Map a year to a signed value for ordering comparisons: BC is negative.
pub fn to_signed(year: u64, is_bc: bool) -> i64 {
    let y = year.min(MAX_YEAR_MAGNITUDE) as i64;
    if is_bc { -y } else { y }
}

// ── Year ─────────────────────────────────────────────────────────────

/// A calendar year that is never 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Year {
    magnitude: u64,
    is_bc: bool,
}

impl Year {
    pub fn new(magnitude: u64, is_bc: bool) -> Result<Self> {
        if magnitude == 0 {
            return Err(SpanError::InvalidDate("year 0 does not exist".into()));
        }
        if magnitude > MAX_YEAR_MAGNITUDE {
            return Err(SpanError::InvalidDate(format!(
                "year {magnitude} exceeds supported range"
            )));
        }
        Ok(Self { magnitude, is_bc })
    }

    pub fn ad(magnitude: u64) -> Result<Self> {
        Self::new(magnitude, false)
    }

    pub fn bc(magnitude: u64) -> Result<Self> {
        Self::new(magnitude, true)
    }

    pub fn magnitude(&self) -> u64 {
        self.magnitude
    }

    pub fn is_bc(&self) -> bool {
        self.is_bc
    }

    pub fn to_signed(&self) -> i64 {
        to_signed(self.magnitude, self.is_bc)
    }

    /// Position on the astronomical year line (1 BC = 0).
    pub fn astronomical(&self) -> i64 {
        if self.is_bc {
            1 - self.magnitude as i64
        } else {
            self.magnitude as i64
        }
    }

    /// Inverse of [`Year::astronomical`]. Always yields a valid year.
    pub fn from_astronomical(value: i64) -> Self {
        if value >= 1 {
            Self {
                magnitude: (value as u64).min(MAX_YEAR_MAGNITUDE),
                is_bc: false,
            }
        } else {
            Self {
                magnitude: ((1 - value) as u64).min(MAX_YEAR_MAGNITUDE),
                is_bc: true,
            }
        }
    }

    /// Move `years` forward (positive) or backward in time, skipping year 0.
    pub fn shifted(&self, years: i64) -> Self {
        Self::from_astronomical(self.astronomical().saturating_add(years))
    }
}

impl Ord for Year {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_signed().cmp(&other.to_signed())
    }
}

impl PartialOrd for Year {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Year {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_bc {
            write!(f, "{} BC", self.magnitude)
        } else {
            write!(f, "AD {}", self.magnitude)
        }
    }
}

// ── Month / day ──────────────────────────────────────────────────────

const MONTH_LENGTHS: [u8; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Longest day count for a month. February allows 29 because leap years
/// are not tracked for historical (often proleptic) dates.
pub fn days_in_month(month: u8) -> Option<u8> {
    if (1..=12).contains(&month) {
        Some(MONTH_LENGTHS[month as usize - 1])
    } else {
        None
    }
}

/// Month ∈ [1,12]; day ∈ [1, length of month]; a day needs a month.
pub fn validate_month_day(month: Option<u8>, day: Option<u8>) -> Result<()> {
    match (month, day) {
        (None, None) => Ok(()),
        (None, Some(d)) => Err(SpanError::InvalidDate(format!("day {d} without a month"))),
        (Some(m), d) => {
            let max = days_in_month(m)
                .ok_or_else(|| SpanError::InvalidDate(format!("month {m} out of range")))?;
            match d {
                Some(d) if d == 0 || d > max => Err(SpanError::InvalidDate(format!(
                    "day {d} out of range for month {m}"
                ))),
                _ => Ok(()),
            }
        }
    }
}

// 365-day year with the fixed month table above (February counted as 28).
fn day_of_year(month: u8, day: u8) -> i64 {
    const CUMULATIVE: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
    CUMULATIVE[(month.clamp(1, 12) - 1) as usize] + day.min(31) as i64
}

// ── Historical date ──────────────────────────────────────────────────

/// A year with optional month and day, validated on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoricalDate {
    pub year: Year,
    pub month: Option<u8>,
    pub day: Option<u8>,
}

impl HistoricalDate {
    pub fn new(year: Year, month: Option<u8>, day: Option<u8>) -> Result<Self> {
        validate_month_day(month, day)?;
        Ok(Self { year, month, day })
    }

    pub fn year_only(year: Year) -> Self {
        Self {
            year,
            month: None,
            day: None,
        }
    }

    /// Earliest moment this date can denote, as a sortable key.
    pub fn earliest_key(&self) -> (i64, u8, u8) {
        (
            self.year.to_signed(),
            self.month.unwrap_or(1),
            self.day.unwrap_or(1),
        )
    }

    /// Latest moment this date can denote, as a sortable key.
    pub fn latest_key(&self) -> (i64, u8, u8) {
        let month = self.month.unwrap_or(12);
        let day = self
            .day
            .unwrap_or_else(|| days_in_month(month).unwrap_or(31));
        (self.year.to_signed(), month, day)
    }

    /// Day number of the earliest moment on a 365-day astronomical line.
    pub fn first_day_ordinal(&self) -> i64 {
        self.year.astronomical().saturating_mul(365)
            + day_of_year(self.month.unwrap_or(1), self.day.unwrap_or(1))
    }

    /// Day number of the latest moment on a 365-day astronomical line.
    pub fn last_day_ordinal(&self) -> i64 {
        let month = self.month.unwrap_or(12);
        let day = self.day.unwrap_or(match month {
            2 => 28,
            m => days_in_month(m).unwrap_or(31),
        });
        self.year.astronomical().saturating_mul(365) + day_of_year(month, day)
    }
}

/// Fail with `InvalidDate` unless `start` is not chronologically after `end`.
pub fn ensure_ordered(start: &HistoricalDate, end: &HistoricalDate) -> Result<()> {
    if start.earliest_key() > end.latest_key() {
        return Err(SpanError::InvalidDate(format!(
            "start {} falls after end {}",
            start.year, end.year
        )));
    }
    Ok(())
}

// ── Centuries ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CenturyModifier {
    Early,
    Mid,
    Late,
}

/// Boundaries of the early/mid/late thirds, as year offsets from the
/// chronological first year of a century (0..=99).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CenturyThirds {
    /// Last offset belonging to "early"
    pub early_end: u64,
    /// Last offset belonging to "mid"
    pub mid_end: u64,
}

impl Default for CenturyThirds {
    fn default() -> Self {
        Self {
            early_end: 33,
            mid_end: 66,
        }
    }
}

impl CenturyThirds {
    pub fn validate(&self) -> Result<()> {
        if self.early_end < self.mid_end && self.mid_end < 99 {
            Ok(())
        } else {
            Err(SpanError::MalformedContext(format!(
                "century thirds must satisfy early_end < mid_end < 99, got {} / {}",
                self.early_end, self.mid_end
            )))
        }
    }

    fn offsets(&self, modifier: Option<CenturyModifier>) -> (u64, u64) {
        match modifier {
            None => (0, 99),
            Some(CenturyModifier::Early) => (0, self.early_end),
            Some(CenturyModifier::Mid) => (self.early_end + 1, self.mid_end),
            Some(CenturyModifier::Late) => (self.mid_end + 1, 99),
        }
    }
}

/// Chronological (first, last) years of the `n`th century.
///
/// AD century 1 is 1–100. BC century `n` runs from `n*100` down to
/// `(n-1)*100 + 1`, so the returned first year has the larger magnitude.
pub fn century_range(
    n: u64,
    is_bc: bool,
    modifier: Option<CenturyModifier>,
    thirds: &CenturyThirds,
) -> Result<(Year, Year)> {
    if n == 0 {
        return Err(SpanError::InvalidDate("century 0 does not exist".into()));
    }
    thirds.validate()?;
    let (lo, hi) = thirds.offsets(modifier);
    if is_bc {
        let first = n * 100;
        Ok((Year::bc(first - lo)?, Year::bc(first - hi)?))
    } else {
        let first = (n - 1) * 100 + 1;
        Ok((Year::ad(first + lo)?, Year::ad(first + hi)?))
    }
}

/// Chronological (first, last) years of the decade named by `start`
/// ("1990s" → 1990–1999, "440s BC" → 449–440 BC, "0s" → AD 1–9).
pub fn decade_range(start: u64, is_bc: bool) -> Result<(Year, Year)> {
    if start % 10 != 0 {
        return Err(SpanError::InvalidDate(format!(
            "{start} does not name a decade"
        )));
    }
    if is_bc {
        Ok((Year::bc(start + 9)?, Year::bc(start.max(1))?))
    } else {
        Ok((Year::ad(start.max(1))?, Year::ad(start + 9)?))
    }
}
