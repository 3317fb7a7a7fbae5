use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Earliest year a résumé date may carry.
pub const MIN_YEAR: i32 = 1970;
/// Latest year a résumé date may carry.
pub const MAX_YEAR: i32 = 2035;

/// A calendar month. Ordering follows `year * 12 + month`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Returns `None` when the year is outside `[MIN_YEAR, MAX_YEAR]` or the month
    /// outside `[1, 12]`. Out-of-range values are never clamped.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) || !(1..=12).contains(&month) {
            return None;
        }
        Some(Self { year, month })
    }

    /// Month count since year zero, used for span arithmetic.
    pub fn ordinal(&self) -> i32 {
        self.year * 12 + self.month as i32
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("'{s}' is not in YYYY-MM form"))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("'{s}' has an invalid year"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("'{s}' has an invalid month"))?;
        YearMonth::new(year, month).ok_or_else(|| format!("'{s}' is out of range"))
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for YearMonth {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A resolved date range. When both bounds are present `end >= start`;
/// `is_current` marks an ongoing range whose end is unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<YearMonth>,
    pub end: Option<YearMonth>,
    pub is_current: bool,
}

impl DateRange {
    /// Rejects reversed ranges. An ongoing range never carries an end.
    pub fn new(start: Option<YearMonth>, end: Option<YearMonth>, is_current: bool) -> Option<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if e < s {
                return None;
            }
        }
        Some(Self {
            start,
            end: if is_current { None } else { end },
            is_current,
        })
    }

    pub fn key(&self) -> (Option<YearMonth>, Option<YearMonth>) {
        (self.start, self.end)
    }

    pub fn is_unresolved(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Closed month interval. An ongoing range is open to the right; a range with a
    /// single resolved bound covers that month only.
    pub fn span(&self) -> Option<(i32, i32)> {
        let lo = self.start.or(self.end)?.ordinal();
        let hi = match self.end {
            Some(end) => end.ordinal(),
            None if self.is_current => i32::MAX,
            None => lo,
        };
        Some((lo, hi))
    }

    /// Overlap test against a reserved (education) range. An ongoing reserved range
    /// is open to the right; one whose bound is simply missing only matches a
    /// candidate whose bounds are both unresolved.
    pub fn overlaps_reserved(&self, reserved: &DateRange) -> bool {
        let missing_bound =
            reserved.start.is_none() || (reserved.end.is_none() && !reserved.is_current);
        if missing_bound {
            return self.is_unresolved();
        }
        match (self.span(), reserved.span()) {
            (Some((s1, e1)), Some((s2, e2))) => s1 <= e2 && s2 <= e1,
            _ => false,
        }
    }

    /// Months elapsed between start and end; ongoing ranges end at `reference`.
    pub fn months_until(&self, reference: NaiveDate) -> Option<u32> {
        let (lo, hi) = self.bounded_span(reference)?;
        Some((hi - lo).max(0) as u32)
    }

    pub(crate) fn bounded_span(&self, reference: NaiveDate) -> Option<(i32, i32)> {
        let lo = self.start?.ordinal();
        let hi = match self.end {
            Some(end) => end.ordinal(),
            None if self.is_current => YearMonth::from_date(reference).ordinal(),
            None => lo,
        };
        Some((lo, hi.max(lo)))
    }
}
