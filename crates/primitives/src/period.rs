//! Fiscal period labels and the typed period index.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ExtractionError;

/// Fiscal period label in `YYYY/MM` form.
///
/// Ordering is chronological, so a sorted collection of periods runs from the
/// oldest to the most recent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Create a period, validating the month.
    ///
    /// # Errors
    /// Returns [`ExtractionError::InvalidPeriod`] if `month` is not in `1..=12`.
    pub fn new(year: i32, month: u32) -> Result<Self, ExtractionError> {
        if !(1..=12).contains(&month) {
            return Err(ExtractionError::InvalidPeriod(format!("{year:04}/{month:02}")));
        }
        Ok(Self { year, month })
    }

    /// Calendar year of the period end.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month of the period end.
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }
}

impl FromStr for Period {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ExtractionError::InvalidPeriod(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'/' {
            return Err(invalid());
        }
        let digits = |b: &[u8]| b.iter().all(u8::is_ascii_digit);
        if !digits(&bytes[..4]) || !digits(&bytes[5..]) {
            return Err(invalid());
        }
        let year = s[..4].parse().map_err(|_| invalid())?;
        let month = s[5..].parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}", self.year, self.month)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Chronologically sorted, duplicate-free list of periods.
///
/// Built once when a statement table is parsed; every row of a snapshot is
/// aligned to it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PeriodIndex(Vec<Period>);

impl PeriodIndex {
    /// Build an index from periods in any order.
    ///
    /// # Errors
    /// Returns [`ExtractionError::DuplicatePeriod`] if a period appears twice.
    pub fn new(mut periods: Vec<Period>) -> Result<Self, ExtractionError> {
        periods.sort_unstable();
        if let Some(pair) = periods.windows(2).find(|w| w[0] == w[1]) {
            return Err(ExtractionError::DuplicatePeriod(pair[0]));
        }
        Ok(Self(periods))
    }

    /// Periods, oldest first.
    #[must_use]
    pub fn periods(&self) -> &[Period] {
        &self.0
    }

    /// Number of periods.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Most recent period.
    #[must_use]
    pub fn latest(&self) -> Option<Period> {
        self.0.last().copied()
    }

    /// Position of a period in the index.
    #[must_use]
    pub fn position(&self, period: Period) -> Option<usize> {
        self.0.binary_search(&period).ok()
    }

    /// Union of two indices.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut periods: Vec<Period> = self.0.iter().chain(&other.0).copied().collect();
        periods.sort_unstable();
        periods.dedup();
        Self(periods)
    }
}

impl fmt::Display for PeriodIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, period) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{period}")?;
        }
        Ok(())
    }
}
