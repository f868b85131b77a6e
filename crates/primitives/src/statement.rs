//! Financial statement type definitions.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{ExtractionError, Period, PeriodIndex};

/// Statement line items consumed by the scoring rubrics.
///
/// Serialized under the statement provider's own row labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LineItem {
    /// Revenue (매출액).
    #[serde(rename = "매출액")]
    Revenue,
    /// Operating profit (영업이익).
    #[serde(rename = "영업이익")]
    OperatingProfit,
    /// Net profit (당기순이익).
    #[serde(rename = "당기순이익")]
    NetProfit,
    /// Total assets (자산).
    #[serde(rename = "자산")]
    Assets,
    /// Total liabilities (부채).
    #[serde(rename = "부채")]
    Liabilities,
    /// Total equity (자본).
    #[serde(rename = "자본")]
    Equity,
    /// Current assets (유동자산).
    #[serde(rename = "유동자산")]
    CurrentAssets,
    /// Current liabilities (유동부채).
    #[serde(rename = "유동부채")]
    CurrentLiabilities,
    /// Cash flow from investing activities (투자활동으로인한현금흐름).
    #[serde(rename = "투자활동으로인한현금흐름")]
    InvestingCashFlow,
}

impl LineItem {
    /// Every line item.
    pub const ALL: [Self; 9] = [
        Self::Revenue,
        Self::OperatingProfit,
        Self::NetProfit,
        Self::Assets,
        Self::Liabilities,
        Self::Equity,
        Self::CurrentAssets,
        Self::CurrentLiabilities,
        Self::InvestingCashFlow,
    ];

    /// Row label used by the statement provider.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Revenue => "매출액",
            Self::OperatingProfit => "영업이익",
            Self::NetProfit => "당기순이익",
            Self::Assets => "자산",
            Self::Liabilities => "부채",
            Self::Equity => "자본",
            Self::CurrentAssets => "유동자산",
            Self::CurrentLiabilities => "유동부채",
            Self::InvestingCashFlow => "투자활동으로인한현금흐름",
        }
    }

    /// Look up a line item by provider row label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.label() == label)
    }
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A statement table as published by the provider, before period validation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatementTable {
    /// Header cells. The first one heads the row-label column.
    pub header: Vec<String>,
    /// Body rows.
    pub rows: Vec<StatementRow>,
}

impl StatementTable {
    /// Heading of the row-label column (e.g. `IFRS(연결)`).
    #[must_use]
    pub fn label_heading(&self) -> Option<&str> {
        self.header.first().map(String::as_str)
    }

    /// Header columns that carry a valid period label, as `(cell index, period)`.
    ///
    /// Cell indices address [`StatementRow::cells`], i.e. they skip the label column.
    #[must_use]
    pub fn period_columns(&self) -> Vec<(usize, Period)> {
        self.header
            .iter()
            .skip(1)
            .enumerate()
            .filter_map(|(i, h)| h.trim().parse::<Period>().ok().map(|p| (i, p)))
            .collect()
    }

    /// First row with the given label.
    #[must_use]
    pub fn row(&self, label: &str) -> Option<&StatementRow> {
        self.rows.iter().find(|r| r.label == label)
    }
}

/// A single labelled row of a [`StatementTable`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatementRow {
    /// Row label.
    pub label: String,
    /// Numeric cells aligned with the table header (label column excluded).
    pub cells: Vec<Option<f64>>,
}

/// Per-period statement figures for one ticker.
///
/// Every line item is aligned to the same [`PeriodIndex`]; absent figures are
/// `None`. Persisted as `line item -> period label -> value`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(into = "RawSnapshot", try_from = "RawSnapshot")]
pub struct StatementSnapshot {
    periods: PeriodIndex,
    items: BTreeMap<LineItem, Vec<Option<f64>>>,
}

impl StatementSnapshot {
    /// Create an empty snapshot over a period index.
    #[must_use]
    pub fn new(periods: PeriodIndex) -> Self {
        Self { periods, items: BTreeMap::new() }
    }

    /// Insert a row of values aligned to the period index.
    ///
    /// # Errors
    /// Returns [`ExtractionError::LengthMismatch`] if the row does not have one
    /// value per period.
    pub fn insert(&mut self, item: LineItem, values: Vec<Option<f64>>) -> Result<(), ExtractionError> {
        if values.len() != self.periods.len() {
            return Err(ExtractionError::LengthMismatch {
                item,
                expected: self.periods.len(),
                actual: values.len(),
            });
        }
        self.items.insert(item, values);
        Ok(())
    }

    /// Merge another snapshot into this one.
    ///
    /// The resulting index is the union of both indices; figures missing from
    /// one side become `None`. Rows of `other` replace rows of `self`.
    pub fn merge(&mut self, other: Self) {
        if self.periods == other.periods {
            self.items.extend(other.items);
            return;
        }
        let items = std::mem::take(&mut self.items);
        let mut merged = Self::new(self.periods.union(&other.periods));
        merged.absorb(&self.periods, items);
        merged.absorb(&other.periods, other.items);
        *self = merged;
    }

    fn absorb(&mut self, source: &PeriodIndex, items: BTreeMap<LineItem, Vec<Option<f64>>>) {
        for (item, values) in items {
            let mut aligned = vec![None; self.periods.len()];
            for (period, value) in source.periods().iter().zip(values) {
                if let Some(pos) = self.periods.position(*period) {
                    aligned[pos] = value;
                }
            }
            self.items.insert(item, aligned);
        }
    }

    /// Period index shared by every row.
    #[must_use]
    pub const fn periods(&self) -> &PeriodIndex {
        &self.periods
    }

    /// Line items present in the snapshot.
    pub fn items(&self) -> impl Iterator<Item = LineItem> + '_ {
        self.items.keys().copied()
    }

    /// Check whether a line item is present.
    #[must_use]
    pub fn contains(&self, item: LineItem) -> bool {
        self.items.contains_key(&item)
    }

    /// Row of a line item, oldest period first.
    ///
    /// # Errors
    /// Returns [`ExtractionError::MissingItem`] if the row is absent.
    pub fn values(&self, item: LineItem) -> Result<&[Option<f64>], ExtractionError> {
        self.items.get(&item).map(Vec::as_slice).ok_or(ExtractionError::MissingItem(item))
    }

    /// Value of a line item for one period.
    #[must_use]
    pub fn get(&self, item: LineItem, period: Period) -> Option<f64> {
        let pos = self.periods.position(period)?;
        self.items.get(&item).and_then(|v| v[pos])
    }

    /// Value of a line item in the most recent period.
    ///
    /// # Errors
    /// Fails if the row, the period or the value is missing.
    pub fn latest(&self, item: LineItem) -> Result<f64, ExtractionError> {
        Ok(self.recent(item, 1)?[0])
    }

    /// Values of the `n` most recent periods, oldest first.
    ///
    /// # Errors
    /// Fails if the row is missing, if fewer than `n` periods exist, or if
    /// any of the selected values is missing.
    pub fn recent(&self, item: LineItem, n: usize) -> Result<Vec<f64>, ExtractionError> {
        let values = self.values(item)?;
        if values.len() < n {
            return Err(ExtractionError::InsufficientPeriods { required: n, actual: values.len() });
        }
        let start = values.len() - n;
        values[start..]
            .iter()
            .zip(&self.periods.periods()[start..])
            .map(|(value, period)| value.ok_or(ExtractionError::MissingValue { item, period: *period }))
            .collect()
    }

    /// Sum of the `n` most recent values.
    ///
    /// # Errors
    /// Same conditions as [`Self::recent`].
    pub fn trailing_sum(&self, item: LineItem, n: usize) -> Result<f64, ExtractionError> {
        Ok(self.recent(item, n)?.iter().sum())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct RawSnapshot(BTreeMap<LineItem, BTreeMap<Period, Option<f64>>>);

impl From<StatementSnapshot> for RawSnapshot {
    fn from(snapshot: StatementSnapshot) -> Self {
        let periods = snapshot.periods;
        Self(
            snapshot
                .items
                .into_iter()
                .map(|(item, values)| (item, periods.periods().iter().copied().zip(values).collect()))
                .collect(),
        )
    }
}

impl TryFrom<RawSnapshot> for StatementSnapshot {
    type Error = ExtractionError;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        let mut snapshot = Self::default();
        for (item, series) in raw.0 {
            let mut part = Self::new(PeriodIndex::new(series.keys().copied().collect())?);
            part.insert(item, series.into_values().collect())?;
            snapshot.merge(part);
        }
        Ok(snapshot)
    }
}

/// Quarterly and annual statement snapshots of a single ticker.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FinancialRecord {
    /// Quarterly figures.
    pub quarterly: StatementSnapshot,
    /// Annual figures.
    pub annual: StatementSnapshot,
}
