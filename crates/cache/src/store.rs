//! JSON persistence of the statement cache.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Serialize, de::DeserializeOwned};
use valuescore_primitives::{FinancialRecord, StatementSnapshot, Ticker};

use crate::CacheError;

/// File holding the quarterly snapshots.
pub const QUARTERLY_FILE: &str = "quarter_df.json";

/// File holding the annual snapshots.
pub const ANNUAL_FILE: &str = "annual_df.json";

/// Statement snapshots keyed by ticker.
///
/// Persisted as two JSON documents, one per frequency, each shaped
/// `ticker -> line item -> YYYY/MM -> value | null`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FinancialCache {
    records: BTreeMap<Ticker, FinancialRecord>,
}

impl FinancialCache {
    /// Create an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self { records: BTreeMap::new() }
    }

    /// Add or replace the record of a ticker.
    pub fn insert(&mut self, ticker: Ticker, record: FinancialRecord) {
        self.records.insert(ticker, record);
    }

    /// Record of a ticker.
    #[must_use]
    pub fn record(&self, ticker: &Ticker) -> Option<&FinancialRecord> {
        self.records.get(ticker)
    }

    /// Number of cached tickers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Cached tickers in order.
    pub fn tickers(&self) -> impl Iterator<Item = &Ticker> {
        self.records.keys()
    }

    /// Write `quarter_df.json` and `annual_df.json` into `dir`, creating it
    /// if needed.
    ///
    /// # Errors
    /// Fails on any file system or serialization error.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<(), CacheError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| CacheError::Io { path: dir.to_path_buf(), source })?;

        let quarterly: BTreeMap<&Ticker, &StatementSnapshot> =
            self.records.iter().map(|(t, r)| (t, &r.quarterly)).collect();
        let annual: BTreeMap<&Ticker, &StatementSnapshot> =
            self.records.iter().map(|(t, r)| (t, &r.annual)).collect();

        write_json(&dir.join(QUARTERLY_FILE), &quarterly)?;
        write_json(&dir.join(ANNUAL_FILE), &annual)
    }

    /// Read the cache saved by [`Self::save`] from `dir`.
    ///
    /// A ticker present in only one of the files gets an empty snapshot for
    /// the other frequency, so it fails scoring instead of loading.
    ///
    /// # Errors
    /// Fails if either file is missing or malformed.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        let dir = dir.as_ref();
        let quarterly: BTreeMap<Ticker, StatementSnapshot> = read_json(&dir.join(QUARTERLY_FILE))?;
        let annual: BTreeMap<Ticker, StatementSnapshot> = read_json(&dir.join(ANNUAL_FILE))?;

        let mut cache = Self::new();
        for (ticker, snapshot) in quarterly {
            cache.records.entry(ticker).or_default().quarterly = snapshot;
        }
        for (ticker, snapshot) in annual {
            cache.records.entry(ticker).or_default().annual = snapshot;
        }
        Ok(cache)
    }
}

impl FromIterator<(Ticker, FinancialRecord)> for FinancialCache {
    fn from_iter<I: IntoIterator<Item = (Ticker, FinancialRecord)>>(iter: I) -> Self {
        Self { records: iter.into_iter().collect() }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CacheError> {
    let io_err = |source| CacheError::Io { path: path.to_path_buf(), source };
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    serde_json::to_writer(&mut writer, value)
        .map_err(|source| CacheError::Json { path: path.to_path_buf(), source })?;
    writer.flush().map_err(io_err)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CacheError> {
    let file = File::open(path).map_err(|source| CacheError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|source| CacheError::Json { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use valuescore_primitives::LineItem;

    use super::*;
    use crate::{extract::tests::statement_page, extract_snapshots};

    fn cache() -> FinancialCache {
        let record = extract_snapshots(&statement_page()).unwrap();
        [(Ticker::new("005930"), record.clone()), (Ticker::new("000660"), record)].into_iter().collect()
    }

    #[test]
    fn save_then_load_restores_records() {
        let temp = tempfile::tempdir().unwrap();
        let cache = cache();
        cache.save(temp.path()).unwrap();

        let loaded = FinancialCache::load(temp.path()).unwrap();
        assert_eq!(loaded, cache);
        assert_eq!(loaded.tickers().map(Ticker::as_str).collect::<Vec<_>>(), vec!["000660", "005930"]);
    }

    #[test]
    fn files_are_keyed_by_ticker_item_and_period() {
        let temp = tempfile::tempdir().unwrap();
        cache().save(temp.path()).unwrap();

        let text = fs::read_to_string(temp.path().join(ANNUAL_FILE)).unwrap();
        // korean labels are written verbatim
        assert!(text.contains("\"영업이익\""));

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["005930"]["부채"]["2024/12"], serde_json::json!(150.0));
    }

    #[test]
    fn null_values_survive() {
        let json = r#"{"005930": {"자본": {"2023/12": null, "2024/12": 10.0}}}"#;
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join(QUARTERLY_FILE), json).unwrap();
        fs::write(temp.path().join(ANNUAL_FILE), "{}").unwrap();

        let cache = FinancialCache::load(temp.path()).unwrap();
        let record = cache.record(&Ticker::new("005930")).unwrap();
        assert_eq!(record.quarterly.values(LineItem::Equity).unwrap(), &[None, Some(10.0)]);
        assert!(record.annual.periods().is_empty());
    }

    #[test]
    fn missing_files_are_reported() {
        let temp = tempfile::tempdir().unwrap();
        let err = FinancialCache::load(temp.path()).unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }));
    }

    #[test]
    fn malformed_period_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join(QUARTERLY_FILE), r#"{"005930": {"자본": {"2024-12": 1.0}}}"#).unwrap();
        fs::write(temp.path().join(ANNUAL_FILE), "{}").unwrap();
        assert!(matches!(FinancialCache::load(temp.path()), Err(CacheError::Json { .. })));
    }
}
