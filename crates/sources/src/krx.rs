//! KRX data portal client.
//!
//! Two endpoints of the portal's JSON service are combined into a
//! [`MarketSnapshot`]: the per-market daily price table (close, market cap,
//! listed shares, name) and the all-market valuation table (PER, PBR).

use std::{collections::BTreeMap, time::Duration};

use chrono::{Datelike, TimeDelta, Weekday};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};
use valuescore_primitives::{Date, Market, MarketSnapshot, Quote, Ticker};
use valuescore_traits::{MarketDataSource, SourceError};

use crate::http;

const PRICE_TABLE: &str = "dbms/MDC/STAT/standard/MDCSTAT01501";
const VALUATION_TABLE: &str = "dbms/MDC/STAT/standard/MDCSTAT03501";

/// Market caps are published in KRW and kept in hundred-million KRW (억원).
const MARKET_CAP_UNIT: f64 = 1e8;

/// Configuration for the KRX client.
#[derive(Debug, Clone)]
pub struct KrxConfig {
    /// JSON service endpoint.
    pub endpoint: String,
    /// Referer header the portal expects.
    pub referer: String,
    /// User agent header.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Calendar days to walk back looking for a trading day.
    pub max_lookback_days: u32,
}

impl Default for KrxConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://data.krx.co.kr/comm/bldAttendant/getJsonData.cmd".to_string(),
            referer: "http://data.krx.co.kr/contents/MDC/MDI/mdiLoader".to_string(),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)".to_string(),
            timeout: Duration::from_secs(30),
            max_lookback_days: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PriceTable {
    #[serde(rename = "OutBlock_1", default)]
    rows: Vec<PriceRow>,
}

#[derive(Debug, Deserialize)]
struct PriceRow {
    #[serde(rename = "ISU_SRT_CD")]
    ticker: String,
    #[serde(rename = "ISU_ABBRV")]
    name: String,
    #[serde(rename = "TDD_CLSPRC")]
    close: String,
    #[serde(rename = "MKTCAP")]
    market_cap: String,
    #[serde(rename = "LIST_SHRS")]
    shares: String,
}

#[derive(Debug, Deserialize)]
struct ValuationTable {
    #[serde(rename = "output", alias = "OutBlock_1", default)]
    rows: Vec<ValuationRow>,
}

#[derive(Debug, Deserialize)]
struct ValuationRow {
    #[serde(rename = "ISU_SRT_CD")]
    ticker: String,
    #[serde(rename = "PER", default)]
    per: String,
    #[serde(rename = "PBR", default)]
    pbr: String,
}

/// Parse a portal number such as `"1,234.5"`.
///
/// Returns `None` for blanks and the portal's `"-"` placeholder.
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse().ok()
}

const fn market_id(market: Market) -> &'static str {
    match market {
        Market::Kospi => "STK",
        Market::Kosdaq => "KSQ",
    }
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, SourceError> {
    serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))
}

/// Combine price tables and the valuation table of one day.
///
/// Rows without a close, market cap or share count are dropped; a missing
/// PER or PBR becomes 0.
fn build_snapshot(
    date: Date,
    prices: Vec<(Market, PriceTable)>,
    valuations: ValuationTable,
) -> MarketSnapshot {
    let valuations: BTreeMap<String, ValuationRow> =
        valuations.rows.into_iter().map(|row| (row.ticker.clone(), row)).collect();

    let mut snapshot = MarketSnapshot::new(date);
    for (market, table) in prices {
        for row in table.rows {
            let (Some(close), Some(market_cap), Some(shares)) =
                (parse_number(&row.close), parse_number(&row.market_cap), parse_number(&row.shares))
            else {
                continue;
            };
            if close <= 0.0 {
                continue;
            }
            let (per, pbr) = valuations.get(&row.ticker).map_or((0.0, 0.0), |v| {
                (parse_number(&v.per).unwrap_or(0.0), parse_number(&v.pbr).unwrap_or(0.0))
            });
            let quote = Quote {
                name: row.name,
                market,
                close,
                market_cap: market_cap / MARKET_CAP_UNIT,
                shares_outstanding: shares,
                per,
                pbr,
            };
            snapshot.insert(Ticker::new(row.ticker), quote);
        }
    }
    snapshot
}

/// Client for the KRX data portal.
#[derive(Debug, Clone)]
pub struct KrxClient {
    client: Client,
    config: KrxConfig,
}

impl KrxClient {
    /// Create a client with default configuration.
    ///
    /// # Errors
    /// Fails if the HTTP client cannot be built.
    pub fn new() -> Result<Self, SourceError> {
        Self::with_config(KrxConfig::default())
    }

    /// Create a client with custom configuration.
    ///
    /// # Errors
    /// Fails if the HTTP client cannot be built.
    pub fn with_config(config: KrxConfig) -> Result<Self, SourceError> {
        let client = http::client(config.timeout, &config.user_agent)?;
        Ok(Self { client, config })
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &KrxConfig {
        &self.config
    }

    async fn query<T: DeserializeOwned>(&self, form: &[(&str, &str)]) -> Result<T, SourceError> {
        let request = self
            .client
            .post(&self.config.endpoint)
            .header(reqwest::header::REFERER, &self.config.referer)
            .form(form);
        parse_json(&http::fetch_text(request).await?)
    }

    /// Quotes of one calendar day; empty if it was not a trading day.
    async fn snapshot_on(&self, date: Date) -> Result<MarketSnapshot, SourceError> {
        let day = date.format("%Y%m%d").to_string();

        let mut prices = Vec::with_capacity(2);
        for market in [Market::Kospi, Market::Kosdaq] {
            let table: PriceTable = self
                .query(&[
                    ("bld", PRICE_TABLE),
                    ("mktId", market_id(market)),
                    ("trdDd", day.as_str()),
                    ("share", "1"),
                    ("money", "1"),
                    ("csvxls_isNo", "false"),
                ])
                .await?;
            prices.push((market, table));
        }
        if prices.iter().all(|(_, table)| table.rows.is_empty()) {
            return Ok(MarketSnapshot::new(date));
        }

        let valuations: ValuationTable = self
            .query(&[
                ("bld", VALUATION_TABLE),
                ("searchType", "1"),
                ("mktId", "ALL"),
                ("trdDd", day.as_str()),
                ("csvxls_isNo", "false"),
            ])
            .await?;
        if valuations.rows.is_empty() {
            warn!(date = %date, "no valuation ratios published; PER and PBR default to 0");
        }

        Ok(build_snapshot(date, prices, valuations))
    }
}

impl MarketDataSource for KrxClient {
    async fn snapshot(&self, date: Date) -> Result<MarketSnapshot, SourceError> {
        for back in 0..=self.config.max_lookback_days {
            let day = date - TimeDelta::days(i64::from(back));
            if matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                continue;
            }
            let snapshot = self.snapshot_on(day).await?;
            if !snapshot.is_empty() {
                debug!(date = %day, quotes = snapshot.len(), "fetched market snapshot");
                return Ok(snapshot);
            }
            debug!(date = %day, "no trading on day, walking back");
        }
        Err(SourceError::NoData(format!(
            "no trading day within {} days of {date}",
            self.config.max_lookback_days
        )))
    }
}
