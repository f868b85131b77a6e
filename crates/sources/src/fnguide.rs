//! FnGuide financial statement page client.

use std::time::Duration;

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use valuescore_primitives::{StatementRow, StatementTable, Ticker};
use valuescore_traits::{SourceError, StatementSource};

use crate::{http, parse_number};

/// Text of the expand button FnGuide appends to collapsible row labels.
const EXPAND_SUFFIX: &str = "계산에 참여한 계정 펼치기";

/// Configuration for the FnGuide client.
#[derive(Debug, Clone)]
pub struct FnGuideConfig {
    /// Statement page URL with a `{ticker}` placeholder.
    pub url_template: String,
    /// User agent header.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for FnGuideConfig {
    fn default() -> Self {
        Self {
            url_template: "http://comp.fnguide.com/SVO2/ASP/SVD_Finance.asp?pGB=1&gicode=A{ticker}\
                           &cID=&MenuYn=Y&ReportGB=&NewMenuID=103&stkGb=701"
                .to_string(),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Parse(format!("invalid selector {css:?}: {e:?}")))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Row label without the expand-button text or any whitespace.
fn row_label(cell: ElementRef<'_>) -> String {
    let text = cell_text(cell);
    let text = text.strip_suffix(EXPAND_SUFFIX).unwrap_or(&text);
    text.split_whitespace().collect()
}

/// Parse every `<table>` of a statement page, in document order.
///
/// The first header row supplies [`StatementTable::header`]; each body row
/// becomes a [`StatementRow`] whose label is its first cell and whose values
/// are the remaining cells, `None` where a cell is blank or not a number.
///
/// # Errors
/// Fails if the page contains no tables.
pub fn parse_statement_tables(html: &str) -> Result<Vec<StatementTable>, SourceError> {
    let document = Html::parse_document(html);
    let table_sel = selector("table")?;
    let header_sel = selector("thead tr")?;
    let body_sel = selector("tbody tr")?;
    let cell_sel = selector("th, td")?;

    let tables: Vec<StatementTable> = document
        .select(&table_sel)
        .map(|table| {
            let header = table
                .select(&header_sel)
                .next()
                .map(|tr| tr.select(&cell_sel).map(cell_text).collect())
                .unwrap_or_default();
            let rows = table
                .select(&body_sel)
                .filter_map(|tr| {
                    let mut cells = tr.select(&cell_sel);
                    let label = row_label(cells.next()?);
                    let cells = cells.map(|cell| parse_number(&cell_text(cell))).collect();
                    Some(StatementRow { label, cells })
                })
                .collect();
            StatementTable { header, rows }
        })
        .collect();

    if tables.is_empty() {
        return Err(SourceError::Parse("statement page has no tables".to_string()));
    }
    Ok(tables)
}

/// Client for FnGuide statement pages.
#[derive(Debug, Clone)]
pub struct FnGuideClient {
    client: Client,
    config: FnGuideConfig,
}

impl FnGuideClient {
    /// Create a client with default configuration.
    ///
    /// # Errors
    /// Fails if the HTTP client cannot be built.
    pub fn new() -> Result<Self, SourceError> {
        Self::with_config(FnGuideConfig::default())
    }

    /// Create a client with custom configuration.
    ///
    /// # Errors
    /// Fails if the HTTP client cannot be built.
    pub fn with_config(config: FnGuideConfig) -> Result<Self, SourceError> {
        let client = http::client(config.timeout, &config.user_agent)?;
        Ok(Self { client, config })
    }

    /// Statement page URL of a ticker.
    #[must_use]
    pub fn url(&self, ticker: &Ticker) -> String {
        self.config.url_template.replace("{ticker}", ticker.as_str())
    }
}

impl StatementSource for FnGuideClient {
    async fn statement_tables(&self, ticker: &Ticker) -> Result<Vec<StatementTable>, SourceError> {
        let url = self.url(ticker);
        let body = http::fetch_text(self.client.get(&url)).await?;
        let tables = parse_statement_tables(&body)?;
        debug!(ticker = %ticker, tables = tables.len(), "parsed statement page");
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <div id="divSonikY">
          <table class="us_table_ty1 h_fix zigbg_no">
            <thead>
              <tr>
                <th scope="col">IFRS(연결)</th>
                <th scope="col">2021/12</th>
                <th scope="col">2022/12</th>
                <th scope="col">2023/12</th>
                <th scope="col">전년동기</th>
              </tr>
            </thead>
            <tbody>
              <tr>
                <th scope="row"><div><span class="txt_acd">매출액</span></div></th>
                <td class="r">2,796,048</td><td class="r">3,022,314</td><td class="r">2,589,355</td><td class="r"></td>
              </tr>
              <tr class="rwf acd_dep_start_close">
                <th scope="row">
                  <div class="">
                    <span class="txt_acd">유동자산</span>
                    <a href="javascript:;" class="btn_acdopen">계산에 참여한 계정 펼치기</a>
                  </div>
                </th>
                <td class="r">-1,234</td><td class="r">N/A</td><td class="r">15.5</td><td class="r">-</td>
              </tr>
            </tbody>
          </table>
        </div>
        <table><thead><tr><th>IFRS(연결)</th><th>2024/03</th></tr></thead>
          <tbody><tr><th>영업이익</th><td>10</td></tr></tbody></table>
        </body></html>
    "#;

    #[test]
    fn parses_tables_in_order() {
        let tables = parse_statement_tables(PAGE).unwrap();
        assert_eq!(tables.len(), 2);

        let income = &tables[0];
        assert_eq!(income.header, vec!["IFRS(연결)", "2021/12", "2022/12", "2023/12", "전년동기"]);
        assert_eq!(income.label_heading(), Some("IFRS(연결)"));
        assert_eq!(income.period_columns().len(), 3);

        let revenue = income.row("매출액").unwrap();
        assert_eq!(revenue.cells, vec![Some(2_796_048.0), Some(3_022_314.0), Some(2_589_355.0), None]);

        assert_eq!(tables[1].row("영업이익").unwrap().cells, vec![Some(10.0)]);
    }

    #[test]
    fn expand_button_is_stripped_from_labels() {
        let tables = parse_statement_tables(PAGE).unwrap();
        let current = tables[0].row("유동자산").unwrap();
        assert_eq!(current.cells, vec![Some(-1_234.0), None, Some(15.5), None]);
    }

    #[test]
    fn page_without_tables_is_an_error() {
        assert!(matches!(
            parse_statement_tables("<html><body>점검중</body></html>"),
            Err(SourceError::Parse(_))
        ));
    }

    #[test]
    fn url_contains_ticker_code() {
        let client = FnGuideClient::new().unwrap();
        let url = client.url(&Ticker::new("005930"));
        assert!(url.contains("gicode=A005930&cID="));
    }
}
