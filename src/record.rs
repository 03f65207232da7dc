use crate::error::StockDataError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Columns the feed must deliver. The header row is authoritative: columns
/// are mapped by name, not position.
const REQUIRED_COLUMNS: [&str; 7] = [
    "Date", "Open", "High", "Low", "Close", "Volume", "Adj Close",
];

/// One row of historical daily price data, one per trading day.
///
/// Field names mirror the feed's CSV header so that cached JSON carries the
/// same column names as the feed itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    /// Trading day, coerced from the feed's textual date
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Volume")]
    pub volume: u64,
    /// Close price adjusted for splits and dividends
    #[serde(rename = "Adj Close")]
    pub adj_close: f64,
}

/// Parses the feed's CSV body into records, preserving row order.
///
/// Columns are located by header name, so the feed may reorder them or append
/// extras. A missing required column or an unparsable cell fails the whole
/// call; no partial sequence is returned.
///
/// # Errors
/// Returns `StockDataError::Fetch` if the header is unreadable, a required
/// column is absent, or any row fails to deserialize.
pub fn parse_feed_csv(text: &str) -> Result<Vec<StockRecord>, StockDataError> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| StockDataError::Fetch(format!("unreadable feed header: {}", e)))?
        .clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(StockDataError::Fetch(format!(
                "feed is missing column {:?}",
                column
            )));
        }
    }

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: StockRecord =
            row.map_err(|e| StockDataError::Fetch(format!("malformed feed row: {}", e)))?;
        records.push(record);
    }
    Ok(records)
}
