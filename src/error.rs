/// Errors that can occur while fetching or caching historical price data.
///
/// Every error is terminal for the call that produced it: nothing is retried
/// and no partial record sequence is ever returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockDataError {
    /// Network, HTTP, or feed-parse failure (DNS, connection, non-2xx status,
    /// unreadable body, malformed CSV, missing column)
    Fetch(String),
    /// Cache directory or cache file could not be created or written
    CacheWrite(String),
    /// Cache file exists but could not be read or deserialized
    CacheRead(String),
}

impl std::fmt::Display for StockDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockDataError::Fetch(msg) => write!(f, "Fetch error: {}", msg),
            StockDataError::CacheWrite(msg) => write!(f, "Cache write error: {}", msg),
            StockDataError::CacheRead(msg) => write!(f, "Cache read error: {}", msg),
        }
    }
}

impl std::error::Error for StockDataError {}
