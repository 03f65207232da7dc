use crate::cache::{escape_symbol, CacheKey, FileCache};
use crate::error::StockDataError;
use crate::record::{parse_feed_csv, StockRecord};
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

/// Historical-quotes CSV endpoint the feed has traditionally lived at. The
/// provider has relocated it before, so it is configuration rather than a
/// hardwired constant.
pub const DEFAULT_ENDPOINT: &str = "https://real-chart.finance.yahoo.com/table.csv";

/// Default cache directory, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "stockDataCache";

/// Configuration for the stock data fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Base URL of the historical-quotes CSV endpoint
    pub endpoint: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        FetcherConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: 30,
        }
    }
}

/// Calendar date as the caller supplies it: 1-based month and day, 4-digit
/// year. The 0-based month the feed expects is derived at formatting time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDate {
    pub month: u32,
    pub day: u32,
    pub year: i32,
}

impl RequestDate {
    pub fn new(month: u32, day: u32, year: i32) -> Self {
        RequestDate { month, day, year }
    }
}

/// Parameters of one fetch call.
///
/// `new` fills in the defaults (range starting 2010-01-01, cache directory
/// `stockDataCache`, caching off); the builder methods override them.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub symbol: String,
    pub start: RequestDate,
    pub end: RequestDate,
    pub cache_dir: PathBuf,
    pub use_cache: bool,
}

impl FetchRequest {
    /// Creates a request for `symbol` ending at the given 1-based
    /// month/day/year.
    pub fn new(symbol: impl Into<String>, end_month: u32, end_day: u32, end_year: i32) -> Self {
        FetchRequest {
            symbol: symbol.into(),
            start: RequestDate::new(1, 1, 2010),
            end: RequestDate::new(end_month, end_day, end_year),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            use_cache: false,
        }
    }

    /// Overrides the range start (1-based month and day).
    pub fn start(mut self, month: u32, day: u32, year: i32) -> Self {
        self.start = RequestDate::new(month, day, year);
        self
    }

    /// Overrides the cache directory.
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Enables or disables both cache reads and cache writes for this call.
    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    /// The deterministic cache key for this symbol and range.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(&self.symbol, self.start, self.end)
    }
}

/// Downloads historical daily price data from the CSV feed, with an optional
/// per-(symbol, range) disk cache.
#[derive(Debug)]
pub struct StockDataFetcher {
    client: Client,
    config: FetcherConfig,
}

impl StockDataFetcher {
    /// Creates a fetcher with default configuration.
    ///
    /// # Errors
    /// Returns `StockDataError::Fetch` if the HTTP client cannot be built.
    pub fn new() -> Result<Self, StockDataError> {
        Self::with_config(FetcherConfig::default())
    }

    /// Creates a fetcher with custom configuration.
    ///
    /// # Errors
    /// Returns `StockDataError::Fetch` if the HTTP client cannot be built.
    pub fn with_config(config: FetcherConfig) -> Result<Self, StockDataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| StockDataError::Fetch(format!("cannot build HTTP client: {}", e)))?;
        Ok(StockDataFetcher { client, config })
    }

    /// Request URL for a fetch. Months are sent 0-based and zero-padded
    /// (`a`/`d`); days and years go through as given (`b`/`e`, `c`/`f`);
    /// `g=d` selects daily granularity.
    pub fn build_url(&self, request: &FetchRequest) -> String {
        format!(
            "{}?s={}&a={:02}&b={}&c={}&d={:02}&e={}&f={}&g=d&ignore=.csv",
            self.config.endpoint,
            escape_symbol(&request.symbol),
            request.start.month - 1,
            request.start.day,
            request.start.year,
            request.end.month - 1,
            request.end.day,
            request.end.year,
        )
    }

    /// Fetches the historical record sequence for `request`.
    ///
    /// With caching enabled, the cache directory is created if missing, a
    /// present cache file is loaded and returned without touching the
    /// network, and a fetched result is persisted before returning. Rows come
    /// back in feed order; no re-sorting or validation is applied.
    ///
    /// # Errors
    /// - `StockDataError::Fetch` on network failure, non-2xx status, or a
    ///   body that cannot be parsed as the expected CSV.
    /// - `StockDataError::CacheWrite` if the cache directory or file cannot
    ///   be created.
    /// - `StockDataError::CacheRead` if an existing cache file is corrupt.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<Vec<StockRecord>, StockDataError> {
        let key = request.cache_key();
        let cache = FileCache::new(&request.cache_dir);

        if request.use_cache {
            cache.ensure_dir()?;
            if let Some(records) = cache.load(&key)? {
                tracing::info!(symbol = %request.symbol, file = %key.file_name(), "cache hit");
                return Ok(records);
            }
        }

        let url = self.build_url(request);
        tracing::info!(symbol = %request.symbol, "fetching history from feed");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StockDataError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StockDataError::Fetch(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown")
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| StockDataError::Fetch(format!("cannot read response body: {}", e)))?;

        let records = parse_feed_csv(&body)?;

        if request.use_cache {
            cache.store(&key, &records)?;
        }

        Ok(records)
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_creation() {
        let fetcher = StockDataFetcher::new();
        assert!(fetcher.is_ok());
    }

    #[test]
    fn test_fetcher_with_config() {
        let config = FetcherConfig {
            endpoint: "http://localhost:9999/table.csv".to_string(),
            timeout_seconds: 5,
        };
        let fetcher = StockDataFetcher::with_config(config).unwrap();
        assert_eq!(fetcher.config().endpoint, "http://localhost:9999/table.csv");
        assert_eq!(fetcher.config().timeout_seconds, 5);
    }

    #[test]
    fn test_request_defaults() {
        let request = FetchRequest::new("AAPL", 1, 1, 2015);
        assert_eq!(request.start, RequestDate::new(1, 1, 2010));
        assert_eq!(request.end, RequestDate::new(1, 1, 2015));
        assert_eq!(request.cache_dir, PathBuf::from("stockDataCache"));
        assert!(!request.use_cache);
    }

    #[test]
    fn test_request_builder_overrides() {
        let request = FetchRequest::new("AAPL", 6, 30, 2016)
            .start(2, 15, 2012)
            .cache_dir("tmp")
            .use_cache(true);
        assert_eq!(request.start, RequestDate::new(2, 15, 2012));
        assert_eq!(request.cache_dir, PathBuf::from("tmp"));
        assert!(request.use_cache);
    }

    #[test]
    fn test_build_url_month_decrement_and_padding() {
        let fetcher = StockDataFetcher::new().unwrap();
        let request = FetchRequest::new("AAPL", 1, 1, 2015);
        let url = fetcher.build_url(&request);
        assert_eq!(
            url,
            format!(
                "{}?s=AAPL&a=00&b=1&c=2010&d=00&e=1&f=2015&g=d&ignore=.csv",
                DEFAULT_ENDPOINT
            )
        );
    }

    #[test]
    fn test_build_url_escapes_index_symbol() {
        let fetcher = StockDataFetcher::new().unwrap();
        let request = FetchRequest::new("^GSPC", 1, 1, 2015);
        let url = fetcher.build_url(&request);
        assert!(url.contains("s=%5EGSPC"));
        assert!(!url.contains('^'));
    }

    #[test]
    fn test_build_url_double_digit_months_unpadded_semantics() {
        let fetcher = StockDataFetcher::new().unwrap();
        let request = FetchRequest::new("AAPL", 12, 31, 2014).start(10, 5, 2011);
        let url = fetcher.build_url(&request);
        // October is 0-based 09; December is 0-based 11.
        assert!(url.contains("a=09&b=5&c=2011"));
        assert!(url.contains("d=11&e=31&f=2014"));
    }

    #[test]
    fn test_cache_key_matches_request_parameters() {
        let request = FetchRequest::new("^GSPC", 1, 1, 2015);
        assert_eq!(
            request.cache_key().file_name(),
            "_GSPC_20100001_20150001_stockData.json"
        );
    }
}
