pub mod cache;
pub mod error;
pub mod fetcher;
pub mod record;

pub use cache::{date_segment, escape_symbol, filename_symbol, CacheKey, FileCache};
pub use error::StockDataError;
pub use fetcher::{
    FetchRequest, FetcherConfig, RequestDate, StockDataFetcher, DEFAULT_CACHE_DIR,
    DEFAULT_ENDPOINT,
};
pub use record::{parse_feed_csv, StockRecord};
