//! Historical data fetch demo.
//!
//! Run with: `cargo run --bin fetch-history -- AAPL`
//!
//! Set RUST_LOG to control log level, e.g. `RUST_LOG=debug`.

use stockdata::{FetchRequest, StockDataFetcher};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    let symbol = std::env::args().nth(1).unwrap_or_else(|| "AAPL".to_string());

    let fetcher = StockDataFetcher::new()?;
    let request = FetchRequest::new(&symbol, 1, 1, 2015).use_cache(true);

    println!("Fetching {} (2010-01-01 to 2015-01-01)...", symbol);
    let records = fetcher.fetch(&request).await?;

    println!("{} rows", records.len());
    for record in records.iter().take(5) {
        println!(
            "  {}  open={:.2} close={:.2} adj={:.2} volume={}",
            record.date, record.open, record.close, record.adj_close, record.volume
        );
    }

    Ok(())
}
