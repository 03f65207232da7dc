use crate::error::StockDataError;
use crate::fetcher::RequestDate;
use crate::record::StockRecord;
use std::fs;
use std::path::{Path, PathBuf};

/// Replaces the index-ticker `^` prefix with its percent escape (`%5E`) for
/// embedding in the request URL. Symbols without `^` pass through unchanged.
pub fn escape_symbol(symbol: &str) -> String {
    symbol.replace('^', "%5E")
}

/// Symbol form used in cache file names: `%5E` in the escaped symbol becomes
/// `_`, so `^GSPC` caches as `_GSPC`.
pub fn filename_symbol(symbol: &str) -> String {
    escape_symbol(symbol).replace("%5E", "_")
}

/// Eight-digit date segment for cache file names:
/// `{year}{month-1:02}{day:02}`.
///
/// The month is 0-based here, same as in the feed URL. Existing cache files
/// were written with the 0-based month, so the quirk is kept for
/// compatibility: January renders as "00".
pub fn date_segment(date: RequestDate) -> String {
    format!("{}{:02}{:02}", date.year, date.month - 1, date.day)
}

/// Deterministic cache file name for a (symbol, date range) pair.
///
/// A pure function of its inputs: the same symbol and range always produce
/// the same file name, and distinct pairs cannot collide because the name
/// embeds the full escaped symbol and both full date segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    file_name: String,
}

impl CacheKey {
    /// Derives the key for a symbol and an inclusive date range.
    pub fn new(symbol: &str, start: RequestDate, end: RequestDate) -> Self {
        let file_name = format!(
            "{}_{}_{}_stockData.json",
            filename_symbol(symbol),
            date_segment(start),
            date_segment(end),
        );
        CacheKey { file_name }
    }

    /// The bare file name, without any directory component.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Full path of the cache file inside `dir`.
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(&self.file_name)
    }
}

/// One-file-per-key JSON cache on local disk.
///
/// Files are written once per key on first successful fetch and never
/// invalidated here; staleness is the caller's problem. No locking is done,
/// so concurrent calls for the same key may race on the file.
#[derive(Debug)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileCache { dir: dir.into() }
    }

    /// Creates the cache directory if it does not exist yet.
    ///
    /// `create_dir_all` is idempotent on an existing directory and fails when
    /// the path is occupied by a regular file, so no exists-check is needed.
    ///
    /// # Errors
    /// Returns `StockDataError::CacheWrite` if the directory cannot be
    /// created (e.g. permissions, or a file sitting at the path).
    pub fn ensure_dir(&self) -> Result<(), StockDataError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            StockDataError::CacheWrite(format!(
                "cannot create cache directory {:?}: {}",
                self.dir, e
            ))
        })
    }

    /// Loads the record sequence for `key`, or `None` when no file exists.
    ///
    /// # Errors
    /// Returns `StockDataError::CacheRead` if the file exists but cannot be
    /// read or deserialized.
    pub fn load(&self, key: &CacheKey) -> Result<Option<Vec<StockRecord>>, StockDataError> {
        let path = key.path_in(&self.dir);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).map_err(|e| {
            StockDataError::CacheRead(format!("cannot read cache file {:?}: {}", path, e))
        })?;
        let records: Vec<StockRecord> = serde_json::from_str(&json).map_err(|e| {
            StockDataError::CacheRead(format!("corrupt cache file {:?}: {}", path, e))
        })?;
        Ok(Some(records))
    }

    /// Writes (or overwrites) the record sequence for `key`.
    ///
    /// # Errors
    /// Returns `StockDataError::CacheWrite` if serialization or the file
    /// write fails.
    pub fn store(&self, key: &CacheKey, records: &[StockRecord]) -> Result<(), StockDataError> {
        let path = key.path_in(&self.dir);
        let json = serde_json::to_string(records)
            .map_err(|e| StockDataError::CacheWrite(format!("serialization failed: {}", e)))?;
        fs::write(&path, json).map_err(|e| {
            StockDataError::CacheWrite(format!("cannot write cache file {:?}: {}", path, e))
        })?;

        tracing::debug!(file = %key.file_name(), "cached record sequence");
        Ok(())
    }
}
