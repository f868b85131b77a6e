//! Error types for the financial data cache.

use std::path::PathBuf;

use valuescore_primitives::ExtractionError;
use valuescore_traits::SourceError;

/// Errors that can occur while building, saving or loading the cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Statement source failure.
    #[error("statement source error: {0}")]
    Source(#[from] SourceError),

    /// Statement tables could not be turned into snapshots.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// File system failure.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Cache file is not valid JSON of the expected shape.
    #[error("malformed cache file {}: {source}", path.display())]
    Json {
        /// Cache file.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// Too many consecutive transport failures while building the cache.
    #[error("statement source unreachable after {failures} consecutive failures: {last}")]
    Unreachable {
        /// Consecutive failures observed.
        failures: usize,
        /// Last transport error.
        last: SourceError,
    },
}

#[cfg(test)]
mod tests {
    use valuescore_primitives::LineItem;

    use super::*;

    #[test]
    fn error_display() {
        let err = CacheError::Io {
            path: PathBuf::from("/data/quarter_df.json"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("quarter_df.json"));

        let err = CacheError::from(ExtractionError::MissingItem(LineItem::Equity));
        assert!(err.to_string().contains("자본"));
    }
}
