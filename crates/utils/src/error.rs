//! Error types for tabular output.

use std::path::PathBuf;

/// Errors that can occur while building or writing tables.
#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Output file could not be created.
    #[error("failed to create {}: {source}", path.display())]
    Io {
        /// Output path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = UtilsError::Io {
            path: PathBuf::from("results_2025 01 02.csv"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("results_2025 01 02.csv"));
    }
}
