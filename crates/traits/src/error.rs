//! Error types for data sources.

/// Errors that can occur while talking to an external data source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Transport failure.
    #[error("request failed: {0}")]
    Request(String),

    /// Non-success HTTP status.
    #[error("unexpected status {status} from {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// Response body could not be understood.
    #[error("malformed response: {0}")]
    Parse(String),

    /// The source answered but had nothing for the request.
    #[error("no data for {0}")]
    NoData(String),
}

impl SourceError {
    /// Returns whether the failure is specific to the request (as opposed to
    /// the source being unreachable).
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoData(_) | Self::Parse(_) | Self::Status { .. })
    }
}
