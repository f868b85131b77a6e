//! Shared HTTP plumbing.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use valuescore_traits::SourceError;

pub(crate) fn client(timeout: Duration, user_agent: &str) -> Result<Client, SourceError> {
    Client::builder().timeout(timeout).user_agent(user_agent).build().map_err(request_error)
}

pub(crate) fn request_error(err: reqwest::Error) -> SourceError {
    if err.is_decode() {
        SourceError::Parse(err.to_string())
    } else {
        SourceError::Request(err.to_string())
    }
}

/// Send a request and read the body, treating non-success statuses as errors.
pub(crate) async fn fetch_text(request: RequestBuilder) -> Result<String, SourceError> {
    let response = request.send().await.map_err(request_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status { status: status.as_u16(), url: response.url().to_string() });
    }
    response.text().await.map_err(request_error)
}
