//! HTTP client for the beamline-control service.
//!
//! Thin wrapper around `reqwest`. Each channel is a resource under the
//! service root: `GET <root>/channels/<prefix>` reads it and
//! `PUT <root>/channels/<prefix>` with `{"value": ..}` writes it. Response
//! classification lives in `parse_response` so it can be tested without a
//! network.

use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::Serialize;
use tracing::debug;

use super::{ChannelBinding, ChannelError, ChannelReading, ChannelService};
use crate::config::ServiceConfig;

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpChannelService {
    http: reqwest::Client,
    root: Url,
}

#[derive(Serialize)]
struct WriteRequest {
    value: f64,
}

impl HttpChannelService {
    /// Build a client rooted at the configured service URL.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::HttpClientBuild`] if the root URL is invalid or
    /// the HTTP client cannot be constructed.
    pub fn new(config: &ServiceConfig) -> Result<Self, ChannelError> {
        let root = Url::parse(&config.root_url()).map_err(|e| ChannelError::HttpClientBuild(e.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ChannelError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, root })
    }

    #[must_use]
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// URL of the channel resource, with the prefix as one encoded segment.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::HttpClientBuild`] if the root URL cannot carry
    /// path segments.
    pub fn channel_url(&self, binding: &ChannelBinding) -> Result<Url, ChannelError> {
        let mut url = self.root.clone();
        url.path_segments_mut()
            .map_err(|()| ChannelError::HttpClientBuild(format!("cannot-be-a-base URL: {}", self.root)))?
            .pop_if_empty()
            .push("channels")
            .push(binding.prefix());
        Ok(url)
    }

    async fn finish(binding: &ChannelBinding, response: reqwest::Response) -> Result<ChannelReading, ChannelError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChannelError::Unreachable { prefix: binding.prefix().to_string(), reason: e.to_string() })?;
        parse_response(binding, status, &body)
    }

    fn unreachable(binding: &ChannelBinding, err: &reqwest::Error) -> ChannelError {
        ChannelError::Unreachable { prefix: binding.prefix().to_string(), reason: err.to_string() }
    }
}

#[async_trait::async_trait]
impl ChannelService for HttpChannelService {
    async fn connect(&self, binding: &ChannelBinding) -> Result<ChannelReading, ChannelError> {
        debug!(%binding, "connecting channel");
        self.read(binding).await
    }

    async fn read(&self, binding: &ChannelBinding) -> Result<ChannelReading, ChannelError> {
        let url = self.channel_url(binding)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Self::unreachable(binding, &e))?;
        Self::finish(binding, response).await
    }

    async fn write(&self, binding: &ChannelBinding, value: f64) -> Result<ChannelReading, ChannelError> {
        let url = self.channel_url(binding)?;
        debug!(%binding, value, "writing channel");
        let response = self
            .http
            .put(url)
            .json(&WriteRequest { value })
            .send()
            .await
            .map_err(|e| Self::unreachable(binding, &e))?;
        Self::finish(binding, response).await
    }
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

/// Classify a service response for `binding`.
///
/// # Errors
///
/// 404 maps to [`ChannelError::UnknownChannel`], any other non-success status
/// to [`ChannelError::Response`], and an unreadable body to
/// [`ChannelError::Parse`].
pub fn parse_response(binding: &ChannelBinding, status: StatusCode, body: &str) -> Result<ChannelReading, ChannelError> {
    let prefix = binding.prefix();
    if status == StatusCode::NOT_FOUND {
        return Err(ChannelError::UnknownChannel { prefix: prefix.to_string() });
    }
    if !status.is_success() {
        return Err(ChannelError::Response { prefix: prefix.to_string(), status: status.as_u16() });
    }
    serde_json::from_str(body).map_err(|e| ChannelError::Parse { prefix: prefix.to_string(), reason: e.to_string() })
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
