//! Channel — bindings to hardware channels on the beamline-control service.
//!
//! DESIGN
//! ======
//! Every Control and Sensor addresses exactly one hardware channel by its
//! prefix. The service itself is external; this module only defines the
//! seam (`ChannelService`) and the error taxonomy so that widgets and the
//! refresh task never depend on the transport. `http` is the production
//! implementation; tests substitute in-memory services.

pub mod http;

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while talking to the beamline-control service.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The prefix is empty or contains whitespace.
    #[error("invalid channel prefix: {0:?}")]
    InvalidPrefix(String),

    /// The service could not be reached (transport failure or timeout).
    #[error("channel {prefix} unreachable: {reason}")]
    Unreachable { prefix: String, reason: String },

    /// The service does not know the channel.
    #[error("channel {prefix} does not exist")]
    UnknownChannel { prefix: String },

    /// The service answered with a non-success status.
    #[error("channel {prefix} request failed: status {status}")]
    Response { prefix: String, status: u16 },

    /// The response body could not be understood.
    #[error("channel {prefix} response parse failed: {reason}")]
    Parse { prefix: String, reason: String },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ChannelError {
    /// Whether the failure means the channel could not be bound at all.
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Unreachable { .. } | Self::UnknownChannel { .. })
    }

    /// Whether a later attempt could plausibly succeed.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Unreachable { .. } | Self::Response { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// BINDING
// =============================================================================

/// Identifies one hardware channel by its prefix. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelBinding {
    prefix: String,
}

impl ChannelBinding {
    /// Bind to `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::InvalidPrefix`] if the prefix is empty or
    /// contains whitespace.
    pub fn new(prefix: impl Into<String>) -> Result<Self, ChannelError> {
        let prefix = prefix.into();
        if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
            return Err(ChannelError::InvalidPrefix(prefix));
        }
        Ok(Self { prefix })
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl fmt::Display for ChannelBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix)
    }
}

// =============================================================================
// SERVICE
// =============================================================================

/// A single value reported by the service for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelReading {
    pub value: f64,
}

/// Request/response access to the beamline-control service.
#[async_trait::async_trait]
pub trait ChannelService: Send + Sync {
    /// Establish a live binding to the channel and return its current value.
    async fn connect(&self, binding: &ChannelBinding) -> Result<ChannelReading, ChannelError>;

    /// Read the current value of the channel.
    async fn read(&self, binding: &ChannelBinding) -> Result<ChannelReading, ChannelError>;

    /// Set a writable channel and return the readback.
    async fn write(&self, binding: &ChannelBinding, value: f64) -> Result<ChannelReading, ChannelError>;
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
