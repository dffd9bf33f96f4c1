//! Application configuration parsed from environment variables.
//!
//! Every setting has a default so the panel starts against the standard
//! beamline deployment without any environment at all. Values are read
//! through a lookup function so tests never touch the process environment.

use std::path::PathBuf;

use crate::layout::DEFAULT_REFRESH_INTERVAL_MS;

pub const DEFAULT_PORT: u16 = 8050;
pub const DEFAULT_SERVICE_HOST: &str = "beamline_control";
pub const DEFAULT_SERVICE_PORT: u16 = 8080;
pub const DEFAULT_API_VERSION: &str = "0";
pub const DEFAULT_BEAMLINE_ID: &str = "als_5_3_1";
pub const DEFAULT_BEAMLINE_VERSION: &str = "0";
pub const DEFAULT_CHANNEL_REQUEST_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_CHANNEL_CONNECT_TIMEOUT_SECS: u64 = 2;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

/// Location of the beamline-control service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub api_version: String,
    pub beamline_id: String,
    pub version: String,
    pub timeouts: ChannelTimeouts,
}

impl ServiceConfig {
    /// `http://<host>:<port>/api/v<api_version>/beamline/<beamline_id>/<version>`
    #[must_use]
    pub fn root_url(&self) -> String {
        format!(
            "http://{}:{}/api/v{}/beamline/{}/{}",
            self.host, self.port, self.api_version, self.beamline_id, self.version
        )
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVICE_HOST.into(),
            port: DEFAULT_SERVICE_PORT,
            api_version: DEFAULT_API_VERSION.into(),
            beamline_id: DEFAULT_BEAMLINE_ID.into(),
            version: DEFAULT_BEAMLINE_VERSION.into(),
            timeouts: ChannelTimeouts {
                request_secs: DEFAULT_CHANNEL_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CHANNEL_CONNECT_TIMEOUT_SECS,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub service: ServiceConfig,
    /// YAML channel list; `None` uses the built-in beamline channels.
    pub channels_file: Option<PathBuf>,
    pub refresh_interval_ms: u64,
    pub assets_dir: PathBuf,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 8050
    /// - `BEAMLINE_SERVICE_HOST`: default `beamline_control`
    /// - `BEAMLINE_SERVICE_PORT`: default 8080
    /// - `BEAMLINE_API_VERSION`: default `0`
    /// - `BEAMLINE_ID`: default `als_5_3_1`
    /// - `BEAMLINE_VERSION`: default `0`
    /// - `BEAMLINE_CHANNELS_FILE`: YAML channel list
    /// - `REFRESH_INTERVAL_MS`: default 1000, must be non-zero
    /// - `CHANNEL_REQUEST_TIMEOUT_SECS`: default 5
    /// - `CHANNEL_CONNECT_TIMEOUT_SECS`: default 2
    /// - `ASSETS_DIR`: default `assets/` next to `Cargo.toml`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a numeric variable does not parse,
    /// or if a timeout or the refresh interval is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a numeric variable does not parse,
    /// or if a timeout or the refresh interval is zero.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let service = ServiceConfig {
            host: text("BEAMLINE_SERVICE_HOST", DEFAULT_SERVICE_HOST),
            port: parse_var(&lookup, "BEAMLINE_SERVICE_PORT", DEFAULT_SERVICE_PORT)?,
            api_version: text("BEAMLINE_API_VERSION", DEFAULT_API_VERSION),
            beamline_id: text("BEAMLINE_ID", DEFAULT_BEAMLINE_ID),
            version: text("BEAMLINE_VERSION", DEFAULT_BEAMLINE_VERSION),
            timeouts: ChannelTimeouts {
                request_secs: parse_nonzero_var(
                    &lookup,
                    "CHANNEL_REQUEST_TIMEOUT_SECS",
                    DEFAULT_CHANNEL_REQUEST_TIMEOUT_SECS,
                )?,
                connect_secs: parse_nonzero_var(
                    &lookup,
                    "CHANNEL_CONNECT_TIMEOUT_SECS",
                    DEFAULT_CHANNEL_CONNECT_TIMEOUT_SECS,
                )?,
            },
        };

        let refresh_interval_ms = parse_nonzero_var(&lookup, "REFRESH_INTERVAL_MS", DEFAULT_REFRESH_INTERVAL_MS)?;

        Ok(Self {
            port: parse_var(&lookup, "PORT", DEFAULT_PORT)?,
            service,
            channels_file: lookup("BEAMLINE_CHANNELS_FILE").map(PathBuf::from),
            refresh_interval_ms,
            assets_dir: lookup("ASSETS_DIR")
                .map_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"), PathBuf::from),
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var: key.to_string(), value: raw }),
    }
}

/// Like [`parse_var`], but zero is rejected.
fn parse_nonzero_var<F>(lookup: &F, key: &str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_var(lookup, key, default)?;
    if value == 0 {
        return Err(ConfigError::Invalid { var: key.to_string(), value: value.to_string() });
    }
    Ok(value)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
