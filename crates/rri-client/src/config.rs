//! Configuration for the registry client.
//!
//! Defaults can be overridden via environment variables:
//!
//! - `RRI_HOST`                    (default: "rri.test.denic.de")
//! - `RRI_PORT`                    (default: "51131")
//! - `RRI_CONNECT_TIMEOUT_MS`      (default: "10000")
//! - `RRI_READ_TIMEOUT_MS`         (default: "0", wait forever)
//! - `RRI_FIRST_ANSWER_TIMEOUT_MS` (default: "0", same as read timeout)
//! - `RRI_MAX_FRAME_LEN`           (default: "16777216")
//!
//! A timeout of `0` disables it.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use rri_protocol::wire_types::DEFAULT_MAX_FRAME_LEN;

use crate::exchange::ExchangeOptions;

pub type ConfigError = Box<dyn std::error::Error + Send + Sync>;

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Registry host name; also the TLS server name.
    pub host: String,

    /// Registry TCP port.
    pub port: u16,

    /// Deadline for TCP connect plus TLS handshake.
    pub connect_timeout: Duration,

    /// Deadline for each complete answer.
    pub read_timeout: Option<Duration>,

    /// Deadline for the first answer on a fresh connection.
    pub first_answer_timeout: Option<Duration>,

    /// Largest answer frame accepted.
    pub max_frame_len: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "rri.test.denic.de".to_string(),
            port: 51131,
            connect_timeout: Duration::from_secs(10),
            read_timeout: None,
            first_answer_timeout: None,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let host = lookup("RRI_HOST").unwrap_or(defaults.host);
        let port = read_or_default(&lookup, "RRI_PORT", defaults.port)?;
        let connect_timeout_ms = read_or_default(&lookup, "RRI_CONNECT_TIMEOUT_MS", 10_000u64)?;
        let read_timeout_ms = read_or_default(&lookup, "RRI_READ_TIMEOUT_MS", 0u64)?;
        let first_answer_timeout_ms =
            read_or_default(&lookup, "RRI_FIRST_ANSWER_TIMEOUT_MS", 0u64)?;
        let max_frame_len = read_or_default(&lookup, "RRI_MAX_FRAME_LEN", defaults.max_frame_len)?;

        Ok(Config {
            host,
            port,
            connect_timeout: Duration::from_millis(connect_timeout_ms),
            read_timeout: millis(read_timeout_ms),
            first_answer_timeout: millis(first_answer_timeout_ms),
            max_frame_len,
        })
    }

    /// Convenience: `host:port` string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Exchange tunables derived from this configuration.
    pub fn exchange_options(&self) -> ExchangeOptions {
        ExchangeOptions {
            max_answer_len: self.max_frame_len,
            read_timeout: self.read_timeout,
            first_answer_timeout: self.first_answer_timeout,
        }
    }
}

/// `0` means "no timeout".
pub fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

fn read_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse::<T>()
            .map_err(|e| format!("invalid {key}={val:?}: {e}").into()),
        None => Ok(default),
    }
}
