//! Configuration Module
//!
//! Handles loading default memoization settings and diagnostics server
//! parameters from environment variables.

use std::env;

use crate::keys::KeyStrategy;

/// Engine and diagnostics configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default staleness bound in milliseconds, None = entries never go stale
    pub default_max_age_ms: Option<u64>,
    /// Default capacity per segment, None = unbounded
    pub default_max_size: Option<usize>,
    /// Default storage-key strategy
    pub key_strategy: KeyStrategy,
    /// Diagnostics HTTP server port
    pub server_port: u16,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMO_DEFAULT_MAX_AGE_MS` - Default max age in ms (default: unset, 0 = unset)
    /// - `MEMO_DEFAULT_MAX_SIZE` - Default segment capacity (default: unset, 0 = unset)
    /// - `MEMO_KEY_STRATEGY` - `structural`, `unordered` or `hash` (default: structural)
    /// - `SERVER_PORT` - Diagnostics HTTP port (default: 3000)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        Self {
            default_max_age_ms: env::var("MEMO_DEFAULT_MAX_AGE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&ms: &u64| ms > 0),
            default_max_size: env::var("MEMO_DEFAULT_MAX_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&size: &usize| size > 0),
            key_strategy: env::var("MEMO_KEY_STRATEGY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            sweep_interval: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_max_age_ms: None,
            default_max_size: None,
            key_strategy: KeyStrategy::Structural,
            server_port: 3000,
            sweep_interval: 1,
        }
    }
}
