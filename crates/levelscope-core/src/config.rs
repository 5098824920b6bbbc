use std::env;

use crate::http_client::DEFAULT_TIMEOUT_MS;

/// Upstream endpoints and transport budget for the market data adapters.
///
/// # Environment Variables
///
/// | Field | Env Var |
/// |-------|---------|
/// | `timeout_ms` | `LEVELSCOPE_TIMEOUT_MS` |
/// | `binance_spot_host` | `LEVELSCOPE_BINANCE_SPOT_HOST` |
/// | `binance_futures_host` | `LEVELSCOPE_BINANCE_FUTURES_HOST` |
/// | `stooq_base_url` | `LEVELSCOPE_STOOQ_BASE_URL` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub timeout_ms: u64,
    pub binance_spot_host: String,
    pub binance_futures_host: String,
    pub stooq_base_url: String,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            binance_spot_host: String::from("api.binance.com"),
            binance_futures_host: String::from("fapi.binance.com"),
            stooq_base_url: String::from("https://stooq.com/q/d/l/"),
            user_agent: String::from(concat!("levelscope/", env!("CARGO_PKG_VERSION"))),
        }
    }
}

impl FetchConfig {
    /// Reads overrides from the environment; unset or unparsable values keep defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout_ms: env::var("LEVELSCOPE_TIMEOUT_MS")
                .ok()
                .and_then(|raw| raw.trim().parse().ok())
                .unwrap_or(defaults.timeout_ms),
            binance_spot_host: env::var("LEVELSCOPE_BINANCE_SPOT_HOST")
                .unwrap_or(defaults.binance_spot_host),
            binance_futures_host: env::var("LEVELSCOPE_BINANCE_FUTURES_HOST")
                .unwrap_or(defaults.binance_futures_host),
            stooq_base_url: env::var("LEVELSCOPE_STOOQ_BASE_URL")
                .unwrap_or(defaults.stooq_base_url),
            user_agent: defaults.user_agent,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}
