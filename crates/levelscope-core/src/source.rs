use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Upstream market data providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    BinanceSpot,
    BinanceFutures,
    Stooq,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BinanceSpot => "binance",
            Self::BinanceFutures => "binance_futures",
            Self::Stooq => "stooq",
        }
    }

    /// Human-facing exchange name echoed in responses.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::BinanceSpot => "Binance",
            Self::BinanceFutures => "Binance Futures",
            Self::Stooq => "Stooq",
        }
    }

    /// Resolves a free-form provider hint.
    ///
    /// A hint mentioning `stooq` selects the daily-bar provider. Anything else is a
    /// klines provider, with `futures`, `perp` or `fapi` selecting the futures host.
    pub fn from_hint(hint: &str) -> Self {
        let lowered = hint.trim().to_ascii_lowercase();
        if lowered.contains("stooq") {
            Self::Stooq
        } else if lowered.contains("futures") || lowered.contains("perp") || lowered.contains("fapi")
        {
            Self::BinanceFutures
        } else {
            Self::BinanceSpot
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
