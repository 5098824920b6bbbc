//! CLI argument definitions for levelscope.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `analyze` | Fetch bars and print the market-structure analysis (default) |
//! | `bars` | Fetch and print the normalized bar series |
//!
//! # Examples
//!
//! ```bash
//! levelscope --symbol ETHUSDT --timeframe 4h --pretty
//! levelscope --exchange stooq --symbol aapl --timeframe 1w analyze
//! levelscope --exchange binance --symbol SOL/USDT --limit 100 bars
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use levelscope_analysis::service::{
    DEFAULT_EXCHANGE, DEFAULT_LIMIT, DEFAULT_SYMBOL, DEFAULT_TIMEFRAME,
};

/// Support/resistance, regime and scenario analysis for crypto and equity bars.
#[derive(Debug, Parser)]
#[command(name = "levelscope", author, version)]
pub struct Cli {
    /// Provider hint: anything containing "stooq" selects Stooq daily bars,
    /// "futures"/"perp" selects Binance futures, otherwise Binance spot.
    #[arg(long, global = true, default_value = DEFAULT_EXCHANGE)]
    pub exchange: String,

    /// Market symbol (e.g. BTCUSDT, btc/usdt, aapl, ^spx, xauusd).
    #[arg(long, global = true, default_value = DEFAULT_SYMBOL)]
    pub symbol: String,

    /// Bar timeframe (1m..1w for Binance; 1d, 1w, 1M for Stooq).
    #[arg(long, global = true, default_value = DEFAULT_TIMEFRAME)]
    pub timeframe: String,

    /// Number of bars to analyse, clamped to [60, 600].
    #[arg(long, global = true, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Upstream request timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// JSON file overriding analysis parameters.
    #[arg(long, global = true, env = "LEVELSCOPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run the full analysis pipeline (default).
    Analyze,
    /// Print the fetched bar series without analysis.
    Bars,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Analyze)
    }
}
