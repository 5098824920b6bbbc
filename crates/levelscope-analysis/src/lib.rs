//! # Levelscope Analysis
//!
//! Deterministic market-structure analysis over normalized bar series.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`indicators`] | EMA, RSI, ATR, MACD and trend strength |
//! | [`levels`] | Swing clustering, micro and pivot levels, compaction |
//! | [`regime`] | Market structure and regime labels |
//! | [`bias`] | Bullish/bearish/neutral percentages |
//! | [`scenarios`] | Scenario and horizon-target composition |
//! | [`summary`] | Summary sentence |
//! | [`pipeline`] | Full bars-to-payload pipeline |
//! | [`service`] | Fetch-and-analyse entry point |
//! | [`envelope`] | `ok`-tagged response wrapper |
//!
//! ## Usage
//!
//! ```rust
//! use levelscope_analysis::{analyze_bars, AnalysisConfig};
//! use levelscope_core::Bar;
//!
//! let bars: Vec<Bar> = (0..120)
//!     .map(|i| {
//!         let close = 50.0 + (i as f64 * 0.3).sin();
//!         Bar::new(i * 60_000, close, close + 0.4, close - 0.4, close, 1.0).unwrap()
//!     })
//!     .collect();
//!
//! let payload = analyze_bars("Binance", "ETHUSDT", "15m", &bars, &AnalysisConfig::default());
//! let bias = payload.bias;
//! assert_eq!(u32::from(bias.bullish) + u32::from(bias.bearish) + u32::from(bias.neutral), 100);
//! ```

pub mod bias;
pub mod config;
pub mod envelope;
pub mod error;
pub mod format;
pub mod indicators;
pub mod levels;
pub mod payload;
pub mod pipeline;
pub mod regime;
pub mod scenarios;
pub mod service;
pub mod summary;

pub use config::{
    AnalysisConfig, IndicatorConfig, LevelConfig, RegimeConfig, RoundingTable, RsiBands,
    TimeframeProfile, TimeframeProfiles, TrendStrengthConfig,
};
pub use envelope::{AnalysisFailure, AnalysisResponse, AnalysisSuccess, MarketMeta, ResponseMeta};
pub use error::ConfigError;
pub use levels::Level;
pub use payload::{AnalysisPayload, Bias, LevelKind, PriceLevel, Scenario, TimeHorizonTargets};
pub use pipeline::{analyze_bars, analyze_series};
pub use regime::{MarketStructure, Regime, RegimeKind};
pub use service::{analyze_market, AnalyzeRequest};
