//! # Levelscope Core
//!
//! Market data contracts and provider plumbing for the levelscope analysis
//! pipeline.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Binance klines, Stooq daily CSV) |
//! | [`config`] | Upstream hosts and timeout budget |
//! | [`data_source`] | Data source trait, request type and classified errors |
//! | [`domain`] | Domain models (Bar, BarSeries, TimeframeKind) |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`resample`] | Fixed-window bar resampling |
//! | [`routing`] | Provider-hint dispatch and symbol-candidate fallback |
//! | [`source`] | Provider identifiers |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │  MarketDataRouter   │  provider hint -> adapter
//! └──────────┬──────────┘
//!            │
//!     ┌──────┴───────────────┐
//!     ▼                      ▼
//! ┌──────────────┐   ┌────────────────────────────┐
//! │ BinanceAdapter│   │ SymbolFallback<StooqAdapter>│
//! └──────┬───────┘   └─────────────┬──────────────┘
//!        │                         │
//!        ▼                         ▼
//! ┌──────────────────────────────────────────┐
//! │ HttpClient (reqwest / scripted)          │
//! └──────────────────────────────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Adapters return a classified [`SourceError`]:
//!
//! ```rust
//! use levelscope_core::{SourceError, SourceErrorKind};
//!
//! fn describe(error: &SourceError) -> &'static str {
//!     match error.kind() {
//!         SourceErrorKind::UnsupportedTimeframe => "pick 1d, 1w or 1M",
//!         SourceErrorKind::NoDataReturned => "symbol has no history",
//!         _ => "upstream problem",
//!     }
//! }
//! ```

pub mod adapters;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod resample;
pub mod routing;
pub mod source;

pub use adapters::{BinanceAdapter, StooqAdapter};
pub use config::FetchConfig;
pub use data_source::{
    BarsFuture, BarsRequest, DataSource, SourceError, SourceErrorKind, MAX_BAR_LIMIT,
    MIN_BAR_LIMIT,
};
pub use domain::{format_millis_rfc3339, parse_date_millis, Bar, BarSeries, TimeframeKind};
pub use error::ValidationError;
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, ScriptedHttpClient,
};
pub use resample::resample_fixed_windows;
pub use routing::{MarketDataRouter, RouteSuccess, SymbolFallback};
pub use source::ProviderId;
