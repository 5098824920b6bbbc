//! # Domain Models
//!
//! Canonical market data types shared by the adapters and the analysis engine.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Bar`] | One OHLCV sample with an epoch-millisecond open time |
//! | [`BarSeries`] | Time-ordered bars for one provider/symbol/timeframe |
//! | [`TimeframeKind`] | Coarse timeframe class driving structural parameters |
//!
//! ## Validation
//!
//! Bars enforce their price invariants at construction time:
//!
//! ```rust
//! use levelscope_core::{Bar, ValidationError};
//!
//! let bar = Bar::new(1_700_000_000_000, 100.0, 105.0, 95.0, 102.0, 1_000.0);
//! assert!(bar.is_ok());
//!
//! let invalid = Bar::new(1_700_000_000_000, 100.0, 95.0, 105.0, 102.0, 1_000.0);
//! assert!(matches!(invalid, Err(ValidationError::InvalidBarRange)));
//! ```

mod models;
mod timeframe;
mod timestamp;

pub use models::{Bar, BarSeries};
pub use timeframe::TimeframeKind;
pub use timestamp::{format_millis_rfc3339, parse_date_millis};
