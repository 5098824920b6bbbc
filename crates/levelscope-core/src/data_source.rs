//! Data source trait and request/error types.
//!
//! This module defines the adapter contract (`DataSource`) every upstream
//! provider implements, along with the request type and the classified error
//! surfaced to callers.
//!
//! # Error kinds
//!
//! | Kind | Code | Raised when |
//! |------|------|-------------|
//! | [`SourceErrorKind::UnsupportedTimeframe`] | `source.unsupported_timeframe` | timeframe rejected before any network call |
//! | [`SourceErrorKind::UpstreamRequestFailed`] | `source.upstream_request_failed` | transport failure, timeout or non-2xx status |
//! | [`SourceErrorKind::ResponseParseFailed`] | `source.response_parse_failed` | body does not match the provider schema |
//! | [`SourceErrorKind::NoDataReturned`] | `source.no_data_returned` | zero valid bars survive parsing |
//! | [`SourceErrorKind::InvalidRequest`] | `source.invalid_request` | request rejected locally |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{BarSeries, ProviderId};

/// Smallest bar count a request may ask for.
pub const MIN_BAR_LIMIT: usize = 10;
/// Largest bar count a request may ask for.
pub const MAX_BAR_LIMIT: usize = 1_000;

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    UnsupportedTimeframe,
    UpstreamRequestFailed,
    ResponseParseFailed,
    NoDataReturned,
    InvalidRequest,
}

/// Structured source error used by the candidate fallback and the response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unsupported_timeframe(provider: ProviderId, timeframe: &str) -> Self {
        Self {
            kind: SourceErrorKind::UnsupportedTimeframe,
            message: format!(
                "Unsupported timeframe for {}: {timeframe}",
                provider.display_name()
            ),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::UpstreamRequestFailed,
            message: message.into(),
        }
    }

    pub fn parse_failed(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::ResponseParseFailed,
            message: message.into(),
        }
    }

    pub fn no_data(provider: ProviderId) -> Self {
        Self {
            kind: SourceErrorKind::NoDataReturned,
            message: format!("No candles returned from {}.", provider.display_name()),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether trying another symbol spelling could succeed.
    pub const fn is_candidate_recoverable(&self) -> bool {
        matches!(
            self.kind,
            SourceErrorKind::UpstreamRequestFailed
                | SourceErrorKind::ResponseParseFailed
                | SourceErrorKind::NoDataReturned
        )
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::UnsupportedTimeframe => "source.unsupported_timeframe",
            SourceErrorKind::UpstreamRequestFailed => "source.upstream_request_failed",
            SourceErrorKind::ResponseParseFailed => "source.response_parse_failed",
            SourceErrorKind::NoDataReturned => "source.no_data_returned",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SourceError {}

/// Request payload for bar endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarsRequest {
    pub symbol: String,
    pub timeframe: String,
    pub limit: usize,
}

impl BarsRequest {
    /// Builds a request, clamping `limit` into `[MIN_BAR_LIMIT, MAX_BAR_LIMIT]`.
    pub fn new(
        symbol: impl Into<String>,
        timeframe: impl Into<String>,
        limit: usize,
    ) -> Result<Self, SourceError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(SourceError::invalid_request("symbol must not be empty"));
        }
        Ok(Self {
            symbol,
            timeframe: timeframe.into(),
            limit: limit.clamp(MIN_BAR_LIMIT, MAX_BAR_LIMIT),
        })
    }

    pub fn with_symbol(&self, symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..self.clone()
        }
    }
}

pub type BarsFuture<'a> = Pin<Box<dyn Future<Output = Result<BarSeries, SourceError>> + Send + 'a>>;

/// Source adapter contract.
///
/// One capability: fetch a normalized, time-ordered bar series. Implementations
/// are stateless and must be `Send + Sync` so a single instance can serve
/// concurrent requests.
pub trait DataSource: Send + Sync {
    /// Returns the provider identifier.
    fn id(&self) -> ProviderId;

    /// Fetches at most `req.limit` of the most recent bars.
    ///
    /// # Errors
    ///
    /// Returns a classified [`SourceError`]; see the module table.
    fn bars<'a>(&'a self, req: BarsRequest) -> BarsFuture<'a>;

    /// Ordered symbol spellings to try for `symbol`. The default is the symbol itself.
    fn symbol_candidates(&self, symbol: &str) -> Vec<String> {
        vec![symbol.to_owned()]
    }
}
