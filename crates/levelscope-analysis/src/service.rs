//! Request-level entry point: fetch, analyse, wrap.

use std::time::Instant;

use levelscope_core::{BarsRequest, MarketDataRouter};
use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::envelope::{AnalysisResponse, MarketMeta, ResponseMeta};
use crate::pipeline::analyze_series;

pub const DEFAULT_EXCHANGE: &str = "binance-futures";
pub const DEFAULT_SYMBOL: &str = "BTCUSDT";
pub const DEFAULT_TIMEFRAME: &str = "1h";
pub const DEFAULT_LIMIT: usize = 220;
pub const MIN_REQUEST_LIMIT: usize = 60;
pub const MAX_REQUEST_LIMIT: usize = 600;

/// Caller-facing request with blank fields replaced by defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeRequest {
    pub exchange: String,
    pub symbol: String,
    pub timeframe: String,
    pub limit: usize,
}

impl Default for AnalyzeRequest {
    fn default() -> Self {
        Self {
            exchange: DEFAULT_EXCHANGE.to_owned(),
            symbol: DEFAULT_SYMBOL.to_owned(),
            timeframe: DEFAULT_TIMEFRAME.to_owned(),
            limit: DEFAULT_LIMIT,
        }
    }
}

impl AnalyzeRequest {
    /// Normalises raw caller input. The limit is clamped into
    /// `[MIN_REQUEST_LIMIT, MAX_REQUEST_LIMIT]`.
    pub fn new(
        exchange: Option<&str>,
        symbol: Option<&str>,
        timeframe: Option<&str>,
        limit: Option<usize>,
    ) -> Self {
        fn or_default(value: Option<&str>, default: &str) -> String {
            value
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .unwrap_or(default)
                .to_owned()
        }

        Self {
            exchange: or_default(exchange, DEFAULT_EXCHANGE),
            symbol: or_default(symbol, DEFAULT_SYMBOL),
            timeframe: or_default(timeframe, DEFAULT_TIMEFRAME),
            limit: limit
                .unwrap_or(DEFAULT_LIMIT)
                .clamp(MIN_REQUEST_LIMIT, MAX_REQUEST_LIMIT),
        }
    }
}

/// Fetches bars for `request` and runs the analysis pipeline.
///
/// Never fails: upstream and parsing errors come back as an
/// `{"ok": false}` response.
pub async fn analyze_market(
    router: &MarketDataRouter,
    request: &AnalyzeRequest,
    config: &AnalysisConfig,
) -> AnalysisResponse {
    let started = Instant::now();
    let elapsed = || started.elapsed().as_millis() as u64;

    let bars_request = match BarsRequest::new(&request.symbol, &request.timeframe, request.limit) {
        Ok(bars_request) => bars_request,
        Err(error) => return AnalysisResponse::failure(&error, ResponseMeta::new(elapsed())),
    };

    let routed = match router.fetch(&request.exchange, bars_request).await {
        Ok(routed) => routed,
        Err(error) => {
            warn!(
                exchange = %request.exchange,
                symbol = %request.symbol,
                code = error.code(),
                "market fetch failed: {error}"
            );
            return AnalysisResponse::failure(&error, ResponseMeta::new(elapsed()));
        }
    };

    let analysis = analyze_series(&routed.series, config);
    info!(
        provider = %routed.provider,
        symbol = %routed.series.symbol,
        timeframe = %routed.series.timeframe,
        bars = routed.series.len(),
        fetch_ms = routed.latency_ms,
        "analysis complete"
    );

    AnalysisResponse::success(
        MarketMeta::from_series(&routed.series),
        analysis,
        ResponseMeta::new(elapsed()),
    )
}
