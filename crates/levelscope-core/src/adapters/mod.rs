//! Provider adapters.
//!
//! | Adapter | Provider | Upstream |
//! |---------|----------|----------|
//! | [`BinanceAdapter`] | Binance spot / USD-M futures | klines JSON endpoint |
//! | [`StooqAdapter`] | Stooq | daily CSV download, resampled to weekly/monthly |

mod binance;
mod stooq;

pub use binance::{normalize_interval, normalize_symbol as normalize_kline_symbol, BinanceAdapter};
pub use stooq::{
    daily_plan, normalize_symbol as normalize_stooq_symbol, parse_daily_csv, symbol_candidates,
    DailyPlan, StooqAdapter,
};

use tracing::debug;

use crate::data_source::SourceError;
use crate::http_client::{HttpClient, HttpRequest};
use crate::ProviderId;

const BODY_EXCERPT_CHARS: usize = 140;

/// Executes `request` and returns the body of a 2xx response.
async fn fetch_body(
    http_client: &dyn HttpClient,
    request: HttpRequest,
    provider: ProviderId,
) -> Result<String, SourceError> {
    debug!(provider = %provider, url = %request.url, "upstream request");

    let timeout_ms = request.timeout_ms;
    let response = http_client.execute(request).await.map_err(|error| {
        let reason = if error.is_timeout() {
            format!("no response within {timeout_ms}ms")
        } else {
            error.message().to_owned()
        };
        SourceError::upstream(format!("{} request failed: {reason}", provider.display_name()))
    })?;

    if !response.is_success() {
        let excerpt: String = response.body.trim().chars().take(BODY_EXCERPT_CHARS).collect();
        let message = if excerpt.is_empty() {
            format!("{} request failed ({}).", provider.display_name(), response.status)
        } else {
            format!(
                "{} request failed ({}): {excerpt}",
                provider.display_name(),
                response.status
            )
        };
        return Err(SourceError::upstream(message));
    }

    Ok(response.body)
}
