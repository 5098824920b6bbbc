use std::time::Instant;

use levelscope_analysis::{AnalysisResponse, AnalyzeRequest, MarketMeta, ResponseMeta};
use levelscope_core::{BarsRequest, MarketDataRouter};
use serde_json::json;

use super::CommandOutcome;
use crate::error::CliError;

pub async fn run(
    router: &MarketDataRouter,
    request: &AnalyzeRequest,
) -> Result<CommandOutcome, CliError> {
    let started = Instant::now();
    let elapsed = || started.elapsed().as_millis() as u64;

    let fetched = match BarsRequest::new(&request.symbol, &request.timeframe, request.limit) {
        Ok(bars_request) => router.fetch(&request.exchange, bars_request).await,
        Err(error) => Err(error),
    };

    match fetched {
        Ok(routed) => Ok(CommandOutcome {
            ok: true,
            body: json!({
                "ok": true,
                "market": MarketMeta::from_series(&routed.series),
                "bars": routed.series.bars,
                "meta": ResponseMeta::new(elapsed()),
            }),
        }),
        Err(error) => Ok(CommandOutcome {
            ok: false,
            body: serde_json::to_value(AnalysisResponse::failure(
                &error,
                ResponseMeta::new(elapsed()),
            ))?,
        }),
    }
}
