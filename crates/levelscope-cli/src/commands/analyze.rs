use levelscope_analysis::{analyze_market, AnalysisConfig, AnalyzeRequest};
use levelscope_core::MarketDataRouter;

use super::CommandOutcome;
use crate::error::CliError;

pub async fn run(
    router: &MarketDataRouter,
    request: &AnalyzeRequest,
    config: &AnalysisConfig,
) -> Result<CommandOutcome, CliError> {
    let response = analyze_market(router, request, config).await;
    Ok(CommandOutcome {
        ok: response.is_ok(),
        body: serde_json::to_value(&response)?,
    })
}
