mod analyze;
mod bars;

use levelscope_analysis::{AnalysisConfig, AnalyzeRequest};
use levelscope_core::{FetchConfig, MarketDataRouter};
use serde_json::Value;
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// JSON body to print and whether it reports success.
pub struct CommandOutcome {
    pub body: Value,
    pub ok: bool,
}

pub async fn run(cli: &Cli) -> Result<CommandOutcome, CliError> {
    let mut fetch_config = FetchConfig::from_env();
    if let Some(timeout_ms) = cli.timeout_ms {
        fetch_config = fetch_config.with_timeout_ms(timeout_ms);
    }
    let router = MarketDataRouter::new(&fetch_config);

    let request = AnalyzeRequest::new(
        Some(&cli.exchange),
        Some(&cli.symbol),
        Some(&cli.timeframe),
        Some(cli.limit),
    );
    debug!(?request, command = ?cli.command(), "dispatching");

    match cli.command() {
        Command::Analyze => {
            let config = load_config(cli)?;
            analyze::run(&router, &request, &config).await
        }
        Command::Bars => bars::run(&router, &request).await,
    }
}

fn load_config(cli: &Cli) -> Result<AnalysisConfig, CliError> {
    match &cli.config {
        Some(path) => Ok(AnalysisConfig::from_json_file(path)?),
        None => Ok(AnalysisConfig::default()),
    }
}
