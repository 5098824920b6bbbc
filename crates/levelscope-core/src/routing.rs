use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::adapters::{BinanceAdapter, StooqAdapter};
use crate::config::FetchConfig;
use crate::data_source::{BarsFuture, BarsRequest, DataSource, SourceError};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::{BarSeries, ProviderId};

/// Retries an inner source across its ordered symbol candidates.
///
/// Candidates are attempted sequentially; the first success wins. Errors that
/// another spelling cannot fix (unsupported timeframe, invalid request) stop
/// the walk immediately. When every candidate fails the last error surfaces.
pub struct SymbolFallback<S> {
    inner: S,
}

impl<S: DataSource> SymbolFallback<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: DataSource> DataSource for SymbolFallback<S> {
    fn id(&self) -> ProviderId {
        self.inner.id()
    }

    fn bars<'a>(&'a self, req: BarsRequest) -> BarsFuture<'a> {
        Box::pin(async move {
            let provider = self.inner.id();
            let mut last_error = None;

            for candidate in self.inner.symbol_candidates(&req.symbol) {
                debug!(provider = %provider, candidate = %candidate, "trying symbol candidate");
                match self.inner.bars(req.with_symbol(candidate.as_str())).await {
                    Ok(series) => return Ok(series),
                    Err(error) if error.is_candidate_recoverable() => {
                        warn!(
                            provider = %provider,
                            candidate = %candidate,
                            code = error.code(),
                            "symbol candidate failed: {error}"
                        );
                        last_error = Some(error);
                    }
                    Err(error) => return Err(error),
                }
            }

            Err(last_error.unwrap_or_else(|| SourceError::no_data(provider)))
        })
    }

    fn symbol_candidates(&self, symbol: &str) -> Vec<String> {
        self.inner.symbol_candidates(symbol)
    }
}

/// Successful routed fetch.
#[derive(Debug, Clone)]
pub struct RouteSuccess {
    pub series: BarSeries,
    pub provider: ProviderId,
    pub latency_ms: u64,
}

/// Provider-hint dispatcher over the registered adapters.
pub struct MarketDataRouter {
    binance_spot: Arc<dyn DataSource>,
    binance_futures: Arc<dyn DataSource>,
    stooq: Arc<dyn DataSource>,
}

impl MarketDataRouter {
    /// Router backed by real HTTP transport.
    pub fn new(config: &FetchConfig) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new(&config.user_agent)), config)
    }

    /// Router whose adapters share `http_client`; Stooq is wrapped in [`SymbolFallback`].
    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: &FetchConfig) -> Self {
        Self::from_sources(
            Arc::new(BinanceAdapter::spot(http_client.clone(), config)),
            Arc::new(BinanceAdapter::futures(http_client.clone(), config)),
            Arc::new(SymbolFallback::new(StooqAdapter::new(http_client, config))),
        )
    }

    pub fn from_sources(
        binance_spot: Arc<dyn DataSource>,
        binance_futures: Arc<dyn DataSource>,
        stooq: Arc<dyn DataSource>,
    ) -> Self {
        Self {
            binance_spot,
            binance_futures,
            stooq,
        }
    }

    pub fn source(&self, provider: ProviderId) -> &dyn DataSource {
        match provider {
            ProviderId::BinanceSpot => self.binance_spot.as_ref(),
            ProviderId::BinanceFutures => self.binance_futures.as_ref(),
            ProviderId::Stooq => self.stooq.as_ref(),
        }
    }

    pub fn select(&self, hint: &str) -> &dyn DataSource {
        self.source(ProviderId::from_hint(hint))
    }

    /// Fetches bars from the provider selected by `hint`.
    pub async fn fetch(&self, hint: &str, req: BarsRequest) -> Result<RouteSuccess, SourceError> {
        let started = Instant::now();
        let source = self.select(hint);
        let provider = source.id();

        let series = source.bars(req).await?;
        series
            .validate_ordering()
            .map_err(|error| SourceError::parse_failed(error.to_string()))?;

        Ok(RouteSuccess {
            series,
            provider,
            latency_ms: started.elapsed().as_millis() as u64,
        })
    }
}
