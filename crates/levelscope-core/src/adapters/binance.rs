use std::sync::Arc;

use serde_json::Value;

use super::fetch_body;
use crate::config::FetchConfig;
use crate::data_source::{BarsFuture, BarsRequest, DataSource, SourceError};
use crate::http_client::{HttpClient, HttpRequest};
use crate::{Bar, BarSeries, ProviderId};

/// Klines adapter for Binance spot and USD-M futures.
#[derive(Clone)]
pub struct BinanceAdapter {
    provider: ProviderId,
    host: String,
    http_client: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

impl BinanceAdapter {
    pub fn spot(http_client: Arc<dyn HttpClient>, config: &FetchConfig) -> Self {
        Self {
            provider: ProviderId::BinanceSpot,
            host: config.binance_spot_host.clone(),
            http_client,
            timeout_ms: config.timeout_ms,
        }
    }

    pub fn futures(http_client: Arc<dyn HttpClient>, config: &FetchConfig) -> Self {
        Self {
            provider: ProviderId::BinanceFutures,
            host: config.binance_futures_host.clone(),
            http_client,
            timeout_ms: config.timeout_ms,
        }
    }

    fn path(&self) -> &'static str {
        match self.provider {
            ProviderId::BinanceFutures => "/fapi/v1/klines",
            _ => "/api/v3/klines",
        }
    }
}

impl DataSource for BinanceAdapter {
    fn id(&self) -> ProviderId {
        self.provider
    }

    fn bars<'a>(&'a self, req: BarsRequest) -> BarsFuture<'a> {
        Box::pin(async move {
            let interval = normalize_interval(&req.timeframe);
            let symbol = normalize_symbol(&req.symbol);

            let request = HttpRequest::get(format!("https://{}{}", self.host, self.path()))
                .with_query("symbol", &symbol)
                .with_query("interval", &interval)
                .with_query("limit", &req.limit.to_string())
                .with_header("Accept", "application/json")
                .with_timeout_ms(self.timeout_ms);

            let body = fetch_body(self.http_client.as_ref(), request, self.provider).await?;
            let bars = parse_klines(&body, self.provider)?;

            let mut series = BarSeries::new(self.provider, symbol, interval, bars);
            series.truncate_to_recent(req.limit);
            Ok(series)
        })
    }
}

/// Uppercases and strips spaces, slashes and hyphens (`btc/usdt` -> `BTCUSDT`).
pub fn normalize_symbol(symbol: &str) -> String {
    symbol
        .trim()
        .to_ascii_uppercase()
        .chars()
        .filter(|ch| !matches!(ch, ' ' | '/' | '-'))
        .collect()
}

/// Canonicalizes a timeframe into the klines interval vocabulary.
///
/// Unit-suffixed input (`60m`, `4H`, `1 d`) is lowercased and minute counts that
/// map to a larger unit are promoted. Bare numbers are read as minutes.
/// Anything unrecognized passes through for the upstream to reject.
pub fn normalize_interval(timeframe: &str) -> String {
    let trimmed = timeframe.trim();
    if trimmed.is_empty() {
        return timeframe.to_owned();
    }

    let lowered = trimmed.to_ascii_lowercase();
    if lowered.contains(['m', 'h', 'd', 'w']) {
        let cleaned: String = lowered.chars().filter(|ch| *ch != ' ').collect();
        let minutes = cleaned
            .strip_suffix('m')
            .filter(|digits| !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_digit()))
            .and_then(|digits| digits.parse::<u32>().ok());
        return minutes.and_then(interval_from_minutes).unwrap_or(cleaned);
    }

    let digits: String = lowered.chars().filter(char::is_ascii_digit).collect();
    digits
        .parse::<u32>()
        .ok()
        .and_then(interval_from_minutes)
        .unwrap_or_else(|| trimmed.to_owned())
}

fn interval_from_minutes(minutes: u32) -> Option<String> {
    let canonical = match minutes {
        1 | 3 | 5 | 15 | 30 => return Some(format!("{minutes}m")),
        60 => "1h",
        120 => "2h",
        180 => "3h",
        240 => "4h",
        360 => "6h",
        480 => "8h",
        720 => "12h",
        1_440 => "1d",
        10_080 => "1w",
        _ => return None,
    };
    Some(canonical.to_owned())
}

/// Parses a klines body: an array of `[openTime, open, high, low, close, volume, ...]` rows.
///
/// Rows that are too short or carry non-numeric fields are skipped.
fn parse_klines(body: &str, provider: ProviderId) -> Result<Vec<Bar>, SourceError> {
    let parse_error = || {
        SourceError::parse_failed(format!(
            "{} response parsing failed.",
            provider.display_name()
        ))
    };

    let raw: Value = serde_json::from_str(body).map_err(|_| parse_error())?;
    let rows = raw.as_array().ok_or_else(parse_error)?;

    let mut bars: Vec<Bar> = rows
        .iter()
        .filter_map(Value::as_array)
        .filter(|fields| fields.len() >= 6)
        .filter_map(|fields| {
            let open_time = numeric(&fields[0])?;
            Bar::new(
                open_time as i64,
                numeric(&fields[1])?,
                numeric(&fields[2])?,
                numeric(&fields[3])?,
                numeric(&fields[4])?,
                numeric(&fields[5])?,
            )
            .ok()
        })
        .collect();

    if bars.is_empty() {
        return Err(SourceError::no_data(provider));
    }

    bars.sort_by_key(|bar| bar.open_time);
    bars.dedup_by_key(|bar| bar.open_time);
    Ok(bars)
}

fn numeric(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::http_client::{HttpResponse, ScriptedHttpClient};

    const KLINES: &str = r#"[
        [1700000000000, "100.0", "101.5", "99.5", "101.0", "1200.5", 1700003599999],
        [1700003600000, "101.0", "102.0", "100.5", "101.8", "900.0", 1700007199999],
        [1700007200000, "bad", "102.0", "100.5", "101.8", "900.0", 1700010799999],
        [1700010800000, "101.8"],
        [1700014400000, 101.8, 103.0, 101.0, 102.5, 500]
    ]"#;

    #[test]
    fn normalizes_unit_suffixed_timeframes() {
        assert_eq!(normalize_interval("60m"), "1h");
        assert_eq!(normalize_interval("240m"), "4h");
        assert_eq!(normalize_interval("1440m"), "1d");
        assert_eq!(normalize_interval("15m"), "15m");
        assert_eq!(normalize_interval("4H"), "4h");
        assert_eq!(normalize_interval(" 1 d "), "1d");
        assert_eq!(normalize_interval("1w"), "1w");
    }

    #[test]
    fn normalizes_bare_minute_timeframes() {
        assert_eq!(normalize_interval("5"), "5m");
        assert_eq!(normalize_interval("60"), "1h");
        assert_eq!(normalize_interval("180"), "3h");
        assert_eq!(normalize_interval("480"), "8h");
        assert_eq!(normalize_interval("10080"), "1w");
        assert_eq!(normalize_interval("7"), "7");
    }

    #[test]
    fn normalizes_symbols() {
        assert_eq!(normalize_symbol(" btc/usdt "), "BTCUSDT");
        assert_eq!(normalize_symbol("eth-usdt"), "ETHUSDT");
        assert_eq!(normalize_symbol("sol usdt"), "SOLUSDT");
    }

    #[test]
    fn skips_malformed_kline_rows() {
        let bars = parse_klines(KLINES, ProviderId::BinanceSpot).expect("must parse");
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].open_time, 1_700_000_000_000);
        assert_eq!(bars[2].close, 102.5);
        assert_eq!(bars[0].volume, 1200.5);
    }

    #[test]
    fn non_array_body_is_a_parse_failure() {
        let err = parse_klines(r#"{"code":-1121,"msg":"Invalid symbol."}"#, ProviderId::BinanceSpot)
            .expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::ResponseParseFailed);
    }

    #[test]
    fn all_rows_invalid_is_no_data() {
        let err = parse_klines(r#"[["x"], []]"#, ProviderId::BinanceFutures).expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::NoDataReturned);
        assert_eq!(err.message(), "No candles returned from Binance Futures.");
    }

    #[tokio::test]
    async fn futures_adapter_uses_futures_host_and_trims_to_limit() {
        let client = Arc::new(
            ScriptedHttpClient::new().respond("fapi.binance.com/fapi/v1/klines", HttpResponse::ok(KLINES)),
        );
        let adapter = BinanceAdapter::futures(client.clone(), &FetchConfig::default());
        let request = BarsRequest::new("btc/usdt", "60", 10).expect("valid request");

        let series = adapter.bars(request).await.expect("must fetch");

        assert_eq!(series.provider, ProviderId::BinanceFutures);
        assert_eq!(series.symbol, "BTCUSDT");
        assert_eq!(series.timeframe, "1h");
        assert_eq!(series.len(), 3);

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://fapi.binance.com/fapi/v1/klines?symbol=BTCUSDT&interval=1h&limit=10"
        );
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_failure() {
        let client = Arc::new(ScriptedHttpClient::new().respond(
            "api.binance.com",
            HttpResponse::with_status(400, r#"{"code":-1120,"msg":"Invalid interval."}"#),
        ));
        let adapter = BinanceAdapter::spot(client, &FetchConfig::default());
        let request = BarsRequest::new("BTCUSDT", "7", 100).expect("valid request");

        let err = adapter.bars(request).await.expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::UpstreamRequestFailed);
        assert!(err.message().starts_with("Binance request failed (400)"));
        assert!(err.message().contains("Invalid interval."));
    }
}
