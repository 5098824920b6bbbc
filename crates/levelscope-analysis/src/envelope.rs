use levelscope_core::{format_millis_rfc3339, BarSeries, SourceError};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::payload::AnalysisPayload;

/// Boolean-tagged response: `{"ok": true, ...}` or `{"ok": false, "error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Success(AnalysisSuccess),
    Failure(AnalysisFailure),
}

impl AnalysisResponse {
    pub fn success(market: MarketMeta, analysis: AnalysisPayload, meta: ResponseMeta) -> Self {
        Self::Success(AnalysisSuccess {
            ok: true,
            market,
            analysis,
            meta,
        })
    }

    pub fn failure(error: &SourceError, meta: ResponseMeta) -> Self {
        Self::Failure(AnalysisFailure {
            ok: false,
            error: error.message().to_owned(),
            code: Some(error.code().to_owned()),
            meta,
        })
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn meta(&self) -> &ResponseMeta {
        match self {
            Self::Success(success) => &success.meta,
            Self::Failure(failure) => &failure.meta,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSuccess {
    pub ok: bool,
    pub market: MarketMeta,
    pub analysis: AnalysisPayload,
    pub meta: ResponseMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisFailure {
    pub ok: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub meta: ResponseMeta,
}

/// Echo of the resolved market the analysis ran on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketMeta {
    pub exchange: String,
    pub symbol: String,
    pub timeframe: String,
    pub candle_count: usize,
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub last_close: Option<f64>,
}

impl MarketMeta {
    pub fn from_series(series: &BarSeries) -> Self {
        Self {
            exchange: series.provider.display_name().to_owned(),
            symbol: series.symbol.clone(),
            timeframe: series.timeframe.clone(),
            candle_count: series.len(),
            start: series.first_open_time(),
            end: series.last_open_time(),
            last_close: series.last_close(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub request_id: String,
    pub generated_at: String,
    pub latency_ms: u64,
}

impl ResponseMeta {
    pub fn new(latency_ms: u64) -> Self {
        let now_ms = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
        Self {
            request_id: Uuid::new_v4().to_string(),
            generated_at: format_millis_rfc3339(now_ms),
            latency_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use levelscope_core::{Bar, ProviderId};
    use serde_json::Value;

    fn series() -> BarSeries {
        let bars = vec![
            Bar::new(1_000, 10.0, 11.0, 9.0, 10.5, 3.0).expect("bar"),
            Bar::new(2_000, 10.5, 12.0, 10.0, 11.5, 4.0).expect("bar"),
        ];
        BarSeries::new(ProviderId::Stooq, "AAPL.US", "1d", bars)
    }

    #[test]
    fn market_meta_echoes_series_bounds() {
        let meta = MarketMeta::from_series(&series());
        let value = serde_json::to_value(&meta).expect("serialize");

        assert_eq!(value["exchange"], "Stooq");
        assert_eq!(value["symbol"], "AAPL.US");
        assert_eq!(value["candleCount"], 2);
        assert_eq!(value["start"], 1_000);
        assert_eq!(value["end"], 2_000);
        assert_eq!(value["lastClose"], 11.5);
    }

    #[test]
    fn failure_serializes_with_false_tag_and_message() {
        let error = SourceError::unsupported_timeframe(ProviderId::Stooq, "4h");
        let response = AnalysisResponse::failure(&error, ResponseMeta::new(3));
        let value: Value = serde_json::to_value(&response).expect("serialize");

        assert!(!response.is_ok());
        assert_eq!(value["ok"], false);
        assert_eq!(value["error"], "Unsupported timeframe for Stooq: 4h");
        assert_eq!(value["code"], "source.unsupported_timeframe");
        assert_eq!(value["meta"]["latencyMs"], 3);
    }

    #[test]
    fn request_ids_are_unique_uuids() {
        let first = ResponseMeta::new(0);
        let second = ResponseMeta::new(0);

        assert_ne!(first.request_id, second.request_id);
        assert!(Uuid::parse_str(&first.request_id).is_ok());
        assert!(first.generated_at.ends_with('Z'));
    }
}
