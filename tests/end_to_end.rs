//! Full request flow: provider hint in, JSON response envelope out.

use levelscope_analysis::{AnalysisResponse, MarketStructure};
use levelscope_tests::*;
use serde_json::Value;

#[test]
fn rising_series_is_a_bullish_trend_with_higher_highs() {
    let payload = analyze_bars(
        "Binance Futures",
        "BTCUSDT",
        "1h",
        &rising_bars(300),
        &AnalysisConfig::default(),
    );

    assert!(payload.market_regime.contains("Bullish trend"), "{}", payload.market_regime);
    assert_eq!(payload.market_structure, MarketStructure::HigherHighsHigherLows.label());
    assert!(payload.bias.bullish > payload.bias.bearish, "{:?}", payload.bias);
}

#[test]
fn falling_series_is_a_bearish_trend_with_lower_lows() {
    let payload = analyze_bars(
        "Binance",
        "ETHUSDT",
        "1h",
        &falling_bars(300),
        &AnalysisConfig::default(),
    );

    assert!(payload.market_regime.contains("Bearish trend"), "{}", payload.market_regime);
    assert_eq!(payload.market_structure, "Lower highs and lower lows");
    assert!(payload.bias.bearish > payload.bias.bullish, "{:?}", payload.bias);
}

#[tokio::test]
async fn binance_request_round_trips_into_success_envelope() {
    let fixture = rising_bars(300);
    let (http, router) = scripted_router(
        ScriptedHttpClient::default()
            .respond("fapi.binance.com", HttpResponse::ok(klines_body(&fixture))),
    );
    let request = AnalyzeRequest::new(Some("binance-futures"), Some("btc/usdt"), Some("60m"), Some(300));
    let config = AnalysisConfig::default();

    let response = analyze_market(&router, &request, &config).await;

    let AnalysisResponse::Success(success) = &response else {
        panic!("expected success, got {response:?}");
    };
    assert_eq!(
        success.analysis,
        analyze_bars("Binance Futures", "BTCUSDT", "1h", &fixture, &config),
        "routed analysis must equal direct analysis of the same bars"
    );
    assert_eq!(http.call_count(), 1);

    let json = serde_json::to_value(&response).expect("serialize");
    assert_eq!(json["ok"], true);
    assert_eq!(json["market"]["exchange"], "Binance Futures");
    assert_eq!(json["market"]["symbol"], "BTCUSDT");
    assert_eq!(json["market"]["timeframe"], "1h");
    assert_eq!(json["market"]["candleCount"], 300);
    assert_eq!(json["market"]["start"], fixture[0].open_time);
    assert_eq!(json["market"]["end"], fixture[299].open_time);
    assert_eq!(json["market"]["lastClose"], 399.0);

    let analysis = &json["analysis"];
    assert!(analysis["supportResistance"].is_array());
    assert!(analysis["regimeConfidence"].is_u64());
    assert!(analysis["timeHorizonTargets"]["shortTerm"].is_array());
    assert!(analysis["scenarios"]
        .as_array()
        .expect("scenarios")
        .iter()
        .all(|scenario| scenario["probability"].is_null()));
    assert_eq!(analysis["disclaimer"], "Educational tool only - not financial advice.");
}

#[tokio::test]
async fn stooq_weekly_request_resamples_and_falls_back() {
    let (http, router) = scripted_router(
        ScriptedHttpClient::default().respond("s=spy.us&", HttpResponse::ok(stooq_csv(400, 50.0))),
    );
    let request = AnalyzeRequest::new(Some("stooq"), Some("SPY"), Some("1w"), Some(60));

    let response = analyze_market(&router, &request, &AnalysisConfig::default()).await;
    let json = serde_json::to_value(&response).expect("serialize");

    assert_eq!(json["ok"], true, "{json}");
    assert_eq!(json["market"]["exchange"], "Stooq");
    assert_eq!(json["market"]["symbol"], "SPY.US");
    assert_eq!(json["market"]["timeframe"], "1w");
    assert_eq!(json["market"]["candleCount"], 60);
    assert_eq!(json["market"]["lastClose"], 449.0);
    assert_eq!(http.call_count(), 2, "bare symbol first, then the .us listing");
}

#[tokio::test]
async fn unsupported_timeframe_is_reported_in_error_envelope() {
    let (http, router) = scripted_router(ScriptedHttpClient::default());
    let request = AnalyzeRequest::new(Some("stooq"), Some("aapl"), Some("4h"), None);

    let response = analyze_market(&router, &request, &AnalysisConfig::default()).await;
    let json: Value = serde_json::to_value(&response).expect("serialize");

    assert!(!response.is_ok());
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "Unsupported timeframe for Stooq: 4h");
    assert!(json.get("analysis").is_none());
    assert_eq!(http.call_count(), 0);
}

#[tokio::test]
async fn upstream_failure_is_a_message_not_a_panic() {
    let (_http, router) = scripted_router(
        ScriptedHttpClient::default().respond(
            "fapi.binance.com",
            HttpResponse::with_status(500, "Internal error"),
        ),
    );

    let response =
        analyze_market(&router, &AnalyzeRequest::default(), &AnalysisConfig::default()).await;
    let json = serde_json::to_value(&response).expect("serialize");

    assert_eq!(json["ok"], false);
    let message = json["error"].as_str().expect("error string");
    assert!(message.starts_with("Binance Futures request failed (500)"), "{message}");
    assert_eq!(json["code"], "source.upstream_request_failed");
}
