//! Behavior of the provider adapters behind the router, observed through a
//! scripted HTTP transport.

use levelscope_tests::*;

#[tokio::test]
async fn stooq_rejects_intraday_timeframe_without_touching_network() {
    let (http, router) = scripted_router(ScriptedHttpClient::default());
    let request = BarsRequest::new("spy", "4h", 100).expect("valid request");

    let error = router.fetch("stooq", request).await.expect_err("must fail");

    assert_eq!(error.kind(), SourceErrorKind::UnsupportedTimeframe);
    assert_eq!(error.to_string(), "Unsupported timeframe for Stooq: 4h");
    assert_eq!(http.call_count(), 0, "no network call for unsupported timeframe");
}

#[tokio::test]
async fn stooq_weekly_bars_are_built_from_five_day_windows() {
    let (_http, router) = scripted_router(
        ScriptedHttpClient::default().respond("s=spy.us&", HttpResponse::ok(stooq_csv(10, 100.0))),
    );
    let request = BarsRequest::new("spy.us", "1w", 10).expect("valid request");

    let routed = router.fetch("stooq", request).await.expect("must fetch");
    let bars = &routed.series.bars;

    assert_eq!(routed.series.timeframe, "1w");
    assert_eq!(bars.len(), 2);
    // Days 0..5 close at 100..104 with high = close + 1.
    assert_eq!(bars[0].open, 99.5);
    assert_eq!(bars[0].high, 105.0);
    assert_eq!(bars[0].low, 99.0);
    assert_eq!(bars[0].close, 104.0);
    assert_eq!(bars[0].volume, (100..105).sum::<usize>() as f64);
    assert_eq!(bars[1].close, 109.0);
}

#[tokio::test]
async fn stooq_falls_back_to_us_listing_for_bare_ticker() {
    let (http, router) = scripted_router(
        ScriptedHttpClient::default()
            .respond("s=aapl&", HttpResponse::ok("No data"))
            .respond("s=aapl.us&", HttpResponse::ok(stooq_csv(30, 180.0))),
    );
    let request = BarsRequest::new("AAPL", "1d", 20).expect("valid request");

    let routed = router.fetch("stooq", request).await.expect("fallback succeeds");

    assert_eq!(routed.provider, ProviderId::Stooq);
    assert_eq!(routed.series.symbol, "AAPL.US");
    assert_eq!(routed.series.len(), 20);
    assert_eq!(routed.series.last_close(), Some(209.0));
    assert_eq!(http.call_count(), 2);
}

#[tokio::test]
async fn stooq_uses_etf_proxy_for_spot_gold() {
    let (http, router) = scripted_router(
        ScriptedHttpClient::default()
            .respond("s=xauusd&", HttpResponse::ok("No data"))
            .respond("s=gld.us&", HttpResponse::ok(stooq_csv(15, 190.0))),
    );
    let request = BarsRequest::new("XAUUSD", "1d", 10).expect("valid request");

    let routed = router.fetch("stooq", request).await.expect("proxy succeeds");

    assert_eq!(routed.series.symbol, "GLD.US");
    let requests = http.recorded_requests();
    assert!(requests
        .iter()
        .all(|r| r.headers.get("accept").map(String::as_str) == Some("text/csv")));
    let urls: Vec<String> = requests.into_iter().map(|r| r.url).collect();
    assert_eq!(urls.len(), 2);
    assert!(urls[1].contains("s=gld.us"));
}

#[tokio::test]
async fn stooq_surfaces_last_error_when_every_candidate_fails() {
    let (http, router) = scripted_router(
        ScriptedHttpClient::default()
            .respond("s=zzzz&", HttpResponse::ok("No data"))
            .respond("s=zzzz.us&", HttpResponse::with_status(404, "")),
    );
    let request = BarsRequest::new("zzzz", "1d", 10).expect("valid request");

    let error = router.fetch("stooq", request).await.expect_err("must fail");

    assert_eq!(error.kind(), SourceErrorKind::UpstreamRequestFailed);
    assert_eq!(error.message(), "Stooq request failed (404).");
    assert_eq!(http.call_count(), 2);
}

#[tokio::test]
async fn binance_hint_selects_spot_or_futures_host() {
    let body = klines_body(&rising_bars(12));
    let (http, router) = scripted_router(
        ScriptedHttpClient::default()
            .respond("//api.binance.com", HttpResponse::ok(body.clone()))
            .respond("fapi.binance.com", HttpResponse::ok(body)),
    );

    let spot = router
        .fetch("binance", BarsRequest::new("eth-usdt", "60", 10).expect("valid"))
        .await
        .expect("spot fetch");
    let perp = router
        .fetch("binance-perp", BarsRequest::new("ETHUSDT", "4H", 10).expect("valid"))
        .await
        .expect("futures fetch");

    assert_eq!(spot.provider, ProviderId::BinanceSpot);
    assert_eq!(perp.provider, ProviderId::BinanceFutures);
    assert_eq!(spot.series.len(), 10, "trimmed to the requested limit");

    let requests = http.recorded_requests();
    assert!(requests
        .iter()
        .all(|r| r.headers.get("accept").map(String::as_str) == Some("application/json")));
    let urls: Vec<String> = requests.into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls[0],
        "https://api.binance.com/api/v3/klines?symbol=ETHUSDT&interval=1h&limit=10"
    );
    assert_eq!(
        urls[1],
        "https://fapi.binance.com/fapi/v1/klines?symbol=ETHUSDT&interval=4h&limit=10"
    );
}

#[tokio::test]
async fn binance_skips_malformed_rows_and_fails_when_none_survive() {
    let (_http, router) = scripted_router(
        ScriptedHttpClient::default()
            .respond("symbol=GOOD", HttpResponse::ok(r#"[[1,"1","2","0.5","1.5","3"],[2,"x"]]"#))
            .respond("symbol=BAD", HttpResponse::ok(r#"[[1,"bad","2","0.5","1.5","3"]]"#))
            .respond("symbol=OBJ", HttpResponse::ok(r#"{"code":-1121,"msg":"Invalid symbol."}"#)),
    );

    let good = router
        .fetch("binance", BarsRequest::new("GOOD", "1h", 10).expect("valid"))
        .await
        .expect("one valid row");
    assert_eq!(good.series.len(), 1);

    let bad = router
        .fetch("binance", BarsRequest::new("BAD", "1h", 10).expect("valid"))
        .await
        .expect_err("no rows survive");
    assert_eq!(bad.kind(), SourceErrorKind::NoDataReturned);
    assert_eq!(bad.message(), "No candles returned from Binance.");

    let object = router
        .fetch("binance", BarsRequest::new("OBJ", "1h", 10).expect("valid"))
        .await
        .expect_err("non-array body");
    assert_eq!(object.kind(), SourceErrorKind::ResponseParseFailed);
}

#[tokio::test]
async fn transport_timeout_is_an_upstream_failure() {
    let (_http, router) = scripted_router(
        ScriptedHttpClient::default()
            .fail("fapi.binance.com", HttpError::timeout("request timeout after 10000ms")),
    );

    let error = router
        .fetch("binance-futures", BarsRequest::new("BTCUSDT", "1h", 100).expect("valid"))
        .await
        .expect_err("must fail");

    assert_eq!(error.kind(), SourceErrorKind::UpstreamRequestFailed);
    assert_eq!(
        error.message(),
        "Binance Futures request failed: no response within 10000ms"
    );
}

#[test]
fn request_limit_is_clamped_to_adapter_bounds() {
    assert_eq!(BarsRequest::new("BTCUSDT", "1h", 1).expect("valid").limit, 10);
    assert_eq!(BarsRequest::new("BTCUSDT", "1h", 50_000).expect("valid").limit, 1_000);
    assert!(BarsRequest::new("   ", "1h", 100).is_err());
}
