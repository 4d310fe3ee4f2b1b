//! End-to-end tests for the HTTP API.
//!
//! Requests go through the full axum router, including JSON extraction and
//! error mapping.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use strategy_analytics::config::load_config_from_string;
use strategy_analytics::infrastructure::http::{
    AppState, MetricsResponse, OptimizeResponse, create_router,
};
use strategy_analytics::strategy::PnlCurve;

fn app() -> Router {
    let config = load_config_from_string(
        r"
pricing:
  risk_free_rate: 0.04
curve:
  intervals: 300
",
    )
    .unwrap();
    create_router(AppState::new(config))
}

async fn post(app: Router, path: &str, body: &Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn market() -> Value {
    json!({"spot": 100.0, "impliedVolatility": 0.3, "daysToExpiry": 45})
}

#[tokio::test]
async fn test_optimized_candidate_replays_through_metrics() {
    let body = json!({
        "market": market(),
        "request": {"sentiment": "neutral", "targetPrice": 100.0, "budget": 5000.0, "ranking": "maxChance"}
    });
    let (status, value) = post(app(), "/api/v1/optimize", &body).await;
    assert_eq!(status, StatusCode::OK);
    let optimized: OptimizeResponse = serde_json::from_value(value).unwrap();
    let best = optimized.candidates.first().unwrap();

    let body = json!({"strategy": best.strategy, "market": market()});
    let (status, value) = post(app(), "/api/v1/metrics", &body).await;
    assert_eq!(status, StatusCode::OK);
    let replayed: MetricsResponse = serde_json::from_value(value).unwrap();

    assert_eq!(replayed.metrics.breakevens, best.metrics.breakevens);
    assert_eq!(replayed.metrics.max_profit, best.metrics.max_profit);
    assert_eq!(replayed.metrics.max_loss, best.metrics.max_loss);
    assert_eq!(replayed.curve, best.curve);
}

#[tokio::test]
async fn test_mark_to_model_curve_differs_before_expiry() {
    let strategy = json!({
        "id": "lc",
        "name": "Long Call",
        "legs": [{"optionType": "call", "action": "buy", "strike": 100.0, "quantity": 1, "premium": 4.0}]
    });
    let curve = json!({"priceMin": 80.0, "priceMax": 120.0, "step": 5.0});

    let expiry = json!({"strategy": strategy, "market": market(), "curve": curve});
    let (status, value) = post(app(), "/api/v1/payoff", &expiry).await;
    assert_eq!(status, StatusCode::OK);
    let at_expiry: PnlCurve = serde_json::from_value(value).unwrap();

    let model = json!({"strategy": strategy, "market": market(), "curve": curve, "mode": "markToModel"});
    let (status, value) = post(app(), "/api/v1/payoff", &model).await;
    assert_eq!(status, StatusCode::OK);
    let marked: PnlCurve = serde_json::from_value(value).unwrap();

    assert_eq!(at_expiry.len(), marked.len());
    let spot = |c: &PnlCurve| c.points.iter().find(|p| p.price == 100.0).unwrap().pnl;
    // Time value keeps the at-the-money option above its expiry payoff
    assert!(spot(&marked) > spot(&at_expiry));
}

#[tokio::test]
async fn test_curve_domain_errors_are_bad_requests() {
    let body = json!({
        "strategy": {
            "id": "lc",
            "name": "Long Call",
            "legs": [{"optionType": "call", "action": "buy", "strike": 100.0, "quantity": 1, "premium": 4.0}]
        },
        "market": market(),
        "curve": {"priceMin": 120.0, "priceMax": 80.0, "step": 1.0}
    });
    let (status, value) = post(app(), "/api/v1/payoff", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn test_premium_below_intrinsic_has_no_volatility() {
    let body = json!({
        "optionType": "call",
        "premium": 5.0,
        "strike": 80.0,
        "market": market()
    });
    let (status, value) = post(app(), "/api/v1/implied-volatility", &body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(value["code"], "NO_VOLATILITY_SOLUTION");
}
