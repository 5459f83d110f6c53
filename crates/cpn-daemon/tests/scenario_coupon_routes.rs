//! In-process scenario tests for cpn-daemon HTTP endpoints.
//!
//! These tests spin up the Axum router **without** binding a TCP socket.
//! Each test calls `routes::build_router` backed by the in-memory store and
//! drives it via `tower::ServiceExt::oneshot`; no network I/O required.

use std::sync::Arc;

use axum::http::{Request, StatusCode};
use cpn_daemon::{routes, state};
use cpn_domain::{Cents, NewCoupon};
use cpn_store::{CouponStore, MemoryCouponStore};
use http_body_util::BodyExt;
use tower::ServiceExt; // oneshot

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fresh in-memory store plus an AppState wired to it.  The store handle is
/// returned so tests can seed rows directly.
fn make_state() -> (Arc<MemoryCouponStore>, Arc<state::AppState>) {
    let store = Arc::new(MemoryCouponStore::new());
    let st = Arc::new(state::AppState::new(
        Arc::clone(&store) as Arc<dyn CouponStore>
    ));
    (store, st)
}

async fn seed(store: &MemoryCouponStore, code: &str, discount: i64, min: i64) {
    store
        .save(NewCoupon {
            code: code.to_string(),
            discount: Cents::new(discount),
            min_basket_value: Cents::new(min),
        })
        .await
        .expect("seed save failed");
}

fn get(uri: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<axum::body::Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

/// Drive the router with a single request and return (status, body_bytes).
async fn call(
    router: axum::Router,
    req: Request<axum::body::Body>,
) -> (StatusCode, bytes::Bytes) {
    let resp = router.oneshot(req).await.expect("oneshot failed");
    let status = resp.status();
    let body = resp
        .into_body()
        .collect()
        .await
        .expect("body collect failed")
        .to_bytes();
    (status, body)
}

/// Parse body bytes as a `serde_json::Value`.
fn parse_json(b: bytes::Bytes) -> serde_json::Value {
    serde_json::from_slice(&b).expect("body is not valid JSON")
}

// ---------------------------------------------------------------------------
// GET /api/health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_returns_200_ok_true() {
    let (_store, st) = make_state();
    let (status, body) = call(routes::build_router(st), get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    let json = parse_json(body);
    assert_eq!(json["ok"], true);
    assert_eq!(json["service"], "cpn-daemon");
}

// ---------------------------------------------------------------------------
// POST /api/coupons/apply: success paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn apply_discount_smaller_than_value() {
    let (store, st) = make_state();
    seed(&store, "ten", 1_000, 5_000).await;

    let req = post_json(
        "/api/coupons/apply",
        serde_json::json!({"code": "ten", "basket": {"value": "100.00"}}),
    );
    let (status, body) = call(routes::build_router(st), req).await;

    assert_eq!(status, StatusCode::OK);
    let json = parse_json(body);
    assert_eq!(json["value"], "90.00");
    assert_eq!(json["applied_discount"], "10.00");
}

#[tokio::test]
async fn apply_discount_larger_than_value_caps_at_zero() {
    let (store, st) = make_state();
    seed(&store, "ten", 1_000, 100).await;

    let req = post_json(
        "/api/coupons/apply",
        serde_json::json!({"code": "ten", "basket": {"value": "5.00"}}),
    );
    let (status, body) = call(routes::build_router(st), req).await;

    assert_eq!(status, StatusCode::OK);
    let json = parse_json(body);
    assert_eq!(json["value"], "0.00");
    assert_eq!(json["applied_discount"], "5.00");
}

// ---------------------------------------------------------------------------
// POST /api/coupons/apply: 404 / 400 mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn apply_unknown_code_returns_404() {
    let (_store, st) = make_state();

    let req = post_json(
        "/api/coupons/apply",
        serde_json::json!({"code": "nope", "basket": {"value": "100.00"}}),
    );
    let (status, body) = call(routes::build_router(st), req).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse_json(body)["error"], "Coupon not found: nope");
}

#[tokio::test]
async fn apply_negative_basket_returns_400() {
    let (store, st) = make_state();
    seed(&store, "ten", 1_000, 5_000).await;

    let req = post_json(
        "/api/coupons/apply",
        serde_json::json!({"code": "ten", "basket": {"value": "-1.00"}}),
    );
    let (status, body) = call(routes::build_router(st), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse_json(body)["error"], "Basket value cannot be negative");
}

#[tokio::test]
async fn apply_below_minimum_returns_400() {
    let (store, st) = make_state();
    seed(&store, "ten", 1_000, 5_000).await;

    let req = post_json(
        "/api/coupons/apply",
        serde_json::json!({"code": "ten", "basket": {"value": "10.00"}}),
    );
    let (status, body) = call(routes::build_router(st), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        parse_json(body)["error"],
        "Basket value does not meet the minimum required value for this coupon"
    );
}

#[tokio::test]
async fn apply_blank_code_returns_400() {
    let (_store, st) = make_state();

    let req = post_json(
        "/api/coupons/apply",
        serde_json::json!({"code": "  ", "basket": {"value": "100.00"}}),
    );
    let (status, body) = call(routes::build_router(st), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse_json(body)["error"], "coupon code cannot be blank");
}

#[tokio::test]
async fn apply_malformed_value_returns_400() {
    let (store, st) = make_state();
    seed(&store, "ten", 1_000, 0).await;

    let req = post_json(
        "/api/coupons/apply",
        serde_json::json!({"code": "ten", "basket": {"value": "abc"}}),
    );
    let (status, _) = call(routes::build_router(st), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn apply_over_precise_value_returns_400() {
    // Three decimal places would require rounding; the boundary rejects it.
    let (store, st) = make_state();
    seed(&store, "ten", 1_000, 0).await;

    let req = post_json(
        "/api/coupons/apply",
        serde_json::json!({"code": "ten", "basket": {"value": "10.005"}}),
    );
    let (status, _) = call(routes::build_router(st), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// POST /api/coupons: create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_list_roundtrip_lowercases_code() {
    let (_store, st) = make_state();

    let create = post_json(
        "/api/coupons",
        serde_json::json!({
            "code": "SUMMER20",
            "discount": "20.00",
            "min_basket_value": "50.00"
        }),
    );
    let (status, _) = call(routes::build_router(Arc::clone(&st)), create).await;
    assert_eq!(status, StatusCode::OK);

    // The persisted code is lowercased; lookup by the lowercased form.
    let (status, body) = call(
        routes::build_router(Arc::clone(&st)),
        get("/api/coupons?codes=summer20"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let json = parse_json(body);
    let rows = json.as_array().expect("list body is an array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["code"], "summer20");
    assert_eq!(rows[0]["discount"], "20.00");
    assert_eq!(rows[0]["min_basket_value"], "50.00");
    assert!(rows[0]["id"].as_i64().unwrap() >= 1);
}

#[tokio::test]
async fn create_defaults_min_basket_value_to_zero() {
    let (_store, st) = make_state();

    let create = post_json(
        "/api/coupons",
        serde_json::json!({"code": "free", "discount": "1.00"}),
    );
    let (status, _) = call(routes::build_router(Arc::clone(&st)), create).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(
        routes::build_router(Arc::clone(&st)),
        get("/api/coupons?codes=free"),
    )
    .await;
    let json = parse_json(body);
    assert_eq!(json[0]["min_basket_value"], "0.00");
}

#[tokio::test]
async fn create_blank_code_returns_400() {
    let (_store, st) = make_state();

    let req = post_json(
        "/api/coupons",
        serde_json::json!({"code": "", "discount": "1.00"}),
    );
    let (status, body) = call(routes::build_router(st), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse_json(body)["error"], "coupon code cannot be blank");
}

#[tokio::test]
async fn create_negative_discount_returns_400() {
    let (_store, st) = make_state();

    let req = post_json(
        "/api/coupons",
        serde_json::json!({"code": "bad", "discount": "-1.00"}),
    );
    let (status, body) = call(routes::build_router(st), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse_json(body)["error"], "discount cannot be negative");
}

#[tokio::test]
async fn create_malformed_discount_returns_400() {
    let (_store, st) = make_state();

    let req = post_json(
        "/api/coupons",
        serde_json::json!({"code": "bad", "discount": "ten"}),
    );
    let (status, _) = call(routes::build_router(st), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// GET /api/coupons: batch lookup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_without_codes_param_returns_empty_array() {
    let (store, st) = make_state();
    seed(&store, "aaa", 1_000, 0).await;

    let (status, body) = call(routes::build_router(st), get("/api/coupons")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse_json(body), serde_json::json!([]));
}

#[tokio::test]
async fn list_omits_missing_codes() {
    let (store, st) = make_state();
    seed(&store, "aaa", 1_000, 0).await;
    seed(&store, "bbb", 2_000, 0).await;

    let (status, body) = call(
        routes::build_router(st),
        get("/api/coupons?codes=aaa,missing"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let json = parse_json(body);
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["code"], "aaa");
}

// ---------------------------------------------------------------------------
// Unknown routes return 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let (_store, st) = make_state();
    let (status, _) = call(routes::build_router(st), get("/api/does_not_exist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
