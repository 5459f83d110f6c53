//! Axum router and all HTTP handlers for cpn-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers.  All handlers are `pub(crate)` so the scenario tests
//! in `tests/` can compose the router directly.
//!
//! Status mapping: coupon not found → 404, invalid argument (including
//! boundary validation failures) → 400, store failure → 500, success → 200.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use cpn_domain::{cents_from_str, Basket, Cents};
use cpn_service::ServiceError;
use tracing::{error, info, warn};

use crate::{
    api_types::{
        ApplyRequest, BasketResponse, CouponResponse, CreateCouponRequest, ErrorResponse,
        HealthResponse, ListQuery,
    },
    state::AppState,
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (tracing) are **not** applied here; `main.rs` attaches
/// them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/coupons", post(create_coupon).get(get_coupons))
        .route("/api/coupons/apply", post(apply))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// GET /api/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service,
            version: st.build.version,
        }),
    )
}

// ---------------------------------------------------------------------------
// POST /api/coupons/apply
// ---------------------------------------------------------------------------

pub(crate) async fn apply(
    State(st): State<Arc<AppState>>,
    Json(req): Json<ApplyRequest>,
) -> Response {
    info!(code = %req.code, "applying coupon");

    if req.code.trim().is_empty() {
        return bad_request("coupon code cannot be blank");
    }
    let value = match cents_from_str(&req.basket.value, "value") {
        Ok(v) => v,
        Err(err) => return bad_request(&err.to_string()),
    };

    match st.service.apply(Basket::new(value), &req.code).await {
        Ok(basket) => {
            info!(code = %req.code, "successfully applied coupon");
            (StatusCode::OK, Json(BasketResponse::from_basket(&basket))).into_response()
        }
        Err(err) => service_error_response(&err),
    }
}

// ---------------------------------------------------------------------------
// POST /api/coupons
// ---------------------------------------------------------------------------

pub(crate) async fn create_coupon(
    State(st): State<Arc<AppState>>,
    Json(req): Json<CreateCouponRequest>,
) -> Response {
    if req.code.trim().is_empty() {
        return bad_request("coupon code cannot be blank");
    }

    let discount = match cents_from_str(&req.discount, "discount") {
        Ok(v) => v,
        Err(err) => return bad_request(&err.to_string()),
    };
    let min_basket_value = match req.min_basket_value.as_deref() {
        Some(raw) => match cents_from_str(raw, "min_basket_value") {
            Ok(v) => v,
            Err(err) => return bad_request(&err.to_string()),
        },
        None => Cents::ZERO,
    };

    // Data-model invariants enforced at the boundary: a coupon's discount
    // and threshold are non-negative amounts.
    if discount.is_negative() {
        return bad_request("discount cannot be negative");
    }
    if min_basket_value.is_negative() {
        return bad_request("min_basket_value cannot be negative");
    }

    match st
        .service
        .create_coupon(&req.code, discount, min_basket_value)
        .await
    {
        Ok(coupon) => {
            info!(code = %coupon.code, id = coupon.id, "coupon created");
            StatusCode::OK.into_response()
        }
        Err(err) => service_error_response(&err),
    }
}

// ---------------------------------------------------------------------------
// GET /api/coupons
// ---------------------------------------------------------------------------

pub(crate) async fn get_coupons(
    State(st): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Response {
    let codes = query.codes();

    match st.service.get_coupons(&codes).await {
        Ok(coupons) => {
            let body: Vec<CouponResponse> =
                coupons.iter().map(CouponResponse::from_coupon).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => service_error_response(&err),
    }
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

fn bad_request(message: &str) -> Response {
    warn!("invalid request: {message}");
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Translate a service error into the documented status mapping.  Store
/// failures are surfaced as an opaque 500; the detail goes to the log only.
fn service_error_response(err: &ServiceError) -> Response {
    match err {
        ServiceError::CouponNotFound { .. } => {
            warn!("coupon not found: {err}");
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
        ServiceError::InvalidBasket { .. } => {
            warn!("invalid argument: {err}");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
        ServiceError::Store(_) => {
            error!("unexpected store error: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "internal error".to_string(),
                }),
            )
                .into_response()
        }
    }
}
