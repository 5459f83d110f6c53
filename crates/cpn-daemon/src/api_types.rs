//! Request and response types for all cpn-daemon HTTP endpoints.
//!
//! These types are `Serialize + Deserialize` so they can be JSON-encoded
//! by Axum and decoded by tests.  No business logic lives here; monetary
//! amounts cross the wire as decimal strings (`"100.00"`) and are converted
//! to integer cents at the handler boundary.

use cpn_domain::{Basket, Coupon};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// /api/health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// Error body (400 / 404 / 500)
// ---------------------------------------------------------------------------

/// Response body when a request is refused or fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ---------------------------------------------------------------------------
// POST /api/coupons/apply
// ---------------------------------------------------------------------------

/// Inbound basket shape: just the current value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketPayload {
    /// Decimal string, e.g. `"100.00"`.
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyRequest {
    pub code: String,
    pub basket: BasketPayload,
}

/// Outbound basket after a successful application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketResponse {
    pub value: String,
    pub applied_discount: Option<String>,
}

impl BasketResponse {
    pub fn from_basket(basket: &Basket) -> Self {
        Self {
            value: basket.value.to_string(),
            applied_discount: basket.applied_discount.map(|d| d.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// POST /api/coupons
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCouponRequest {
    pub code: String,
    /// Decimal string; must be non-negative.
    pub discount: String,
    /// Decimal string; defaults to `"0.00"` when absent.
    #[serde(default)]
    pub min_basket_value: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /api/coupons
// ---------------------------------------------------------------------------

/// Query parameters for the batch lookup: `?codes=aaa,bbb`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub codes: Option<String>,
}

impl ListQuery {
    /// Split the comma-separated `codes` parameter; blank entries are
    /// dropped.  Absent or empty parameter yields an empty list.
    pub fn codes(&self) -> Vec<String> {
        self.codes
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponResponse {
    pub id: i64,
    pub code: String,
    pub discount: String,
    pub min_basket_value: String,
}

impl CouponResponse {
    pub fn from_coupon(coupon: &Coupon) -> Self {
        Self {
            id: coupon.id,
            code: coupon.code.clone(),
            discount: coupon.discount.to_string(),
            min_basket_value: coupon.min_basket_value.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
