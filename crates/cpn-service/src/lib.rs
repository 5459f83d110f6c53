//! Coupon application service.
//!
//! Orchestrates lookup, validation, and discount application over a
//! [`CouponStore`].  Each operation is a single-shot, stateless-per-call
//! transformation; the basket is owned by the caller and mutated in place.
//!
//! Error signaling preserves the three-way split the HTTP boundary maps to
//! status codes: not-found / invalid-argument / unexpected (store).

use std::fmt;
use std::sync::Arc;

use cpn_domain::{Basket, Cents, Coupon, NewCoupon};
use cpn_store::{CouponStore, StoreError};
use tracing::warn;

// ---------------------------------------------------------------------------
// Validation messages
// ---------------------------------------------------------------------------

const MSG_NEGATIVE_BASKET: &str = "Basket value cannot be negative";
const MSG_BELOW_MINIMUM: &str =
    "Basket value does not meet the minimum required value for this coupon";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors surfaced by [`CouponService`] operations.
#[derive(Debug)]
pub enum ServiceError {
    /// No stored coupon matches the requested code.
    CouponNotFound { code: String },
    /// The basket failed validation against the coupon.
    InvalidBasket { message: &'static str },
    /// The store failed; opaque to clients.
    Store(StoreError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::CouponNotFound { code } => write!(f, "Coupon not found: {code}"),
            ServiceError::InvalidBasket { message } => write!(f, "{message}"),
            ServiceError::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        ServiceError::Store(err)
    }
}

// ---------------------------------------------------------------------------
// CouponService
// ---------------------------------------------------------------------------

/// Stateless orchestration over a shared [`CouponStore`].
#[derive(Clone)]
pub struct CouponService {
    store: Arc<dyn CouponStore>,
}

impl CouponService {
    pub fn new(store: Arc<dyn CouponStore>) -> Self {
        Self { store }
    }

    /// Apply the coupon identified by `code` to `basket`.
    ///
    /// Looks up the coupon, validates the basket against it, then applies
    /// the discount rule.  Validation failures leave the basket untouched.
    pub async fn apply(&self, mut basket: Basket, code: &str) -> Result<Basket, ServiceError> {
        let coupon = self
            .store
            .find_by_code(code)
            .await?
            .ok_or_else(|| ServiceError::CouponNotFound {
                code: code.to_string(),
            })?;

        validate_basket(&basket, &coupon)?;
        basket.apply_discount(coupon.discount);
        Ok(basket)
    }

    /// Create a coupon, lowercasing the code before persisting.
    ///
    /// No validation beyond what the boundary layer enforces.
    pub async fn create_coupon(
        &self,
        code: &str,
        discount: Cents,
        min_basket_value: Cents,
    ) -> Result<Coupon, ServiceError> {
        let coupon = NewCoupon {
            code: code.to_lowercase(),
            discount,
            min_basket_value,
        };
        Ok(self.store.save(coupon).await?)
    }

    /// Batch lookup by codes; empty input or no matches yield an empty list.
    pub async fn get_coupons(&self, codes: &[String]) -> Result<Vec<Coupon>, ServiceError> {
        Ok(self.store.find_by_code_in(codes).await?)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// The negative check runs before the minimum check, so a negative basket
/// is always reported as negative regardless of the coupon's threshold.
fn validate_basket(basket: &Basket, coupon: &Coupon) -> Result<(), ServiceError> {
    if basket.value.is_negative() {
        warn!(
            value = %basket.value,
            "attempted to apply a discount to a basket with a negative value"
        );
        return Err(ServiceError::InvalidBasket {
            message: MSG_NEGATIVE_BASKET,
        });
    }

    if basket.value < coupon.min_basket_value {
        warn!(
            value = %basket.value,
            min = %coupon.min_basket_value,
            code = %coupon.code,
            "basket value is below the coupon minimum"
        );
        return Err(ServiceError::InvalidBasket {
            message: MSG_BELOW_MINIMUM,
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
