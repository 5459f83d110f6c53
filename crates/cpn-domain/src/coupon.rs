//! Coupon records.
//!
//! A coupon is a named discount rule: an absolute discount amount and a
//! minimum qualifying basket value.  Coupons are immutable once persisted;
//! the store assigns the id.

use crate::money::Cents;

// ---------------------------------------------------------------------------
// Coupon (persisted)
// ---------------------------------------------------------------------------

/// A persisted coupon, retrieved by code or batch of codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coupon {
    /// Store-assigned identifier.
    pub id: i64,
    /// Unique string identifier, lowercased at creation.
    pub code: String,
    /// Absolute discount amount (not a percentage).
    pub discount: Cents,
    /// Basket value must be >= this to qualify.
    pub min_basket_value: Cents,
}

// ---------------------------------------------------------------------------
// NewCoupon (not yet persisted)
// ---------------------------------------------------------------------------

/// A coupon that has not been persisted yet (no id).
///
/// `CouponStore::save` consumes this and returns the [`Coupon`] with the
/// assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCoupon {
    pub code: String,
    pub discount: Cents,
    pub min_basket_value: Cents,
}
