//! Coupon store boundary.
//!
//! This crate defines **only** the store contract and its implementations.
//! No validation, no discount logic, and no HTTP mapping belong here; the
//! service layer owns those.
//!
//! Two adapters implement the contract:
//! - [`pg::PgCouponStore`]: the production Postgres store (sqlx).
//! - [`memory::MemoryCouponStore`]: a deterministic in-memory store for
//!   tests and local wiring without a database.

use std::fmt;

use async_trait::async_trait;
use cpn_domain::{Coupon, NewCoupon};

pub mod memory;
pub mod pg;

pub use memory::MemoryCouponStore;
pub use pg::PgCouponStore;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that a [`CouponStore`] implementation may return.
///
/// Callers treat every variant as an unexpected, opaque server-side
/// failure; the split exists for operators reading logs, not for control
/// flow.
#[derive(Debug)]
pub enum StoreError {
    /// The backend could not be reached (connection, pool, transport).
    Unavailable(String),
    /// A statement failed or a row could not be decoded.
    Query(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "coupon store unavailable: {msg}"),
            StoreError::Query(msg) => write!(f, "coupon store query failed: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

/// Key-value style lookup of coupon records by code.
///
/// Implementations must be object-safe so callers can hold an
/// `Arc<dyn CouponStore>` without knowing the concrete type, and
/// `Send + Sync` because the store is shared across concurrent requests.
#[async_trait]
pub trait CouponStore: Send + Sync {
    /// Return the coupon matching the exact code, or `None` if none exists.
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, StoreError>;

    /// Return all coupons whose code is in the given set.
    ///
    /// Missing codes are simply omitted, never an error.  Order is
    /// whatever the backend provides.
    async fn find_by_code_in(&self, codes: &[String]) -> Result<Vec<Coupon>, StoreError>;

    /// Persist a new coupon, assigning an identifier.
    ///
    /// No uniqueness enforcement beyond what the underlying store
    /// configuration provides.
    async fn save(&self, coupon: NewCoupon) -> Result<Coupon, StoreError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
