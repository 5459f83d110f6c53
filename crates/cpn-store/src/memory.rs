//! Deterministic in-memory coupon store.
//!
//! Design decisions (kept intentionally simple/deterministic):
//! - Ids are assigned monotonically starting at 1.
//! - Rows live in a `BTreeMap` keyed by id, so iteration order is stable
//!   and `find_by_code` resolves duplicate codes to the earliest saved row.
//! - No uniqueness enforcement on codes, matching the production table.
//!
//! This is the test double for the service and daemon scenario tests; it is
//! also usable for local wiring without a database.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use cpn_domain::{Coupon, NewCoupon};
use tokio::sync::RwLock;

use crate::{CouponStore, StoreError};

// ---------------------------------------------------------------------------
// MemoryCouponStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    rows: BTreeMap<i64, Coupon>,
}

/// In-memory [`CouponStore`] backed by a `tokio::sync::RwLock`.
///
/// Shared across concurrent requests the same way the Postgres pool is:
/// wrap in an `Arc` and clone the handle.
#[derive(Debug, Default)]
pub struct MemoryCouponStore {
    inner: RwLock<Inner>,
}

impl MemoryCouponStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently stored (test helper).
    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.rows.is_empty()
    }
}

#[async_trait]
impl CouponStore for MemoryCouponStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .values()
            .find(|c| c.code == code)
            .cloned())
    }

    async fn find_by_code_in(&self, codes: &[String]) -> Result<Vec<Coupon>, StoreError> {
        let wanted: BTreeSet<&str> = codes.iter().map(String::as_str).collect();
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .values()
            .filter(|c| wanted.contains(c.code.as_str()))
            .cloned()
            .collect())
    }

    async fn save(&self, coupon: NewCoupon) -> Result<Coupon, StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let id = inner.next_id;

        let persisted = Coupon {
            id,
            code: coupon.code,
            discount: coupon.discount,
            min_basket_value: coupon.min_basket_value,
        };
        inner.rows.insert(id, persisted.clone());

        Ok(persisted)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
