//! Postgres-backed coupon store (sqlx).
//!
//! Connection and migration helpers live here alongside the adapter so the
//! daemon bootstrap has a single import.  Amounts are stored as integer
//! cents (`bigint`); conversion to [`Cents`] happens at this boundary.

use anyhow::{Context, Result};
use async_trait::async_trait;
use cpn_domain::{Cents, Coupon, NewCoupon};
use sqlx::{postgres::PgPoolOptions, PgPool, Row};

use crate::{CouponStore, StoreError};

pub const ENV_DB_URL: &str = "CPN_DATABASE_URL";

/// Connect to Postgres using CPN_DATABASE_URL.
pub async fn connect_from_env() -> Result<PgPool> {
    let url =
        std::env::var(ENV_DB_URL).with_context(|| format!("missing env var {ENV_DB_URL}"))?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&url)
        .await
        .context("failed to connect to Postgres")?;

    Ok(pool)
}

/// Run embedded SQLx migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("db migrate failed")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// PgCouponStore
// ---------------------------------------------------------------------------

/// Production [`CouponStore`] backed by a shared [`PgPool`].
#[derive(Clone, Debug)]
pub struct PgCouponStore {
    pool: PgPool,
}

impl PgCouponStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CouponStore for PgCouponStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, StoreError> {
        let row = sqlx::query(
            r#"
            select id, code, discount_cents, min_basket_value_cents
            from coupons
            where code = $1
            order by id
            limit 1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.map(|r| coupon_from_row(&r)).transpose()
    }

    async fn find_by_code_in(&self, codes: &[String]) -> Result<Vec<Coupon>, StoreError> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r#"
            select id, code, discount_cents, min_basket_value_cents
            from coupons
            where code = any($1)
            order by id
            "#,
        )
        .bind(codes)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        rows.iter().map(coupon_from_row).collect()
    }

    async fn save(&self, coupon: NewCoupon) -> Result<Coupon, StoreError> {
        let row = sqlx::query(
            r#"
            insert into coupons (code, discount_cents, min_basket_value_cents)
            values ($1, $2, $3)
            returning id
            "#,
        )
        .bind(&coupon.code)
        .bind(coupon.discount.raw())
        .bind(coupon.min_basket_value.raw())
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;

        let id: i64 = row.try_get("id").map_err(store_error)?;

        Ok(Coupon {
            id,
            code: coupon.code,
            discount: coupon.discount,
            min_basket_value: coupon.min_basket_value,
        })
    }
}

// ---------------------------------------------------------------------------
// Row mapping / error mapping
// ---------------------------------------------------------------------------

fn coupon_from_row(row: &sqlx::postgres::PgRow) -> Result<Coupon, StoreError> {
    Ok(Coupon {
        id: row.try_get("id").map_err(store_error)?,
        code: row.try_get("code").map_err(store_error)?,
        discount: Cents::new(row.try_get("discount_cents").map_err(store_error)?),
        min_basket_value: Cents::new(
            row.try_get("min_basket_value_cents").map_err(store_error)?,
        ),
    })
}

fn store_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            StoreError::Unavailable(err.to_string())
        }
        other => StoreError::Query(other.to_string()),
    }
}
