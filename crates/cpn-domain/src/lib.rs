//! Domain types for the coupon backend.
//!
//! Everything in this crate is pure and deterministic; there is no IO and
//! no randomness.  Monetary amounts use the [`Cents`] fixed-point type; the
//! discount-application rule lives on [`Basket`].

pub mod basket;
pub mod coupon;
pub mod money;

pub use basket::Basket;
pub use coupon::{Coupon, NewCoupon};
pub use money::{cents_from_str, Cents, MoneyError};
