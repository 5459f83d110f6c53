//! Fixed-point money type.
//!
//! # Motivation
//!
//! All money amounts in this system use a 1e-2 (cents) fixed-point
//! representation stored as `i64`, matching the two-fractional-digit
//! precision of the persisted columns.  Using raw `i64` for money is
//! error-prone: it allows accidental arithmetic with unrelated integers
//! (row ids, counts) without any compile-time signal.
//!
//! `Cents` wraps the raw `i64` so the type system prevents:
//! - Implicit construction from raw `i64` (no `From<i64>` impl).
//! - Mixing `Cents` with unrelated `i64` values in arithmetic.
//!
//! # Scale
//!
//! 1 currency unit = 100 cents.  Basket values, discounts, and minimum
//! thresholds all use this scale.  Row ids remain plain `i64` and are never
//! implicitly convertible.
//!
//! # Boundary conversion
//!
//! Amounts cross the HTTP boundary as decimal strings (`"100.00"`) and are
//! converted by [`cents_from_str`] without floating-point at any stage.
//! Strings with more than two decimal places are rejected rather than
//! rounded.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

// ---------------------------------------------------------------------------
// Cents newtype
// ---------------------------------------------------------------------------

/// A fixed-point monetary amount at 1e-2 scale (cents).
///
/// 1 currency unit = `Cents(100)`.
///
/// # Construction
///
/// Use [`Cents::new`] for explicit construction from a raw cent count, or
/// [`cents_from_str`] to convert a decimal string deterministically.  There
/// is intentionally no `From<i64>` implementation; callers must be
/// deliberate about when a raw integer represents a monetary amount.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cents(i64);

impl Cents {
    /// Zero monetary amount.
    pub const ZERO: Cents = Cents(0);

    /// Construct a `Cents` from a raw `i64` cent count.
    #[inline]
    pub const fn new(raw: i64) -> Self {
        Cents(raw)
    }

    /// Extract the underlying raw `i64` cent count.
    ///
    /// Use when crossing crate or layer boundaries that require raw
    /// integers (e.g. database columns).
    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// `true` if this amount is non-negative.
    #[inline]
    pub fn is_non_negative(self) -> bool {
        self.0 >= 0
    }

    /// `true` if this amount is strictly negative.
    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

// ---------------------------------------------------------------------------
// Arithmetic operators (closed over Cents)
// ---------------------------------------------------------------------------

impl Add for Cents {
    type Output = Cents;
    #[inline]
    fn add(self, rhs: Cents) -> Cents {
        Cents(self.0 + rhs.0)
    }
}

impl Sub for Cents {
    type Output = Cents;
    #[inline]
    fn sub(self, rhs: Cents) -> Cents {
        Cents(self.0 - rhs.0)
    }
}

impl AddAssign for Cents {
    #[inline]
    fn add_assign(&mut self, rhs: Cents) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Cents {
    #[inline]
    fn sub_assign(&mut self, rhs: Cents) {
        self.0 -= rhs.0;
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let units = self.0 / 100;
        let frac = (self.0 % 100).abs();
        // When |value| < 1 unit and value is negative, units truncates to 0,
        // losing the sign.  Emit "-0" explicitly in that case.
        if self.0 < 0 && units == 0 {
            write!(f, "-{units}.{frac:02}")
        } else {
            write!(f, "{units}.{frac:02}")
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced when converting a decimal string to [`Cents`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// The amount string was empty.
    Empty { field: &'static str },
    /// The amount string could not be parsed as a decimal number.
    Invalid { field: &'static str, raw: String },
    /// The amount had more than 2 decimal places (ambiguous cent conversion).
    TooManyDecimalPlaces { field: &'static str, raw: String },
}

impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyError::Empty { field } => {
                write!(f, "amount field '{field}' is empty")
            }
            MoneyError::Invalid { field, raw } => {
                write!(f, "amount field '{field}' could not be parsed: '{raw}'")
            }
            MoneyError::TooManyDecimalPlaces { field, raw } => {
                write!(
                    f,
                    "amount field '{field}' has more than 2 decimal places: '{raw}'"
                )
            }
        }
    }
}

impl std::error::Error for MoneyError {}

// ---------------------------------------------------------------------------
// Decimal-string conversion
// ---------------------------------------------------------------------------

/// Convert a decimal amount string to [`Cents`] deterministically.
///
/// Rules:
/// - Accepts optional leading `+` or `-`.
/// - Accepts an optional fractional part separated by `.`.
/// - Rejects strings with more than 2 decimal places (would require rounding).
/// - Rejects empty strings, non-numeric characters, or multiple `.` separators.
/// - Does **not** use floating-point at any stage.
pub fn cents_from_str(s: &str, field: &'static str) -> Result<Cents, MoneyError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(MoneyError::Empty { field });
    }

    // Handle optional sign.
    let (negative, digits) = if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    };

    if digits.is_empty() {
        return Err(MoneyError::Invalid {
            field,
            raw: s.to_string(),
        });
    }

    // Split on '.'.
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, f),
        None => (digits, ""),
    };

    // Reject anything that is not pure ASCII digits in either part.
    let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(MoneyError::Invalid {
            field,
            raw: s.to_string(),
        });
    }
    if !all_digits(int_part) || !all_digits(frac_part) {
        return Err(MoneyError::Invalid {
            field,
            raw: s.to_string(),
        });
    }

    if frac_part.len() > 2 {
        return Err(MoneyError::TooManyDecimalPlaces {
            field,
            raw: s.to_string(),
        });
    }

    // Parse integer part.
    let int_val: i64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse::<i64>().map_err(|_| MoneyError::Invalid {
            field,
            raw: s.to_string(),
        })?
    };

    // Pad fractional part to exactly 2 digits, then parse.
    let mut frac_padded = frac_part.to_string();
    while frac_padded.len() < 2 {
        frac_padded.push('0');
    }
    let frac_val: i64 = frac_padded.parse::<i64>().map_err(|_| MoneyError::Invalid {
        field,
        raw: s.to_string(),
    })?;

    let cents = int_val
        .checked_mul(100)
        .and_then(|v| v.checked_add(frac_val))
        .ok_or_else(|| MoneyError::Invalid {
            field,
            raw: s.to_string(),
        })?;

    Ok(Cents::new(if negative { -cents } else { cents }))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
