//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    Every amount is stored as i64 paise (₹1.00 = 100 paise).            │
//! │    The 2-decimal rounding the pricing rules require is then exact:      │
//! │    an amount in paise IS the amount rounded to 2 decimals.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use medirush_core::money::Money;
//!
//! // Create from paise (preferred)
//! let price = Money::from_paise(2050); // ₹20.50
//!
//! // Arithmetic operations
//! let doubled = price * 2;                        // ₹41.00
//! let total = price + Money::from_paise(500);     // ₹25.50
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in paise, the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and adjustments
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization (wire format is
///   the raw paise integer)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ## Example
    /// ```rust
    /// use medirush_core::money::Money;
    ///
    /// let price = Money::from_paise(2050); // Represents ₹20.50
    /// assert_eq!(price.paise(), 2050);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// ## Example
    /// ```rust
    /// use medirush_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees(30).paise(), 3000);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use medirush_core::money::Money;
    ///
    /// let unit_price = Money::from_paise(2800); // ₹28.00
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.paise(), 8400); // ₹84.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Returns the given percentage share of this amount, rounded half-up
    /// to the nearest paisa.
    ///
    /// ## Implementation
    /// Integer math in i128: `(amount * percent + 50) / 100`.
    /// The +50 provides rounding (50/100 = 0.5); i128 prevents overflow on
    /// large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use medirush_core::money::Money;
    ///
    /// let base = Money::from_paise(10000); // ₹100.00
    /// assert_eq!(base.percentage(15).paise(), 1500); // ₹15.00
    /// ```
    pub fn percentage(&self, percent: u32) -> Money {
        let share = (self.0 as i128 * percent as i128 + 50) / 100;
        Money::from_paise(share as i64)
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## Example
    /// ```rust
    /// use medirush_core::money::Money;
    ///
    /// let base = Money::from_paise(10000);              // ₹100.00
    /// let discounted = base.apply_percent_discount(10); // 10% off
    /// assert_eq!(discounted.paise(), 9000);             // ₹90.00
    /// ```
    pub fn apply_percent_discount(&self, percent: u32) -> Money {
        *self - self.percentage(percent)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. API consumers format the raw paise value.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(2050);
        assert_eq!(money.paise(), 2050);
        assert_eq!(money.rupees(), 20);
        assert_eq!(money.paise_part(), 50);
    }

    #[test]
    fn test_from_rupees() {
        assert_eq!(Money::from_rupees(30).paise(), 3000);
        assert_eq!(Money::from_rupees(-5).paise(), -500);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_paise(2050)), "₹20.50");
        assert_eq!(format!("{}", Money::from_paise(500)), "₹5.00");
        assert_eq!(format!("{}", Money::from_paise(-550)), "-₹5.50");
        assert_eq!(format!("{}", Money::from_paise(0)), "₹0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(500);

        assert_eq!((a + b).paise(), 1500);
        assert_eq!((a - b).paise(), 500);
        let result: Money = a * 3;
        assert_eq!(result.paise(), 3000);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        // ₹0.33 at 5% = 1.65 paise -> 2 paise
        assert_eq!(Money::from_paise(33).percentage(5).paise(), 2);
        // ₹1.00 at 15% = 15 paise exactly
        assert_eq!(Money::from_paise(100).percentage(15).paise(), 15);
    }

    #[test]
    fn test_percent_discount() {
        let base = Money::from_paise(10000); // ₹100.00
        assert_eq!(base.apply_percent_discount(0).paise(), 10000);
        assert_eq!(base.apply_percent_discount(10).paise(), 9000);
        assert_eq!(base.apply_percent_discount(15).paise(), 8500);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_paise(100);
        assert!(positive.is_positive());

        let negative = Money::from_paise(-100);
        assert!(negative.is_negative());
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_paise(2800);
        assert_eq!(unit_price.multiply_quantity(3).paise(), 8400);
    }
}
