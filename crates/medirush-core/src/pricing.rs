//! # Pricing Module
//!
//! Quantity-based discount tiers and line pricing.
//!
//! ## Discount Tiers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Quantity  │  Discount                                                  │
//! │  ────────  │  ────────                                                  │
//! │  ≥ 10      │  15%                                                       │
//! │  5 - 9     │  10%                                                       │
//! │  3 - 4     │   5%                                                       │
//! │  1 - 2     │   0%                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Higher quantity always means a better (or equal) unit price. The tiers are
//! non-overlapping; the highest qualifying tier wins.

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Discount tiers as (minimum quantity, discount percent), highest first.
pub const DISCOUNT_TIERS: [(i64, u32); 3] = [(10, 15), (5, 10), (3, 5)];

/// Returns the quantity-discount percent for a given quantity.
///
/// ## Example
/// ```rust
/// use medirush_core::pricing::quantity_discount_percent;
///
/// assert_eq!(quantity_discount_percent(1), 0);
/// assert_eq!(quantity_discount_percent(4), 5);
/// assert_eq!(quantity_discount_percent(25), 15);
/// ```
pub fn quantity_discount_percent(quantity: i64) -> u32 {
    for (min_qty, percent) in DISCOUNT_TIERS {
        if quantity >= min_qty {
            return percent;
        }
    }
    0
}

/// The priced form of one order line.
///
/// `unit_price` is the amount actually charged per unit after the quantity
/// discount; `discount_amount` is the total saved versus the base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    /// Charged price per unit, post-discount.
    pub unit_price: Money,
    /// Applied discount tier in percent (0, 5, 10 or 15).
    pub discount_percent: u32,
    /// Total discount versus base price for the whole line.
    pub discount_amount: Money,
    /// `unit_price × quantity`.
    pub line_total: Money,
}

/// Prices one line: applies the quantity-discount tier to the base unit price.
///
/// The discounted unit price is rounded to the paisa before the line total is
/// taken, so the stored unit price times the quantity always reproduces the
/// stored line total exactly.
///
/// Quantity must already be validated as positive; this function itself has no
/// error conditions and no side effects.
///
/// ## Example
/// ```rust
/// use medirush_core::money::Money;
/// use medirush_core::pricing::price_line;
///
/// let line = price_line(Money::from_paise(10000), 5); // ₹100.00 × 5
/// assert_eq!(line.unit_price.paise(), 9000);          // ₹90.00 at 10% off
/// assert_eq!(line.line_total.paise(), 45000);         // ₹450.00
/// ```
pub fn price_line(base_unit_price: Money, quantity: i64) -> PricedLine {
    let discount_percent = quantity_discount_percent(quantity);
    let unit_price = base_unit_price.apply_percent_discount(discount_percent);
    let line_total = unit_price.multiply_quantity(quantity);
    let base_total = base_unit_price.multiply_quantity(quantity);

    PricedLine {
        unit_price,
        discount_percent,
        discount_amount: base_total - line_total,
        line_total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(quantity_discount_percent(1), 0);
        assert_eq!(quantity_discount_percent(2), 0);
        assert_eq!(quantity_discount_percent(3), 5);
        assert_eq!(quantity_discount_percent(4), 5);
        assert_eq!(quantity_discount_percent(5), 10);
        assert_eq!(quantity_discount_percent(9), 10);
        assert_eq!(quantity_discount_percent(10), 15);
        assert_eq!(quantity_discount_percent(999), 15);
    }

    #[test]
    fn test_discount_is_monotonic_in_quantity() {
        let mut last = 0;
        for qty in 1..=50 {
            let pct = quantity_discount_percent(qty);
            assert!(pct >= last, "discount dropped at quantity {qty}");
            last = pct;
        }
    }

    #[test]
    fn test_price_line_no_discount() {
        // Base ₹100.00, quantity 1 -> unit ₹100.00, 0%, line ₹100.00
        let line = price_line(Money::from_paise(10000), 1);
        assert_eq!(line.unit_price.paise(), 10000);
        assert_eq!(line.discount_percent, 0);
        assert_eq!(line.discount_amount.paise(), 0);
        assert_eq!(line.line_total.paise(), 10000);
    }

    #[test]
    fn test_price_line_ten_percent() {
        // Base ₹100.00, quantity 5 -> unit ₹90.00, 10%, line ₹450.00
        let line = price_line(Money::from_paise(10000), 5);
        assert_eq!(line.unit_price.paise(), 9000);
        assert_eq!(line.discount_percent, 10);
        assert_eq!(line.discount_amount.paise(), 5000);
        assert_eq!(line.line_total.paise(), 45000);
    }

    #[test]
    fn test_price_line_fifteen_percent() {
        // Base ₹100.00, quantity 10 -> unit ₹85.00, 15%, line ₹850.00
        let line = price_line(Money::from_paise(10000), 10);
        assert_eq!(line.unit_price.paise(), 8500);
        assert_eq!(line.discount_percent, 15);
        assert_eq!(line.discount_amount.paise(), 15000);
        assert_eq!(line.line_total.paise(), 85000);
    }

    #[test]
    fn test_unit_times_quantity_reproduces_line_total() {
        // Rounding happens on the unit price, so the persisted pair
        // (unit_price, quantity) must always reproduce line_total.
        for base in [33, 97, 1099, 2849, 10000] {
            for qty in 1..=12 {
                let line = price_line(Money::from_paise(base), qty);
                assert_eq!(
                    line.unit_price.multiply_quantity(qty),
                    line.line_total,
                    "base={base} qty={qty}"
                );
            }
        }
    }
}
