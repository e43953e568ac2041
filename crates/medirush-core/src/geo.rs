//! # Geo Module
//!
//! Great-circle distance between customer and pharmacy, and the delivery
//! surcharge policy derived from it.
//!
//! ## Surcharge Policy
//! Delivery within `free_radius_km` of the pharmacy is free. Beyond that a
//! single flat surcharge applies, regardless of how far beyond. Express
//! delivery adds a fixed charge on top. Both amounts and the radius are
//! configuration, not code.

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Mean Earth radius in kilometers, as used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculates the great-circle distance in kilometers between two
/// coordinates using the haversine formula, rounded to 2 decimals.
///
/// Pure math; never fails for finite inputs. Coordinate validation happens
/// before this stage.
///
/// ## Example
/// ```rust
/// use medirush_core::geo::haversine_km;
///
/// // One degree of latitude is ~111.19 km
/// assert_eq!(haversine_km(0.0, 0.0, 1.0, 0.0), 111.19);
/// assert_eq!(haversine_km(24.57, 80.83, 24.57, 80.83), 0.0);
/// ```
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    round2(EARTH_RADIUS_KM * c)
}

/// Rounds to 2 decimal places. Distances are an observable part of the order
/// record, so the rounding point is fixed here rather than left to callers.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// Delivery Pricing
// =============================================================================

/// Delivery pricing knobs.
///
/// Defaults mirror the production configuration: 2.5 km free radius, ₹30 flat
/// distance surcharge, ₹30 express charge. All three are overridable through
/// the server configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPricing {
    /// Radius around the pharmacy within which delivery is free.
    pub free_radius_km: f64,
    /// Flat surcharge once the distance exceeds the free radius.
    pub distance_surcharge: Money,
    /// Fixed extra charge for express delivery.
    pub express_charge: Money,
}

impl Default for DeliveryPricing {
    fn default() -> Self {
        DeliveryPricing {
            free_radius_km: 2.5,
            distance_surcharge: Money::from_rupees(30),
            express_charge: Money::from_rupees(30),
        }
    }
}

impl DeliveryPricing {
    /// Returns the distance surcharge for a delivery over `distance_km`.
    ///
    /// ## Example
    /// ```rust
    /// use medirush_core::geo::DeliveryPricing;
    ///
    /// let pricing = DeliveryPricing::default();
    /// assert!(pricing.surcharge_for(1.0).is_zero());
    /// assert_eq!(pricing.surcharge_for(5.0).paise(), 3000);
    /// ```
    pub fn surcharge_for(&self, distance_km: f64) -> Money {
        if distance_km > self.free_radius_km {
            self.distance_surcharge
        } else {
            Money::zero()
        }
    }

    /// Returns the express charge if express delivery was requested.
    pub fn express_charge_for(&self, is_express: bool) -> Money {
        if is_express {
            self.express_charge
        } else {
            Money::zero()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_zero_for_same_point() {
        assert_eq!(haversine_km(24.5794, 80.8320, 24.5794, 80.8320), 0.0);
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        // 1 degree of latitude = R * pi/180 = 111.19 km (2 dp)
        assert_eq!(haversine_km(0.0, 0.0, 1.0, 0.0), 111.19);
    }

    #[test]
    fn test_haversine_half_circumference() {
        // Antipodal points along the equator: R * pi
        assert_eq!(haversine_km(0.0, 0.0, 0.0, 180.0), 20015.09);
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let d1 = haversine_km(24.5794, 80.8320, 24.5683, 80.8406);
        let d2 = haversine_km(24.5683, 80.8406, 24.5794, 80.8320);
        assert_eq!(d1, d2);
        assert!(d1 > 0.0);
    }

    #[test]
    fn test_surcharge_inside_free_radius() {
        let pricing = DeliveryPricing::default();
        assert_eq!(pricing.surcharge_for(1.0), Money::zero());
        // The boundary itself is still free
        assert_eq!(pricing.surcharge_for(2.5), Money::zero());
    }

    #[test]
    fn test_surcharge_beyond_free_radius() {
        let pricing = DeliveryPricing::default();
        assert_eq!(pricing.surcharge_for(5.0).paise(), 3000);
        assert_eq!(pricing.surcharge_for(50.0).paise(), 3000);
    }

    #[test]
    fn test_express_charge() {
        let pricing = DeliveryPricing::default();
        assert_eq!(pricing.express_charge_for(false), Money::zero());
        assert_eq!(pricing.express_charge_for(true).paise(), 3000);
    }
}
