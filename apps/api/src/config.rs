//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. The delivery-pricing knobs exist so operations can tune the
//! free radius and charges without a deploy.

use std::env;

use medirush_core::{DeliveryPricing, Money};

/// API server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP listen port
    pub port: u16,

    /// Path to the SQLite database file
    pub database_path: String,

    /// Radius around the pharmacy within which delivery is free
    pub free_delivery_radius_km: f64,

    /// Flat surcharge in paise once the distance exceeds the free radius
    pub distance_surcharge_paise: i64,

    /// Fixed express-delivery charge in paise
    pub express_charge_paise: i64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = AppConfig {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "medirush.db".to_string()),

            free_delivery_radius_km: env::var("FREE_DELIVERY_RADIUS_KM")
                .unwrap_or_else(|_| "2.5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("FREE_DELIVERY_RADIUS_KM".to_string()))?,

            distance_surcharge_paise: env::var("DISTANCE_SURCHARGE_PAISE")
                .unwrap_or_else(|_| "3000".to_string()) // ₹30
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DISTANCE_SURCHARGE_PAISE".to_string()))?,

            express_charge_paise: env::var("EXPRESS_CHARGE_PAISE")
                .unwrap_or_else(|_| "3000".to_string()) // ₹30
                .parse()
                .map_err(|_| ConfigError::InvalidValue("EXPRESS_CHARGE_PAISE".to_string()))?,
        };

        Ok(config)
    }

    /// The delivery pricing the order flow charges with.
    pub fn delivery_pricing(&self) -> DeliveryPricing {
        DeliveryPricing {
            free_radius_km: self.free_delivery_radius_km,
            distance_surcharge: Money::from_paise(self.distance_surcharge_paise),
            express_charge: Money::from_paise(self.express_charge_paise),
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_pricing_mapping() {
        let config = AppConfig {
            port: 8000,
            database_path: "medirush.db".to_string(),
            free_delivery_radius_km: 3.0,
            distance_surcharge_paise: 2500,
            express_charge_paise: 4000,
        };

        let pricing = config.delivery_pricing();
        assert_eq!(pricing.free_radius_km, 3.0);
        assert_eq!(pricing.distance_surcharge.paise(), 2500);
        assert_eq!(pricing.express_charge.paise(), 4000);
    }
}
