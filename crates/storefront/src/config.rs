//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional and defaulted:
//! - `TIFFIN_STORAGE_DIR` - Directory for file-backed local storage
//!   (default: `./data`)
//! - `TIFFIN_DELIVERY_FEE` - Flat checkout delivery fee in major currency
//!   units (default: `50`)
//! - `TIFFIN_CURRENCY` - ISO 4217 currency code for seed data and display
//!   (default: `INR`)

use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;

use tiffin_core::CurrencyCode;

use crate::checkout::DEFAULT_DELIVERY_FEE;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Root directory for file-backed local storage.
    pub storage_dir: PathBuf,
    /// Flat delivery fee added to the order summary at checkout.
    pub delivery_fee: Decimal,
    /// Currency for seed data and price display.
    pub currency: CurrencyCode,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable fails to parse. Unset
    /// variables fall back to defaults, so a bare environment always loads.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage_dir = PathBuf::from(
            lookup("TIFFIN_STORAGE_DIR").unwrap_or_else(|| "./data".to_owned()),
        );

        let delivery_fee = match lookup("TIFFIN_DELIVERY_FEE") {
            None => Decimal::from(DEFAULT_DELIVERY_FEE),
            Some(raw) => parse_delivery_fee(&raw)
                .map_err(|e| ConfigError::InvalidEnvVar("TIFFIN_DELIVERY_FEE".to_owned(), e))?,
        };

        let currency = match lookup("TIFFIN_CURRENCY") {
            None => CurrencyCode::default(),
            Some(raw) => raw
                .parse::<CurrencyCode>()
                .map_err(|e| ConfigError::InvalidEnvVar("TIFFIN_CURRENCY".to_owned(), e))?,
        };

        Ok(Self {
            storage_dir,
            delivery_fee,
            currency,
        })
    }
}

fn parse_delivery_fee(raw: &str) -> Result<Decimal, String> {
    let fee: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| format!("not a decimal amount: {raw}"))?;
    if fee.is_sign_negative() {
        return Err("delivery fee cannot be negative".to_owned());
    }
    Ok(fee)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_bare_environment_uses_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("./data"));
        assert_eq!(config.delivery_fee, Decimal::from(50));
        assert_eq!(config.currency, CurrencyCode::INR);
    }

    #[test]
    fn test_explicit_values() {
        let config = load(&[
            ("TIFFIN_STORAGE_DIR", "/tmp/tiffin"),
            ("TIFFIN_DELIVERY_FEE", "30.50"),
            ("TIFFIN_CURRENCY", "USD"),
        ])
        .unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/tiffin"));
        assert_eq!(config.delivery_fee, Decimal::new(3050, 2));
        assert_eq!(config.currency, CurrencyCode::USD);
    }

    #[test]
    fn test_invalid_fee_rejected() {
        assert!(load(&[("TIFFIN_DELIVERY_FEE", "free")]).is_err());
        assert!(load(&[("TIFFIN_DELIVERY_FEE", "-5")]).is_err());
    }

    #[test]
    fn test_invalid_currency_rejected() {
        let err = load(&[("TIFFIN_CURRENCY", "XYZ")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(name, _) if name == "TIFFIN_CURRENCY"));
    }
}
