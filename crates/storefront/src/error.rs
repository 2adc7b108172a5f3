//! Unified error handling.
//!
//! Provides a unified `AppError` type for embedders (the CLI) that work
//! across storefront modules. Module-level code keeps its specific error
//! types; `AppError` exists so callers can use one `Result` alias.

use thiserror::Error;

use tiffin_core::EmailError;

use crate::account::AddressError;
use crate::catalog::{CatalogError, drafts::DraftError};
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Local key-value storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Catalog could not be loaded or saved.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Admin draft input failed validation.
    #[error("Validation error: {0}")]
    Draft(#[from] DraftError),

    /// Address book operation failed.
    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    /// Checkout or order operation failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// An email address failed to parse.
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_owned());
        assert_eq!(err.to_string(), "Not found: product-123");
    }

    #[test]
    fn test_from_module_errors() {
        let err: AppError = CheckoutError::EmptyCart.into();
        assert!(matches!(err, AppError::Checkout(_)));

        let err: AppError = DraftError::EmptyName.into();
        assert!(matches!(err, AppError::Draft(_)));
    }
}
