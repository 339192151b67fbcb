//! Unified error handling.
//!
//! Provides a unified `AppError` type for every store and catalog operation.
//! Callers convert errors into a toast-style notification with
//! [`AppError::user_message`] and leave prior state untouched: every
//! operation validates before it writes, so a failure never leaves a
//! partially updated store behind.

use bouquet_core::{CartError, PhoneError};
use thiserror::Error;

use crate::catalog::BouquetError;
use crate::catalog::remote::CatalogError;
use crate::config::ConfigError;
use crate::storage::StorageError;
use crate::stores::auth::AuthError;
use crate::stores::orders::OrderError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart validation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Persisting a store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The demo product API failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The bouquet configurator rejected a selection.
    #[error("Bouquet error: {0}")]
    Bouquet(#[from] BouquetError),

    /// Login or session operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout or order operation failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Phone number could not be parsed.
    #[error("Invalid phone number: {0}")]
    Phone(#[from] PhoneError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether the error was caused by the user's input rather than the system.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(
            self,
            Self::Storage(_) | Self::Catalog(_) | Self::Config(_)
        )
    }

    /// Short message for a user-facing notification.
    ///
    /// Internal details (paths, HTTP bodies) are never included.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(_) => "Could not save your changes, please try again".to_string(),
            Self::Catalog(CatalogError::NotFound(_)) | Self::NotFound(_) => {
                "Product not found".to_string()
            }
            Self::Catalog(_) => "Products are unavailable right now".to_string(),
            Self::Config(_) => "The store is misconfigured".to_string(),
            Self::Cart(err) => err.to_string(),
            Self::Bouquet(err) => err.to_string(),
            Self::Auth(err) => err.to_string(),
            Self::Order(err) => err.to_string(),
            Self::Phone(err) => err.to_string(),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
