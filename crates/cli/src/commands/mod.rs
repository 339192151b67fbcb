//! Subcommand implementations.

pub mod account;
pub mod bouquet;
pub mod cart;
pub mod catalog;
pub mod favorites;
pub mod orders;

use bouquet_storefront::AppError;
use thiserror::Error;

/// Errors a command can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    /// A store or catalog operation failed.
    #[error(transparent)]
    App(#[from] AppError),

    /// Output could not be encoded.
    #[error("could not encode output: {0}")]
    Json(#[from] serde_json::Error),

    /// An argument could not be interpreted.
    #[error("{0}")]
    Usage(String),
}

impl CliError {
    /// Message shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::App(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

impl From<bouquet_storefront::catalog::BouquetError> for CliError {
    fn from(err: bouquet_storefront::catalog::BouquetError) -> Self {
        Self::App(err.into())
    }
}

impl From<bouquet_storefront::catalog::remote::CatalogError> for CliError {
    fn from(err: bouquet_storefront::catalog::remote::CatalogError) -> Self {
        Self::App(err.into())
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
