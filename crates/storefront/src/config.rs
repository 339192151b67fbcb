//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `BOUQUET_DATA_DIR` - Directory for persisted stores (default: `.bouquet`)
//! - `BOUQUET_STORAGE_SCOPE` - Key prefix for persisted stores (default: `bouquet`)
//! - `BOUQUET_CURRENCY` - Currency prices are shown in (default: `SAR`)
//! - `BOUQUET_DELIVERY_FEE` - Flat delivery fee (default: 25)
//! - `BOUQUET_FREE_DELIVERY_OVER` - Subtotal from which delivery is free (default: 300)
//! - `BOUQUET_CATALOG_URL` - Demo product API base URL (default: `https://dummyjson.com`)
//! - `BOUQUET_CATALOG_CACHE_SECS` - Demo product API cache TTL (default: 300)
//! - `BOUQUET_DEMO_OTP` - Verification code accepted by the mock login (default: 1234)
//! - `BOUQUET_OTP_TTL_SECS` - How long a verification code stays valid (default: 300)
//! - `BOUQUET_LOG_FORMAT` - `pretty` or `json` (default: `pretty`)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use bouquet_core::CurrencyCode;
use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_DATA_DIR: &str = ".bouquet";
const DEFAULT_SCOPE: &str = "bouquet";
const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com";
const DEFAULT_DEMO_OTP: &str = "1234";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory holding one JSON file per persisted key
    pub data_dir: PathBuf,
    /// Prefix applied to every storage key
    pub storage_scope: String,
    /// Currency all catalog prices are in
    pub currency: CurrencyCode,
    /// Delivery pricing
    pub delivery: DeliveryConfig,
    /// Demo product API client settings
    pub catalog: RemoteCatalogConfig,
    /// Mock login settings
    pub auth: AuthConfig,
    /// Log output format
    pub log_format: LogFormat,
}

/// Delivery fee rules applied at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryConfig {
    /// Flat fee charged per order
    pub fee: Decimal,
    /// Orders with a subtotal at or above this ship free
    pub free_over: Decimal,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            fee: Decimal::from(25),
            free_over: Decimal::from(300),
        }
    }
}

impl DeliveryConfig {
    /// Fee for an order with the given subtotal.
    #[must_use]
    pub fn fee_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal >= self.free_over {
            Decimal::ZERO
        } else {
            self.fee
        }
    }
}

/// Demo product API configuration.
#[derive(Debug, Clone)]
pub struct RemoteCatalogConfig {
    /// API base URL
    pub base_url: Url,
    /// Response cache time-to-live
    pub cache_ttl: Duration,
}

/// Mock phone login configuration.
///
/// Implements `Debug` manually to redact the verification code.
#[derive(Clone)]
pub struct AuthConfig {
    /// The code every verification request accepts
    pub demo_code: SecretString,
    /// How long an issued code stays valid
    pub code_ttl: Duration,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("demo_code", &"[REDACTED]")
            .field("code_ttl", &self.code_ttl)
            .finish()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `pretty` or `json`, got `{other}`")),
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            storage_scope: DEFAULT_SCOPE.to_string(),
            currency: CurrencyCode::default(),
            delivery: DeliveryConfig::default(),
            catalog: RemoteCatalogConfig {
                base_url: default_catalog_url(),
                cache_ttl: Duration::from_secs(300),
            },
            auth: AuthConfig {
                demo_code: SecretString::from(DEFAULT_DEMO_OTP),
                code_ttl: Duration::from_secs(300),
            },
            log_format: LogFormat::default(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let data_dir = lookup("BOUQUET_DATA_DIR").map_or(defaults.data_dir, PathBuf::from);
        let storage_scope = lookup("BOUQUET_STORAGE_SCOPE")
            .map(|scope| scope.trim().to_string())
            .unwrap_or(defaults.storage_scope);
        if storage_scope.is_empty()
            || !storage_scope
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::InvalidEnvVar(
                "BOUQUET_STORAGE_SCOPE".to_string(),
                "must be non-empty and contain only letters, digits, `-` or `_`".to_string(),
            ));
        }

        let currency = parse_or(&lookup, "BOUQUET_CURRENCY", defaults.currency)?;
        let delivery = DeliveryConfig {
            fee: parse_or(&lookup, "BOUQUET_DELIVERY_FEE", defaults.delivery.fee)?,
            free_over: parse_or(
                &lookup,
                "BOUQUET_FREE_DELIVERY_OVER",
                defaults.delivery.free_over,
            )?,
        };

        let catalog = RemoteCatalogConfig {
            base_url: parse_or(&lookup, "BOUQUET_CATALOG_URL", defaults.catalog.base_url)?,
            cache_ttl: Duration::from_secs(parse_or(&lookup, "BOUQUET_CATALOG_CACHE_SECS", 300)?),
        };

        let auth = AuthConfig {
            demo_code: lookup("BOUQUET_DEMO_OTP").map_or(defaults.auth.demo_code, SecretString::from),
            code_ttl: Duration::from_secs(parse_or(&lookup, "BOUQUET_OTP_TTL_SECS", 300)?),
        };

        let log_format = parse_or(&lookup, "BOUQUET_LOG_FORMAT", defaults.log_format)?;

        Ok(Self {
            data_dir,
            storage_scope,
            currency,
            delivery,
            catalog,
            auth,
            log_format,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn default_catalog_url() -> Url {
    Url::parse(DEFAULT_CATALOG_URL).expect("default catalog URL is valid")
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use rust_decimal_macros::dec;
    use secrecy::ExposeSecret;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".bouquet"));
        assert_eq!(config.storage_scope, "bouquet");
        assert_eq!(config.currency, CurrencyCode::SAR);
        assert_eq!(config.delivery, DeliveryConfig::default());
        assert_eq!(config.catalog.base_url.as_str(), "https://dummyjson.com/");
        assert_eq!(config.catalog.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.auth.demo_code.expose_secret(), "1234");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("BOUQUET_DATA_DIR", "/tmp/flowers"),
            ("BOUQUET_STORAGE_SCOPE", "shop-2"),
            ("BOUQUET_CURRENCY", "aed"),
            ("BOUQUET_DELIVERY_FEE", "15.5"),
            ("BOUQUET_FREE_DELIVERY_OVER", "200"),
            ("BOUQUET_CATALOG_URL", "http://localhost:8080"),
            ("BOUQUET_CATALOG_CACHE_SECS", "60"),
            ("BOUQUET_DEMO_OTP", "9876"),
            ("BOUQUET_LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/flowers"));
        assert_eq!(config.storage_scope, "shop-2");
        assert_eq!(config.currency, CurrencyCode::AED);
        assert_eq!(config.delivery.fee, dec!(15.5));
        assert_eq!(config.delivery.free_over, dec!(200));
        assert_eq!(config.catalog.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.catalog.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.auth.demo_code.expose_secret(), "9876");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("BOUQUET_CURRENCY", "XYZ"),
            ("BOUQUET_DELIVERY_FEE", "cheap"),
            ("BOUQUET_CATALOG_URL", "not a url"),
            ("BOUQUET_CATALOG_CACHE_SECS", "-1"),
            ("BOUQUET_LOG_FORMAT", "yaml"),
            ("BOUQUET_STORAGE_SCOPE", "../etc"),
            ("BOUQUET_STORAGE_SCOPE", ""),
        ] {
            let err = config_from(&[(key, value)]).unwrap_err();
            assert!(
                matches!(&err, ConfigError::InvalidEnvVar(var, _) if var == key),
                "{key}={value} should be rejected, got {err}"
            );
        }
    }

    #[test]
    fn test_delivery_fee_threshold() {
        let delivery = DeliveryConfig::default();
        assert_eq!(delivery.fee_for(dec!(299.99)), dec!(25));
        assert_eq!(delivery.fee_for(dec!(300)), Decimal::ZERO);
    }

    #[test]
    fn test_auth_config_debug_redacts_code() {
        let config = AuthConfig {
            demo_code: SecretString::from("super_secret_code"),
            code_ttl: Duration::from_secs(30),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_code"));
    }
}
