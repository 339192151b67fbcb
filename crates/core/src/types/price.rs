//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., riyals, not halalas).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Multiply the amount by a quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }

    /// Format for display (e.g., "150.00 SAR").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{:.2} {}", self.amount, self.currency_code.symbol())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes the storefront prices in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    SAR,
    AED,
    KWD,
    EGP,
    USD,
}

impl CurrencyCode {
    /// Display symbol used next to amounts.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::SAR => "SAR",
            Self::AED => "AED",
            Self::KWD => "KWD",
            Self::EGP => "EGP",
            Self::USD => "$",
        }
    }

    /// Arabic display symbol used by the RTL storefront.
    #[must_use]
    pub const fn symbol_ar(&self) -> &'static str {
        match self {
            Self::SAR => "ر.س",
            Self::AED => "د.إ",
            Self::KWD => "د.ك",
            Self::EGP => "ج.م",
            Self::USD => "$",
        }
    }

    /// The ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::SAR => "SAR",
            Self::AED => "AED",
            Self::KWD => "KWD",
            Self::EGP => "EGP",
            Self::USD => "USD",
        }
    }
}

impl core::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SAR" => Ok(Self::SAR),
            "AED" => Ok(Self::AED),
            "KWD" => Ok(Self::KWD),
            "EGP" => Ok(Self::EGP),
            "USD" => Ok(Self::USD),
            other => Err(format!("unsupported currency: {other}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_display() {
        let price = Price::new(dec!(150), CurrencyCode::SAR);
        assert_eq!(price.display(), "150.00 SAR");
        assert_eq!(price.to_string(), "150.00 SAR");
    }

    #[test]
    fn test_times() {
        let price = Price::new(dec!(12.5), CurrencyCode::AED);
        assert_eq!(price.times(3), Price::new(dec!(37.5), CurrencyCode::AED));
        assert_eq!(price.times(0), Price::zero(CurrencyCode::AED));
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("sar".parse::<CurrencyCode>().unwrap(), CurrencyCode::SAR);
        assert_eq!(" KWD ".parse::<CurrencyCode>().unwrap(), CurrencyCode::KWD);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_default_currency_is_riyal() {
        assert_eq!(CurrencyCode::default(), CurrencyCode::SAR);
        assert_eq!(CurrencyCode::SAR.symbol_ar(), "ر.س");
    }
}
