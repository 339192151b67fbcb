//! Mobile phone number type.
//!
//! Customers sign in with their mobile number, so this is the storefront's
//! account identifier (there are no email accounts).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains something other than digits, spaces, dashes or a leading +.
    #[error("phone number may only contain digits")]
    InvalidCharacter,
    /// The number is not a Saudi mobile number.
    #[error("phone number must be a Saudi mobile number starting with 05")]
    NotMobile,
    /// The subscriber part has the wrong number of digits.
    #[error("phone number must have {expected} digits after the 5 prefix")]
    WrongLength {
        /// Expected digit count after the leading 5.
        expected: usize,
    },
}

/// A Saudi mobile phone number, normalised to `+9665XXXXXXXX`.
///
/// ## Accepted forms
///
/// - `05XXXXXXXX`
/// - `5XXXXXXXX`
/// - `9665XXXXXXXX`, `009665XXXXXXXX` or `+9665XXXXXXXX`
///
/// Spaces and dashes are ignored.
///
/// ## Examples
///
/// ```
/// use bouquet_core::PhoneNumber;
///
/// let phone = PhoneNumber::parse("050 123 4567").unwrap();
/// assert_eq!(phone.as_str(), "+966501234567");
/// assert_eq!(phone.local(), "0501234567");
///
/// assert!(PhoneNumber::parse("").is_err());
/// assert!(PhoneNumber::parse("0112345678").is_err()); // landline
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Digits after the leading `5`.
    pub const SUBSCRIBER_DIGITS: usize = 8;

    const COUNTRY_PREFIX: &'static str = "+966";

    /// Parse a `PhoneNumber` from user input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains non-digit characters,
    /// is not a mobile number, or has the wrong length.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }

        let (plus, rest) = trimmed
            .strip_prefix('+')
            .map_or((false, trimmed), |rest| (true, rest));

        let mut digits = String::with_capacity(rest.len());
        for c in rest.chars() {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' => {}
                _ => return Err(PhoneError::InvalidCharacter),
            }
        }

        let national = if let Some(rest) = digits.strip_prefix("00966") {
            rest
        } else if let Some(rest) = digits.strip_prefix("966") {
            rest
        } else if plus {
            return Err(PhoneError::NotMobile);
        } else if let Some(rest) = digits.strip_prefix('0') {
            rest
        } else {
            digits.as_str()
        };

        let subscriber = national.strip_prefix('5').ok_or(PhoneError::NotMobile)?;
        if subscriber.len() != Self::SUBSCRIBER_DIGITS {
            return Err(PhoneError::WrongLength {
                expected: Self::SUBSCRIBER_DIGITS,
            });
        }

        Ok(Self(format!("{}5{subscriber}", Self::COUNTRY_PREFIX)))
    }

    /// Returns the number in international form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the number in local `05XXXXXXXX` form.
    #[must_use]
    pub fn local(&self) -> String {
        format!(
            "0{}",
            self.0
                .strip_prefix(Self::COUNTRY_PREFIX)
                .unwrap_or(&self.0)
        )
    }

    /// Returns the number with all but the last four digits masked.
    #[must_use]
    pub fn masked(&self) -> String {
        let local = self.local();
        let visible = local.len().saturating_sub(4);
        format!("{}{}", "*".repeat(visible), local.get(visible..).unwrap_or(""))
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
