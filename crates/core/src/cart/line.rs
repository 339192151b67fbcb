//! Cart line and add-request types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use super::CartError;
use super::key::line_key;
use crate::types::{CurrencyCode, Price, ProductId};

/// Options that take part in a line's identity.
///
/// Every field is optional; an absent field fingerprints the same as its
/// default (`"default"` for size/style/color, `false` for the toggles, an
/// empty card message and no custom data).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_card: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_chocolate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gift_wrap: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Opaque custom-bouquet payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<Value>,
}

/// One purchasable line in the cart.
///
/// Lines written before fingerprints existed have no `uniqueKey`; their
/// identity is recomputed from their own fields (see [`CartLine::effective_key`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_key: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Unit price at the time the line was created.
    #[serde(default)]
    pub price: Decimal,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(flatten)]
    pub options: LineOptions,
}

const fn default_quantity() -> u32 {
    1
}

impl CartLine {
    /// The line's identity: the stored `uniqueKey`, or one recomputed from
    /// the line's fields for legacy lines.
    #[must_use]
    pub fn effective_key(&self) -> String {
        self.unique_key
            .clone()
            .unwrap_or_else(|| line_key(&self.id, &self.options))
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self, currency: CurrencyCode) -> Price {
        Price::new(self.price, currency).times(self.quantity)
    }
}

/// A request to add a product to the cart.
///
/// Built either from UI input (deserialized JSON, where `id` may be missing
/// and `quantity` may be any number) or with the builder methods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(default)]
    pub id: Option<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Requested quantity; validated by [`ProductInput::resolved_quantity`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Number>,
    #[serde(flatten)]
    pub options: LineOptions,
}

impl ProductInput {
    /// Start an add-request for a product.
    #[must_use]
    pub fn new(id: impl Into<ProductId>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Parse an add-request from a JSON value sent by the UI.
    ///
    /// # Errors
    ///
    /// Returns the parser error if the value is not an object of the expected shape.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    #[must_use]
    pub const fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(Number::from(quantity));
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.options.size = Some(size.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.options.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.options.style = Some(style.into());
        self
    }

    /// Attach a greeting card carrying `message`.
    #[must_use]
    pub fn with_card(mut self, message: impl Into<String>) -> Self {
        self.options.add_card = Some(true);
        self.options.card_message = Some(message.into());
        self
    }

    #[must_use]
    pub const fn with_chocolate(mut self) -> Self {
        self.options.add_chocolate = Some(true);
        self
    }

    #[must_use]
    pub const fn with_gift_wrap(mut self) -> Self {
        self.options.gift_wrap = Some(true);
        self
    }

    #[must_use]
    pub fn with_custom_data(mut self, data: Value) -> Self {
        self.options.custom_data = Some(data);
        self
    }

    /// The quantity to add: the requested one, or 1 when absent.
    ///
    /// Integral floats such as `2.0` are accepted since browser JSON does not
    /// distinguish them from integers.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for zero, negative, fractional
    /// or out-of-range values.
    pub fn resolved_quantity(&self) -> Result<u32, CartError> {
        let Some(raw) = &self.quantity else {
            return Ok(1);
        };

        let invalid = || CartError::InvalidQuantity(raw.to_string());

        if let Some(n) = raw.as_u64() {
            return match u32::try_from(n) {
                Ok(0) | Err(_) => Err(invalid()),
                Ok(n) => Ok(n),
            };
        }

        match raw.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= 1.0 && f <= f64::from(u32::MAX) => {
                // Range and integrality checked above
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let quantity = f as u32;
                Ok(quantity)
            }
            _ => Err(invalid()),
        }
    }
}

/// Result of adding a product to the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct AddOutcome {
    /// The new cart; the input cart is left untouched.
    pub cart: Vec<CartLine>,
    /// `true` when a line was appended, `false` when an existing line was incremented.
    pub is_new: bool,
    /// Position of the affected line in `cart`.
    pub index: usize,
}

impl AddOutcome {
    /// The line that was created or incremented.
    #[must_use]
    pub fn line(&self) -> Option<&CartLine> {
        self.cart.get(self.index)
    }
}

/// Selects cart lines for removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRef {
    /// A single line by its fingerprint.
    Key(String),
    /// Every line of a product, whatever its options.
    Product(ProductId),
}

impl core::fmt::Display for LineRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Product(id) => write!(f, "product {id}"),
        }
    }
}
