//! Custom bouquet configurator.
//!
//! A multi-step wizard: pick flowers, a size, a wrapping style, then extras,
//! and review. The finished bouquet goes into the cart as a single line
//! whose `customData` is the full selection, so two custom bouquets only
//! merge when every choice matches.

use std::collections::BTreeSet;

use bouquet_core::{ProductId, ProductInput};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Catalog;

/// Product id every custom bouquet is added under.
pub const CUSTOM_BOUQUET_ID: &str = "custom-bouquet";

/// Most stems a single bouquet may hold.
pub const MAX_STEMS: u32 = 99;

/// Errors that can occur while configuring a bouquet.
#[derive(Debug, Error)]
pub enum BouquetError {
    #[error("unknown flower: {0}")]
    UnknownFlower(String),

    #[error("{flower} is not available in {color}")]
    UnknownColor { flower: String, color: String },

    #[error("unknown size: {0}")]
    UnknownSize(String),

    #[error("unknown wrapping style: {0}")]
    UnknownStyle(String),

    #[error("unknown vase: {0}")]
    UnknownVase(String),

    #[error("unknown add-on: {0}")]
    UnknownAddOn(String),

    #[error("stem count must be at least 1")]
    NoStems,

    #[error("a bouquet can hold at most 99 stems")]
    TooManyStems,

    #[error("choose at least one flower")]
    NoFlowers,

    #[error("choose a bouquet size")]
    SizeRequired,

    #[error("could not encode bouquet: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A step of the configurator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BouquetStep {
    #[default]
    Flowers,
    Size,
    Style,
    Extras,
    Review,
}

impl BouquetStep {
    /// The following step, `None` from the review.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Flowers => Some(Self::Size),
            Self::Size => Some(Self::Style),
            Self::Style => Some(Self::Extras),
            Self::Extras => Some(Self::Review),
            Self::Review => None,
        }
    }

    /// The preceding step, `None` from the first.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Flowers => None,
            Self::Size => Some(Self::Flowers),
            Self::Style => Some(Self::Size),
            Self::Extras => Some(Self::Style),
            Self::Review => Some(Self::Extras),
        }
    }

    /// Arabic heading for the step.
    #[must_use]
    pub const fn label_ar(self) -> &'static str {
        match self {
            Self::Flowers => "اختر الورود",
            Self::Size => "الحجم",
            Self::Style => "التغليف",
            Self::Extras => "الإضافات",
            Self::Review => "المراجعة",
        }
    }
}

/// Stems of one flower in one color.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowerSelection {
    pub flower_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub stems: u32,
}

/// A finished bouquet selection.
///
/// Flowers are kept sorted and add-ons deduplicated, so the same choices
/// always serialize identically regardless of the order they were made in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomBouquet {
    pub flowers: Vec<FlowerSelection>,
    pub size: String,
    pub style: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vase: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub add_ons: BTreeSet<String>,
}

impl CustomBouquet {
    /// Total number of stems.
    #[must_use]
    pub fn stem_count(&self) -> u32 {
        self.flowers.iter().map(|f| f.stems).sum()
    }
}

/// Wizard state for building a [`CustomBouquet`].
#[derive(Debug, Clone)]
pub struct BouquetBuilder<'a> {
    catalog: &'a Catalog,
    step: BouquetStep,
    flowers: Vec<FlowerSelection>,
    size: Option<String>,
    style: String,
    vase: Option<String>,
    add_ons: BTreeSet<String>,
    card_message: Option<String>,
}

impl<'a> BouquetBuilder<'a> {
    /// Start a bouquet with the catalog's first wrapping style selected.
    #[must_use]
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            step: BouquetStep::default(),
            flowers: Vec::new(),
            size: None,
            style: catalog
                .styles()
                .first()
                .map(|style| style.id.to_string())
                .unwrap_or_default(),
            vase: None,
            add_ons: BTreeSet::new(),
            card_message: None,
        }
    }

    #[must_use]
    pub const fn step(&self) -> BouquetStep {
        self.step
    }

    #[must_use]
    pub fn flowers(&self) -> &[FlowerSelection] {
        &self.flowers
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Move to the next step once the current one is complete.
    ///
    /// # Errors
    ///
    /// Returns `BouquetError::NoFlowers` or `BouquetError::SizeRequired` if
    /// the current step is incomplete. The step does not change.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<BouquetStep, BouquetError> {
        match self.step {
            BouquetStep::Flowers if self.flowers.is_empty() => return Err(BouquetError::NoFlowers),
            BouquetStep::Size if self.size.is_none() => return Err(BouquetError::SizeRequired),
            _ => {}
        }
        self.step = self.step.next().unwrap_or(self.step);
        Ok(self.step)
    }

    /// Move to the previous step. Staying on the first step is not an error.
    pub fn back(&mut self) -> BouquetStep {
        self.step = self.step.previous().unwrap_or(self.step);
        self.step
    }

    // =========================================================================
    // Selections
    // =========================================================================

    /// Add `stems` stems of a flower, merging with an existing selection of
    /// the same flower and color.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown flower or color, a zero stem count, or
    /// a bouquet that would exceed [`MAX_STEMS`].
    pub fn add_flower(
        &mut self,
        flower_id: &str,
        color: Option<&str>,
        stems: u32,
    ) -> Result<(), BouquetError> {
        let flower = self
            .catalog
            .flower(flower_id)
            .ok_or_else(|| BouquetError::UnknownFlower(flower_id.to_string()))?;
        if let Some(color) = color
            && !flower.colors.iter().any(|c| *c == color)
        {
            return Err(BouquetError::UnknownColor {
                flower: flower.name_en.to_string(),
                color: color.to_string(),
            });
        }
        if stems == 0 {
            return Err(BouquetError::NoStems);
        }
        let total = self.stem_count().saturating_add(stems);
        if total > MAX_STEMS {
            return Err(BouquetError::TooManyStems);
        }

        let color = color.map(ToString::to_string);
        match self
            .flowers
            .iter_mut()
            .find(|s| s.flower_id == flower_id && s.color == color)
        {
            Some(selection) => selection.stems += stems,
            None => {
                self.flowers.push(FlowerSelection {
                    flower_id: flower_id.to_string(),
                    color,
                    stems,
                });
                self.flowers.sort();
            }
        }
        Ok(())
    }

    /// Drop every selection of `flower_id`.
    pub fn remove_flower(&mut self, flower_id: &str) {
        self.flowers.retain(|s| s.flower_id != flower_id);
    }

    /// Choose the bouquet size.
    ///
    /// # Errors
    ///
    /// Returns `BouquetError::UnknownSize` if the catalog has no such size.
    pub fn choose_size(&mut self, size_id: &str) -> Result<(), BouquetError> {
        let size = self
            .catalog
            .size(size_id)
            .ok_or_else(|| BouquetError::UnknownSize(size_id.to_string()))?;
        self.size = Some(size.id.to_string());
        Ok(())
    }

    /// Choose the wrapping style.
    ///
    /// # Errors
    ///
    /// Returns `BouquetError::UnknownStyle` if the catalog has no such style.
    pub fn choose_style(&mut self, style_id: &str) -> Result<(), BouquetError> {
        let style = self
            .catalog
            .style(style_id)
            .ok_or_else(|| BouquetError::UnknownStyle(style_id.to_string()))?;
        self.style = style.id.to_string();
        Ok(())
    }

    /// Choose a vase, or `None` for no vase.
    ///
    /// # Errors
    ///
    /// Returns `BouquetError::UnknownVase` if the catalog has no such vase.
    pub fn choose_vase(&mut self, vase_id: Option<&str>) -> Result<(), BouquetError> {
        self.vase = match vase_id {
            Some(id) => Some(
                self.catalog
                    .vase(id)
                    .ok_or_else(|| BouquetError::UnknownVase(id.to_string()))?
                    .id
                    .to_string(),
            ),
            None => None,
        };
        Ok(())
    }

    /// Add an add-on if absent, remove it if present. Returns whether it is
    /// now selected.
    ///
    /// # Errors
    ///
    /// Returns `BouquetError::UnknownAddOn` if the catalog has no such add-on.
    pub fn toggle_add_on(&mut self, add_on_id: &str) -> Result<bool, BouquetError> {
        let add_on = self
            .catalog
            .add_on(add_on_id)
            .ok_or_else(|| BouquetError::UnknownAddOn(add_on_id.to_string()))?;

        if self.add_ons.remove(add_on.id) {
            Ok(false)
        } else {
            self.add_ons.insert(add_on.id.to_string());
            Ok(true)
        }
    }

    /// Attach a greeting card. A blank message removes the card.
    pub fn set_card_message(&mut self, message: &str) {
        let message = message.trim();
        self.card_message = (!message.is_empty()).then(|| message.to_string());
    }

    // =========================================================================
    // Pricing and Output
    // =========================================================================

    /// Total stems selected.
    #[must_use]
    pub fn stem_count(&self) -> u32 {
        self.flowers.iter().map(|s| s.stems).sum()
    }

    /// Current price.
    ///
    /// Flower cost is scaled by the size multiplier (1 until a size is
    /// chosen); style, vase and add-ons are added at their own prices.
    #[must_use]
    pub fn price(&self) -> Decimal {
        let flowers: Decimal = self
            .flowers
            .iter()
            .filter_map(|s| {
                self.catalog
                    .flower(&s.flower_id)
                    .map(|flower| flower.price_per_stem * Decimal::from(s.stems))
            })
            .sum();

        let multiplier = self
            .size
            .as_deref()
            .and_then(|id| self.catalog.size(id))
            .map_or(Decimal::ONE, |size| size.multiplier);

        let style = self.catalog.style(&self.style).map_or(Decimal::ZERO, |s| s.price);
        let vase = self
            .vase
            .as_deref()
            .and_then(|id| self.catalog.vase(id))
            .map_or(Decimal::ZERO, |v| v.price);
        let add_ons: Decimal = self
            .add_ons
            .iter()
            .filter_map(|id| self.catalog.add_on(id))
            .map(|a| a.price)
            .sum();

        (flowers * multiplier + style + vase + add_ons).round_dp(2)
    }

    /// The finished selection.
    ///
    /// # Errors
    ///
    /// Returns `BouquetError::NoFlowers` or `BouquetError::SizeRequired` if
    /// the bouquet is incomplete.
    pub fn build(&self) -> Result<CustomBouquet, BouquetError> {
        if self.flowers.is_empty() {
            return Err(BouquetError::NoFlowers);
        }
        let size = self.size.clone().ok_or(BouquetError::SizeRequired)?;

        Ok(CustomBouquet {
            flowers: self.flowers.clone(),
            size,
            style: self.style.clone(),
            vase: self.vase.clone(),
            add_ons: self.add_ons.clone(),
        })
    }

    /// The cart input for this bouquet.
    ///
    /// # Errors
    ///
    /// Returns an error if the bouquet is incomplete.
    pub fn into_product_input(self) -> Result<ProductInput, BouquetError> {
        let bouquet = self.build()?;
        let price = self.price();
        let stems = bouquet.stem_count();

        let mut input = ProductInput::new(ProductId::from(CUSTOM_BOUQUET_ID))
            .with_title(format!("باقة مخصصة ({stems} وردة)"))
            .with_price(price)
            .with_size(bouquet.size.clone())
            .with_style(bouquet.style.clone());

        if bouquet.add_ons.contains("chocolate") {
            input = input.with_chocolate();
        }
        if bouquet.add_ons.contains("gift-wrap") {
            input = input.with_gift_wrap();
        }
        if let Some(message) = self.card_message {
            input = input.with_card(message);
        }

        Ok(input.with_custom_data(serde_json::to_value(&bouquet)?))
    }
}
