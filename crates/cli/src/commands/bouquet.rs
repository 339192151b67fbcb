//! Custom bouquet command.
//!
//! # Usage
//!
//! ```bash
//! bq-cli bouquet --flower rose:5:red --flower gypsophila:3 --size medium \
//!     --style kraft --vase glass --add-on chocolate --card-message "مبروك"
//! ```
//!
//! Walks the configurator through every step, so the same validation applies
//! as in the storefront wizard, then adds the result to the cart.

use bouquet_storefront::Storefront;
use bouquet_storefront::catalog::{BouquetBuilder, BouquetStep};

use super::{CliError, Result};
use crate::output::{Output, format_line, symbols};

/// A `--flower` argument: `id:stems` or `id:stems:color`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowerArg {
    pub id: String,
    pub stems: u32,
    pub color: Option<String>,
}

impl std::str::FromStr for FlowerArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let id = parts.next().filter(|id| !id.is_empty());
        let stems = parts.next().map(str::parse::<u32>);
        let color = parts.next().map(str::to_string);

        match (id, stems, parts.next()) {
            (Some(id), Some(Ok(stems)), None) => Ok(Self {
                id: id.to_string(),
                stems,
                color,
            }),
            _ => Err(format!("expected `flower:stems` or `flower:stems:color`, got `{s}`")),
        }
    }
}

/// Options for `bouquet`.
#[derive(Debug)]
pub struct BouquetArgs {
    pub flowers: Vec<FlowerArg>,
    pub size: String,
    pub style: Option<String>,
    pub vase: Option<String>,
    pub add_ons: Vec<String>,
    pub card_message: Option<String>,
}

/// Configure a bouquet and add it to the cart.
pub fn build(storefront: &Storefront, out: Output, args: &BouquetArgs) -> Result<()> {
    let mut builder = BouquetBuilder::new(storefront.catalog());

    for flower in &args.flowers {
        builder.add_flower(&flower.id, flower.color.as_deref(), flower.stems)?;
    }
    builder.next()?;

    builder.choose_size(&args.size)?;
    builder.next()?;

    if let Some(style) = &args.style {
        builder.choose_style(style)?;
    }
    builder.next()?;

    builder.choose_vase(args.vase.as_deref())?;
    for add_on in &args.add_ons {
        builder.toggle_add_on(add_on)?;
    }
    if let Some(message) = &args.card_message {
        builder.set_card_message(message);
    }
    if builder.next()? != BouquetStep::Review {
        return Err(CliError::Usage("bouquet is incomplete".to_string()));
    }

    tracing::debug!(stems = builder.stem_count(), price = %builder.price(), "Bouquet configured");

    let input = builder.into_product_input()?;
    let outcome = storefront.cart().add(&input)?;
    let Some(line) = outcome.line() else {
        return Ok(());
    };
    let currency = storefront.cart().currency();

    out.emit(line, || {
        format!(
            "{} {} custom bouquet\n{}",
            symbols::SUCCESS,
            if outcome.is_new { "Added" } else { "Added another" },
            format_line(line, currency)
        )
    })?;
    Ok(())
}
