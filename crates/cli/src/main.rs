//! Bouquet CLI - browse the catalog, fill the cart and check out from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! bq-cli catalog list --category roses --sort price-asc
//! bq-cli catalog remote --limit 5
//!
//! # Cart
//! bq-cli cart add --id 1 --size medium
//! bq-cli bouquet --flower rose:7:red --size large --add-on chocolate
//! bq-cli cart list
//!
//! # Account and checkout
//! bq-cli login 0501234567 --code 1234
//! bq-cli checkout --name "نورة" --phone 0501234567 --city الرياض --address "حي الملقا"
//! bq-cli orders list
//! ```
//!
//! # Commands
//!
//! - `catalog` - List built-in or demo API products
//! - `cart` - Add, list, update and remove cart lines
//! - `bouquet` - Configure a custom bouquet and add it to the cart
//! - `favorites` - Toggle and list favorite products
//! - `login` / `logout` / `whoami` - Mock phone login
//! - `checkout` / `orders` - Mock checkout and order history
//!
//! State is stored under `BOUQUET_DATA_DIR`; see `bouquet_storefront::config`
//! for every environment variable.

#![cfg_attr(not(test), forbid(unsafe_code))]

use bouquet_core::{LineRef, OrderId, ProductId};
use bouquet_storefront::Storefront;
use bouquet_storefront::catalog::ProductSort;
use bouquet_storefront::config::{LogFormat, StorefrontConfig};
use bouquet_storefront::stores::{CheckoutDetails, PaymentMethod};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::CliError;
use commands::bouquet::{BouquetArgs, FlowerArg};
use commands::cart::AddArgs;
use output::Output;

#[derive(Parser)]
#[command(name = "bq-cli")]
#[command(author, version, about = "Bouquet storefront CLI")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse products
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Configure a custom bouquet and add it to the cart
    Bouquet {
        /// Flower as `id:stems` or `id:stems:color` (repeatable)
        #[arg(short, long = "flower", required = true)]
        flowers: Vec<FlowerArg>,

        /// Bouquet size (`small`, `medium`, `large`)
        #[arg(short, long)]
        size: String,

        /// Wrapping style
        #[arg(long)]
        style: Option<String>,

        /// Vase
        #[arg(long)]
        vase: Option<String>,

        /// Add-on (repeatable)
        #[arg(long = "add-on")]
        add_ons: Vec<String>,

        /// Greeting card message
        #[arg(long)]
        card_message: Option<String>,
    },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Sign in with a mobile number
    Login {
        /// Saudi mobile number, e.g. 0501234567
        phone: String,

        /// Verification code
        #[arg(short, long)]
        code: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami {
        /// Change the display name
        #[arg(long)]
        set_name: Option<String>,
    },
    /// Place an order for the cart
    Checkout {
        /// Recipient name
        #[arg(short, long)]
        name: String,

        /// Recipient mobile number
        #[arg(short, long)]
        phone: String,

        /// Delivery city
        #[arg(long)]
        city: String,

        /// Delivery address
        #[arg(short, long)]
        address: String,

        /// Delivery date (YYYY-MM-DD), defaults to tomorrow
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Gift note for the recipient
        #[arg(long)]
        note: Option<String>,

        /// Pay by card instead of cash on delivery
        #[arg(long)]
        card: bool,
    },
    /// Show or cancel orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List built-in products
    List {
        /// Category slug
        #[arg(short, long)]
        category: Option<String>,

        /// Text to search for in either language
        #[arg(short, long)]
        search: Option<String>,

        /// `price-asc`, `price-desc`, `name` or `newest`
        #[arg(long, default_value = "price-asc")]
        sort: ProductSort,
    },
    /// Show one product
    Show {
        /// Product id
        id: ProductId,
    },
    /// List bouquet configurator options
    Options,
    /// List products from the demo product API
    Remote {
        #[arg(short, long, default_value_t = 10)]
        limit: u32,

        #[arg(long, default_value_t = 0)]
        skip: u32,

        #[arg(short, long)]
        search: Option<String>,

        #[arg(long, default_value = "price-asc")]
        sort: ProductSort,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product
    Add {
        /// Product id
        #[arg(long)]
        id: ProductId,

        /// Title; defaults to the catalog name
        #[arg(long)]
        title: Option<String>,

        /// Unit price; defaults to the catalog price
        #[arg(long)]
        price: Option<Decimal>,

        #[arg(short, long)]
        quantity: Option<u32>,

        #[arg(long)]
        size: Option<String>,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        style: Option<String>,

        /// Add a greeting card with this message
        #[arg(long)]
        card_message: Option<String>,

        /// Add chocolate
        #[arg(long)]
        chocolate: bool,

        /// Gift wrap the product
        #[arg(long)]
        gift_wrap: bool,
    },
    /// Show the cart
    List,
    /// Remove a line by key, or every line of a product with --product
    Remove {
        /// Line key, or product id with --product
        target: String,

        /// Treat the target as a product id
        #[arg(long)]
        product: bool,
    },
    /// Set a line's quantity
    Set {
        /// Line key
        key: String,

        quantity: u32,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// Add or remove a favorite
    Toggle {
        /// Product id
        id: ProductId,
    },
    /// List favorites
    List,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders, newest first
    List,
    /// Cancel an order
    Cancel {
        /// Order number
        id: OrderId,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::default());
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    init_tracing(config.log_format);

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        report(&e);
        std::process::exit(1);
    }
}

/// Initialize tracing with `EnvFilter`; logs go to stderr.
fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bouquet_storefront=warn,bq_cli=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

#[allow(clippy::print_stderr)]
fn report(err: &CliError) {
    eprintln!("✗ {}", err.user_message());
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), CliError> {
    let storefront = Storefront::open(config).map_err(bouquet_storefront::AppError::from)?;
    let out = Output::new(cli.json);

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List {
                category,
                search,
                sort,
            } => commands::catalog::list(
                &storefront,
                out,
                category.as_deref(),
                search.as_deref(),
                sort,
            )?,
            CatalogAction::Show { id } => commands::catalog::show(&storefront, out, &id)?,
            CatalogAction::Options => commands::catalog::options(&storefront, out)?,
            CatalogAction::Remote {
                limit,
                skip,
                search,
                sort,
            } => {
                commands::catalog::remote(&storefront, out, limit, skip, search.as_deref(), sort)
                    .await?;
            }
        },
        Commands::Cart { action } => match action {
            CartAction::Add {
                id,
                title,
                price,
                quantity,
                size,
                color,
                style,
                card_message,
                chocolate,
                gift_wrap,
            } => commands::cart::add(
                &storefront,
                out,
                AddArgs {
                    id,
                    title,
                    price,
                    quantity,
                    size,
                    color,
                    style,
                    card_message,
                    chocolate,
                    gift_wrap,
                },
            )?,
            CartAction::List => commands::cart::list(&storefront, out)?,
            CartAction::Remove { target, product } => {
                let target = if product {
                    let Ok(id) = target.parse::<ProductId>();
                    LineRef::Product(id)
                } else {
                    LineRef::Key(target)
                };
                commands::cart::remove(&storefront, out, &target)?;
            }
            CartAction::Set { key, quantity } => {
                commands::cart::set_quantity(&storefront, out, &key, quantity)?;
            }
            CartAction::Clear => commands::cart::clear(&storefront, out)?,
        },
        Commands::Bouquet {
            flowers,
            size,
            style,
            vase,
            add_ons,
            card_message,
        } => commands::bouquet::build(
            &storefront,
            out,
            &BouquetArgs {
                flowers,
                size,
                style,
                vase,
                add_ons,
                card_message,
            },
        )?,
        Commands::Favorites { action } => match action {
            FavoritesAction::Toggle { id } => commands::favorites::toggle(&storefront, out, &id)?,
            FavoritesAction::List => commands::favorites::list(&storefront, out)?,
        },
        Commands::Login { phone, code } => {
            commands::account::login(&storefront, out, &phone, &code)?;
        }
        Commands::Logout => commands::account::logout(&storefront, out)?,
        Commands::Whoami { set_name } => {
            commands::account::whoami(&storefront, out, set_name.as_deref())?;
        }
        Commands::Checkout {
            name,
            phone,
            city,
            address,
            date,
            note,
            card,
        } => {
            let delivery_date = date.unwrap_or_else(|| {
                (chrono::Utc::now() + chrono::Duration::days(1)).date_naive()
            });
            let details = CheckoutDetails {
                recipient_name: name,
                phone,
                city,
                address,
                delivery_date,
                gift_note: note,
                payment: if card {
                    PaymentMethod::Card
                } else {
                    PaymentMethod::CashOnDelivery
                },
            };
            commands::orders::checkout(&storefront, out, details)?;
        }
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(&storefront, out)?,
            OrdersAction::Cancel { id } => commands::orders::cancel(&storefront, out, id)?,
        },
    }
    Ok(())
}
