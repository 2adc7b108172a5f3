//! Tiffin CLI - Drive the storefront against local file-backed storage.
//!
//! # Usage
//!
//! ```bash
//! # Seed the demo menu
//! tiffin seed
//!
//! # Browse the menu, optionally by category
//! tiffin menu
//! tiffin menu --category Pizza
//!
//! # Cart operations
//! tiffin cart add margherita-pizza --quantity 2
//! tiffin cart set margherita-pizza 3
//! tiffin cart show
//!
//! # Addresses and checkout
//! tiffin address add --house-number 42A --area "MG Road" --city Bengaluru \
//!     --pincode 560001 --state Karnataka --country India
//! tiffin checkout --email user@example.com
//!
//! # Back-office order management
//! tiffin orders list
//! tiffin orders set-status <order-id> preparing
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

use tiffin_core::OrderStatus;
use tiffin_storefront::account::AddressLabel;
use tiffin_storefront::config::StorefrontConfig;
use tiffin_storefront::storage::FileStore;

mod commands;

#[derive(Parser)]
#[command(name = "tiffin")]
#[command(author, version, about = "Tiffin storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed local storage with the demo menu
    Seed,
    /// List the menu, optionally filtered by category
    Menu {
        /// Category name to filter by (exact match)
        #[arg(long)]
        category: Option<String>,
    },
    /// Shopping cart operations
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Saved delivery addresses
    Address {
        #[command(subcommand)]
        action: AddressAction,
    },
    /// Place an order from the current cart
    Checkout {
        /// Address to deliver to (defaults to the default address)
        #[arg(long)]
        address_id: Option<String>,

        /// Email for the order record
        #[arg(long, default_value = "guest@tiffin.example")]
        email: String,
    },
    /// Back-office order management
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product from the catalog
    Add {
        product_id: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product
    Remove { product_id: String },
    /// Set the quantity for a product (0 removes it)
    Set { product_id: String, quantity: i64 },
    /// Show cart contents and totals
    Show,
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum AddressAction {
    /// Save a new address
    Add {
        /// Address label (`home`, `work`, `other`)
        #[arg(long, default_value = "home")]
        label: AddressLabel,

        #[arg(long)]
        house_number: String,

        #[arg(long)]
        area: String,

        #[arg(long)]
        city: String,

        #[arg(long)]
        pincode: String,

        #[arg(long)]
        state: String,

        #[arg(long)]
        country: String,

        /// Make this the default address
        #[arg(long)]
        default: bool,
    },
    /// List saved addresses
    List,
    /// Make an address the default
    SetDefault { address_id: String },
    /// Delete an address
    Remove { address_id: String },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List placed orders, newest first
    List,
    /// Update an order's status (`pending`, `preparing`, `out-for-delivery`,
    /// `delivered`, `cancelled`)
    SetStatus {
        order_id: String,
        status: OrderStatus,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> tiffin_storefront::Result<()> {
    let config = StorefrontConfig::from_env()?;
    let store = FileStore::new(&config.storage_dir);

    match cli.command {
        Commands::Seed => commands::seed::run(&store, &config)?,
        Commands::Menu { category } => commands::menu::run(&store, category.as_deref())?,
        Commands::Cart { action } => match action {
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&store, &product_id, quantity)?,
            CartAction::Remove { product_id } => commands::cart::remove(&store, &product_id),
            CartAction::Set {
                product_id,
                quantity,
            } => commands::cart::set(&store, &product_id, quantity),
            CartAction::Show => commands::cart::show(&store),
            CartAction::Clear => commands::cart::clear(&store),
        },
        Commands::Address { action } => match action {
            AddressAction::Add {
                label,
                house_number,
                area,
                city,
                pincode,
                state,
                country,
                default,
            } => commands::address::add(
                &store,
                tiffin_storefront::account::AddressDraft {
                    label,
                    house_number,
                    area,
                    city,
                    pincode,
                    state,
                    country,
                    is_default: default,
                },
            )?,
            AddressAction::List => commands::address::list(&store)?,
            AddressAction::SetDefault { address_id } => {
                commands::address::set_default(&store, &address_id)?;
            }
            AddressAction::Remove { address_id } => {
                commands::address::remove(&store, &address_id)?;
            }
        },
        Commands::Checkout { address_id, email } => {
            commands::checkout::run(&store, &config, address_id.as_deref(), &email)?;
        }
        Commands::Orders { action } => match action {
            OrderAction::List => commands::orders::list(&store)?,
            OrderAction::SetStatus { order_id, status } => {
                commands::orders::set_status(&store, &order_id, status)?;
            }
        },
    }
    Ok(())
}
