//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod config;

use clap::{Args, Subcommand};

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Add a product to the cart.
    Add {
        /// Catalog product ID.
        product_id: String,

        /// Selected color.
        #[arg(long, default_value = "")]
        color: String,

        /// Selected size.
        #[arg(long, default_value = "")]
        size: String,

        /// How many to add.
        #[arg(short, long, default_value = "1")]
        quantity: i64,

        /// Product title; with --price, skips the catalog lookup.
        #[arg(long, requires = "price")]
        title: Option<String>,

        /// Unit price in major units; with --title, skips the catalog lookup.
        #[arg(long, requires = "title")]
        price: Option<f64>,

        /// Image path, used with --title/--price.
        #[arg(long)]
        image: Option<String>,
    },
    /// Remove a line from the cart.
    Remove {
        /// Line ID, unique ID prefix, or line number from `cart show`.
        line: String,
    },
    /// Set a line's quantity. Zero or less removes the line.
    Update {
        /// Line ID, unique ID prefix, or line number from `cart show`.
        line: String,

        /// New quantity.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Increase a line's quantity by one.
    Inc {
        /// Line ID, unique ID prefix, or line number from `cart show`.
        line: String,
    },
    /// Decrease a line's quantity by one, removing it at zero.
    Dec {
        /// Line ID, unique ID prefix, or line number from `cart show`.
        line: String,
    },
    /// Remove every line.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the cart and its totals.
    Show,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Customer full name.
    #[arg(long)]
    pub name: Option<String>,

    /// Customer phone number.
    #[arg(long)]
    pub phone: Option<String>,

    /// Alternate phone number.
    #[arg(long)]
    pub alt_phone: Option<String>,

    /// Delivery address.
    #[arg(long)]
    pub address: Option<String>,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
