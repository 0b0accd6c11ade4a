//! Storefront: command-line client for the product catalog
//!
//! Subcommands:
//! - `list`: Products, optionally filtered by category
//! - `show`: One product and its suppliers
//! - `add`: Create a product
//! - `update`: Bump a product's stock
//! - `delete`: Remove a product

use std::sync::Arc;

use clap::{Parser, Subcommand};
use miette::Result;
use storefront_api::{DEFAULT_BASE_URL, StorefrontClient};
use storefront_catalog::{
    ALL_CATEGORIES, CatalogConfig, DEFAULT_PRICE_MULTIPLIER, ProductService, StorefrontBackend,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Browse and edit the storefront product catalog", long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = "STOREFRONT_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Multiplier applied to listed prices
    #[arg(long, global = true, env = "STOREFRONT_PRICE_MULTIPLIER", default_value_t = DEFAULT_PRICE_MULTIPLIER)]
    price_multiplier: f64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    List {
        /// Only show products in this category (0 shows all)
        #[arg(long, default_value_t = ALL_CATEGORIES)]
        category: u64,
    },

    /// Show one product and its suppliers
    Show {
        /// Product id
        id: u64,
    },

    /// Add a product. Without --json a placeholder product is added
    Add {
        /// Product as JSON, e.g. '{"productName": "Rake", "categoryId": 1}'
        #[arg(long)]
        json: Option<String>,
    },

    /// Increment a product's stock by one
    Update {
        /// Product id
        id: u64,
    },

    /// Delete a product
    Delete {
        /// Product id
        id: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "storefront=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let client = StorefrontClient::new(&cli.api_url).map_err(|e| miette::miette!("{}", e))?;
    let backend: Arc<dyn StorefrontBackend> = Arc::new(client);
    let config = CatalogConfig::default().with_price_multiplier(cli.price_multiplier);
    let service = ProductService::new(backend, &config);

    match cli.command {
        Commands::List { category } => commands::list(&service, category).await,
        Commands::Show { id } => commands::show(&service, id).await,
        Commands::Add { json } => commands::add(&service, json.as_deref()).await,
        Commands::Update { id } => commands::update(&service, id).await,
        Commands::Delete { id } => commands::delete(&service, id).await,
    }
}
