//! RocketShoes CLI - Inspect and change the persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! rs-cart show
//!
//! # Add one unit of product 1 (stock and catalog from the API)
//! rs-cart add 1
//!
//! # Set product 1 to three units, using a local fixture instead of the API
//! rs-cart --fixtures db.json update 1 3
//!
//! # Remove product 1
//! rs-cart remove 1
//! ```
//!
//! # Commands
//!
//! - `show` - Print line items and totals
//! - `add` - Add one unit of a product
//! - `remove` - Remove a product's line item
//! - `update` - Set a product's quantity
//!
//! Configuration comes from the environment (see `rocketshoes_cart::config`).
//! The process exits with status 1 when the operation is rejected.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rocketshoes_cart::config::CartConfig;
use rocketshoes_core::ProductId;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "rs-cart")]
#[command(author, version, about = "RocketShoes cart tools")]
struct Cli {
    /// Read stock and catalog from a JSON fixture instead of the API
    #[arg(long, global = true, value_name = "FILE")]
    fixtures: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Set the quantity of a product already in the cart
    Update {
        /// Product ID
        product_id: ProductId,

        /// New quantity (values below 1 are ignored)
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CartConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        // Collaborator failures are captured explicitly; keep them as breadcrumbs here
        tracing::Level::ERROR | tracing::Level::WARN | tracing::Level::INFO => {
            sentry_tracing::EventFilter::Breadcrumb
        }
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match CartConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt().with_writer(std::io::stderr).init();
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocketshoes=info,rocketshoes_cart=info,rocketshoes_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    match run(cli, &config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: &CartConfig) -> Result<ExitCode, commands::CommandError> {
    let mut engine = commands::cart::build_engine(config, cli.fixtures.as_deref())?;

    let outcome = match cli.command {
        Commands::Show => None,
        Commands::Add { product_id } => Some(engine.add_product(product_id).await),
        Commands::Remove { product_id } => Some(engine.remove_product(product_id).await),
        Commands::Update { product_id, amount } => Some(
            engine
                .update_product_amount(rocketshoes_cart::UpdateProductAmount { product_id, amount })
                .await,
        ),
    };

    let cart = engine.dispose();
    commands::cart::print(&cart, outcome.as_ref())?;

    Ok(match outcome {
        Some(outcome) if outcome.is_rejected() => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}
