//! Suite CLI.
//!
//! Provides a smoke workflow that drives the full order flow against the
//! live storefront: sign in, add the backpack, open the cart, fill the
//! checkout information, and finish the order. Useful for checking the
//! site (and a local Chrome install) before running the full suites.
//!
//! Usage:
//!   $ SAUCEDEMO_CHROME_BIN=/path/to/chrome cargo run --bin saucedemo -- smoke
//!   $ cargo run --bin saucedemo -- smoke --show-browser

use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use saucedemo_e2e::config::{SuiteConfig, Verbosity};
use saucedemo_e2e::flows;
use saucedemo_e2e::harness::Harness;
use saucedemo_e2e::runtime::ChromiumRuntime;
use saucedemo_e2e::site::{self, messages, selectors, urls};

#[derive(Parser)]
#[command(name = "saucedemo", author, version, about = "saucedemo suite utilities")]
struct Cli {
    /// Increase log verbosity (pass multiple times for DEBUG).
    #[arg(long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the order-flow smoke check against the live site.
    Smoke(SmokeArgs),
}

#[derive(Args)]
struct SmokeArgs {
    /// First name for the checkout information form.
    #[arg(long, default_value = "John")]
    first_name: String,

    /// Last name for the checkout information form.
    #[arg(long, default_value = "Doe")]
    last_name: String,

    /// Postal code for the checkout information form.
    #[arg(long, default_value = "100001")]
    postal_code: String,

    /// Show the launched browser window.
    #[arg(long)]
    show_browser: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_env_logger();

    let cli = Cli::parse();
    match cli.command {
        Command::Smoke(args) => run_smoke(args, verbosity_from_count(cli.verbose)).await,
    }
}

async fn run_smoke(args: SmokeArgs, verbosity: Verbosity) -> Result<()> {
    let mut config = SuiteConfig::from_env().context("failed to load suite configuration")?;
    config.verbose = verbosity;
    if args.show_browser {
        config.headless = false;
    }

    info!("starting smoke check against {}", config.base_url);

    let runtime = Arc::new(ChromiumRuntime::new());
    let harness = Harness::new_local(config, runtime);
    harness.init().await.context("failed to start the browser")?;

    let outcome = drive_order_flow(&harness, &args).await;
    harness.close().await.context("failed to shut the browser down")?;
    outcome?;

    info!("smoke check completed: order placed");
    Ok(())
}

async fn drive_order_flow(
    harness: &Harness<Arc<ChromiumRuntime>>,
    args: &SmokeArgs,
) -> Result<()> {
    let page = harness
        .open_clean_session()
        .await
        .context("failed to open the storefront")?;

    flows::authenticate(&page).await.context("login failed")?;
    flows::add_backpack_to_cart(&page)
        .await
        .context("adding the backpack failed")?;
    flows::go_to_cart(&page).await.context("opening the cart failed")?;
    flows::go_to_checkout_information(&page)
        .await
        .context("reaching checkout information failed")?;

    page.fill(selectors::FIRST_NAME_INPUT, &args.first_name)
        .await
        .context("filling first name failed")?;
    page.fill(selectors::LAST_NAME_INPUT, &args.last_name)
        .await
        .context("filling last name failed")?;
    page.fill(selectors::POSTAL_CODE_INPUT, &args.postal_code)
        .await
        .context("filling postal code failed")?;
    page.click(selectors::CONTINUE_BUTTON)
        .await
        .context("continue to overview failed")?;

    page.expect_url_contains(urls::CHECKOUT_STEP_TWO)
        .await
        .context("overview step not reached")?;
    page.expect_text_contains(selectors::SUBTOTAL_LABEL, messages::BACKPACK_SUBTOTAL)
        .await
        .context("subtotal mismatch")?;

    page.click(selectors::FINISH_BUTTON)
        .await
        .context("finish failed")?;
    page.expect_url_contains(urls::CHECKOUT_COMPLETE)
        .await
        .context("completion page not reached")?;
    page.expect_text_contains(selectors::COMPLETE_HEADER, messages::ORDER_COMPLETE)
        .await
        .context("completion header mismatch")?;
    page.expect_absent(site::selectors::CART_BADGE)
        .await
        .context("cart badge still visible after completion")?;

    Ok(())
}

fn verbosity_from_count(count: u8) -> Verbosity {
    match count {
        0 => Verbosity::Medium,
        _ => Verbosity::Detailed,
    }
}

fn init_env_logger() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    let _ = env_logger::Builder::from_env(env_logger::Env::default())
        .format_timestamp_secs()
        .try_init();
}
