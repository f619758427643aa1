//! `backoffice` - terminal front end for the back-office console.
//!
//! Restores the stored session (or signs in with `BACKOFFICE_USERNAME` /
//! `BACKOFFICE_PASSWORD`), opens the products page and prints it together
//! with its pagination control.

use anyhow::{Context, bail};
use backoffice_client::{Credentials, HttpClient};
use backoffice_console::host::{HistoryNavigator, LogNotifier};
use backoffice_console::i18n::Catalog;
use backoffice_console::pagination::window;
use backoffice_console::storage::FileStorage;
use backoffice_console::{
    Console, ConsoleAction, ConsoleConfig, ConsoleEnvironment, LoginForm, Route, Settings,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

// the store applies actions one at a time on a single cooperative thread
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = ConsoleConfig::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    config.validate().context("invalid configuration")?;
    tracing::info!(api_url = %config.api_url, storage = %config.storage_path.display(), "Configuration loaded");

    let credentials = Arc::new(Credentials::new(config.default_locale.clone()));
    let client = HttpClient::with_timeout(&config.api_url, Arc::clone(&credentials), config.request_timeout)
        .context("could not build API client")?;

    let env = ConsoleEnvironment {
        api: Arc::new(client),
        credentials,
        navigator: Arc::new(HistoryNavigator::new(Route::Products.location())),
        notifier: Arc::new(LogNotifier),
        storage: Arc::new(FileStorage::new(&config.storage_path)),
        translator: Arc::new(Catalog),
        settings: Settings::from(&config),
    };

    let console = Console::new(env);
    console.start().await?;
    console.wait_until_idle(SETTLE_TIMEOUT).await?;

    if !console.state(|s| s.session.is_authenticated()).await {
        let username = std::env::var("BACKOFFICE_USERNAME").unwrap_or_default();
        let password = std::env::var("BACKOFFICE_PASSWORD").unwrap_or_default();
        console.send(ConsoleAction::Login(LoginForm::new(username, password))).await?;
        console.wait_until_idle(SETTLE_TIMEOUT).await?;

        let session = console.state(|s| s.session.clone()).await;
        if !session.is_authenticated() {
            bail!(
                "not signed in: {}",
                session.error.unwrap_or_else(|| "no session".to_string())
            );
        }
    }

    let search = std::env::var("BACKOFFICE_SEARCH").unwrap_or_default();
    let mut products = Route::Products.location();
    if !search.is_empty() {
        products = products.with_query("search", search);
    }
    console.send(ConsoleAction::Navigate(products)).await?;
    console.wait_until_idle(SETTLE_TIMEOUT).await?;

    print_products(&console, config.max_visible_pages).await;

    console.send(ConsoleAction::Navigate(Route::Dashboard.location())).await?;
    console.wait_until_idle(SETTLE_TIMEOUT).await?;

    let stats = console.state(|s| s.dashboard.stats.clone()).await;
    println!(
        "\nOrders: {}  Products: {}  Revenue: {:.2}",
        stats.total_orders, stats.total_products, stats.total_revenue
    );

    console.shutdown(Duration::from_secs(5)).await?;
    Ok(())
}

async fn print_products(console: &Console, max_visible: u32) {
    let page = console.state(|s| s.products.clone()).await;

    if let Some(error) = &page.slice.error {
        println!("Error: {error}");
        return;
    }
    if page.slice.items.is_empty() {
        println!("No products.");
        return;
    }

    println!("{:>6}  {:<32} {:<16} {:>10} {:>6}  Active", "ID", "Name", "Category", "Price", "Stock");
    for product in &page.slice.items {
        println!(
            "{:>6}  {:<32} {:<16} {:>10.2} {:>6}  {}",
            product.id,
            product.name,
            product.category,
            product.price,
            product.stock,
            if product.is_active { "yes" } else { "no" }
        );
    }

    let meta = page.slice.pagination;
    println!("\n{} products", meta.total_elements);
    println!("{}", window(meta.current_page, meta.total_pages, max_visible));
}
