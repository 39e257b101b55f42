use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures_util::StreamExt;
use serde::Serialize;
use serde_json::json;

use storefront::config::Config;
use storefront::network::{ApiError, ApiResult, ApiStream};
use storefront::ui::home::HomeSection;
use storefront::Storefront;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(version)]
#[command(about = "FakeStoreAPI client with an encrypted local session")]
struct Cli {
    /// Config file (default: <config dir>/storefront/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log out and clear the stored session
    Logout,
    /// Show the stored session
    Whoami,
    /// List products
    Products {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        category: Option<String>,
    },
    /// List product categories
    Categories,
    /// Show one product
    Product { id: i64 },
    /// List a user's carts
    Carts { user_id: i64 },
    /// Load the home screen sections
    Home,
    /// Print reachability, then follow changes
    Connectivity {
        /// Stop after this many changes
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    storefront::logging::init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;
    let app = Storefront::new(config)?;

    match cli.command {
        Command::Login { email, password } => login(&app, &email, &password).await,
        Command::Logout => {
            let auth = app.auth_view_model();
            auth.logout().await;
            print_json(&json!({ "logged_out": true }))
        }
        Command::Whoami => whoami(&app).await,
        Command::Products { limit, category } => {
            let products = app.products_use_case();
            let stream = match category {
                Some(category) => products.by_category(&category),
                None => products.call(limit.unwrap_or(app.config().api.default_page_size)),
            };
            print_json(&terminal(stream).await?)
        }
        Command::Categories => print_json(&terminal(app.products_use_case().categories()).await?),
        Command::Product { id } => {
            let detail = app.product_detail_view_model();
            detail.load(id).await;
            print_json(&into_value(detail.state().product)?)
        }
        Command::Carts { user_id } => {
            print_json(&terminal(app.product_repository().user_carts(user_id)).await?)
        }
        Command::Home => home(&app).await,
        Command::Connectivity { count } => connectivity(&app, count).await,
    }
}

async fn login(app: &Storefront, email: &str, password: &str) -> Result<()> {
    let auth = app.auth_view_model();
    auth.login(email, password).await;

    let state = auth.state();
    if let Some(message) = state.form_errors.first_message() {
        anyhow::bail!("{}", message);
    }
    into_value(state.login)?;
    print_json(&auth.user_state())
}

async fn whoami(app: &Storefront) -> Result<()> {
    let auth = app.auth_view_model();
    let restored = auth.restore_session().await;
    let session = app.session();
    print_json(&json!({
        "logged_in": session.is_logged_in(),
        "session_valid": restored,
        "session": session.session_data(),
        "last_logged_in_email": auth.last_logged_in_email(),
        "seconds_since_last_login": auth.time_since_last_login().map(|d| d.as_secs()),
    }))
}

async fn home(app: &Storefront) -> Result<()> {
    let home = app.home_view_model();
    home.load_home_data().await;
    let state = home.state();

    let mut sections = serde_json::Map::new();
    for section in HomeSection::ALL {
        let value = match state.section(section) {
            ApiResult::Success(products) => serde_json::to_value(products)?,
            ApiResult::Error(err) => json!({
                "error": err.kind.as_str(),
                "code": err.code,
                "message": err.message,
                "retry_on_reconnect": home.is_network_error(err),
            }),
            _ => json!(null),
        };
        sections.insert(format!("{:?}", section), value);
    }
    print_json(&sections)
}

async fn connectivity(app: &Storefront, count: usize) -> Result<()> {
    let monitor = app.connectivity();
    println!("{}", json!({ "connected": monitor.check_connectivity().await }));

    // The first item is the current state; `count` changes follow it.
    let mut changes = monitor.observe_connectivity().skip(1).take(count);
    while let Some(connected) = changes.next().await {
        println!("{}", json!({ "connected": connected }));
    }
    Ok(())
}

/// Drive a pipeline stream and return its terminal value.
async fn terminal<T>(stream: ApiStream<T>) -> Result<T, ApiError> {
    let last = stream
        .filter(|result| std::future::ready(result.is_terminal()))
        .next()
        .await;
    into_value(last.unwrap_or_default())
}

fn into_value<T>(result: ApiResult<T>) -> Result<T, ApiError> {
    result.into_result().unwrap_or_else(|| {
        Err(ApiError::new(
            storefront::network::ErrorKind::Unknown,
            "Call did not complete",
        ))
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
