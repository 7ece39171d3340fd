//! Bookshelf - interactive catalog menu

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf::{
    config::{AppConfig, LoggingConfig},
    menu::Menu,
    AppError, CatalogService, ErrorCode, Repository,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::from(ErrorCode::Success as u8),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = e
                .downcast_ref::<AppError>()
                .map(AppError::code)
                .unwrap_or(ErrorCode::Failure);
            ExitCode::from(code as u8)
        }
    }
}

fn run() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().map_err(AppError::from)?;
    init_tracing(&config.logging);

    tracing::info!("Starting Bookshelf v{}", env!("CARGO_PKG_VERSION"));

    let repository = Repository::new(&config.storage);
    let mut catalog = CatalogService::open(repository)
        .with_context(|| format!("Failed to open catalog {}", config.storage.path.display()))?;

    let stdin = io::stdin();
    Menu::new(&mut catalog, stdin.lock(), io::stdout()).run()
}

/// Logs go to stderr; stdout belongs to the menu
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("bookshelf={}", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}
