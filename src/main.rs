use clap::Parser;
use std::time::Duration;

use link_optimizer::api::{self, AppState};
use link_optimizer::config::AppConfig;
use link_optimizer::crawler::{self, PageFetcher};

mod args;
use args::{Args, Command};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match AppConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                return;
            }
        },
        None => AppConfig::default(),
    };
    let config = config.with_env_overrides();

    match args.command {
        Command::Serve { bind } => {
            let mut config = config;
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            serve(config).await;
        }
        Command::Crawl { url, max_pages } => {
            crawl_once(&config, &url, max_pages).await;
        }
    }
}

/// Runs the HTTP API until the process is stopped
async fn serve(config: AppConfig) {
    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config);
    let router = api::create_router(state);

    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            ::log::error!("Failed to bind {}: {}", bind_addr, e);
            return;
        }
    };

    ::log::info!("Listening on {}", bind_addr);
    if let Err(e) = axum::serve(listener, router).await {
        ::log::error!("Server error: {}", e);
    }
}

/// One-shot crawl printed as JSON, useful for inspecting what a scan of a
/// site would index
async fn crawl_once(config: &AppConfig, url: &str, max_pages: usize) {
    let fetcher = PageFetcher::new(
        &config.user_agent,
        Duration::from_secs(config.fetch_timeout_secs),
    );

    let start_time = std::time::Instant::now();
    let index = match crawler::crawl(&fetcher, url, max_pages).await {
        Ok(index) => index,
        Err(e) => {
            ::log::error!("Crawl failed: {}", e);
            return;
        }
    };

    ::log::info!(
        "Crawled {} pages in {:.2} seconds",
        index.total_pages,
        start_time.elapsed().as_secs_f64()
    );

    match serde_json::to_string_pretty(&index) {
        Ok(json) => println!("{}", json),
        Err(e) => ::log::error!("Failed to serialize index: {}", e),
    }
}
