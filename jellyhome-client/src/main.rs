use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use env_logger::{Builder, Target};
use log::LevelFilter;

use jellyhome_client::domains::home::{
    HomeCoordinator, HomeDependencies, HomeItem, UiState,
};
use jellyhome_client::domains::playback::{
    JsonProgressStore, MemoryProgressStore, ProgressStore,
};
use jellyhome_client::infra::{
    BundledStrings, ClientConfig, JellyfinClient, LifecycleScope,
};

/// Print the home screen of a Jellyfin server
#[derive(Debug, Parser)]
#[command(name = "jellyhome", version)]
struct Args {
    /// Server URL, overrides config file and environment
    #[arg(long)]
    server: Option<String>,

    /// Config file to use instead of the default location; must exist
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Keep running and refresh on this interval
    #[arg(long, value_name = "SECS")]
    refresh_every: Option<u64>,
}

fn init_logger() {
    Builder::new()
        .target(Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("jellyhome", LevelFilter::Debug)
        .filter_module("jellyhome_client", LevelFilter::Debug)
        .init();
}

fn render(state: &UiState) {
    match state {
        UiState::Loading => println!("Loading..."),
        UiState::Error(message) => println!(
            "Error: {}",
            message.as_deref().unwrap_or("unknown error")
        ),
        UiState::Normal(items) if items.is_empty() => {
            println!("Nothing to show yet")
        }
        UiState::Normal(items) => {
            for item in items {
                let label = match item {
                    HomeItem::Section(_) => item.title().to_string(),
                    HomeItem::ViewItem(view) => format!("Latest in {}", view.name),
                };
                println!("{label}");
                for media in item.items() {
                    match media.progress() {
                        Some(progress) if progress > 0.0 => println!(
                            "  - {} ({:.0}%)",
                            media.display_title(),
                            progress * 100.0
                        ),
                        _ => println!("  - {}", media.display_title()),
                    }
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ClientConfig::open(path, |key| std::env::var(key).ok()),
        None => ClientConfig::load(),
    }
    .context("failed to load configuration")?;
    if let Some(server) = args.server {
        config.server_url = server;
    }
    config.validate().context("invalid configuration")?;

    let repository =
        Arc::new(JellyfinClient::new(&config).context("failed to create client")?);
    let progress_store: Arc<dyn ProgressStore> = match config.progress_store_path()
    {
        Some(path) => Arc::new(JsonProgressStore::new(path)),
        None => Arc::new(MemoryProgressStore::default()),
    };

    let scope = LifecycleScope::current();
    let coordinator = HomeCoordinator::new(
        HomeDependencies {
            repository,
            strings: Arc::new(BundledStrings::for_locale(&config.locale)),
            progress_store,
        },
        &scope,
    );
    let mut states = coordinator.subscribe();

    let outcome = match args.refresh_every {
        None => loop {
            match states.next().await {
                Some(UiState::Error(message)) => {
                    break Err(anyhow!(
                        "failed to load home screen: {}",
                        message.unwrap_or_else(|| "unknown error".to_string())
                    ));
                }
                Some(state) => {
                    render(&state);
                    if state.is_settled() {
                        break Ok(());
                    }
                }
                None => break Ok(()),
            }
        },
        Some(secs) => {
            let mut ticker = tokio::time::interval(Duration::from_secs(secs.max(1)));
            // First tick completes immediately; the initial load is running
            ticker.tick().await;
            loop {
                tokio::select! {
                    state = states.next() => match state {
                        Some(state) => render(&state),
                        None => break,
                    },
                    _ = ticker.tick() => {
                        coordinator.refresh();
                    }
                }
            }
            Ok(())
        }
    };

    scope.cancel();
    outcome
}
