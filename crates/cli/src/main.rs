use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use viewtrack_beacon::{FileState, Tracker, TrackerConfig};
use viewtrack_core::{env_parse_with_default, RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW_SECS};
use viewtrack_http::{create_router, AppState};
use viewtrack_service::{RateLimiter, TrackService};
use viewtrack_storage::{MemoryStore, PgStorage, ViewStore};

#[derive(Parser)]
#[command(name = "viewtrack")]
#[command(about = "View tracking endpoint and client beacon", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the tracking endpoint.
    Serve {
        #[arg(short, long, default_value = "37911")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
        /// Use the in-memory store instead of Postgres (local development).
        #[arg(long)]
        memory: bool,
    },
    /// Send one tracking submission, bypassing session dedup.
    Track {
        slug: String,
        #[arg(short, long, default_value = "cli")]
        website: String,
    },
    /// Read the current view count for a slug.
    Count { slug: String },
    /// Register a post so its views can be counted.
    CreatePost { slug: String },
}

fn get_database_url() -> Result<String> {
    std::env::var("VIEWTRACK_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| {
            anyhow::anyhow!(
                "VIEWTRACK_DATABASE_URL or DATABASE_URL environment variable must be set"
            )
        })
}

fn get_endpoint() -> String {
    std::env::var("VIEWTRACK_ENDPOINT")
        .unwrap_or_else(|_| "http://127.0.0.1:37911/track-view".to_string())
}

fn build_rate_limiter() -> RateLimiter {
    let max_requests = env_parse_with_default("VIEWTRACK_RATE_LIMIT", RATE_LIMIT_MAX_REQUESTS);
    let window_secs = env_parse_with_default("VIEWTRACK_RATE_WINDOW_SECS", RATE_LIMIT_WINDOW_SECS);
    RateLimiter::new(max_requests, std::time::Duration::from_secs(window_secs))
}

async fn connect_store(memory: bool) -> Result<Arc<dyn ViewStore>> {
    if memory {
        tracing::warn!("using in-memory store; counters reset on restart");
        Ok(Arc::new(MemoryStore::new()))
    } else {
        Ok(Arc::new(PgStorage::new(&get_database_url()?).await?))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host, memory } => {
            let store = connect_store(memory).await?;
            let service = TrackService::new(store, build_rate_limiter());
            let state = Arc::new(AppState { track_service: Arc::new(service) });
            let router = create_router(state);
            let addr = format!("{}:{}", host, port);
            tracing::info!("Starting HTTP server on {}", addr);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, router).await?;
        }
        Commands::Track { slug, website } => {
            let tracker =
                Tracker::new(TrackerConfig::new(get_endpoint()), Arc::new(FileState::new()))?;
            let resp = tracker.track_slug(&slug, &website).await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
        Commands::Count { slug } => {
            let store = PgStorage::new(&get_database_url()?).await?;
            let count = store.view_count(&slug).await?;
            println!("{count}");
        }
        Commands::CreatePost { slug } => {
            let store = PgStorage::new(&get_database_url()?).await?;
            let inserted = store.create_post(&slug).await?;
            println!("{}", if inserted { "created" } else { "already exists" });
        }
    }

    Ok(())
}
