//! Storefront Bootstrap Server
//!
//! One binary that wires an HTTP listener to four external collaborators.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │               STOREFRONT SERVER                   │
//!                    │                                                   │
//!   Client Request   │  ┌──────────┐   ┌───────────────────────────┐    │
//!   ─────────────────┼─▶│ listener │──▶│ router (fixed mount order) │    │
//!                    │  └──────────┘   └────────────┬──────────────┘    │
//!                    │                              │                    │
//!                    │   POST /api/webhooks/stripe  │  raw bytes ───────┼──▶ CMS verifier
//!                    │   /admin, /admin/*           │  passthrough ─────┼──▶ CMS admin
//!                    │   GET /cart  (auth gate)     │  render page ─────┼──▶ Renderer
//!                    │   ANY /api/trpc/{procedure}  │  local table      │
//!                    │   everything else            │  catch-all ───────┼──▶ Renderer
//!                    │                              │                    │
//!                    │  ┌────────────────────────────────────────────┐  │
//!                    │  │            Cross-Cutting Concerns           │  │
//!                    │  │  config │ lifecycle │ observability │ build │  │
//!                    │  └────────────────────────────────────────────┘  │
//!                    └──────────────────────────────────────────────────┘
//! ```
//!
//! Startup is strictly sequential; any initialization error is fatal.
//! With `NEXT_BUILD` set, the listener only stays up while the renderer's
//! bundler runs, then the process exits.

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_server::build::Bundler;
use storefront_server::config::ServerConfig;
use storefront_server::http::HttpServer;
use storefront_server::lifecycle::Shutdown;
use storefront_server::observability::metrics;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "storefront-server starting");

    let config = ServerConfig::load()?;

    tracing::info!(
        port = config.listener.port,
        cms_url = %config.upstreams.cms_url,
        render_url = %config.upstreams.render_url,
        build_mode = config.build.enabled,
        "Configuration loaded"
    );

    // Bind TCP listener
    let listener = TcpListener::bind((config.listener.host.as_str(), config.listener.port)).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let server = HttpServer::new(config.clone())?;
    server.init().await?;

    let shutdown = Shutdown::new();

    // Build branch: serve transiently, run the bundler once, exit.
    if config.build.enabled {
        let rx = shutdown.subscribe();
        tokio::spawn(async move {
            if let Err(error) = server.run(listener, rx).await {
                tracing::error!(error = %error, "Transient server error during build");
            }
        });

        tracing::info!("Building for production");
        Bundler::new(config.build.clone()).run().await?;

        shutdown.trigger();
        std::process::exit(0);
    }

    if let Some(public_url) = &config.upstreams.public_url {
        tracing::info!(url = %public_url, "Application URL");
    }

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
