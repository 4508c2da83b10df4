//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all mounts in their required order
//! - Share the pooled upstream client via application state
//! - Wire up middleware (tracing, request ID)
//! - Serve with graceful shutdown
//!
//! # Mount order
//! The sequence is load-bearing and mirrors the startup contract:
//! 1. webhook intake — the only handler that reads the unparsed byte
//!    stream, registered before anything could interpret a body
//! 2. CMS admin passthrough
//! 3. (build mode stops here: application routes never come up)
//! 4. authenticated cart sub-router
//! 5. RPC namespace
//! 6. render catch-all — registered as the fallback so every specific
//!    route wins

use std::sync::Arc;

use axum::{
    routing::{any, post},
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::cart;
use crate::cms::{self, CmsClient};
use crate::config::{ServerConfig, WebhookConfig};
use crate::http::proxy::{HttpClient, UpstreamError};
use crate::http::request::RequestIdLayer;
use crate::lifecycle::shutdown;
use crate::render::{self, RenderClient};
use crate::rpc::{self, RpcRouter};
use crate::webhooks;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub cms: Arc<CmsClient>,
    pub render: Arc<RenderClient>,
    pub rpc: Arc<RpcRouter>,
    pub webhook: WebhookConfig,
}

/// The storefront HTTP server.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new server with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self, UpstreamError> {
        let client: HttpClient = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            cms: Arc::new(CmsClient::new(&config.upstreams.cms_url, client.clone())?),
            render: Arc::new(RenderClient::new(
                &config.upstreams.render_url,
                client,
            )?),
            rpc: Arc::new(rpc::app_router()),
            webhook: config.webhook.clone(),
        };

        let router = Self::build_router(&config, state.clone());
        Ok(Self {
            router,
            config,
            state,
        })
    }

    /// Initialize the CMS attachment. Must succeed before serving.
    pub async fn init(&self) -> Result<(), UpstreamError> {
        self.state.cms.init().await
    }

    /// Build the Axum router with all mounts and middleware layers.
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let app = Router::new()
            .route(&config.webhook.path, post(webhooks::stripe_webhook_handler))
            .route("/admin", any(cms::client::admin_passthrough))
            .route("/admin/{*path}", any(cms::client::admin_passthrough));

        let app = if config.build.enabled {
            app.with_state(state)
        } else {
            app.route("/api/trpc/{procedure}", any(rpc::rpc_handler))
                .fallback(render::forward_handler)
                .with_state(state.clone())
                .nest("/cart", cart::setup_cart_router(state))
        };

        app.layer(RequestIdLayer).layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
