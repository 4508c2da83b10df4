//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so a minimal (or absent) config is valid.

use serde::{Deserialize, Serialize};

/// Root configuration for the storefront server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Upstream collaborator addresses (CMS, renderer).
    pub upstreams: UpstreamConfig,

    /// Payment-provider webhook intake settings.
    pub webhook: WebhookConfig,

    /// Production build settings.
    pub build: BuildConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host to bind (e.g., "0.0.0.0").
    pub host: String,

    /// Port to bind. Overridden by the `PORT` environment variable.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Addresses of the external collaborators the server glues together.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the content-management backend.
    pub cms_url: String,

    /// Base URL of the server-side rendering delegate.
    pub render_url: String,

    /// Public URL of the application, logged at startup.
    /// Taken from `NEXT_PUBLIC_SERVER_URL` when set.
    pub public_url: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            cms_url: "http://127.0.0.1:3001".to_string(),
            render_url: "http://127.0.0.1:3002".to_string(),
            public_url: None,
        }
    }
}

/// Webhook intake configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Path the payment provider posts events to.
    pub path: String,

    /// Path on the CMS upstream that verifies and handles events.
    pub forward_path: String,

    /// Header carrying the provider's payload signature.
    pub signature_header: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            path: "/api/webhooks/stripe".to_string(),
            forward_path: "/api/webhooks/stripe".to_string(),
            signature_header: "stripe-signature".to_string(),
        }
    }
}

/// Production build configuration.
///
/// `enabled` is normally set through the `NEXT_BUILD` environment variable.
/// When enabled the server starts its listener only transiently, runs the
/// bundler command once, and exits instead of serving application traffic.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Run the production bundler and exit instead of serving.
    pub enabled: bool,

    /// Bundler executable.
    pub command: String,

    /// Arguments passed to the bundler.
    pub args: Vec<String>,

    /// Working directory for the bundler process.
    pub dir: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: "next".to_string(),
            args: vec!["build".to_string()],
            dir: ".".to_string(),
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics exporter.
    pub metrics_enabled: bool,

    /// Bind address for the metrics endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9464".to_string(),
        }
    }
}

/// Interpret an environment flag: `1`, `true`, `yes`, and `on`
/// (case-insensitive) are truthy, anything else (including empty) is falsy.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl ServerConfig {
    /// Apply environment overrides on top of file/default values.
    ///
    /// Takes the variables as an iterator so tests can drive it without
    /// touching the process environment.
    pub fn apply_overrides<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            match key.as_str() {
                "PORT" => match value.parse() {
                    Ok(port) => self.listener.port = port,
                    Err(_) => {
                        tracing::warn!(value = %value, "Ignoring unparseable PORT override");
                    }
                },
                "NEXT_BUILD" => self.build.enabled = is_truthy(&value),
                "NEXT_PUBLIC_SERVER_URL" => self.upstreams.public_url = Some(value),
                "STOREFRONT_CMS_URL" => self.upstreams.cms_url = value,
                "STOREFRONT_RENDER_URL" => self.upstreams.render_url = value,
                _ => {}
            }
        }
    }
}
