//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → schema.rs apply_overrides (PORT, NEXT_BUILD, …)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → shared with all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults so the server runs with no file at all
//! - Environment variables win over file values (the process is
//!   env-controlled; the file only supplies the less common knobs)
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigError, CONFIG_PATH_VAR};
pub use schema::{
    BuildConfig, ListenerConfig, ObservabilityConfig, ServerConfig, UpstreamConfig, WebhookConfig,
};
