//! Storefront Bootstrap Server Library

pub mod build;
pub mod cart;
pub mod cms;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod render;
pub mod rpc;
pub mod webhooks;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
