//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, mount order)
//!     → request.rs (attach request ID)
//!     → [webhook | admin | cart | rpc] specific routes
//!     → proxy.rs (forward to the owning upstream)
//!     → render catch-all for everything else
//! ```

pub mod proxy;
pub mod request;
pub mod server;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
