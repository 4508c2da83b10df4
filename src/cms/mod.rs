//! Content-management backend integration.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     CmsClient::new (parse upstream address)
//!     → init (probe admin interface, fatal on transport failure)
//!
//! Per request:
//!     auth.rs authenticate → GET session endpoint with forwarded
//!     credentials → attach AuthenticatedUser extension (or nothing)
//!
//!     /admin, /admin/* → forwarded verbatim to the CMS
//!     webhook events   → raw bytes relayed to the CMS verifier
//! ```
//!
//! # Design Decisions
//! - The CMS owns users, sessions, and webhook verification; this module
//!   only carries requests to it
//! - A failed session lookup means "no identity", never an error response

pub mod auth;
pub mod client;

pub use auth::AuthenticatedUser;
pub use client::CmsClient;
