//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Init logging → Load config → Bind listener → Init CMS → Serve
//!     (or: Serve transiently → Run bundler → Exit, in build mode)
//!
//! Shutdown (shutdown.rs):
//!     ctrl-c or broadcast trigger → Stop accepting → Drain → Exit
//! ```
//!
//! # Design Decisions
//! - Startup is strictly sequential; any initialization error is fatal
//! - Shutdown is cooperative: one broadcast channel, every long-running
//!   task subscribes

pub mod shutdown;

pub use shutdown::Shutdown;
