//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → structured log events (tracing, initialized in main)
//!     → request counters/latency (metrics.rs)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every operational log line, never format strings
//! - A request ID (uuid) is attached before any handler runs
//! - Metrics are cheap (atomic increments) and disabled by default

pub mod metrics;
