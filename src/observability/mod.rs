//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! net + protocol produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Connection IDs and client addresses travel as span/event fields
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
