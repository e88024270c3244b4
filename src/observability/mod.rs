//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Funding service, chain client, gas station produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout
//!     → optional Prometheus scrape endpoint
//! ```
//!
//! # Design Decisions
//! - Private keys never appear in log fields
//! - Metrics are cheap (no-ops unless an exporter is installed)

pub mod logging;
pub mod metrics;
