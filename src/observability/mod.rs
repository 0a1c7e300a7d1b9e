//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! anchor + blockchain subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, gauges via the `metrics` facade)
//!
//! Consumers:
//!     → tracing-subscriber installed by the binary
//!     → any `metrics` recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a subscriber or recorder by itself
//! - Signing keys are never recorded as log fields or metric labels

pub mod logging;
pub mod metrics;
