//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! resolver / finder / cache produce:
//!     → logging.rs (structured log events, one span per resolution)
//!     → metrics.rs (counters, histograms)
//! ```
//!
//! # Design Decisions
//! - Every resolution carries a `resolution_id` (UUID v4) in its span

pub mod logging;
pub mod metrics;
