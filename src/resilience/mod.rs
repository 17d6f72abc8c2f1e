//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Key lookup:
//!     → retries.rs (per-attempt timeout)
//!     → On transient failure: backoff + retry while budget remains
//!     → Otherwise: error propagates to the route finder
//! ```
//!
//! # Design Decisions
//! - Timeouts and retries live in the lookup layer, never in the resolver
//! - Every lookup attempt has a deadline

pub mod retries;

pub use retries::{calculate_backoff, with_retries, LookupPolicy};
