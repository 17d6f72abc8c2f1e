//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Recipient addresses
//!     → resolver.rs (chain selection per address, registry order)
//!     → RecipientCandidate[] + the chains chosen for them
//!     → finder.rs (key lookups, grouping by chain + delivery type)
//!     → Route[] (addresses absent from every route are unroutable)
//! ```
//!
//! # Design Decisions
//! - Unroutable recipients are not errors; absence is the signal
//! - Deterministic: same registry and same key answers give the same routes
//! - Selection policy is explicit (first match by default)

pub mod finder;
pub mod policy;
pub mod resolver;
pub mod types;

pub use finder::{DirectoryRouteFinder, KeyRouteFinder};
pub use policy::SelectionPolicy;
pub use resolver::{unrouted_addresses, RouteResolver};
pub use types::{RecipientCandidate, Route, RouteRecipient, RouteType, RoutingError, RoutingResult};
