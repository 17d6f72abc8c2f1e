//! Recipient route resolution for encrypted on-chain messaging.
//!
//! Given recipient addresses, decides which registered chain can deliver an
//! encrypted message to each one and groups recipients into delivery routes.
//! Recipients without a usable key are left out of every route.

pub mod chains;
pub mod config;
pub mod keys;
pub mod observability;
pub mod resilience;
pub mod routing;

pub use chains::{ChainDescriptor, ChainRegistry, KeyId};
pub use config::RouterConfig;
pub use keys::{KeyDirectory, PublishedKey};
pub use routing::{
    unrouted_addresses, KeyRouteFinder, RecipientCandidate, Route, RouteResolver, RouteType,
    RoutingError, SelectionPolicy,
};
