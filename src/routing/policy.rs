//! Chain selection policy.

use serde::{Deserialize, Serialize};

/// How the resolver picks a chain for an address several chains accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Use the first accepting chain in registry order. If that chain has no
    /// key for the address, the address stays unrouted.
    #[default]
    FirstMatch,
    /// Start with the first accepting chain; addresses left unrouted are
    /// retried on their next accepting chain until one yields a route or the
    /// chains run out.
    Fallthrough,
}

impl SelectionPolicy {
    /// Number of selection rounds for an address accepted by `chain_count` chains.
    pub fn rounds(self, chain_count: usize) -> usize {
        match self {
            SelectionPolicy::FirstMatch => chain_count.min(1),
            SelectionPolicy::Fallthrough => chain_count,
        }
    }
}
