//! Route records and routing error definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::chains::types::KeyId;

/// A recipient address prepared for key lookup on one chain.
///
/// Built fresh for every resolution and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientCandidate {
    /// Canonical key id derived on `chain`.
    pub key_address: KeyId,
    /// The address exactly as the caller supplied it.
    pub key_address_original: String,
    /// Name of the chain the key id was derived on.
    pub chain: String,
}

/// How a message reaches the recipients of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteType {
    /// Recipient published a messaging key in the chain's key registry.
    Direct,
    /// Recipient's wallet public key on the chain is used for encryption.
    Native,
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteType::Direct => f.write_str("direct"),
            RouteType::Native => f.write_str("native"),
        }
    }
}

/// One recipient inside a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRecipient {
    pub key_address_original: String,
    pub key_address: KeyId,
    /// Hex-encoded public key the message is encrypted to.
    pub public_key: String,
}

/// A group of recipients reachable through the same chain and mechanism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub recipients: Vec<RouteRecipient>,
    #[serde(rename = "type")]
    pub route_type: RouteType,
    pub blockchain: String,
}

impl Route {
    pub fn new(blockchain: impl Into<String>, route_type: RouteType) -> Self {
        Self {
            recipients: Vec::new(),
            route_type,
            blockchain: blockchain.into(),
        }
    }

    /// True if `address` (as originally supplied) is one of this route's recipients.
    pub fn contains(&self, address: &str) -> bool {
        self.recipients
            .iter()
            .any(|r| r.key_address_original == address)
    }
}

/// Infrastructure failures while finding routes.
///
/// An address without a key is never an error; it is simply left out of
/// every route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// A key lookup did not answer in time.
    #[error("Key lookup on {chain} timed out after {timeout_ms} ms")]
    Timeout { chain: String, timeout_ms: u64 },

    /// The key registry for a chain could not be reached.
    #[error("Key directory unavailable for {chain}: {reason}")]
    Unavailable { chain: String, reason: String },

    /// The key registry answered with something that is not a key record.
    #[error("Malformed key record on {chain}: {reason}")]
    MalformedKey { chain: String, reason: String },

    /// The key directory has no backend for this chain.
    #[error("No key directory backend for chain {0}")]
    UnknownChain(String),
}

impl RoutingError {
    /// Whether a retry has a chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RoutingError::Timeout { .. } | RoutingError::Unavailable { .. }
        )
    }
}

/// Result type for routing operations.
pub type RoutingResult<T> = Result<T, RoutingError>;
