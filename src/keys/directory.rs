//! Public key lookup contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::chains::types::KeyId;
use crate::routing::types::{RouteType, RoutingResult};

/// Where a recipient's encryption key was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySource {
    /// Published to the chain's messaging key registry.
    #[default]
    Registry,
    /// The wallet's own on-chain public key.
    Wallet,
}

impl KeySource {
    /// Delivery mechanism implied by the key's origin.
    pub fn route_type(self) -> RouteType {
        match self {
            KeySource::Registry => RouteType::Direct,
            KeySource::Wallet => RouteType::Native,
        }
    }
}

/// An encryption key found for a recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedKey {
    /// Hex-encoded public key bytes.
    pub public_key: String,
    pub source: KeySource,
}

impl PublishedKey {
    pub fn registry(public_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            source: KeySource::Registry,
        }
    }

    pub fn wallet(public_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            source: KeySource::Wallet,
        }
    }
}

/// Looks up whether a key id has a usable encryption key on a chain.
///
/// `Ok(None)` means "no key", which is an ordinary answer. `Err` is reserved
/// for infrastructure failures.
#[async_trait]
pub trait KeyDirectory: Send + Sync + std::fmt::Debug {
    async fn lookup(&self, chain: &str, key_id: &KeyId) -> RoutingResult<Option<PublishedKey>>;
}

#[async_trait]
impl<T: KeyDirectory + ?Sized> KeyDirectory for Arc<T> {
    async fn lookup(&self, chain: &str, key_id: &KeyId) -> RoutingResult<Option<PublishedKey>> {
        (**self).lookup(chain, key_id).await
    }
}
