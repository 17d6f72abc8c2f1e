//! In-memory key directory.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::chains::descriptor::ChainDescriptor;
use crate::chains::types::KeyId;
use crate::config::schema::KeyEntryConfig;
use crate::keys::directory::{KeyDirectory, PublishedKey};
use crate::routing::types::RoutingResult;

/// Key directory backed by a concurrent map of `(chain, key id)` → key.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyDirectory {
    keys: Arc<DashMap<(String, KeyId), PublishedKey>>,
}

impl MemoryKeyDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `[[directory.keys]]` entries, deriving each key id with the
    /// entry's chain descriptor. Entries for unknown chains or addresses the
    /// chain rejects are skipped with a warning.
    pub fn from_entries(entries: &[KeyEntryConfig], chains: &[Arc<dyn ChainDescriptor>]) -> Self {
        let directory = Self::new();
        for entry in entries {
            let Some(chain) = chains.iter().find(|c| c.name() == entry.chain) else {
                tracing::warn!(chain = %entry.chain, "Skipping key entry for unregistered chain");
                continue;
            };
            if !chain.is_address_valid(&entry.address) {
                tracing::warn!(
                    chain = %entry.chain,
                    address = %entry.address,
                    "Skipping key entry with an address the chain rejects"
                );
                continue;
            }
            let key_id = chain.address_to_key_id(&entry.address);
            directory.publish(
                chain.name(),
                key_id,
                PublishedKey {
                    public_key: entry.public_key.clone(),
                    source: entry.source,
                },
            );
        }
        tracing::debug!(keys = directory.len(), "Key directory loaded");
        directory
    }

    /// Publish (or overwrite) the key for `key_id` on `chain`.
    pub fn publish(&self, chain: &str, key_id: KeyId, key: PublishedKey) {
        self.keys.insert((chain.to_string(), key_id), key);
    }

    /// Remove a key. Returns the key that was published, if any.
    pub fn revoke(&self, chain: &str, key_id: &KeyId) -> Option<PublishedKey> {
        self.keys
            .remove(&(chain.to_string(), key_id.clone()))
            .map(|(_, key)| key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[async_trait]
impl KeyDirectory for MemoryKeyDirectory {
    async fn lookup(&self, chain: &str, key_id: &KeyId) -> RoutingResult<Option<PublishedKey>> {
        Ok(self
            .keys
            .get(&(chain.to_string(), key_id.clone()))
            .map(|r| r.value().clone()))
    }
}
