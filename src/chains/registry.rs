//! Ordered registry of active chains.
//!
//! # Responsibilities
//! - Hold the chains the host application has activated, in registration order
//! - Answer which chains accept a given address format
//! - Swap the chain list atomically on configuration reload
//!
//! # Design Decisions
//! - Registration order is the preference order used by the resolver
//! - Readers take a snapshot; a swap never disturbs a resolution in flight
//! - No blockchain I/O: validation is a local format check

use arc_swap::ArcSwap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::chains::descriptor::{build_descriptor, ChainDescriptor};
use crate::chains::types::ChainConfig;
use crate::config::schema::RouterConfig;

/// Immutable snapshot of the registered chains.
pub type ChainList = Arc<Vec<Arc<dyn ChainDescriptor>>>;

/// Registry of chain descriptors shared between the resolver and the reload task.
pub struct ChainRegistry {
    chains: ArcSwap<Vec<Arc<dyn ChainDescriptor>>>,
}

impl ChainRegistry {
    /// Create a registry with the given chains, in preference order.
    pub fn new(chains: Vec<Arc<dyn ChainDescriptor>>) -> Self {
        Self {
            chains: ArcSwap::from_pointee(chains),
        }
    }

    /// Create an empty registry.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Build the registry from `[[chains]]` configuration entries.
    pub fn from_config(configs: &[ChainConfig]) -> Self {
        Self::new(configs.iter().map(build_descriptor).collect())
    }

    /// Current chain list. Stable for as long as the caller holds it.
    pub fn snapshot(&self) -> ChainList {
        self.chains.load_full()
    }

    /// Registered chains in iteration order.
    pub fn list_registered_chains(&self) -> Vec<Arc<dyn ChainDescriptor>> {
        self.snapshot().iter().cloned().collect()
    }

    /// Chains accepting `address`, preserving registry order.
    pub fn validating_chains(&self, address: &str) -> Vec<Arc<dyn ChainDescriptor>> {
        validating_chains(&self.snapshot(), address)
    }

    /// Register a chain. A chain with the same name is replaced in place,
    /// otherwise the chain is appended.
    pub fn register(&self, chain: Arc<dyn ChainDescriptor>) {
        self.chains.rcu(|current| {
            let mut next: Vec<_> = current.iter().cloned().collect();
            match next.iter().position(|c| c.name() == chain.name()) {
                Some(idx) => next[idx] = chain.clone(),
                None => next.push(chain.clone()),
            }
            next
        });
        tracing::info!(chain = %chain.name(), "Chain registered");
    }

    /// Replace the whole chain list.
    pub fn replace(&self, chains: Vec<Arc<dyn ChainDescriptor>>) {
        let names: Vec<&str> = chains.iter().map(|c| c.name()).collect();
        tracing::info!(chains = ?names, "Chain registry replaced");
        self.chains.store(Arc::new(chains));
    }

    /// Rebuild the chain list from configuration.
    pub fn apply_config(&self, configs: &[ChainConfig]) {
        self.replace(configs.iter().map(build_descriptor).collect());
    }

    /// Apply every configuration received on `updates` until the sender is dropped.
    pub fn follow_updates(
        self: Arc<Self>,
        mut updates: mpsc::UnboundedReceiver<RouterConfig>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(config) = updates.recv().await {
                self.apply_config(&config.chains);
            }
            tracing::debug!("Registry update channel closed");
        })
    }

    pub fn len(&self) -> usize {
        self.chains.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for ChainRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("ChainRegistry")
            .field("chains", &snapshot.iter().map(|c| c.name()).collect::<Vec<_>>())
            .finish()
    }
}

/// Filter a chain snapshot by address validity, keeping its order.
pub fn validating_chains(
    chains: &[Arc<dyn ChainDescriptor>],
    address: &str,
) -> Vec<Arc<dyn ChainDescriptor>> {
    chains
        .iter()
        .filter(|chain| chain.is_address_valid(address))
        .cloned()
        .collect()
}
