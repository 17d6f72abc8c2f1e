//! Shared mocks for resolver integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use recipient_router::keys::{KeyDirectory, MemoryKeyDirectory, PublishedKey};
use recipient_router::{
    ChainDescriptor, ChainRegistry, KeyId, KeyRouteFinder, RecipientCandidate, Route, RouteType,
    RoutingError,
};
use recipient_router::routing::{RouteRecipient, RoutingResult};

/// A chain accepting addresses that start with `prefix`.
///
/// Key ids are `<name>/<address lowercased>` so tests can tell which chain
/// derived them.
#[derive(Debug)]
pub struct PrefixChain {
    name: String,
    prefix: String,
}

impl PrefixChain {
    pub fn new(name: &str, prefix: &str) -> Arc<dyn ChainDescriptor> {
        Arc::new(Self {
            name: name.to_string(),
            prefix: prefix.to_string(),
        })
    }
}

impl ChainDescriptor for PrefixChain {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_address_valid(&self, address: &str) -> bool {
        address.starts_with(&self.prefix)
    }

    fn address_to_key_id(&self, address: &str) -> KeyId {
        KeyId(format!("{}/{}", self.name, address.to_lowercase()))
    }
}

pub fn registry(chains: Vec<Arc<dyn ChainDescriptor>>) -> Arc<ChainRegistry> {
    Arc::new(ChainRegistry::new(chains))
}

/// Finder answering from a fixed table of `(chain, key id) → route type`.
///
/// Supports latency and failure injection and records every call.
#[derive(Default)]
pub struct ScriptedFinder {
    keys: HashMap<(String, KeyId), RouteType>,
    delay: Duration,
    failure: Mutex<Option<RoutingError>>,
    calls: AtomicUsize,
    seen_candidates: Mutex<Vec<Vec<RecipientCandidate>>>,
    seen_chains: Mutex<Vec<Vec<String>>>,
}

impl ScriptedFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, chain: &dyn ChainDescriptor, address: &str, route_type: RouteType) -> Self {
        self.keys.insert(
            (chain.name().to_string(), chain.address_to_key_id(address)),
            route_type,
        );
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn fail_with(&self, err: RoutingError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Candidates of every call, in call order.
    pub fn seen_candidates(&self) -> Vec<Vec<RecipientCandidate>> {
        self.seen_candidates.lock().unwrap().clone()
    }

    /// Chain names handed over on every call, in call order.
    pub fn seen_chains(&self) -> Vec<Vec<String>> {
        self.seen_chains.lock().unwrap().clone()
    }

    /// Every original address submitted across all calls.
    pub fn seen_addresses(&self) -> Vec<String> {
        self.seen_candidates()
            .into_iter()
            .flatten()
            .map(|c| c.key_address_original)
            .collect()
    }
}

#[async_trait]
impl KeyRouteFinder for ScriptedFinder {
    async fn find_routes(
        &self,
        candidates: &[RecipientCandidate],
        chains: &[Arc<dyn ChainDescriptor>],
    ) -> RoutingResult<Vec<Route>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_candidates.lock().unwrap().push(candidates.to_vec());
        self.seen_chains
            .lock()
            .unwrap()
            .push(chains.iter().map(|c| c.name().to_string()).collect());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let failure = self.failure.lock().unwrap().clone();
        if let Some(err) = failure {
            return Err(err);
        }

        let mut routes: Vec<Route> = Vec::new();
        for candidate in candidates {
            if !chains.iter().any(|c| c.name() == candidate.chain) {
                continue;
            }
            let slot = (candidate.chain.clone(), candidate.key_address.clone());
            let Some(route_type) = self.keys.get(&slot).copied() else {
                continue;
            };
            let recipient = RouteRecipient {
                key_address_original: candidate.key_address_original.clone(),
                key_address: candidate.key_address.clone(),
                public_key: format!("pk:{}", candidate.key_address),
            };
            match routes
                .iter_mut()
                .find(|r| r.blockchain == candidate.chain && r.route_type == route_type)
            {
                Some(route) => route.recipients.push(recipient),
                None => {
                    let mut route = Route::new(candidate.chain.clone(), route_type);
                    route.recipients.push(recipient);
                    routes.push(route);
                }
            }
        }
        Ok(routes)
    }
}

/// Directory wrapper that counts and records every lookup.
#[derive(Debug, Default)]
pub struct CountingDirectory {
    pub inner: MemoryKeyDirectory,
    lookups: Mutex<Vec<(String, KeyId)>>,
}

impl CountingDirectory {
    pub fn new(inner: MemoryKeyDirectory) -> Self {
        Self {
            inner,
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn lookups(&self) -> Vec<(String, KeyId)> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl KeyDirectory for CountingDirectory {
    async fn lookup(&self, chain: &str, key_id: &KeyId) -> RoutingResult<Option<PublishedKey>> {
        self.lookups
            .lock()
            .unwrap()
            .push((chain.to_string(), key_id.clone()));
        self.inner.lookup(chain, key_id).await
    }
}

/// All original addresses across `routes`, in route order.
pub fn routed_addresses(routes: &[Route]) -> Vec<String> {
    routes
        .iter()
        .flat_map(|r| r.recipients.iter())
        .map(|r| r.key_address_original.clone())
        .collect()
}
