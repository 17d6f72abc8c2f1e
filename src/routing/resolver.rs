//! Recipient route resolution.
//!
//! # Responsibilities
//! - Pick a chain for every recipient address (registry order, per policy)
//! - Derive key ids and hand the candidates to the route finder
//! - Return routes; addresses missing from every route are unroutable
//!
//! # Design Decisions
//! - Chain selection happens before any key lookup and never touches the network
//! - The registry is read once per call; the chain list is stable for that call
//! - Finder errors abort the whole call, no partial route list is returned
//! - Each address ends up in at most one route, and only requested addresses appear

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

use crate::chains::descriptor::ChainDescriptor;
use crate::chains::registry::{validating_chains, ChainRegistry};
use crate::config::schema::RouterConfig;
use crate::keys::cache::CachedKeyDirectory;
use crate::keys::directory::KeyDirectory;
use crate::keys::memory::MemoryKeyDirectory;
use crate::observability::metrics;
use crate::resilience::retries::LookupPolicy;
use crate::routing::finder::{DirectoryRouteFinder, KeyRouteFinder};
use crate::routing::policy::SelectionPolicy;
use crate::routing::types::{RecipientCandidate, Route, RoutingResult};

/// An address together with the chains that accept it, in registry order.
struct PendingRecipient {
    address: String,
    chains: Vec<Arc<dyn ChainDescriptor>>,
}

/// Maps recipient addresses to delivery routes.
pub struct RouteResolver<F> {
    registry: Arc<ChainRegistry>,
    finder: F,
    policy: SelectionPolicy,
}

impl<F: KeyRouteFinder> RouteResolver<F> {
    /// Create a resolver over `registry` using `finder` for key lookups.
    pub fn new(registry: Arc<ChainRegistry>, finder: F) -> Self {
        Self {
            registry,
            finder,
            policy: SelectionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn registry(&self) -> &Arc<ChainRegistry> {
        &self.registry
    }

    /// Resolve delivery routes for `addresses`.
    ///
    /// Addresses that cannot be routed are simply absent from the result; use
    /// [`unrouted_addresses`] to list them. An `Err` means an infrastructure
    /// failure during key lookup and carries no partial result.
    pub async fn resolve_routes<S: AsRef<str>>(&self, addresses: &[S]) -> RoutingResult<Vec<Route>> {
        let resolution_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "resolve_routes",
            %resolution_id,
            requested = addresses.len(),
            recipients = distinct_addresses(addresses).len(),
            policy = ?self.policy
        );
        let started = Instant::now();

        let result = self.resolve(addresses).instrument(span.clone()).await;

        let _entered = span.enter();
        match &result {
            Ok(routes) => {
                let unroutable = unrouted_addresses(addresses, routes).len();
                metrics::record_resolution("ok", started);
                metrics::record_unroutable(unroutable);
                tracing::info!(
                    routes = routes.len(),
                    unroutable,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Routes resolved"
                );
            }
            Err(e) => {
                metrics::record_resolution("error", started);
                tracing::warn!(error = %e, "Route resolution failed");
            }
        }
        result
    }

    /// Route for a single address, or `None` if it cannot be routed.
    pub async fn is_address_routable(&self, address: &str) -> RoutingResult<Option<Route>> {
        let routes = self.resolve_routes(&[address]).await?;
        Ok(routes.into_iter().find(|route| route.contains(address)))
    }

    async fn resolve<S: AsRef<str>>(&self, addresses: &[S]) -> RoutingResult<Vec<Route>> {
        let chains = self.registry.snapshot();

        let mut pending = Vec::new();
        for address in distinct_addresses(addresses) {
            let accepting = validating_chains(&chains, address);
            if accepting.is_empty() {
                tracing::debug!(address, "No registered chain accepts this address format");
                continue;
            }
            pending.push(PendingRecipient {
                address: address.to_string(),
                chains: accepting,
            });
        }

        let rounds = pending
            .iter()
            .map(|p| self.policy.rounds(p.chains.len()))
            .max()
            .unwrap_or(0);

        let mut routes: Vec<Route> = Vec::new();
        let mut routed: HashSet<String> = HashSet::new();
        for round in 0..rounds {
            let batch: Vec<&PendingRecipient> = pending
                .iter()
                .filter(|p| !routed.contains(&p.address) && round < self.policy.rounds(p.chains.len()))
                .collect();
            if batch.is_empty() {
                break;
            }

            let candidates: Vec<RecipientCandidate> = batch
                .iter()
                .map(|p| {
                    let chain = &p.chains[round];
                    RecipientCandidate {
                        key_address: chain.address_to_key_id(&p.address),
                        key_address_original: p.address.clone(),
                        chain: chain.name().to_string(),
                    }
                })
                .collect();
            let involved = candidate_chains(&chains, &candidates);

            tracing::debug!(
                round,
                candidates = candidates.len(),
                chains = involved.len(),
                "Looking up recipient keys"
            );
            let found = self.finder.find_routes(&candidates, &involved).await?;
            merge_routes(&mut routes, &mut routed, found, &candidates);
        }

        Ok(routes)
    }
}

impl RouteResolver<DirectoryRouteFinder> {
    /// Build a resolver whose key directory is the config's `[[directory.keys]]`.
    pub fn from_config(config: &RouterConfig) -> Self {
        let registry = Arc::new(ChainRegistry::from_config(&config.chains));
        let directory = MemoryKeyDirectory::from_entries(&config.directory.keys, &registry.snapshot());
        Self::with_directory(registry, Arc::new(directory), config)
    }

    /// Build a resolver over an existing registry and key directory, applying
    /// the config's lookup, cache and selection settings.
    pub fn with_directory(
        registry: Arc<ChainRegistry>,
        directory: Arc<dyn KeyDirectory>,
        config: &RouterConfig,
    ) -> Self {
        let directory: Arc<dyn KeyDirectory> = if config.lookup.cache_ttl_secs > 0 {
            Arc::new(CachedKeyDirectory::new(
                directory,
                Duration::from_secs(config.lookup.cache_ttl_secs),
            ))
        } else {
            directory
        };
        let finder = DirectoryRouteFinder::new(directory, LookupPolicy::from(&config.lookup));
        Self::new(registry, finder).with_policy(config.resolver.selection)
    }
}

/// Input addresses with duplicates removed, first occurrence wins.
fn distinct_addresses<S: AsRef<str>>(addresses: &[S]) -> Vec<&str> {
    let mut seen = HashSet::new();
    addresses
        .iter()
        .map(|a| a.as_ref())
        .filter(|address| seen.insert(*address))
        .collect()
}

/// Registry chains chosen for at least one candidate, in registry order.
fn candidate_chains(
    chains: &[Arc<dyn ChainDescriptor>],
    candidates: &[RecipientCandidate],
) -> Vec<Arc<dyn ChainDescriptor>> {
    chains
        .iter()
        .filter(|chain| candidates.iter().any(|c| c.chain == chain.name()))
        .cloned()
        .collect()
}

/// Fold a finder answer into `routes`.
///
/// Recipients that were not submitted in this round, or that already have a
/// route, are dropped.
fn merge_routes(
    routes: &mut Vec<Route>,
    routed: &mut HashSet<String>,
    found: Vec<Route>,
    candidates: &[RecipientCandidate],
) {
    for route in found {
        let mut accepted = Vec::with_capacity(route.recipients.len());
        for recipient in route.recipients {
            let submitted = candidates
                .iter()
                .any(|c| c.key_address_original == recipient.key_address_original);
            if !submitted {
                tracing::warn!(
                    address = %recipient.key_address_original,
                    chain = %route.blockchain,
                    "Finder returned a recipient that was not requested; dropping it"
                );
                continue;
            }
            if !routed.insert(recipient.key_address_original.clone()) {
                tracing::warn!(
                    address = %recipient.key_address_original,
                    chain = %route.blockchain,
                    "Recipient already routed; dropping duplicate"
                );
                continue;
            }
            accepted.push(recipient);
        }
        if accepted.is_empty() {
            continue;
        }

        match routes
            .iter_mut()
            .find(|r| r.blockchain == route.blockchain && r.route_type == route.route_type)
        {
            Some(existing) => existing.recipients.extend(accepted),
            None => routes.push(Route {
                recipients: accepted,
                route_type: route.route_type,
                blockchain: route.blockchain,
            }),
        }
    }
}

/// Requested addresses that appear in no route, deduplicated, in request order.
pub fn unrouted_addresses<S: AsRef<str>>(requested: &[S], routes: &[Route]) -> Vec<String> {
    let routed: HashSet<&str> = routes
        .iter()
        .flat_map(|r| r.recipients.iter())
        .map(|r| r.key_address_original.as_str())
        .collect();

    let mut seen = HashSet::new();
    requested
        .iter()
        .map(|a| a.as_ref())
        .filter(|a| !routed.contains(a) && seen.insert(*a))
        .map(str::to_string)
        .collect()
}
