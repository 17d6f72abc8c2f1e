//! Encryption route finding.
//!
//! # Responsibilities
//! - Look up a key for every recipient candidate on its derived chain
//! - Group recipients that share a chain and delivery mechanism into one route
//! - Leave recipients without a key out of every route
//!
//! # Design Decisions
//! - Lookups for one call run concurrently; the first error aborts the call
//! - Routes appear in order of their first recipient, recipients in candidate order
//! - Candidates whose chain was not supplied are never looked up

use async_trait::async_trait;
use futures_util::future::try_join_all;
use std::sync::Arc;

use crate::chains::descriptor::ChainDescriptor;
use crate::keys::directory::{KeyDirectory, PublishedKey};
use crate::observability::metrics;
use crate::resilience::retries::{with_retries, LookupPolicy};
use crate::routing::types::{RecipientCandidate, Route, RouteRecipient, RoutingResult};

/// Turns recipient candidates into delivery routes.
///
/// Implementations perform the network-bound key lookups. Recipients for which
/// no key exists are omitted from the result; only infrastructure failures are
/// returned as errors.
#[async_trait]
pub trait KeyRouteFinder: Send + Sync {
    async fn find_routes(
        &self,
        candidates: &[RecipientCandidate],
        chains: &[Arc<dyn ChainDescriptor>],
    ) -> RoutingResult<Vec<Route>>;
}

#[async_trait]
impl<T: KeyRouteFinder + ?Sized> KeyRouteFinder for Arc<T> {
    async fn find_routes(
        &self,
        candidates: &[RecipientCandidate],
        chains: &[Arc<dyn ChainDescriptor>],
    ) -> RoutingResult<Vec<Route>> {
        (**self).find_routes(candidates, chains).await
    }
}

/// Route finder backed by a [`KeyDirectory`].
#[derive(Debug, Clone)]
pub struct DirectoryRouteFinder {
    directory: Arc<dyn KeyDirectory>,
    policy: LookupPolicy,
}

impl DirectoryRouteFinder {
    pub fn new(directory: Arc<dyn KeyDirectory>, policy: LookupPolicy) -> Self {
        Self { directory, policy }
    }

    async fn lookup(&self, candidate: &RecipientCandidate) -> RoutingResult<Option<PublishedKey>> {
        let result = with_retries(&self.policy, &candidate.chain, || {
            self.directory.lookup(&candidate.chain, &candidate.key_address)
        })
        .await;

        let outcome = match &result {
            Ok(Some(_)) => "found",
            Ok(None) => "missing",
            Err(_) => "error",
        };
        metrics::record_key_lookup(&candidate.chain, outcome);
        result
    }
}

#[async_trait]
impl KeyRouteFinder for DirectoryRouteFinder {
    async fn find_routes(
        &self,
        candidates: &[RecipientCandidate],
        chains: &[Arc<dyn ChainDescriptor>],
    ) -> RoutingResult<Vec<Route>> {
        let eligible: Vec<&RecipientCandidate> = candidates
            .iter()
            .filter(|c| chains.iter().any(|chain| chain.name() == c.chain))
            .collect();

        let keys = try_join_all(eligible.iter().map(|c| self.lookup(c))).await?;

        let mut routes: Vec<Route> = Vec::new();
        for (candidate, key) in eligible.into_iter().zip(keys) {
            let Some(key) = key else {
                tracing::debug!(
                    chain = %candidate.chain,
                    address = %candidate.key_address_original,
                    "No encryption key published"
                );
                continue;
            };
            let route_type = key.source.route_type();
            let recipient = RouteRecipient {
                key_address_original: candidate.key_address_original.clone(),
                key_address: candidate.key_address.clone(),
                public_key: key.public_key,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::evm::EvmChain;
    use crate::chains::types::KeyId;
    use crate::keys::memory::MemoryKeyDirectory;
    use crate::routing::types::{RouteType, RoutingError};
    use std::time::Duration;

    fn candidate(chain: &str, key: &str, original: &str) -> RecipientCandidate {
        RecipientCandidate {
            key_address: KeyId::from(key),
            key_address_original: original.into(),
            chain: chain.into(),
        }
    }

    fn chains(names: &[&str]) -> Vec<Arc<dyn ChainDescriptor>> {
        names
            .iter()
            .map(|n| Arc::new(EvmChain::new(*n)) as Arc<dyn ChainDescriptor>)
            .collect()
    }

    #[tokio::test]
    async fn test_groups_by_chain_and_type() {
        let directory = MemoryKeyDirectory::new();
        directory.publish("ETHEREUM", KeyId::from("a"), PublishedKey::registry("04a"));
        directory.publish("ETHEREUM", KeyId::from("b"), PublishedKey::wallet("04b"));
        directory.publish("ETHEREUM", KeyId::from("c"), PublishedKey::registry("04c"));
        directory.publish("POLYGON", KeyId::from("d"), PublishedKey::registry("04d"));

        let finder = DirectoryRouteFinder::new(Arc::new(directory), LookupPolicy::default());
        let routes = finder
            .find_routes(
                &[
                    candidate("ETHEREUM", "a", "A"),
                    candidate("ETHEREUM", "b", "B"),
                    candidate("POLYGON", "d", "D"),
                    candidate("ETHEREUM", "missing", "M"),
                    candidate("ETHEREUM", "c", "C"),
                ],
                &chains(&["ETHEREUM", "POLYGON"]),
            )
            .await
            .unwrap();

        assert_eq!(routes.len(), 3);
        assert_eq!(routes[0].blockchain, "ETHEREUM");
        assert_eq!(routes[0].route_type, RouteType::Direct);
        let originals: Vec<_> = routes[0]
            .recipients
            .iter()
            .map(|r| r.key_address_original.as_str())
            .collect();
        assert_eq!(originals, vec!["A", "C"]);
        assert_eq!(routes[1].route_type, RouteType::Native);
        assert_eq!(routes[2].blockchain, "POLYGON");
        assert!(!routes.iter().any(|r| r.contains("M")));
    }

    #[tokio::test]
    async fn test_skips_candidates_for_unsupplied_chains() {
        let directory = MemoryKeyDirectory::new();
        directory.publish("POLYGON", KeyId::from("d"), PublishedKey::registry("04d"));

        let finder = DirectoryRouteFinder::new(Arc::new(directory), LookupPolicy::default());
        let routes = finder
            .find_routes(&[candidate("POLYGON", "d", "D")], &chains(&["ETHEREUM"]))
            .await
            .unwrap();
        assert!(routes.is_empty());
    }

    #[derive(Debug)]
    struct BrokenDirectory;

    #[async_trait]
    impl KeyDirectory for BrokenDirectory {
        async fn lookup(&self, chain: &str, _key_id: &KeyId) -> RoutingResult<Option<PublishedKey>> {
            Err(RoutingError::Unavailable {
                chain: chain.to_string(),
                reason: "connection refused".into(),
            })
        }
    }

    #[tokio::test]
    async fn test_lookup_error_aborts() {
        let policy = LookupPolicy {
            timeout: Duration::from_millis(100),
            max_attempts: 2,
            base_delay_ms: 1,
            max_delay_ms: 2,
        };
        let finder = DirectoryRouteFinder::new(Arc::new(BrokenDirectory), policy);
        let err = finder
            .find_routes(&[candidate("ETHEREUM", "a", "A")], &chains(&["ETHEREUM"]))
            .await
            .unwrap_err();
        assert!(matches!(err, RoutingError::Unavailable { .. }));
    }
}
