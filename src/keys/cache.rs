//! Short-lived memoization of key lookups.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::chains::types::KeyId;
use crate::keys::directory::{KeyDirectory, PublishedKey};
use crate::observability::metrics;
use crate::routing::types::RoutingResult;

#[derive(Debug, Clone)]
struct CachedLookup {
    fetched_at: Instant,
    key: Option<PublishedKey>,
}

/// Wraps a directory and remembers its answers for `ttl`.
///
/// Both "key found" and "no key" answers are cached. Errors are not.
/// Expired answers are dropped when read, and all expired answers are swept
/// at most once per `ttl` when a new answer is stored.
#[derive(Debug, Clone)]
pub struct CachedKeyDirectory {
    inner: Arc<dyn KeyDirectory>,
    entries: Arc<DashMap<(String, KeyId), CachedLookup>>,
    ttl: Duration,
    last_sweep: Arc<Mutex<Instant>>,
}

impl CachedKeyDirectory {
    pub fn new(inner: Arc<dyn KeyDirectory>, ttl: Duration) -> Self {
        Self {
            inner,
            entries: Arc::new(DashMap::new()),
            ttl,
            last_sweep: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Drop every cached answer.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of cached answers. May include expired ones until the next sweep.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn fresh(&self, slot: &(String, KeyId)) -> Option<Option<PublishedKey>> {
        if let Some(entry) = self.entries.get(slot) {
            if entry.fetched_at.elapsed() < self.ttl {
                return Some(entry.key.clone());
            }
        }
        self.entries
            .remove_if(slot, |_, entry| entry.fetched_at.elapsed() >= self.ttl);
        None
    }

    /// Drop every expired answer, unless a sweep ran within the last `ttl`.
    fn sweep_expired(&self) {
        let Ok(mut last_sweep) = self.last_sweep.try_lock() else {
            return;
        };
        if last_sweep.elapsed() < self.ttl {
            return;
        }
        *last_sweep = Instant::now();

        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.fetched_at.elapsed() < ttl);
        tracing::debug!(
            evicted = before.saturating_sub(self.entries.len()),
            remaining = self.entries.len(),
            "Swept expired key lookups"
        );
    }
}

#[async_trait]
impl KeyDirectory for CachedKeyDirectory {
    async fn lookup(&self, chain: &str, key_id: &KeyId) -> RoutingResult<Option<PublishedKey>> {
        let slot = (chain.to_string(), key_id.clone());
        if let Some(key) = self.fresh(&slot) {
            metrics::record_key_cache_hit(chain);
            return Ok(key);
        }

        let key = self.inner.lookup(chain, key_id).await?;
        self.sweep_expired();
        self.entries.insert(
            slot,
            CachedLookup {
                fetched_at: Instant::now(),
                key: key.clone(),
            },
        );
        Ok(key)
    }
}
