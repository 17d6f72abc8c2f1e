//! Resolver metrics.
//!
//! # Metrics
//! - `router_resolutions_total` (counter): resolutions by outcome (`ok`, `error`)
//! - `router_resolution_duration_seconds` (histogram): end-to-end resolution latency
//! - `router_unroutable_recipients_total` (counter): recipients left without a route
//! - `router_key_lookups_total` (counter): key lookups by chain and result
//! - `router_key_cache_hits_total` (counter): lookups answered from the TTL cache
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the host installs an exporter
//! - Without an installed recorder every call is a no-op

use std::time::Instant;

/// Record a finished resolution.
pub fn record_resolution(outcome: &'static str, started: Instant) {
    metrics::counter!("router_resolutions_total", "outcome" => outcome).increment(1);
    metrics::histogram!("router_resolution_duration_seconds")
        .record(started.elapsed().as_secs_f64());
}

/// Record recipients that ended up in no route.
pub fn record_unroutable(count: usize) {
    if count > 0 {
        metrics::counter!("router_unroutable_recipients_total").increment(count as u64);
    }
}

/// Record one key lookup (`found`, `missing` or `error`).
pub fn record_key_lookup(chain: &str, result: &'static str) {
    metrics::counter!(
        "router_key_lookups_total",
        "chain" => chain.to_string(),
        "result" => result
    )
    .increment(1);
}

/// Record a lookup served from cache.
pub fn record_key_cache_hit(chain: &str) {
    metrics::counter!("router_key_cache_hits_total", "chain" => chain.to_string()).increment(1);
}
