//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::chains::types::ChainKind;
use crate::keys::directory::KeySource;
use crate::routing::policy::SelectionPolicy;

/// Root configuration for the recipient router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Resolver behavior.
    pub resolver: ResolverConfig,

    /// Registered chains, in preference order.
    pub chains: Vec<ChainConfig>,

    /// Key lookup timeouts, retries and caching.
    pub lookup: LookupConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Static key directory contents.
    pub directory: DirectoryConfig,
}

/// Resolver configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ResolverConfig {
    /// Chain selection policy (`first_match` or `fallthrough`).
    pub selection: SelectionPolicy,
}

/// One registered chain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChainConfig {
    /// Unique chain name (e.g. "ETHEREUM").
    pub name: String,

    /// Address family.
    pub kind: ChainKind,
}

/// Key lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Per-attempt lookup timeout in milliseconds.
    pub timeout_ms: u64,

    /// Maximum attempts per lookup (1 = no retries).
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// How long lookup answers are cached, in seconds (0 = no cache).
    pub cache_ttl_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 2_000,
            cache_ttl_secs: 0,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Static key directory configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DirectoryConfig {
    pub keys: Vec<KeyEntryConfig>,
}

/// A published key for one address on one chain.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeyEntryConfig {
    /// Chain the key is published on.
    pub chain: String,

    /// Account address as users type it.
    pub address: String,

    /// Hex-encoded public key.
    pub public_key: String,

    /// Where the key comes from (default: registry).
    #[serde(default)]
    pub source: KeySource,
}
