//! The chain descriptor contract.
//!
//! # Responsibilities
//! - Decide whether an address string is well-formed for one chain
//! - Derive the canonical key id used to query that chain's key registry
//!
//! # Design Decisions
//! - Both operations are pure and synchronous: no network access
//! - `address_to_key_id` is only meaningful for addresses the chain accepted
//! - Descriptors are shared as `Arc<dyn ChainDescriptor>` and never mutated

use std::sync::Arc;

use crate::chains::evm::EvmChain;
use crate::chains::tvm::TvmChain;
use crate::chains::types::{ChainConfig, ChainKind, KeyId};

/// A registered blockchain as seen by the route resolver.
pub trait ChainDescriptor: Send + Sync + std::fmt::Debug {
    /// Unique chain name (e.g. `ETHEREUM`, `EVERSCALE`).
    fn name(&self) -> &str;

    /// Returns true if `address` is a well-formed account address on this chain.
    fn is_address_valid(&self, address: &str) -> bool;

    /// Canonical key-lookup id for an address this chain accepted.
    fn address_to_key_id(&self, address: &str) -> KeyId;
}

/// Build a descriptor from its configuration entry.
pub fn build_descriptor(config: &ChainConfig) -> Arc<dyn ChainDescriptor> {
    match config.kind {
        ChainKind::Evm => Arc::new(EvmChain::new(config.name.clone())),
        ChainKind::Tvm => Arc::new(TvmChain::new(config.name.clone())),
    }
}
