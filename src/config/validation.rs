//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (key entries reference registered chains)
//! - Validate value ranges (timeouts > 0, attempts > 0, backoff bounds)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - An empty chain list is valid: every address is then unroutable

use std::collections::HashSet;
use thiserror::Error;

use crate::chains::descriptor::build_descriptor;
use crate::config::schema::RouterConfig;
use crate::observability::logging::LOG_LEVELS;

/// A semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("chains[{0}] has an empty name")]
    EmptyChainName(usize),

    #[error("chain {0} is registered more than once")]
    DuplicateChain(String),

    #[error("lookup.timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("lookup.max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("lookup.base_delay_ms ({base}) exceeds lookup.max_delay_ms ({max})")]
    BackoffRange { base: u64, max: u64 },

    #[error("key entry for {address} references unregistered chain {chain}")]
    UnknownKeyChain { chain: String, address: String },

    #[error("key entry address {address} is not valid on chain {chain}")]
    InvalidKeyAddress { chain: String, address: String },

    #[error("key entry for {address} on {chain} has an empty public key")]
    EmptyPublicKey { chain: String, address: String },

    #[error("unknown log level '{0}'")]
    InvalidLogLevel(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut names = HashSet::new();
    for (idx, chain) in config.chains.iter().enumerate() {
        if chain.name.trim().is_empty() {
            errors.push(ValidationError::EmptyChainName(idx));
        } else if !names.insert(chain.name.as_str()) {
            errors.push(ValidationError::DuplicateChain(chain.name.clone()));
        }
    }

    let lookup = &config.lookup;
    if lookup.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if lookup.max_attempts == 0 {
        errors.push(ValidationError::ZeroAttempts);
    }
    if lookup.base_delay_ms > lookup.max_delay_ms {
        errors.push(ValidationError::BackoffRange {
            base: lookup.base_delay_ms,
            max: lookup.max_delay_ms,
        });
    }

    for entry in &config.directory.keys {
        let Some(chain) = config.chains.iter().find(|c| c.name == entry.chain) else {
            errors.push(ValidationError::UnknownKeyChain {
                chain: entry.chain.clone(),
                address: entry.address.clone(),
            });
            continue;
        };
        if !build_descriptor(chain).is_address_valid(&entry.address) {
            errors.push(ValidationError::InvalidKeyAddress {
                chain: entry.chain.clone(),
                address: entry.address.clone(),
            });
        }
        if entry.public_key.trim().is_empty() {
            errors.push(ValidationError::EmptyPublicKey {
                chain: entry.chain.clone(),
                address: entry.address.clone(),
            });
        }
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
