//! Chain-specific identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export ChainConfig from config module to avoid duplication
pub use crate::config::schema::ChainConfig;

/// Canonical key-lookup identifier derived from an address on one chain.
///
/// Opaque to the resolver; only the chain that produced it knows its encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyId(pub String);

impl KeyId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for KeyId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for KeyId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Address family of a configured chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainKind {
    /// Ethereum-compatible chains (20-byte hex accounts).
    Evm,
    /// TON-style chains such as Everscale and Venom (`workchain:hex` accounts).
    Tvm,
}

impl fmt::Display for ChainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainKind::Evm => f.write_str("evm"),
            ChainKind::Tvm => f.write_str("tvm"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_id_conversion() {
        let id = KeyId::from("00ab");
        assert_eq!(id.as_str(), "00ab");
        assert_eq!(id.to_string(), "00ab");
        assert_eq!(KeyId::from("00ab".to_string()), id);
    }

    #[test]
    fn test_chain_kind_serde() {
        let kind: ChainKind = serde_json::from_str("\"tvm\"").unwrap();
        assert_eq!(kind, ChainKind::Tvm);
        assert_eq!(serde_json::to_string(&ChainKind::Evm).unwrap(), "\"evm\"");
    }
}
