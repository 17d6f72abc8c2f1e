//! TON-style chain descriptor (Everscale, Venom).

use crate::chains::descriptor::ChainDescriptor;
use crate::chains::types::KeyId;

const ACCOUNT_HEX_LEN: usize = 64;

/// A TVM chain: accounts are `<workchain>:<64 hex>` on workchain `0` or `-1`.
#[derive(Debug, Clone)]
pub struct TvmChain {
    name: String,
}

impl TvmChain {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ChainDescriptor for TvmChain {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_address_valid(&self, address: &str) -> bool {
        let Some((workchain, account)) = address.split_once(':') else {
            return false;
        };
        matches!(workchain, "0" | "-1")
            && account.len() == ACCOUNT_HEX_LEN
            && account.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// The account part, lowercased. The workchain is not part of the key id.
    fn address_to_key_id(&self, address: &str) -> KeyId {
        let account = address
            .split_once(':')
            .map(|(_, account)| account)
            .unwrap_or(address);
        KeyId(account.to_lowercase())
    }
}
