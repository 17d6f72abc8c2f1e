//! Ethereum-compatible chain descriptor.

use alloy::primitives::{hex, Address, B256};

use crate::chains::descriptor::ChainDescriptor;
use crate::chains::types::KeyId;

/// An EVM chain: accounts are `0x` followed by 40 hex characters.
///
/// Mixed-case addresses must carry a valid EIP-55 checksum; all-lowercase and
/// all-uppercase forms are accepted as-is.
#[derive(Debug, Clone)]
pub struct EvmChain {
    name: String,
}

impl EvmChain {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ChainDescriptor for EvmChain {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_address_valid(&self, address: &str) -> bool {
        let Some(body) = address.strip_prefix("0x") else {
            return false;
        };
        if body.len() != 40 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
            return false;
        }

        let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper {
            Address::parse_checksummed(address, None).is_ok()
        } else {
            address.parse::<Address>().is_ok()
        }
    }

    /// The address as a left-padded uint256, lowercase hex without prefix.
    fn address_to_key_id(&self, address: &str) -> KeyId {
        match address.parse::<Address>() {
            Ok(parsed) => KeyId(hex::encode(B256::left_padding_from(parsed.as_slice()))),
            Err(_) => {
                let body = address.strip_prefix("0x").unwrap_or(address).to_lowercase();
                KeyId(format!("{:0>64}", body))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_accepts_lowercase_and_checksummed() {
        let chain = EvmChain::new("ETHEREUM");
        assert!(chain.is_address_valid("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
        assert!(chain.is_address_valid(CHECKSUMMED));
        assert!(chain.is_address_valid("0x52908400098527886E0F7030069857D2E4169EE7"));
    }

    #[test]
    fn test_rejects_malformed() {
        let chain = EvmChain::new("ETHEREUM");
        // Broken checksum (first 'A' lowered)
        assert!(!chain.is_address_valid("0x5aaeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
        assert!(!chain.is_address_valid("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
        assert!(!chain.is_address_valid("0x5aaeb6053f3e94c9b9a09f33669435e7ef1bea"));
        assert!(!chain.is_address_valid("0xzzzeb6053f3e94c9b9a09f33669435e7ef1beaed"));
        assert!(!chain.is_address_valid(""));
    }

    #[test]
    fn test_key_id_is_padded_uint256() {
        let chain = EvmChain::new("ETHEREUM");
        let id = chain.address_to_key_id(CHECKSUMMED);
        assert_eq!(
            id.as_str(),
            "0000000000000000000000005aaeb6053f3e94c9b9a09f33669435e7ef1beaed"
        );
        // Case does not change the key id
        assert_eq!(
            chain.address_to_key_id("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"),
            id
        );
    }
}
