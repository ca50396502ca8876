use crate::address::normalize_address;
use alloy_primitives::{Address, U256};
use anyhow::Result;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDetail {
    pub symbol: String,
    pub decimals: u32,
}

/// Immutable mapping from normalized token contract address to display
/// parameters. Built once at startup from three positionally aligned
/// configuration lists and passed by reference to the indexer, the API
/// and the query CLI.
#[derive(Debug, Default)]
pub struct TokenRegistry {
    tokens: HashMap<Address, TokenDetail>,
}

impl TokenRegistry {
    /// Builds the registry from aligned configuration lists
    /// (`address[i] <-> symbol[i] <-> decimals[i]`). A length mismatch is
    /// fatal at startup. Duplicate addresses are allowed; the last entry
    /// wins.
    pub fn from_config(addresses: &[String], symbols: &[String], decimals: &[u32]) -> Result<Self> {
        if addresses.len() != symbols.len() || addresses.len() != decimals.len() {
            anyhow::bail!(
                "token configuration lists are misaligned: {} addresses, {} symbols, {} decimals",
                addresses.len(),
                symbols.len(),
                decimals.len()
            );
        }

        let mut tokens = HashMap::with_capacity(addresses.len());
        for ((address, symbol), decimals) in addresses.iter().zip(symbols).zip(decimals) {
            let address = normalize_address(address)?;
            tokens.insert(
                address,
                TokenDetail {
                    symbol: symbol.clone(),
                    decimals: *decimals,
                },
            );
        }

        Ok(TokenRegistry { tokens })
    }

    pub fn detail(&self, address: &Address) -> Option<&TokenDetail> {
        self.tokens.get(address)
    }

    /// Renders a raw smallest-unit amount for display: the token symbol
    /// followed by `amount / 10^decimals`, truncating. Untracked tokens
    /// render the raw integer with no symbol (divisor 1).
    pub fn display_amount(&self, address: &Address, amount: U256) -> String {
        match self.tokens.get(address) {
            Some(detail) => {
                let divisor = U256::from(10u64)
                    .checked_pow(U256::from(detail.decimals))
                    .unwrap_or(U256::MAX);
                format!("{}{}", detail.symbol, amount / divisor)
            }
            None => amount.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TokenRegistry {
        TokenRegistry::from_config(
            &["0xaaa1".to_string(), "0xbbb2".to_string()],
            &["$".to_string(), "USDX".to_string()],
            &[2, 6],
        )
        .unwrap()
    }

    #[test]
    fn lookup_matches_positional_configuration() {
        let registry = registry();
        let first = registry
            .detail(&normalize_address("0xaaa1").unwrap())
            .unwrap();
        assert_eq!(first.symbol, "$");
        assert_eq!(first.decimals, 2);

        let second = registry
            .detail(&normalize_address("0xbbb2").unwrap())
            .unwrap();
        assert_eq!(second.symbol, "USDX");
        assert_eq!(second.decimals, 6);
    }

    #[test]
    fn lookup_is_keyed_on_normalized_address() {
        let registry = registry();
        // Same address, different textual width at config time vs lookup time.
        let padded = normalize_address("0x000000000000000000000000000000000000aaa1").unwrap();
        assert!(registry.detail(&padded).is_some());
    }

    #[test]
    fn unconfigured_address_is_absent_not_an_error() {
        let registry = registry();
        assert!(registry
            .detail(&normalize_address("0xcccc").unwrap())
            .is_none());
    }

    #[test]
    fn misaligned_lists_fail_construction() {
        let result = TokenRegistry::from_config(
            &["0xaaa1".to_string(), "0xbbb2".to_string()],
            &["$".to_string()],
            &[2, 6],
        );
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_addresses_last_wins() {
        // "0xAAA1" and "0xaaa1" normalize to the same key.
        let registry = TokenRegistry::from_config(
            &["0xAAA1".to_string(), "0xaaa1".to_string()],
            &["OLD".to_string(), "NEW".to_string()],
            &[4, 8],
        )
        .unwrap();

        assert_eq!(registry.len(), 1);
        let detail = registry
            .detail(&normalize_address("0xaaa1").unwrap())
            .unwrap();
        assert_eq!(detail.symbol, "NEW");
        assert_eq!(detail.decimals, 8);
    }

    #[test]
    fn display_amount_floor_divides() {
        let registry = registry();
        let token = normalize_address("0xaaa1").unwrap();
        // 1500 smallest units at 2 decimals -> $15, truncated not rounded
        assert_eq!(registry.display_amount(&token, U256::from(1500u64)), "$15");
        assert_eq!(registry.display_amount(&token, U256::from(1599u64)), "$15");
        assert_eq!(registry.display_amount(&token, U256::from(99u64)), "$0");
    }

    #[test]
    fn display_amount_untracked_token_is_raw_and_unsymboled() {
        let registry = registry();
        let unknown = normalize_address("0xcccc").unwrap();
        assert_eq!(
            registry.display_amount(&unknown, U256::from(1500u64)),
            "1500"
        );
    }
}
