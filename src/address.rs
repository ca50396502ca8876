use alloy_primitives::{Address, B256, U256};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid address format: {input}")]
pub struct InvalidAddressFormat {
    pub input: String,
}

/// Canonicalizes a textual ledger address to its fixed-width 20-byte form.
///
/// Accepts `0x`-prefixed hex of any width up to 32 bytes (topic encodings
/// included) and bare decimal integer strings. The resulting [`Address`] is
/// the equality key used everywhere addresses are compared, and its `{:?}`
/// rendering is the canonical lowercase zero-padded hex string.
///
/// Values wider than 160 bits do not name an account and are rejected.
pub fn normalize_address(input: &str) -> Result<Address, InvalidAddressFormat> {
    let invalid = || InvalidAddressFormat {
        input: input.to_string(),
    };

    let trimmed = input.trim();
    let value = if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        if hex.is_empty() {
            return Err(invalid());
        }
        U256::from_str_radix(hex, 16).map_err(|_| invalid())?
    } else if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        U256::from_str_radix(trimmed, 10).map_err(|_| invalid())?
    } else {
        return Err(invalid());
    };

    if value >> 160 != U256::ZERO {
        return Err(invalid());
    }

    Ok(Address::from_word(B256::from(value)))
}
