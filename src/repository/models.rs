use alloy_primitives::{Address, U256};

/// A donation event as stored, with the surrogate id the store assigned.
/// Amounts are raw smallest-unit integers; scaling by token decimals
/// happens only at presentation time.
#[derive(Debug, Clone)]
pub struct Donation {
    pub id: i64,
    pub donor: Address,
    pub recipient: Address,
    pub erc20_token_address: Address,
    pub net_donation: U256,
    pub commission: U256,
    pub donor_name: String,
    pub message: String,
    pub block_number: u64,
    pub transaction_hash: String,
    pub log_index: u64,
}

/// A decoded donation event that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewDonation {
    pub donor: Address,
    pub recipient: Address,
    pub erc20_token_address: Address,
    pub net_donation: U256,
    pub commission: U256,
    pub donor_name: String,
    pub message: String,
    pub block_number: u64,
    pub transaction_hash: String,
    pub log_index: u64,
}

#[derive(Debug, Clone)]
pub struct AddressMapping {
    pub address: String,
    pub smart_account_address: String,
}
