use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct DonationsQuery {
    pub streamer: Option<String>,
}

/// One stored donation, amounts rendered through the token registry
/// (`<symbol><amount>`; raw integer with no symbol for untracked tokens).
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DonationHistoryResponse {
    pub streamer: String,
    pub donor: String,
    pub donor_name: String,
    pub erc20_token_address: String,
    pub message: String,
    pub net_donation: String,
    pub commission: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressMappingRequest {
    pub address: String,
    pub smart_account_address: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartAccountResponse {
    pub smart_account_address: String,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
}
