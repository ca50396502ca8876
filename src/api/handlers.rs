use crate::address::normalize_address;
use crate::api::ApiState;
use crate::api::types::*;
use crate::repository::{AddressMapping, AddressMappingRepository, Donation, DonationRepository};
use crate::tokens::TokenRegistry;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

pub fn create_api_router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/donations", get(list_donations))
        .route("/address-mapping", post(register_address_mapping))
        .route("/smart-account/:address", get(get_smart_account))
        .layer(cors)
        .with_state(state)
}

/// Lists stored donations in insertion order, optionally filtered down to
/// one streamer. Any textual form of the streamer address is accepted and
/// normalized before the lookup.
async fn list_donations(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<DonationsQuery>,
) -> Result<Json<Vec<DonationHistoryResponse>>, ApiErrorResponse> {
    let streamer = match params.streamer.as_deref() {
        Some(raw) => {
            Some(normalize_address(raw).map_err(|e| ApiErrorResponse::bad_request(&e.to_string()))?)
        }
        None => None,
    };

    let db = state.lock_db()?;
    let repo = DonationRepository::new(&db.conn);
    let donations = repo
        .query_by_recipient(streamer.as_ref())
        .map_err(|e| ApiErrorResponse::internal(&format!("Failed to query donations: {e}")))?;

    let response = donations
        .iter()
        .map(|donation| donation_to_response(donation, &state.registry))
        .collect();

    Ok(Json(response))
}

async fn register_address_mapping(
    State(state): State<Arc<ApiState>>,
    Json(model): Json<AddressMappingRequest>,
) -> Result<Json<StatusResponse>, ApiErrorResponse> {
    let db = state.lock_db()?;
    let repo = AddressMappingRepository::new(&db.conn);

    let existing = repo
        .find_by_address(&model.address)
        .map_err(|e| ApiErrorResponse::internal(&format!("Failed to query mapping: {e}")))?;
    if existing.is_some() {
        return Ok(Json(StatusResponse {
            status: "Already Exists",
        }));
    }

    repo.insert(&AddressMapping {
        address: model.address,
        smart_account_address: model.smart_account_address,
    })
    .map_err(|e| ApiErrorResponse::internal(&format!("Failed to insert mapping: {e}")))?;

    Ok(Json(StatusResponse { status: "Success" }))
}

/// 200 with the mapped smart account, or an empty 201 when the address was
/// never registered.
async fn get_smart_account(
    State(state): State<Arc<ApiState>>,
    Path(address): Path<String>,
) -> Result<Response, ApiErrorResponse> {
    let db = state.lock_db()?;
    let repo = AddressMappingRepository::new(&db.conn);

    let mapping = repo
        .find_by_address(&address)
        .map_err(|e| ApiErrorResponse::internal(&format!("Failed to query mapping: {e}")))?;

    match mapping {
        Some(mapping) => Ok((
            StatusCode::OK,
            Json(SmartAccountResponse {
                smart_account_address: mapping.smart_account_address,
            }),
        )
            .into_response()),
        None => Ok(StatusCode::CREATED.into_response()),
    }
}

fn donation_to_response(donation: &Donation, registry: &TokenRegistry) -> DonationHistoryResponse {
    DonationHistoryResponse {
        streamer: format!("{:?}", donation.recipient),
        donor: format!("{:?}", donation.donor),
        donor_name: donation.donor_name.clone(),
        erc20_token_address: format!("{:?}", donation.erc20_token_address),
        message: donation.message.clone(),
        net_donation: registry.display_amount(&donation.erc20_token_address, donation.net_donation),
        commission: registry.display_amount(&donation.erc20_token_address, donation.commission),
    }
}

pub(crate) struct ApiErrorResponse {
    status: StatusCode,
    body: Json<ApiError>,
}

impl ApiErrorResponse {
    fn new(status: StatusCode, error: &str, message: &str) -> Self {
        Self {
            status,
            body: Json(ApiError {
                error: error.to_string(),
                message: message.to_string(),
            }),
        }
    }

    pub(crate) fn bad_request(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    pub(crate) fn internal(message: &str) -> Self {
        error!("Internal error: {}", message);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, self.body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{U256, address};

    fn registry() -> TokenRegistry {
        TokenRegistry::from_config(&["0xf003".to_string()], &["$".to_string()], &[2]).unwrap()
    }

    fn donation(token: &str) -> Donation {
        Donation {
            id: 1,
            donor: address!("000000000000000000000000000000000000d001"),
            recipient: address!("000000000000000000000000000000000000e002"),
            erc20_token_address: normalize_address(token).unwrap(),
            net_donation: U256::from(1500u64),
            commission: U256::from(50u64),
            donor_name: "alice".to_string(),
            message: "gg".to_string(),
            block_number: 42,
            transaction_hash: format!("0x{}", "11".repeat(32)),
            log_index: 0,
        }
    }

    #[test]
    fn response_scales_amounts_for_tracked_tokens() {
        let response = donation_to_response(&donation("0xf003"), &registry());

        assert_eq!(
            response.streamer,
            "0x000000000000000000000000000000000000e002"
        );
        assert_eq!(response.donor_name, "alice");
        assert_eq!(response.net_donation, "$15");
        assert_eq!(response.commission, "$0");
    }

    #[test]
    fn response_leaves_untracked_amounts_raw() {
        let response = donation_to_response(&donation("0xbeef"), &registry());
        assert_eq!(response.net_donation, "1500");
        assert_eq!(response.commission, "50");
    }

    #[test]
    fn response_serializes_with_camel_case_keys() {
        let response = donation_to_response(&donation("0xf003"), &registry());
        let json = serde_json::to_value(&response).unwrap();

        assert!(json.get("donorName").is_some());
        assert!(json.get("erc20TokenAddress").is_some());
        assert!(json.get("netDonation").is_some());
        assert!(json.get("donor_name").is_none());
    }

    #[test]
    fn error_responses_carry_structured_bodies() {
        let err = ApiErrorResponse::bad_request("bad streamer address");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.0.error, "bad_request");
        assert_eq!(err.body.0.message, "bad streamer address");

        let err = ApiErrorResponse::internal("db broke");
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body.0.error, "internal_error");
    }
}
