//! Request identifiers and transfer request payloads.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) as early as possible for tracing
//! - Define and validate the fund transfer payload

use axum::http::{HeaderValue, Request};
use serde::{Deserialize, Deserializer, Serialize};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use alloy::primitives::utils::parse_ether;

/// Generates a UUID v4 request ID for incoming requests.
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Payload required to carry out a fund transfer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundTransferRequest {
    /// The account that sends ether. Must be unlocked on the node.
    pub from_account_address: String,
    /// The account that receives ether.
    pub to_account_address: String,
    /// Amount in ether; accepts a JSON number or a decimal string.
    #[serde(deserialize_with = "number_or_string")]
    pub amount_in_ether: String,
}

impl FundTransferRequest {
    /// Field validation, run before the request reaches the node client.
    pub fn validate(&self) -> Result<(), String> {
        if self.from_account_address.trim().is_empty() {
            return Err("Sender address cannot be null or empty".to_string());
        }
        if self.to_account_address.trim().is_empty() {
            return Err("Recipient address cannot be null or empty".to_string());
        }
        let amount = self.amount_in_ether.trim();
        if amount.starts_with('-') {
            return Err("Transfer amount must be positive".to_string());
        }
        match parse_ether(amount) {
            Ok(wei) if !wei.is_zero() => Ok(()),
            Ok(_) => Err("Transfer amount must be positive".to_string()),
            Err(_) => Err(format!("Invalid transfer amount '{amount}'")),
        }
    }
}

// The original wire shape carries the amount as a JSON number; keep
// accepting that alongside strings, normalized to the textual form.
fn number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(serde_json::Number),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(number) => number.to_string(),
        Raw::Text(text) => text,
    })
}
