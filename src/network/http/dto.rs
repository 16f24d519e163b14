//! DTO (Data Transfer Object) for HTTP requests and responses.
//!
//! We use JSON as the DTO format for better readability.

use serde::{Deserialize, Serialize};

use crate::schema::format_amount;

#[derive(Debug, Deserialize)]
pub struct ConnectReq {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct NoticesReq {
    /// Last sequence number the client has seen.
    pub after: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResp {
    pub address: String,
    pub denom: String,
    /// In minimal units.
    pub amount: String,
    /// Scaled by the coin decimals.
    pub display_amount: String,
}

impl BalanceResp {
    pub fn new(address: String, denom: &str, amount: String, decimals: u8) -> Self {
        Self {
            display_amount: format_amount(&amount, decimals),
            address,
            denom: denom.to_string(),
            amount,
        }
    }
}
