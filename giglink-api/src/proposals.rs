//! Proposal endpoints

use serde::Serialize;

use giglink_core::models::Proposal;

use crate::client::ApiClient;
use crate::error::ApiResult;

/// Payload for submitting a proposal on an order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProposal {
    pub cover_letter: String,
    pub bid_amount: f64,
    pub delivery_days: u32,
}

/// Proposal resource surface
pub struct ProposalsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ProposalsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List the proposals submitted on an order
    pub async fn list_for_order(&self, order_id: &str) -> ApiResult<Vec<Proposal>> {
        self.client
            .get(&format!("/orders/{}/proposals", order_id))
            .await
    }

    /// Submit a proposal on an order
    pub async fn submit(&self, order_id: &str, proposal: &NewProposal) -> ApiResult<Proposal> {
        self.client
            .post(&format!("/orders/{}/proposals", order_id), proposal)
            .await
    }
}
