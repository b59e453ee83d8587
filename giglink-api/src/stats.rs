//! Dashboard statistics endpoint

use giglink_core::models::DashboardStats;

use crate::client::ApiClient;
use crate::error::ApiResult;

/// Stats resource surface
pub struct StatsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> StatsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Fetch the dashboard counters for the logged-in user; the API
    /// shapes them by the session's role.
    pub async fn dashboard(&self) -> ApiResult<DashboardStats> {
        self.client.get("/stats/dashboard").await
    }
}
