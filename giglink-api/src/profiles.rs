//! Profile endpoints

use giglink_core::models::Profile;

use crate::client::ApiClient;
use crate::error::ApiResult;

/// Profile resource surface
pub struct ProfilesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ProfilesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Fetch a public profile by username, portfolio included
    pub async fn get(&self, username: &str) -> ApiResult<Profile> {
        self.client.get(&format!("/profiles/{}", username)).await
    }
}
