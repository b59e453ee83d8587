//! Favorite endpoints

use serde::Serialize;

use giglink_core::models::Favorite;

use crate::client::ApiClient;
use crate::error::ApiResult;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddFavoriteRequest<'a> {
    order_id: &'a str,
}

/// Favorite resource surface
pub struct FavoritesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> FavoritesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List the current user's bookmarked orders
    pub async fn list(&self) -> ApiResult<Vec<Favorite>> {
        self.client.get("/favorites").await
    }

    /// Bookmark an order
    pub async fn add(&self, order_id: &str) -> ApiResult<Favorite> {
        self.client
            .post("/favorites", &AddFavoriteRequest { order_id })
            .await
    }

    /// Remove a bookmark
    pub async fn remove(&self, order_id: &str) -> ApiResult<()> {
        self.client.delete(&format!("/favorites/{}", order_id)).await
    }
}
