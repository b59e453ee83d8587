//! Order endpoints

use giglink_core::models::{Order, OrderStatus};

use crate::client::ApiClient;
use crate::error::ApiResult;

/// Filters accepted by the order listing
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub search: Option<String>,
    pub page: Option<u32>,
}

impl OrderQuery {
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(status) = self.status {
            params.push(("status", status.to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        params
    }
}

/// Order resource surface
pub struct OrdersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> OrdersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List orders matching the query
    pub async fn list(&self, query: &OrderQuery) -> ApiResult<Vec<Order>> {
        self.client
            .get_with_query("/orders", &query.to_params())
            .await
    }

    /// Fetch one order by id
    pub async fn get(&self, order_id: &str) -> ApiResult<Order> {
        self.client.get(&format!("/orders/{}", order_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_query_params() {
        let query = OrderQuery::default()
            .status(OrderStatus::Open)
            .search("logo")
            .page(2);
        let params = query.to_params();
        assert_eq!(
            params,
            vec![
                ("status", "open".to_string()),
                ("search", "logo".to_string()),
                ("page", "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_order_query_has_no_params() {
        assert!(OrderQuery::default().to_params().is_empty());
    }
}
