//! HTTP client for the giglink marketplace REST API
//!
//! One resource surface per module, all sharing the [`ApiClient`]
//! request plumbing and the status-derived [`ApiError`] categories.

pub mod client;
pub mod conversations;
pub mod error;
pub mod favorites;
pub mod orders;
pub mod profiles;
pub mod proposals;
pub mod stats;

pub use client::ApiClient;
pub use conversations::ConversationsApi;
pub use error::{ApiError, ApiResult};
pub use favorites::FavoritesApi;
pub use orders::{OrderQuery, OrdersApi};
pub use profiles::ProfilesApi;
pub use proposals::{NewProposal, ProposalsApi};
pub use stats::StatsApi;
