//! Dashboard statistics

use serde::{Deserialize, Serialize};

/// Counters shown on the client/freelancer dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub active_orders: u32,
    #[serde(default)]
    pub completed_orders: u32,
    #[serde(default)]
    pub pending_proposals: u32,
    #[serde(default)]
    pub unread_conversations: u32,
    #[serde(default)]
    pub favorites: u32,
}
