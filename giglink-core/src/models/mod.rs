//! Marketplace domain models
//!
//! These mirror the entities served by the marketplace REST API. All wire
//! payloads are camelCase JSON.

pub mod conversation;
pub mod order;
pub mod profile;
pub mod stats;

pub use conversation::{ConversationSummary, LastMessage, Message, Participant};
pub use order::{Favorite, Order, OrderStatus, Proposal, ProposalStatus};
pub use profile::{PortfolioItem, Profile, Role};
pub use stats::DashboardStats;
