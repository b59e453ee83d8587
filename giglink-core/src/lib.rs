//! Core types for the giglink marketplace client
//!
//! This crate provides the foundational types, configuration, and
//! utilities used by all other giglink components.

pub mod bus;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod session;
pub mod utils;

pub use error::{Error, Result};
