//! Shared types, errors, and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Fixed-point money helpers
//! - The success/failure envelope returned by write operations
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, BillingConfig, SupplyType};
pub use error::{AppError, AppResult};
pub use types::ActionResult;
