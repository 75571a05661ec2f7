//! Common types used across the application.

pub mod action;
pub mod money;

pub use action::ActionResult;
pub use money::{MONEY_SCALE, non_negative, percent_of, round_money};
