//! Utility types: fixed-point money parsing.

pub mod money_amount;

pub use money_amount::{MoneyAmount, MoneyAmountParseError};
