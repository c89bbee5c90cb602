//! Core Kernel - Foundational types and utilities for the invoicing engine
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Display formatting for currency amounts and quantities
//! - Common error types

pub mod error;
pub mod format;
pub mod money;

pub use error::CoreError;
pub use format::{format_currency, format_quantity};
pub use money::{Currency, Money, MoneyError, Rate};
