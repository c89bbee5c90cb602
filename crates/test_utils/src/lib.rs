//! Shared test utilities for the invoicing engine
//!
//! Provides builders for constructing test data with sensible defaults, and
//! a standard billing configuration fixture covering the fee structures the
//! engine is expected to express from data alone.

pub mod builders;
pub mod fixtures;

pub use builders::{LineItemBuilder, RecordBuilder};
pub use fixtures::{standard_billing_config, DateFixtures, MoneyFixtures};
