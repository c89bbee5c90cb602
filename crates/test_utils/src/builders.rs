//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults,
//! so tests specify only the fields they care about.

use chrono::NaiveDate;
use domain_billing::{LineItem, Scalar};
use domain_numbering::InvoiceRecord;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::DateFixtures;

/// Builder for line items
pub struct LineItemBuilder {
    item: LineItem,
}

impl Default for LineItemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineItemBuilder {
    /// Creates a builder with quantity 1 and no other fields set
    pub fn new() -> Self {
        Self {
            item: LineItem::new(dec!(1)),
        }
    }

    /// Sets the quantity
    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.item.quantity = quantity;
        self
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.item.description = Some(description.into());
        self
    }

    /// Sets the work date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.item.date = Some(date);
        self
    }

    /// Sets a direct charge amount
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.item.amount = Some(amount);
        self
    }

    /// Sets the per-item rate
    pub fn with_rate(mut self, rate: Decimal) -> Self {
        self.item.rate = Some(rate);
        self
    }

    /// Adds a metadata entry
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.item.meta.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> LineItem {
        self.item
    }
}

/// Builder for numbering records
pub struct RecordBuilder {
    record: InvoiceRecord,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordBuilder {
    /// Creates a builder for a series invoice of the default test client
    pub fn new() -> Self {
        Self {
            record: InvoiceRecord::new(
                "2025-01-acme.yaml",
                DateFixtures::invoice_date(),
                "ACME",
            ),
        }
    }

    /// Sets the source key
    pub fn with_source_key(mut self, source_key: impl Into<String>) -> Self {
        self.record.source_key = source_key.into();
        self
    }

    /// Sets the invoice date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.record.date = date;
        self
    }

    /// Sets the client prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.record.prefix = prefix.into();
        self
    }

    /// Sets the explicit work sequence
    pub fn with_work_sequence(mut self, work_sequence: impl Into<String>) -> Self {
        self.record.work_sequence = Some(work_sequence.into());
        self
    }

    /// Marks the record as a standalone engagement
    pub fn standalone(mut self) -> Self {
        self.record.contract_series = false;
        self
    }

    /// Sets a historical face number override
    pub fn with_face_override(mut self, face_number: impl Into<String>) -> Self {
        self.record.face_override = Some(face_number.into());
        self
    }

    pub fn build(self) -> InvoiceRecord {
        self.record
    }
}
