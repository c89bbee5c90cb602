//! Tax classification
//!
//! Pure mapping from (invoice date, jurisdiction relationship, taxable
//! amount) to a tax breakdown. Component amounts are rounded half-up once
//! each; the breakdown total is their exact sum.

use chrono::NaiveDate;
use core_kernel::{Money, Rate};
use serde::Serialize;

use crate::regime::{JurisdictionRelation, TaxRegime};
use crate::rules::TaxRules;

/// One tax line (e.g. CGST at 9%)
#[derive(Debug, Clone, Serialize)]
pub struct TaxComponent {
    pub label: String,
    pub rate: Rate,
    pub amount: Money,
}

/// The resolved tax treatment and amounts for one invoice
#[derive(Debug, Clone, Serialize)]
pub struct TaxBreakdown {
    pub regime: TaxRegime,
    pub components: Vec<TaxComponent>,
    pub total: Money,
    /// Set for zero-rated exports, which must carry the export notification
    /// declaration on the document
    pub requires_export_notification: bool,
}

/// Classifies invoices into tax regimes from explicit rules
#[derive(Debug, Clone, Default)]
pub struct TaxClassifier {
    rules: TaxRules,
}

impl TaxClassifier {
    pub fn new(rules: TaxRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &TaxRules {
        &self.rules
    }

    /// Classifies one invoice.
    ///
    /// Invoices dated before the cutoff are pre-regime: classified as
    /// intra-state with no components and a zero total. The cutoff date
    /// itself is post-cutoff.
    pub fn classify(
        &self,
        invoice_date: NaiveDate,
        relation: JurisdictionRelation,
        taxable: Money,
    ) -> TaxBreakdown {
        let currency = taxable.currency();

        if invoice_date < self.rules.cutoff_date {
            return TaxBreakdown {
                regime: TaxRegime::DomesticIntraState,
                components: Vec::new(),
                total: Money::zero(currency),
                requires_export_notification: false,
            };
        }

        match relation {
            JurisdictionRelation::Export => TaxBreakdown {
                regime: TaxRegime::ExportZeroRated,
                components: Vec::new(),
                total: Money::zero(currency),
                requires_export_notification: true,
            },
            JurisdictionRelation::SameJurisdiction => {
                let cgst = tax_component("CGST", self.rules.cgst_rate, &taxable);
                let sgst = tax_component("SGST", self.rules.sgst_rate, &taxable);
                let total = cgst.amount + sgst.amount;
                TaxBreakdown {
                    regime: TaxRegime::DomesticIntraState,
                    components: vec![cgst, sgst],
                    total,
                    requires_export_notification: false,
                }
            }
            JurisdictionRelation::OtherJurisdiction => {
                let igst = tax_component("IGST", self.rules.igst_rate, &taxable);
                let total = igst.amount;
                TaxBreakdown {
                    regime: TaxRegime::DomesticInterState,
                    components: vec![igst],
                    total,
                    requires_export_notification: false,
                }
            }
        }
    }
}

fn tax_component(label: &str, rate: rust_decimal::Decimal, taxable: &Money) -> TaxComponent {
    let rate = Rate::new(rate);
    TaxComponent {
        label: label.to_string(),
        rate,
        amount: rate.apply(taxable).round_half_up(),
    }
}
