//! Integration Tests for the Invoicing Engine
//!
//! These tests verify cross-domain workflows: fee calculation feeding the
//! tax classifier, and identity assignment over whole invoice batches.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_billing::{FeeCalculator, Scalar};
use domain_numbering::NumberingService;
use domain_tax::{JurisdictionRelation, TaxClassifier, TaxRegime};
use test_utils::{
    standard_billing_config, DateFixtures, LineItemBuilder, MoneyFixtures, RecordBuilder,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod billing_to_tax_workflow {
    use super::*;

    /// The retainer-plus-excess scenario end to end: rows, subtotal, and the
    /// intra-state tax split computed on the subtotal
    #[test]
    fn test_retainer_invoice_with_intra_state_tax() {
        let config = standard_billing_config();
        let calculator = FeeCalculator::new(config);

        let items = vec![LineItemBuilder::new().with_quantity(dec!(15)).build()];
        let mut params = BTreeMap::new();
        params.insert("retainer_amount".to_string(), Scalar::from(dec!(5000)));
        params.insert("rate".to_string(), Scalar::from(dec!(100)));
        params.insert("threshold".to_string(), Scalar::from(dec!(10)));

        let invoice_date = DateFixtures::invoice_date();
        let result = calculator
            .calculate("retainer_excess", &items, &params, invoice_date)
            .unwrap();

        let amounts: Vec<Decimal> = result.rows.iter().map(|r| r.amount.amount()).collect();
        assert_eq!(amounts, vec![dec!(5000.00), dec!(500.00)]);
        assert_eq!(result.total, MoneyFixtures::inr(dec!(5500)));

        let classifier = TaxClassifier::default();
        let breakdown = classifier.classify(
            invoice_date,
            JurisdictionRelation::SameJurisdiction,
            result.total,
        );

        assert_eq!(breakdown.regime, TaxRegime::DomesticIntraState);
        assert_eq!(breakdown.components[0].amount.amount(), dec!(495.00));
        assert_eq!(breakdown.components[1].amount.amount(), dec!(495.00));
        assert_eq!(breakdown.total.amount(), dec!(990.00));

        let grand_total = result.total + breakdown.total;
        assert_eq!(grand_total.amount(), dec!(6490.00));
    }

    #[test]
    fn test_export_invoice_has_no_tax_lines() {
        let config = standard_billing_config();
        let calculator = FeeCalculator::new(config);

        let items = vec![LineItemBuilder::new().with_quantity(dec!(40)).build()];
        let mut params = BTreeMap::new();
        params.insert("rate".to_string(), Scalar::from(dec!(120)));
        params.insert("currency".to_string(), Scalar::from("USD"));

        let invoice_date = DateFixtures::invoice_date();
        let result = calculator
            .calculate("hourly", &items, &params, invoice_date)
            .unwrap();
        assert_eq!(result.total, MoneyFixtures::usd(dec!(4800)));

        let breakdown = TaxClassifier::default().classify(
            invoice_date,
            JurisdictionRelation::Export,
            result.total,
        );

        assert_eq!(breakdown.regime, TaxRegime::ExportZeroRated);
        assert!(breakdown.components.is_empty());
        assert!(breakdown.requires_export_notification);
    }

    #[test]
    fn test_pre_cutoff_invoice_is_untaxed() {
        let config = standard_billing_config();
        let calculator = FeeCalculator::new(config);

        let items = vec![LineItemBuilder::new().with_quantity(dec!(10)).build()];
        let mut params = BTreeMap::new();
        params.insert("rate".to_string(), Scalar::from(dec!(100)));

        let invoice_date = DateFixtures::pre_cutoff_date();
        let result = calculator
            .calculate("hourly", &items, &params, invoice_date)
            .unwrap();

        let breakdown = TaxClassifier::default().classify(
            invoice_date,
            JurisdictionRelation::SameJurisdiction,
            result.total,
        );

        assert!(breakdown.components.is_empty());
        assert!(breakdown.total.is_zero());
    }

    #[test]
    fn test_milestone_invoice_with_inter_state_tax() {
        let config = standard_billing_config();
        let calculator = FeeCalculator::new(config);

        let items = vec![
            LineItemBuilder::new()
                .with_description("Discovery phase")
                .with_amount(dec!(40000))
                .with_meta("number", "1")
                .build(),
            LineItemBuilder::new()
                .with_description("Implementation phase")
                .with_amount(dec!(60000))
                .with_meta("number", "2")
                .build(),
        ];

        let invoice_date = DateFixtures::invoice_date();
        let result = calculator
            .calculate("milestone", &items, &BTreeMap::new(), invoice_date)
            .unwrap();
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.total.amount(), dec!(100000.00));

        let breakdown = TaxClassifier::default().classify(
            invoice_date,
            JurisdictionRelation::OtherJurisdiction,
            result.total,
        );
        assert_eq!(breakdown.components.len(), 1);
        assert_eq!(breakdown.total.amount(), dec!(18000.00));
    }
}

mod numbering_workflow {
    use super::*;

    /// A realistic batch: two contract invoices, a backfilled historical one
    /// with its legacy face number, and a standalone engagement
    #[test]
    fn test_batch_identity_assignment() {
        let records = vec![
            RecordBuilder::new()
                .with_source_key("2025-02-acme.yaml")
                .with_date(date(2025, 2, 28))
                .with_work_sequence("01")
                .build(),
            RecordBuilder::new()
                .with_source_key("2025-01-acme.yaml")
                .with_date(date(2025, 1, 31))
                .with_work_sequence("01")
                .build(),
            RecordBuilder::new()
                .with_source_key("2024-11-acme.yaml")
                .with_date(date(2024, 11, 30))
                .with_work_sequence("01")
                .with_face_override("ACME/2024/042")
                .build(),
            RecordBuilder::new()
                .with_source_key("2025-03-acme-workshop.yaml")
                .with_date(date(2025, 3, 5))
                .with_work_sequence("02")
                .standalone()
                .build(),
        ];

        let identities = NumberingService::new().assign_identities(&records).unwrap();

        // The historical invoice ranks first and keeps its legacy face number
        assert_eq!(identities[2].face_number, "ACME/2024/042");
        assert_eq!(identities[2].canonical.to_string(), "ACME-01-01-241130");

        // Later invoices rank by date, untouched by the override
        assert_eq!(identities[1].canonical.to_string(), "ACME-01-02-250131");
        assert_eq!(identities[0].canonical.to_string(), "ACME-01-03-250228");

        // The standalone workshop sits outside the series counter
        assert_eq!(identities[3].canonical.to_string(), "ACME-02-00-250305");
        assert_eq!(identities[3].face_number, "ACME-02-00-250305");
    }

    #[test]
    fn test_identities_stable_across_discovery_order() {
        let batch = vec![
            RecordBuilder::new()
                .with_source_key("a.yaml")
                .with_date(date(2025, 1, 1))
                .build(),
            RecordBuilder::new()
                .with_source_key("b.yaml")
                .with_date(date(2025, 2, 1))
                .build(),
            RecordBuilder::new()
                .with_source_key("c.yaml")
                .with_date(date(2025, 3, 1))
                .with_prefix("GLOBEX")
                .build(),
        ];
        let mut shuffled = batch.clone();
        shuffled.swap(0, 2);

        let service = NumberingService::new();
        let by_key = |records: &[domain_numbering::InvoiceRecord]| {
            let identities = service.assign_identities(records).unwrap();
            records
                .iter()
                .map(|r| r.source_key.clone())
                .zip(identities)
                .collect::<BTreeMap<_, _>>()
        };

        assert_eq!(by_key(&batch), by_key(&shuffled));
    }
}
