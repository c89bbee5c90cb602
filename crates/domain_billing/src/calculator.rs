//! Fee calculator engine
//!
//! Evaluates one pricing formula against a set of line items and a variable
//! context, producing ordered billing rows and a total. Components are
//! processed in formula order; within a component, row order follows the
//! grouping's first-occurrence key order. Currency rounding happens exactly
//! once per row; the total is the exact sum of row amounts.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use core_kernel::{format_currency, format_quantity, Money};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::context::{EvalContext, Scalar};
use crate::error::BillingError;
use crate::formula::{
    BillingConfig, Component, PricingFormula, RowTemplate, ThresholdScope, ValueRef,
};
use crate::grouping::group_by;
use crate::interpolate::render;
use crate::line_item::LineItem;

/// One presented line in the billing table
#[derive(Debug, Clone, Serialize)]
pub struct BillingRow {
    pub component_id: String,
    pub label: String,
    pub details: String,
    pub amount: Money,
}

/// Ordered billing rows plus their exact total
#[derive(Debug, Clone, Serialize)]
pub struct BillingResult {
    pub rows: Vec<BillingRow>,
    pub total: Money,
}

/// Evaluates pricing formulas from an explicitly passed registry
pub struct FeeCalculator<'a> {
    config: &'a BillingConfig,
}

impl<'a> FeeCalculator<'a> {
    pub fn new(config: &'a BillingConfig) -> Self {
        Self { config }
    }

    /// Computes the billing result for a preset: resolves the preset and its
    /// formula, builds the evaluation context (preset defaults under
    /// caller params), then runs the formula.
    pub fn calculate(
        &self,
        preset_id: &str,
        items: &[LineItem],
        params: &BTreeMap<String, Scalar>,
        invoice_date: NaiveDate,
    ) -> Result<BillingResult, BillingError> {
        let preset = self.config.preset(preset_id)?;
        let formula = self.config.formula(&preset.formula_id)?;
        let ctx = EvalContext::build(&preset.defaults, params, invoice_date)?;
        self.compute(formula, &preset.row_templates, items, &ctx)
    }

    /// Runs one formula against items and a prebuilt context.
    pub fn compute(
        &self,
        formula: &PricingFormula,
        row_templates: &BTreeMap<String, RowTemplate>,
        items: &[LineItem],
        ctx: &EvalContext,
    ) -> Result<BillingResult, BillingError> {
        let mut rows = Vec::new();
        let mut total = Money::zero(ctx.currency());

        for component in &formula.components {
            let template = row_templates
                .get(component.id())
                .cloned()
                .unwrap_or_default();

            let component_rows = match component {
                Component::FlatRate { id, amount } => {
                    self.flat_rate_rows(id, amount.as_ref(), &template, items, ctx)?
                }
                Component::UnitRate {
                    id,
                    rate,
                    min_quantity,
                    max_quantity,
                    threshold_scope,
                } => self.unit_rate_rows(
                    id,
                    rate.as_ref(),
                    min_quantity.as_ref(),
                    max_quantity.as_ref(),
                    *threshold_scope,
                    &template,
                    items,
                    ctx,
                )?,
            };

            for row in component_rows {
                total = total + row.amount;
                rows.push(row);
            }
        }

        Ok(BillingResult { rows, total })
    }

    fn flat_rate_rows(
        &self,
        id: &str,
        amount: Option<&ValueRef>,
        template: &RowTemplate,
        items: &[LineItem],
        ctx: &EvalContext,
    ) -> Result<Vec<BillingRow>, BillingError> {
        // Bound amount: exactly one row, no reference to the items.
        if let Some(bound) = amount.and_then(|vref| vref.resolve(ctx)) {
            let mut vars = base_vars(ctx);
            vars.insert("amount".to_string(), format_currency(bound));
            let money = Money::new(bound, ctx.currency()).round_half_up();
            return Ok(vec![render_row(id, template, &vars, money)?]);
        }

        // Item-summed: partition by (description, meta) so distinct
        // milestones get distinct rows while repeats collapse.
        let billable: Vec<&LineItem> = items
            .iter()
            .filter(|item| {
                let keep = item.amount.is_some() || item.rate.is_some();
                if !keep {
                    debug!(
                        component_id = id,
                        description = item.description.as_deref().unwrap_or(""),
                        "skipping line item without amount or rate"
                    );
                }
                keep
            })
            .collect();

        let mut rows = Vec::new();
        for (_, members) in group_by(&billable, |item| {
            (item.description.clone(), item.meta.clone())
        }) {
            let representative = members[0];
            let subtotal: Decimal = members
                .iter()
                .map(|item| {
                    item.amount
                        .unwrap_or_else(|| item.quantity * item.rate.unwrap_or_default())
                })
                .sum();

            let mut vars = base_vars(ctx);
            for (key, value) in &representative.meta {
                vars.insert(key.clone(), value.to_string());
            }
            if let Some(description) = &representative.description {
                vars.insert("description".to_string(), description.clone());
            }
            vars.insert("amount".to_string(), format_currency(subtotal));

            // A `label` binding in the context is itself a template,
            // rendered against this partition before the row template.
            if let Some(Scalar::Text(label_format)) = ctx.get("label") {
                let label = render(label_format, id, &vars)?;
                vars.insert("label".to_string(), label);
            }

            let money = Money::new(subtotal, ctx.currency()).round_half_up();
            rows.push(render_row(id, template, &vars, money)?);
        }

        Ok(rows)
    }

    #[allow(clippy::too_many_arguments)]
    fn unit_rate_rows(
        &self,
        id: &str,
        rate: Option<&ValueRef>,
        min_quantity: Option<&ValueRef>,
        max_quantity: Option<&ValueRef>,
        threshold_scope: ThresholdScope,
        template: &RowTemplate,
        items: &[LineItem],
        ctx: &EvalContext,
    ) -> Result<Vec<BillingRow>, BillingError> {
        let min = min_quantity
            .and_then(|vref| vref.resolve(ctx))
            .unwrap_or(Decimal::ZERO);
        let max = max_quantity.and_then(|vref| vref.resolve(ctx));
        if let Some(max_value) = max {
            if min > max_value {
                return Err(BillingError::InvalidThreshold {
                    component_id: id.to_string(),
                    min,
                    max: max_value,
                });
            }
        }

        let unit = unit_singular(ctx);
        let threshold_display = format_quantity(if min > Decimal::ZERO {
            min
        } else {
            max.unwrap_or_default()
        });

        // Bound rate: one row over the combined quantity.
        if let Some(rate_value) = rate.and_then(|vref| vref.resolve(ctx)) {
            let total_quantity: Decimal = items.iter().map(|item| item.quantity).sum();
            let billable = clip_quantity(total_quantity, min, max);
            let amount = billable * rate_value;

            let mut vars = base_vars(ctx);
            insert_quantity_vars(&mut vars, billable, rate_value, amount, &unit);
            vars.insert("threshold".to_string(), threshold_display);

            let money = Money::new(amount, ctx.currency()).round_half_up();
            return Ok(vec![render_row(id, template, &vars, money)?]);
        }

        // Dynamic rates: partition items by their own rate, one row per
        // distinct rate in first-occurrence order.
        let rated: Vec<&LineItem> = items
            .iter()
            .filter(|item| {
                let keep = item.rate.is_some();
                if !keep {
                    debug!(
                        component_id = id,
                        description = item.description.as_deref().unwrap_or(""),
                        "skipping line item without a rate"
                    );
                }
                keep
            })
            .collect();

        let partitions = group_by(&rated, |item| item.rate.unwrap_or_default());

        let mut remaining_allowance = min;
        let mut remaining_cap = max.map(|max_value| max_value - min);

        let mut rows = Vec::new();
        for (rate_value, members) in partitions {
            let quantity: Decimal = members.iter().map(|item| item.quantity).sum();

            let billable = match threshold_scope {
                ThresholdScope::PerPartition => clip_quantity(quantity, min, max),
                ThresholdScope::Combined => {
                    // The allowance and cap are consumed across partitions in
                    // row order.
                    let free = quantity.min(remaining_allowance);
                    remaining_allowance -= free;
                    let mut part = quantity - free;
                    if let Some(cap) = remaining_cap.as_mut() {
                        part = part.min(*cap);
                        *cap -= part;
                    }
                    part
                }
            };
            let amount = billable * rate_value;

            let mut vars = base_vars(ctx);
            insert_quantity_vars(&mut vars, billable, rate_value, amount, &unit);
            vars.insert("threshold".to_string(), threshold_display.clone());

            let money = Money::new(amount, ctx.currency()).round_half_up();
            rows.push(render_row(id, template, &vars, money)?);
        }

        Ok(rows)
    }
}

/// Billable quantity after the free allowance and cap are applied:
/// zero at or below `min`, growing one-for-one up to `max - min`.
fn clip_quantity(total: Decimal, min: Decimal, max: Option<Decimal>) -> Decimal {
    let over_allowance = (total - min).max(Decimal::ZERO);
    match max {
        Some(max_value) => over_allowance.min(max_value - min),
        None => over_allowance,
    }
}

fn base_vars(ctx: &EvalContext) -> BTreeMap<String, String> {
    ctx.vars()
        .map(|(name, value)| (name.clone(), value.to_string()))
        .collect()
}

fn insert_quantity_vars(
    vars: &mut BTreeMap<String, String>,
    quantity: Decimal,
    rate: Decimal,
    amount: Decimal,
    unit: &str,
) {
    vars.insert("qty".to_string(), format_quantity(quantity));
    vars.insert("rate".to_string(), format_currency(rate));
    vars.insert("amount".to_string(), format_currency(amount));
    vars.insert("unit".to_string(), unit.to_string());
    let units = if quantity == Decimal::ONE {
        unit.to_string()
    } else {
        format!("{unit}s")
    };
    vars.insert("units".to_string(), units);
}

/// Unit display name from the context (`unit_name` wins over `unit`),
/// lowercased and naively singularized.
fn unit_singular(ctx: &EvalContext) -> String {
    let name = ctx
        .text("unit_name")
        .or_else(|| ctx.text("unit"))
        .unwrap_or_else(|| "unit".to_string());
    let lower = name.to_lowercase();
    lower.strip_suffix('s').unwrap_or(&lower).to_string()
}

fn render_row(
    id: &str,
    template: &RowTemplate,
    vars: &BTreeMap<String, String>,
    amount: Money,
) -> Result<BillingRow, BillingError> {
    Ok(BillingRow {
        component_id: id.to_string(),
        label: render(&template.label, id, vars)?,
        details: render(&template.details, id, vars)?,
        amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_clip_quantity_allowance() {
        assert_eq!(clip_quantity(dec!(15), dec!(10), None), dec!(5));
        assert_eq!(clip_quantity(dec!(10), dec!(10), None), dec!(0));
        assert_eq!(clip_quantity(dec!(3), dec!(10), None), dec!(0));
    }

    #[test]
    fn test_clip_quantity_cap() {
        assert_eq!(clip_quantity(dec!(50), dec!(10), Some(dec!(30))), dec!(20));
        assert_eq!(clip_quantity(dec!(25), dec!(10), Some(dec!(30))), dec!(15));
        assert_eq!(clip_quantity(dec!(5), dec!(10), Some(dec!(30))), dec!(0));
    }

    #[test]
    fn test_unit_singularization() {
        let ctx = EvalContext::build(
            &BTreeMap::new(),
            &[("unit_name".to_string(), Scalar::from("Hours"))]
                .into_iter()
                .collect(),
            chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )
        .unwrap();
        assert_eq!(unit_singular(&ctx), "hour");
    }

    #[test]
    fn test_plural_forms() {
        let mut vars = BTreeMap::new();
        insert_quantity_vars(&mut vars, dec!(1), dec!(100), dec!(100), "hour");
        assert_eq!(vars["units"], "hour");

        insert_quantity_vars(&mut vars, dec!(0), dec!(100), dec!(0), "hour");
        assert_eq!(vars["units"], "hours");

        insert_quantity_vars(&mut vars, dec!(2), dec!(100), dec!(200), "hour");
        assert_eq!(vars["units"], "hours");
    }
}
