//! Annual tax settlement
//!
//! Income and the tax receipts of the share and super simulators are folded
//! into one [`TaxYearAggregate`] per fiscal year, then each year is settled
//! into two invoices due at the year's settlement week:
//!
//! - ordinary: progressive tax on `income + share gains - concessional
//!   contributions`, plus the flat contributions tax on those contributions;
//! - super: the flat rate on untaxed earnings withdrawn, plus tax on the net
//!   withdrawal stacked on top of ordinary taxable income at marginal rates
//!   reduced by the super offset.

use rustc_hash::FxHashMap;

use crate::config::TaxConfig;
use crate::error::{InputSequenceError, Result};
use crate::model::{
    BracketTable, Category, Contribution, SaleRecord, SuperReceipt, TaxInvoice, TaxYearAggregate,
    Week,
};
use crate::rates::{fiscal_year, settlement_week};

/// Total progressive tax owed on `income`
pub fn progressive_tax(income: f64, table: &BracketTable) -> f64 {
    let brackets = table.brackets();
    if income <= 0.0 || brackets.is_empty() {
        return 0.0;
    }

    let mut tax = 0.0;
    for (i, bracket) in brackets.iter().enumerate() {
        if income <= bracket.threshold {
            break;
        }
        let next_threshold = brackets
            .get(i + 1)
            .map(|b| b.threshold)
            .unwrap_or(f64::INFINITY);
        tax += (income.min(next_threshold) - bracket.threshold) * bracket.rate;
    }
    tax
}

/// Tax on `additional` income stacked on top of `base` income
pub fn marginal_tax(additional: f64, base: f64, table: &BracketTable) -> f64 {
    progressive_tax(base + additional, table) - progressive_tax(base, table)
}

/// Yearly aggregates and the invoices raised from them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settlement {
    pub yearly: Vec<TaxYearAggregate>,
    pub invoices: Vec<TaxInvoice>,
    pub super_invoices: Vec<TaxInvoice>,
}

/// Settle every fiscal year touched by the income series or the receipts.
///
/// Receipt streams must be ordered by week.
pub fn settle(
    num_weeks: usize,
    weekly_income: &[f64],
    share_sales: &[SaleRecord],
    super_receipts: &[SuperReceipt],
    config: &TaxConfig,
) -> Result<Settlement> {
    ensure_sorted(Category::Shares, share_sales.iter().map(|s| s.sell_week))?;
    ensure_sorted(Category::Super, super_receipts.iter().map(SuperReceipt::week))?;

    let mut years: FxHashMap<usize, TaxYearAggregate> = FxHashMap::default();

    for (week, &income) in weekly_income.iter().enumerate() {
        if income != 0.0 {
            year_of(&mut years, week, num_weeks).ordinary_income += income;
        }
    }

    for sale in share_sales {
        year_of(&mut years, sale.sell_week, num_weeks).capital_gains +=
            sale.taxable_gain(config.cgt_discount);
    }

    for receipt in super_receipts {
        match receipt {
            SuperReceipt::Contribution {
                week,
                kind: Contribution::Concessional,
                amount,
            } => year_of(&mut years, *week, num_weeks).concessional_contributions += amount,
            SuperReceipt::Contribution { .. } => {}
            SuperReceipt::Withdrawal(record) => {
                let aggregate = year_of(&mut years, record.sell_week, num_weeks);
                aggregate.super_taxed_withdrawals += record.taxed_amount;
                aggregate.super_untaxed_earnings += record.untaxed_earnings;
            }
        }
    }

    let mut yearly: Vec<TaxYearAggregate> = years.into_values().collect();
    yearly.sort_by_key(|aggregate| aggregate.year);

    let mut settlement = Settlement::default();
    for mut aggregate in yearly {
        finalize_year(&mut aggregate, config)?;
        tracing::debug!(
            year = aggregate.year,
            taxable_income = aggregate.taxable_income,
            income_tax = aggregate.income_tax,
            super_tax = aggregate.super_tax,
            "Tax year settled"
        );
        settlement.invoices.push(aggregate.invoice());
        settlement.super_invoices.push(aggregate.super_invoice());
        settlement.yearly.push(aggregate);
    }
    Ok(settlement)
}

/// Compute taxable income and both invoices for one year
pub fn finalize_year(aggregate: &mut TaxYearAggregate, config: &TaxConfig) -> Result<()> {
    let table = config.brackets.for_year(aggregate.year, "income tax")?;

    aggregate.taxable_income = aggregate.ordinary_income + aggregate.capital_gains
        - aggregate.concessional_contributions;
    aggregate.income_tax = progressive_tax(aggregate.taxable_income, &table);
    aggregate.contributions_tax = config.concessional_rate * aggregate.concessional_contributions;

    let withdrawn = aggregate.super_taxed_withdrawals + aggregate.super_untaxed_earnings;
    aggregate.super_tax = if withdrawn > 0.0 {
        let flat = config.concessional_rate * aggregate.super_untaxed_earnings;
        let net_withdrawn = withdrawn - flat;
        let reduced = table.with_rate_offset(config.super_offset);
        flat + marginal_tax(net_withdrawn, aggregate.taxable_income, &reduced)
    } else {
        0.0
    };
    Ok(())
}

/// Aggregate for the fiscal year containing `week`, created on first use
fn year_of(
    years: &mut FxHashMap<usize, TaxYearAggregate>,
    week: Week,
    num_weeks: usize,
) -> &mut TaxYearAggregate {
    let year = fiscal_year(week);
    years
        .entry(year)
        .or_insert_with(|| TaxYearAggregate::new(year, settlement_week(year, num_weeks)))
}

fn ensure_sorted(
    category: Category,
    weeks: impl Iterator<Item = Week>,
) -> std::result::Result<(), InputSequenceError> {
    let mut previous: Option<Week> = None;
    for (i, week) in weeks.enumerate() {
        if let Some(prev) = previous
            && week < prev
        {
            return Err(InputSequenceError::OutOfOrder {
                category,
                line: i + 1,
                week,
                previous: prev,
            });
        }
        previous = Some(week);
    }
    Ok(())
}
