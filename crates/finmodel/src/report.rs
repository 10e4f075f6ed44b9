//! Writing the flat per-run ledgers

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use finmodel_core::model::{
    Category, Contribution, SaleRecord, SimulationResult, SuperReceipt, TaxInvoice,
    TaxYearAggregate,
};
use serde::Serialize;

use crate::util::{atomic_write, format_amount};

/// Headline figures plus the yearly tax breakdown, written as `summary.json`
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub num_weeks: usize,
    pub start_date: Option<jiff::civil::Date>,
    pub final_cash: f64,
    pub final_net_worth: f64,
    pub total_tax: f64,
    pub yearly_taxes: &'a [TaxYearAggregate],
    pub invoices: &'a [TaxInvoice],
    pub super_invoices: &'a [TaxInvoice],
}

impl<'a> RunSummary<'a> {
    pub fn new(result: &'a SimulationResult) -> Self {
        Self {
            num_weeks: result.num_weeks,
            start_date: result.dates.first().copied(),
            final_cash: result.final_cash(),
            final_net_worth: result.final_net_worth(),
            total_tax: result.total_tax(),
            yearly_taxes: &result.yearly_taxes,
            invoices: &result.invoices,
            super_invoices: &result.super_invoices,
        }
    }
}

/// `week value` per line
fn week_series(values: &[f64]) -> String {
    values
        .iter()
        .enumerate()
        .map(|(week, value)| format!("{week} {}\n", format_amount(*value)))
        .collect()
}

/// `year week amount` per line
fn invoice_lines(invoices: &[TaxInvoice]) -> String {
    invoices
        .iter()
        .map(|invoice| {
            format!(
                "{} {} {}\n",
                invoice.year,
                invoice.week,
                format_amount(invoice.amount)
            )
        })
        .collect()
}

/// `sell_week acquired_week amount cost_basis gain discount_eligible`
fn share_sale_lines(sales: &[SaleRecord]) -> String {
    sales
        .iter()
        .map(|sale| {
            format!(
                "{} {} {} {} {} {}\n",
                sale.sell_week,
                sale.acquired_week,
                format_amount(sale.amount_sold),
                format_amount(sale.cost_basis),
                format_amount(sale.realized_gain),
                u8::from(sale.cgt_discount_eligible)
            )
        })
        .collect()
}

/// Contributions as `week CC|NCC amount`, withdrawals as
/// `week SELL taxed untaxed acquired_week`
fn super_receipt_lines(receipts: &[SuperReceipt]) -> String {
    receipts
        .iter()
        .map(|receipt| match receipt {
            SuperReceipt::Contribution { week, kind, amount } => {
                let kind = match kind {
                    Contribution::Concessional => "CC",
                    Contribution::NonConcessional => "NCC",
                };
                format!("{week} {kind} {}\n", format_amount(*amount))
            }
            SuperReceipt::Withdrawal(record) => format!(
                "{} SELL {} {} {}\n",
                record.sell_week,
                format_amount(record.taxed_amount),
                format_amount(record.untaxed_earnings),
                record.acquired_week
            ),
        })
        .collect()
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content).wrap_err_with(|| format!("Failed to write {}", path.display()))
}

/// Write every ledger of `result` under `dir`
pub fn write_outputs(dir: &Path, result: &SimulationResult) -> Result<()> {
    let cash_dir = dir.join("cash");
    let tax_dir = dir.join("tax");
    for sub in [&cash_dir, &tax_dir] {
        fs::create_dir_all(sub)
            .wrap_err_with(|| format!("Failed to create {}", sub.display()))?;
    }

    for category in Category::SIMULATED {
        let stem = category.stem();
        write_file(
            &dir.join(format!("{stem}.txt")),
            &week_series(result.balances(category)),
        )?;
        write_file(
            &cash_dir.join(format!("{stem}.txt")),
            &week_series(result.cash_flows(category)),
        )?;
    }
    write_file(
        &cash_dir.join(format!("{}.txt", Category::Income.stem())),
        &week_series(&result.income),
    )?;
    write_file(
        &cash_dir.join(format!("{}.txt", Category::Expenses.stem())),
        &week_series(&result.expenses),
    )?;

    write_file(
        &tax_dir.join("shares.txt"),
        &share_sale_lines(&result.shares.receipts),
    )?;
    write_file(
        &tax_dir.join("super.txt"),
        &super_receipt_lines(&result.superannuation.receipts),
    )?;
    write_file(&tax_dir.join("invoice.txt"), &invoice_lines(&result.invoices))?;
    write_file(
        &tax_dir.join("super_invoice.txt"),
        &invoice_lines(&result.super_invoices),
    )?;

    write_file(&dir.join("cash.txt"), &week_series(&result.cash_balance))?;
    write_file(&dir.join("net_worth.txt"), &week_series(&result.net_worth))?;

    let summary = serde_json::to_string_pretty(&RunSummary::new(result))
        .wrap_err("Failed to serialize run summary")?;
    write_file(&dir.join("summary.json"), &summary)?;

    tracing::info!(output_dir = %dir.display(), "Wrote run outputs");
    Ok(())
}
