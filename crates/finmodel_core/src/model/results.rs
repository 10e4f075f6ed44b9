//! Simulation results
//!
//! Every simulator produces a [`SimulationOutput`]; the orchestrator bundles
//! them with the settlement results into a [`SimulationResult`].

use serde::{Deserialize, Serialize};

use super::category::{Category, Week};
use super::receipts::{SaleRecord, SuperReceipt, TaxInvoice};

/// Weekly series produced by one category simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput<R = ()> {
    pub category: Category,
    /// Holding (or outstanding debt) sampled after each week's transactions
    pub balances: Vec<f64>,
    /// Net cash into (+) or out of (-) the household per week
    pub cash_flows: Vec<f64>,
    /// Records handed to tax settlement, in week order
    pub receipts: Vec<R>,
}

impl<R> SimulationOutput<R> {
    pub fn new(category: Category, num_weeks: usize) -> Self {
        Self {
            category,
            balances: Vec::with_capacity(num_weeks),
            cash_flows: vec![0.0; num_weeks],
            receipts: Vec::new(),
        }
    }

    #[inline]
    pub fn record_cash(&mut self, week: Week, amount: f64) {
        if let Some(slot) = self.cash_flows.get_mut(week) {
            *slot += amount;
        }
    }
}

/// One fiscal year's reconciled taxable amounts and resulting invoices
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxYearAggregate {
    pub year: usize,
    pub settlement_week: Week,
    pub ordinary_income: f64,
    /// Net realized share gains after the CGT discount
    pub capital_gains: f64,
    pub concessional_contributions: f64,
    pub super_taxed_withdrawals: f64,
    pub super_untaxed_earnings: f64,
    /// `ordinary_income + capital_gains - concessional_contributions`
    pub taxable_income: f64,
    pub income_tax: f64,
    /// Contributions tax charged on concessional contributions
    pub contributions_tax: f64,
    pub super_tax: f64,
}

impl TaxYearAggregate {
    pub fn new(year: usize, settlement_week: Week) -> Self {
        Self {
            year,
            settlement_week,
            ..Default::default()
        }
    }

    pub fn invoice(&self) -> TaxInvoice {
        TaxInvoice {
            year: self.year,
            week: self.settlement_week,
            amount: self.income_tax + self.contributions_tax,
        }
    }

    pub fn super_invoice(&self) -> TaxInvoice {
        TaxInvoice {
            year: self.year,
            week: self.settlement_week,
            amount: self.super_tax,
        }
    }
}

/// Complete results of one scenario run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub num_weeks: usize,
    /// Calendar date of each week, empty when the run is not anchored
    pub dates: Vec<jiff::civil::Date>,

    pub shares: SimulationOutput<SaleRecord>,
    pub superannuation: SimulationOutput<SuperReceipt>,
    pub home: SimulationOutput,
    pub home_loan: SimulationOutput,
    pub car_loan: SimulationOutput,
    pub hecs: SimulationOutput,

    pub income: Vec<f64>,
    /// Signed miscellaneous cash per week, negative when spent
    pub expenses: Vec<f64>,

    /// One entry per fiscal year, in year order
    pub yearly_taxes: Vec<TaxYearAggregate>,
    pub invoices: Vec<TaxInvoice>,
    pub super_invoices: Vec<TaxInvoice>,

    /// Running cash balance at the end of each week
    pub cash_balance: Vec<f64>,
    pub net_worth: Vec<f64>,
}

impl SimulationResult {
    /// Holding or outstanding debt per week for a category
    pub fn balances(&self, category: Category) -> &[f64] {
        match category {
            Category::Shares => &self.shares.balances,
            Category::Super => &self.superannuation.balances,
            Category::Home => &self.home.balances,
            Category::HomeLoan => &self.home_loan.balances,
            Category::CarLoan => &self.car_loan.balances,
            Category::Hecs => &self.hecs.balances,
            Category::Income => &self.income,
            Category::Expenses => &self.expenses,
        }
    }

    /// Signed cash contribution per week for a category
    pub fn cash_flows(&self, category: Category) -> &[f64] {
        match category {
            Category::Shares => &self.shares.cash_flows,
            Category::Super => &self.superannuation.cash_flows,
            Category::Home => &self.home.cash_flows,
            Category::HomeLoan => &self.home_loan.cash_flows,
            Category::CarLoan => &self.car_loan.cash_flows,
            Category::Hecs => &self.hecs.cash_flows,
            Category::Income => &self.income,
            Category::Expenses => &self.expenses,
        }
    }

    pub fn final_cash(&self) -> f64 {
        self.cash_balance.last().copied().unwrap_or(0.0)
    }

    pub fn final_net_worth(&self) -> f64 {
        self.net_worth.last().copied().unwrap_or(0.0)
    }

    pub fn total_tax(&self) -> f64 {
        self.invoices
            .iter()
            .chain(&self.super_invoices)
            .map(|invoice| invoice.amount)
            .sum()
    }
}
