//! Scenario orchestration
//!
//! Runs every category simulator to completion, settles tax over their
//! receipts, then merges all cash ledgers into one running balance.

use crate::config::ScenarioConfig;
use crate::error::{NegativeBalanceInvariantViolation, Result};
use crate::model::{CashStream, Category, SimulationResult, TaxInvoice, TransactionLog};
use crate::rates::AMOUNT_EPSILON;
use crate::simulators::{
    HecsSimulator, HomeSimulator, LoanSimulator, SharesSimulator, SuperSimulator, run,
};
use crate::taxes;

/// Transaction logs and cash streams for one run
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioInputs {
    pub shares: TransactionLog,
    pub superannuation: TransactionLog,
    pub home: TransactionLog,
    pub home_loan: TransactionLog,
    pub car_loan: TransactionLog,
    pub hecs: TransactionLog,
    pub income: CashStream,
    /// Signed miscellaneous cash; spending is negative
    pub expenses: CashStream,
}

impl Default for ScenarioInputs {
    fn default() -> Self {
        Self {
            shares: TransactionLog::empty(Category::Shares),
            superannuation: TransactionLog::empty(Category::Super),
            home: TransactionLog::empty(Category::Home),
            home_loan: TransactionLog::empty(Category::HomeLoan),
            car_loan: TransactionLog::empty(Category::CarLoan),
            hecs: TransactionLog::empty(Category::Hecs),
            income: CashStream::empty(Category::Income),
            expenses: CashStream::empty(Category::Expenses),
        }
    }
}

impl ScenarioInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `log` in the slot for its category
    #[must_use]
    pub fn with_log(mut self, log: TransactionLog) -> Self {
        let slot = match log.category() {
            Category::Shares => &mut self.shares,
            Category::Super => &mut self.superannuation,
            Category::Home => &mut self.home,
            Category::HomeLoan => &mut self.home_loan,
            Category::CarLoan => &mut self.car_loan,
            Category::Hecs => &mut self.hecs,
            Category::Income | Category::Expenses => {
                tracing::warn!(category = %log.category(), "Cash streams are not command logs");
                return self;
            }
        };
        *slot = log;
        self
    }

    #[must_use]
    pub fn with_income(mut self, income: CashStream) -> Self {
        self.income = income;
        self
    }

    #[must_use]
    pub fn with_expenses(mut self, expenses: CashStream) -> Self {
        self.expenses = expenses;
        self
    }
}

/// Run a complete scenario.
///
/// Fails on the first simulator error, on a missing tax table, or when the
/// merged cash balance goes negative in any week.
pub fn simulate(config: &ScenarioConfig, inputs: &ScenarioInputs) -> Result<SimulationResult> {
    let num_weeks = config.num_weeks;
    tracing::info!(num_weeks, "Starting simulation");

    let income = inputs.income.weekly(num_weeks);
    let expenses = inputs.expenses.weekly(num_weeks);

    let shares = run(
        &mut SharesSimulator::new(config.shares.annual_return),
        &inputs.shares,
        num_weeks,
    )?;
    let superannuation = run(
        &mut SuperSimulator::new(
            config.superannuation.annual_return,
            config.superannuation.entry_tax_rate,
        )
        .with_opening_balance(config.superannuation.opening_balance),
        &inputs.superannuation,
        num_weeks,
    )?;
    let home = run(
        &mut HomeSimulator::new(config.home.annual_growth),
        &inputs.home,
        num_weeks,
    )?;
    let home_loan = run(
        &mut LoanSimulator::new(Category::HomeLoan, config.home_loan.annual_rate, true),
        &inputs.home_loan,
        num_weeks,
    )?;
    let car_loan = run(
        &mut LoanSimulator::new(Category::CarLoan, config.car_loan.annual_rate, false),
        &inputs.car_loan,
        num_weeks,
    )?;
    let hecs = run(
        &mut HecsSimulator::new(config.hecs.annual_indexation, &income, &config.hecs.repayment),
        &inputs.hecs,
        num_weeks,
    )?;

    let settlement = taxes::settle(
        num_weeks,
        &income,
        &shares.receipts,
        &superannuation.receipts,
        &config.tax,
    )?;

    let mut weekly_cash: Vec<f64> = income
        .iter()
        .zip(&expenses)
        .map(|(earned, misc)| earned + misc)
        .collect();
    let ledgers = [
        &shares.cash_flows,
        &superannuation.cash_flows,
        &home.cash_flows,
        &home_loan.cash_flows,
        &car_loan.cash_flows,
        &hecs.cash_flows,
    ];
    for ledger in ledgers {
        for (total, amount) in weekly_cash.iter_mut().zip(ledger) {
            *total += amount;
        }
    }
    charge_invoices(&mut weekly_cash, &settlement.invoices);
    charge_invoices(&mut weekly_cash, &settlement.super_invoices);

    let cash_balance = running_balance(config.starting_cash, &weekly_cash)?;

    let holdings: [(Category, &[f64]); 6] = [
        (Category::Shares, shares.balances.as_slice()),
        (Category::Super, superannuation.balances.as_slice()),
        (Category::Home, home.balances.as_slice()),
        (Category::HomeLoan, home_loan.balances.as_slice()),
        (Category::CarLoan, car_loan.balances.as_slice()),
        (Category::Hecs, hecs.balances.as_slice()),
    ];
    let net_worth = cash_balance
        .iter()
        .enumerate()
        .map(|(week, &cash)| {
            holdings.iter().fold(cash, |total, (category, series)| {
                let value = series.get(week).copied().unwrap_or(0.0);
                if category.is_liability() {
                    total - value
                } else {
                    total + value
                }
            })
        })
        .collect();

    let timeline = config.timeline();
    let dates = (0..num_weeks).filter_map(|w| timeline.date_of(w)).collect();

    let result = SimulationResult {
        num_weeks,
        dates,
        shares,
        superannuation,
        home,
        home_loan,
        car_loan,
        hecs,
        income,
        expenses,
        yearly_taxes: settlement.yearly,
        invoices: settlement.invoices,
        super_invoices: settlement.super_invoices,
        cash_balance,
        net_worth,
    };
    tracing::info!(
        final_cash = result.final_cash(),
        final_net_worth = result.final_net_worth(),
        total_tax = result.total_tax(),
        "Simulation complete"
    );
    Ok(result)
}

fn charge_invoices(weekly_cash: &mut [f64], invoices: &[TaxInvoice]) {
    for invoice in invoices {
        if let Some(slot) = weekly_cash.get_mut(invoice.week) {
            *slot -= invoice.amount;
        }
    }
}

/// Cumulative cash position, failing at the first week it goes negative
pub fn running_balance(
    starting_cash: f64,
    weekly_cash: &[f64],
) -> std::result::Result<Vec<f64>, NegativeBalanceInvariantViolation> {
    let mut balance = starting_cash;
    let mut series = Vec::with_capacity(weekly_cash.len());
    for (week, amount) in weekly_cash.iter().enumerate() {
        balance += amount;
        if balance < -AMOUNT_EPSILON {
            return Err(NegativeBalanceInvariantViolation { week, balance });
        }
        series.push(balance);
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_balance_accumulates() {
        let series = running_balance(10.0, &[5.0, -12.0, 3.0]).unwrap();
        assert_eq!(series, vec![15.0, 3.0, 6.0]);
    }

    #[test]
    fn test_running_balance_reports_first_negative_week() {
        let err = running_balance(0.0, &[5.0, -6.0, -100.0]).unwrap_err();
        assert_eq!(err.week, 1);
        assert_eq!(err.balance, -1.0);
    }

    #[test]
    fn test_with_log_routes_by_category() {
        let log = TransactionLog::parse(Category::CarLoan, "0 START 100 0 1").unwrap();
        let inputs = ScenarioInputs::new().with_log(log.clone());
        assert_eq!(inputs.car_loan, log);
        assert!(inputs.home_loan.is_empty());
    }
}
