use super::{WeeklySimulator, unsupported};
use crate::error::{InsufficientBalanceError, Result};
use crate::model::{
    Category, Command, RepaymentSchedule, SimulationOutput, Transaction, Week, YearlyTables,
};
use crate::rates::{AMOUNT_EPSILON, WEEKS_PER_YEAR, fiscal_year, weekly_rate};

/// Income-contingent education debt.
///
/// The balance is indexed weekly. Compulsory repayments are withheld from
/// each week's income at the rate the schedule assigns to the whole fiscal
/// year's income.
#[derive(Debug, Clone)]
pub struct HecsSimulator<'a> {
    balance: f64,
    weekly_rate: f64,
    weekly_income: &'a [f64],
    annual_income: Vec<f64>,
    schedule: &'a YearlyTables<RepaymentSchedule>,
}

impl<'a> HecsSimulator<'a> {
    pub fn new(
        annual_indexation: f64,
        weekly_income: &'a [f64],
        schedule: &'a YearlyTables<RepaymentSchedule>,
    ) -> Self {
        let annual_income = weekly_income
            .chunks(WEEKS_PER_YEAR)
            .map(|year| year.iter().sum())
            .collect();
        Self {
            balance: 0.0,
            weekly_rate: weekly_rate(annual_indexation),
            weekly_income,
            annual_income,
            schedule,
        }
    }

    fn compulsory_repayment(&self, week: Week) -> Result<f64> {
        let income = self.weekly_income.get(week).copied().unwrap_or(0.0);
        if income <= 0.0 {
            return Ok(0.0);
        }
        let year = fiscal_year(week);
        let annual = self.annual_income.get(year).copied().unwrap_or(0.0);
        let rate = self
            .schedule
            .for_year(year, "hecs repayment")?
            .rate_for(annual);
        Ok((income * rate).min(self.balance))
    }
}

impl WeeklySimulator for HecsSimulator<'_> {
    type Receipt = ();

    fn category(&self) -> Category {
        Category::Hecs
    }

    fn apply(&mut self, transaction: &Transaction, out: &mut SimulationOutput) -> Result<()> {
        let week = transaction.week;
        match transaction.command {
            // Further study adds to the existing debt
            Command::Start { amount, .. } => {
                self.balance += amount;
            }
            Command::Pay { amount } => {
                if amount > self.balance + AMOUNT_EPSILON {
                    return Err(InsufficientBalanceError {
                        category: Category::Hecs,
                        week,
                        requested: amount,
                        available: self.balance,
                    }
                    .into());
                }
                self.balance -= amount;
                if self.balance <= AMOUNT_EPSILON {
                    self.balance = 0.0;
                }
                out.record_cash(week, -amount);
            }
            _ => return Err(unsupported(Category::Hecs, transaction).into()),
        }
        Ok(())
    }

    fn balance(&self) -> f64 {
        self.balance
    }

    fn end_week(&mut self, week: Week, out: &mut SimulationOutput) -> Result<()> {
        if self.balance <= 0.0 {
            return Ok(());
        }
        self.balance *= 1.0 + self.weekly_rate;

        let repayment = self.compulsory_repayment(week)?;
        if repayment > 0.0 {
            self.balance -= repayment;
            if self.balance <= AMOUNT_EPSILON {
                self.balance = 0.0;
                tracing::debug!(week, "HECS debt repaid");
            }
            out.record_cash(week, -repayment);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulationError;
    use crate::model::TransactionLog;
    use crate::simulators::run;

    fn australian() -> YearlyTables<RepaymentSchedule> {
        YearlyTables::Fixed {
            table: RepaymentSchedule::australian_hecs(),
        }
    }

    #[test]
    fn test_repayment_uses_annual_income_band() {
        // 65,000 a year falls in the 2% band
        let income = vec![1250.0; 52];
        let schedule = australian();
        let log = TransactionLog::parse(Category::Hecs, "0 START 30000").unwrap();
        let out = run(&mut HecsSimulator::new(0.0, &income, &schedule), &log, 52).unwrap();

        assert_eq!(out.balances[0], 30_000.0);
        assert!((out.cash_flows[0] + 25.0).abs() < 1e-9);
        assert!((out.balances[51] - (30_000.0 - 51.0 * 25.0)).abs() < 1e-6);
    }

    #[test]
    fn test_low_income_repays_nothing_but_debt_is_indexed() {
        let income = vec![500.0; 52];
        let schedule = australian();
        let log = TransactionLog::parse(Category::Hecs, "0 START 10000").unwrap();
        let out = run(&mut HecsSimulator::new(0.04, &income, &schedule), &log, 52).unwrap();
        assert!(out.cash_flows.iter().all(|&c| c == 0.0));

        let expected = 10_000.0 * 1.04_f64.powf(51.0 / 52.0);
        assert!((out.balances[51] - expected).abs() < 1e-6);
    }

    #[test]
    fn test_repayment_capped_at_balance() {
        let income = vec![3000.0; 52];
        let schedule = australian();
        let log = TransactionLog::parse(Category::Hecs, "0 START 100").unwrap();
        let out = run(&mut HecsSimulator::new(0.0, &income, &schedule), &log, 4).unwrap();
        assert_eq!(out.cash_flows[0], -100.0);
        assert_eq!(out.balances[1], 0.0);
    }

    #[test]
    fn test_voluntary_payment() {
        let income = vec![0.0; 10];
        let schedule = australian();
        let log = TransactionLog::parse(Category::Hecs, "0 START 1000\n3 PAY 400").unwrap();
        let out = run(&mut HecsSimulator::new(0.0, &income, &schedule), &log, 10).unwrap();
        assert_eq!(out.cash_flows[3], -400.0);
        assert_eq!(out.balances[3], 600.0);
    }

    #[test]
    fn test_missing_schedule_year() {
        let income = vec![2000.0; 60];
        let schedule = YearlyTables::PerYear {
            tables: vec![RepaymentSchedule::australian_hecs()],
        };
        let log = TransactionLog::parse(Category::Hecs, "0 START 50000").unwrap();
        let err = run(&mut HecsSimulator::new(0.0, &income, &schedule), &log, 60).unwrap_err();
        match err {
            SimulationError::MissingBracketTable(e) => {
                assert_eq!(e.table, "hecs repayment");
                assert_eq!(e.year, 1);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
