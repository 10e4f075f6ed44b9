use super::{WeeklySimulator, insufficient, unsupported};
use crate::error::Result;
use crate::ledger::{LotLedger, SuperLot};
use crate::model::{Category, Command, SimulationOutput, SuperReceipt, Transaction, Week};
use crate::rates::{WEEKS_PER_YEAR, weekly_rate};

/// Superannuation fund; contributions are lots, earnings are taxed annually
/// inside the fund at `entry_tax_rate`.
#[derive(Debug, Clone)]
pub struct SuperSimulator {
    ledger: LotLedger<SuperLot>,
    weekly_rate: f64,
    entry_tax_rate: f64,
    entry_tax_withheld: f64,
}

impl SuperSimulator {
    pub fn new(annual_return: f64, entry_tax_rate: f64) -> Self {
        Self {
            ledger: LotLedger::new(),
            weekly_rate: weekly_rate(annual_return),
            entry_tax_rate,
            entry_tax_withheld: 0.0,
        }
    }

    /// Seed the fund with an existing balance, treated as taxed capital held
    /// since week 0. No cash changes hands.
    pub fn with_opening_balance(mut self, balance: f64) -> Self {
        if balance > 0.0 {
            self.ledger.push(SuperLot::new(0, balance));
        }
        self
    }

    pub fn ledger(&self) -> &LotLedger<SuperLot> {
        &self.ledger
    }

    /// Total entry tax withheld by the fund so far
    pub fn entry_tax_withheld(&self) -> f64 {
        self.entry_tax_withheld
    }
}

impl WeeklySimulator for SuperSimulator {
    type Receipt = SuperReceipt;

    fn category(&self) -> Category {
        Category::Super
    }

    fn begin_week(&mut self, week: Week, _out: &mut SimulationOutput<SuperReceipt>) -> Result<()> {
        if week > 0 && week % WEEKS_PER_YEAR == 0 {
            let withheld = self.ledger.apply_entry_tax(self.entry_tax_rate);
            self.entry_tax_withheld += withheld;
            tracing::debug!(week, withheld, "Super entry tax applied");
        }
        Ok(())
    }

    fn apply(
        &mut self,
        transaction: &Transaction,
        out: &mut SimulationOutput<SuperReceipt>,
    ) -> Result<()> {
        let week = transaction.week;
        match transaction.command {
            Command::Buy {
                amount,
                contribution: Some(kind),
            } => {
                self.ledger.push(SuperLot::new(week, amount));
                out.record_cash(week, -amount);
                out.receipts
                    .push(SuperReceipt::Contribution { week, kind, amount });
            }
            Command::Sell { amount } => {
                let amount = amount.unwrap_or_else(|| self.ledger.total_value());
                let sales = self
                    .ledger
                    .sell(amount, week)
                    .map_err(|overdraw| insufficient(Category::Super, week, overdraw))?;
                let proceeds: f64 = sales.iter().map(|sale| sale.amount()).sum();
                out.record_cash(week, proceeds);
                out.receipts
                    .extend(sales.into_iter().map(SuperReceipt::Withdrawal));
            }
            _ => return Err(unsupported(Category::Super, transaction).into()),
        }
        Ok(())
    }

    fn balance(&self) -> f64 {
        self.ledger.total_value()
    }

    fn end_week(&mut self, _week: Week, _out: &mut SimulationOutput<SuperReceipt>) -> Result<()> {
        self.ledger.apply_growth(self.weekly_rate);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Contribution, TransactionLog};
    use crate::simulators::run;

    #[test]
    fn test_first_year_growth_taxed_at_entry() {
        let log = TransactionLog::parse(Category::Super, "0 BUY CC 1000").unwrap();
        let mut simulator = SuperSimulator::new(0.10, 0.15);
        let out = run(&mut simulator, &log, 53).unwrap();

        // Growth of 100 taxed at 15%, principal untouched
        assert!(
            (out.balances[52] - 1085.0).abs() < 0.01,
            "Expected 1085, got {}",
            out.balances[52]
        );
        assert!((simulator.entry_tax_withheld() - 15.0).abs() < 0.01);
        assert_eq!(out.cash_flows[0], -1000.0);
        assert_eq!(
            out.receipts,
            vec![SuperReceipt::Contribution {
                week: 0,
                kind: Contribution::Concessional,
                amount: 1000.0
            }]
        );
    }

    #[test]
    fn test_withdrawal_reports_taxed_and_untaxed_parts() {
        let log = TransactionLog::parse(Category::Super, "0 BUY NCC 1000\n26 SELL 500").unwrap();
        let out = run(&mut SuperSimulator::new(0.10, 0.15), &log, 30).unwrap();

        let withdrawals: Vec<_> = out
            .receipts
            .iter()
            .filter_map(|r| match r {
                SuperReceipt::Withdrawal(record) => Some(*record),
                _ => None,
            })
            .collect();
        assert_eq!(withdrawals.len(), 1);
        let record = withdrawals[0];
        assert!((record.amount() - 500.0).abs() < 1e-9);
        assert!(record.untaxed_earnings > 0.0);

        // Same split as the lot: half a year of 10% growth on 1000
        let grown = 1000.0 * 1.1_f64.powf(0.5);
        let expected_untaxed = 500.0 * (grown - 1000.0) / grown;
        assert!((record.untaxed_earnings - expected_untaxed).abs() < 1e-6);
        assert!((out.cash_flows[26] - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_opening_balance_has_no_cash_impact() {
        let log = TransactionLog::empty(Category::Super);
        let out = run(
            &mut SuperSimulator::new(0.0, 0.15).with_opening_balance(20_000.0),
            &log,
            4,
        )
        .unwrap();
        assert_eq!(out.balances, vec![20_000.0; 4]);
        assert!(out.cash_flows.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_oversell_is_fatal() {
        let log = TransactionLog::parse(Category::Super, "0 BUY CC 100\n1 SELL 200").unwrap();
        assert!(run(&mut SuperSimulator::new(0.0, 0.15), &log, 5).is_err());
    }
}
