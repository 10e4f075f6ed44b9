use super::{WeeklySimulator, insufficient, unsupported};
use crate::error::Result;
use crate::ledger::{LotLedger, ShareLot};
use crate::model::{Category, Command, SaleRecord, SimulationOutput, Transaction, Week};
use crate::rates::weekly_rate;

/// Share portfolio held as FIFO lots
#[derive(Debug, Clone)]
pub struct SharesSimulator {
    ledger: LotLedger<ShareLot>,
    weekly_rate: f64,
}

impl SharesSimulator {
    pub fn new(annual_return: f64) -> Self {
        Self {
            ledger: LotLedger::new(),
            weekly_rate: weekly_rate(annual_return),
        }
    }

    pub fn ledger(&self) -> &LotLedger<ShareLot> {
        &self.ledger
    }
}

impl WeeklySimulator for SharesSimulator {
    type Receipt = SaleRecord;

    fn category(&self) -> Category {
        Category::Shares
    }

    fn apply(
        &mut self,
        transaction: &Transaction,
        out: &mut SimulationOutput<SaleRecord>,
    ) -> Result<()> {
        let week = transaction.week;
        match transaction.command {
            Command::Buy {
                amount,
                contribution: None,
            } => {
                self.ledger.push(ShareLot::new(week, amount));
                out.record_cash(week, -amount);
            }
            Command::Sell { amount } => {
                let amount = amount.unwrap_or_else(|| self.ledger.total_value());
                let sales = self
                    .ledger
                    .sell(amount, week)
                    .map_err(|overdraw| insufficient(Category::Shares, week, overdraw))?;
                let proceeds: f64 = sales.iter().map(|sale| sale.amount_sold).sum();
                tracing::debug!(week, proceeds, lots = sales.len(), "Shares sold");
                out.record_cash(week, proceeds);
                out.receipts.extend(sales);
            }
            _ => return Err(unsupported(Category::Shares, transaction).into()),
        }
        Ok(())
    }

    fn balance(&self) -> f64 {
        self.ledger.total_value()
    }

    fn end_week(&mut self, _week: Week, _out: &mut SimulationOutput<SaleRecord>) -> Result<()> {
        self.ledger.apply_growth(self.weekly_rate);
        Ok(())
    }
}
