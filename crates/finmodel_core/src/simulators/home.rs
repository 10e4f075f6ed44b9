use super::{WeeklySimulator, unsupported};
use crate::error::{InsufficientBalanceError, Result};
use crate::model::{Category, Command, SimulationOutput, Transaction, Week};
use crate::rates::{AMOUNT_EPSILON, weekly_rate};

/// Owner-occupied home equity. A main residence is exempt from CGT, so
/// sales produce no receipts.
#[derive(Debug, Clone)]
pub struct HomeSimulator {
    value: f64,
    weekly_rate: f64,
}

impl HomeSimulator {
    pub fn new(annual_growth: f64) -> Self {
        Self {
            value: 0.0,
            weekly_rate: weekly_rate(annual_growth),
        }
    }
}

impl WeeklySimulator for HomeSimulator {
    type Receipt = ();

    fn category(&self) -> Category {
        Category::Home
    }

    fn apply(&mut self, transaction: &Transaction, out: &mut SimulationOutput) -> Result<()> {
        let week = transaction.week;
        match transaction.command {
            Command::Buy {
                amount,
                contribution: None,
            } => {
                self.value += amount;
                out.record_cash(week, -amount);
            }
            Command::Sell { amount } => {
                let amount = amount.unwrap_or(self.value);
                if amount > self.value + AMOUNT_EPSILON {
                    return Err(InsufficientBalanceError {
                        category: Category::Home,
                        week,
                        requested: amount,
                        available: self.value,
                    }
                    .into());
                }
                self.value -= amount;
                if self.value <= AMOUNT_EPSILON {
                    self.value = 0.0;
                }
                tracing::debug!(week, amount, "Home sold");
                out.record_cash(week, amount);
            }
            _ => return Err(unsupported(Category::Home, transaction).into()),
        }
        Ok(())
    }

    fn balance(&self) -> f64 {
        self.value
    }

    fn end_week(&mut self, _week: Week, _out: &mut SimulationOutput) -> Result<()> {
        self.value *= 1.0 + self.weekly_rate;
        Ok(())
    }
}
