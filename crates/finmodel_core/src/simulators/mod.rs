//! Per-category weekly simulators
//!
//! Each simulator owns one holding or debt and is driven through the horizon
//! by [`run`]: for every week it gets a chance to act before the week's
//! transactions (`begin_week`), applies them in log order, has its balance
//! sampled, then accrues growth or interest (`end_week`).

mod hecs;
mod home;
mod loans;
mod shares;
mod superannuation;

pub use hecs::HecsSimulator;
pub use home::HomeSimulator;
pub use loans::{LoanBalance, LoanSimulator, minimum_weekly_payment};
pub use shares::SharesSimulator;
pub use superannuation::SuperSimulator;

use crate::error::{InputSequenceError, InsufficientBalanceError, Result};
use crate::ledger::Overdraw;
use crate::model::{Category, SimulationOutput, Transaction, TransactionLog, Week};

/// A holding or debt that evolves one week at a time
pub trait WeeklySimulator {
    /// Record handed to tax settlement
    type Receipt;

    fn category(&self) -> Category;

    fn begin_week(&mut self, _week: Week, _out: &mut SimulationOutput<Self::Receipt>) -> Result<()> {
        Ok(())
    }

    fn apply(
        &mut self,
        transaction: &Transaction,
        out: &mut SimulationOutput<Self::Receipt>,
    ) -> Result<()>;

    /// Holding value or outstanding debt after the week's transactions
    fn balance(&self) -> f64;

    fn end_week(&mut self, week: Week, out: &mut SimulationOutput<Self::Receipt>) -> Result<()>;
}

/// Drive `simulator` through `num_weeks` weeks of `log`.
///
/// The first failing transaction aborts the run, so no output exists for the
/// weeks after it.
pub fn run<S: WeeklySimulator>(
    simulator: &mut S,
    log: &TransactionLog,
    num_weeks: usize,
) -> Result<SimulationOutput<S::Receipt>> {
    let category = simulator.category();
    let mut out = SimulationOutput::new(category, num_weeks);
    let mut cursor = log.cursor();

    for week in 0..num_weeks {
        simulator.begin_week(week, &mut out)?;
        for transaction in cursor.take_week(week) {
            simulator.apply(transaction, &mut out)?;
        }
        out.balances.push(simulator.balance());
        simulator.end_week(week, &mut out)?;
    }

    let ignored = cursor.remaining();
    if let Some(first) = ignored.first() {
        tracing::warn!(
            category = %category,
            count = ignored.len(),
            first_week = first.week,
            num_weeks,
            "Ignoring transactions beyond the simulation horizon"
        );
    }

    Ok(out)
}

pub(crate) fn unsupported(category: Category, transaction: &Transaction) -> InputSequenceError {
    InputSequenceError::UnsupportedCommand {
        category,
        week: transaction.week,
        command: transaction.command.name(),
    }
}

pub(crate) fn insufficient(
    category: Category,
    week: Week,
    overdraw: Overdraw,
) -> InsufficientBalanceError {
    InsufficientBalanceError {
        category,
        week,
        requested: overdraw.requested,
        available: overdraw.available,
    }
}

