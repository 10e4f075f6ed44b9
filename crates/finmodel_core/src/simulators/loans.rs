//! Amortizing loans with an optional balloon payment

use serde::{Deserialize, Serialize};

use super::{WeeklySimulator, unsupported};
use crate::error::{InputSequenceError, InsufficientBalanceError, Result};
use crate::model::{Category, Command, SimulationOutput, Transaction, Week};
use crate::rates::{AMOUNT_EPSILON, WEEKS_PER_YEAR, weekly_rate};

/// Minimum weekly repayment that retires `principal` in `num_payments`
/// weeks at `weekly_rate`, charged after interest each week.
pub fn minimum_weekly_payment(principal: f64, weekly_rate: f64, num_payments: usize) -> f64 {
    if num_payments == 0 {
        return principal;
    }
    if weekly_rate.abs() < f64::EPSILON {
        return principal / num_payments as f64;
    }
    let growth = (1.0 + weekly_rate).powi(num_payments as i32);
    principal * weekly_rate * growth / (growth - 1.0)
}

/// State of an active loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanBalance {
    /// Amortizing part of the debt
    pub principal: f64,
    pub weekly_payment: f64,
    pub start_week: Week,
    pub duration_weeks: usize,
    /// Deferred lump sum, accruing interest until the loan matures
    pub balloon: f64,
}

impl LoanBalance {
    pub fn outstanding(&self) -> f64 {
        self.principal + self.balloon
    }

    /// Week the term ends and any balloon falls due
    pub fn maturity_week(&self) -> Week {
        self.start_week + self.duration_weeks
    }
}

/// Fixed-rate loan (home or car) driven by START and PAY commands
#[derive(Debug, Clone)]
pub struct LoanSimulator {
    category: Category,
    weekly_rate: f64,
    credit_principal_to_cash: bool,
    loan: Option<LoanBalance>,
}

impl LoanSimulator {
    /// `credit_principal_to_cash` makes START pay the borrowed amount into
    /// the household's cash (a mortgage funding a home purchase); otherwise
    /// the lender pays the seller directly.
    pub fn new(category: Category, annual_rate: f64, credit_principal_to_cash: bool) -> Self {
        Self {
            category,
            weekly_rate: weekly_rate(annual_rate),
            credit_principal_to_cash,
            loan: None,
        }
    }

    pub fn loan(&self) -> Option<&LoanBalance> {
        self.loan.as_ref()
    }

    fn start(
        &mut self,
        week: Week,
        amount: f64,
        years: Option<u32>,
        balloon: f64,
        out: &mut SimulationOutput,
    ) -> Result<()> {
        let invalid = |reason| InputSequenceError::InvalidLoan {
            category: self.category,
            week,
            reason,
        };
        if self
            .loan
            .is_some_and(|loan| loan.outstanding() > AMOUNT_EPSILON)
        {
            return Err(invalid("a loan is already outstanding").into());
        }
        let Some(years) = years else {
            return Err(invalid("missing loan term").into());
        };
        if balloon > amount {
            return Err(invalid("balloon exceeds the amount borrowed").into());
        }

        let duration_weeks = years as usize * WEEKS_PER_YEAR;
        let principal = amount - balloon;
        let weekly_payment = minimum_weekly_payment(principal, self.weekly_rate, duration_weeks);
        tracing::debug!(
            category = %self.category,
            week,
            amount,
            balloon,
            weekly_payment,
            "Loan started"
        );

        self.loan = Some(LoanBalance {
            principal,
            weekly_payment,
            start_week: week,
            duration_weeks,
            balloon,
        });
        if self.credit_principal_to_cash {
            out.record_cash(week, amount);
        }
        Ok(())
    }

    fn pay(&mut self, week: Week, amount: f64, out: &mut SimulationOutput) -> Result<()> {
        let available = self.loan.map_or(0.0, |loan| loan.principal);
        let Some(loan) = self.loan.as_mut().filter(|_| amount <= available + AMOUNT_EPSILON)
        else {
            return Err(InsufficientBalanceError {
                category: self.category,
                week,
                requested: amount,
                available,
            }
            .into());
        };
        loan.principal -= amount;
        if loan.principal <= AMOUNT_EPSILON {
            loan.principal = 0.0;
        }
        out.record_cash(week, -amount);
        Ok(())
    }
}

impl WeeklySimulator for LoanSimulator {
    type Receipt = ();

    fn category(&self) -> Category {
        self.category
    }

    fn apply(&mut self, transaction: &Transaction, out: &mut SimulationOutput) -> Result<()> {
        match transaction.command {
            Command::Start {
                amount,
                years,
                balloon,
            } => self.start(transaction.week, amount, years, balloon, out),
            Command::Pay { amount } => self.pay(transaction.week, amount, out),
            _ => Err(unsupported(self.category, transaction).into()),
        }
    }

    fn balance(&self) -> f64 {
        self.loan.map_or(0.0, |loan| loan.outstanding())
    }

    fn end_week(&mut self, week: Week, out: &mut SimulationOutput) -> Result<()> {
        let Some(loan) = self.loan.as_mut() else {
            return Ok(());
        };

        if loan.balloon > 0.0 && week == loan.maturity_week() {
            out.record_cash(week, -loan.balloon);
            tracing::debug!(category = %self.category, week, balloon = loan.balloon, "Balloon paid");
            loan.balloon = 0.0;
        }
        loan.balloon *= 1.0 + self.weekly_rate;

        if loan.principal > 0.0 {
            loan.principal *= 1.0 + self.weekly_rate;
            let payment = loan.weekly_payment.min(loan.principal);
            loan.principal -= payment;
            if loan.principal <= AMOUNT_EPSILON {
                loan.principal = 0.0;
                tracing::debug!(category = %self.category, week, "Loan principal retired");
            }
            out.record_cash(week, -payment);
        }
        Ok(())
    }
}
