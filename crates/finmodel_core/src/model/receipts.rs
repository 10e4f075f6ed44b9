//! Records emitted by simulators for the tax settlement stage

use serde::{Deserialize, Serialize};

use super::category::Week;
use super::transactions::Contribution;
use crate::rates::WEEKS_PER_YEAR;

/// One lot's share of a SELL from a shares ledger
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub sell_week: Week,
    pub acquired_week: Week,
    /// Market value realized from this lot
    pub amount_sold: f64,
    /// Cost basis consumed from this lot
    pub cost_basis: f64,
    pub realized_gain: f64,
    pub cgt_discount_eligible: bool,
}

impl SaleRecord {
    pub fn new(sell_week: Week, acquired_week: Week, amount_sold: f64, cost_basis: f64) -> Self {
        Self {
            sell_week,
            acquired_week,
            amount_sold,
            cost_basis,
            realized_gain: amount_sold - cost_basis,
            cgt_discount_eligible: is_discount_eligible(acquired_week, sell_week),
        }
    }

    /// Gain included in taxable income. Positive gains on assets held longer
    /// than a year are scaled by `discount`; losses are never scaled.
    pub fn taxable_gain(&self, discount: f64) -> f64 {
        if self.cgt_discount_eligible && self.realized_gain > 0.0 {
            self.realized_gain * (1.0 - discount)
        } else {
            self.realized_gain
        }
    }
}

/// Held for strictly more than 52 weeks
#[inline]
pub fn is_discount_eligible(acquired_week: Week, sell_week: Week) -> bool {
    sell_week.saturating_sub(acquired_week) > WEEKS_PER_YEAR
}

/// One lot's share of a withdrawal from a super fund
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuperSaleRecord {
    pub sell_week: Week,
    pub acquired_week: Week,
    /// Portion that has already borne the fund's entry tax
    pub taxed_amount: f64,
    /// Earnings accrued since the last entry-tax pass
    pub untaxed_earnings: f64,
}

impl SuperSaleRecord {
    pub fn amount(&self) -> f64 {
        self.taxed_amount + self.untaxed_earnings
    }
}

/// Everything the super simulator reports to settlement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SuperReceipt {
    Contribution {
        week: Week,
        kind: Contribution,
        amount: f64,
    },
    Withdrawal(SuperSaleRecord),
}

impl SuperReceipt {
    pub fn week(&self) -> Week {
        match self {
            SuperReceipt::Contribution { week, .. } => *week,
            SuperReceipt::Withdrawal(record) => record.sell_week,
        }
    }
}

/// Tax owed for one fiscal year, due at `week`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxInvoice {
    pub year: usize,
    pub week: Week,
    pub amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_boundary() {
        assert!(!is_discount_eligible(0, 52));
        assert!(is_discount_eligible(0, 53));
        assert!(!is_discount_eligible(10, 62));
        assert!(is_discount_eligible(10, 63));
    }

    #[test]
    fn test_value_conservation() {
        let record = SaleRecord::new(60, 0, 120.0, 100.0);
        assert!((record.realized_gain + record.cost_basis - record.amount_sold).abs() < 1e-12);
    }

    #[test]
    fn test_taxable_gain_discount_only_on_gains() {
        let gain = SaleRecord::new(60, 0, 120.0, 100.0);
        assert!((gain.taxable_gain(0.5) - 10.0).abs() < 1e-12);

        let short = SaleRecord::new(30, 0, 120.0, 100.0);
        assert!((short.taxable_gain(0.5) - 20.0).abs() < 1e-12);

        let loss = SaleRecord::new(60, 0, 80.0, 100.0);
        assert!((loss.taxable_gain(0.5) + 20.0).abs() < 1e-12);
    }
}
