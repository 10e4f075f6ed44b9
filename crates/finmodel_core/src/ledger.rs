//! FIFO cost-basis lot ledger
//!
//! Lots are kept in acquisition order and consumed from the front. A partial
//! sale splits a lot's cost basis and value by the same fraction, so every
//! sale record satisfies `realized_gain + cost_basis == amount_sold`.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::model::{SaleRecord, SuperSaleRecord, Week};
use crate::rates::AMOUNT_EPSILON;

/// A holding that can grow and be sold off proportionally
pub trait Lot {
    /// Record produced when part of the lot is sold
    type Sale;

    fn acquired_at(&self) -> Week;

    fn value(&self) -> f64;

    fn grow(&mut self, weekly_rate: f64);

    /// Remove `fraction` (in `(0, 1]`) of the lot, reporting what was sold
    fn take(&mut self, fraction: f64, sell_week: Week) -> Self::Sale;
}

/// A parcel of shares bought in one transaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShareLot {
    pub acquired_at: Week,
    pub cost_basis: f64,
    pub value: f64,
}

impl ShareLot {
    pub fn new(acquired_at: Week, amount: f64) -> Self {
        Self {
            acquired_at,
            cost_basis: amount,
            value: amount,
        }
    }
}

impl Lot for ShareLot {
    type Sale = SaleRecord;

    fn acquired_at(&self) -> Week {
        self.acquired_at
    }

    fn value(&self) -> f64 {
        self.value
    }

    fn grow(&mut self, weekly_rate: f64) {
        self.value *= 1.0 + weekly_rate;
    }

    fn take(&mut self, fraction: f64, sell_week: Week) -> SaleRecord {
        let (basis, sold) = if fraction >= 1.0 {
            let taken = (self.cost_basis, self.value);
            self.cost_basis = 0.0;
            self.value = 0.0;
            taken
        } else {
            let taken = (self.cost_basis * fraction, self.value * fraction);
            self.cost_basis -= taken.0;
            self.value -= taken.1;
            taken
        };
        SaleRecord::new(sell_week, self.acquired_at, sold, basis)
    }
}

/// A superannuation contribution, split into the part that has already
/// borne the fund's entry tax and earnings accrued since.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuperLot {
    pub acquired_at: Week,
    pub taxed_amount: f64,
    pub untaxed_earnings: f64,
}

impl SuperLot {
    pub fn new(acquired_at: Week, amount: f64) -> Self {
        Self {
            acquired_at,
            taxed_amount: amount,
            untaxed_earnings: 0.0,
        }
    }

    /// Convert accrued earnings into taxed balance, returning the tax withheld
    pub fn apply_entry_tax(&mut self, rate: f64) -> f64 {
        let tax = self.untaxed_earnings * rate;
        self.taxed_amount += self.untaxed_earnings - tax;
        self.untaxed_earnings = 0.0;
        tax
    }
}

impl Lot for SuperLot {
    type Sale = SuperSaleRecord;

    fn acquired_at(&self) -> Week {
        self.acquired_at
    }

    fn value(&self) -> f64 {
        self.taxed_amount + self.untaxed_earnings
    }

    // Growth on the whole lot (taxed part included) is untaxed earnings
    fn grow(&mut self, weekly_rate: f64) {
        self.untaxed_earnings += self.value() * weekly_rate;
    }

    fn take(&mut self, fraction: f64, sell_week: Week) -> SuperSaleRecord {
        let (taxed, untaxed) = if fraction >= 1.0 {
            let taken = (self.taxed_amount, self.untaxed_earnings);
            self.taxed_amount = 0.0;
            self.untaxed_earnings = 0.0;
            taken
        } else {
            let taken = (
                self.taxed_amount * fraction,
                self.untaxed_earnings * fraction,
            );
            self.taxed_amount -= taken.0;
            self.untaxed_earnings -= taken.1;
            taken
        };
        SuperSaleRecord {
            sell_week,
            acquired_week: self.acquired_at,
            taxed_amount: taxed,
            untaxed_earnings: untaxed,
        }
    }
}

/// A sale asked for more than the ledger holds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overdraw {
    pub requested: f64,
    pub available: f64,
}

/// Ordered collection of lots; insertion order is consumption order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotLedger<L> {
    lots: VecDeque<L>,
}

impl<L> Default for LotLedger<L> {
    fn default() -> Self {
        Self {
            lots: VecDeque::new(),
        }
    }
}

impl<L: Lot> LotLedger<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, lot: L) {
        self.lots.push_back(lot);
    }

    pub fn lots(&self) -> impl Iterator<Item = &L> {
        self.lots.iter()
    }

    pub fn len(&self) -> usize {
        self.lots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    pub fn total_value(&self) -> f64 {
        self.lots.iter().map(Lot::value).sum()
    }

    pub fn apply_growth(&mut self, weekly_rate: f64) {
        for lot in &mut self.lots {
            lot.grow(weekly_rate);
        }
    }

    /// Sell `amount` of value, earliest lots first.
    ///
    /// Returns one sale per lot touched. An amount above the total value is
    /// rejected before any lot is modified.
    pub fn sell(&mut self, amount: f64, sell_week: Week) -> Result<Vec<L::Sale>, Overdraw> {
        let available = self.total_value();
        if amount > available + AMOUNT_EPSILON {
            return Err(Overdraw {
                requested: amount,
                available,
            });
        }

        let mut sales = Vec::new();
        let mut remaining = amount;
        while remaining > AMOUNT_EPSILON {
            let Some(front) = self.lots.front_mut() else {
                break;
            };
            let value = front.value();
            if value <= AMOUNT_EPSILON {
                self.lots.pop_front();
                continue;
            }

            let fraction = (remaining / value).min(1.0);
            remaining -= value * fraction;
            sales.push(front.take(fraction, sell_week));

            if front.value() <= AMOUNT_EPSILON {
                self.lots.pop_front();
            }
        }

        Ok(sales)
    }
}

impl LotLedger<SuperLot> {
    /// Apply the fund's entry tax to every lot; returns the total withheld
    pub fn apply_entry_tax(&mut self, rate: f64) -> f64 {
        self.lots
            .iter_mut()
            .map(|lot| lot.apply_entry_tax(rate))
            .sum()
    }
}
