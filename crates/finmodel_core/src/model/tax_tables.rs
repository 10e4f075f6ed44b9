//! Bracket tables for income tax and income-contingent loan repayment

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::{MissingBracketTableError, UnorderedThresholdsError};

/// A band starting at `threshold`, taxed at `rate` (fraction)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub threshold: f64,
    pub rate: f64,
}

impl TaxBracket {
    pub const fn new(threshold: f64, rate: f64) -> Self {
        Self { threshold, rate }
    }
}

fn zip_parts(thresholds: &[f64], rates: &[f64]) -> Vec<TaxBracket> {
    thresholds
        .iter()
        .zip(rates)
        .map(|(&threshold, &rate)| TaxBracket { threshold, rate })
        .collect()
}

/// Thresholds must be finite and strictly ascending
fn check_ascending(entries: &[TaxBracket]) -> Result<(), UnorderedThresholdsError> {
    let mut previous = f64::NEG_INFINITY;
    for (index, entry) in entries.iter().enumerate() {
        // Written as a negation so NaN thresholds are rejected too
        if !(entry.threshold > previous && entry.threshold.is_finite()) {
            return Err(UnorderedThresholdsError {
                index,
                threshold: entry.threshold,
                previous,
            });
        }
        previous = entry.threshold;
    }
    Ok(())
}

/// Scale the monetary thresholds of a table, leaving rates alone
pub trait Indexable {
    fn indexed(&self, factor: f64) -> Self;
}

/// Progressive marginal-rate table, ordered by threshold.
///
/// Income below the first threshold is untaxed; each rate applies from its
/// threshold up to the next one, the last rate applies without limit.
/// Thresholds are checked on construction and on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, UnorderedThresholdsError> {
        check_ascending(&brackets)?;
        Ok(Self { brackets })
    }

    /// Build from parallel threshold/rate lists
    pub fn from_parts(thresholds: &[f64], rates: &[f64]) -> Result<Self, UnorderedThresholdsError> {
        Self::new(zip_parts(thresholds, rates))
    }

    /// Resident individual rates (2018-19 thresholds)
    pub fn australian_resident() -> Self {
        Self {
            brackets: zip_parts(
                &[18_200.0, 45_000.0, 120_000.0, 180_000.0],
                &[0.19, 0.325, 0.37, 0.45],
            ),
        }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Same thresholds, every rate lowered by `offset` and floored at zero
    pub fn with_rate_offset(&self, offset: f64) -> Self {
        Self {
            brackets: self
                .brackets
                .iter()
                .map(|b| TaxBracket {
                    threshold: b.threshold,
                    rate: (b.rate - offset).max(0.0),
                })
                .collect(),
        }
    }
}

impl TryFrom<Vec<TaxBracket>> for BracketTable {
    type Error = UnorderedThresholdsError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<BracketTable> for Vec<TaxBracket> {
    fn from(table: BracketTable) -> Self {
        table.brackets
    }
}

impl Indexable for BracketTable {
    fn indexed(&self, factor: f64) -> Self {
        Self {
            brackets: self
                .brackets
                .iter()
                .map(|b| TaxBracket {
                    threshold: b.threshold * factor,
                    rate: b.rate,
                })
                .collect(),
        }
    }
}

/// Whole-income repayment rates for an income-contingent loan.
///
/// Unlike [`BracketTable`], the rate of the band the income falls in applies
/// to the entire income. Thresholds strictly ascend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct RepaymentSchedule {
    bands: Vec<TaxBracket>,
}

impl RepaymentSchedule {
    pub fn new(bands: Vec<TaxBracket>) -> Result<Self, UnorderedThresholdsError> {
        check_ascending(&bands)?;
        Ok(Self { bands })
    }

    /// Compulsory repayment thresholds (2019-20)
    pub fn australian_hecs() -> Self {
        const THRESHOLDS: [f64; 19] = [
            0.0, 54_435.0, 62_850.0, 66_620.0, 70_618.0, 74_855.0, 79_346.0, 84_107.0, 89_154.0,
            94_503.0, 100_174.0, 106_185.0, 112_556.0, 119_309.0, 126_467.0, 134_056.0,
            142_100.0, 150_626.0, 159_663.0,
        ];
        const RATES: [f64; 19] = [
            0.0, 0.01, 0.02, 0.025, 0.03, 0.035, 0.04, 0.045, 0.05, 0.055, 0.06, 0.065, 0.07,
            0.075, 0.08, 0.085, 0.09, 0.095, 0.10,
        ];
        Self {
            bands: zip_parts(&THRESHOLDS, &RATES),
        }
    }

    /// Rate for the band containing `annual_income`; zero below the first band
    pub fn rate_for(&self, annual_income: f64) -> f64 {
        self.bands
            .iter()
            .take_while(|band| annual_income >= band.threshold)
            .last()
            .map(|band| band.rate)
            .unwrap_or(0.0)
    }
}

impl TryFrom<Vec<TaxBracket>> for RepaymentSchedule {
    type Error = UnorderedThresholdsError;

    fn try_from(bands: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(bands)
    }
}

impl From<RepaymentSchedule> for Vec<TaxBracket> {
    fn from(schedule: RepaymentSchedule) -> Self {
        schedule.bands
    }
}

impl Indexable for RepaymentSchedule {
    fn indexed(&self, factor: f64) -> Self {
        Self {
            bands: self
                .bands
                .iter()
                .map(|b| TaxBracket {
                    threshold: b.threshold * factor,
                    rate: b.rate,
                })
                .collect(),
        }
    }
}

/// Where a fiscal year's table comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearlyTables<T> {
    /// One table for every year
    Fixed { table: T },
    /// An explicit table per fiscal year; years past the end are missing
    PerYear { tables: Vec<T> },
    /// Thresholds of `base` grown by `(1 + annual_rate)^year`
    Indexed { base: T, annual_rate: f64 },
}

impl<T: Clone + Indexable> YearlyTables<T> {
    pub fn for_year(
        &self,
        year: usize,
        name: &'static str,
    ) -> Result<Cow<'_, T>, MissingBracketTableError> {
        match self {
            YearlyTables::Fixed { table } => Ok(Cow::Borrowed(table)),
            YearlyTables::PerYear { tables } => tables
                .get(year)
                .map(Cow::Borrowed)
                .ok_or(MissingBracketTableError { table: name, year }),
            YearlyTables::Indexed { base, annual_rate } => {
                let factor = (1.0 + annual_rate).powi(year as i32);
                Ok(Cow::Owned(base.indexed(factor)))
            }
        }
    }
}
