//! Scenario configuration
//!
//! `ScenarioConfig` carries every assumption a run needs: the horizon, the
//! opening cash position, growth and interest rates per category, and the
//! tax tables. Every field has a default, so a scenario file only names what
//! it changes:
//!
//! ```yaml
//! num_weeks: 1820
//! starting_cash: 25000
//! shares:
//!   annual_return: 0.07
//! tax:
//!   brackets:
//!     indexed:
//!       base:
//!         - { threshold: 18200, rate: 0.19 }
//!         - { threshold: 45000, rate: 0.325 }
//!       annual_rate: 0.025
//! ```

use serde::{Deserialize, Serialize};

use crate::model::{BracketTable, RepaymentSchedule, YearlyTables};
use crate::rates::{Timeline, WEEKS_PER_YEAR};

fn default_num_weeks() -> usize {
    35 * WEEKS_PER_YEAR
}

fn default_share_return() -> f64 {
    0.10
}

fn default_super_return() -> f64 {
    0.10
}

fn default_entry_tax_rate() -> f64 {
    0.15
}

fn default_home_growth() -> f64 {
    0.08
}

fn default_home_loan_rate() -> f64 {
    0.06
}

fn default_car_loan_rate() -> f64 {
    0.07
}

fn default_hecs_indexation() -> f64 {
    0.04
}

fn default_concessional_rate() -> f64 {
    0.15
}

fn default_super_offset() -> f64 {
    0.30
}

fn default_cgt_discount() -> f64 {
    0.5
}

fn default_home_loan() -> LoanConfig {
    LoanConfig {
        annual_rate: default_home_loan_rate(),
    }
}

fn default_car_loan() -> LoanConfig {
    LoanConfig {
        annual_rate: default_car_loan_rate(),
    }
}

/// Complete scenario configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Simulation horizon in weeks
    #[serde(default = "default_num_weeks")]
    pub num_weeks: usize,

    /// Calendar date of week 0, used only to label output
    #[serde(default)]
    pub start_date: Option<jiff::civil::Date>,

    /// Cash on hand before week 0
    #[serde(default)]
    pub starting_cash: f64,

    #[serde(default)]
    pub shares: SharesConfig,

    #[serde(default, rename = "super")]
    pub superannuation: SuperConfig,

    #[serde(default)]
    pub home: HomeConfig,

    #[serde(default = "default_home_loan")]
    pub home_loan: LoanConfig,

    #[serde(default = "default_car_loan")]
    pub car_loan: LoanConfig,

    #[serde(default)]
    pub hecs: HecsConfig,

    #[serde(default)]
    pub tax: TaxConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            num_weeks: default_num_weeks(),
            start_date: None,
            starting_cash: 0.0,
            shares: SharesConfig::default(),
            superannuation: SuperConfig::default(),
            home: HomeConfig::default(),
            home_loan: default_home_loan(),
            car_loan: default_car_loan(),
            hecs: HecsConfig::default(),
            tax: TaxConfig::default(),
        }
    }
}

impl ScenarioConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_weeks(mut self, num_weeks: usize) -> Self {
        self.num_weeks = num_weeks;
        self
    }

    #[must_use]
    pub fn with_starting_cash(mut self, starting_cash: f64) -> Self {
        self.starting_cash = starting_cash;
        self
    }

    pub fn timeline(&self) -> Timeline {
        Timeline::new(self.start_date, self.num_weeks)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharesConfig {
    #[serde(default = "default_share_return")]
    pub annual_return: f64,
}

impl Default for SharesConfig {
    fn default() -> Self {
        Self {
            annual_return: default_share_return(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuperConfig {
    #[serde(default = "default_super_return")]
    pub annual_return: f64,
    /// Tax the fund withholds on each year's earnings
    #[serde(default = "default_entry_tax_rate")]
    pub entry_tax_rate: f64,
    /// Existing fund balance at week 0
    #[serde(default)]
    pub opening_balance: f64,
}

impl Default for SuperConfig {
    fn default() -> Self {
        Self {
            annual_return: default_super_return(),
            entry_tax_rate: default_entry_tax_rate(),
            opening_balance: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeConfig {
    #[serde(default = "default_home_growth")]
    pub annual_growth: f64,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            annual_growth: default_home_growth(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanConfig {
    pub annual_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HecsConfig {
    #[serde(default = "default_hecs_indexation")]
    pub annual_indexation: f64,
    #[serde(default = "default_repayment_schedule")]
    pub repayment: YearlyTables<RepaymentSchedule>,
}

fn default_repayment_schedule() -> YearlyTables<RepaymentSchedule> {
    YearlyTables::Fixed {
        table: RepaymentSchedule::australian_hecs(),
    }
}

impl Default for HecsConfig {
    fn default() -> Self {
        Self {
            annual_indexation: default_hecs_indexation(),
            repayment: default_repayment_schedule(),
        }
    }
}

/// Income tax assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxConfig {
    #[serde(default = "default_brackets")]
    pub brackets: YearlyTables<BracketTable>,
    /// Flat rate on concessional contributions and untaxed super earnings
    #[serde(default = "default_concessional_rate")]
    pub concessional_rate: f64,
    /// Reduction of each marginal rate applied to super withdrawals
    #[serde(default = "default_super_offset")]
    pub super_offset: f64,
    /// Fraction of a long-held gain excluded from taxable income
    #[serde(default = "default_cgt_discount")]
    pub cgt_discount: f64,
}

fn default_brackets() -> YearlyTables<BracketTable> {
    YearlyTables::Fixed {
        table: BracketTable::australian_resident(),
    }
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            brackets: default_brackets(),
            concessional_rate: default_concessional_rate(),
            super_offset: default_super_offset(),
            cgt_discount: default_cgt_discount(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScenarioConfig::default();
        assert_eq!(config.num_weeks, 1820);
        assert_eq!(config.home_loan.annual_rate, 0.06);
        assert_eq!(config.car_loan.annual_rate, 0.07);
        assert_eq!(config.tax.concessional_rate, 0.15);
        assert_eq!(config.tax.super_offset, 0.30);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ScenarioConfig = serde_json::from_str(
            r#"{
                "num_weeks": 104,
                "super": { "opening_balance": 5000 },
                "tax": { "brackets": { "per_year": { "tables": [[{"threshold": 0, "rate": 0.1}]] } } }
            }"#,
        )
        .unwrap();
        assert_eq!(config.num_weeks, 104);
        assert_eq!(config.superannuation.opening_balance, 5000.0);
        assert_eq!(config.superannuation.entry_tax_rate, 0.15);
        assert_eq!(config.shares.annual_return, 0.10);
        assert_eq!(config.tax.cgt_discount, 0.5);
        assert!(matches!(config.tax.brackets, YearlyTables::PerYear { ref tables } if tables.len() == 1));
    }

    #[test]
    fn test_unordered_scenario_tables_are_rejected() {
        let tax = serde_json::from_str::<ScenarioConfig>(
            r#"{ "tax": { "brackets": { "fixed": { "table": [
                {"threshold": 45000, "rate": 0.325},
                {"threshold": 18200, "rate": 0.19}
            ] } } } }"#,
        );
        assert!(tax.is_err());

        let hecs = serde_json::from_str::<ScenarioConfig>(
            r#"{ "hecs": { "repayment": { "fixed": { "table": [
                {"threshold": 60000, "rate": 0.02},
                {"threshold": 0, "rate": 0.0}
            ] } } } }"#,
        );
        assert!(hecs.is_err());
    }
}
