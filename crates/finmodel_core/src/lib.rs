//! Weekly household finance simulation library
//!
//! This crate evolves a household's finances one week at a time across
//! independently simulated categories, then reconciles tax once per fiscal
//! year. It supports:
//! - FIFO cost-basis lots for shares and superannuation, with CGT discount
//!   eligibility by holding period
//! - Home equity, amortizing home and car loans (with balloon payments) and
//!   income-contingent HECS debt
//! - Progressive bracket tax with concessional super treatment
//! - A merged running cash balance that must never go negative
//!
//! # Example
//!
//! ```ignore
//! use finmodel_core::{ScenarioConfig, ScenarioInputs, simulate};
//! use finmodel_core::model::{CashStream, Category, TransactionLog};
//!
//! let config = ScenarioConfig::new().with_weeks(104).with_starting_cash(5_000.0);
//! let inputs = ScenarioInputs::new()
//!     .with_log(TransactionLog::parse(Category::Shares, "0 BUY 1000\n80 SELL 500")?)
//!     .with_income(CashStream::constant(Category::Income, 1_500.0, 104));
//!
//! let result = simulate(&config, &inputs)?;
//! println!("final net worth {:.2}", result.final_net_worth());
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod ledger;
pub mod rates;
pub mod simulation;
pub mod simulators;
pub mod taxes;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::ScenarioConfig;
pub use error::{Result, SimulationError};
pub use simulation::{ScenarioInputs, simulate};
