//! Error types for the simulation pipeline

use std::fmt;

use crate::model::{Category, Week};

/// Errors raised while ingesting a transaction log or a receipt stream
#[derive(Debug, Clone, PartialEq)]
pub enum InputSequenceError {
    /// A timestamp is earlier than the one before it
    OutOfOrder {
        category: Category,
        line: usize,
        week: Week,
        previous: Week,
    },
    /// A line could not be parsed
    Malformed {
        category: Category,
        line: usize,
        reason: String,
    },
    /// The command word is not part of this category's vocabulary
    UnknownCommand {
        category: Category,
        line: usize,
        command: String,
    },
    /// A well-formed command reached a simulator that cannot apply it
    UnsupportedCommand {
        category: Category,
        week: Week,
        command: &'static str,
    },
    /// A loan START that cannot be honoured
    InvalidLoan {
        category: Category,
        week: Week,
        reason: &'static str,
    },
}

impl fmt::Display for InputSequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSequenceError::OutOfOrder {
                category,
                line,
                week,
                previous,
            } => write!(
                f,
                "{category} log line {line}: week {week} comes after week {previous}"
            ),
            InputSequenceError::Malformed {
                category,
                line,
                reason,
            } => write!(f, "{category} log line {line}: {reason}"),
            InputSequenceError::UnknownCommand {
                category,
                line,
                command,
            } => write!(f, "{category} log line {line}: unknown command '{command}'"),
            InputSequenceError::UnsupportedCommand {
                category,
                week,
                command,
            } => write!(f, "{category} cannot apply {command} (week {week})"),
            InputSequenceError::InvalidLoan {
                category,
                week,
                reason,
            } => write!(f, "{category} START at week {week}: {reason}"),
        }
    }
}

impl std::error::Error for InputSequenceError {}

/// A SELL or PAY asked for more than the holder currently has
#[derive(Debug, Clone, PartialEq)]
pub struct InsufficientBalanceError {
    pub category: Category,
    pub week: Week,
    pub requested: f64,
    pub available: f64,
}

impl fmt::Display for InsufficientBalanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} week {}: requested {:.2} but only {:.2} is available",
            self.category, self.week, self.requested, self.available
        )
    }
}

impl std::error::Error for InsufficientBalanceError {}

/// A fiscal year has no entry in a yearly table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingBracketTableError {
    /// Which table was consulted ("income tax", "hecs repayment")
    pub table: &'static str,
    pub year: usize,
}

impl fmt::Display for MissingBracketTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no {} table for fiscal year {}", self.table, self.year)
    }
}

impl std::error::Error for MissingBracketTableError {}

/// A bracket or repayment table whose thresholds do not strictly ascend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnorderedThresholdsError {
    /// Position of the offending entry
    pub index: usize,
    pub threshold: f64,
    pub previous: f64,
}

impl fmt::Display for UnorderedThresholdsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "table thresholds must strictly ascend: entry {} ({}) follows {}",
            self.index, self.threshold, self.previous
        )
    }
}

impl std::error::Error for UnorderedThresholdsError {}

/// The merged weekly cash balance went below zero
#[derive(Debug, Clone, PartialEq)]
pub struct NegativeBalanceInvariantViolation {
    /// First week at which the balance is negative
    pub week: Week,
    pub balance: f64,
}

impl fmt::Display for NegativeBalanceInvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cash balance is negative ({:.2}) at week {}; the scenario is not fundable",
            self.balance, self.week
        )
    }
}

impl std::error::Error for NegativeBalanceInvariantViolation {}

#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    InputSequence(InputSequenceError),
    InsufficientBalance(InsufficientBalanceError),
    MissingBracketTable(MissingBracketTableError),
    NegativeBalance(NegativeBalanceInvariantViolation),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InputSequence(e) => write!(f, "{e}"),
            SimulationError::InsufficientBalance(e) => write!(f, "{e}"),
            SimulationError::MissingBracketTable(e) => write!(f, "{e}"),
            SimulationError::NegativeBalance(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::InputSequence(e) => Some(e),
            SimulationError::InsufficientBalance(e) => Some(e),
            SimulationError::MissingBracketTable(e) => Some(e),
            SimulationError::NegativeBalance(e) => Some(e),
        }
    }
}

impl From<InputSequenceError> for SimulationError {
    fn from(err: InputSequenceError) -> Self {
        SimulationError::InputSequence(err)
    }
}

impl From<InsufficientBalanceError> for SimulationError {
    fn from(err: InsufficientBalanceError) -> Self {
        SimulationError::InsufficientBalance(err)
    }
}

impl From<MissingBracketTableError> for SimulationError {
    fn from(err: MissingBracketTableError) -> Self {
        SimulationError::MissingBracketTable(err)
    }
}

impl From<NegativeBalanceInvariantViolation> for SimulationError {
    fn from(err: NegativeBalanceInvariantViolation) -> Self {
        SimulationError::NegativeBalance(err)
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
