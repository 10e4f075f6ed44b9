//! Transaction logs: the timestamped command streams that drive each simulator
//!
//! A log is a whitespace-separated, line-oriented text file, one command per
//! line, prefixed by its week:
//!
//! ```text
//! 0 BUY 100
//! 10 BUY 50
//! 20 SELL 120
//! ```
//!
//! Blank lines and bare `<week>` lines (idle markers) are accepted and
//! ignored. Weeks must be non-decreasing; same-week commands keep file order.

use serde::{Deserialize, Serialize};

use super::category::{Category, Week};
use crate::error::InputSequenceError;

/// Kind of superannuation contribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contribution {
    /// Pre-tax (salary sacrifice, employer) contribution
    Concessional,
    /// After-tax contribution, not taxed again on entry
    NonConcessional,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    Buy {
        amount: f64,
        contribution: Option<Contribution>,
    },
    /// `None` sells the entire holding
    Sell { amount: Option<f64> },
    Start {
        amount: f64,
        years: Option<u32>,
        balloon: f64,
    },
    Pay { amount: f64 },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Buy { .. } => "BUY",
            Command::Sell { .. } => "SELL",
            Command::Start { .. } => "START",
            Command::Pay { .. } => "PAY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub week: Week,
    pub command: Command,
}

impl Transaction {
    pub fn new(week: Week, command: Command) -> Self {
        Self { week, command }
    }

    pub fn buy(week: Week, amount: f64) -> Self {
        Self::new(
            week,
            Command::Buy {
                amount,
                contribution: None,
            },
        )
    }

    pub fn contribute(week: Week, amount: f64, kind: Contribution) -> Self {
        Self::new(
            week,
            Command::Buy {
                amount,
                contribution: Some(kind),
            },
        )
    }

    pub fn sell(week: Week, amount: f64) -> Self {
        Self::new(
            week,
            Command::Sell {
                amount: Some(amount),
            },
        )
    }

    pub fn pay(week: Week, amount: f64) -> Self {
        Self::new(week, Command::Pay { amount })
    }

    pub fn start_loan(week: Week, amount: f64, years: u32, balloon: f64) -> Self {
        Self::new(
            week,
            Command::Start {
                amount,
                years: Some(years),
                balloon,
            },
        )
    }
}

/// Ordered command stream for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionLog {
    category: Category,
    transactions: Vec<Transaction>,
}

impl TransactionLog {
    pub fn empty(category: Category) -> Self {
        Self {
            category,
            transactions: Vec::new(),
        }
    }

    /// Build a log from already-parsed transactions, rejecting decreasing weeks
    pub fn new(
        category: Category,
        transactions: Vec<Transaction>,
    ) -> Result<Self, InputSequenceError> {
        for (i, pair) in transactions.windows(2).enumerate() {
            if pair[1].week < pair[0].week {
                return Err(InputSequenceError::OutOfOrder {
                    category,
                    line: i + 2,
                    week: pair[1].week,
                    previous: pair[0].week,
                });
            }
        }
        Ok(Self {
            category,
            transactions,
        })
    }

    /// Parse the line-oriented log format for `category`
    pub fn parse(category: Category, text: &str) -> Result<Self, InputSequenceError> {
        let mut transactions = Vec::new();
        let mut previous: Option<Week> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let fields: Vec<&str> = raw.split_whitespace().collect();
            let Some((week_field, args)) = fields.split_first() else {
                continue;
            };
            let week = parse_week(category, line, week_field)?;
            if let Some(prev) = previous
                && week < prev
            {
                return Err(InputSequenceError::OutOfOrder {
                    category,
                    line,
                    week,
                    previous: prev,
                });
            }
            previous = Some(week);

            let Some((command, args)) = args.split_first() else {
                continue;
            };
            let command = parse_command(category, line, command, args)?;
            transactions.push(Transaction { week, command });
        }

        Ok(Self {
            category,
            transactions,
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn cursor(&self) -> WeekCursor<'_> {
        WeekCursor {
            transactions: &self.transactions,
            next: 0,
        }
    }
}

/// Walks a sorted log one week at a time
#[derive(Debug)]
pub struct WeekCursor<'a> {
    transactions: &'a [Transaction],
    next: usize,
}

impl<'a> WeekCursor<'a> {
    /// Transactions stamped with `week`, in log order.
    ///
    /// Weeks must be requested in increasing order.
    pub fn take_week(&mut self, week: Week) -> &'a [Transaction] {
        let start = self.next;
        while self
            .transactions
            .get(self.next)
            .is_some_and(|t| t.week <= week)
        {
            self.next += 1;
        }
        &self.transactions[start..self.next]
    }

    /// Transactions not yet handed out (scheduled past the horizon)
    pub fn remaining(&self) -> &'a [Transaction] {
        &self.transactions[self.next..]
    }
}

/// Plain per-week cash amounts (income, miscellaneous expenses)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashStream {
    category: Category,
    entries: Vec<(Week, f64)>,
}

impl CashStream {
    pub fn empty(category: Category) -> Self {
        Self {
            category,
            entries: Vec::new(),
        }
    }

    /// The same amount every week for `num_weeks` weeks
    pub fn constant(category: Category, amount: f64, num_weeks: usize) -> Self {
        Self {
            category,
            entries: (0..num_weeks).map(|week| (week, amount)).collect(),
        }
    }

    pub fn new(category: Category, entries: Vec<(Week, f64)>) -> Result<Self, InputSequenceError> {
        for (i, pair) in entries.windows(2).enumerate() {
            if pair[1].0 < pair[0].0 {
                return Err(InputSequenceError::OutOfOrder {
                    category,
                    line: i + 2,
                    week: pair[1].0,
                    previous: pair[0].0,
                });
            }
        }
        Ok(Self { category, entries })
    }

    /// Parse `week amount` lines; bare `week` lines carry no amount
    pub fn parse(category: Category, text: &str) -> Result<Self, InputSequenceError> {
        let mut entries = Vec::new();
        let mut previous: Option<Week> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let fields: Vec<&str> = raw.split_whitespace().collect();
            let Some((week_field, rest)) = fields.split_first() else {
                continue;
            };
            let week = parse_week(category, line, week_field)?;
            if let Some(prev) = previous
                && week < prev
            {
                return Err(InputSequenceError::OutOfOrder {
                    category,
                    line,
                    week,
                    previous: prev,
                });
            }
            previous = Some(week);

            match rest {
                [] => {}
                [amount] => {
                    let amount = parse_number(category, line, amount)?;
                    entries.push((week, amount));
                }
                _ => {
                    return Err(InputSequenceError::Malformed {
                        category,
                        line,
                        reason: format!("expected 'week amount', found {} fields", fields.len()),
                    });
                }
            }
        }

        Ok(Self { category, entries })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn entries(&self) -> &[(Week, f64)] {
        &self.entries
    }

    /// Dense per-week totals over the horizon; later entries are dropped
    pub fn weekly(&self, num_weeks: usize) -> Vec<f64> {
        let mut weekly = vec![0.0; num_weeks];
        for &(week, amount) in &self.entries {
            if let Some(slot) = weekly.get_mut(week) {
                *slot += amount;
            }
        }
        weekly
    }
}

fn parse_week(category: Category, line: usize, field: &str) -> Result<Week, InputSequenceError> {
    field
        .parse::<Week>()
        .map_err(|_| InputSequenceError::Malformed {
            category,
            line,
            reason: format!("invalid week '{field}'"),
        })
}

fn parse_number(category: Category, line: usize, field: &str) -> Result<f64, InputSequenceError> {
    match field.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputSequenceError::Malformed {
            category,
            line,
            reason: format!("invalid amount '{field}'"),
        }),
    }
}

fn parse_amount(category: Category, line: usize, field: &str) -> Result<f64, InputSequenceError> {
    let value = parse_number(category, line, field)?;
    if value < 0.0 {
        return Err(InputSequenceError::Malformed {
            category,
            line,
            reason: format!("negative amount '{field}'"),
        });
    }
    Ok(value)
}

fn parse_years(category: Category, line: usize, field: &str) -> Result<u32, InputSequenceError> {
    match field.parse::<u32>() {
        Ok(years) if years > 0 => Ok(years),
        _ => Err(InputSequenceError::Malformed {
            category,
            line,
            reason: format!("invalid loan term '{field}'"),
        }),
    }
}

fn parse_command(
    category: Category,
    line: usize,
    command: &str,
    args: &[&str],
) -> Result<Command, InputSequenceError> {
    let arity = |expected: &str| InputSequenceError::Malformed {
        category,
        line,
        reason: format!("{command} expects {expected}, found {} arguments", args.len()),
    };

    match (category, command) {
        (Category::Shares, "BUY") | (Category::Home, "BUY") => match args {
            [amount] => Ok(Command::Buy {
                amount: parse_amount(category, line, amount)?,
                contribution: None,
            }),
            _ => Err(arity("an amount")),
        },
        (Category::Super, "BUY") => match args {
            [kind, amount] => {
                let contribution = match *kind {
                    "CC" => Contribution::Concessional,
                    "NCC" => Contribution::NonConcessional,
                    other => {
                        return Err(InputSequenceError::Malformed {
                            category,
                            line,
                            reason: format!("unknown contribution kind '{other}'"),
                        });
                    }
                };
                Ok(Command::Buy {
                    amount: parse_amount(category, line, amount)?,
                    contribution: Some(contribution),
                })
            }
            _ => Err(arity("CC|NCC and an amount")),
        },
        (Category::Shares | Category::Super, "SELL") => match args {
            [amount] => Ok(Command::Sell {
                amount: Some(parse_amount(category, line, amount)?),
            }),
            _ => Err(arity("an amount")),
        },
        (Category::Home, "SELL") => match args {
            [] => Ok(Command::Sell { amount: None }),
            [amount] => Ok(Command::Sell {
                amount: Some(parse_amount(category, line, amount)?),
            }),
            _ => Err(arity("an optional amount")),
        },
        (Category::HomeLoan, "START") => match args {
            [amount, years] => Ok(Command::Start {
                amount: parse_amount(category, line, amount)?,
                years: Some(parse_years(category, line, years)?),
                balloon: 0.0,
            }),
            _ => Err(arity("an amount and a term in years")),
        },
        (Category::CarLoan, "START") => match args {
            [amount, balloon, years] => Ok(Command::Start {
                amount: parse_amount(category, line, amount)?,
                years: Some(parse_years(category, line, years)?),
                balloon: parse_amount(category, line, balloon)?,
            }),
            _ => Err(arity("an amount, a balloon and a term in years")),
        },
        (Category::Hecs, "START") => match args {
            [amount] => Ok(Command::Start {
                amount: parse_amount(category, line, amount)?,
                years: None,
                balloon: 0.0,
            }),
            _ => Err(arity("an amount")),
        },
        (Category::HomeLoan | Category::CarLoan | Category::Hecs, "PAY") => match args {
            [amount] => Ok(Command::Pay {
                amount: parse_amount(category, line, amount)?,
            }),
            _ => Err(arity("an amount")),
        },
        _ => Err(InputSequenceError::UnknownCommand {
            category,
            line,
            command: command.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shares_log() {
        let log = TransactionLog::parse(Category::Shares, "0 BUY 100\n1\n\n10 BUY 50\n20 SELL 120\n")
            .unwrap();
        assert_eq!(
            log.transactions(),
            &[
                Transaction::buy(0, 100.0),
                Transaction::buy(10, 50.0),
                Transaction::sell(20, 120.0),
            ]
        );
    }

    #[test]
    fn test_parse_super_contribution_kinds() {
        let log = TransactionLog::parse(Category::Super, "0 BUY CC 1000\n0 BUY NCC 500\n100 SELL 10")
            .unwrap();
        assert_eq!(
            log.transactions()[0],
            Transaction::contribute(0, 1000.0, Contribution::Concessional)
        );
        assert_eq!(
            log.transactions()[1],
            Transaction::contribute(0, 500.0, Contribution::NonConcessional)
        );
        assert_eq!(log.transactions()[2], Transaction::sell(100, 10.0));
    }

    #[test]
    fn test_parse_loan_starts() {
        let home = TransactionLog::parse(Category::HomeLoan, "0 START 300000 30\n52 PAY 1000").unwrap();
        assert_eq!(home.transactions()[0], Transaction::start_loan(0, 300_000.0, 30, 0.0));
        assert_eq!(home.transactions()[1], Transaction::pay(52, 1000.0));

        let car = TransactionLog::parse(Category::CarLoan, "3 START 100 20 5").unwrap();
        assert_eq!(car.transactions()[0], Transaction::start_loan(3, 100.0, 5, 20.0));

        let hecs = TransactionLog::parse(Category::Hecs, "0 START 30000").unwrap();
        assert!(matches!(
            hecs.transactions()[0].command,
            Command::Start { years: None, .. }
        ));
    }

    #[test]
    fn test_parse_home_sell_all() {
        let log = TransactionLog::parse(Category::Home, "0 BUY 500000\n520 SELL").unwrap();
        assert_eq!(log.transactions()[1].command, Command::Sell { amount: None });
    }

    #[test]
    fn test_parse_rejects_out_of_order() {
        let err = TransactionLog::parse(Category::Shares, "5 BUY 1\n4 BUY 1").unwrap_err();
        assert_eq!(
            err,
            InputSequenceError::OutOfOrder {
                category: Category::Shares,
                line: 2,
                week: 4,
                previous: 5,
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_command() {
        let err = TransactionLog::parse(Category::Shares, "0 START 100 5").unwrap_err();
        assert!(matches!(err, InputSequenceError::UnknownCommand { line: 1, .. }));
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        for text in ["x BUY 1", "0 BUY", "0 BUY abc", "0 BUY -5", "0 BUY 1 2"] {
            let err = TransactionLog::parse(Category::Shares, text).unwrap_err();
            assert!(
                matches!(err, InputSequenceError::Malformed { .. }),
                "{text:?} gave {err:?}"
            );
        }
        let err = TransactionLog::parse(Category::HomeLoan, "0 START 100 0").unwrap_err();
        assert!(matches!(err, InputSequenceError::Malformed { .. }));
    }

    #[test]
    fn test_new_rejects_decreasing_weeks() {
        let err = TransactionLog::new(
            Category::Shares,
            vec![Transaction::buy(3, 1.0), Transaction::buy(2, 1.0)],
        )
        .unwrap_err();
        assert!(matches!(err, InputSequenceError::OutOfOrder { week: 2, .. }));
    }

    #[test]
    fn test_cursor_groups_by_week() {
        let log = TransactionLog::new(
            Category::Shares,
            vec![
                Transaction::buy(0, 1.0),
                Transaction::buy(0, 2.0),
                Transaction::buy(2, 3.0),
                Transaction::buy(9, 4.0),
            ],
        )
        .unwrap();
        let mut cursor = log.cursor();
        assert_eq!(cursor.take_week(0).len(), 2);
        assert!(cursor.take_week(1).is_empty());
        assert_eq!(cursor.take_week(2)[0].command, log.transactions()[2].command);
        assert_eq!(cursor.remaining().len(), 1);
    }

    #[test]
    fn test_cash_stream_parse_and_densify() {
        let stream = CashStream::parse(Category::Income, "0 2000\n1\n1 500\n1 250\n200 9").unwrap();
        let weekly = stream.weekly(3);
        assert_eq!(weekly, vec![2000.0, 750.0, 0.0]);
    }

    #[test]
    fn test_cash_stream_rejects_garbage() {
        assert!(CashStream::parse(Category::Income, "0 abc").is_err());
        assert!(CashStream::parse(Category::Income, "0 1 2").is_err());
        assert!(CashStream::parse(Category::Income, "3 1\n2 1").is_err());
    }
}
