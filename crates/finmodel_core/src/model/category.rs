//! Simulation categories and the week index type

use std::fmt;

use serde::{Deserialize, Serialize};

/// Zero-based week index into the simulation horizon
pub type Week = usize;

/// One independently simulated slice of the household's finances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Shares,
    Super,
    Home,
    HomeLoan,
    CarLoan,
    Hecs,
    Income,
    Expenses,
}

impl Category {
    /// Categories driven by a command log (as opposed to a plain cash stream)
    pub const SIMULATED: [Category; 6] = [
        Category::Shares,
        Category::Super,
        Category::Home,
        Category::HomeLoan,
        Category::CarLoan,
        Category::Hecs,
    ];

    /// File stem used for this category's input log and output ledgers
    pub fn stem(self) -> &'static str {
        match self {
            Category::Shares => "shares",
            Category::Super => "super",
            Category::Home => "home",
            Category::HomeLoan => "home_loan",
            Category::CarLoan => "car_loan",
            Category::Hecs => "hecs",
            Category::Income => "income",
            Category::Expenses => "misc",
        }
    }

    /// Liabilities count negatively towards net worth
    pub fn is_liability(self) -> bool {
        matches!(self, Category::HomeLoan | Category::CarLoan | Category::Hecs)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Shares => "shares",
            Category::Super => "super",
            Category::Home => "home",
            Category::HomeLoan => "home loan",
            Category::CarLoan => "car loan",
            Category::Hecs => "hecs",
            Category::Income => "income",
            Category::Expenses => "expenses",
        };
        f.write_str(name)
    }
}
