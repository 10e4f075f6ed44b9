//! Reading a directory of transaction logs

use std::path::Path;

use color_eyre::eyre::{Context, Result};
use finmodel_core::ScenarioInputs;
use finmodel_core::model::{CashStream, Category, TransactionLog};

use crate::util::read_optional;

fn read_category(dir: &Path, category: Category) -> Result<Option<String>> {
    let path = dir.join(format!("{}.txt", category.stem()));
    let content = read_optional(&path)
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    if content.is_none() {
        tracing::debug!(category = %category, path = %path.display(), "No input file, assuming no activity");
    }
    Ok(content)
}

/// Load `<stem>.txt` for every category found in `dir`.
///
/// A missing file means the category sees no activity.
pub fn load_inputs(dir: &Path) -> Result<ScenarioInputs> {
    let mut inputs = ScenarioInputs::new();

    for category in Category::SIMULATED {
        if let Some(text) = read_category(dir, category)? {
            let log = TransactionLog::parse(category, &text)
                .wrap_err_with(|| format!("Invalid {category} log in {}", dir.display()))?;
            tracing::debug!(category = %category, transactions = log.transactions().len(), "Loaded log");
            inputs = inputs.with_log(log);
        }
    }

    if let Some(text) = read_category(dir, Category::Income)? {
        let income = CashStream::parse(Category::Income, &text)
            .wrap_err_with(|| format!("Invalid income stream in {}", dir.display()))?;
        inputs = inputs.with_income(income);
    }
    if let Some(text) = read_category(dir, Category::Expenses)? {
        let expenses = CashStream::parse(Category::Expenses, &text)
            .wrap_err_with(|| format!("Invalid expense stream in {}", dir.display()))?;
        inputs = inputs.with_expenses(expenses);
    }

    Ok(inputs)
}
