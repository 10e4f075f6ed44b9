//! Loading scenario files

use std::path::Path;

use color_eyre::eyre::{Context, Result};
use finmodel_core::ScenarioConfig;

/// Parse a scenario from YAML
pub fn from_yaml(yaml: &str) -> Result<ScenarioConfig, serde_saphyr::Error> {
    serde_saphyr::from_str(yaml)
}

/// Load the scenario at `path`, or the built-in defaults when none is given
pub fn load_scenario(path: Option<&Path>) -> Result<ScenarioConfig> {
    let Some(path) = path else {
        tracing::info!("No scenario file given, using defaults");
        return Ok(ScenarioConfig::default());
    };

    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read scenario {}", path.display()))?;
    let config = from_yaml(&content)
        .wrap_err_with(|| format!("Failed to parse scenario {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        num_weeks = config.num_weeks,
        "Loaded scenario"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_partial_scenario_keeps_defaults() {
        let yaml = "num_weeks: 520\nstarting_cash: 25000\nshares:\n  annual_return: 0.07\n";
        let config = from_yaml(yaml).unwrap();

        assert_eq!(config.num_weeks, 520);
        assert_eq!(config.starting_cash, 25_000.0);
        assert_eq!(config.shares.annual_return, 0.07);

        let defaults = ScenarioConfig::default();
        assert_eq!(config.superannuation, defaults.superannuation);
        assert_eq!(config.home_loan, defaults.home_loan);
        assert_eq!(config.tax, defaults.tax);
    }

    #[test]
    fn test_super_section_and_start_date() {
        let yaml = "start_date: 2024-07-01\nsuper:\n  entry_tax_rate: 0.1\n  opening_balance: 5000\n";
        let config = from_yaml(yaml).unwrap();

        assert_eq!(config.superannuation.entry_tax_rate, 0.1);
        assert_eq!(config.superannuation.opening_balance, 5_000.0);
        assert_eq!(config.start_date, Some(jiff::civil::date(2024, 7, 1)));
    }

    #[test]
    fn test_unordered_brackets_fail_to_parse() {
        let yaml = "tax:\n  brackets:\n    fixed:\n      table:\n        - { threshold: 45000, rate: 0.325 }\n        - { threshold: 18200, rate: 0.19 }\n";
        assert!(from_yaml(yaml).is_err());
    }

    #[test]
    fn test_load_scenario_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scenario.yaml");
        fs::write(&path, "num_weeks: 104\nhome:\n  annual_growth: 0.03\n").unwrap();

        let config = load_scenario(Some(&path)).unwrap();
        assert_eq!(config.num_weeks, 104);
        assert_eq!(config.home.annual_growth, 0.03);
    }

    #[test]
    fn test_load_scenario_defaults_and_errors() {
        assert_eq!(load_scenario(None).unwrap(), ScenarioConfig::default());

        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.yaml");
        let err = load_scenario(Some(&missing)).unwrap_err();
        assert!(format!("{err}").contains("Failed to read scenario"));
    }
}
