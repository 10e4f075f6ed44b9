//! Week arithmetic and rate conversion shared by every simulator.
//!
//! All annual rates are fractions (`0.10` for 10%). Conversions compound
//! rather than divide, so 52 weekly steps reproduce the annual rate exactly.

use jiff::ToSpan;
use jiff::civil::Date;

use crate::model::Week;

pub const WEEKS_PER_YEAR: usize = 52;

/// Absolute tolerance for "is this amount zero" checks on dollar amounts.
pub const AMOUNT_EPSILON: f64 = 1e-6;

/// Convert an annual rate to the equivalent weekly compounding rate
#[must_use]
#[inline]
pub fn weekly_rate(annual_rate: f64) -> f64 {
    ((1.0 + annual_rate).ln() / WEEKS_PER_YEAR as f64).exp_m1()
}

/// Fiscal year a week belongs to (year 0 is weeks 0..52)
#[must_use]
#[inline]
pub fn fiscal_year(week: Week) -> usize {
    week / WEEKS_PER_YEAR
}

/// First week of a fiscal year
#[must_use]
#[inline]
pub fn year_start(year: usize) -> Week {
    year * WEEKS_PER_YEAR
}

/// Week at which a fiscal year's tax is settled: its last week, or the last
/// simulated week when the horizon ends part-way through the year.
#[must_use]
pub fn settlement_week(year: usize, num_weeks: usize) -> Week {
    let last = year_start(year) + WEEKS_PER_YEAR - 1;
    last.min(num_weeks.saturating_sub(1))
}

/// Optional calendar anchor for week indices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeline {
    pub start_date: Option<Date>,
    pub num_weeks: usize,
}

impl Timeline {
    pub fn new(start_date: Option<Date>, num_weeks: usize) -> Self {
        Self {
            start_date,
            num_weeks,
        }
    }

    /// Calendar date of the first day of `week`, when the timeline is
    /// anchored and `week` lies inside the horizon
    pub fn date_of(&self, week: Week) -> Option<Date> {
        if week >= self.num_weeks {
            return None;
        }
        let start = self.start_date?;
        start.checked_add(((week * 7) as i64).days()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_rate_compounds_to_annual() {
        for annual in [-0.5, -0.02, 0.0, 0.03, 0.06, 0.10, 0.25, 1.5] {
            let weekly = weekly_rate(annual);
            let compounded = (1.0 + weekly).powi(WEEKS_PER_YEAR as i32) - 1.0;
            assert!(
                (compounded - annual).abs() < 1e-12,
                "annual {annual}: compounded back to {compounded}"
            );
        }
    }

    #[test]
    fn test_weekly_rate_is_not_simple_division() {
        let weekly = weekly_rate(0.10);
        assert!(weekly < 0.10 / 52.0);
        assert!((weekly - 0.001834569).abs() < 1e-8);
    }

    #[test]
    fn test_fiscal_year_boundaries() {
        assert_eq!(fiscal_year(0), 0);
        assert_eq!(fiscal_year(51), 0);
        assert_eq!(fiscal_year(52), 1);
    }

    #[test]
    fn test_settlement_week_clamps_to_horizon() {
        assert_eq!(settlement_week(0, 104), 51);
        assert_eq!(settlement_week(1, 104), 103);
        assert_eq!(settlement_week(1, 60), 59);
    }

    #[test]
    fn test_timeline_dates() {
        let timeline = Timeline::new(Some(jiff::civil::date(2025, 7, 1)), 104);
        assert_eq!(timeline.date_of(0), Some(jiff::civil::date(2025, 7, 1)));
        assert_eq!(timeline.date_of(1), Some(jiff::civil::date(2025, 7, 8)));
        assert_eq!(timeline.date_of(52), Some(jiff::civil::date(2026, 6, 30)));
        assert_eq!(timeline.date_of(104), None);
        assert_eq!(Timeline::new(None, 10).date_of(3), None);
    }
}
