//! Reporting period and statement order definitions.
//!
//! This module defines [`PeriodType`] for fundamental data periods and
//! [`StatementOrder`], the tag every statement sequence carries so that growth
//! figures are never computed against the wrong period.

use serde::{Deserialize, Serialize};

/// Period type for fundamental financial data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodType {
    /// Annual reporting period.
    #[default]
    Annual,
    /// Quarterly reporting period.
    Quarterly,
}

impl PeriodType {
    /// Number of reporting periods in one year.
    #[must_use]
    pub const fn periods_per_year(&self) -> usize {
        match self {
            Self::Annual => 1,
            Self::Quarterly => 4,
        }
    }
}

/// Order in which a statement sequence is stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementOrder {
    /// Most recent period first (the order most APIs return).
    #[default]
    NewestFirst,
    /// Oldest period first.
    OldestFirst,
}

impl StatementOrder {
    /// Returns true if index 0 holds the most recent period.
    #[must_use]
    pub const fn is_newest_first(&self) -> bool {
        matches!(self, Self::NewestFirst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periods_per_year() {
        assert_eq!(PeriodType::Annual.periods_per_year(), 1);
        assert_eq!(PeriodType::Quarterly.periods_per_year(), 4);
        assert_eq!(PeriodType::default().periods_per_year(), 1);
    }
}
