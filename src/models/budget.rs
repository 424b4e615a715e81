use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate};
use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    #[display(fmt = "weekly")]
    Weekly,
    #[default]
    #[display(fmt = "monthly")]
    Monthly,
    #[display(fmt = "yearly")]
    Yearly,
}

impl BudgetPeriod {
    /// Whether `date` falls in the period that contains `today`.
    /// Weeks are ISO weeks.
    pub fn contains(&self, today: NaiveDate, date: NaiveDate) -> bool {
        match self {
            BudgetPeriod::Weekly => today.iso_week() == date.iso_week(),
            BudgetPeriod::Monthly => today.year() == date.year() && today.month() == date.month(),
            BudgetPeriod::Yearly => today.year() == date.year(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub category: String,
    /// Spending limit for one period.
    pub amount: BigDecimal,
    #[serde(default)]
    pub period: BudgetPeriod,
    /// Cached; recomputed from transactions after every ledger change.
    #[serde(default)]
    pub spent: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetDraft {
    pub category: String,
    pub amount: BigDecimal,
    #[serde(default)]
    pub period: BudgetPeriod,
}

impl BudgetDraft {
    pub fn into_budget(self, id: i64) -> Budget {
        Budget {
            id,
            category: self.category.trim().to_string(),
            amount: self.amount,
            period: self.period,
            spent: BigDecimal::default(),
        }
    }
}
