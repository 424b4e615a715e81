use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate};
use derive_more::Display;
use num_traits::{Signed, ToPrimitive, Zero};
use serde::Serialize;

use crate::models::{Budget, BudgetPeriod, Transaction, TransactionType};

pub const RECENT_LIMIT: usize = 5;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    #[display(fmt = "safe")]
    Safe,
    #[display(fmt = "warning")]
    Warning,
    #[display(fmt = "danger")]
    Danger,
}

impl BudgetStatus {
    /// At or above 100% of the limit is danger, at or above 80% is warning.
    pub fn from_usage(spent: &BigDecimal, limit: &BigDecimal) -> Self {
        if !limit.is_positive() {
            return if spent.is_positive() {
                BudgetStatus::Danger
            } else {
                BudgetStatus::Safe
            };
        }

        let used = spent * &BigDecimal::from(100);
        if used >= limit * &BigDecimal::from(100) {
            BudgetStatus::Danger
        } else if used >= limit * &BigDecimal::from(80) {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Safe
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    pub budget_id: i64,
    pub category: String,
    pub period: BudgetPeriod,
    pub limit: BigDecimal,
    pub spent: BigDecimal,
    pub remaining: BigDecimal,
    /// Rounded to one decimal place.
    pub percentage: f64,
    pub status: BudgetStatus,
}

impl From<&Budget> for BudgetProgress {
    fn from(budget: &Budget) -> Self {
        let percentage = if budget.amount.is_positive() {
            let ratio = &budget.spent * &BigDecimal::from(100) / &budget.amount;
            round_one(ratio.to_f64().unwrap_or(0.0))
        } else {
            0.0
        };

        BudgetProgress {
            budget_id: budget.id,
            category: budget.category.clone(),
            period: budget.period,
            limit: budget.amount.clone(),
            spent: budget.spent.clone(),
            remaining: &budget.amount - &budget.spent,
            percentage,
            status: BudgetStatus::from_usage(&budget.spent, &budget.amount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_income: BigDecimal,
    /// Absolute value.
    pub total_expenses: BigDecimal,
    pub balance: BigDecimal,
    pub savings_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotals {
    pub month: u32,
    pub label: String,
    pub income: BigDecimal,
    pub expenses: BigDecimal,
}

/// Everything the dashboard renders, derived from one ledger snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub transactions: Vec<Transaction>,
    pub recent: Vec<Transaction>,
    pub summary: Summary,
    pub budgets: Vec<BudgetProgress>,
    pub categories: Vec<CategoryTotal>,
    pub monthly: Vec<MonthlyTotals>,
}

pub fn build_view(transactions: &[Transaction], budgets: &[Budget], today: NaiveDate) -> DashboardView {
    let sorted = sorted_by_date_desc(transactions);
    let recent = sorted.iter().take(RECENT_LIMIT).cloned().collect();

    DashboardView {
        recent,
        summary: summarize(transactions),
        budgets: budgets.iter().map(BudgetProgress::from).collect(),
        categories: expenses_by_category(transactions),
        monthly: monthly_totals(transactions, today.year()),
        transactions: sorted,
    }
}

/// Newest first; transactions on the same day keep their ledger order.
pub fn sorted_by_date_desc(transactions: &[Transaction]) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut income = BigDecimal::zero();
    let mut expenses = BigDecimal::zero();

    for tx in transactions {
        match tx.kind {
            TransactionType::Income => income += tx.amount.abs(),
            TransactionType::Expense => expenses += tx.amount.abs(),
        }
    }

    let balance = &income - &expenses;
    let savings_rate = if income.is_positive() {
        let ratio = &balance * &BigDecimal::from(100) / &income;
        round_one(ratio.to_f64().unwrap_or(0.0))
    } else {
        0.0
    };

    Summary {
        total_income: income,
        total_expenses: expenses,
        balance,
        savings_rate,
    }
}

/// Expense totals per category, largest first.
pub fn expenses_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, BigDecimal> = BTreeMap::new();
    for tx in transactions.iter().filter(|tx| tx.is_expense()) {
        *totals.entry(tx.category.as_str()).or_default() += tx.amount.abs();
    }

    let mut categories: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_string(),
            amount,
        })
        .collect();
    categories.sort_by(|a, b| b.amount.cmp(&a.amount));
    categories
}

/// Twelve buckets, January to December of `year`.
pub fn monthly_totals(transactions: &[Transaction], year: i32) -> Vec<MonthlyTotals> {
    let mut months: Vec<MonthlyTotals> = MONTH_LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| MonthlyTotals {
            month: i as u32 + 1,
            label: label.to_string(),
            income: BigDecimal::zero(),
            expenses: BigDecimal::zero(),
        })
        .collect();

    for tx in transactions.iter().filter(|tx| tx.date.year() == year) {
        let bucket = &mut months[tx.date.month0() as usize];
        match tx.kind {
            TransactionType::Income => bucket.income += tx.amount.abs(),
            TransactionType::Expense => bucket.expenses += tx.amount.abs(),
        }
    }

    months
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
