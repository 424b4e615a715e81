use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use derive_more::Display;
use num_traits::Signed;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[display(fmt = "income")]
    Income,
    #[display(fmt = "expense")]
    Expense,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    /// Negative for expenses, positive for income.
    pub amount: BigDecimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

/// User input for a new or edited transaction. `amount` may be entered
/// without a sign; `kind` decides it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub amount: BigDecimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TransactionDraft {
    pub fn signed_amount(&self) -> BigDecimal {
        let magnitude = self.amount.abs();
        match self.kind {
            TransactionType::Income => magnitude,
            TransactionType::Expense => -magnitude,
        }
    }

    pub fn into_transaction(self, id: i64) -> Transaction {
        let amount = self.signed_amount();
        let notes = self.notes.filter(|n| !n.trim().is_empty());

        Transaction {
            id,
            date: self.date,
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            amount,
            kind: self.kind,
            notes,
        }
    }
}
