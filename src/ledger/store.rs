use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{Budget, Transaction};
use crate::storage::{Storage, StorageError};

/// Reads and writes one user's ledger arrays. Keys are namespaced by user
/// id so several accounts can share a storage backend.
#[derive(Debug, Clone)]
pub struct LedgerStore<S: Storage> {
    storage: S,
    user_id: i32,
}

impl<S: Storage> LedgerStore<S> {
    pub fn new(storage: S, user_id: i32) -> Self {
        Self { storage, user_id }
    }

    pub fn user_id(&self) -> i32 {
        self.user_id
    }

    pub fn transactions_key(&self) -> String {
        format!("spendsavvy_transactions_{}", self.user_id)
    }

    pub fn budgets_key(&self) -> String {
        format!("spendsavvy_budgets_{}", self.user_id)
    }

    pub fn load_transactions(&self) -> Result<Vec<Transaction>, StorageError> {
        self.load(&self.transactions_key())
    }

    pub fn save_transactions(&self, transactions: &[Transaction]) -> Result<(), StorageError> {
        self.save(&self.transactions_key(), transactions)
    }

    pub fn load_budgets(&self) -> Result<Vec<Budget>, StorageError> {
        self.load(&self.budgets_key())
    }

    pub fn save_budgets(&self, budgets: &[Budget]) -> Result<(), StorageError> {
        self.save(&self.budgets_key(), budgets)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StorageError> {
        match self.storage.get_item(key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StorageError> {
        self.storage.set_item(key, &serde_json::to_string(items)?)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{BudgetPeriod, TransactionType};
    use crate::storage::MemoryStorage;

    fn transaction(id: i64) -> Transaction {
        Transaction {
            id,
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            description: "Coffee".to_string(),
            category: "Food & Dining".to_string(),
            amount: BigDecimal::from_str("-3.50").unwrap(),
            kind: TransactionType::Expense,
            notes: None,
        }
    }

    #[test]
    fn test_missing_keys_load_empty() {
        let store = LedgerStore::new(MemoryStorage::new(), 1);
        assert!(store.load_transactions().unwrap().is_empty());
        assert!(store.load_budgets().unwrap().is_empty());
    }

    #[test]
    fn test_users_do_not_see_each_other() {
        let storage = MemoryStorage::new();
        let alice = LedgerStore::new(storage.clone(), 1);
        let bob = LedgerStore::new(storage.clone(), 2);

        alice.save_transactions(&[transaction(1)]).unwrap();

        assert_eq!(alice.load_transactions().unwrap(), vec![transaction(1)]);
        assert!(bob.load_transactions().unwrap().is_empty());
        assert!(storage.get_item("spendsavvy_transactions_1").unwrap().is_some());
    }

    #[test]
    fn test_budgets_round_trip_through_storage() {
        let store = LedgerStore::new(MemoryStorage::new(), 9);
        let budget = Budget {
            id: 1,
            category: "Shopping".to_string(),
            amount: BigDecimal::from(300),
            period: BudgetPeriod::Weekly,
            spent: BigDecimal::from(12),
        };

        store.save_budgets(&[budget.clone()]).unwrap();
        assert_eq!(store.load_budgets().unwrap(), vec![budget]);
    }
}
