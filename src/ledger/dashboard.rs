//! State container for one user's dashboard.
//!
//! Owns the transactions and budgets, writes them through to a
//! [`LedgerStore`] after every change, recomputes budget spend and pushes a
//! fresh [`DashboardView`] to every subscriber.

use bigdecimal::BigDecimal;
use chrono::{Local, NaiveDate};
use num_traits::{Signed, Zero};

use super::store::LedgerStore;
use super::view::{build_view, DashboardView};
use super::LedgerError;
use crate::models::{Budget, BudgetDraft, Transaction, TransactionDraft};
use crate::storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Result of an operation that asked the user to confirm.
#[derive(Debug, Clone, PartialEq)]
pub enum Change<T> {
    Applied(T),
    Cancelled,
}

impl<T> Change<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Change::Applied(_))
    }
}

type Subscriber = Box<dyn FnMut(&DashboardView)>;

pub struct Dashboard<S: Storage> {
    store: LedgerStore<S>,
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
    clock: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().unwrap_or(0) + 1
}

impl<S: Storage> Dashboard<S> {
    pub fn open(store: LedgerStore<S>) -> Result<Self, LedgerError> {
        Self::open_with_clock(store, local_today)
    }

    /// Like [`Dashboard::open`] with a fixed notion of "today".
    pub fn open_with_clock(
        store: LedgerStore<S>,
        clock: fn() -> NaiveDate,
    ) -> Result<Self, LedgerError> {
        let transactions = store.load_transactions()?;
        let budgets = store.load_budgets()?;

        let mut dashboard = Self {
            store,
            transactions,
            budgets,
            subscribers: Vec::new(),
            next_subscription: 0,
            clock,
        };
        dashboard.recompute_budget_spent();

        tracing::debug!(
            user_id = dashboard.store.user_id(),
            transactions = dashboard.transactions.len(),
            budgets = dashboard.budgets.len(),
            "ledger loaded"
        );
        Ok(dashboard)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    pub fn view(&self) -> DashboardView {
        build_view(&self.transactions, &self.budgets, self.today())
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&DashboardView) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn create_transaction(&mut self, draft: TransactionDraft) -> Result<Transaction, LedgerError> {
        validate_transaction(&draft)?;

        let id = next_id(self.transactions.iter().map(|t| t.id));
        let transaction = draft.into_transaction(id);
        let mut transactions = self.transactions.clone();
        transactions.push(transaction.clone());

        self.commit(transactions, self.budgets.clone())?;
        Ok(transaction)
    }

    pub fn update_transaction(
        &mut self,
        id: i64,
        draft: TransactionDraft,
    ) -> Result<Transaction, LedgerError> {
        validate_transaction(&draft)?;

        let index = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or(LedgerError::NotFound { kind: "transaction", id })?;
        let updated = draft.into_transaction(id);
        let mut transactions = self.transactions.clone();
        transactions[index] = updated.clone();

        self.commit(transactions, self.budgets.clone())?;
        Ok(updated)
    }

    /// Removes the transaction with `id` if `confirm` agrees. The remaining
    /// transactions keep their order.
    pub fn delete_transaction(
        &mut self,
        id: i64,
        confirm: impl FnOnce(&Transaction) -> bool,
    ) -> Result<Change<Transaction>, LedgerError> {
        let index = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or(LedgerError::NotFound { kind: "transaction", id })?;

        if !confirm(&self.transactions[index]) {
            return Ok(Change::Cancelled);
        }

        let mut transactions = self.transactions.clone();
        let removed = transactions.remove(index);
        self.commit(transactions, self.budgets.clone())?;
        Ok(Change::Applied(removed))
    }

    /// Adds a budget. When one already exists for the same category and
    /// period, `confirm` decides whether its limit is replaced.
    pub fn create_budget(
        &mut self,
        draft: BudgetDraft,
        confirm: impl FnOnce(&Budget) -> bool,
    ) -> Result<Change<Budget>, LedgerError> {
        validate_budget(&draft)?;

        let category = draft.category.trim();
        let existing = self
            .budgets
            .iter()
            .position(|b| b.period == draft.period && b.category.eq_ignore_ascii_case(category));

        let mut budgets = self.budgets.clone();
        let index = match existing {
            Some(index) => {
                if !confirm(&self.budgets[index]) {
                    return Ok(Change::Cancelled);
                }
                budgets[index].amount = draft.amount;
                index
            }
            None => {
                let id = next_id(self.budgets.iter().map(|b| b.id));
                budgets.push(draft.into_budget(id));
                budgets.len() - 1
            }
        };

        self.commit(self.transactions.clone(), budgets)?;
        Ok(Change::Applied(self.budgets[index].clone()))
    }

    pub fn update_budget(&mut self, id: i64, draft: BudgetDraft) -> Result<Budget, LedgerError> {
        validate_budget(&draft)?;

        let index = self
            .budgets
            .iter()
            .position(|b| b.id == id)
            .ok_or(LedgerError::NotFound { kind: "budget", id })?;
        let mut budgets = self.budgets.clone();
        budgets[index] = draft.into_budget(id);

        self.commit(self.transactions.clone(), budgets)?;
        Ok(self.budgets[index].clone())
    }

    pub fn delete_budget(
        &mut self,
        id: i64,
        confirm: impl FnOnce(&Budget) -> bool,
    ) -> Result<Change<Budget>, LedgerError> {
        let index = self
            .budgets
            .iter()
            .position(|b| b.id == id)
            .ok_or(LedgerError::NotFound { kind: "budget", id })?;

        if !confirm(&self.budgets[index]) {
            return Ok(Change::Cancelled);
        }

        let mut budgets = self.budgets.clone();
        let removed = budgets.remove(index);
        self.commit(self.transactions.clone(), budgets)?;
        Ok(Change::Applied(removed))
    }

    pub fn recompute_budget_spent(&mut self) {
        let today = self.today();
        self.recompute_budget_spent_at(today);
    }

    /// Sets each budget's `spent` to the absolute total of expenses in its
    /// category within the budget period containing `today`.
    pub fn recompute_budget_spent_at(&mut self, today: NaiveDate) {
        recompute_spent(&self.transactions, &mut self.budgets, today);
    }

    /// Persists the new arrays and only then makes them current. On a failed
    /// write the ledger in memory is untouched and storage is put back.
    fn commit(
        &mut self,
        transactions: Vec<Transaction>,
        mut budgets: Vec<Budget>,
    ) -> Result<(), LedgerError> {
        recompute_spent(&transactions, &mut budgets, self.today());

        self.store.save_transactions(&transactions)?;
        if let Err(e) = self.store.save_budgets(&budgets) {
            if let Err(rollback) = self.store.save_transactions(&self.transactions) {
                tracing::error!(error = %rollback, "could not restore transactions after failed save");
            }
            return Err(e.into());
        }

        self.transactions = transactions;
        self.budgets = budgets;

        if !self.subscribers.is_empty() {
            let view = self.view();
            for (_, subscriber) in &mut self.subscribers {
                subscriber(&view);
            }
        }
        Ok(())
    }
}

fn recompute_spent(transactions: &[Transaction], budgets: &mut [Budget], today: NaiveDate) {
    for budget in budgets {
        budget.spent = transactions
            .iter()
            .filter(|t| t.is_expense())
            .filter(|t| t.category.eq_ignore_ascii_case(&budget.category))
            .filter(|t| budget.period.contains(today, t.date))
            .fold(BigDecimal::zero(), |acc, t| acc + t.amount.abs());
    }
}

fn validate_transaction(draft: &TransactionDraft) -> Result<(), LedgerError> {
    if draft.description.trim().is_empty() {
        return Err(LedgerError::Validation("Description is required"));
    }
    if draft.category.trim().is_empty() {
        return Err(LedgerError::Validation("Category is required"));
    }
    if draft.amount.is_zero() {
        return Err(LedgerError::Validation("Amount must not be zero"));
    }
    Ok(())
}

fn validate_budget(draft: &BudgetDraft) -> Result<(), LedgerError> {
    if draft.category.trim().is_empty() {
        return Err(LedgerError::Validation("Category is required"));
    }
    if !draft.amount.is_positive() {
        return Err(LedgerError::Validation("Budget amount must be positive"));
    }
    Ok(())
}
