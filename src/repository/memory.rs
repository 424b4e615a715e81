use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;

use super::UserStore;
use crate::models::User;

/// `UserStore` over a vector, for handler and service tests.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
    unavailable: AtomicBool,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every query fails as if the database were down.
    pub fn failing() -> Self {
        let store = Self::default();
        store.set_unavailable(true);
        store
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }

    pub fn get(&self, email: &str) -> Option<User> {
        let users = self.users.lock().unwrap();
        users.iter().find(|u| u.email == email).cloned()
    }
}

fn is_live(user: &User, token: &str) -> bool {
    user.reset_token.as_deref() == Some(token)
        && user
            .reset_token_expiry
            .map(|expiry| expiry > OffsetDateTime::now_utc())
            .unwrap_or(false)
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        self.check()?;
        Ok(self.get(email))
    }

    async fn insert(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email) {
            return Err(sqlx::Error::Protocol("duplicate email".to_string()));
        }

        let user = User {
            id: users.len() as i32 + 1,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            reset_token: None,
            reset_token_expiry: None,
        };
        users.push(user.clone());

        Ok(user)
    }

    async fn set_reset_token(
        &self,
        user_id: i32,
        token: &str,
        expiry: OffsetDateTime,
    ) -> Result<(), sqlx::Error> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.reset_token = Some(token.to_string());
            user.reset_token_expiry = Some(expiry);
        }
        Ok(())
    }

    async fn find_by_valid_reset_token(&self, token: &str) -> Result<Option<User>, sqlx::Error> {
        self.check()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| is_live(u, token)).cloned())
    }

    async fn consume_reset_token(
        &self,
        token: &str,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| is_live(u, token)) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.reset_token = None;
                user.reset_token_expiry = None;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
