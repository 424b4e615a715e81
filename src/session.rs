use crate::models::PublicUser;
use crate::storage::{Storage, StorageError};

pub const TOKEN_KEY: &str = "spendsavvy_token";
pub const USER_KEY: &str = "spendsavvy_user";

/// Client-side record of who is logged in.
#[derive(Debug, Clone)]
pub struct SessionStore<S: Storage> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn store(&self, token: &str, user: &PublicUser) -> Result<(), StorageError> {
        self.storage.set_item(TOKEN_KEY, token)?;
        self.storage
            .set_item(USER_KEY, &serde_json::to_string(user)?)?;
        Ok(())
    }

    pub fn token(&self) -> Result<Option<String>, StorageError> {
        self.storage.get_item(TOKEN_KEY)
    }

    pub fn user(&self) -> Result<Option<PublicUser>, StorageError> {
        match self.storage.get_item(USER_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn is_authenticated(&self) -> Result<bool, StorageError> {
        Ok(self.token()?.is_some())
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove_item(TOKEN_KEY)?;
        self.storage.remove_item(USER_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn user() -> PublicUser {
        PublicUser {
            id: 3,
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
        }
    }

    #[test]
    fn test_store_and_read_back() {
        let storage = MemoryStorage::new();
        let session = SessionStore::new(storage.clone());
        assert!(!session.is_authenticated().unwrap());

        session.store("tok", &user()).unwrap();

        assert!(session.is_authenticated().unwrap());
        assert_eq!(session.token().unwrap(), Some("tok".to_string()));
        assert_eq!(session.user().unwrap(), Some(user()));
        assert!(storage.get_item(USER_KEY).unwrap().unwrap().contains("jane@example.com"));
    }

    #[test]
    fn test_clear_logs_out() {
        let session = SessionStore::new(MemoryStorage::new());
        session.store("tok", &user()).unwrap();

        session.clear().unwrap();

        assert!(!session.is_authenticated().unwrap());
        assert_eq!(session.user().unwrap(), None);
    }
}
