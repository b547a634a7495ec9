//! In-memory identity store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use eventhub_core::error::AppError;
use eventhub_core::result::AppResult;
use eventhub_entity::user::{CreateUser, User};

use crate::stores::IdentityStore;

/// [`IdentityStore`] over two maps: users by id and ids by username.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    users: DashMap<Uuid, User>,
    usernames: DashMap<String, Uuid>,
}

impl MemoryIdentityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let key = User::normalize_username(username);
        let Some(id) = self.usernames.get(&key).map(|id| *id) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.clone()).collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        match self.usernames.entry(data.username.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "Username '{}' is already taken",
                data.username
            ))),
            Entry::Vacant(slot) => {
                let user = User {
                    id: Uuid::new_v4(),
                    first_name: data.first_name.clone(),
                    last_name: data.last_name.clone(),
                    username: data.username.clone(),
                    password_hash: data.password_hash.clone(),
                    created_at: Utc::now(),
                };
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(user)
            }
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        match self.users.remove(&id) {
            Some((_, user)) => {
                self.usernames.remove(&user.username);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventhub_core::error::ErrorKind;

    fn new_user(username: &str) -> CreateUser {
        CreateUser {
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            username: username.into(),
            password_hash: "hash".into(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = MemoryIdentityStore::new();
        let user = store.create(&new_user("grace")).await.unwrap();

        assert_eq!(store.find_by_id(user.id).await.unwrap(), Some(user.clone()));
        assert_eq!(store.find_by_username("GRACE").await.unwrap(), Some(user));
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemoryIdentityStore::new();
        store.create(&new_user("grace")).await.unwrap();
        let err = store.create(&new_user("grace")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_delete_frees_username() {
        let store = MemoryIdentityStore::new();
        let user = store.create(&new_user("grace")).await.unwrap();

        assert!(store.delete(user.id).await.unwrap());
        assert!(!store.delete(user.id).await.unwrap());
        assert!(store.find_by_id(user.id).await.unwrap().is_none());
        assert!(store.create(&new_user("grace")).await.is_ok());
    }
}
