use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::accounts::repo::{AccountStore, StoreError, StoreResult};
use crate::accounts::repo_types::{Account, NewAccount};

/// In-process store keyed by email. The entry lock on the email shard is
/// what makes `create` race-free.
#[derive(Default)]
pub struct MemoryAccountStore {
    by_email: DashMap<String, Account>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_email.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_email.is_empty()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        Ok(self.by_email.get(email).map(|a| a.value().clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Account>> {
        Ok(self
            .by_email
            .iter()
            .find(|a| a.value().id == id)
            .map(|a| a.value().clone()))
    }

    async fn create(&self, account: NewAccount) -> StoreResult<Account> {
        match self.by_email.entry(account.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateEmail),
            Entry::Vacant(slot) => {
                let created = Account {
                    id: Uuid::new_v4(),
                    first_name: account.first_name,
                    last_name: account.last_name,
                    email: account.email,
                    password_hash: account.password_hash,
                    created_at: OffsetDateTime::now_utc(),
                };
                slot.insert(created.clone());
                Ok(created)
            }
        }
    }
}
