//! Persistence of the signed-in account

use crate::models::Account;
use crate::store::StoreError;

/// Durable storage of a single signed-in [Account] snapshot.
///
/// An absent snapshot means the client is signed out.
pub trait SnapshotStore {
    /// Read the snapshot
    fn load(&self) -> Result<Option<Account>, StoreError>;
    /// Replace the snapshot
    fn save(&mut self, account: &Account) -> Result<(), StoreError>;
    /// Remove the snapshot
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// A [SnapshotStore] that only lives as long as the value itself
#[derive(Default, Clone, Debug)]
pub struct MemorySnapshot {
    account: Option<Account>,
}

impl MemorySnapshot {
    /// Start from an existing snapshot
    pub fn with(account: Account) -> Self {
        Self {
            account: Some(account),
        }
    }
}

impl SnapshotStore for MemorySnapshot {
    fn load(&self) -> Result<Option<Account>, StoreError> {
        Ok(self.account.clone())
    }

    fn save(&mut self, account: &Account) -> Result<(), StoreError> {
        self.account = Some(account.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.account = None;
        Ok(())
    }
}

impl<S: SnapshotStore> SnapshotStore for &mut S {
    fn load(&self) -> Result<Option<Account>, StoreError> {
        (**self).load()
    }

    fn save(&mut self, account: &Account) -> Result<(), StoreError> {
        (**self).save(account)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        (**self).clear()
    }
}
