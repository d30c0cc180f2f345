//! Platform account registry collaborator trait.
//!
//! The platform keeps its own account store; the lifecycle model only uses
//! it for rename notifications (which drive [`crate::account::RenameEvent`]
//! construction) and account-id bookkeeping. Its persistence mechanism is
//! irrelevant to the state machine's invariants.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use crate::account::AccountIdentity;

/// A recorded platform-level rename notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameNotification {
    pub old_name: String,
    pub new_name: String,
    pub authority: String,
}

/// Platform account store operations the lifecycle model observes.
pub trait AccountRegistry: Send + Sync {
    /// Record that an account was renamed at the platform level for the
    /// given authority.
    fn rename_accounts(&self, old: &AccountIdentity, new: &AccountIdentity, authority: &str);

    /// Platform identifier for an account name, if the account is known.
    fn account_id(&self, name: &str) -> Option<String>;
}

/// In-memory registry for tests.
///
/// Issues a stable v4 id per account; a rename moves the id to the new
/// name, so identity resolution survives the rename.
#[derive(Debug, Default)]
pub struct InMemoryAccountRegistry {
    inner: Mutex<RegistryInner>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    ids: HashMap<String, String>,
    renames: Vec<RenameNotification>,
}

impl InMemoryAccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account and return its id. Re-adding an existing name
    /// returns the id already issued.
    pub fn add_account(&self, name: &str) -> String {
        let mut inner = self.inner.lock().unwrap();
        inner
            .ids
            .entry(name.to_string())
            .or_insert_with(|| Uuid::new_v4().to_string())
            .clone()
    }

    /// Every rename notification recorded so far, oldest first.
    pub fn rename_log(&self) -> Vec<RenameNotification> {
        self.inner.lock().unwrap().renames.clone()
    }
}

impl AccountRegistry for InMemoryAccountRegistry {
    fn rename_accounts(&self, old: &AccountIdentity, new: &AccountIdentity, authority: &str) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(id) = inner.ids.remove(old.name()) {
            inner.ids.insert(new.name().to_string(), id);
        }
        inner.renames.push(RenameNotification {
            old_name: old.name().to_string(),
            new_name: new.name().to_string(),
            authority: authority.to_string(),
        });
        tracing::info!(
            "Platform registry renamed '{}' -> '{}' for authority '{}'",
            old,
            new,
            authority
        );
    }

    fn account_id(&self, name: &str) -> Option<String> {
        self.inner.lock().unwrap().ids.get(name).cloned()
    }
}
