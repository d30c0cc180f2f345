//! Two-level sync toggle storage per account and authority.
//!
//! Each entry tracks an application-level toggle ("sync requested") and a
//! platform-level toggle ("sync permitted") independently. Effective
//! enablement is their AND. Entries persist across sign-out so a later
//! sign-in restores them unchanged, and a rename migrates them to the new
//! account name instead of duplicating them.

use std::collections::HashMap;

use crate::account::AccountIdentity;
use crate::error::SyncError;

/// Application-level and platform-level toggles for one account+authority
/// pair. Both default to true when an entry is first created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleEntry {
    /// Application-level "sync requested" toggle.
    pub application_requested: bool,
    /// Platform-level "sync permitted" toggle.
    pub platform_permitted: bool,
}

impl ToggleEntry {
    /// AND of both toggles.
    pub fn is_effectively_active(&self) -> bool {
        self.application_requested && self.platform_permitted
    }
}

impl Default for ToggleEntry {
    fn default() -> Self {
        Self {
            application_requested: true,
            platform_permitted: true,
        }
    }
}

/// Stores toggle entries keyed by account name and authority.
#[derive(Debug, Clone, Default)]
pub struct SyncToggleMatrix {
    entries: HashMap<(String, String), ToggleEntry>,
}

impl SyncToggleMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a default entry for the pair if none exists yet.
    pub fn ensure_entry(&mut self, identity: &AccountIdentity, authority: &str) {
        self.entries
            .entry(key(identity, authority))
            .or_insert_with(|| {
                tracing::debug!("Initialized default sync toggles for {} / {}", identity, authority);
                ToggleEntry::default()
            });
    }

    /// Set the application-level toggle. Idempotent; creates a default
    /// entry first when none exists.
    pub fn set_application_requested(
        &mut self,
        identity: &AccountIdentity,
        authority: &str,
        value: bool,
    ) {
        let entry = self.entries.entry(key(identity, authority)).or_default();
        if entry.application_requested != value {
            tracing::debug!(
                "Application sync toggle for {} / {}: {} -> {}",
                identity,
                authority,
                entry.application_requested,
                value
            );
        }
        entry.application_requested = value;
    }

    /// Set the platform-level toggle. Same contract as the application
    /// toggle.
    pub fn set_platform_permitted(
        &mut self,
        identity: &AccountIdentity,
        authority: &str,
        value: bool,
    ) {
        let entry = self.entries.entry(key(identity, authority)).or_default();
        if entry.platform_permitted != value {
            tracing::debug!(
                "Platform sync toggle for {} / {}: {} -> {}",
                identity,
                authority,
                entry.platform_permitted,
                value
            );
        }
        entry.platform_permitted = value;
    }

    /// The entry for the pair, if one exists.
    pub fn entry(&self, identity: &AccountIdentity, authority: &str) -> Option<ToggleEntry> {
        self.entries.get(&key(identity, authority)).copied()
    }

    /// AND of both toggles; false when no entry exists.
    pub fn is_effectively_active(&self, identity: &AccountIdentity, authority: &str) -> bool {
        self.entries
            .get(&key(identity, authority))
            .map(ToggleEntry::is_effectively_active)
            .unwrap_or(false)
    }

    /// Authorities with an entry for the identity, sorted for determinism.
    pub fn authorities_for(&self, identity: &AccountIdentity) -> Vec<String> {
        let mut authorities: Vec<String> = self
            .entries
            .keys()
            .filter(|(account, _)| account == identity.name())
            .map(|(_, authority)| authority.clone())
            .collect();
        authorities.sort();
        authorities
    }

    /// Move the entry from the old key to the new key.
    ///
    /// The old key becomes unresolvable afterwards. Fails with
    /// [`SyncError::NotFound`] when the old identity has no entry for the
    /// authority.
    pub fn migrate(
        &mut self,
        old: &AccountIdentity,
        new: &AccountIdentity,
        authority: &str,
    ) -> Result<(), SyncError> {
        let entry = self
            .entries
            .remove(&key(old, authority))
            .ok_or_else(|| SyncError::NotFound {
                account: old.name().to_string(),
                authority: authority.to_string(),
            })?;
        self.entries.insert(key(new, authority), entry);
        tracing::info!("Migrated sync toggles for '{}' from {} to {}", authority, old, new);
        Ok(())
    }
}

fn key(identity: &AccountIdentity, authority: &str) -> (String, String) {
    (identity.name().to_string(), authority.to_string())
}
