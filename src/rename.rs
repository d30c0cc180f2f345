//! Atomic application of account rename events.
//!
//! A rename migrates toggle ownership from the old account name to the new
//! one and swaps the signed-in identity, all-or-nothing. The coordinator
//! remembers which event pairs it has applied so redelivery (broadcast
//! retries) is a harmless no-op, and keeps the successor chain so a name
//! renamed more than once still resolves to its terminal name.

use std::collections::{HashMap, HashSet};

use crate::account::{AccountIdentity, RenameEvent};
use crate::error::SyncError;
use crate::machine::SyncStateMachine;
use crate::settings::SyncToggleMatrix;

/// Applies rename events across the toggle matrix and state machine.
#[derive(Debug, Default)]
pub struct RenameCoordinator {
    applied: HashSet<(String, String)>,
    successors: HashMap<String, String>,
}

impl RenameCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one rename event.
    ///
    /// An already-applied pair succeeds without touching anything. The
    /// event's old name must match the signed-in account, else the rename
    /// is stale (the user signed out or a different account is active) and
    /// nothing is mutated. Effects, in order: migrate every known
    /// authority's toggle entry from old to new, switch the signed-in
    /// identity, invalidate the cached status.
    pub fn apply_rename(
        &mut self,
        event: &RenameEvent,
        matrix: &mut SyncToggleMatrix,
        machine: &mut SyncStateMachine,
    ) -> Result<(), SyncError> {
        let pair = (event.old_name.clone(), event.new_name.clone());
        if self.applied.contains(&pair) {
            tracing::debug!(
                "Rename '{}' -> '{}' already applied, ignoring redelivery",
                event.old_name,
                event.new_name
            );
            return Ok(());
        }

        let signed_in = machine.signed_in().map(|id| id.name().to_string());
        if signed_in.as_deref() != Some(event.old_name.as_str()) {
            tracing::warn!(
                "Stale rename '{}' -> '{}': signed-in account is {:?}",
                event.old_name,
                event.new_name,
                signed_in
            );
            return Err(SyncError::StaleRename {
                requested: event.old_name.clone(),
                signed_in,
            });
        }

        let old = AccountIdentity::new(&event.old_name);
        let new = AccountIdentity::new(&event.new_name);

        // Authorities are enumerated from existing entries before any
        // mutation, so the migration loop cannot fail part-way.
        for authority in matrix.authorities_for(&old) {
            matrix.migrate(&old, &new, &authority)?;
        }
        machine.replace_identity(new);

        self.successors
            .insert(event.old_name.clone(), event.new_name.clone());
        self.applied.insert(pair);
        tracing::info!("Applied rename '{}' -> '{}'", event.old_name, event.new_name);
        Ok(())
    }

    /// Whether this exact event pair has been applied.
    pub fn is_applied(&self, event: &RenameEvent) -> bool {
        self.applied
            .contains(&(event.old_name.clone(), event.new_name.clone()))
    }

    /// Terminal name after following every applied rename.
    ///
    /// Returns `None` when the name was never renamed. Guarded against
    /// cycles in the recorded chain.
    pub fn resolve(&self, name: &str) -> Option<String> {
        let mut current = self.successors.get(name)?.clone();
        let mut seen = HashSet::new();
        seen.insert(name.to_string());
        while seen.insert(current.clone()) {
            match self.successors.get(&current) {
                Some(next) => current = next.clone(),
                None => break,
            }
        }
        Some(current)
    }
}
