//! Mutex-guarded facade over the machine, matrix, and rename coordinator.
//!
//! External callers (and poll predicates) drive everything through this
//! service. One mutex guards the machine and matrix together; they are
//! always mutated as a unit, so a single lock gives every poll attempt a
//! consistent snapshot.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::account::{AccountIdentity, RenameEvent};
use crate::error::SyncError;
use crate::machine::SyncStateMachine;
use crate::rename::RenameCoordinator;
use crate::settings::{SyncToggleMatrix, ToggleEntry};
use crate::status::StatusSnapshot;
use crate::traits::SyncBackend;

#[derive(Debug)]
struct ServiceInner {
    machine: SyncStateMachine,
    matrix: SyncToggleMatrix,
    renames: RenameCoordinator,
}

/// The verification-facing surface of the sync lifecycle model.
///
/// Cheap to clone; clones share the same state and engine handle.
#[derive(Clone)]
pub struct SyncService {
    inner: Arc<Mutex<ServiceInner>>,
    backend: Arc<dyn SyncBackend>,
    authorities: Arc<Vec<String>>,
}

impl SyncService {
    /// Create a service over the given engine, with the set of authorities
    /// whose toggles are initialized at sign-in.
    pub fn new(
        backend: Arc<dyn SyncBackend>,
        authorities: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ServiceInner {
                machine: SyncStateMachine::new(),
                matrix: SyncToggleMatrix::new(),
                renames: RenameCoordinator::new(),
            })),
            backend,
            authorities: Arc::new(authorities.into_iter().map(Into::into).collect()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ServiceInner> {
        self.inner.lock().unwrap()
    }

    /// Sign the account in, creating default toggle entries for every
    /// configured authority that has none yet. Signing in over a different
    /// account performs an implicit sign-out first.
    pub fn sign_in(&self, identity: AccountIdentity) {
        let mut inner = self.lock();
        inner.machine.sign_in(identity.clone());
        for authority in self.authorities.iter() {
            inner.matrix.ensure_entry(&identity, authority);
        }
    }

    /// Sign out. Toggle entries are retained for the next sign-in.
    pub fn sign_out(&self) {
        self.lock().machine.sign_out();
    }

    /// The signed-in identity, if any.
    pub fn signed_in(&self) -> Option<AccountIdentity> {
        self.lock().machine.signed_in().cloned()
    }

    /// Turn the application-level toggle off for the current account.
    pub fn stop_sync(&self, authority: &str) -> Result<(), SyncError> {
        self.set_application_requested(authority, false)
    }

    /// Turn the application-level toggle back on for the current account.
    pub fn start_sync(&self, authority: &str) -> Result<(), SyncError> {
        self.set_application_requested(authority, true)
    }

    fn set_application_requested(&self, authority: &str, value: bool) -> Result<(), SyncError> {
        let mut inner = self.lock();
        let identity = inner
            .machine
            .signed_in()
            .cloned()
            .ok_or(SyncError::NotSignedIn)?;
        inner
            .matrix
            .set_application_requested(&identity, authority, value);
        inner.machine.invalidate_status();
        Ok(())
    }

    /// Set the platform-level toggle for any account, signed in or not;
    /// platform settings outlive the sign-in session.
    pub fn set_platform_permitted(
        &self,
        identity: &AccountIdentity,
        authority: &str,
        value: bool,
    ) {
        let mut inner = self.lock();
        inner
            .matrix
            .set_platform_permitted(identity, authority, value);
        if inner.machine.signed_in() == Some(identity) {
            inner.machine.invalidate_status();
        }
    }

    /// Effective enablement: the account is signed in and both toggles are
    /// on for the authority. A signed-out account is never active,
    /// whatever its toggles say.
    pub fn is_effectively_active(&self, identity: &AccountIdentity, authority: &str) -> bool {
        let inner = self.lock();
        inner.machine.signed_in() == Some(identity)
            && inner.matrix.is_effectively_active(identity, authority)
    }

    /// Effective enablement plus the engine's own report: the pair the
    /// original verifiers check before declaring sync active.
    pub fn is_sync_active(&self, identity: &AccountIdentity, authority: &str) -> bool {
        self.is_effectively_active(identity, authority)
            && self.backend.is_sync_active(identity, authority)
    }

    /// The toggle entry for the pair, if one exists.
    pub fn toggle_entry(&self, identity: &AccountIdentity, authority: &str) -> Option<ToggleEntry> {
        self.lock().matrix.entry(identity, authority)
    }

    /// The cached status snapshot if fresh, else a synchronous fetch from
    /// the engine, cached on success.
    ///
    /// A fetch failure is non-fatal: the machine keeps its prior signed-in
    /// state and cache, and the error is returned to the caller.
    pub fn get_status(&self) -> Result<StatusSnapshot, SyncError> {
        let mut inner = self.lock();
        let identity = inner
            .machine
            .signed_in()
            .cloned()
            .ok_or(SyncError::NotSignedIn)?;
        if let Some(snapshot) = inner.machine.cached_status() {
            return Ok(snapshot.clone());
        }
        let snapshot = self.backend.fetch_status(&identity)?;
        inner.machine.set_cached_status(snapshot.clone());
        Ok(snapshot)
    }

    /// Apply a rename event atomically across toggles and identity.
    pub fn apply_rename(&self, event: &RenameEvent) -> Result<(), SyncError> {
        let mut guard = self.lock();
        let ServiceInner {
            machine,
            matrix,
            renames,
        } = &mut *guard;
        renames.apply_rename(event, matrix, machine)
    }

    /// Terminal name for an account after every applied rename.
    pub fn resolve_rename(&self, name: &str) -> Option<String> {
        self.lock().renames.resolve(name)
    }
}
