//! Signed-in identity state and status caching.
//!
//! The machine is the single source of truth poll predicates read. It
//! tracks which account (if any) is signed in and caches the last status
//! snapshot fetched from the engine; mutations invalidate the cache so the
//! next status query fetches fresh data.

use crate::account::AccountIdentity;
use crate::status::StatusSnapshot;

/// Sign-in state of the sync subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInState {
    SignedOut,
    SignedIn(AccountIdentity),
}

/// Owns the signed-in identity and the cached status snapshot.
#[derive(Debug)]
pub struct SyncStateMachine {
    state: SignInState,
    cached_status: Option<StatusSnapshot>,
}

impl SyncStateMachine {
    /// Start signed out with no cached status.
    pub fn new() -> Self {
        Self {
            state: SignInState::SignedOut,
            cached_status: None,
        }
    }

    pub fn state(&self) -> &SignInState {
        &self.state
    }

    /// The signed-in identity, if any.
    pub fn signed_in(&self) -> Option<&AccountIdentity> {
        match &self.state {
            SignInState::SignedIn(identity) => Some(identity),
            SignInState::SignedOut => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.signed_in().is_some()
    }

    /// Sign the identity in.
    ///
    /// Signing in over a different account performs an implicit sign-out
    /// first. Invalidates the cached status either way.
    pub fn sign_in(&mut self, identity: AccountIdentity) {
        if let SignInState::SignedIn(current) = &self.state {
            if *current != identity {
                tracing::info!("Implicit sign-out of {} before signing in {}", current, identity);
                self.sign_out();
            }
        }
        tracing::info!("Signed in {}", identity);
        self.state = SignInState::SignedIn(identity);
        self.invalidate_status();
    }

    /// Sign out. Toggle state for the account is retained elsewhere and
    /// restored on the next sign-in.
    pub fn sign_out(&mut self) {
        if let SignInState::SignedIn(identity) = &self.state {
            tracing::info!("Signed out {}", identity);
        }
        self.state = SignInState::SignedOut;
        self.invalidate_status();
    }

    /// Swap the signed-in identity in place (the rename path).
    ///
    /// Unlike [`SyncStateMachine::sign_in`] this is not a fresh session;
    /// the account merely changed names. Invalidates the cached status so
    /// the next query reflects the new identity.
    pub fn replace_identity(&mut self, identity: AccountIdentity) {
        self.state = SignInState::SignedIn(identity);
        self.invalidate_status();
    }

    /// The cached snapshot, if still fresh.
    pub fn cached_status(&self) -> Option<&StatusSnapshot> {
        self.cached_status.as_ref()
    }

    pub fn has_fresh_status(&self) -> bool {
        self.cached_status.is_some()
    }

    /// Cache a freshly fetched snapshot.
    pub fn set_cached_status(&mut self, snapshot: StatusSnapshot) {
        self.cached_status = Some(snapshot);
    }

    /// Drop the cached snapshot, forcing the next status query to fetch.
    pub fn invalidate_status(&mut self) {
        self.cached_status = None;
    }
}

impl Default for SyncStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
