//! Crate-wide error taxonomy for lifecycle operations.

use thiserror::Error;

use crate::traits::FetchError;

/// Errors returned by lifecycle operations.
///
/// Every variant is recoverable from the caller's point of view: the state
/// machine and matrix are left unchanged by a failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The operation requires an active signed-in account.
    #[error("no account is signed in")]
    NotSignedIn,

    /// No toggle entry exists for the account and authority.
    #[error("no sync settings for account '{account}' and authority '{authority}'")]
    NotFound { account: String, authority: String },

    /// A rename event no longer matches the signed-in account.
    ///
    /// The caller should re-check current state; the account may have been
    /// signed out or replaced since the event was produced.
    #[error("stale rename of '{requested}': signed-in account is {signed_in:?}")]
    StaleRename {
        requested: String,
        signed_in: Option<String>,
    },

    /// The sync engine could not produce a status snapshot.
    #[error("status fetch failed")]
    Fetch(#[from] FetchError),
}
