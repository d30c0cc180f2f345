//! Account identity and rename event types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A signed-in principal, identified by a unique email-like name.
///
/// Identities are immutable values; two identities are equal iff their
/// names match. Toggle state is keyed by this name, so a rename migrates
/// entries to a fresh identity rather than mutating an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountIdentity {
    name: String,
}

impl AccountIdentity {
    /// Create an identity for the given account name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The unique account name (e.g. "alice@example.com").
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for AccountIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A single account rename, delivered by the platform account registry.
///
/// Each (old, new) pair is applied at most once; redelivery of the same
/// event is a successful no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameEvent {
    /// Name the account had before the rename.
    pub old_name: String,
    /// Name the account has after the rename.
    pub new_name: String,
}

impl RenameEvent {
    /// Create a rename event from old to new account name.
    pub fn new(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self {
            old_name: old_name.into(),
            new_name: new_name.into(),
        }
    }
}
