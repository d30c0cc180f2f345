//! Account-bound sync lifecycle model with convergence polling.
//!
//! Models when sync is considered active, disabled, or renamed for a
//! signed-in account: sign-in/sign-out, per-authority two-level toggles,
//! atomic account renames, status snapshots, and a bounded-retry poller
//! for awaiting an external engine's convergence.
//!
//! The actual data-synchronization engine and platform account store live
//! elsewhere; they are reached through the traits in [`traits`], so any
//! scheduling model can host the poller unchanged.

pub mod account;
pub mod convergence;
pub mod error;
pub mod machine;
pub mod rename;
pub mod service;
pub mod settings;
pub mod status;
pub mod traits;
pub mod verify;

// Re-exports
pub use account::{AccountIdentity, RenameEvent};
pub use convergence::{CancelToken, ConvergencePoller, PollConfig, PollError};
pub use error::SyncError;
pub use machine::{SignInState, SyncStateMachine};
pub use rename::RenameCoordinator;
pub use service::SyncService;
pub use settings::{SyncToggleMatrix, ToggleEntry};
pub use status::{StatusSnapshot, SUMMARY_STATUS_KEY};
