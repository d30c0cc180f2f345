//! Trait abstractions for the external collaborators.
//!
//! The lifecycle model never talks to a real engine or platform store
//! directly; it goes through these traits so tests can inject mocks.
//!
//! # Traits
//!
//! - [`SyncBackend`] - pull-based queries against the external sync engine
//! - [`AccountRegistry`] - platform account store (rename notifications,
//!   account-id bookkeeping)

pub mod engine;
pub mod registry;

pub use engine::{FetchError, MockSyncBackend, SyncBackend};
pub use registry::{AccountRegistry, InMemoryAccountRegistry, RenameNotification};
