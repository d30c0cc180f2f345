//! Convergence polling: await an externally observable condition.
//!
//! The sync engine converges on its own unspecified schedule, so verifiers
//! never assert state directly; they poll for it within a bounded budget.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌───────────────┐
//! │  state mutations │     │  CancelToken  │
//! │ (owner, mutexed) │     │  (teardown)   │
//! └────────┬─────────┘     └───────┬───────┘
//!          │ observed by           │ short-circuits
//!          ▼                       ▼
//!        ┌───────────────────────────┐
//!        │     ConvergencePoller     │
//!        │  (interval + timeout)     │
//!        └───────────────────────────┘
//! ```

mod cancel;
mod poller;

pub use cancel::CancelToken;
pub use poller::{ConvergencePoller, PollConfig, PollError};
