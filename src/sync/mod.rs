//! Synchronization primitives over the native substrate.
//!
//! This module provides the three primitives that make up the locking side
//! of the crate:
//! - [`Mutex`] — a binary mutual-exclusion primitive with no payload.
//! - [`Lock`] — a scoped acquisition over one mutex, released on drop.
//! - [`Condition`] — a condition variable for bounded and unbounded waits.
//!
//! ## Design notes
//!
//! - A `Mutex` exposes no lock or unlock operations of its own; only `Lock`
//!   and `Condition` manipulate its internal state.
//! - A `Lock` borrows its mutex for its whole lifetime, so the mutex cannot
//!   be dropped out from under it.
//! - A `Condition` holds no mutex of its own; every wait takes the caller's
//!   live `Lock` guard, which makes the "caller already holds the lock"
//!   precondition a compile-time guarantee.

mod condition;
mod lock;
mod mutex;

pub use condition::{Condition, WaitOutcome};
pub use lock::Lock;
pub use mutex::Mutex;
