//! Crate-wide error type.
//!
//! Every variant is a fatal substrate failure: the OS could not allocate or
//! operate on a native primitive. None of these conditions are retried
//! internally; the operation that needed the primitive simply fails.
//!
//! Redundant `kill`/`join` calls and notifications with no waiters are
//! defined as successful no-ops and never reach this type.

use std::io;

use thiserror::Error;

/// Errors reported by the threading primitives.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The substrate could not allocate a new execution unit.
    #[error("failed to spawn thread")]
    Spawn(#[source] io::Error),

    /// The substrate could not allocate a mutex primitive.
    #[error("failed to allocate mutex")]
    MutexAlloc(#[source] io::Error),

    /// The substrate could not allocate a condition-variable primitive.
    #[error("failed to allocate condition variable")]
    CondAlloc(#[source] io::Error),

    /// A condition-variable wait was rejected by the substrate.
    ///
    /// The calling thread still holds the mutex lock when this is returned;
    /// the substrate rejects a malformed wait without touching the lock.
    #[error("condition variable wait failed")]
    Wait(#[source] io::Error),
}
