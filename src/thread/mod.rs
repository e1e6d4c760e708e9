//! Thread handles with kill/join lifecycle.
//!
//! A [`Thread`] owns exactly one native execution unit. The entry function
//! is a typed closure carrying its own captured state; the integer status it
//! returns is carried through the substrate and surfaced by [`Thread::join`].
//!
//! Exactly one of three things reclaims the execution unit, and it happens
//! exactly once in effect:
//! - an explicit [`Thread::kill`],
//! - an explicit [`Thread::join`],
//! - the implicit join performed when the handle is dropped.

use std::panic::{self, AssertUnwindSafe};

use crate::error::Error;
use crate::sys;

/// Exit status reported for an entry closure that panicked instead of
/// returning.
pub const PANICKED_STATUS: i32 = -1;

/// Liveness of the underlying execution unit, as seen by the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Liveness {
    Running,
    Killed,
    Joined,
}

/// Entry closure handed across the spawn boundary.
///
/// Boxed once here and reclaimed exactly once by [`run`] on the new thread,
/// or by [`Thread::spawn`] when thread creation fails before the trampoline
/// ever runs.
pub(crate) struct Payload {
    entry: Box<dyn FnOnce() -> i32 + Send + 'static>,
}

/// Executes a spawned payload on its new thread.
///
/// Called exactly once by the platform trampoline with the pointer produced
/// by [`Thread::spawn`]; takes back ownership of the payload allocation.
/// A panic escaping the entry closure is caught here — it must not cross the
/// trampoline's FFI boundary — and mapped to [`PANICKED_STATUS`].
pub(crate) fn run(payload: *mut Payload) -> i32 {
    let payload = unsafe { Box::from_raw(payload) };

    match panic::catch_unwind(AssertUnwindSafe(payload.entry)) {
        Ok(status) => status,
        Err(_) => {
            tracing::error!("thread entry panicked");
            PANICKED_STATUS
        }
    }
}

/// A handle owning one native execution unit.
///
/// Construction starts the thread immediately. The handle is the sole owner
/// of the execution unit: it is not clonable, and dropping it blocks until
/// the thread has finished (unless it was already killed or joined), so no
/// thread ever outlives its handle.
#[derive(Debug)]
pub struct Thread {
    raw: sys::RawThread,
    state: Liveness,
}

// Safety: the native handle is just an identifier for the execution unit;
// kill/join may be issued from any thread.
unsafe impl Send for Thread {}

impl Thread {
    /// Spawns a new thread running `entry` and returns its handle.
    ///
    /// The thread starts executing immediately. The status value `entry`
    /// returns is retrievable later through [`join`](Thread::join).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if the substrate cannot allocate a new
    /// execution unit (resource exhaustion). This is fatal for the spawn;
    /// nothing is retried internally.
    pub fn spawn<F>(entry: F) -> Result<Thread, Error>
    where
        F: FnOnce() -> i32 + Send + 'static,
    {
        let payload = Box::into_raw(Box::new(Payload {
            entry: Box::new(entry),
        }));

        match sys::sys_thread_spawn(payload) {
            Ok(raw) => {
                tracing::trace!("spawned thread");
                Ok(Thread {
                    raw,
                    state: Liveness::Running,
                })
            }
            Err(e) => {
                // The trampoline never ran; take the payload back.
                drop(unsafe { Box::from_raw(payload) });
                Err(Error::Spawn(e))
            }
        }
    }

    /// Severs the handle from the thread if it is still running.
    ///
    /// Kill semantics are whatever the substrate provides, with no graceful
    /// shutdown added at this layer. On Windows the thread is terminated
    /// abruptly via `TerminateThread`. On Unix the thread is abandoned
    /// instead: it is detached and keeps running to completion in the
    /// background, because a forced pthread cancellation cannot legally
    /// unwind through the panic-containment frame around the entry closure.
    /// Either way the substrate reclaims the thread's resources on its own,
    /// and the handle is dead: a later [`join`](Thread::join) is a no-op and
    /// dropping the handle does not block.
    ///
    /// Calling `kill` on an already-killed or already-joined thread is a
    /// no-op.
    pub fn kill(&mut self) {
        if self.state != Liveness::Running {
            return;
        }

        tracing::trace!("killing thread");
        sys::sys_thread_kill(self.raw);
        self.state = Liveness::Killed;
    }

    /// Blocks until the thread's entry function returns, then reclaims the
    /// thread's resources.
    ///
    /// The first effective join returns `Some(status)` with the value the
    /// entry closure returned ([`PANICKED_STATUS`] if it panicked), or
    /// `None` if the substrate could not report one. Calling `join` on an
    /// already-joined or already-killed thread is a no-op returning `None`.
    pub fn join(&mut self) -> Option<i32> {
        if self.state != Liveness::Running {
            return None;
        }

        tracing::trace!("joining thread");
        self.state = Liveness::Joined;
        sys::sys_thread_join(self.raw)
    }
}

impl Drop for Thread {
    /// Joins the thread if neither [`Thread::kill`] nor [`Thread::join`] was
    /// called, blocking until it finishes.
    fn drop(&mut self) {
        if self.state == Liveness::Running {
            let _ = self.join();
        }
    }
}
