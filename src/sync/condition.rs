use std::cell::UnsafeCell;
use std::time::Duration;
use std::{fmt, mem};

use super::Lock;
use crate::error::Error;
use crate::sys;

/// Outcome of a bounded condition wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum WaitOutcome {
    /// The wait ended because the condition was signalled (or, rarely, by a
    /// spurious wakeup — recheck the predicate).
    Notified,

    /// The timeout elapsed before any notification arrived.
    TimedOut,
}

impl WaitOutcome {
    /// `true` if the wait ended because the timeout elapsed.
    pub fn timed_out(self) -> bool {
        matches!(self, WaitOutcome::TimedOut)
    }
}

/// A condition variable.
///
/// A `Condition` lets a thread give up a held lock inside a critical section
/// and sleep until another thread signals it, re-acquiring the lock before
/// it resumes. It owns only the native condition primitive; the mutex to
/// operate against is supplied per wait call as the caller's live
/// [`Lock`] guard, so waiting without holding the lock is not expressible.
///
/// The same `Condition` may be paired with different mutexes across
/// different waits, though typical usage pairs one condition with one mutex
/// consistently.
///
/// Waits may wake without a notification (spurious wakeup); callers should
/// wait in a loop that rechecks the condition's predicate.
pub struct Condition {
    /// Boxed so the native primitive keeps a stable address for its whole
    /// lifetime, wherever the `Condition` itself moves.
    raw: Box<UnsafeCell<sys::RawCond>>,
}

// Safety: the native primitive synchronizes all access to itself; the
// wrapper adds no state of its own.
unsafe impl Send for Condition {}
unsafe impl Sync for Condition {}

impl Condition {
    /// Creates a new condition variable.
    ///
    /// Its lifecycle is independent of any mutex.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CondAlloc`] if the substrate cannot allocate the
    /// primitive (resource exhaustion). This is fatal for the caller;
    /// nothing is retried internally.
    pub fn new() -> Result<Condition, Error> {
        // Zeroed storage is the substrate's expected pre-init state.
        let raw = Box::new(UnsafeCell::new(unsafe { mem::zeroed() }));
        sys::sys_cond_init(raw.get()).map_err(Error::CondAlloc)?;

        Ok(Condition { raw })
    }

    /// Atomically releases the guard's mutex and suspends the calling thread
    /// until this condition is notified, then re-acquires the mutex before
    /// returning.
    ///
    /// The `lock` parameter is the proof that the calling thread holds the
    /// mutex; the guard remains valid — and the lock held — on every return
    /// path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Wait`] if the substrate rejects the wait. The lock
    /// is still held in that case; the rejection happens before the lock is
    /// released.
    pub fn wait(&self, lock: &mut Lock<'_>) -> Result<(), Error> {
        sys::sys_cond_wait(self.raw.get(), lock.mutex().raw()).map_err(Error::Wait)
    }

    /// Like [`wait`](Condition::wait), but gives up once `timeout` has
    /// elapsed without a notification.
    ///
    /// A timeout is a distinct, non-error outcome
    /// ([`WaitOutcome::TimedOut`]), and the mutex lock is re-acquired before
    /// returning on the timeout path just as on the notified path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Wait`] if the substrate rejects the wait — never for
    /// an elapsed timeout. The lock is still held in that case.
    pub fn wait_timeout(
        &self,
        lock: &mut Lock<'_>,
        timeout: Duration,
    ) -> Result<WaitOutcome, Error> {
        match sys::sys_cond_wait_timeout(self.raw.get(), lock.mutex().raw(), timeout) {
            Ok(true) => Ok(WaitOutcome::Notified),
            Ok(false) => Ok(WaitOutcome::TimedOut),
            Err(e) => Err(Error::Wait(e)),
        }
    }

    /// Wakes at most one thread currently blocked on this condition, which
    /// then re-contends for its mutex.
    ///
    /// Which waiter wakes is unspecified. A notification with no waiters is
    /// a no-op and is not remembered for later waits. Does not release or
    /// acquire any mutex itself; substrate signalling failures are not
    /// surfaced.
    pub fn notify_one(&self) {
        sys::sys_cond_signal(self.raw.get());
    }

    /// Wakes every thread currently blocked on this condition; all wake and
    /// re-contend for their mutexes.
    ///
    /// Useful when the number of threads that should proceed is not known in
    /// advance, such as resource-availability broadcasts. Use with care
    /// under high contention — every waiter wakes at once. A broadcast with
    /// no waiters is a no-op; substrate signalling failures are not
    /// surfaced.
    pub fn notify_all(&self) {
        sys::sys_cond_broadcast(self.raw.get());
    }
}

impl Drop for Condition {
    /// Releases the native primitive. No waiter may still be blocked on it.
    fn drop(&mut self) {
        sys::sys_cond_destroy(self.raw.get());
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition").finish_non_exhaustive()
    }
}
