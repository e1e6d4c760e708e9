use std::fmt;
use std::marker::PhantomData;

use super::Mutex;
use crate::sys;

/// A scoped acquisition of one [`Mutex`].
///
/// Constructing a `Lock` acquires the mutex's exclusive lock, blocking until
/// it is available; dropping the `Lock` releases it. The release is
/// unconditional and happens exactly once, however control leaves the
/// enclosing scope — normal return, early return, or unwinding.
///
/// A `Lock` represents a single acquisition event: it cannot be cloned or
/// reassigned, and it stays on the thread that acquired it (the substrate
/// requires the acquiring thread to perform the release).
#[must_use = "the mutex is released immediately if the lock is not bound to a variable"]
pub struct Lock<'m> {
    mutex: &'m Mutex,

    /// Pins the guard to the acquiring thread.
    _not_send: PhantomData<*const ()>,
}

impl<'m> Lock<'m> {
    /// Acquires the exclusive lock on `mutex`, blocking while another `Lock`
    /// holds it.
    ///
    /// There is no timeout variant at this layer, and no try-lock: at most
    /// one `Lock` holds a given mutex at any instant, and a contended
    /// constructor simply waits its turn.
    pub fn new(mutex: &'m Mutex) -> Lock<'m> {
        sys::sys_mutex_lock(mutex.raw());

        Lock {
            mutex,
            _not_send: PhantomData,
        }
    }

    /// The mutex this guard holds, for condition waits.
    pub(crate) fn mutex(&self) -> &'m Mutex {
        self.mutex
    }
}

impl Drop for Lock<'_> {
    /// Releases the exclusive lock on the referenced mutex.
    fn drop(&mut self) {
        sys::sys_mutex_unlock(self.mutex.raw());
    }
}

impl fmt::Debug for Lock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lock").finish_non_exhaustive()
    }
}
