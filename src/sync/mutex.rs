use std::cell::UnsafeCell;
use std::{fmt, mem};

use crate::error::Error;
use crate::sys;

/// A binary mutual-exclusion primitive.
///
/// `Mutex` owns one native lock primitive and nothing else: it carries no
/// protected payload and has no behavior beyond its lifecycle. Locking goes
/// through [`Lock`](super::Lock), and condition waits through
/// [`Condition`](super::Condition); the mutex itself exposes no public lock
/// or unlock operations.
///
/// The mutex is non-reentrant. Constructing a second `Lock` on the same
/// mutex from the same thread before the first is released deadlocks.
///
/// A `Mutex` must outlive every `Lock` and every condition wait that
/// references it; `Lock`'s borrow enforces this at compile time.
pub struct Mutex {
    /// Boxed so the native primitive keeps a stable address for its whole
    /// lifetime, wherever the `Mutex` itself moves.
    raw: Box<UnsafeCell<sys::RawMutex>>,
}

// Safety: the native primitive synchronizes all access to itself; the
// wrapper adds no state of its own.
unsafe impl Send for Mutex {}
unsafe impl Sync for Mutex {}

impl Mutex {
    /// Creates a new mutex in the unlocked state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MutexAlloc`] if the substrate cannot allocate the
    /// primitive (resource exhaustion). This is fatal for the caller;
    /// nothing is retried internally.
    pub fn new() -> Result<Mutex, Error> {
        // Zeroed storage is the substrate's expected pre-init state.
        let raw = Box::new(UnsafeCell::new(unsafe { mem::zeroed() }));
        sys::sys_mutex_init(raw.get()).map_err(Error::MutexAlloc)?;

        Ok(Mutex { raw })
    }

    /// Raw handle for `Lock` and `Condition`.
    pub(crate) fn raw(&self) -> *mut sys::RawMutex {
        self.raw.get()
    }
}

impl Drop for Mutex {
    /// Releases the native primitive.
    ///
    /// The borrow checker guarantees no `Lock` still references this mutex;
    /// keeping it alive across any in-flight condition wait is likewise
    /// enforced by the lifetimes of the guards involved.
    fn drop(&mut self) {
        sys::sys_mutex_destroy(self.raw.get());
    }
}

impl fmt::Debug for Mutex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutex").finish_non_exhaustive()
    }
}
