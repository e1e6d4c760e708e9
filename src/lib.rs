//! # Filum
//!
//! **Filum** is a minimal cross-platform threading and synchronization layer
//! built directly on the native OS substrate: pthreads on Unix, the Win32
//! threading API on Windows.
//!
//! Unlike general-purpose abstractions, Filum provides only four primitives
//! and keeps their contracts deliberately small:
//!
//! - [`Thread`] — a handle owning one execution unit, with **kill** and
//!   **join** semantics and an implicit join on drop, so no thread ever
//!   outlives its handle.
//! - [`sync::Mutex`] — a binary, non-reentrant mutual-exclusion primitive
//!   with no payload and no public lock/unlock surface.
//! - [`sync::Lock`] — a scoped acquisition over one mutex: the lock is taken
//!   in the constructor (blocking if contended) and released unconditionally
//!   when the guard is dropped, on every exit path.
//! - [`sync::Condition`] — a condition variable with bounded and unbounded
//!   waits and single/broadcast wakeups, operating against a caller-supplied
//!   lock guard.
//!
//! ## Quick Start
//!
//! ```rust
//! use filum::Thread;
//! use filum::sync::{Condition, Lock, Mutex};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//!
//! let mutex = Arc::new(Mutex::new().expect("mutex"));
//! let cond = Arc::new(Condition::new().expect("condition"));
//! let ready = Arc::new(AtomicBool::new(false));
//!
//! let (m, c, r) = (mutex.clone(), cond.clone(), ready.clone());
//! let mut worker = Thread::spawn(move || {
//!     let mut lock = Lock::new(&m);
//!     while !r.load(Ordering::SeqCst) {
//!         c.wait(&mut lock).expect("wait");
//!     }
//!     0
//! })
//! .expect("spawn");
//!
//! {
//!     let _lock = Lock::new(&mutex);
//!     ready.store(true, Ordering::SeqCst);
//! }
//! cond.notify_one();
//!
//! assert_eq!(worker.join(), Some(0));
//! ```
//!
//! ## Modules
//!
//! - [`thread`] — Thread handles with kill/join lifecycle
//! - [`sync`] — Mutexes, scoped locks, and condition variables
//!
//! ## Non-goals
//!
//! Filum does not implement thread pools, schedulers, work queues, futures,
//! lock-free structures, reader/writer locks, or recursive mutexes. It wraps
//! what the OS provides and nothing more.

mod error;
mod sys;

pub mod sync;
pub mod thread;

pub use error::Error;
pub use thread::Thread;
