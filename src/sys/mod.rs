//! Platform-specific threading substrate.
//!
//! This module provides a unified interface over the native threading APIs
//! (pthreads on Unix, the Win32 threading API on Windows).
//!
//! The substrate is consumed as five operation groups:
//! - thread lifecycle (spawn / kill / join),
//! - mutex lifecycle (init / destroy),
//! - exclusive lock (lock / unlock),
//! - condition-variable lifecycle (init / destroy),
//! - condition-variable operations (wait / timed wait / signal / broadcast).
//!
//! The concrete implementation is selected at compile time depending on the
//! target operating system.

#[cfg(unix)]
pub(crate) mod unix;

#[cfg(unix)]
pub(crate) use unix as platform;

#[cfg(windows)]
pub(crate) mod windows;

#[cfg(windows)]
pub(crate) use windows as platform;

pub(crate) use self::platform::*;
