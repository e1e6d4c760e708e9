use libc::{
    c_void, pthread_cond_broadcast, pthread_cond_destroy, pthread_cond_init, pthread_cond_signal,
    pthread_cond_t, pthread_cond_wait, pthread_create, pthread_detach, pthread_join,
    pthread_mutex_destroy, pthread_mutex_init, pthread_mutex_lock, pthread_mutex_t,
    pthread_mutex_unlock, pthread_t, timespec,
};
use std::time::Duration;
use std::{io, mem, ptr};

use crate::thread::Payload;

/// Native thread identifier.
pub(crate) type RawThread = pthread_t;

/// Native binary mutex primitive.
pub(crate) type RawMutex = pthread_mutex_t;

/// Native condition-variable primitive.
pub(crate) type RawCond = pthread_cond_t;

/// Entry point handed to `pthread_create`.
///
/// The integer status of the entry closure travels through the pthread exit
/// pointer, and is recovered untouched by [`sys_thread_join`] — every `i32`
/// value round-trips, including negative ones.
extern "C" fn thread_trampoline(arg: *mut c_void) -> *mut c_void {
    let status = crate::thread::run(arg as *mut Payload);
    status as isize as *mut c_void
}

/// Starts a new native thread running `payload`.
///
/// On success the trampoline owns the payload allocation; on error the
/// caller must reclaim it.
pub(crate) fn sys_thread_spawn(payload: *mut Payload) -> io::Result<RawThread> {
    let mut tid: pthread_t = unsafe { mem::zeroed() };
    let rc = unsafe {
        pthread_create(
            &mut tid,
            ptr::null(),
            thread_trampoline,
            payload as *mut c_void,
        )
    };

    if rc != 0 {
        Err(io::Error::from_raw_os_error(rc))
    } else {
        Ok(tid)
    }
}

/// Abandons a running thread and schedules resource reclamation.
///
/// The thread is detached, so the substrate reclaims it on its own once the
/// entry function finishes; no join is required (or possible) afterwards.
///
/// pthreads cannot force-terminate the thread here: glibc implements
/// cancellation as a forced stack unwind, which is forbidden from crossing
/// the panic-containment frame in the trampoline and would abort the whole
/// process. Abandonment is the strongest kill the substrate offers that
/// leaves the process intact.
pub(crate) fn sys_thread_kill(tid: RawThread) {
    let rc = unsafe { pthread_detach(tid) };
    if rc != 0 {
        tracing::error!(code = rc, "pthread_detach failed");
    }
}

/// Blocks until the thread finishes and reclaims its resources.
///
/// Returns the integer status its entry function returned, or `None` if the
/// join itself failed. A killed thread is detached and never joined, so the
/// exit pointer always carries a status value here.
pub(crate) fn sys_thread_join(tid: RawThread) -> Option<i32> {
    let mut ret: *mut c_void = ptr::null_mut();
    let rc = unsafe { pthread_join(tid, &mut ret) };

    if rc != 0 {
        tracing::error!(code = rc, "pthread_join failed");
        return None;
    }

    Some(ret as isize as i32)
}

/// Initializes a mutex primitive in place, in the unlocked state.
pub(crate) fn sys_mutex_init(mutex: *mut RawMutex) -> io::Result<()> {
    let rc = unsafe { pthread_mutex_init(mutex, ptr::null()) };
    if rc != 0 {
        Err(io::Error::from_raw_os_error(rc))
    } else {
        Ok(())
    }
}

/// Releases a mutex primitive. No lock or wait may still reference it.
pub(crate) fn sys_mutex_destroy(mutex: *mut RawMutex) {
    let rc = unsafe { pthread_mutex_destroy(mutex) };
    if rc != 0 {
        tracing::error!(code = rc, "pthread_mutex_destroy failed");
    }
}

/// Acquires the exclusive lock, blocking until available.
pub(crate) fn sys_mutex_lock(mutex: *mut RawMutex) {
    let rc = unsafe { pthread_mutex_lock(mutex) };
    if rc != 0 {
        tracing::error!(code = rc, "pthread_mutex_lock failed");
    }
}

/// Releases the exclusive lock. The calling thread must hold it.
pub(crate) fn sys_mutex_unlock(mutex: *mut RawMutex) {
    let rc = unsafe { pthread_mutex_unlock(mutex) };
    if rc != 0 {
        tracing::error!(code = rc, "pthread_mutex_unlock failed");
    }
}

/// Initializes a condition-variable primitive in place.
///
/// Timed waits measure against `CLOCK_MONOTONIC` so they are immune to
/// wall-clock adjustments.
#[cfg(not(target_os = "macos"))]
pub(crate) fn sys_cond_init(cond: *mut RawCond) -> io::Result<()> {
    let mut attr: libc::pthread_condattr_t = unsafe { mem::zeroed() };

    let rc = unsafe { libc::pthread_condattr_init(&mut attr) };
    if rc != 0 {
        return Err(io::Error::from_raw_os_error(rc));
    }

    let rc = unsafe { libc::pthread_condattr_setclock(&mut attr, libc::CLOCK_MONOTONIC) };
    if rc != 0 {
        unsafe { libc::pthread_condattr_destroy(&mut attr) };
        return Err(io::Error::from_raw_os_error(rc));
    }

    let rc = unsafe { pthread_cond_init(cond, &attr) };
    unsafe { libc::pthread_condattr_destroy(&mut attr) };

    if rc != 0 {
        Err(io::Error::from_raw_os_error(rc))
    } else {
        Ok(())
    }
}

/// Initializes a condition-variable primitive in place.
///
/// macOS has no `pthread_condattr_setclock`; timed waits use the
/// relative-deadline variant instead, so the default clock suffices.
#[cfg(target_os = "macos")]
pub(crate) fn sys_cond_init(cond: *mut RawCond) -> io::Result<()> {
    let rc = unsafe { pthread_cond_init(cond, ptr::null()) };
    if rc != 0 {
        Err(io::Error::from_raw_os_error(rc))
    } else {
        Ok(())
    }
}

/// Releases a condition-variable primitive. No waiter may still reference it.
pub(crate) fn sys_cond_destroy(cond: *mut RawCond) {
    let rc = unsafe { pthread_cond_destroy(cond) };
    if rc != 0 {
        tracing::error!(code = rc, "pthread_cond_destroy failed");
    }
}

/// Atomically releases `mutex` and blocks until the condition is signalled,
/// then re-acquires `mutex` before returning.
///
/// The calling thread must hold `mutex`. On error the lock is untouched and
/// still held.
pub(crate) fn sys_cond_wait(cond: *mut RawCond, mutex: *mut RawMutex) -> io::Result<()> {
    let rc = unsafe { pthread_cond_wait(cond, mutex) };
    if rc != 0 {
        Err(io::Error::from_raw_os_error(rc))
    } else {
        Ok(())
    }
}

/// Like [`sys_cond_wait`], but gives up after `timeout`.
///
/// Returns `Ok(true)` when signalled and `Ok(false)` on timeout; the lock is
/// re-held in both cases.
#[cfg(not(target_os = "macos"))]
pub(crate) fn sys_cond_wait_timeout(
    cond: *mut RawCond,
    mutex: *mut RawMutex,
    timeout: Duration,
) -> io::Result<bool> {
    let mut now: timespec = unsafe { mem::zeroed() };
    unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut now) };

    let nsec = now.tv_nsec + timeout.subsec_nanos() as libc::c_long;
    let deadline = timespec {
        tv_sec: now
            .tv_sec
            .saturating_add(libc::time_t::try_from(timeout.as_secs()).unwrap_or(libc::time_t::MAX))
            .saturating_add((nsec / 1_000_000_000) as libc::time_t),
        tv_nsec: nsec % 1_000_000_000,
    };

    let rc = unsafe { libc::pthread_cond_timedwait(cond, mutex, &deadline) };
    match rc {
        0 => Ok(true),
        libc::ETIMEDOUT => Ok(false),
        _ => Err(io::Error::from_raw_os_error(rc)),
    }
}

/// Like [`sys_cond_wait`], but gives up after `timeout`.
///
/// Returns `Ok(true)` when signalled and `Ok(false)` on timeout; the lock is
/// re-held in both cases.
#[cfg(target_os = "macos")]
pub(crate) fn sys_cond_wait_timeout(
    cond: *mut RawCond,
    mutex: *mut RawMutex,
    timeout: Duration,
) -> io::Result<bool> {
    let relative = timespec {
        tv_sec: libc::time_t::try_from(timeout.as_secs()).unwrap_or(libc::time_t::MAX),
        tv_nsec: timeout.subsec_nanos() as libc::c_long,
    };

    let rc = unsafe { libc::pthread_cond_timedwait_relative_np(cond, mutex, &relative) };
    match rc {
        0 => Ok(true),
        libc::ETIMEDOUT => Ok(false),
        _ => Err(io::Error::from_raw_os_error(rc)),
    }
}

/// Wakes at most one thread blocked on the condition variable.
pub(crate) fn sys_cond_signal(cond: *mut RawCond) {
    unsafe { pthread_cond_signal(cond) };
}

/// Wakes every thread blocked on the condition variable.
pub(crate) fn sys_cond_broadcast(cond: *mut RawCond) {
    unsafe { pthread_cond_broadcast(cond) };
}
