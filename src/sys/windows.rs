use std::ffi::c_void;
use std::time::Duration;
use std::{io, ptr};

use windows_sys::Win32::Foundation::{CloseHandle, ERROR_TIMEOUT, GetLastError, HANDLE, WAIT_FAILED};
use windows_sys::Win32::System::Threading::{
    AcquireSRWLockExclusive, CONDITION_VARIABLE, CONDITION_VARIABLE_INIT, CreateThread,
    GetExitCodeThread, INFINITE, ReleaseSRWLockExclusive, SRWLOCK, SRWLOCK_INIT,
    SleepConditionVariableSRW, TerminateThread, WaitForSingleObject, WakeAllConditionVariable,
    WakeConditionVariable,
};

use crate::thread::Payload;

/// Native thread handle.
pub(crate) type RawThread = HANDLE;

/// Native binary mutex primitive.
pub(crate) type RawMutex = SRWLOCK;

/// Native condition-variable primitive.
pub(crate) type RawCond = CONDITION_VARIABLE;

/// Exit code recorded for a forcibly terminated thread.
const KILLED_EXIT_CODE: u32 = u32::MAX;

/// Entry point handed to `CreateThread`.
///
/// The integer status of the entry closure travels through the Win32 thread
/// exit code.
unsafe extern "system" fn thread_trampoline(arg: *mut c_void) -> u32 {
    crate::thread::run(arg as *mut Payload) as u32
}

/// Starts a new native thread running `payload`.
///
/// On success the trampoline owns the payload allocation; on error the
/// caller must reclaim it.
pub(crate) fn sys_thread_spawn(payload: *mut Payload) -> io::Result<RawThread> {
    let handle = unsafe {
        CreateThread(
            ptr::null(),
            0,
            Some(thread_trampoline),
            payload as *const c_void,
            0,
            ptr::null_mut(),
        )
    };

    if handle.is_null() {
        Err(io::Error::last_os_error())
    } else {
        Ok(handle)
    }
}

/// Forcibly terminates a running thread and reclaims its handle.
///
/// Termination is immediate; the thread gets no chance to unwind or run
/// cleanup code.
pub(crate) fn sys_thread_kill(handle: RawThread) {
    let rc = unsafe { TerminateThread(handle, KILLED_EXIT_CODE) };
    if rc == 0 {
        tracing::error!(code = unsafe { GetLastError() }, "TerminateThread failed");
    }

    unsafe { CloseHandle(handle) };
}

/// Blocks until the thread finishes and reclaims its handle.
///
/// Returns the integer status its entry function returned, or `None` if the
/// wait or exit-code query failed.
pub(crate) fn sys_thread_join(handle: RawThread) -> Option<i32> {
    let wait = unsafe { WaitForSingleObject(handle, INFINITE) };
    if wait == WAIT_FAILED {
        tracing::error!(code = unsafe { GetLastError() }, "WaitForSingleObject failed");
        unsafe { CloseHandle(handle) };
        return None;
    }

    let mut code: u32 = 0;
    let rc = unsafe { GetExitCodeThread(handle, &mut code) };
    unsafe { CloseHandle(handle) };

    if rc == 0 { None } else { Some(code as i32) }
}

/// Initializes a mutex primitive in place, in the unlocked state.
///
/// Slim reader/writer locks are statically initializable and never fail to
/// allocate.
pub(crate) fn sys_mutex_init(mutex: *mut RawMutex) -> io::Result<()> {
    unsafe { mutex.write(SRWLOCK_INIT) };
    Ok(())
}

/// Releases a mutex primitive. Slim reader/writer locks need no teardown.
pub(crate) fn sys_mutex_destroy(_mutex: *mut RawMutex) {}

/// Acquires the exclusive lock, blocking until available.
pub(crate) fn sys_mutex_lock(mutex: *mut RawMutex) {
    unsafe { AcquireSRWLockExclusive(mutex) };
}

/// Releases the exclusive lock. The calling thread must hold it.
pub(crate) fn sys_mutex_unlock(mutex: *mut RawMutex) {
    unsafe { ReleaseSRWLockExclusive(mutex) };
}

/// Initializes a condition-variable primitive in place.
pub(crate) fn sys_cond_init(cond: *mut RawCond) -> io::Result<()> {
    unsafe { cond.write(CONDITION_VARIABLE_INIT) };
    Ok(())
}

/// Releases a condition-variable primitive. No teardown is required.
pub(crate) fn sys_cond_destroy(_cond: *mut RawCond) {}

/// Atomically releases `mutex` and blocks until the condition is signalled,
/// then re-acquires `mutex` before returning.
///
/// The calling thread must hold `mutex`. On error the lock is untouched and
/// still held.
pub(crate) fn sys_cond_wait(cond: *mut RawCond, mutex: *mut RawMutex) -> io::Result<()> {
    let rc = unsafe { SleepConditionVariableSRW(cond, mutex, INFINITE, 0) };
    if rc == 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

/// Like [`sys_cond_wait`], but gives up after `timeout`.
///
/// Returns `Ok(true)` when signalled and `Ok(false)` on timeout; the lock is
/// re-held in both cases.
pub(crate) fn sys_cond_wait_timeout(
    cond: *mut RawCond,
    mutex: *mut RawMutex,
    timeout: Duration,
) -> io::Result<bool> {
    let millis = timeout.as_millis().min(u128::from(INFINITE - 1)) as u32;

    let rc = unsafe { SleepConditionVariableSRW(cond, mutex, millis, 0) };
    if rc != 0 {
        return Ok(true);
    }

    let code = unsafe { GetLastError() };
    if code == ERROR_TIMEOUT {
        Ok(false)
    } else {
        Err(io::Error::from_raw_os_error(code as i32))
    }
}

/// Wakes at most one thread blocked on the condition variable.
pub(crate) fn sys_cond_signal(cond: *mut RawCond) {
    unsafe { WakeConditionVariable(cond) };
}

/// Wakes every thread blocked on the condition variable.
pub(crate) fn sys_cond_broadcast(cond: *mut RawCond) {
    unsafe { WakeAllConditionVariable(cond) };
}
