use filum::Thread;
use filum::sync::{Lock, Mutex};
use std::cell::UnsafeCell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// A non-atomic counter shared between threads; every access must happen
/// under the same mutex or the final count is garbage.
struct RacyCounter(UnsafeCell<u64>);

unsafe impl Sync for RacyCounter {}

impl RacyCounter {
    fn new() -> Self {
        RacyCounter(UnsafeCell::new(0))
    }

    /// Caller must hold the mutex guarding this counter.
    fn bump(&self) {
        unsafe { *self.0.get() += 1 };
    }

    fn get(&self) -> u64 {
        unsafe { *self.0.get() }
    }
}

#[test]
fn test_sequential_locks_on_one_mutex() {
    let mutex = Mutex::new().expect("mutex");

    for _ in 0..100 {
        let _lock = Lock::new(&mutex);
    }
}

#[test]
fn test_lock_serializes_contending_threads() {
    let mutex = Arc::new(Mutex::new().expect("mutex"));
    let counter = Arc::new(RacyCounter::new());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let mutex = mutex.clone();
            let counter = counter.clone();
            Thread::spawn(move || {
                for _ in 0..1000 {
                    let _lock = Lock::new(&mutex);
                    counter.bump();
                }
                0
            })
            .expect("spawn")
        })
        .collect();

    for mut handle in handles {
        assert_eq!(handle.join(), Some(0));
    }

    let _lock = Lock::new(&mutex);
    assert_eq!(counter.get(), 4000);
}

#[test]
fn test_second_lock_blocks_until_first_released() {
    let mutex = Arc::new(Mutex::new().expect("mutex"));
    let in_critical = Arc::new(AtomicBool::new(false));
    let violated = Arc::new(AtomicBool::new(false));

    let first = Lock::new(&mutex);
    in_critical.store(true, Ordering::SeqCst);

    let contender = {
        let mutex = mutex.clone();
        let in_critical = in_critical.clone();
        let violated = violated.clone();
        Thread::spawn(move || {
            let _lock = Lock::new(&mutex);
            // If acquisition did not block, the first holder is still inside
            // its critical section and we have two holders at once.
            if in_critical.load(Ordering::SeqCst) {
                violated.store(true, Ordering::SeqCst);
            }
            0
        })
        .expect("spawn")
    };

    thread::sleep(Duration::from_millis(100));
    in_critical.store(false, Ordering::SeqCst);
    drop(first);

    let mut contender = contender;
    assert_eq!(contender.join(), Some(0));
    assert!(!violated.load(Ordering::SeqCst), "two locks held at once");
}

#[test]
fn test_release_on_early_return() {
    fn locked_early_return(mutex: &Mutex, early: bool) -> u32 {
        let _lock = Lock::new(mutex);
        if early {
            return 1;
        }
        2
    }

    let mutex = Mutex::new().expect("mutex");

    assert_eq!(locked_early_return(&mutex, true), 1);
    // Deadlocks here if the early return skipped the release.
    assert_eq!(locked_early_return(&mutex, false), 2);
    let _lock = Lock::new(&mutex);
}

#[test]
fn test_release_on_unwind() {
    let mutex = Mutex::new().expect("mutex");

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let _lock = Lock::new(&mutex);
        panic!("abnormal exit");
    }));
    assert!(result.is_err());

    // Deadlocks here if unwinding skipped the release.
    let _lock = Lock::new(&mutex);
}

#[test]
fn test_release_allows_exactly_one_waiter_to_proceed() {
    let mutex = Arc::new(Mutex::new().expect("mutex"));
    let counter = Arc::new(RacyCounter::new());

    let held = Lock::new(&mutex);

    let waiters: Vec<_> = (0..3)
        .map(|_| {
            let mutex = mutex.clone();
            let counter = counter.clone();
            Thread::spawn(move || {
                let _lock = Lock::new(&mutex);
                counter.bump();
                0
            })
            .expect("spawn")
        })
        .collect();

    thread::sleep(Duration::from_millis(100));
    {
        // Still exclusive: no waiter has touched the counter yet.
        assert_eq!(counter.get(), 0);
    }
    drop(held);

    for mut waiter in waiters {
        assert_eq!(waiter.join(), Some(0));
    }

    let _lock = Lock::new(&mutex);
    assert_eq!(counter.get(), 3);
}
