//! Thread lifecycle across real OS threads.

#[macro_use]
mod common;

use common::init_test_logging;
use osal::thread::{self, Thread, ThreadPriority};
use osal::Error;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

#[test]
fn five_threads_observe_distinct_stable_ids() {
    init_test_logging();
    test_phase!("five_threads_observe_distinct_stable_ids");

    let ids = Arc::new(StdMutex::new(Vec::new()));
    let mut threads = Vec::new();

    for _ in 0..5 {
        let ids = ids.clone();
        let mut t = Thread::new();
        t.start(move || {
            let first = thread::current_id();
            // Stable across repeated calls within the thread's lifetime.
            for _ in 0..10 {
                assert_eq!(thread::current_id(), first);
                thread::yield_now();
            }
            ids.lock().unwrap().push(first);
        })
        .unwrap();
        threads.push(t);
    }
    for t in &mut threads {
        t.join().unwrap();
    }

    let ids = ids.lock().unwrap();
    let distinct: HashSet<_> = ids.iter().copied().collect();
    assert_eq!(distinct.len(), 5, "ids collided: {ids:?}");

    test_complete!("five_threads_observe_distinct_stable_ids");
}

#[test]
fn join_twice_fails_the_second_time() {
    init_test_logging();

    let mut t = Thread::new();
    t.start(|| {}).unwrap();
    assert_eq!(t.join(), Ok(()));
    assert_eq!(t.join(), Err(Error::OsError));
}

#[test]
fn join_before_start_is_an_invalid_argument() {
    init_test_logging();

    let mut t = Thread::new();
    assert_eq!(t.join(), Err(Error::InvalidArgument));
}

#[test]
fn an_instance_runs_at_most_once() {
    init_test_logging();

    let mut t = Thread::new();
    t.start(|| {}).unwrap();
    t.join().unwrap();
    assert_eq!(t.start(|| {}), Err(Error::ThreadAlreadyStarted));
}

#[test]
fn start_is_rejected_while_running() {
    init_test_logging();

    let mut t = Thread::new();
    t.start(|| std::thread::sleep(Duration::from_millis(30))).unwrap();
    assert_eq!(t.start(|| {}), Err(Error::ThreadAlreadyStarted));
    t.join().unwrap();
}

#[test]
fn drop_without_join_does_not_hang_or_leak() {
    init_test_logging();
    test_phase!("drop_without_join_does_not_hang_or_leak");

    let counter = Arc::new(AtomicU64::new(0));
    {
        let counter = counter.clone();
        let mut t = Thread::new();
        t.start(move || {
            osal::sleep::sleep(Duration::from_millis(20));
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
        // No explicit join.
    }
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    test_complete!("drop_without_join_does_not_hang_or_leak");
}

#[test]
fn every_priority_class_runs_with_a_custom_stack() {
    init_test_logging();
    test_phase!("every_priority_class_runs_with_a_custom_stack");

    let counter = Arc::new(AtomicU64::new(0));
    for priority in ThreadPriority::ALL {
        let counter = counter.clone();
        let mut t = Thread::with_priority(priority);
        t.set_stack_size(256 * 1024);
        t.start(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
        t.join().unwrap();
    }
    assert_eq!(counter.load(Ordering::SeqCst), 5);

    test_complete!("every_priority_class_runs_with_a_custom_stack");
}

#[test]
fn named_threads_start_and_join() {
    init_test_logging();

    let mut t = Thread::new();
    t.set_name("worker-under-test");
    t.start(|| {
        let name = std::thread::current().name().map(str::to_owned);
        assert_eq!(name.as_deref(), Some("worker-under-test"));
    })
    .unwrap();
    t.join().unwrap();
}
