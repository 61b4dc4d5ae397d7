//! Kept alone in its own test binary so the barrier-released calls really are
//! the first `tick_unit()` calls of the process.

use monotime::tick_unit;
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 32;

#[test]
fn test_concurrent_first_use_yields_one_unit() {
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let barrier = barrier.clone();
            thread::Builder::new()
                .name(format!("first-use-{}", i))
                .spawn(move || {
                    barrier.wait();
                    tick_unit()
                })
                .expect("Failed to spawn thread")
        })
        .collect();

    let units: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked"))
        .collect();

    let first = units[0];
    assert!(units.iter().all(|u| *u == first), "divergent units: {:?}", units);
    assert_eq!(tick_unit(), first);
}
