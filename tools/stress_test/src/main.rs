use monotime::{now, tick_unit, TickUnit};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Instant;

const THREADS: usize = 8;
const READS_PER_THREAD: usize = 10_000_000;

struct ThreadResult {
    unit: TickUnit,
    backwards: usize,
    span: i64,
}

fn main() {
    println!("Starting Monotonic Clock Stress Test");
    println!("Clock source: {}", monotime::CLOCK_SOURCE);
    println!("Threads: {}", THREADS);
    println!("Reads per thread: {}", READS_PER_THREAD);

    // Released together so every thread races on the first tick_unit() call.
    let barrier = Arc::new(Barrier::new(THREADS));
    let start = Instant::now();

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let barrier = barrier.clone();
            thread::Builder::new()
                .name(format!("reader-{}", i))
                .spawn(move || {
                    barrier.wait();
                    let unit = tick_unit();

                    let first = now();
                    let mut last = first;
                    let mut backwards = 0;
                    for _ in 0..READS_PER_THREAD {
                        let t = now();
                        if t < last {
                            backwards += 1;
                        }
                        last = t;
                    }

                    ThreadResult { unit, backwards, span: last - first }
                })
                .expect("Failed to spawn reader thread")
        })
        .collect();

    let results: Vec<ThreadResult> = handles
        .into_iter()
        .map(|h| h.join().expect("Reader thread panicked"))
        .collect();

    let duration = start.elapsed();
    let total_reads = (THREADS * READS_PER_THREAD) as f64;
    let unit = results[0].unit;
    let backwards: usize = results.iter().map(|r| r.backwards).sum();
    let divergent = results.iter().filter(|r| r.unit != unit).count();

    println!("\n--- Stress Test Results ---");
    println!("Tick unit: {:?}", unit);
    println!("Duration: {:.2?}", duration);
    println!("Throughput: {:.2} reads/sec", total_reads / duration.as_secs_f64());
    println!("Avg Read: {:.2} ns", duration.as_nanos() as f64 * THREADS as f64 / total_reads);
    for (i, r) in results.iter().enumerate() {
        println!("reader-{}: span {:.3} ms", i, unit.ticks_to_secs(r.span) * 1e3);
    }

    assert_eq!(divergent, 0, "Threads observed divergent tick units!");
    assert_eq!(backwards, 0, "Clock went backwards {} times!", backwards);
    println!("\nSUCCESS: Monotonic readings and a single tick unit confirmed.");
}
