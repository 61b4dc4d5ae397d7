use monotime::{now, tick_unit, TickUnit};
use std::time::{Duration, Instant};

fn busy_wait(target: Duration) {
    let start = Instant::now();
    while start.elapsed() < target {
        std::hint::spin_loop();
    }
}

#[test]
fn test_readings_are_monotonic() {
    let mut readings = Vec::with_capacity(100_000);
    for _ in 0..100_000 {
        readings.push(now());
    }

    for pair in readings.windows(2) {
        assert!(pair[1] >= pair[0], "clock went backwards: {} -> {}", pair[0], pair[1]);
    }
}

#[test]
fn test_scaled_deltas_are_non_negative() {
    let unit = tick_unit();
    for _ in 0..1_000 {
        let a = now();
        let b = now();
        assert!(unit.ticks_to_nanos(b - a) >= 0.0);
        assert!(unit.ticks_to_secs(b - a) >= 0.0);
    }
}

#[test]
fn test_tick_unit_is_stable() {
    let first = tick_unit();
    let second = tick_unit();
    assert_eq!(first, second);

    // Unrelated work in between must not change it.
    let mut acc = 0u64;
    for i in 0..1_000_000u64 {
        acc = acc.wrapping_add(i * i);
    }
    assert!(acc > 0);
    std::thread::sleep(Duration::from_millis(2));

    assert_eq!(tick_unit(), first);
}

#[test]
fn test_tick_unit_matches_selected_source() {
    match (monotime::CLOCK_SOURCE, tick_unit()) {
        ("nanos" | "portable", unit) => assert_eq!(unit, TickUnit::NANOSECOND),
        ("micros", unit) => assert_eq!(unit, TickUnit::MICROSECOND),
        ("qpc", TickUnit::NanosPerTick(n)) => assert!(n >= 1),
        (source, unit) => panic!("unexpected unit {:?} for source {}", unit, source),
    }
}

#[test]
fn test_busy_wait_conversion_within_tolerance() {
    let target = Duration::from_millis(2);
    let unit = tick_unit();

    for trial in 0..100 {
        let wall_start = Instant::now();
        let t0 = now();
        busy_wait(target);
        let t1 = now();
        let wall = wall_start.elapsed();

        let measured = unit.ticks_to_nanos(t1 - t0);
        let expected = wall.as_nanos() as f64;
        let ratio = measured / expected;
        assert!(
            (0.8..=1.2).contains(&ratio),
            "trial {}: measured {} ns vs expected {} ns (ratio {:.3})",
            trial,
            measured,
            expected,
            ratio
        );
    }
}

#[test]
fn test_sleep_50ms_scenario() {
    let unit = tick_unit();
    let mut observed = Vec::new();

    // Scheduler noise on a loaded host can stretch a single sleep; allow a few attempts.
    for _ in 0..3 {
        let t0 = now();
        std::thread::sleep(Duration::from_millis(50));
        let t1 = now();

        let nanos = unit.ticks_to_nanos(t1 - t0);
        if (40_000_000.0..=70_000_000.0).contains(&nanos) {
            return;
        }
        observed.push(nanos);
    }

    panic!("no 50ms sleep measured within [40ms, 70ms]: {:?}", observed);
}

#[test]
fn test_checked_timer_agrees_with_free_functions() {
    let timer = monotime::init().expect("clock probe failed");
    assert_eq!(timer.tick_unit(), tick_unit());

    let start = timer.now();
    let free = now();
    assert!(free >= start);

    let elapsed = timer.elapsed(start);
    assert!(elapsed < Duration::from_secs(1));
}
