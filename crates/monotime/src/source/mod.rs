//! Platform clock sources.
//!
//! Exactly one provider is compiled in, chosen by the build script through the
//! `monotime_clock` cfg:
//!
//! * `qpc` - `QueryPerformanceCounter`, unit from a memoized frequency query (see [`frequency`]).
//! * `micros` - `gettimeofday`, microsecond ticks (opt-in `legacy-micros` feature).
//! * `nanos` - `clock_gettime(CLOCK_MONOTONIC)`, nanosecond ticks.
//! * `portable` - nanoseconds since a lazily captured [`std::time::Instant`].
//!
//! The selected provider is re-exported as [`ActiveClock`].

use crate::error::TimerError;
use crate::unit::{RawTick, TickUnit};

/// A monotonic counter together with the unit of its ticks.
pub trait ClockSource {
    /// Short name of the source, as reported in logs.
    const NAME: &'static str;

    /// Reads the counter. Must not block or allocate.
    fn read() -> RawTick;

    /// Scale factor for deltas of [`ClockSource::read`]. Constant for the process lifetime.
    fn unit() -> TickUnit;

    /// Verifies the counter can be read at all. Called once at startup.
    fn probe() -> Result<(), TimerError>;
}

pub mod frequency;

#[cfg(monotime_clock = "qpc")]
mod qpc;
#[cfg(monotime_clock = "qpc")]
pub use qpc::PerformanceCounter as ActiveClock;

#[cfg(any(monotime_clock = "micros", all(test, unix)))]
mod micros;
#[cfg(monotime_clock = "micros")]
pub use micros::MicrosClock as ActiveClock;

#[cfg(monotime_clock = "nanos")]
mod nanos;
#[cfg(monotime_clock = "nanos")]
pub use nanos::MonotonicClock as ActiveClock;

#[cfg(monotime_clock = "portable")]
mod portable;
#[cfg(monotime_clock = "portable")]
pub use portable::InstantClock as ActiveClock;

/// Reads the clock twice and rejects a source that errors or runs backwards.
#[cfg_attr(monotime_clock = "portable", allow(dead_code))]
pub(crate) fn check_readings<C: ClockSource>(
    read: impl Fn() -> Result<RawTick, TimerError>,
) -> Result<(), TimerError> {
    let first = read()?;
    let second = read()?;
    if first < 0 || second < first {
        return Err(TimerError::ClockUnavailable(format!(
            "{} returned non-monotonic readings ({} then {})",
            C::NAME,
            first,
            second
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Backwards;

    impl ClockSource for Backwards {
        const NAME: &'static str = "backwards";

        fn read() -> RawTick {
            0
        }

        fn unit() -> TickUnit {
            TickUnit::NANOSECOND
        }

        fn probe() -> Result<(), TimerError> {
            Ok(())
        }
    }

    #[test]
    fn test_active_clock_probe_succeeds() {
        assert!(ActiveClock::probe().is_ok());
    }

    #[test]
    fn test_active_clock_reads_are_non_decreasing() {
        let mut last = ActiveClock::read();
        for _ in 0..10_000 {
            let next = ActiveClock::read();
            assert!(next >= last, "clock went backwards: {} -> {}", last, next);
            last = next;
        }
    }

    #[test]
    fn test_check_readings_rejects_backwards_source() {
        let readings = std::cell::Cell::new(10);
        let result = check_readings::<Backwards>(|| {
            let v = readings.get();
            readings.set(v - 5);
            Ok(v)
        });

        match result {
            Err(TimerError::ClockUnavailable(msg)) => assert!(msg.contains("backwards")),
            other => panic!("expected ClockUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_check_readings_propagates_read_error() {
        let result = check_readings::<Backwards>(|| {
            Err(TimerError::ClockUnavailable("no clock".to_string()))
        });
        assert_eq!(result, Err(TimerError::ClockUnavailable("no clock".to_string())));
    }
}
