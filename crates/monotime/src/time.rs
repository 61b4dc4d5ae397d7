use crate::error::TimerError;
use crate::source::{ActiveClock, ClockSource};
use crate::unit::{RawTick, TickUnit};
use crate::CLOCK_SOURCE;
use once_cell::sync::OnceCell;
use std::time::Duration;

static PROBE: OnceCell<Result<(), TimerError>> = OnceCell::new();

/// Current reading of the selected monotonic clock, in ticks.
///
/// Hot path: no locking, no allocation, no error branch. Availability of the
/// clock is checked once by [`init`].
#[inline(always)]
pub fn now() -> RawTick {
    ActiveClock::read()
}

/// Scale factor for deltas of [`now`]. Constant for the process lifetime.
#[inline]
pub fn tick_unit() -> TickUnit {
    ActiveClock::unit()
}

/// Current reading converted to nanoseconds.
/// Used to stamp events with a single number; prefer [`now`] for paired measurements.
#[inline]
pub fn now_nanos() -> u64 {
    let nanos = tick_unit().ticks_to_whole_nanos(now());
    nanos.clamp(0, u64::MAX as i128) as u64
}

/// Probes the clock once per process and returns a checked handle.
///
/// A caller that gets an error here should turn measurement off rather than
/// record durations from an unusable clock.
pub fn init() -> Result<Timer, TimerError> {
    let probe = PROBE.get_or_init(|| {
        let result = ActiveClock::probe();
        match &result {
            Ok(()) => tracing::info!(
                source = CLOCK_SOURCE,
                clock = ActiveClock::NAME,
                unit = ?tick_unit(),
                "monotonic clock ready"
            ),
            Err(e) => tracing::error!(
                source = CLOCK_SOURCE,
                clock = ActiveClock::NAME,
                error = %e,
                "monotonic clock unavailable"
            ),
        }
        result
    });

    probe.clone()?;
    Ok(Timer { unit: tick_unit() })
}

/// Handle to a clock that passed the startup probe. Carries the tick unit so
/// conversions never touch the memoized cell again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    unit: TickUnit,
}

impl Timer {
    #[inline(always)]
    pub fn now(&self) -> RawTick {
        ActiveClock::read()
    }

    #[inline]
    pub fn tick_unit(&self) -> TickUnit {
        self.unit
    }

    pub fn clock_source(&self) -> &'static str {
        CLOCK_SOURCE
    }

    /// Time since `start`, a value previously returned by [`Timer::now`].
    #[inline]
    pub fn elapsed(&self, start: RawTick) -> Duration {
        self.unit.ticks_to_duration(self.now().saturating_sub(start))
    }

    /// Nanoseconds between two readings; zero if `end` precedes `start`.
    #[inline]
    pub fn elapsed_nanos(&self, start: RawTick, end: RawTick) -> u64 {
        let nanos = self.unit.ticks_to_whole_nanos(end.saturating_sub(start));
        nanos.clamp(0, u64::MAX as i128) as u64
    }

    /// Runs `f` between two clock readings.
    pub fn measure<F, R>(&self, f: F) -> (R, Duration)
    where
        F: FnOnce() -> R,
    {
        let start = self.now();
        let result = f();
        (result, self.elapsed(start))
    }
}
