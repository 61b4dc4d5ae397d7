use super::ClockSource;
use crate::error::TimerError;
use crate::unit::{RawTick, TickUnit};
use once_cell::sync::Lazy;
use std::time::Instant;

/// Process-wide origin for the portable source, captured on first read.
pub static MONOTONIC_START: Lazy<Instant> = Lazy::new(Instant::now);

/// Nanoseconds since [`MONOTONIC_START`], read through the standard library's steady clock.
pub struct InstantClock;

impl ClockSource for InstantClock {
    const NAME: &'static str = "std::time::Instant";

    #[inline(always)]
    fn read() -> RawTick {
        MONOTONIC_START.elapsed().as_nanos() as i64
    }

    #[inline]
    fn unit() -> TickUnit {
        TickUnit::NANOSECOND
    }

    fn probe() -> Result<(), TimerError> {
        // Instant cannot fail; forcing the origin keeps the first hot-path read cheap.
        Lazy::force(&MONOTONIC_START);
        Ok(())
    }
}
