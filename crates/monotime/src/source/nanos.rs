use super::{check_readings, ClockSource};
use crate::error::TimerError;
use crate::unit::{RawTick, TickUnit, NANOS_PER_SEC};
use std::io;
use std::mem::MaybeUninit;

/// `clock_gettime(CLOCK_MONOTONIC)`, one tick per nanosecond.
pub struct MonotonicClock;

#[inline(always)]
fn clock_monotonic() -> (libc::c_int, libc::timespec) {
    let mut ts = MaybeUninit::<libc::timespec>::zeroed();
    // SAFETY: ts points to writable storage for one timespec, and a zeroed
    // timespec is a valid value whether or not the call succeeds.
    unsafe {
        let rc = libc::clock_gettime(libc::CLOCK_MONOTONIC, ts.as_mut_ptr());
        (rc, ts.assume_init())
    }
}

impl ClockSource for MonotonicClock {
    const NAME: &'static str = "clock_gettime(CLOCK_MONOTONIC)";

    #[inline(always)]
    fn read() -> RawTick {
        let (_, ts) = clock_monotonic();
        ts.tv_sec as i64 * NANOS_PER_SEC + ts.tv_nsec as i64
    }

    #[inline]
    fn unit() -> TickUnit {
        TickUnit::NANOSECOND
    }

    fn probe() -> Result<(), TimerError> {
        check_readings::<Self>(|| {
            let (rc, ts) = clock_monotonic();
            if rc != 0 {
                return Err(TimerError::ClockUnavailable(format!(
                    "{}: {}",
                    Self::NAME,
                    io::Error::last_os_error()
                )));
            }
            Ok(ts.tv_sec as i64 * NANOS_PER_SEC + ts.tv_nsec as i64)
        })
    }
}
