use super::{check_readings, ClockSource};
use crate::error::TimerError;
use crate::unit::{RawTick, TickUnit, MICROS_PER_SEC};
use std::io;
use std::mem::MaybeUninit;

/// `gettimeofday`, one tick per microsecond.
///
/// Follows the real-time clock, so a wall-clock step shows up in deltas.
/// Only selected through the `legacy-micros` feature for hosts without a
/// usable monotonic clock.
pub struct MicrosClock;

#[inline(always)]
fn time_of_day() -> (libc::c_int, libc::timeval) {
    let mut tv = MaybeUninit::<libc::timeval>::zeroed();
    // SAFETY: tv points to writable storage for one timeval; a null timezone is permitted.
    unsafe {
        let rc = libc::gettimeofday(tv.as_mut_ptr(), std::ptr::null_mut());
        (rc, tv.assume_init())
    }
}

impl ClockSource for MicrosClock {
    const NAME: &'static str = "gettimeofday";

    #[inline(always)]
    fn read() -> RawTick {
        let (_, tv) = time_of_day();
        tv.tv_sec as i64 * MICROS_PER_SEC + tv.tv_usec as i64
    }

    #[inline]
    fn unit() -> TickUnit {
        TickUnit::MICROSECOND
    }

    fn probe() -> Result<(), TimerError> {
        check_readings::<Self>(|| {
            let (rc, tv) = time_of_day();
            if rc != 0 {
                return Err(TimerError::ClockUnavailable(format!(
                    "{}: {}",
                    Self::NAME,
                    io::Error::last_os_error()
                )));
            }
            Ok(tv.tv_sec as i64 * MICROS_PER_SEC + tv.tv_usec as i64)
        })
    }
}
