use super::frequency::unit_for_frequency;
use super::{check_readings, ClockSource};
use crate::error::TimerError;
use crate::unit::{RawTick, TickUnit};
use once_cell::sync::OnceCell;
use std::io;
use windows_sys::Win32::System::Performance::{QueryPerformanceCounter, QueryPerformanceFrequency};

static UNIT: OnceCell<TickUnit> = OnceCell::new();

/// `QueryPerformanceCounter`. Ticks are raw counter values; the unit is
/// derived once from the counter frequency.
pub struct PerformanceCounter;

fn query_frequency() -> Result<i64, TimerError> {
    let mut freq: i64 = 0;
    // SAFETY: freq is a valid out-pointer for the duration of the call.
    let ok = unsafe { QueryPerformanceFrequency(&mut freq) };
    if ok == 0 {
        return Err(TimerError::FrequencyQueryFailed(io::Error::last_os_error().to_string()));
    }
    if freq <= 0 {
        return Err(TimerError::FrequencyQueryFailed(format!("counter reported frequency {}", freq)));
    }
    Ok(freq)
}

#[inline(always)]
fn counter() -> (i32, i64) {
    let mut ticks: i64 = 0;
    // SAFETY: ticks is a valid out-pointer for the duration of the call.
    let ok = unsafe { QueryPerformanceCounter(&mut ticks) };
    (ok, ticks)
}

impl ClockSource for PerformanceCounter {
    const NAME: &'static str = "QueryPerformanceCounter";

    #[inline(always)]
    fn read() -> RawTick {
        counter().1
    }

    #[inline]
    fn unit() -> TickUnit {
        *UNIT.get_or_init(|| unit_for_frequency(query_frequency()))
    }

    fn probe() -> Result<(), TimerError> {
        check_readings::<Self>(|| match counter() {
            (0, _) => Err(TimerError::ClockUnavailable(format!(
                "{}: {}",
                Self::NAME,
                io::Error::last_os_error()
            ))),
            (_, ticks) => Ok(ticks),
        })
    }
}
