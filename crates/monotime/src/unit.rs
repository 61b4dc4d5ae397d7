use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw counter value returned by [`crate::now`].
/// Only the difference between two readings taken in the same process means anything.
pub type RawTick = i64;

pub const NANOS_PER_SEC: i64 = 1_000_000_000;
pub const MICROS_PER_SEC: i64 = 1_000_000;

/// Scale factor turning a [`RawTick`] delta into a physical duration.
///
/// Counter based sources report an integer number of nanoseconds per tick,
/// clock based sources a fixed number of seconds per tick. The conversion
/// helpers hide the difference so callers never branch on platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TickUnit {
    NanosPerTick(i64),
    SecondsPerTick(f64),
}

impl TickUnit {
    /// One tick is one nanosecond.
    pub const NANOSECOND: TickUnit = TickUnit::SecondsPerTick(1e-9);
    /// One tick is one microsecond.
    pub const MICROSECOND: TickUnit = TickUnit::SecondsPerTick(1e-6);

    #[inline]
    pub fn nanos_per_tick(self) -> f64 {
        match self {
            TickUnit::NanosPerTick(n) => n as f64,
            TickUnit::SecondsPerTick(s) => s * NANOS_PER_SEC as f64,
        }
    }

    #[inline]
    pub fn ticks_to_nanos(self, ticks: RawTick) -> f64 {
        match self {
            TickUnit::NanosPerTick(n) => (ticks as i128 * n as i128) as f64,
            TickUnit::SecondsPerTick(s) => ticks as f64 * s * NANOS_PER_SEC as f64,
        }
    }

    #[inline]
    pub fn ticks_to_secs(self, ticks: RawTick) -> f64 {
        match self {
            TickUnit::NanosPerTick(n) => (ticks as i128 * n as i128) as f64 / NANOS_PER_SEC as f64,
            TickUnit::SecondsPerTick(s) => ticks as f64 * s,
        }
    }

    /// Whole nanoseconds for `ticks`, without going through `f64` when the
    /// unit is an integer number of nanoseconds (or exactly 1e-9 / 1e-6 s).
    #[inline]
    pub fn ticks_to_whole_nanos(self, ticks: RawTick) -> i128 {
        match self {
            TickUnit::NanosPerTick(n) => ticks as i128 * n as i128,
            TickUnit::SecondsPerTick(s) if s == 1e-9 => ticks as i128,
            TickUnit::SecondsPerTick(s) if s == 1e-6 => ticks as i128 * 1_000,
            TickUnit::SecondsPerTick(s) => (ticks as f64 * s * NANOS_PER_SEC as f64).round() as i128,
        }
    }

    /// Negative deltas saturate to [`Duration::ZERO`].
    pub fn ticks_to_duration(self, ticks: RawTick) -> Duration {
        let nanos = self.ticks_to_whole_nanos(ticks);
        if nanos <= 0 {
            return Duration::ZERO;
        }
        let secs = (nanos / NANOS_PER_SEC as i128).min(u64::MAX as i128) as u64;
        let subsec = (nanos % NANOS_PER_SEC as i128) as u32;
        Duration::new(secs, subsec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nanosecond_unit_conversions() {
        let unit = TickUnit::NANOSECOND;
        assert_eq!(unit.ticks_to_nanos(1_500), 1_500.0);
        assert!((unit.ticks_to_secs(2_000_000_000) - 2.0).abs() < 1e-9);
        assert_eq!(unit.ticks_to_duration(1_500), Duration::from_nanos(1_500));
    }

    #[test]
    fn test_microsecond_unit_is_a_thousand_nanos() {
        let unit = TickUnit::MICROSECOND;
        assert!((unit.nanos_per_tick() - 1_000.0).abs() < 1e-6);
        assert_eq!(unit.ticks_to_duration(50_000), Duration::from_millis(50));
    }

    #[test]
    fn test_integer_unit_conversions() {
        // 10 MHz counter
        let unit = TickUnit::NanosPerTick(100);
        assert_eq!(unit.ticks_to_nanos(10), 1_000.0);
        assert_eq!(unit.ticks_to_duration(10_000_000), Duration::from_secs(1));
        assert!((unit.ticks_to_secs(5_000_000) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_negative_delta_saturates() {
        assert_eq!(TickUnit::NANOSECOND.ticks_to_duration(-5), Duration::ZERO);
        assert_eq!(TickUnit::NanosPerTick(100).ticks_to_duration(-1), Duration::ZERO);
    }

    #[test]
    fn test_large_delta_does_not_overflow() {
        let unit = TickUnit::NanosPerTick(1_000);
        let nanos = unit.ticks_to_nanos(i64::MAX);
        assert!(nanos > i64::MAX as f64);
    }

    #[test]
    fn test_whole_nanos_keep_resolution_past_f64_mantissa() {
        // ~463 days of uptime, beyond 2^53 ns
        let ticks = 40_000_000_000_000_001;
        assert_eq!(TickUnit::NANOSECOND.ticks_to_whole_nanos(ticks), 40_000_000_000_000_001);
        assert_eq!(TickUnit::NanosPerTick(1).ticks_to_whole_nanos(ticks), 40_000_000_000_000_001);
        assert_eq!(
            TickUnit::MICROSECOND.ticks_to_whole_nanos(ticks),
            40_000_000_000_000_001_000
        );
        assert_eq!(
            TickUnit::NANOSECOND.ticks_to_duration(ticks),
            Duration::new(40_000_000, 1)
        );
    }

    #[test]
    fn test_fractional_unit_rounds_to_whole_nanos() {
        let unit = TickUnit::SecondsPerTick(1.0 / 3_579_545.0);
        assert_eq!(unit.ticks_to_whole_nanos(3_579_545), 1_000_000_000);
    }

    #[test]
    fn test_tick_unit_serialization() {
        let unit = TickUnit::NanosPerTick(100);
        let serialized = serde_json::to_string(&unit).expect("Failed to serialize");
        let deserialized: TickUnit = serde_json::from_str(&serialized).expect("Failed to deserialize");

        assert_eq!(unit, deserialized);
    }
}
