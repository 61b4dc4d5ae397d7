//! Turns a counter frequency into a [`TickUnit`].

use crate::error::TimerError;
use crate::unit::{TickUnit, NANOS_PER_SEC};

/// Frequency assumed when the counter frequency cannot be queried (1000 ns per tick).
pub const FALLBACK_FREQUENCY: i64 = 1_000_000;

/// Unit for a counter ticking `frequency` times per second.
///
/// Integer nanoseconds per tick only when the frequency divides 1e9 exactly;
/// otherwise fractional seconds per tick so the scale stays exact. A failed
/// query or a non-positive frequency falls back to [`FALLBACK_FREQUENCY`]
/// with a warning.
pub fn unit_for_frequency(frequency: Result<i64, TimerError>) -> TickUnit {
    let freq = match frequency {
        Ok(freq) if freq > 0 => freq,
        Ok(freq) => {
            let e = TimerError::FrequencyQueryFailed(format!("counter reported frequency {}", freq));
            warn_fallback(&e);
            FALLBACK_FREQUENCY
        }
        Err(e) => {
            warn_fallback(&e);
            FALLBACK_FREQUENCY
        }
    };

    if NANOS_PER_SEC % freq == 0 {
        TickUnit::NanosPerTick(NANOS_PER_SEC / freq)
    } else {
        TickUnit::SecondsPerTick(1.0 / freq as f64)
    }
}

fn warn_fallback(e: &TimerError) {
    tracing::warn!(
        error = %e,
        fallback_hz = FALLBACK_FREQUENCY,
        "using fallback counter frequency"
    );
}
