//! Monotonic high-resolution timestamps for measuring elapsed time on hot paths.
//!
//! `now()` returns raw ticks from the clock source picked at build time and
//! `tick_unit()` converts their deltas into a physical duration:
//!
//! ```
//! let timer = monotime::init().expect("no usable monotonic clock");
//! let start = timer.now();
//! let end = timer.now();
//! let nanos = timer.tick_unit().ticks_to_nanos(end - start);
//! assert!(nanos >= 0.0);
//! ```

pub mod error;
pub mod source;
pub mod time;
pub mod unit;

include!(concat!(env!("OUT_DIR"), "/clock_source.rs"));

pub use error::TimerError;
pub use source::{ActiveClock, ClockSource};
pub use time::{init, now, now_nanos, tick_unit, Timer};
pub use unit::{RawTick, TickUnit};
