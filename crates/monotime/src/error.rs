use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("Clock Unavailable: {0}")]
    ClockUnavailable(String),
    #[error("Frequency Query Failed: {0}")]
    FrequencyQueryFailed(String),
}
