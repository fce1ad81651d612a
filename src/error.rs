use thiserror::Error;

/// Errors surfaced by the simulator library.
///
/// Every generator is total over its random inputs; these variants cover the
/// caller-side rejections only.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("invalid series window: interval must be at least 1 minute (got {interval_minutes})")]
    InvalidWindow { interval_minutes: u32 },

    #[error("series window of {hours} h at {interval_minutes} min exceeds {max_points} points")]
    WindowTooLarge {
        hours: u32,
        interval_minutes: u32,
        max_points: usize,
    },

    #[error("a scan is already in progress")]
    ScanInProgress,

    #[error("unknown {kind} filter value '{value}'")]
    UnknownFilter { kind: &'static str, value: String },
}
