use thiserror::Error;

/// A review state that violates its invariants on input to the scheduler.
///
/// This signals corruption on the caller's side; it is never retried.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum InvalidStateError {
    #[error("encoding strength {0} is outside [0, 1]")]
    EncodingStrengthOutOfRange(f64),
    #[error("current interval {0} days is not strictly positive")]
    NonPositiveInterval(f64),
}
