//! Platform error types
//!
//! Hardware drivers map their HAL-specific failures to these variants.

/// Platform-level errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// PWM operation failed
    #[error("PWM error: {0}")]
    Pwm(#[from] PwmError),

    /// Peripheral initialization failed
    #[error("platform initialization failed")]
    InitializationFailed,

    /// Resource not available
    #[error("resource not available")]
    ResourceUnavailable,
}

/// PWM-specific errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PwmError {
    /// Duty cycle outside [0.0, 1.0]
    #[error("invalid duty cycle")]
    InvalidDutyCycle,

    /// Channel not available
    #[error("channel unavailable")]
    ChannelUnavailable,
}
