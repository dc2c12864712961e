//! Crate-level error taxonomy for the actuation subsystem.

use crate::platform::PlatformError;

/// Result type for actuation operations.
pub type Result<T> = core::result::Result<T, ActuationError>;

/// Errors surfaced by the actuation subsystem.
///
/// The subsystem performs no retries: a failed pulse write is fatal to the
/// call that issued it and propagates to whoever owns the drive loop.
#[derive(Debug, thiserror::Error)]
pub enum ActuationError {
    /// Invalid actuator configuration, detected before any hardware write.
    #[error("invalid actuator configuration: {0}")]
    Config(String),

    /// Pulse code outside the 12-bit range accepted by the hardware.
    /// Out-of-range codes are rejected, never silently clamped.
    #[error("pulse {0} outside 12-bit range 0..=4095")]
    PulseOutOfRange(i32),

    /// Hardware write failure propagated from the pin driver.
    #[error("hardware write failed: {0}")]
    Hardware(#[from] PlatformError),
}
