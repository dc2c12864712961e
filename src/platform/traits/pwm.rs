//! PWM pin interface trait
//!
//! This module defines the PWM output interface that pin driver
//! implementations must provide.

use crate::platform::Result;

/// Lifecycle state of a PWM pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinState {
    /// Pin has not been started; no signal is being generated.
    NotStarted,
    /// Pin is actively generating a PWM signal.
    Started,
}

/// PWM pin interface trait
///
/// Pin driver implementations must provide this interface for PWM output
/// control.
///
/// # Safety Invariants
///
/// - Only one owner per PWM pin; no concurrent access to the same pin from
///   multiple contexts
/// - Duty cycle must be in range [0.0, 1.0]
pub trait PwmPin: Send {
    /// Start signal generation on the pin.
    ///
    /// Idempotent at the hardware level: starting an already-started pin is
    /// a no-op.
    fn start(&mut self) -> Result<()>;

    /// Set the PWM duty cycle.
    ///
    /// # Arguments
    ///
    /// * `duty_cycle` - Duty cycle as a fraction (0.0 = 0%, 1.0 = 100%)
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::InvalidDutyCycle)` if the duty
    /// cycle is outside the valid range [0.0, 1.0].
    fn set_duty_cycle(&mut self, duty_cycle: f32) -> Result<()>;

    /// Get the last duty cycle written to the pin.
    fn duty_cycle(&self) -> f32;

    /// Get the pin's lifecycle state.
    fn state(&self) -> PinState;
}
