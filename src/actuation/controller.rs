//! Pulse-emitting controller
//!
//! [`PulseController`] owns one physical PWM pin and turns 12-bit pulse codes
//! into duty-cycle writes, applying scale/inversion correction for
//! non-standard PWM frequencies and wiring. Anything that can accept a pulse
//! code implements [`PulseEmitter`]; the steering and throttle wrappers only
//! depend on that trait.

use tracing::trace;

use crate::actuation::pulse::PULSE_MAX;
use crate::error::{ActuationError, Result};
use crate::platform::traits::{PinState, PwmPin};

/// A sink for 12-bit pulse codes.
///
/// Hardware-backed implementations reject codes outside 0..=4095 rather
/// than clamp them.
pub trait PulseEmitter: Send {
    /// Emit one pulse of the given 12-bit code.
    fn set_pulse(&mut self, pulse: i32) -> Result<()>;
}

/// Controller that provides a servo PWM pulse using the given pin.
///
/// The pin is started lazily on the first pulse and exactly once over the
/// controller's lifetime; a pin that reports itself already started is never
/// restarted.
pub struct PulseController<P: PwmPin> {
    pin: P,
    scale: f64,
    inverted: bool,
    started: bool,
}

impl<P: PwmPin> PulseController<P> {
    /// Create a controller with no correction (scale 1.0, not inverted).
    pub fn new(pin: P) -> Self {
        Self::with_correction(pin, 1.0, false)
    }

    /// Create a controller with a duty-cycle correction.
    ///
    /// * `scale` rescales the 12-bit pulse value to compensate for a
    ///   non-standard PWM frequency.
    /// * `inverted` flips the duty cycle for hardware that idles high.
    pub fn with_correction(pin: P, scale: f64, inverted: bool) -> Self {
        let started = pin.state() != PinState::NotStarted;
        Self {
            pin,
            scale,
            inverted,
            started,
        }
    }

    /// Set the length of the pulse using a 12-bit code (0..=4095).
    ///
    /// # Errors
    ///
    /// [`ActuationError::PulseOutOfRange`] for codes outside 0..=4095;
    /// [`ActuationError::Hardware`] when the pin write fails.
    pub fn set_pulse(&mut self, pulse: i32) -> Result<()> {
        if !(0..=PULSE_MAX).contains(&pulse) {
            return Err(ActuationError::PulseOutOfRange(pulse));
        }

        if !self.started {
            self.pin.start()?;
            self.started = true;
        }

        let pulse = if self.inverted {
            PULSE_MAX - pulse
        } else {
            pulse
        };

        // Truncate before dividing: the hardware register takes an integer
        // numerator out of 4095, and the emitted signal must match it
        // bit-for-bit.
        let duty = (pulse as f64 * self.scale) as i64 as f64 / PULSE_MAX as f64;
        trace!(pulse, duty, "pulse write");
        self.pin.set_duty_cycle(duty as f32)?;
        Ok(())
    }

    /// Alias for [`set_pulse`](Self::set_pulse).
    pub fn run(&mut self, pulse: i32) -> Result<()> {
        self.set_pulse(pulse)
    }
}

impl<P: PwmPin> PulseEmitter for PulseController<P> {
    fn set_pulse(&mut self, pulse: i32) -> Result<()> {
        PulseController::set_pulse(self, pulse)
    }
}

/// Emitter that discards every pulse.
///
/// Stands in for a controller when driving hardware is undesired — wiring
/// tests, dry runs, bench setups with the drivetrain unplugged.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEmitter;

impl PulseEmitter for NullEmitter {
    fn set_pulse(&mut self, _pulse: i32) -> Result<()> {
        Ok(())
    }
}
