//! Pulse arithmetic
//!
//! Standard RC servo pulses are 1 ms (full reverse) to 2 ms (full forward)
//! with 1.5 ms neutral, sent at 50 Hz: at that frequency a 1 ms pulse is a 5%
//! duty cycle and a 2 ms pulse 10%. What matters to the hardware is the pulse
//! length, so running the pin at a different frequency means rescaling the
//! duty cycle to keep the 1-2 ms window — callers compensate through the
//! controller's scale factor rather than baking a frequency in here. Pulse
//! codes are 12-bit (0..=4095) to match the resolution of common PWM driver
//! chips.

use crate::error::{ActuationError, Result};

/// Largest 12-bit pulse code (100% duty cycle).
pub const PULSE_MAX: i32 = 4095;

/// Duty cycle, 0 to 1, for a pulse of the given length at the given PWM
/// frequency.
///
/// Caller guarantees `frequency_hz > 0`.
pub fn duty_cycle(pulse_ms: f64, frequency_hz: f64) -> f64 {
    let ms_per_cycle = 1000.0 / frequency_hz;
    pulse_ms / ms_per_cycle
}

/// Pulse length in milliseconds for a 12-bit pulse code, where 0 is zero duty
/// cycle and 4095 is 100% duty cycle.
///
/// # Errors
///
/// Returns [`ActuationError::PulseOutOfRange`] when `pulse_bits` is outside
/// 0..=4095.
pub fn pulse_ms(pulse_bits: i32) -> Result<f64> {
    if !(0..=PULSE_MAX).contains(&pulse_bits) {
        return Err(ActuationError::PulseOutOfRange(pulse_bits));
    }
    Ok(pulse_bits as f64 / PULSE_MAX as f64)
}

/// Linear mapping from one range of values onto another, floored to an
/// integer.
///
/// Both actuators use this to turn a normalized command into a pulse code;
/// the floor keeps the integer semantics the hardware duty-cycle numerator
/// expects. Inputs outside `[x_min, x_max]` extrapolate rather than clamp.
pub fn map_range(x: f64, x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> i32 {
    let x_range = x_max - x_min;
    let y_range = y_max - y_min;
    let xy_ratio = x_range / y_range;

    ((x - x_min) / xy_ratio + y_min).floor() as i32
}
