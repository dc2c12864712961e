//! rc_actuation - PWM actuation layer for a remote-controlled ground vehicle
//!
//! This library converts normalized control values (steering angle and
//! throttle, both in [-1.0, +1.0]) into hardware PWM duty cycles for a
//! steering servo and a throttle ESC, and keeps the physical PWM channel
//! continuously refreshed between control updates. A servo or ESC expects a
//! pulse roughly every 20 ms; a starved signal drifts or fails unsafe, so
//! target updates are decoupled from pulse emission: producers store the
//! latest target, a dedicated drive task re-emits it until shutdown.

// Platform abstraction layer (PWM pin trait, mock implementation, errors)
pub mod platform;

// Actuation subsystem (pulse arithmetic, controller, steering, throttle)
pub mod actuation;

// Crate-level error taxonomy
pub mod error;

pub use actuation::controller::{NullEmitter, PulseController, PulseEmitter};
pub use actuation::pulse::{duty_cycle, map_range, pulse_ms, PULSE_MAX};
pub use actuation::steering::{SteeringConfig, SteeringServo};
pub use actuation::throttle::{ThrottleConfig, ThrottleEsc};
pub use error::{ActuationError, Result};
pub use platform::mock::MockPwmPin;
pub use platform::traits::{PinState, PwmPin};
