//! PWM actuation for rover steering and throttle
//!
//! This module converts normalized control commands into servo/ESC pulse
//! codes and keeps the hardware signal alive between commands:
//! - Pulse arithmetic (pulse length ↔ duty cycle ↔ 12-bit pulse code)
//! - A pulse-emitting controller owning one PWM pin
//! - Steering and throttle wrappers with a producer/drive-loop split
//!
//! ## Signal liveness
//!
//! RC receivers expect a refreshed pulse roughly every 20 ms and drift or
//! fault when starved. Producers therefore never write hardware directly:
//! `set_target` stores the latest value in an atomic slot and a dedicated
//! drive task re-emits it continuously until shutdown.

pub mod controller;
pub mod pulse;
pub mod state;
pub mod steering;
pub mod throttle;

pub use controller::{NullEmitter, PulseController, PulseEmitter};
pub use pulse::{duty_cycle, map_range, pulse_ms, PULSE_MAX};
pub use state::DriveState;
pub use steering::{SteeringConfig, SteeringServo};
pub use throttle::{ThrottleConfig, ThrottleEsc};
