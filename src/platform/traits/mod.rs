//! Platform abstraction traits
//!
//! This module defines the traits that pin driver implementations must provide.

pub mod pwm;

pub use pwm::{PinState, PwmPin};
