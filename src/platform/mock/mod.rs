//! Mock platform implementations for testing

pub mod pwm;

pub use pwm::MockPwmPin;
