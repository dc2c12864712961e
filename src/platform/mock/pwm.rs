//! Mock PWM pin implementation for testing
//!
//! Tracks pin state (duty cycle, start count) for test verification. Handles
//! are cheap clones over shared inner state, so a test can keep one handle
//! while a controller owns another.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::platform::{
    error::{PlatformError, PwmError},
    traits::{PinState, PwmPin},
    Result,
};

#[derive(Debug)]
struct MockPwmState {
    duty_cycle: f32,
    state: PinState,
    start_count: u32,
}

/// Mock PWM pin.
///
/// Validates duty-cycle writes the way a real driver would and records how
/// many times the pin was started.
#[derive(Debug, Clone)]
pub struct MockPwmPin {
    inner: Arc<Mutex<MockPwmState>>,
}

impl MockPwmPin {
    /// Create a new mock pin in the not-started state.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockPwmState {
                duty_cycle: 0.0,
                state: PinState::NotStarted,
                start_count: 0,
            })),
        }
    }

    /// Create a mock pin that reports as already started.
    pub fn started() -> Self {
        let pin = Self::new();
        pin.inner.lock().state = PinState::Started;
        pin
    }

    /// Number of times `start` was invoked.
    pub fn start_count(&self) -> u32 {
        self.inner.lock().start_count
    }
}

impl Default for MockPwmPin {
    fn default() -> Self {
        Self::new()
    }
}

impl PwmPin for MockPwmPin {
    fn start(&mut self) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.start_count += 1;
        inner.state = PinState::Started;
        Ok(())
    }

    fn set_duty_cycle(&mut self, duty_cycle: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&duty_cycle) {
            return Err(PlatformError::Pwm(PwmError::InvalidDutyCycle));
        }
        self.inner.lock().duty_cycle = duty_cycle;
        Ok(())
    }

    fn duty_cycle(&self) -> f32 {
        self.inner.lock().duty_cycle
    }

    fn state(&self) -> PinState {
        self.inner.lock().state
    }
}
