//! Steering servo wrapper
//!
//! Converts steering angles in [-1.0, +1.0] to PWM pulses over a calibrated
//! left/right pulse range and keeps the servo signal alive between commands.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::actuation::controller::PulseEmitter;
use crate::actuation::pulse::{map_range, PULSE_MAX};
use crate::actuation::state::DriveState;
use crate::error::{ActuationError, Result};

/// Steering angle at full left lock.
pub const LEFT_ANGLE: f64 = -1.0;
/// Steering angle at full right lock.
pub const RIGHT_ANGLE: f64 = 1.0;

/// Shutdown grace period: long enough for the drive loop to apply the
/// centered target at least once before it is told to stop.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(300);

/// Steering servo calibration.
///
/// Pulse codes for the two steering endpoints; the range may be decreasing
/// for a servo mounted in reverse.
#[derive(Debug, Clone, Copy)]
pub struct SteeringConfig {
    /// Pulse code at full left lock.
    pub left_pulse: i32,
    /// Pulse code at full right lock.
    pub right_pulse: i32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            left_pulse: 460,
            right_pulse: 290,
        }
    }
}

/// Wrapper over a pulse emitter that converts steering angles to PWM pulses.
///
/// Handles are cheap clones over shared state: one clone runs
/// [`continuous_drive`](Self::continuous_drive) on its own task while the
/// producer keeps another for [`set_target`](Self::set_target).
pub struct SteeringServo<E: PulseEmitter> {
    emitter: Arc<Mutex<E>>,
    state: Arc<DriveState>,
    config: SteeringConfig,
}

impl<E: PulseEmitter> Clone for SteeringServo<E> {
    fn clone(&self) -> Self {
        Self {
            emitter: Arc::clone(&self.emitter),
            state: Arc::clone(&self.state),
            config: self.config,
        }
    }
}

impl<E: PulseEmitter> SteeringServo<E> {
    /// Create a steering servo over the given emitter.
    ///
    /// The target starts at the angle-0 (straight ahead) pulse.
    ///
    /// # Errors
    ///
    /// [`ActuationError::Config`] when a configured endpoint is not a valid
    /// 12-bit pulse code.
    pub fn new(emitter: E, config: SteeringConfig) -> Result<Self> {
        if !(0..=PULSE_MAX).contains(&config.left_pulse)
            || !(0..=PULSE_MAX).contains(&config.right_pulse)
        {
            return Err(ActuationError::Config(format!(
                "steering endpoints must be 12-bit pulse codes, got left={} right={}",
                config.left_pulse, config.right_pulse
            )));
        }

        let center = map_range(
            0.0,
            LEFT_ANGLE,
            RIGHT_ANGLE,
            config.left_pulse as f64,
            config.right_pulse as f64,
        );
        info!(
            left_pulse = config.left_pulse,
            right_pulse = config.right_pulse,
            "steering servo ready"
        );
        Ok(Self {
            emitter: Arc::new(Mutex::new(emitter)),
            state: Arc::new(DriveState::new(center)),
            config,
        })
    }

    /// Store a new steering target. Non-blocking; hardware is untouched
    /// until the next drive.
    ///
    /// Angles outside [-1.0, +1.0] are not clamped: they extrapolate to
    /// out-of-range pulse targets that the next drive will reject.
    pub fn set_target(&self, angle: f64) {
        let pulse = map_range(
            angle,
            LEFT_ANGLE,
            RIGHT_ANGLE,
            self.config.left_pulse as f64,
            self.config.right_pulse as f64,
        );
        debug!(angle, pulse, "new steering target");
        self.state.set_target(pulse);
    }

    /// Current target pulse code.
    pub fn target_pulse(&self) -> i32 {
        self.state.target()
    }

    /// Whether the drive loop is still being driven.
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Send the current target pulse to the emitter once.
    pub fn drive_once(&self) -> Result<()> {
        self.emitter.lock().set_pulse(self.state.target())
    }

    /// Store a new target and immediately drive it once.
    pub fn run(&self, angle: f64) -> Result<()> {
        self.set_target(angle);
        self.drive_once()
    }

    /// Re-emit the current target until [`shutdown`](Self::shutdown).
    ///
    /// Loops as fast as the emitter accepts writes, yielding to the
    /// scheduler between iterations; pacing is the hardware interface's
    /// concern, not ours. The first hardware error ends the loop and
    /// propagates to the owning task.
    pub async fn continuous_drive(&self) -> Result<()> {
        while self.state.is_running() {
            self.drive_once()?;
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    /// Re-center the wheels and stop the drive loop.
    ///
    /// Sets the target to angle 0, holds for a grace period so the loop
    /// applies it, then signals the loop to stop. Idempotent.
    pub async fn shutdown(&self) {
        self.set_target(0.0);
        tokio::time::sleep(SHUTDOWN_GRACE).await;
        self.state.stop();
        info!("steering servo stopped");
    }
}
