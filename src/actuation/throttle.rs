//! Throttle ESC wrapper
//!
//! Converts throttle values in [-1.0, +1.0] to PWM pulses with independent
//! forward and reverse ranges around a true zero pulse, calibrates the ESC's
//! pulse endpoints at construction, and keeps the signal alive between
//! commands.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::actuation::controller::PulseEmitter;
use crate::actuation::pulse::{map_range, PULSE_MAX};
use crate::actuation::state::DriveState;
use crate::error::{ActuationError, Result};

/// Throttle at full reverse.
pub const MIN_THROTTLE: f64 = -1.0;
/// Throttle at full forward.
pub const MAX_THROTTLE: f64 = 1.0;

/// Hold time on each calibration endpoint pulse.
const CALIBRATION_ENDPOINT_HOLD: Duration = Duration::from_millis(10);
/// Hold time on the zero pulse while the ESC arms.
const CALIBRATION_ARM_HOLD: Duration = Duration::from_secs(1);

/// Throttle ESC calibration.
///
/// Forward and reverse ranges may differ in width around the zero pulse.
#[derive(Debug, Clone, Copy)]
pub struct ThrottleConfig {
    /// Pulse code at full forward.
    pub max_pulse: i32,
    /// Pulse code at full reverse.
    pub min_pulse: i32,
    /// Pulse code at stop.
    pub zero_pulse: i32,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_pulse: 500,
            min_pulse: 220,
            zero_pulse: 370,
        }
    }
}

/// Wrapper over a pulse emitter that converts throttle values to PWM pulses.
///
/// Handles are cheap clones over shared state: one clone runs
/// [`continuous_drive`](Self::continuous_drive) on its own task while the
/// producer keeps another for [`set_target`](Self::set_target).
pub struct ThrottleEsc<E: PulseEmitter> {
    emitter: Arc<Mutex<E>>,
    state: Arc<DriveState>,
    config: ThrottleConfig,
}

impl<E: PulseEmitter> Clone for ThrottleEsc<E> {
    fn clone(&self) -> Self {
        Self {
            emitter: Arc::clone(&self.emitter),
            state: Arc::clone(&self.state),
            config: self.config,
        }
    }
}

impl<E: PulseEmitter> ThrottleEsc<E> {
    /// Create a throttle ESC over the given emitter and calibrate it.
    ///
    /// Calibration sends `max_pulse`, `min_pulse`, then `zero_pulse` with
    /// the holds many ESCs require to learn their pulse endpoints, blocking
    /// the constructing context for about a second. The target starts at
    /// `zero_pulse`.
    ///
    /// # Errors
    ///
    /// [`ActuationError::Config`] when a configured endpoint is not a valid
    /// 12-bit pulse code; hardware errors from the calibration pulses
    /// propagate unchanged.
    pub async fn new(emitter: E, config: ThrottleConfig) -> Result<Self> {
        for pulse in [config.max_pulse, config.min_pulse, config.zero_pulse] {
            if !(0..=PULSE_MAX).contains(&pulse) {
                return Err(ActuationError::Config(format!(
                    "throttle endpoints must be 12-bit pulse codes, got max={} min={} zero={}",
                    config.max_pulse, config.min_pulse, config.zero_pulse
                )));
            }
        }

        let emitter = Arc::new(Mutex::new(emitter));

        // Endpoint learning sequence: order and holds matter to the ESC.
        info!(
            max_pulse = config.max_pulse,
            min_pulse = config.min_pulse,
            zero_pulse = config.zero_pulse,
            "calibrating ESC"
        );
        emitter.lock().set_pulse(config.max_pulse)?;
        sleep(CALIBRATION_ENDPOINT_HOLD).await;
        emitter.lock().set_pulse(config.min_pulse)?;
        sleep(CALIBRATION_ENDPOINT_HOLD).await;
        emitter.lock().set_pulse(config.zero_pulse)?;
        sleep(CALIBRATION_ARM_HOLD).await;

        info!("throttle ESC ready");
        Ok(Self {
            emitter,
            state: Arc::new(DriveState::new(config.zero_pulse)),
            config,
        })
    }

    /// Store a new throttle target. Non-blocking; hardware is untouched
    /// until the next drive.
    ///
    /// Positive throttle interpolates over the forward range
    /// (`zero_pulse..max_pulse`), zero and negative over the reverse range
    /// (`min_pulse..zero_pulse`). Values outside [-1.0, +1.0] are not
    /// clamped.
    pub fn set_target(&self, throttle: f64) {
        let pulse = if throttle > 0.0 {
            map_range(
                throttle,
                0.0,
                MAX_THROTTLE,
                self.config.zero_pulse as f64,
                self.config.max_pulse as f64,
            )
        } else {
            map_range(
                throttle,
                MIN_THROTTLE,
                0.0,
                self.config.min_pulse as f64,
                self.config.zero_pulse as f64,
            )
        };
        debug!(throttle, pulse, "new throttle target");
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
    pub fn run(&self, throttle: f64) -> Result<()> {
        self.set_target(throttle);
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

    /// Stop the vehicle and the drive loop.
    ///
    /// Sets the target to throttle 0 and drives it once synchronously —
    /// the zero mapping is the safe stop state, so no grace period is
    /// needed. The drive loop is signalled to stop even if that final write
    /// fails. Idempotent.
    pub fn shutdown(&self) -> Result<()> {
        self.set_target(0.0);
        let result = self.drive_once();
        self.state.stop();
        info!("throttle ESC stopped");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuation::controller::NullEmitter;

    async fn esc() -> ThrottleEsc<NullEmitter> {
        ThrottleEsc::new(
            NullEmitter,
            ThrottleConfig {
                max_pulse: 500,
                min_pulse: 220,
                zero_pulse: 370,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_target_starts_at_zero_pulse() {
        assert_eq!(esc().await.target_pulse(), 370);
    }

    #[tokio::test]
    async fn test_set_target_two_segment_mapping() {
        let esc = esc().await;

        esc.set_target(1.0);
        assert_eq!(esc.target_pulse(), 500);

        esc.set_target(-1.0);
        assert_eq!(esc.target_pulse(), 220);

        esc.set_target(0.0);
        assert_eq!(esc.target_pulse(), 370);

        // Forward half-segment: zero..max
        esc.set_target(0.5);
        assert_eq!(esc.target_pulse(), 435);

        // Reverse half-segment: min..zero
        esc.set_target(-0.5);
        assert_eq!(esc.target_pulse(), 295);
    }

    #[tokio::test]
    async fn test_rejects_invalid_endpoints() {
        let result = ThrottleEsc::new(
            NullEmitter,
            ThrottleConfig {
                max_pulse: 4096,
                min_pulse: 220,
                zero_pulse: 370,
            },
        )
        .await;
        assert!(matches!(result, Err(ActuationError::Config(_))));
    }

    #[tokio::test]
    async fn test_shutdown_zeroes_and_stops() {
        let esc = esc().await;
        esc.set_target(1.0);

        esc.shutdown().unwrap();
        assert_eq!(esc.target_pulse(), 370);
        assert!(!esc.is_running());

        // continuous_drive on a stopped ESC returns immediately
        esc.continuous_drive().await.unwrap();
    }
}
