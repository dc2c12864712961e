//! Integration tests for the PWM actuation stack

use std::collections::HashSet;
use std::sync::atomic::{AtomicI32, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use rc_actuation::{
    ActuationError, MockPwmPin, PulseController, PulseEmitter, PwmPin, SteeringConfig,
    SteeringServo, ThrottleConfig, ThrottleEsc,
};

/// Emitter that records every pulse it is asked to send, in order.
#[derive(Clone, Default)]
struct RecordingEmitter {
    pulses: Arc<Mutex<Vec<i32>>>,
}

impl RecordingEmitter {
    fn new() -> Self {
        Self::default()
    }

    fn recorded(&self) -> Vec<i32> {
        self.pulses.lock().clone()
    }
}

impl PulseEmitter for RecordingEmitter {
    fn set_pulse(&mut self, pulse: i32) -> rc_actuation::Result<()> {
        self.pulses.lock().push(pulse);
        Ok(())
    }
}

/// Emitter that tracks the distinct pulses seen and how many were emitted,
/// without unbounded storage — safe under a spinning drive loop.
#[derive(Clone, Default)]
struct SamplingEmitter {
    seen: Arc<Mutex<HashSet<i32>>>,
    count: Arc<AtomicU64>,
    last: Arc<AtomicI32>,
}

impl SamplingEmitter {
    fn new() -> Self {
        Self::default()
    }

    fn seen(&self) -> HashSet<i32> {
        self.seen.lock().clone()
    }

    fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    fn last(&self) -> i32 {
        self.last.load(Ordering::Relaxed)
    }
}

impl PulseEmitter for SamplingEmitter {
    fn set_pulse(&mut self, pulse: i32) -> rc_actuation::Result<()> {
        self.seen.lock().insert(pulse);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.last.store(pulse, Ordering::Relaxed);
        Ok(())
    }
}

fn steering_config() -> SteeringConfig {
    SteeringConfig {
        left_pulse: 1000,
        right_pulse: 2000,
    }
}

fn throttle_config() -> ThrottleConfig {
    ThrottleConfig {
        max_pulse: 500,
        min_pulse: 220,
        zero_pulse: 370,
    }
}

#[tokio::test]
async fn esc_calibration_sends_endpoints_in_order() {
    let emitter = RecordingEmitter::new();
    let esc = ThrottleEsc::new(emitter.clone(), throttle_config())
        .await
        .unwrap();

    assert_eq!(emitter.recorded(), vec![500, 220, 370]);
    assert_eq!(esc.target_pulse(), 370);
}

#[tokio::test]
async fn throttle_endpoints_use_the_correct_half_segment() {
    let emitter = RecordingEmitter::new();
    let esc = ThrottleEsc::new(emitter.clone(), throttle_config())
        .await
        .unwrap();

    for throttle in [1.0, -1.0, 0.5, -0.5, 0.0] {
        esc.run(throttle).unwrap();
    }

    let driven = &emitter.recorded()[3..];
    assert_eq!(driven, &[500, 220, 435, 295, 370]);
}

#[test]
fn steering_endpoints_reach_the_pin() {
    let pin = MockPwmPin::new();
    let observer = pin.clone();
    let controller = PulseController::new(pin);
    let servo = SteeringServo::new(controller, steering_config()).unwrap();

    servo.run(-1.0).unwrap();
    assert_eq!(observer.duty_cycle(), 1000.0 / 4095.0);

    servo.run(1.0).unwrap();
    assert_eq!(observer.duty_cycle(), 2000.0 / 4095.0);

    servo.run(0.0).unwrap();
    assert_eq!(observer.duty_cycle(), 1500.0 / 4095.0);
}

#[test]
fn inverted_controller_flips_duties_through_the_stack() {
    let pin = MockPwmPin::new();
    let observer = pin.clone();
    let controller = PulseController::with_correction(pin, 1.0, true);
    let servo = SteeringServo::new(
        controller,
        SteeringConfig {
            left_pulse: 0,
            right_pulse: 4095,
        },
    )
    .unwrap();

    servo.run(-1.0).unwrap();
    assert_eq!(observer.duty_cycle(), 1.0);

    servo.run(1.0).unwrap();
    assert_eq!(observer.duty_cycle(), 0.0);
}

#[test]
fn hardware_starts_once_across_repeated_drives() {
    let pin = MockPwmPin::new();
    let observer = pin.clone();
    let controller = PulseController::new(pin);
    let servo = SteeringServo::new(controller, steering_config()).unwrap();

    for _ in 0..10 {
        servo.drive_once().unwrap();
    }
    assert_eq!(observer.start_count(), 1);
}

#[test]
fn out_of_range_target_fails_the_drive() {
    let pin = MockPwmPin::new();
    let controller = PulseController::new(pin);
    let servo = SteeringServo::new(controller, steering_config()).unwrap();

    // angle 10.0 extrapolates far past the 12-bit range
    servo.set_target(10.0);
    assert_eq!(servo.target_pulse(), 6500);
    assert!(matches!(
        servo.drive_once(),
        Err(ActuationError::PulseOutOfRange(6500))
    ));
}

#[tokio::test]
async fn out_of_range_target_ends_continuous_drive() {
    let pin = MockPwmPin::new();
    let controller = PulseController::new(pin);
    let servo = SteeringServo::new(controller, steering_config()).unwrap();

    servo.set_target(10.0);
    let result = servo.continuous_drive().await;
    assert!(matches!(result, Err(ActuationError::PulseOutOfRange(_))));
}

#[tokio::test]
async fn steering_shutdown_twice_is_idempotent() {
    let emitter = SamplingEmitter::new();
    let servo = SteeringServo::new(emitter, steering_config()).unwrap();

    servo.set_target(1.0);
    servo.shutdown().await;
    assert!(!servo.is_running());
    assert_eq!(servo.target_pulse(), 1500);

    servo.shutdown().await;
    assert!(!servo.is_running());
}

#[tokio::test]
async fn throttle_shutdown_twice_is_idempotent() {
    let emitter = RecordingEmitter::new();
    let esc = ThrottleEsc::new(emitter.clone(), throttle_config())
        .await
        .unwrap();

    esc.set_target(0.7);
    esc.shutdown().unwrap();
    assert!(!esc.is_running());
    assert_eq!(esc.target_pulse(), 370);

    esc.shutdown().unwrap();
    assert!(!esc.is_running());

    // both shutdowns drove the zero pulse
    let driven = &emitter.recorded()[3..];
    assert_eq!(driven, &[370, 370]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn drive_loop_refreshes_signal_between_updates() {
    let emitter = SamplingEmitter::new();
    let servo = SteeringServo::new(emitter.clone(), steering_config()).unwrap();

    let drive = {
        let servo = servo.clone();
        tokio::spawn(async move { servo.continuous_drive().await })
    };

    // no target updates at all: the loop must keep re-emitting the center
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    servo.shutdown().await;
    drive.await.unwrap().unwrap();

    assert!(emitter.count() > 1, "drive loop should re-emit continuously");
    assert_eq!(emitter.seen(), HashSet::from([1500]));
    assert_eq!(emitter.last(), 1500);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn drive_loop_only_emits_produced_targets() {
    let emitter = SamplingEmitter::new();
    let servo = SteeringServo::new(emitter.clone(), steering_config()).unwrap();

    let drive = {
        let servo = servo.clone();
        tokio::spawn(async move { servo.continuous_drive().await })
    };

    let angles = [-1.0_f64, -0.5, 0.0, 0.5, 1.0];
    let producer = {
        let servo = servo.clone();
        tokio::spawn(async move {
            for i in 0..1000 {
                servo.set_target(angles[i % angles.len()]);
                tokio::task::yield_now().await;
            }
        })
    };

    producer.await.unwrap();
    servo.shutdown().await;
    drive.await.unwrap().unwrap();

    // every pulse the drive loop observed is one the producer wrote (or the
    // initial center): targets are never torn or interpolated
    let valid = HashSet::from([1000, 1250, 1500, 1750, 2000]);
    let seen = emitter.seen();
    assert!(
        seen.is_subset(&valid),
        "unexpected pulses observed: {:?}",
        seen.difference(&valid).collect::<Vec<_>>()
    );
    assert!(emitter.count() > 0);
}
