//! Shared drive-loop state

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

/// Latest-target slot shared between a producer context and the drive task.
///
/// A single atomic register, not a queue: only the newest target matters and
/// a superseded value is simply never emitted. Relaxed ordering is enough —
/// the drive loop only needs eventual visibility within one iteration.
#[derive(Debug)]
pub struct DriveState {
    target: AtomicI32,
    running: AtomicBool,
}

impl DriveState {
    /// Create drive state with an initial target pulse, in the running state.
    pub fn new(initial_pulse: i32) -> Self {
        Self {
            target: AtomicI32::new(initial_pulse),
            running: AtomicBool::new(true),
        }
    }

    /// Store a new target pulse code.
    pub fn set_target(&self, pulse: i32) {
        self.target.store(pulse, Ordering::Relaxed);
    }

    /// Read the current target pulse code.
    pub fn target(&self) -> i32 {
        self.target.load(Ordering::Relaxed)
    }

    /// Whether the drive loop should keep emitting.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Signal the drive loop to stop at its next iteration. One-way: a
    /// stopped actuator is rebuilt, never restarted.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }
}
