//! Platform abstraction layer
//!
//! Defines the PWM pin interface that hardware drivers must provide, plus a
//! mock implementation for tests and dry runs. The actuation subsystem only
//! ever talks to hardware through [`traits::PwmPin`].

pub mod error;
pub mod mock;
pub mod traits;

pub use error::{PlatformError, PwmError};

/// Result type for platform operations.
pub type Result<T> = core::result::Result<T, PlatformError>;
