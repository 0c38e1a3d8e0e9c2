//! Error types for hbridge-stepper.
//!
//! Provides unified error handling across configuration, motion control and
//! step scheduling.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all hbridge-stepper operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motion controller rejected the request
    Motor(MotorError),
    /// Step scheduler failed to arm or cancel
    Scheduler(SchedulerError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Invalid or unsupported microstep value (H-bridge supports 1 and 2)
    InvalidMicrosteps(u16),
    /// Step interval of zero nanoseconds
    ZeroStepInterval,
    /// Step rate that is zero, negative or not finite
    InvalidStepRate(f32),
    /// Both `step_interval_ns` and `steps_per_second` were given
    ConflictingStepTiming(heapless::String<32>),
    /// Motor name not found in configuration
    MotorNotFound(heapless::String<32>),
    /// Duplicate motor name in configuration
    DuplicateMotorName(heapless::String<32>),
    /// A required line or collaborator was not provided to the builder
    MissingControlLine(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motion controller errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// Argument out of range (e.g. a zero step interval)
    InvalidArgument,
    /// Motion requested before a step interval was configured
    InvalidState,
    /// No enable line is wired
    NotSupported,
    /// Micro-step resolution not supported by an H-bridge
    UnsupportedResolution(u16),
    /// GPIO pin operation failed
    PinError,
}

/// Step scheduler errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerError {
    /// Cancellation did not take effect because the step is already running
    Busy,
    /// The underlying timer reported a failure
    Timer,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Scheduler(e) => write!(f, "Scheduler error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidMicrosteps(v) => {
                write!(f, "Invalid microsteps: {}. Valid values: 1, 2", v)
            }
            ConfigError::ZeroStepInterval => write!(f, "Step interval must be > 0 ns"),
            ConfigError::InvalidStepRate(v) => {
                write!(f, "Invalid step rate: {}. Must be a finite value > 0", v)
            }
            ConfigError::ConflictingStepTiming(name) => write!(
                f,
                "Motor '{}' sets both step_interval_ns and steps_per_second",
                name
            ),
            ConfigError::MotorNotFound(name) => write!(f, "Motor '{}' not found", name),
            ConfigError::DuplicateMotorName(name) => write!(f, "Duplicate motor name: '{}'", name),
            ConfigError::MissingControlLine(what) => write!(f, "{} is required", what),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::InvalidArgument => write!(f, "Invalid argument"),
            MotorError::InvalidState => write!(f, "Step interval not configured"),
            MotorError::NotSupported => write!(f, "No enable line wired"),
            MotorError::UnsupportedResolution(v) => {
                write!(f, "Micro-step resolution 1/{} not supported", v)
            }
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
        }
    }
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerError::Busy => write!(f, "Step already running, cancellation failed"),
            SchedulerError::Timer => write!(f, "Timer operation failed"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<SchedulerError> for Error {
    fn from(e: SchedulerError) -> Self {
        Error::Scheduler(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for SchedulerError {}
