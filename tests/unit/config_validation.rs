//! Unit tests for configuration validation.

use hbridge_stepper::config::{parse_config, validate_config, MotorConfig, SystemConfig};
use hbridge_stepper::error::{ConfigError, Error, MotorError};
use hbridge_stepper::{HBridgeStepper, ManualScheduler, Microsteps, StepInterval};

use crate::common::Recorder;

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let toml_str = r#"
[motors.a]
name = "left"
microsteps = 1
step_interval_ns = 1000000

[motors.b]
name = "right"
microsteps = 2
steps_per_second = 250.0
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert!(validate_config(&config).is_ok());
}

/// Test that resolutions finer than half step are refused.
#[test]
fn test_fine_microsteps_rejected() {
    let toml_str = r#"
[motors.a]
name = "left"
microsteps = 16
"#;

    assert!(matches!(
        parse_config(toml_str),
        Err(Error::Config(ConfigError::InvalidMicrosteps(16)))
    ));
}

/// Test that a zero interval is refused.
#[test]
fn test_zero_interval_rejected() {
    let toml_str = r#"
[motors.a]
name = "left"
step_interval_ns = 0
"#;

    assert!(matches!(
        parse_config(toml_str),
        Err(Error::Config(ConfigError::ZeroStepInterval))
    ));
}

/// Test that giving both timing forms is refused.
#[test]
fn test_conflicting_timing_rejected() {
    let toml_str = r#"
[motors.a]
name = "left"
step_interval_ns = 1000
steps_per_second = 10.0
"#;

    assert!(matches!(
        parse_config(toml_str),
        Err(Error::Config(ConfigError::ConflictingStepTiming(_)))
    ));
}

/// Test that two motors cannot share a display name.
#[test]
fn test_duplicate_display_names_rejected() {
    let toml_str = r#"
[motors.a]
name = "axis"

[motors.b]
name = "axis"
"#;

    assert!(matches!(
        parse_config(toml_str),
        Err(Error::Config(ConfigError::DuplicateMotorName(_)))
    ));
}

/// Test building a motor from a configuration entry.
#[test]
fn test_builder_applies_config() {
    let config = parse_config(
        r#"
[motors.a]
name = "feeder"
invert_direction = true
microsteps = 2
step_interval_ns = 4000
"#,
    )
    .expect("Failed to parse config");

    let motor = HBridgeStepper::builder()
        .lines(Recorder::new())
        .scheduler(ManualScheduler::new())
        .from_config(&config, "a")
        .expect("Motor not found")
        .build()
        .expect("Failed to build motor");

    assert_eq!(motor.name(), "feeder");
    assert!(motor.invert_direction());
    assert_eq!(motor.micro_step_res(), Microsteps::HALF);
    assert_eq!(
        motor.status().step_interval,
        Some(StepInterval::from_ticks(4_000))
    );
}

/// Test that an unknown motor key is reported.
#[test]
fn test_builder_unknown_motor() {
    let config = SystemConfig::default();
    let result = HBridgeStepper::<Recorder, ManualScheduler>::builder().from_config(&config, "nope");

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::MotorNotFound(_)))
    ));
}

/// Test that a configured enable line must be provided.
#[test]
fn test_builder_requires_enable_line() {
    let mut config = MotorConfig::new("clamp");
    config.has_enable_line = true;

    let missing = HBridgeStepper::builder()
        .lines(Recorder::new())
        .scheduler(ManualScheduler::new())
        .from_motor_config(&config)
        .build();
    assert!(matches!(
        missing,
        Err(Error::Config(ConfigError::MissingControlLine("enable line")))
    ));

    let motor = HBridgeStepper::builder()
        .lines(Recorder::with_enable())
        .scheduler(ManualScheduler::new())
        .from_motor_config(&config)
        .build()
        .expect("Failed to build motor");
    assert!(motor.enable().is_ok());
}

/// Test builder checks that do not come from a configuration file.
#[test]
fn test_builder_rejects_bad_settings() {
    let no_scheduler = HBridgeStepper::<Recorder, ManualScheduler>::builder()
        .lines(Recorder::new())
        .build();
    assert!(matches!(
        no_scheduler,
        Err(Error::Config(ConfigError::MissingControlLine("scheduler")))
    ));

    let quarter = HBridgeStepper::builder()
        .lines(Recorder::new())
        .scheduler(ManualScheduler::new())
        .microsteps(Microsteps::QUARTER)
        .build();
    assert!(matches!(
        quarter,
        Err(Error::Motor(MotorError::UnsupportedResolution(4)))
    ));

    let zero = HBridgeStepper::builder()
        .lines(Recorder::new())
        .scheduler(ManualScheduler::new())
        .step_interval(StepInterval::from_ticks(0))
        .build();
    assert!(matches!(
        zero,
        Err(Error::Motor(MotorError::InvalidArgument))
    ));
}

/// Test that an over-long name is cut rather than dropped.
#[test]
fn test_builder_truncates_long_name() {
    let long = "conveyor_belt_main_drive_left_side_motor";
    let motor = HBridgeStepper::builder()
        .name(long)
        .lines(Recorder::new())
        .scheduler(ManualScheduler::new())
        .build()
        .expect("Failed to build motor");

    assert_eq!(motor.name(), &long[..32]);

    let unnamed = HBridgeStepper::builder()
        .lines(Recorder::new())
        .scheduler(ManualScheduler::new())
        .build()
        .expect("Failed to build motor");
    assert_eq!(unnamed.name(), "motor");
}

/// Test that a long display name is cut to capacity.
#[test]
fn test_config_long_name_truncated() {
    let config = MotorConfig::new("a_name_well_beyond_thirty_two_bytes_long");
    assert_eq!(config.name.as_str(), "a_name_well_beyond_thirty_two_by");
}
