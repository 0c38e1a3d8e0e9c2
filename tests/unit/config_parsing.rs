//! Unit tests for TOML configuration parsing.

use hbridge_stepper::config::{parse_config, SystemConfig};
use hbridge_stepper::{Microsteps, StepInterval};

/// Test parsing a fully specified motor.
#[test]
fn test_parse_motor_config() {
    let toml_str = r#"
[motors.pan]
name = "pan_axis"
invert_direction = true
microsteps = 2
step_interval_ns = 2000000
has_enable_line = true
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let motor = config.motor("pan").expect("Motor not found");

    assert_eq!(motor.name.as_str(), "pan_axis");
    assert!(motor.invert_direction);
    assert_eq!(motor.microsteps, Microsteps::HALF);
    assert_eq!(motor.step_interval_ns, Some(2_000_000));
    assert!(motor.has_enable_line);
    assert_eq!(
        motor.initial_step_interval(),
        Ok(Some(StepInterval::from_ticks(2_000_000)))
    );
}

/// Test that optional fields fall back to defaults.
#[test]
fn test_defaults_for_optional_fields() {
    let toml_str = r#"
[motors.m]
name = "bare"
"#;

    let config = parse_config(toml_str).expect("Failed to parse config");
    let motor = config.motor("m").expect("Motor not found");

    assert!(!motor.invert_direction);
    assert_eq!(motor.microsteps, Microsteps::FULL);
    assert_eq!(motor.initial_step_interval(), Ok(None));
    assert!(!motor.has_enable_line);
}

/// Test a step rate converting into an interval.
#[test]
fn test_parse_step_rate() {
    let toml_str = r#"
[motors.tilt]
name = "tilt_axis"
steps_per_second = 500.0
"#;

    let config = parse_config(toml_str).expect("Failed to parse config");
    let motor = config.motor("tilt").expect("Motor not found");

    assert_eq!(
        motor.initial_step_interval(),
        Ok(Some(StepInterval::from_ticks(2_000_000)))
    );
}

/// Test parsing several motors and keeping their order.
#[test]
fn test_parse_multiple_motors() {
    let toml_str = r#"
[motors.x]
name = "x_axis"

[motors.y]
name = "y_axis"
microsteps = 2
"#;

    let config = parse_config(toml_str).expect("Failed to parse config");
    let names: Vec<&str> = config.motor_names().collect();

    assert_eq!(names, vec!["x", "y"]);
    assert!(config.motor("z").is_none());
}
