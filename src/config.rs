//! Port assignments, tuning values and the driver button map.
//!
//! Everything here is fixed at build time.

use core::time::Duration;

use crate::{
    adi::AdiPort,
    controller::{Axis, Button},
    motor::{Gearset, MotorConfig},
};

/// Front motor on the left side of the drivetrain.
pub const LEFT_FRONT: MotorConfig = MotorConfig {
    port: 1,
    gearset: Gearset::EighteenToOne,
    reversed: false,
};
/// Rear motor on the left side of the drivetrain.
pub const LEFT_REAR: MotorConfig = MotorConfig {
    port: 2,
    gearset: Gearset::EighteenToOne,
    reversed: false,
};
/// Front motor on the right side of the drivetrain.
pub const RIGHT_FRONT: MotorConfig = MotorConfig {
    port: 9,
    gearset: Gearset::EighteenToOne,
    reversed: true,
};
/// Rear motor on the right side of the drivetrain.
pub const RIGHT_REAR: MotorConfig = MotorConfig {
    port: 10,
    gearset: Gearset::EighteenToOne,
    reversed: true,
};
/// Intake and conveyor motor.
pub const INTAKE: MotorConfig = MotorConfig {
    port: 3,
    gearset: Gearset::EighteenToOne,
    reversed: false,
};
/// Flywheel motor.
pub const FLYWHEEL: MotorConfig = MotorConfig {
    port: 8,
    gearset: Gearset::SixToOne,
    reversed: true,
};

/// Solenoid of the scoop cylinder.
pub const SCOOP_PORT: AdiPort = AdiPort::A;
/// Solenoid of the descore wing cylinder.
pub const DESCORE_WING_PORT: AdiPort = AdiPort::D;

/// Pause after constructing the devices, before any command is issued.
pub const SETUP_SETTLE: Duration = Duration::from_millis(20);
/// Period of every control loop.
pub const TICK: Duration = Duration::from_millis(20);
/// Time a cylinder is given to move after its valve is switched.
pub const PNEUMATIC_SETTLE: Duration = Duration::from_millis(250);

/// Default drive velocity for autonomous moves, in percent.
pub const DRIVE_VELOCITY: f64 = 70.0;
/// Default timeout for autonomous drive moves.
pub const DRIVE_TIMEOUT: Duration = Duration::from_secs(3);
/// Default timeout for autonomous turns.
pub const TURN_TIMEOUT: Duration = Duration::from_secs(2);

/// Held during autonomous to stop the robot and end the routine.
pub const ABORT_BUTTON: Button = Button::Right;

/// Throttle stick.
pub const FORWARD_AXIS: Axis = Axis::LeftY;
/// Steering stick.
pub const TURN_AXIS: Axis = Axis::RightX;

/// Held for full drive speed. Wins over [`SLOW_SPEED_BUTTON`].
pub const FULL_SPEED_BUTTON: Button = Button::R2;
/// Held for precise, slow driving.
pub const SLOW_SPEED_BUTTON: Button = Button::R1;
/// Drive multiplier while [`FULL_SPEED_BUTTON`] is held.
pub const FULL_SPEED: f64 = 1.0;
/// Drive multiplier while [`SLOW_SPEED_BUTTON`] is held.
pub const SLOW_SPEED: f64 = 0.3;
/// Drive multiplier with no speed button held.
pub const DEFAULT_SPEED: f64 = 0.6;

/// Runs the intake in reverse. Together with [`INTAKE_FORWARD_BUTTON`] it
/// reverses the flywheel too.
pub const INTAKE_REVERSE_BUTTON: Button = Button::L1;
/// Runs the intake and flywheel forward.
pub const INTAKE_FORWARD_BUTTON: Button = Button::L2;
/// Held to drop the mechanism to [`MECHANISM_REDUCED_POWER`].
pub const REDUCED_POWER_BUTTON: Button = Button::A;
/// Mechanism power in percent.
pub const MECHANISM_POWER: f64 = 100.0;
/// Mechanism power in percent while [`REDUCED_POWER_BUTTON`] is held.
pub const MECHANISM_REDUCED_POWER: f64 = 40.0;

/// Extends the scoop. Wins over [`SCOOP_RELEASE_BUTTON`].
pub const SCOOP_ENGAGE_BUTTON: Button = Button::X;
/// Retracts the scoop.
pub const SCOOP_RELEASE_BUTTON: Button = Button::B;
/// Extends the descore wing. Wins over [`WING_RELEASE_BUTTON`].
pub const WING_ENGAGE_BUTTON: Button = Button::Up;
/// Retracts the descore wing.
pub const WING_RELEASE_BUTTON: Button = Button::Down;
