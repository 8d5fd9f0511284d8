//! Driver control.
//!
//! Every tick reads a fresh [`TeleopFrame`], maps it to a [`TeleopCommand`]
//! and writes that straight to the actuators. Nothing here blocks or waits
//! for completion, and nothing carries over from one tick to the next.

use log::{debug, info};
use uom::si::{f64::Ratio, ratio::percent};

use crate::{
    competition::{FieldControl, Mode},
    config::{
        DEFAULT_SPEED, FORWARD_AXIS, FULL_SPEED, FULL_SPEED_BUTTON, INTAKE_FORWARD_BUTTON,
        INTAKE_REVERSE_BUTTON, MECHANISM_POWER, MECHANISM_REDUCED_POWER, REDUCED_POWER_BUTTON,
        SCOOP_ENGAGE_BUTTON, SCOOP_RELEASE_BUTTON, SLOW_SPEED, SLOW_SPEED_BUTTON, TICK, TURN_AXIS,
        WING_ENGAGE_BUTTON, WING_RELEASE_BUTTON,
    },
    controller::{Axis, Button, ButtonSet, Controller},
    mechanism::MechanismMode,
    peripherals::{Peripherals, Platform},
    rtos::Loop,
};

/// The controller state for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TeleopFrame {
    /// Throttle, percent.
    pub forward: i8,
    /// Steering, percent.
    pub turn: i8,
    /// Held buttons.
    pub buttons: ButtonSet,
}

impl TeleopFrame {
    /// Samples the controller. Failed reads count as centred sticks and
    /// released buttons.
    pub fn read(controller: &(impl Controller + ?Sized)) -> Self {
        let axis = |axis: Axis| {
            controller.axis(axis).unwrap_or_else(|err| {
                debug!("reading {:?}: {}", axis, err);
                0
            })
        };
        Self {
            forward: axis(FORWARD_AXIS),
            turn: axis(TURN_AXIS),
            buttons: controller.buttons().unwrap_or_else(|err| {
                debug!("reading buttons: {}", err);
                ButtonSet::empty()
            }),
        }
    }
}

/// What one tick writes to the actuators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TeleopCommand {
    /// Left side velocity, percent.
    pub left: f64,
    /// Right side velocity, percent.
    pub right: f64,
    /// Intake/flywheel mode.
    pub mechanism: MechanismMode,
    /// Intake/flywheel power, percent.
    pub mechanism_power: f64,
    /// Scoop level to write, if any.
    pub scoop: Option<bool>,
    /// Descore wing level to write, if any.
    pub descore_wing: Option<bool>,
}

impl From<&TeleopFrame> for TeleopCommand {
    fn from(frame: &TeleopFrame) -> Self {
        let b = frame.buttons;
        let (left, right) = arcade_mix(
            f64::from(frame.forward),
            f64::from(frame.turn),
            speed_modifier(b),
        );
        Self {
            left,
            right,
            mechanism: mechanism_mode(b),
            mechanism_power: mechanism_power(b),
            scoop: pneumatic_level(b, SCOOP_ENGAGE_BUTTON, SCOOP_RELEASE_BUTTON),
            descore_wing: pneumatic_level(b, WING_ENGAGE_BUTTON, WING_RELEASE_BUTTON),
        }
    }
}

/// Drive multiplier. Full speed wins over slow speed, which wins over the
/// default; the tiers never combine.
pub fn speed_modifier(buttons: ButtonSet) -> f64 {
    if buttons.held(FULL_SPEED_BUTTON) {
        FULL_SPEED
    } else if buttons.held(SLOW_SPEED_BUTTON) {
        SLOW_SPEED
    } else {
        DEFAULT_SPEED
    }
}

/// Arcade mixing: `(forward + turn, forward - turn)`, scaled. Values outside
/// ±100 are left for the motor layer to saturate.
pub fn arcade_mix(forward: f64, turn: f64, speed_modifier: f64) -> (f64, f64) {
    (
        (forward + turn) * speed_modifier,
        (forward - turn) * speed_modifier,
    )
}

/// Intake/flywheel mode from the two intake buttons.
pub fn mechanism_mode(buttons: ButtonSet) -> MechanismMode {
    match (
        buttons.held(INTAKE_REVERSE_BUTTON),
        buttons.held(INTAKE_FORWARD_BUTTON),
    ) {
        (true, true) => MechanismMode::Reverse,
        (true, false) => MechanismMode::IntakeReverse,
        (false, true) => MechanismMode::Forward,
        (false, false) => MechanismMode::Stopped,
    }
}

/// Intake/flywheel power, percent.
pub fn mechanism_power(buttons: ButtonSet) -> f64 {
    if buttons.held(REDUCED_POWER_BUTTON) {
        MECHANISM_REDUCED_POWER
    } else {
        MECHANISM_POWER
    }
}

/// Level to write to a cylinder: `Some(true)` while `engage` is held (it wins
/// over `release`), `Some(false)` while only `release` is held.
pub fn pneumatic_level(buttons: ButtonSet, engage: Button, release: Button) -> Option<bool> {
    if buttons.held(engage) {
        Some(true)
    } else if buttons.held(release) {
        Some(false)
    } else {
        None
    }
}

/// Samples the controller once and writes the result to every actuator.
pub fn tick<P: Platform>(peripherals: &mut Peripherals<P>) -> TeleopCommand {
    let frame = TeleopFrame::read(&peripherals.controller);
    let cmd = TeleopCommand::from(&frame);

    peripherals.drivetrain.arcade(
        Ratio::new::<percent>(cmd.left),
        Ratio::new::<percent>(cmd.right),
    );
    peripherals
        .mechanism
        .run(cmd.mechanism, Ratio::new::<percent>(cmd.mechanism_power));
    if let Some(engaged) = cmd.scoop {
        peripherals.scoop.set(engaged);
    }
    if let Some(engaged) = cmd.descore_wing {
        peripherals.descore_wing.set(engaged);
    }
    cmd
}

/// Runs [`tick`] every [`TICK`] for as long as field control stays in driver
/// control.
pub fn run<P: Platform>(peripherals: &mut Peripherals<P>) {
    let mut l = Loop::new(&peripherals.clock, TICK);
    info!("driver control, {}ms ticks", l.period().as_millis());
    while peripherals.field.status().mode() == Mode::Driver {
        tick(peripherals);
        l.delay(&peripherals.clock);
    }
    info!("driver control ended");
}
