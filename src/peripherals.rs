//! Peripherals.

use log::info;

use crate::{
    adi::{AdiPort, DigitalOutput, DigitalOutputError, Pneumatic},
    competition::FieldControl,
    config::{
        DESCORE_WING_PORT, FLYWHEEL, INTAKE, LEFT_FRONT, LEFT_REAR, RIGHT_FRONT, RIGHT_REAR,
        SCOOP_PORT, SETUP_SETTLE,
    },
    controller::{Controller, Screen},
    drive::Drivetrain,
    error::Error,
    mechanism::Mechanism,
    motor::{Motor, MotorConfig, MotorError},
    rtos::Clock,
};

/// The hardware layer: hands out device handles and reports field control.
///
/// The robot binary implements this on top of the brain's driver library;
/// the control code only ever sees the associated types through their
/// traits.
pub trait Platform {
    /// Smart motor handle.
    type Motor: Motor;
    /// Three-wire digital output handle.
    type DigitalOut: DigitalOutput;
    /// Primary controller.
    type Controller: Controller;
    /// Controller screen.
    type Screen: Screen;
    /// Time source and sleep primitive.
    type Clock: Clock;
    /// Competition status source.
    type Field: FieldControl;

    /// Configures a smart port as a motor.
    fn motor(&mut self, config: MotorConfig) -> Result<Self::Motor, MotorError>;

    /// Configures a three-wire port as a digital output.
    fn digital_out(&mut self, port: AdiPort) -> Result<Self::DigitalOut, DigitalOutputError>;

    /// The primary controller.
    fn controller(&mut self) -> Self::Controller;

    /// The primary controller's screen.
    fn screen(&mut self) -> Self::Screen;

    /// The system clock.
    fn clock(&mut self) -> Self::Clock;

    /// Field control.
    fn field(&mut self) -> Self::Field;
}

/// Every device on the robot, wired per [`config`](crate::config).
pub struct Peripherals<P: Platform> {
    /// Four-motor drivetrain.
    pub drivetrain: Drivetrain<P::Motor>,
    /// Intake and flywheel.
    pub mechanism: Mechanism<P::Motor>,
    /// Scoop cylinder.
    pub scoop: Pneumatic<P::DigitalOut>,
    /// Descore wing cylinder.
    pub descore_wing: Pneumatic<P::DigitalOut>,
    /// Primary controller.
    pub controller: P::Controller,
    /// Primary controller's screen.
    pub screen: P::Screen,
    /// System clock.
    pub clock: P::Clock,
    /// Field control.
    pub field: P::Field,
}

impl<P: Platform> Peripherals<P> {
    /// Configures every device, then waits [`SETUP_SETTLE`] for them to come
    /// up.
    pub fn take(platform: &mut P) -> Result<Self, Error> {
        let drivetrain = Drivetrain::new(
            [platform.motor(LEFT_FRONT)?, platform.motor(LEFT_REAR)?],
            [platform.motor(RIGHT_FRONT)?, platform.motor(RIGHT_REAR)?],
        );
        let mechanism = Mechanism::new(platform.motor(INTAKE)?, platform.motor(FLYWHEEL)?);
        let scoop = Pneumatic::new("scoop", platform.digital_out(SCOOP_PORT)?);
        let descore_wing = Pneumatic::new("descore wing", platform.digital_out(DESCORE_WING_PORT)?);

        let peripherals = Self {
            drivetrain,
            mechanism,
            scoop,
            descore_wing,
            controller: platform.controller(),
            screen: platform.screen(),
            clock: platform.clock(),
            field: platform.field(),
        };
        peripherals.clock.delay(SETUP_SETTLE);
        info!("peripherals ready");
        Ok(peripherals)
    }

    /// Commands every motor to stop. Cylinders keep their state.
    pub fn stop_all(&mut self) {
        self.drivetrain.stop();
        self.mechanism.stop();
    }
}
