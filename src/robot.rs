//! Entry points for the competition scheduler.

use log::{info, warn};

use crate::{
    autonomous::{Sequencer, Step, DRIVE_FORWARD},
    competition::{CompetitionStatus, Mode},
    controller::print_line,
    error::Error,
    opcontrol,
    peripherals::{Peripherals, Platform},
};

/// A trait representing a competition-ready VEX Robot.
pub trait Robot {
    /// Runs during the autonomous period.
    fn autonomous(&mut self) {
        info!("autonomous");
    }

    /// Runs during the opcontrol period.
    fn opcontrol(&mut self) {
        info!("opcontrol");
    }

    /// Runs when the robot is disabled.
    fn disabled(&mut self) {
        info!("disabled");
    }
}

/// Competition wrapper: the scheduler hands it field-control status and it
/// invokes the matching entry point. It never picks a mode on its own.
pub struct Competition<R: Robot> {
    robot: R,
}

impl<R: Robot> Competition<R> {
    /// Wraps the robot, installing the logger first when the `logging`
    /// feature is on.
    pub fn new(robot: R) -> Self {
        #[cfg(feature = "logging")]
        if let Err(err) = crate::logger::init_logger(log::STATIC_MAX_LEVEL) {
            libc_print::libc_eprintln!("Failed to initialize logging: {:?}", err);
        }
        Self { robot }
    }

    /// Runs the entry point for `status` to completion and reports which one
    /// it was.
    pub fn dispatch(&mut self, status: CompetitionStatus) -> Mode {
        let mode = status.mode();
        match mode {
            Mode::Autonomous => self.robot.autonomous(),
            Mode::Driver => self.robot.opcontrol(),
            Mode::Disabled => self.robot.disabled(),
        }
        mode
    }

    /// The wrapped robot.
    pub fn robot(&self) -> &R {
        &self.robot
    }
}

/// The competition robot: its devices and its autonomous routine.
pub struct Bot<P: Platform> {
    peripherals: Peripherals<P>,
    routine: &'static [Step],
}

impl<P: Platform> Bot<P> {
    /// Configures the hardware and selects [`DRIVE_FORWARD`] as the routine.
    pub fn new(platform: &mut P) -> Result<Self, Error> {
        Ok(Self::with_routine(
            Peripherals::take(platform)?,
            DRIVE_FORWARD,
        ))
    }

    /// A robot running a custom routine.
    pub fn with_routine(peripherals: Peripherals<P>, routine: &'static [Step]) -> Self {
        Self {
            peripherals,
            routine,
        }
    }

    /// The devices.
    pub fn peripherals(&mut self) -> &mut Peripherals<P> {
        &mut self.peripherals
    }
}

impl<P: Platform> Robot for Bot<P> {
    fn autonomous(&mut self) {
        info!("autonomous");
        if let Err(failure) = Sequencer::new(self.routine).run(&mut self.peripherals) {
            warn!("autonomous ended early: {}", failure);
        }
    }

    fn opcontrol(&mut self) {
        print_line(&mut self.peripherals.screen, 0, "driver");
        opcontrol::run(&mut self.peripherals);
    }

    fn disabled(&mut self) {
        info!("disabled");
        self.peripherals.stop_all();
    }
}
