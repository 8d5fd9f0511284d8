//! Simulated platform for unit tests: a virtual clock, motors that finish
//! profiled moves after a configurable time, scripted controller input and
//! recorded outputs.

use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, HashSet},
    rc::Rc,
    string::String,
    time::Duration,
    vec::Vec,
};

use uom::si::{
    angle::revolution,
    f64::{Angle, Ratio},
    ratio::percent,
};

use crate::{
    adi::{AdiPort, DigitalOutput, DigitalOutputError},
    competition::{CompetitionStatus, FieldControl},
    controller::{Axis, Button, Controller, ControllerError, Screen},
    motor::{Direction, Motor, MotorConfig, MotorError},
    peripherals::{Peripherals, Platform},
    rtos::{Clock, Instant},
};

/// A command as seen by a simulated motor. Values are percent or turns,
/// rounded to six decimals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotorEvent {
    Spin(Direction, f64),
    SpinFor(Direction, f64),
    SpinTo(f64),
    SetVelocity(f64),
    Stop,
}

#[derive(Clone, Copy, Debug)]
enum Motion {
    Idle,
    Continuous,
    Profiled(Option<Instant>),
}

struct Press {
    button: Button,
    from: Instant,
    until: Option<Instant>,
}

impl Press {
    fn held_at(&self, now: Instant) -> bool {
        self.from <= now && self.until.is_none_or(|u| now < u)
    }
}

struct State {
    now: Cell<Instant>,
    default_motion_time: Cell<Option<Duration>>,
    motion_times: RefCell<HashMap<u8, Option<Duration>>>,
    motions: RefCell<HashMap<u8, Motion>>,
    motor_events: RefCell<HashMap<u8, Vec<MotorEvent>>>,
    failed_ports: RefCell<HashSet<u8>>,
    configured: RefCell<Vec<MotorConfig>>,
    digital_writes: RefCell<HashMap<u8, Vec<bool>>>,
    failed_adi: RefCell<HashSet<u8>>,
    presses: RefCell<Vec<Press>>,
    axes: RefCell<HashMap<u8, i8>>,
    disconnected: Cell<bool>,
    screen: RefCell<Vec<(u8, String)>>,
    mode_ends_at: Cell<Option<Instant>>,
}

/// Handle to the simulated world. Clones share state.
#[derive(Clone)]
pub struct Sim(Rc<State>);

impl Sim {
    pub fn new() -> Self {
        Self(Rc::new(State {
            now: Cell::new(Instant::from_micros(0)),
            default_motion_time: Cell::new(Some(Duration::from_millis(300))),
            motion_times: RefCell::default(),
            motions: RefCell::default(),
            motor_events: RefCell::default(),
            failed_ports: RefCell::default(),
            configured: RefCell::default(),
            digital_writes: RefCell::default(),
            failed_adi: RefCell::default(),
            presses: RefCell::default(),
            axes: RefCell::default(),
            disconnected: Cell::new(false),
            screen: RefCell::default(),
            mode_ends_at: Cell::new(None),
        }))
    }

    pub fn clock(&self) -> SimClock {
        SimClock(self.clone())
    }

    pub fn controller(&self) -> SimController {
        SimController(self.clone())
    }

    pub fn screen(&self) -> SimScreen {
        SimScreen(self.clone())
    }

    pub fn motor(&self, port: u8) -> SimMotor {
        SimMotor {
            port,
            sim: self.clone(),
        }
    }

    pub fn digital_out(&self, port: AdiPort) -> SimDigitalOut {
        SimDigitalOut {
            port: port.number(),
            sim: self.clone(),
        }
    }

    pub fn field(&self) -> SimField {
        SimField(self.clone())
    }

    pub fn platform(&self) -> SimPlatform {
        SimPlatform(self.clone())
    }

    pub fn peripherals(&self) -> Peripherals<SimPlatform> {
        Peripherals::take(&mut self.platform()).unwrap()
    }

    pub fn advance_ms(&self, ms: u64) {
        self.clock().delay(Duration::from_millis(ms));
    }

    /// How long profiled moves take on ports without an override. `None`
    /// means they never finish.
    pub fn set_default_motion_time(&self, time: Option<Duration>) {
        self.0.default_motion_time.set(time);
    }

    /// How long profiled moves take on `port`. `None` stalls the motor.
    pub fn set_motion_time(&self, port: u8, time: Option<Duration>) {
        self.0.motion_times.borrow_mut().insert(port, time);
    }

    pub fn fail_port(&self, port: u8) {
        self.0.failed_ports.borrow_mut().insert(port);
    }

    pub fn fail_adi(&self, port: AdiPort) {
        self.0.failed_adi.borrow_mut().insert(port.number());
    }

    /// Holds `button` from now on.
    pub fn hold(&self, button: Button) {
        let from = self.now();
        self.0.presses.borrow_mut().push(Press {
            button,
            from,
            until: None,
        });
    }

    /// Holds `button` between two times since start; `until` is exclusive.
    pub fn press(&self, button: Button, from: Duration, until: Option<Duration>) {
        let start = Instant::from_micros(0);
        self.0.presses.borrow_mut().push(Press {
            button,
            from: start + from,
            until: until.map(|u| start + u),
        });
    }

    pub fn set_axis(&self, axis: Axis, value: i8) {
        self.0.axes.borrow_mut().insert(axis as u8, value);
    }

    pub fn disconnect_controller(&self) {
        self.0.disconnected.set(true);
    }

    /// Field control switches to disabled at this time since start.
    pub fn end_mode_at(&self, at: Duration) {
        self.0.mode_ends_at.set(Some(Instant::from_micros(0) + at));
    }

    pub fn motor_events(&self, port: u8) -> Vec<MotorEvent> {
        self.0
            .motor_events
            .borrow()
            .get(&port)
            .cloned()
            .unwrap_or_default()
    }

    pub fn last_motor_event(&self, port: u8) -> Option<MotorEvent> {
        self.motor_events(port).last().copied()
    }

    pub fn digital_writes(&self, port: AdiPort) -> Vec<bool> {
        self.0
            .digital_writes
            .borrow()
            .get(&port.number())
            .cloned()
            .unwrap_or_default()
    }

    pub fn digital_level(&self, port: AdiPort) -> Option<bool> {
        self.digital_writes(port).last().copied()
    }

    pub fn screen_lines(&self) -> Vec<(u8, String)> {
        self.0.screen.borrow().clone()
    }

    /// Ports configured through the platform, in order.
    pub fn configured_ports(&self) -> Vec<u8> {
        self.0.configured.borrow().iter().map(|c| c.port).collect()
    }

    pub fn motor_config(&self, port: u8) -> Option<MotorConfig> {
        self.0
            .configured
            .borrow()
            .iter()
            .find(|c| c.port == port)
            .copied()
    }

    fn now(&self) -> Instant {
        self.0.now.get()
    }

    fn held(&self, button: Button) -> bool {
        let now = self.now();
        self.0
            .presses
            .borrow()
            .iter()
            .any(|p| p.button == button && p.held_at(now))
    }

    fn axis(&self, axis: Axis) -> i8 {
        *self.0.axes.borrow().get(&(axis as u8)).unwrap_or(&0)
    }

    fn motion_time(&self, port: u8) -> Option<Duration> {
        match self.0.motion_times.borrow().get(&port) {
            Some(time) => *time,
            None => self.0.default_motion_time.get(),
        }
    }
}

impl Default for Sim {
    fn default() -> Self {
        Self::new()
    }
}

fn round(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

pub struct SimClock(Sim);

impl Clock for SimClock {
    fn time_since_start(&self) -> Instant {
        self.0.now()
    }

    fn delay(&self, dur: Duration) {
        let state = &(self.0).0;
        state.now.set(state.now.get() + dur);
    }
}

pub struct SimMotor {
    port: u8,
    sim: Sim,
}

impl SimMotor {
    fn record(&mut self, event: MotorEvent, motion: Option<Motion>) -> Result<(), MotorError> {
        self.check()?;
        let state = &self.sim.0;
        state
            .motor_events
            .borrow_mut()
            .entry(self.port)
            .or_default()
            .push(event);
        if let Some(motion) = motion {
            state.motions.borrow_mut().insert(self.port, motion);
        }
        Ok(())
    }

    fn check(&self) -> Result<(), MotorError> {
        if self.sim.0.failed_ports.borrow().contains(&self.port) {
            Err(MotorError::PortNotMotor)
        } else {
            Ok(())
        }
    }

    fn profiled(&self) -> Motion {
        let now = self.sim.now();
        Motion::Profiled(self.sim.motion_time(self.port).map(|d| now + d))
    }

    fn motion(&self) -> Motion {
        self.sim
            .0
            .motions
            .borrow()
            .get(&self.port)
            .copied()
            .unwrap_or(Motion::Idle)
    }
}

impl Motor for SimMotor {
    fn spin(&mut self, direction: Direction, velocity: Ratio) -> Result<(), MotorError> {
        let event = MotorEvent::Spin(direction, round(velocity.get::<percent>()));
        self.record(event, Some(Motion::Continuous))
    }

    fn spin_for(
        &mut self,
        direction: Direction,
        rotation: Angle,
        _blocking: bool,
    ) -> Result<(), MotorError> {
        let event = MotorEvent::SpinFor(direction, round(rotation.get::<revolution>()));
        let motion = self.profiled();
        self.record(event, Some(motion))
    }

    fn spin_to_position(&mut self, position: Angle, _blocking: bool) -> Result<(), MotorError> {
        let event = MotorEvent::SpinTo(round(position.get::<revolution>()));
        let motion = self.profiled();
        self.record(event, Some(motion))
    }

    fn set_velocity(&mut self, velocity: Ratio) -> Result<(), MotorError> {
        self.record(
            MotorEvent::SetVelocity(round(velocity.get::<percent>())),
            None,
        )
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        self.record(MotorEvent::Stop, Some(Motion::Idle))
    }

    fn is_spinning(&self) -> Result<bool, MotorError> {
        Ok(!self.is_done()?)
    }

    fn is_done(&self) -> Result<bool, MotorError> {
        self.check()?;
        Ok(match self.motion() {
            Motion::Idle => true,
            Motion::Continuous => false,
            Motion::Profiled(done_at) => done_at.is_some_and(|t| self.sim.now() >= t),
        })
    }
}

pub struct SimDigitalOut {
    port: u8,
    sim: Sim,
}

impl DigitalOutput for SimDigitalOut {
    fn write(&mut self, value: bool) -> Result<(), DigitalOutputError> {
        let state = &self.sim.0;
        if state.failed_adi.borrow().contains(&self.port) {
            return Err(DigitalOutputError::PortsNotDigitalOutput);
        }
        state
            .digital_writes
            .borrow_mut()
            .entry(self.port)
            .or_default()
            .push(value);
        Ok(())
    }
}

pub struct SimController(Sim);

impl Controller for SimController {
    fn axis(&self, axis: Axis) -> Result<i8, ControllerError> {
        if self.0 .0.disconnected.get() {
            return Err(ControllerError::ControllerBusy);
        }
        Ok(self.0.axis(axis))
    }

    fn is_pressed(&self, button: Button) -> Result<bool, ControllerError> {
        if self.0 .0.disconnected.get() {
            return Err(ControllerError::ControllerBusy);
        }
        Ok(self.0.held(button))
    }
}

pub struct SimScreen(Sim);

impl Screen for SimScreen {
    fn clear_line(&mut self, _line: u8) {}

    fn print(&mut self, line: u8, _column: u8, text: &str) {
        self.0 .0.screen.borrow_mut().push((line, text.into()));
    }
}

pub struct SimField(Sim);

impl FieldControl for SimField {
    fn status(&self) -> CompetitionStatus {
        match self.0 .0.mode_ends_at.get() {
            Some(end) if self.0.now() >= end => CompetitionStatus::DISABLED,
            _ => CompetitionStatus::CONNECTED,
        }
    }
}

pub struct SimPlatform(Sim);

impl Platform for SimPlatform {
    type Motor = SimMotor;
    type DigitalOut = SimDigitalOut;
    type Controller = SimController;
    type Screen = SimScreen;
    type Clock = SimClock;
    type Field = SimField;

    fn motor(&mut self, config: MotorConfig) -> Result<SimMotor, MotorError> {
        let motor = self.0.motor(config.port);
        motor.check()?;
        self.0 .0.configured.borrow_mut().push(config);
        Ok(motor)
    }

    fn digital_out(&mut self, port: AdiPort) -> Result<SimDigitalOut, DigitalOutputError> {
        Ok(self.0.digital_out(port))
    }

    fn controller(&mut self) -> SimController {
        self.0.controller()
    }

    fn screen(&mut self) -> SimScreen {
        self.0.screen()
    }

    fn clock(&mut self) -> SimClock {
        self.0.clock()
    }

    fn field(&mut self) -> SimField {
        self.0.field()
    }
}
