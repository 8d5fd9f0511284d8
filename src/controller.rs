//! Controller API.

use core::fmt::{self, Display, Formatter};

use bitflags::bitflags;
use log::debug;

use crate::error::Error;

/// Number of text lines on the controller screen.
pub const SCREEN_LINES: u8 = 3;
/// Number of characters per line on the controller screen.
pub const SCREEN_COLUMNS: u8 = 19;

/// Represents a Vex controller, as exposed by the hardware layer.
pub trait Controller {
    /// Reads an analog axis as a percentage on the range [-100, 100]. Returns
    /// 0 if the controller is not connected.
    fn axis(&self, axis: Axis) -> Result<i8, ControllerError>;

    /// Checks if a given button is pressed. Returns false if the controller is
    /// not connected.
    fn is_pressed(&self, button: Button) -> Result<bool, ControllerError>;

    /// Reads every button at once.
    fn buttons(&self) -> Result<ButtonSet, ControllerError> {
        let mut set = ButtonSet::empty();
        for button in Button::ALL {
            if self.is_pressed(button)? {
                set |= ButtonSet::from(button);
            }
        }
        Ok(set)
    }
}

/// Represents the text screen on a Vex controller.
///
/// Rate limiting and retries are the hardware layer's concern; these calls
/// never block the control loop.
pub trait Screen {
    /// Clears an individual line of the screen. Lines range from 0 to 2.
    fn clear_line(&mut self, line: u8);

    /// Prints text to the screen. Lines range from 0 to 2. Columns range from
    /// 0 to 18.
    fn print(&mut self, line: u8, column: u8, text: &str);
}

/// Replaces a whole line of the screen, truncating text that does not fit.
/// Out-of-range lines are ignored.
pub fn print_line(screen: &mut impl Screen, line: u8, text: &str) {
    if line >= SCREEN_LINES {
        return;
    }
    let end = text
        .char_indices()
        .nth(SCREEN_COLUMNS as usize)
        .map_or(text.len(), |(i, _)| i);
    screen.clear_line(line);
    screen.print(line, 0, &text[..end]);
}

/// The four analog channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Left stick, horizontal (axis 4).
    LeftX,
    /// Left stick, vertical (axis 3).
    LeftY,
    /// Right stick, horizontal (axis 1).
    RightX,
    /// Right stick, vertical (axis 2).
    RightY,
}

/// The digital buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    /// The top-left shoulder button.
    L1,
    /// The bottom-left shoulder button.
    L2,
    /// The top-right shoulder button.
    R1,
    /// The bottom-right shoulder button.
    R2,
    /// The up directional button.
    Up,
    /// The down directional button.
    Down,
    /// The left directional button.
    Left,
    /// The right directional button.
    Right,
    /// The "X" button.
    X,
    /// The "Y" button.
    Y,
    /// The "A" button.
    A,
    /// The "B" button.
    B,
}

impl Button {
    /// Every button, in flag order.
    pub const ALL: [Button; 12] = [
        Button::L1,
        Button::L2,
        Button::R1,
        Button::R2,
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::X,
        Button::Y,
        Button::A,
        Button::B,
    ];
}

bitflags! {
    /// A snapshot of which buttons are held.
    #[derive(Default)]
    pub struct ButtonSet: u16 {
        /// [`Button::L1`].
        const L1 = 1 << 0;
        /// [`Button::L2`].
        const L2 = 1 << 1;
        /// [`Button::R1`].
        const R1 = 1 << 2;
        /// [`Button::R2`].
        const R2 = 1 << 3;
        /// [`Button::Up`].
        const UP = 1 << 4;
        /// [`Button::Down`].
        const DOWN = 1 << 5;
        /// [`Button::Left`].
        const LEFT = 1 << 6;
        /// [`Button::Right`].
        const RIGHT = 1 << 7;
        /// [`Button::X`].
        const X = 1 << 8;
        /// [`Button::Y`].
        const Y = 1 << 9;
        /// [`Button::A`].
        const A = 1 << 10;
        /// [`Button::B`].
        const B = 1 << 11;
    }
}

impl ButtonSet {
    /// Whether `button` is held in this snapshot.
    pub fn held(self, button: Button) -> bool {
        self.contains(button.into())
    }
}

impl From<Button> for ButtonSet {
    fn from(button: Button) -> Self {
        match button {
            Button::L1 => ButtonSet::L1,
            Button::L2 => ButtonSet::L2,
            Button::R1 => ButtonSet::R1,
            Button::R2 => ButtonSet::R2,
            Button::Up => ButtonSet::UP,
            Button::Down => ButtonSet::DOWN,
            Button::Left => ButtonSet::LEFT,
            Button::Right => ButtonSet::RIGHT,
            Button::X => ButtonSet::X,
            Button::Y => ButtonSet::Y,
            Button::A => ButtonSet::A,
            Button::B => ButtonSet::B,
        }
    }
}

/// Reads a button, treating a read failure as released.
pub fn pressed_or_released(controller: &(impl Controller + ?Sized), button: Button) -> bool {
    controller.is_pressed(button).unwrap_or_else(|err| {
        debug!("reading {:?}: {}", button, err);
        false
    })
}

/// Represents possible error states for a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerError {
    /// Controller ID does not exist.
    InvalidController,
    /// Another resource is currently trying to access the controller port.
    ControllerBusy,
    /// Unknown error.
    Unknown(i32),
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::InvalidController => f.write_str("invalid controller id"),
            ControllerError::ControllerBusy => f.write_str("controller is busy"),
            ControllerError::Unknown(n) => write!(f, "unknown controller error {}", n),
        }
    }
}

impl From<ControllerError> for Error {
    fn from(err: ControllerError) -> Self {
        match err {
            ControllerError::InvalidController => Error::Custom("invalid controller id".into()),
            ControllerError::ControllerBusy => Error::Custom("controller is busy".into()),
            ControllerError::Unknown(n) => Error::System(n),
        }
    }
}
