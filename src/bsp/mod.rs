//! Board support package
//!
//! Narrow interfaces of the peripherals the game talks to, plus generic drivers
//! built on `embedded-hal` traits. Binding to concrete MCU pins and timers is
//! done in the firmware binary.

pub mod buttons;
pub mod console;
pub mod dimmer;
pub mod seven;

use crate::Error;

/// Digit positions of the two-digit seven-segment display
#[derive(Clone, Copy, PartialEq, Eq, Debug, defmt::Format)]
pub enum Position {
    Left = 0,
    Right = 1,
}

impl Position {
    pub const ALL: [Position; 2] = [Position::Left, Position::Right];
}

/// Seven-segment display showing a single decimal digit per position
pub trait SevenSegment {
    /// Show digit 0..=9 at given position
    fn set(&mut self, position: Position, digit: u8) -> Result<(), Error>;
    /// Digit currently shown, `None` when blank
    fn get(&self, position: Position) -> Option<u8>;
    /// Blank all positions
    fn clear(&mut self);
}

/// Hardware down-counter used to measure reaction time
pub trait Stopwatch {
    /// Counting frequency
    fn ticks_per_second(&self) -> u32;
    /// Load the counter with `ticks` and start counting down
    fn start(&mut self, ticks: u16);
    /// Stop counting, returning the ticks left
    fn stop(&mut self) -> u16;
}

/// Side of the board a button is placed on
#[derive(Clone, Copy, PartialEq, Eq, Debug, defmt::Format)]
pub enum Side {
    Left,
    Right,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, defmt::Format)]
pub enum Button {
    Right1,
    Right2,
    Left1,
    Left2,
}

impl Button {
    /// Scan order when looking for a pressed button
    pub const ALL: [Button; 4] = [Button::Right1, Button::Right2, Button::Left1, Button::Left2];

    pub const fn side(&self) -> Side {
        match self {
            Button::Right1 | Button::Right2 => Side::Right,
            Button::Left1 | Button::Left2 => Side::Left,
        }
    }
}

/// Push buttons of the game
pub trait Buttons {
    fn is_pressed(&self, button: Button) -> bool;

    /// First pressed button in [`Button::ALL`] order
    fn pressed(&self) -> Option<Button> {
        Button::ALL.into_iter().find(|b| self.is_pressed(*b))
    }

    fn pressed_side(&self) -> Option<Side> {
        self.pressed().map(|b| b.side())
    }
}

/// Output with adjustable 8-bit intensity, e.g. a PWM driven LED
pub trait Dimmer {
    fn intensity(&self) -> u8;
    fn set_intensity(&mut self, value: u8);
}

#[cfg(test)]
pub mod mock {
    use super::*;

    #[derive(Default)]
    pub struct MockConsole {
        pub out: std::string::String,
    }

    impl ufmt::uWrite for MockConsole {
        type Error = Error;

        fn write_str(&mut self, s: &str) -> Result<(), Error> {
            self.out.push_str(s);
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct MockButtons {
        pub pressed: std::vec::Vec<Button>,
    }

    impl Buttons for MockButtons {
        fn is_pressed(&self, button: Button) -> bool {
            self.pressed.contains(&button)
        }
    }

    #[derive(Default)]
    pub struct MockDisplay {
        pub digits: [Option<u8>; 2],
    }

    impl SevenSegment for MockDisplay {
        fn set(&mut self, position: Position, digit: u8) -> Result<(), Error> {
            if digit > 9 {
                return Err(Error::InvalidDigit(digit));
            }
            self.digits[position as usize] = Some(digit);
            Ok(())
        }

        fn get(&self, position: Position) -> Option<u8> {
            self.digits[position as usize]
        }

        fn clear(&mut self) {
            self.digits = [None; 2];
        }
    }

    /// Counter that only moves when told to
    pub struct MockStopwatch {
        pub ticks_per_second: u32,
        pub value: u16,
        pub running: bool,
    }

    impl MockStopwatch {
        pub fn new(ticks_per_second: u32) -> Self {
            Self { ticks_per_second, value: 0, running: false }
        }

        pub fn advance(&mut self, ticks: u16) {
            if self.running {
                self.value = self.value.saturating_sub(ticks);
            }
        }
    }

    impl Stopwatch for MockStopwatch {
        fn ticks_per_second(&self) -> u32 {
            self.ticks_per_second
        }

        fn start(&mut self, ticks: u16) {
            self.value = ticks;
            self.running = true;
        }

        fn stop(&mut self) -> u16 {
            self.running = false;
            self.value
        }
    }

    #[derive(Default)]
    pub struct MockDimmer(pub u8);

    impl Dimmer for MockDimmer {
        fn intensity(&self) -> u8 {
            self.0
        }

        fn set_intensity(&mut self, value: u8) {
            self.0 = value;
        }
    }
}
