use core::convert::Infallible;
use embedded_hal::digital::v2::OutputPin;

use crate::Error;
use crate::utils::InfallibleResult;
use super::{Position, SevenSegment};

/// Segment patterns for digits 0..=9, bit 0 = segment A ... bit 6 = segment G
const PATTERNS: [u8; 10] = [
    0b011_1111, // 0
    0b000_0110, // 1
    0b101_1011, // 2
    0b100_1111, // 3
    0b110_0110, // 4
    0b110_1101, // 5
    0b111_1101, // 6
    0b000_0111, // 7
    0b111_1111, // 8
    0b110_1111, // 9
];

pub const SEGMENTS: usize = 7;

/// Segment pins of a single digit, in order A..G
pub type DigitPins<P> = [P; SEGMENTS];

/// Two-digit, statically driven seven-segment display
///
/// Pins are active high. The digit last written is kept so that it can be
/// read back when classifying button presses.
pub struct SevenSegmentDisplay<P> {
    digits: [DigitPins<P>; 2],
    shown: [Option<u8>; 2],
}

impl<P: OutputPin<Error = Infallible>> SevenSegmentDisplay<P> {
    pub fn new(left: DigitPins<P>, right: DigitPins<P>) -> Self {
        let mut display = Self { digits: [left, right], shown: [None; 2] };
        display.clear();
        display
    }

    fn write_pattern(&mut self, position: Position, pattern: u8) {
        for (i, pin) in self.digits[position as usize].iter_mut().enumerate() {
            if pattern & (1 << i) != 0 {
                pin.set_high().infallible();
            } else {
                pin.set_low().infallible();
            }
        }
    }
}

impl<P: OutputPin<Error = Infallible>> SevenSegment for SevenSegmentDisplay<P> {
    fn set(&mut self, position: Position, digit: u8) -> Result<(), Error> {
        let pattern = *PATTERNS.get(digit as usize).ok_or(Error::InvalidDigit(digit))?;
        self.write_pattern(position, pattern);
        self.shown[position as usize] = Some(digit);
        Ok(())
    }

    fn get(&self, position: Position) -> Option<u8> {
        self.shown[position as usize]
    }

    fn clear(&mut self) {
        for position in Position::ALL {
            self.write_pattern(position, 0);
            self.shown[position as usize] = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Pin(Rc<Cell<bool>>);

    impl OutputPin for Pin {
        type Error = Infallible;

        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.0.set(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.0.set(true);
            Ok(())
        }
    }

    fn pins() -> DigitPins<Pin> {
        core::array::from_fn(|_| Pin::default())
    }

    fn lit(pins: &DigitPins<Pin>) -> u8 {
        pins.iter().enumerate()
            .fold(0, |acc, (i, p)| acc | ((p.0.get() as u8) << i))
    }

    #[test]
    fn shows_digit_on_selected_position() {
        let (left, right) = (pins(), pins());
        let mut display = SevenSegmentDisplay::new(left.clone(), right.clone());
        display.set(Position::Right, 1).unwrap();
        assert_eq!(lit(&right), 0b000_0110);
        assert_eq!(lit(&left), 0);
        assert_eq!(display.get(Position::Right), Some(1));
        assert_eq!(display.get(Position::Left), None);
    }

    #[test]
    fn overwrite_and_clear() {
        let (left, right) = (pins(), pins());
        let mut display = SevenSegmentDisplay::new(left.clone(), right.clone());
        display.set(Position::Left, 8).unwrap();
        assert_eq!(lit(&left), 0b111_1111);
        display.set(Position::Left, 2).unwrap();
        assert_eq!(lit(&left), 0b101_1011);
        display.set(Position::Right, 2).unwrap();
        display.clear();
        assert_eq!((lit(&left), lit(&right)), (0, 0));
        assert_eq!(display.get(Position::Left), None);
    }

    #[test]
    fn rejects_non_digits() {
        let mut display = SevenSegmentDisplay::new(pins(), pins());
        display.set(Position::Left, 3).unwrap();
        assert_eq!(display.set(Position::Left, 10), Err(Error::InvalidDigit(10)));
        // Previous digit stays
        assert_eq!(display.get(Position::Left), Some(3));
    }

    #[test]
    fn patterns_are_unique() {
        for (i, a) in PATTERNS.iter().enumerate() {
            assert!(PATTERNS[i + 1..].iter().all(|b| a != b));
        }
    }
}
