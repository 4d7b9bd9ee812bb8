use core::convert::Infallible;
use embedded_hal::digital::v2::InputPin;

use crate::utils::InfallibleResult;
use super::{Button, Buttons};

/// Four push buttons, reading high when pressed
pub struct ButtonPanel<P> {
    pins: [P; 4],
}

impl<P: InputPin<Error = Infallible>> ButtonPanel<P> {
    /// Pins in [`Button::ALL`] order
    pub fn new(pins: [P; 4]) -> Self {
        Self { pins }
    }
}

impl<P: InputPin<Error = Infallible>> Buttons for ButtonPanel<P> {
    fn is_pressed(&self, button: Button) -> bool {
        let index = match button {
            Button::Right1 => 0,
            Button::Right2 => 1,
            Button::Left1 => 2,
            Button::Left2 => 3,
        };
        self.pins[index].is_high().infallible()
    }
}
