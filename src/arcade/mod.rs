//! Ambient LED effects running next to the game

mod fader;
mod glow;

pub use fader::{Fader, FaderConfig};
pub use glow::{GlowConfig, GlowStep, Glower};

use crate::bsp::Dimmer;

/// PWM driven LEDs of the board
#[derive(Clone, Copy, PartialEq, Eq, Debug, defmt::Format)]
pub enum Led {
    Red = 0,
    Yellow = 1,
    Green = 2,
    RgbRed = 3,
    RgbGreen = 4,
    RgbBlue = 5,
}

impl Led {
    pub const COUNT: usize = 6;
    pub const ALL: [Led; Led::COUNT] = [Led::Red, Led::Yellow, Led::Green, Led::RgbRed, Led::RgbGreen, Led::RgbBlue];
}

/// All LEDs addressed through a single table indexed by [`Led`]
pub struct LedBank<'a> {
    channels: [&'a mut dyn Dimmer; Led::COUNT],
}

impl<'a> LedBank<'a> {
    /// Channels in [`Led::ALL`] order
    pub fn new(channels: [&'a mut dyn Dimmer; Led::COUNT]) -> Self {
        Self { channels }
    }

    pub fn intensity(&self, led: Led) -> u8 {
        self.channels[led as usize].intensity()
    }

    pub fn change_to(&mut self, led: Led, value: u8) {
        self.channels[led as usize].set_intensity(value);
    }

    /// Change intensity by `delta`, saturating at 0 and 255
    pub fn change_by(&mut self, led: Led, delta: i16) {
        let current = self.intensity(led) as i16;
        let value = (current + delta).clamp(0, u8::MAX as i16) as u8;
        self.change_to(led, value);
    }

    #[cfg(test)]
    pub fn off(&mut self) {
        for led in Led::ALL {
            self.change_to(led, 0);
        }
    }
}
