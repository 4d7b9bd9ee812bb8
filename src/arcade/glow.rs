use rgb::RGB8;

use super::{Led, LedBank};

/// Color held for a given time
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GlowStep {
    pub color: RGB8,
    pub duration_ms: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GlowConfig {
    pub start_delay_ms: u32,
    pub steps: &'static [GlowStep],
}

/// Plays a table of colors on the RGB LED, wrapping around at the end
pub struct Glower {
    steps: &'static [GlowStep],
    position: usize,
}

impl Glower {
    pub fn new(config: &GlowConfig) -> Self {
        Self { steps: config.steps, position: 0 }
    }

    /// Show next color and return the time until the next step
    ///
    /// Returns `None` for an empty table.
    pub fn step(&mut self, leds: &mut LedBank) -> Option<u32> {
        let step = self.steps.get(self.position)?;
        leds.change_to(Led::RgbRed, step.color.r);
        leds.change_to(Led::RgbGreen, step.color.g);
        leds.change_to(Led::RgbBlue, step.color.b);
        self.position = (self.position + 1) % self.steps.len();
        Some(step.duration_ms)
    }
}
