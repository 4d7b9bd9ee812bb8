use super::{Led, LedBank};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FaderConfig {
    /// Delay of the first step
    pub start_delay_ms: u32,
    /// Period between steps
    pub step_ms: u32,
    /// Steps needed to move the light from one LED to the next
    pub steps: u8,
}

/// (dimmed, brightened) pairs, light moves red -> yellow -> green -> red
const PHASES: [(Led, Led); 3] = [
    (Led::Red, Led::Yellow),
    (Led::Yellow, Led::Green),
    (Led::Green, Led::Red),
];

/// Cross-fades the red, yellow and green LEDs in a circle
pub struct Fader {
    steps: u8,
    counter: u8,
    phase: usize,
}

impl Fader {
    pub fn new(config: &FaderConfig) -> Self {
        Self { steps: config.steps, counter: 0, phase: 0 }
    }

    /// Set initial intensities, red fully on
    pub fn start(&mut self, leds: &mut LedBank) {
        self.counter = 0;
        self.phase = 0;
        leds.change_to(Led::Red, u8::MAX);
        leds.change_to(Led::Yellow, 0);
        leds.change_to(Led::Green, 0);
    }

    pub fn step(&mut self, leds: &mut LedBank) {
        let (down, up) = PHASES[self.phase];
        leds.change_by(down, -1);
        leds.change_by(up, 1);

        self.counter += 1;
        if self.counter >= self.steps {
            self.counter = 0;
            self.phase = (self.phase + 1) % PHASES.len();
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> usize {
        self.phase
    }
}
