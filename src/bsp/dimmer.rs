use embedded_hal::PwmPin;

use super::Dimmer;

/// LED on a PWM channel with 8-bit intensity scaled to the channel duty range
pub struct PwmDimmer<P> {
    pin: P,
    intensity: u8,
}

impl<P: PwmPin<Duty = u16>> PwmDimmer<P> {
    /// Enable channel starting with the LED off
    pub fn new(mut pin: P) -> Self {
        pin.set_duty(0);
        pin.enable();
        Self { pin, intensity: 0 }
    }

    fn duty_for(intensity: u8, max_duty: u16) -> u16 {
        (intensity as u32 * max_duty as u32 / u8::MAX as u32) as u16
    }
}

impl<P: PwmPin<Duty = u16>> Dimmer for PwmDimmer<P> {
    fn intensity(&self) -> u8 {
        self.intensity
    }

    fn set_intensity(&mut self, value: u8) {
        let duty = Self::duty_for(value, self.pin.get_max_duty());
        self.pin.set_duty(duty);
        self.intensity = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Channel {
        duty: u16,
        max: u16,
        enabled: bool,
    }

    impl PwmPin for Channel {
        type Duty = u16;

        fn disable(&mut self) {
            self.enabled = false;
        }

        fn enable(&mut self) {
            self.enabled = true;
        }

        fn get_duty(&self) -> u16 {
            self.duty
        }

        fn get_max_duty(&self) -> u16 {
            self.max
        }

        fn set_duty(&mut self, duty: u16) {
            self.duty = duty;
        }
    }

    #[test]
    fn starts_dark_and_enabled() {
        let dimmer = PwmDimmer::new(Channel { duty: 77, max: 255, enabled: false });
        assert_eq!(dimmer.intensity(), 0);
        assert_eq!(dimmer.pin.duty, 0);
        assert!(dimmer.pin.enabled);
    }

    #[test]
    fn scales_to_duty_range() {
        let mut dimmer = PwmDimmer::new(Channel { duty: 0, max: 1000, enabled: false });
        dimmer.set_intensity(255);
        assert_eq!(dimmer.pin.get_duty(), 1000);
        dimmer.set_intensity(51);
        assert_eq!(dimmer.pin.get_duty(), 200);
        assert_eq!(dimmer.intensity(), 51);
        dimmer.set_intensity(0);
        assert_eq!(dimmer.pin.get_duty(), 0);
    }
}
