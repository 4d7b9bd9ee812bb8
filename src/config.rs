//! Application configuration

use crate::arcade::{FaderConfig, GlowConfig};
use crate::game::GameConfig;

#[cfg(feature = "json-config")]
pub use generated::CONFIG;

#[cfg(not(feature = "json-config"))]
pub use code::CONFIG;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AppConfig {
    pub game: GameConfig,
    pub fader: FaderConfig,
    pub glow: GlowConfig,
    /// Counting frequency of the reaction stopwatch
    pub stopwatch_hz: u32,
}

#[cfg(feature = "json-config")]
mod generated {
    include!(concat!(env!("OUT_DIR"), "/config.rs"));
}

#[cfg(not(feature = "json-config"))]
mod code {
    use rgb::RGB8;

    use crate::arcade::{FaderConfig, GlowConfig, GlowStep};
    use crate::game::GameConfig;
    use super::AppConfig;

    pub static CONFIG: AppConfig = AppConfig {
        game: GameConfig {
            max_rounds: 10,
            round_duration_s: 1,
            max_start_delay_s: 3,
        },
        fader: FaderConfig {
            start_delay_ms: 100,
            step_ms: 1,
            steps: 255,
        },
        glow: GlowConfig {
            start_delay_ms: 100,
            steps: &GLOW,
        },
        stopwatch_hz: 12_000,
    };

    macro_rules! glow {
        ($r:expr, $g:expr, $b:expr, $ms:expr) => {
            GlowStep { color: RGB8::new($r, $g, $b), duration_ms: $ms }
        };
    }

    static GLOW: [GlowStep; 9] = [
        glow!(20, 0, 0, 500),
        glow!(0, 20, 0, 500),
        glow!(0, 0, 20, 500),
        // Blink white three times
        glow!(0, 0, 0, 100),
        glow!(10, 10, 10, 100),
        glow!(0, 0, 0, 100),
        glow!(10, 10, 10, 100),
        glow!(0, 0, 0, 100),
        glow!(10, 10, 10, 100),
    ];
}

impl AppConfig {
    /// Sanity checks of values that cannot be expressed in types
    pub fn validate(&self) -> Result<(), crate::Error> {
        crate::game::timing::window_ticks(self.stopwatch_hz, self.game.round_duration_s)?;
        let delays = [self.fader.start_delay_ms, self.fader.step_ms, self.glow.start_delay_ms];
        let glow_zero = self.glow.steps.iter().any(|s| s.duration_ms == 0);
        if delays.contains(&0) || glow_zero || self.game.max_start_delay_s == 0 {
            return Err(crate::Error::Alarm(crate::os::AlarmError::ZeroDelay));
        }
        Ok(())
    }
}
