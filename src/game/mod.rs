//! Reaction game
//!
//! The game task reacts to events posted by interrupts (buttons, alarms) and by
//! itself. Each wakeup handles exactly one event, see [`events::GameEvent::select`].

pub mod events;
mod fsm;
mod io;
mod random;
mod round;
pub mod text;
pub mod timing;

pub use fsm::ReactionGame;
pub use io::IoContext;
pub use random::Dice;
pub use round::Game;

use crate::Error;
use crate::os::{AlarmId, EventMask};

/// Game rules
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GameConfig {
    /// Rounds in a single game cycle
    pub max_rounds: u32,
    /// Reaction window
    pub round_duration_s: u32,
    /// Digit is shown after a random delay of 1..=max_start_delay_s seconds
    pub max_start_delay_s: u8,
}

/// Number of different digits the game shows (1 or 2)
pub const DIGITS: u8 = 2;

/// Public view of the game state machine
#[derive(Clone, Copy, PartialEq, Eq, Debug, defmt::Format)]
pub enum GameState {
    Uninitialized,
    /// Waiting for any button to start the next round
    WaitingRoundStart,
    /// Start delay is running, display is blank
    WaitingDisplay,
    /// Digit shown, stopwatch running
    WaitingUserReaction,
}

/// Everything the state machine actions need from the outside world
pub trait GameIo {
    fn print(&mut self, text: &str) -> Result<(), Error>;
    /// Show digit on all display positions
    fn show_digit(&mut self, digit: u8) -> Result<(), Error>;
    fn clear_display(&mut self);
    fn ticks_per_second(&self) -> u32;
    fn start_stopwatch(&mut self, ticks: u16);
    /// Stop the stopwatch and return the ticks left
    fn stop_stopwatch(&mut self) -> u16;
    /// Random value in `1..=limit`
    fn random(&mut self, limit: u8) -> u8;
    /// Arm a one-shot alarm
    fn set_alarm(&mut self, id: AlarmId, delay_ms: u32) -> Result<(), Error>;
    fn cancel_alarm(&mut self, id: AlarmId) -> Result<(), Error>;
    /// Post events to the game task itself
    fn post(&mut self, mask: EventMask) -> Result<(), Error>;
}
