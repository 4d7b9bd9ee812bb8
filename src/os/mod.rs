//! Cooperative task/alarm/event layer
//!
//! A small OSEK-like model on top of RTIC: tasks are activated through a ready
//! queue, alarms are software timers ticked from a periodic interrupt, and the
//! only extended task (the game loop) is woken up by posting event bits to it.
//! This module holds the static task and alarm tables of the application.

mod alarm;
mod event;
mod scheduler;

pub use alarm::{AlarmError, Alarms};
pub use event::{EventMask, EventSet};
pub use scheduler::Scheduler;

/// Application tasks
#[derive(Clone, Copy, PartialEq, Eq, Debug, defmt::Format)]
pub enum Task {
    /// Extended task running the reaction game, woken by events
    ReactionGame,
    /// Basic task stepping the LED fader
    Fader,
    /// Basic task stepping the RGB glow table
    Glower,
}

impl Task {
    /// Only extended tasks can wait for events
    pub const fn is_extended(&self) -> bool {
        matches!(self, Task::ReactionGame)
    }
}

/// Callbacks executed in the context of the alarm tick interrupt
#[derive(Clone, Copy, PartialEq, Eq, Debug, defmt::Format)]
pub enum Callback {
    /// Reaction window elapsed
    RoundTimeout,
}

/// What happens when an alarm expires
#[derive(Clone, Copy, PartialEq, Eq, Debug, defmt::Format)]
pub enum AlarmAction {
    Activate(Task),
    SetEvent(Task, EventMask),
    Callback(Callback),
}

/// Application alarms, the discriminant is the index in [`ALARM_TABLE`]
#[derive(Clone, Copy, PartialEq, Eq, Debug, defmt::Format)]
pub enum AlarmId {
    /// Random delay before showing the digit
    Display = 0,
    /// Reaction window
    Timeout = 1,
    Fader = 2,
    Glower = 3,
}

pub const N_ALARMS: usize = 4;

/// Alarm actions indexed by [`AlarmId`]
pub const ALARM_TABLE: [AlarmAction; N_ALARMS] = [
    AlarmAction::SetEvent(Task::ReactionGame, crate::game::events::START_CALCULATION),
    AlarmAction::Callback(Callback::RoundTimeout),
    AlarmAction::Activate(Task::Fader),
    AlarmAction::Activate(Task::Glower),
];

/// Alarm tick frequency
pub const TICK_HZ: u32 = 1000;

/// Convert milliseconds to alarm ticks, rounding down
pub const fn ms_to_ticks(ms: u32) -> u32 {
    ms.saturating_mul(TICK_HZ) / 1000
}
