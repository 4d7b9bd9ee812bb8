#![no_std]

// Use std when running tests, see: https://stackoverflow.com/a/28186509
// Make sure to use different target when testing, e.g.
//   cargo test --target x86_64-unknown-linux-gnu
#[cfg(test)]
#[macro_use]
extern crate std;

use stm32f0xx_hal as hal;

/// Ambient LED effects (fader and RGB glower)
pub mod arcade;
/// Board support: collaborator traits and generic peripheral drivers
pub mod bsp;
/// Compiled-in or JSON-generated configuration
pub mod config;
/// Reaction game state machine and bookkeeping
pub mod game;
/// Extensions to the MCU HAL
pub mod hal_ext;
/// Cooperative task, alarm and event layer
pub mod os;
pub mod utils;

/// Package and git metadata collected at build time
pub mod build_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// Errors reported by collaborators and the scheduling layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum Error {
    /// Peripheral used before it has been initialized
    NotInitialized,
    /// Writing to the console failed
    Console,
    /// Seven-segment display can only show digits 0..=9
    InvalidDigit(u8),
    /// Round window does not fit into the hardware counter
    WindowTooLong,
    /// Alarm could not be armed
    Alarm(os::AlarmError),
    /// Task activation requested while the ready queue is full
    ReadyQueueFull,
    /// Events can only be posted to an extended task
    NotExtendedTask,
}

impl From<os::AlarmError> for Error {
    fn from(e: os::AlarmError) -> Self {
        Self::Alarm(e)
    }
}
