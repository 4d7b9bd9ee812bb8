use static_assertions as sa;

use crate::bsp::Side;
use crate::os::EventMask;
use super::GameState;

pub const START_ROUND: EventMask = EventMask::bit(0);
pub const START_CALCULATION: EventMask = EventMask::bit(1);
pub const STOP_CORRECT: EventMask = EventMask::bit(2);
pub const STOP_INCORRECT: EventMask = EventMask::bit(3);
pub const STOP_TIMEOUT: EventMask = EventMask::bit(4);
pub const RESTART_GAME: EventMask = EventMask::bit(5);

/// All events the game task waits for
pub const WAIT_MASK: EventMask = EventMask::NONE
    .union(START_ROUND)
    .union(START_CALCULATION)
    .union(STOP_CORRECT)
    .union(STOP_INCORRECT)
    .union(STOP_TIMEOUT)
    .union(RESTART_GAME);

// Every event needs its own bit of the task event mask
sa::const_assert!(GameEvent::PRIORITY.len() <= 8);

/// Named game events
#[derive(Clone, Copy, PartialEq, Eq, Debug, defmt::Format)]
pub enum GameEvent {
    StartRound,
    RestartGame,
    StartCalculation,
    StopCorrect,
    StopIncorrect,
    StopTimeout,
}

impl GameEvent {
    /// Resolution order when several events are pending at once
    pub const PRIORITY: [GameEvent; 6] = [
        GameEvent::StartRound,
        GameEvent::RestartGame,
        GameEvent::StartCalculation,
        GameEvent::StopCorrect,
        GameEvent::StopIncorrect,
        GameEvent::StopTimeout,
    ];

    pub const fn mask(&self) -> EventMask {
        match self {
            GameEvent::StartRound => START_ROUND,
            GameEvent::RestartGame => RESTART_GAME,
            GameEvent::StartCalculation => START_CALCULATION,
            GameEvent::StopCorrect => STOP_CORRECT,
            GameEvent::StopIncorrect => STOP_INCORRECT,
            GameEvent::StopTimeout => STOP_TIMEOUT,
        }
    }

    /// Pick the single event handled for this wakeup, the rest is dropped
    pub fn select(mask: EventMask) -> Option<GameEvent> {
        Self::PRIORITY.iter()
            .find(|ev| mask.contains(ev.mask()))
            .copied()
    }
}

/// Event to post after a button interrupt
///
/// `digit` is the value currently shown on the display (if any) and `pressed`
/// the side of the pressed button, `None` when the interrupt was a release or
/// a bounce and no button reads as pressed.
pub fn classify_press(state: GameState, digit: Option<u8>, pressed: Option<Side>) -> Option<EventMask> {
    let side = pressed?;
    match state {
        GameState::WaitingRoundStart => Some(START_ROUND),
        GameState::WaitingUserReaction => {
            let correct = matches!((digit, side), (Some(1), Side::Right) | (Some(2), Side::Left));
            Some(if correct { STOP_CORRECT } else { STOP_INCORRECT })
        },
        GameState::Uninitialized | GameState::WaitingDisplay => None,
    }
}

/// Event to post when the reaction window elapses
///
/// A timeout that arrives after the round has already been answered is stale
/// and must not affect the next round.
pub fn on_timeout(state: GameState) -> Option<EventMask> {
    match state {
        GameState::WaitingUserReaction => Some(STOP_TIMEOUT),
        _ => None,
    }
}
