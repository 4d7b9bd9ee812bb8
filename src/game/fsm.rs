use smlang::statemachine;

use crate::os::{AlarmId, EventMask};
use super::events::{GameEvent, RESTART_GAME, WAIT_MASK};
use super::{text, timing, Game, GameConfig, GameIo, GameState, DIGITS};

statemachine! {
    temporary_context: &mut dyn GameIo,
    transitions: {
        *Uninitialized + Init / welcome = WaitingRoundStart,

        WaitingRoundStart + StartRound / begin_round = WaitingDisplay,
        // Start requested after the last round, `round > max_rounds`
        WaitingRoundStart + GameOver / show_summary = WaitingRoundStart,

        WaitingDisplay + StartCalculation / show_digit = WaitingUserReaction,

        WaitingUserReaction + StopCorrect / score_correct = WaitingRoundStart,
        WaitingUserReaction + StopIncorrect / score_incorrect = WaitingRoundStart,
        WaitingUserReaction + StopTimeout / score_timeout = WaitingRoundStart,

        WaitingRoundStart + RestartGame / restart = WaitingRoundStart,
        WaitingDisplay + RestartGame / restart = WaitingRoundStart,
        WaitingUserReaction + RestartGame / restart = WaitingRoundStart,
    }
}

impl From<&States> for GameState {
    fn from(state: &States) -> Self {
        match state {
            States::Uninitialized => GameState::Uninitialized,
            States::WaitingRoundStart => GameState::WaitingRoundStart,
            States::WaitingDisplay => GameState::WaitingDisplay,
            States::WaitingUserReaction => GameState::WaitingUserReaction,
        }
    }
}

pub struct Context {
    game: Game,
    config: GameConfig,
    // First error from the current transition
    fault: Option<crate::Error>,
}

impl Context {
    /// Keep going on errors so that the transition always completes
    fn check(&mut self, result: Result<(), crate::Error>) {
        if let Err(e) = result {
            defmt::debug!("Action failed: {}", e);
            self.fault.get_or_insert(e);
        }
    }

    fn print(&mut self, io: &mut dyn GameIo, lines: &[&str]) {
        for line in lines {
            self.check(io.print(line));
        }
    }

    /// Common part of leaving WaitingUserReaction
    fn end_reaction(&mut self, io: &mut dyn GameIo) -> u16 {
        let remaining = io.stop_stopwatch();
        self.check(io.cancel_alarm(AlarmId::Timeout));
        io.clear_display();
        remaining
    }
}

impl StateMachineContext for Context {
    fn welcome(&mut self, io: &mut dyn GameIo) {
        io.clear_display();
        self.print(io, &[text::WELCOME, text::INSTRUCTIONS, text::PRESS_TO_BEGIN]);
    }

    fn begin_round(&mut self, io: &mut dyn GameIo) {
        defmt::info!("Round {=u32}", self.game.round);
        self.print(io, &[text::round_started(self.game.round).as_str()]);
        let delay_s = io.random(self.config.max_start_delay_s);
        self.check(io.set_alarm(AlarmId::Display, delay_s as u32 * 1000));
    }

    fn show_summary(&mut self, io: &mut dyn GameIo) {
        let game = &self.game;
        defmt::info!("Game over: {=u32} correct, {=u32} ms", game.correct_presses, game.total_time_ms);
        let (count, total, average) = (
            text::correct_presses(game.correct_presses),
            text::total_time(game.total_time_ms),
            text::average_time(game.average_ms()),
        );
        self.print(io, &[count.as_str(), total.as_str(), average.as_str()]);
        self.check(io.post(RESTART_GAME));
    }

    fn restart(&mut self, io: &mut dyn GameIo) {
        io.stop_stopwatch();
        self.check(io.cancel_alarm(AlarmId::Display));
        self.check(io.cancel_alarm(AlarmId::Timeout));
        io.clear_display();
        self.game.reset();
        self.print(io, &[text::PLAY_AGAIN]);
    }

    fn show_digit(&mut self, io: &mut dyn GameIo) {
        let digit = io.random(DIGITS);
        defmt::debug!("Showing {=u8}", digit);
        self.check(io.show_digit(digit));
        match timing::window_ticks(io.ticks_per_second(), self.game.round_duration_s) {
            Ok(ticks) => io.start_stopwatch(ticks),
            Err(e) => self.check(Err(e)),
        }
        let window_ms = self.game.round_duration_s.saturating_mul(1000);
        self.check(io.set_alarm(AlarmId::Timeout, window_ms));
    }

    fn score_correct(&mut self, io: &mut dyn GameIo) {
        let remaining = self.end_reaction(io);
        let ms = timing::reaction_time_ms(io.ticks_per_second(), self.game.round_duration_s, remaining as u32);
        defmt::info!("Correct in {=u32} ms", ms);
        self.game.record_correct(ms);
        self.print(io, &[text::CORRECT, text::reaction_time(ms).as_str(), text::CONTINUE]);
        self.game.finish_round();
    }

    fn score_incorrect(&mut self, io: &mut dyn GameIo) {
        self.end_reaction(io);
        defmt::info!("Incorrect");
        self.print(io, &[text::INCORRECT, text::CONTINUE]);
        self.game.finish_round();
    }

    fn score_timeout(&mut self, io: &mut dyn GameIo) {
        self.end_reaction(io);
        defmt::info!("Timeout");
        self.print(io, &[text::TIMEOUT, text::CONTINUE]);
        self.game.finish_round();
    }
}

/// Reaction game state machine with its bookkeeping
pub struct ReactionGame {
    fsm: StateMachine<Context>,
}

impl ReactionGame {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            fsm: StateMachine::new(Context {
                game: Game::new(config),
                config: *config,
                fault: None,
            }),
        }
    }

    pub fn state(&self) -> GameState {
        self.fsm.state().into()
    }

    pub fn game(&self) -> &Game {
        &self.fsm.context.game
    }

    /// Print the welcome banner and start waiting for the first round
    pub fn init(&mut self, io: &mut dyn GameIo) -> Result<(), crate::Error> {
        self.process(io, Events::Init)
    }

    /// Handle pending events
    ///
    /// Only the first event in priority order is handled, other pending
    /// events are dropped. Events not valid in the current state are ignored.
    /// Returns the event that has been selected.
    pub fn dispatch(&mut self, pending: EventMask, io: &mut dyn GameIo) -> Result<Option<GameEvent>, crate::Error> {
        let Some(event) = GameEvent::select(pending) else {
            return Ok(None);
        };
        if self.state() == GameState::Uninitialized {
            return Err(crate::Error::NotInitialized);
        }

        let dropped = pending & WAIT_MASK & !event.mask();
        if !dropped.is_empty() {
            defmt::debug!("Handling {}, dropping {=u8:#x}", event, dropped.bits());
        }

        let fsm_event = match event {
            GameEvent::StartRound if self.game().rounds_exhausted() => Events::GameOver,
            GameEvent::StartRound => Events::StartRound,
            GameEvent::RestartGame => Events::RestartGame,
            GameEvent::StartCalculation => Events::StartCalculation,
            GameEvent::StopCorrect => Events::StopCorrect,
            GameEvent::StopIncorrect => Events::StopIncorrect,
            GameEvent::StopTimeout => Events::StopTimeout,
        };
        self.process(io, fsm_event)?;
        Ok(Some(event))
    }

    fn process(&mut self, io: &mut dyn GameIo, event: Events) -> Result<(), crate::Error> {
        let before = self.state();
        if self.fsm.process_event(io, event).is_err() {
            defmt::trace!("Event ignored in {}", before);
        }
        match self.fsm.context.fault.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
