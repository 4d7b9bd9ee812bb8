use rtic::Mutex;
use ufmt::uWrite;

use crate::Error;
use crate::bsp::{Position, SevenSegment, Stopwatch};
use crate::os::{ms_to_ticks, AlarmId, EventMask, Scheduler, Task};
use super::{Dice, GameIo};

/// Binds peripherals and the scheduler for the duration of a single dispatch
///
/// The scheduler is shared with interrupts so it is only locked for each short
/// operation, never while printing.
pub struct IoContext<'a, C, D, S, M> {
    pub console: &'a mut C,
    pub display: &'a mut D,
    pub stopwatch: &'a mut S,
    pub dice: &'a mut Dice,
    pub scheduler: M,
}

impl<'a, C, D, S, M> GameIo for IoContext<'a, C, D, S, M>
where
    C: uWrite<Error = Error>,
    D: SevenSegment,
    S: Stopwatch,
    M: Mutex<T = Scheduler>,
{
    fn print(&mut self, text: &str) -> Result<(), Error> {
        self.console.write_str(text)
    }

    fn show_digit(&mut self, digit: u8) -> Result<(), Error> {
        for position in Position::ALL {
            self.display.set(position, digit)?;
        }
        Ok(())
    }

    fn clear_display(&mut self) {
        self.display.clear();
    }

    fn ticks_per_second(&self) -> u32 {
        self.stopwatch.ticks_per_second()
    }

    fn start_stopwatch(&mut self, ticks: u16) {
        self.stopwatch.start(ticks);
    }

    fn stop_stopwatch(&mut self) -> u16 {
        self.stopwatch.stop()
    }

    fn random(&mut self, limit: u8) -> u8 {
        self.dice.roll(limit)
    }

    fn set_alarm(&mut self, id: AlarmId, delay_ms: u32) -> Result<(), Error> {
        self.scheduler.lock(|s| s.set_alarm(id, ms_to_ticks(delay_ms), 0))
    }

    fn cancel_alarm(&mut self, id: AlarmId) -> Result<(), Error> {
        self.scheduler.lock(|s| s.cancel_alarm(id)).map(|_| ())
    }

    fn post(&mut self, mask: EventMask) -> Result<(), Error> {
        self.scheduler.lock(|s| s.set_event(Task::ReactionGame, mask))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::{Button, Buttons, mock::*};
    use crate::game::events::{classify_press, on_timeout, WAIT_MASK};
    use crate::game::{GameConfig, GameState, ReactionGame};
    use crate::os::Callback;

    /// Plain borrow standing in for an RTIC resource proxy
    struct Owned<'a>(&'a mut Scheduler);

    impl Mutex for Owned<'_> {
        type T = Scheduler;

        fn lock<R>(&mut self, f: impl FnOnce(&mut Scheduler) -> R) -> R {
            f(self.0)
        }
    }

    const CONFIG: GameConfig = GameConfig { max_rounds: 10, round_duration_s: 1, max_start_delay_s: 3 };

    /// Whole game wired the same way as in firmware, with simulated time
    struct Sim {
        console: MockConsole,
        display: MockDisplay,
        stopwatch: MockStopwatch,
        buttons: MockButtons,
        dice: Dice,
        scheduler: Scheduler,
        game: ReactionGame,
    }

    impl Sim {
        fn new(config: &GameConfig) -> Self {
            let mut sim = Self {
                console: MockConsole::default(),
                display: MockDisplay::default(),
                stopwatch: MockStopwatch::new(12000),
                buttons: MockButtons::default(),
                dice: Dice::seeded(0x5eed),
                scheduler: Scheduler::new(),
                game: ReactionGame::new(config),
            };
            let mut io = IoContext {
                console: &mut sim.console,
                display: &mut sim.display,
                stopwatch: &mut sim.stopwatch,
                dice: &mut sim.dice,
                scheduler: Owned(&mut sim.scheduler),
            };
            sim.game.init(&mut io).unwrap();
            sim
        }

        fn run(&mut self) {
            while let Some(task) = self.scheduler.next_ready() {
                if task != Task::ReactionGame {
                    continue;
                }
                let Some(pending) = self.scheduler.take_events(WAIT_MASK) else {
                    continue;
                };
                let mut io = IoContext {
                    console: &mut self.console,
                    display: &mut self.display,
                    stopwatch: &mut self.stopwatch,
                    dice: &mut self.dice,
                    scheduler: Owned(&mut self.scheduler),
                };
                self.game.dispatch(pending, &mut io).unwrap();
            }
        }

        fn press(&mut self, button: Button) {
            self.buttons.pressed = vec![button];
            let digit = self.display.get(Position::Left);
            if let Some(mask) = classify_press(self.game.state(), digit, self.buttons.pressed_side()) {
                self.scheduler.set_event(Task::ReactionGame, mask).unwrap();
            }
            self.buttons.pressed.clear();
            self.run();
        }

        fn tick(&mut self, ms: u32) {
            for _ in 0..ms {
                self.stopwatch.advance(12);
                for callback in self.scheduler.tick() {
                    match callback {
                        Callback::RoundTimeout => {
                            if let Some(mask) = on_timeout(self.game.state()) {
                                self.scheduler.set_event(Task::ReactionGame, mask).unwrap();
                            }
                        },
                    }
                }
                self.run();
            }
        }

        /// Start round and wait for the digit, returns the delay in ms
        fn start_round(&mut self) -> u32 {
            self.press(Button::Left2);
            assert_eq!(self.game.state(), GameState::WaitingDisplay);
            let mut waited = 0;
            while self.game.state() != GameState::WaitingUserReaction {
                assert!(waited <= 3000, "digit not shown");
                self.tick(1);
                waited += 1;
            }
            waited
        }

        fn button_for(&self, correct: bool) -> Button {
            let digit = self.display.get(Position::Right).unwrap();
            match (digit, correct) {
                (1, true) | (2, false) => Button::Right1,
                _ => Button::Left1,
            }
        }
    }

    #[test]
    fn correct_reaction_measured() {
        let mut sim = Sim::new(&CONFIG);
        assert!(sim.console.out.starts_with("Welcome to the Reaction Game\n"));

        let delay = sim.start_round();
        assert!((1000..=3000).contains(&delay) && delay % 1000 == 0, "delay {}", delay);
        assert!(sim.console.out.contains("Round 1 started!\n"));
        let digit = sim.display.get(Position::Left);
        assert!(matches!(digit, Some(1 | 2)));
        assert_eq!(sim.display.get(Position::Right), digit);

        sim.tick(250);
        let button = sim.button_for(true);
        sim.press(button);
        assert_eq!(sim.game.state(), GameState::WaitingRoundStart);
        assert!(sim.console.out.ends_with(
            "Great! Correct Button Pressed\nReaction Time in ms: 250\nPress any button to continue\n"
        ));
        assert_eq!(sim.display.get(Position::Left), None);
        assert!(!sim.stopwatch.running);
        assert_eq!(sim.scheduler.alarm_remaining(AlarmId::Timeout), None);
    }

    #[test]
    fn two_second_window_measured_in_ms() {
        let config = GameConfig { round_duration_s: 2, ..CONFIG };
        let mut sim = Sim::new(&config);
        sim.start_round();
        sim.tick(500);
        let button = sim.button_for(true);
        sim.press(button);
        assert!(sim.console.out.contains("Reaction Time in ms: 500\n"));
        assert_eq!(sim.game.game().total_time_ms, 500);

        // Window lasts the full two seconds
        sim.start_round();
        sim.tick(1999);
        assert_eq!(sim.game.state(), GameState::WaitingUserReaction);
        sim.tick(1);
        assert!(sim.console.out.ends_with("Time ran out\nPress any button to continue\n"));
    }

    #[test]
    fn unanswered_round_times_out() {
        let mut sim = Sim::new(&CONFIG);
        sim.start_round();
        sim.tick(999);
        assert_eq!(sim.game.state(), GameState::WaitingUserReaction);
        sim.tick(1);
        assert_eq!(sim.game.state(), GameState::WaitingRoundStart);
        assert!(sim.console.out.ends_with("Time ran out\nPress any button to continue\n"));

        let out = sim.console.out.clone();
        sim.tick(5000);
        assert_eq!(sim.console.out, out);
        assert_eq!(sim.game.game().round, 2);
    }

    #[test]
    fn press_while_waiting_for_digit_is_ignored() {
        let mut sim = Sim::new(&CONFIG);
        sim.press(Button::Right1);
        assert_eq!(sim.game.state(), GameState::WaitingDisplay);
        sim.press(Button::Left1);
        assert_eq!(sim.game.state(), GameState::WaitingDisplay);
        assert_eq!(sim.console.out.matches("started!").count(), 1);
    }

    #[test]
    fn full_game_restarts() {
        let mut sim = Sim::new(&CONFIG);
        for _ in 0..10 {
            sim.start_round();
            sim.tick(100);
            let button = sim.button_for(false);
            sim.press(button);
        }
        assert_eq!(sim.game.game().round, 11);

        // Summary is followed by the restart posted by the game itself
        sim.press(Button::Right2);
        assert_eq!(sim.game.state(), GameState::WaitingRoundStart);
        assert!(sim.console.out.ends_with(
            "Correct presses : 0\nTotal time : 0\nAverage time : N/A\nPress any key to play again\n"
        ));
        assert_eq!(sim.game.game().round, 1);

        sim.start_round();
        assert!(sim.console.out.contains("Round 1 started!\n"));
    }
}
