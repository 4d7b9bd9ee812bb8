use super::GameConfig;

/// Round and score bookkeeping of a single game cycle
#[derive(Clone, PartialEq, Eq, Debug, defmt::Format)]
pub struct Game {
    /// Current round, 1-based; `max_rounds + 1` means the cycle is over
    pub round: u32,
    pub max_rounds: u32,
    /// Sum of reaction times of correct rounds
    pub total_time_ms: u32,
    pub correct_presses: u32,
    pub round_duration_s: u32,
}

impl Game {
    pub const fn new(config: &GameConfig) -> Self {
        Self {
            round: 1,
            max_rounds: config.max_rounds,
            total_time_ms: 0,
            correct_presses: 0,
            round_duration_s: config.round_duration_s,
        }
    }

    /// Start a new game cycle keeping the configuration
    pub fn reset(&mut self) {
        self.round = 1;
        self.total_time_ms = 0;
        self.correct_presses = 0;
    }

    /// Account a correct answer; must be followed by [`Game::finish_round`]
    pub fn record_correct(&mut self, reaction_ms: u32) {
        self.total_time_ms = self.total_time_ms.saturating_add(reaction_ms);
        self.correct_presses += 1;
    }

    /// Called exactly once for every correct, incorrect or timed out round
    pub fn finish_round(&mut self) {
        self.round += 1;
    }

    pub fn rounds_exhausted(&self) -> bool {
        self.round > self.max_rounds
    }

    /// Average reaction time, `None` if there was no correct press
    pub fn average_ms(&self) -> Option<u32> {
        self.total_time_ms.checked_div(self.correct_presses)
    }
}
