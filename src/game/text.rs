//! Console messages of the game

use heapless::String;

use crate::utils::format_number;

/// Fits the longest console line
pub const LINE_LEN: usize = 64;

pub type Line = String<LINE_LEN>;

pub const WELCOME: &str = "Welcome to the Reaction Game\n";
pub const INSTRUCTIONS: &str = "Press a right button for 1 and a left button for 2\n";
pub const PRESS_TO_BEGIN: &str = "Press any key to begin\n";
pub const CORRECT: &str = "Great! Correct Button Pressed\n";
pub const INCORRECT: &str = "Incorrect Button Pressed\n";
pub const TIMEOUT: &str = "Time ran out\n";
pub const CONTINUE: &str = "Press any button to continue\n";
pub const PLAY_AGAIN: &str = "Press any key to play again\n";

/// `<label><number>\n`
fn labelled(label: &str, value: Option<u32>) -> Line {
    let mut line = Line::new();
    // Labels are short constants and numbers take at most 10 digits
    line.push_str(label).ok();
    match value {
        Some(v) => line.push_str(&format_number(v)).ok(),
        None => line.push_str("N/A").ok(),
    };
    line.push('\n').ok();
    line
}

pub fn round_started(round: u32) -> Line {
    let mut line = labelled("Round ", Some(round));
    line.pop();
    line.push_str(" started!\n").ok();
    line
}

pub fn reaction_time(ms: u32) -> Line {
    labelled("Reaction Time in ms: ", Some(ms))
}

pub fn correct_presses(count: u32) -> Line {
    labelled("Correct presses : ", Some(count))
}

pub fn total_time(ms: u32) -> Line {
    labelled("Total time : ", Some(ms))
}

/// Prints "N/A" when there is nothing to average
pub fn average_time(ms: Option<u32>) -> Line {
    labelled("Average time : ", ms)
}
