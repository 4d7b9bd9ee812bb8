use quote::{quote, ToTokens, TokenStreamExt};
use serde::{Serialize, Deserialize};
use schemars::JsonSchema;

use crate::impl_struct_to_tokens;

/// Game rules
#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
pub struct GameConfig {
    /// Rounds in a single game cycle
    pub max_rounds: u32,
    /// Reaction window in seconds
    pub round_duration_s: u32,
    /// Upper bound of the random delay before showing a digit
    pub max_start_delay_s: u8,
}

impl_struct_to_tokens! {
    struct GameConfig: crate::game::GameConfig { max_rounds, round_duration_s, max_start_delay_s, }
}
