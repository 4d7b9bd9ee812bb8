use crate::Error;

/// Counter ticks of the whole reaction window
///
/// The stopwatch is a 16-bit down-counter loaded with this value.
pub fn window_ticks(ticks_per_second: u32, duration_s: u32) -> Result<u16, Error> {
    ticks_per_second.checked_mul(duration_s)
        .and_then(|t| u16::try_from(t).ok())
        .ok_or(Error::WindowTooLong)
}

/// Reaction time from the value left in the down-counter when it was stopped
///
/// The counter was loaded with the whole window. A reading above the loaded
/// value (counter already reloaded) counts as no time elapsed.
pub fn reaction_time_ms(ticks_per_second: u32, duration_s: u32, remaining: u32) -> u32 {
    if ticks_per_second == 0 {
        return 0;
    }
    let total = ticks_per_second.saturating_mul(duration_s);
    let elapsed = total.saturating_sub(remaining);
    // u64 to keep `elapsed * 1000` exact for any window
    (elapsed as u64 * 1000 / ticks_per_second as u64) as u32
}
