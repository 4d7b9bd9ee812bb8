use core::ops::{BitAnd, BitOr, BitOrAssign, Not};

/// Set of event bits addressed to a single extended task
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, defmt::Format)]
pub struct EventMask(u8);

impl EventMask {
    pub const NONE: Self = Self(0);

    /// Mask with only the given bit set
    pub const fn bit(n: u8) -> Self {
        Self(1 << n)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True if any of the bits in `other` is also set here
    pub const fn intersects(&self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for EventMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for EventMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for EventMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for EventMask {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

/// Pending events of an extended task
///
/// Posting is merged: several posts before the task runs end up as a single
/// wakeup with the combined mask.
#[derive(Default)]
pub struct EventSet {
    pending: EventMask,
}

impl EventSet {
    pub const fn new() -> Self {
        Self { pending: EventMask::NONE }
    }

    /// Post events
    pub fn set(&mut self, mask: EventMask) {
        self.pending |= mask;
    }

    /// Currently pending events
    pub fn get(&self) -> EventMask {
        self.pending
    }

    /// Clear given events, leaving others pending
    pub fn clear(&mut self, mask: EventMask) {
        self.pending = self.pending & !mask;
    }

    /// Check if waiting on `wait` would return immediately
    #[cfg(test)]
    pub fn is_ready(&self, wait: EventMask) -> bool {
        self.pending.intersects(wait)
    }

    /// Get and clear all pending events from the `wait` set
    ///
    /// Returns `None` if the task would stay blocked.
    pub fn take(&mut self, wait: EventMask) -> Option<EventMask> {
        let ev = self.pending & wait;
        if ev.is_empty() {
            return None;
        }
        self.clear(ev);
        Some(ev)
    }
}
