use heapless::Vec;

/// Reasons for rejecting an alarm request
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum AlarmError {
    /// No alarm with this index
    InvalidId,
    /// Relative delay of 0 ticks would never expire
    ZeroDelay,
}

/// Software alarm counting ticks of a periodic interrupt
#[derive(Clone, Copy)]
struct Alarm<A> {
    action: A,
    expires_in: Option<u32>,
    cycle: u32,
}

/// Fixed table of software alarms
///
/// Each alarm has a static action that is returned from [`Alarms::tick`] when
/// it expires. One-shot alarms disarm after firing, cyclic ones reload with
/// their cycle. Arming an alarm that is already armed restarts it, so there is
/// never more than one pending expiry per alarm.
pub struct Alarms<A: Copy, const N: usize> {
    alarms: [Alarm<A>; N],
}

impl<A: Copy, const N: usize> Alarms<A, N> {
    /// Create all alarms disarmed
    pub fn new(actions: [A; N]) -> Self {
        Self {
            alarms: actions.map(|action| Alarm { action, expires_in: None, cycle: 0 }),
        }
    }

    /// Arm alarm to expire after `delay` ticks, then every `cycle` ticks (0 = one-shot)
    pub fn set_rel(&mut self, id: usize, delay: u32, cycle: u32) -> Result<(), AlarmError> {
        if delay == 0 {
            return Err(AlarmError::ZeroDelay);
        }
        let alarm = self.alarms.get_mut(id).ok_or(AlarmError::InvalidId)?;
        alarm.expires_in = Some(delay);
        alarm.cycle = cycle;
        Ok(())
    }

    /// Disarm alarm; returns true if it was armed
    pub fn cancel(&mut self, id: usize) -> Result<bool, AlarmError> {
        let alarm = self.alarms.get_mut(id).ok_or(AlarmError::InvalidId)?;
        Ok(alarm.expires_in.take().is_some())
    }

    /// Ticks left until expiry or `None` when disarmed
    pub fn remaining(&self, id: usize) -> Option<u32> {
        self.alarms.get(id)?.expires_in
    }

    #[cfg(test)]
    pub fn is_armed(&self, id: usize) -> bool {
        self.remaining(id).is_some()
    }

    /// Advance time by one tick, returning actions of expired alarms in table order
    pub fn tick(&mut self) -> Vec<A, N> {
        let mut fired = Vec::new();
        for alarm in self.alarms.iter_mut() {
            let Some(left) = alarm.expires_in else { continue };
            if left > 1 {
                alarm.expires_in = Some(left - 1);
                continue;
            }
            alarm.expires_in = match alarm.cycle {
                0 => None,
                cycle => Some(cycle),
            };
            // At most one expiry per alarm per tick, so this cannot overflow
            fired.push(alarm.action).ok();
        }
        fired
    }
}
