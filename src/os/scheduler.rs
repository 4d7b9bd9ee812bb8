use heapless::{Deque, Vec};

use crate::Error;
use super::{AlarmAction, AlarmId, Alarms, Callback, EventMask, EventSet, Task, ALARM_TABLE, N_ALARMS};

/// Maximum number of pending task activations
const READY_CAPACITY: usize = 4;

/// Ready queue, alarms and the event set of the extended task
///
/// This does not run anything by itself. The caller drains [`Scheduler::next_ready`]
/// and runs (or spawns) the returned tasks; on target each task body is an RTIC
/// software task, in tests it is a plain function call.
pub struct Scheduler {
    alarms: Alarms<AlarmAction, N_ALARMS>,
    events: EventSet,
    ready: Deque<Task, READY_CAPACITY>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            alarms: Alarms::new(ALARM_TABLE),
            events: EventSet::new(),
            ready: Deque::new(),
        }
    }

    /// Request task activation; an already pending activation is not duplicated
    pub fn activate(&mut self, task: Task) -> Result<(), Error> {
        if self.ready.iter().any(|t| *t == task) {
            return Ok(());
        }
        self.ready.push_back(task).map_err(|_| Error::ReadyQueueFull)
    }

    /// Post events to an extended task, making it ready
    pub fn set_event(&mut self, task: Task, mask: EventMask) -> Result<(), Error> {
        if !task.is_extended() {
            return Err(Error::NotExtendedTask);
        }
        self.events.set(mask);
        self.activate(task)
    }

    /// Events pending for an extended task
    #[cfg(test)]
    pub fn events(&self, task: Task) -> EventMask {
        if task.is_extended() { self.events.get() } else { EventMask::NONE }
    }

    /// Take (get and clear) all pending events from the `wait` set
    pub fn take_events(&mut self, wait: EventMask) -> Option<EventMask> {
        self.events.take(wait)
    }

    /// Arm alarm with delay and cycle in ticks (cycle 0 = one-shot)
    pub fn set_alarm(&mut self, id: AlarmId, delay: u32, cycle: u32) -> Result<(), Error> {
        defmt::trace!("Alarm {} in {=u32} (cycle {=u32})", id, delay, cycle);
        Ok(self.alarms.set_rel(id as usize, delay, cycle)?)
    }

    pub fn cancel_alarm(&mut self, id: AlarmId) -> Result<bool, Error> {
        Ok(self.alarms.cancel(id as usize)?)
    }

    pub fn alarm_remaining(&self, id: AlarmId) -> Option<u32> {
        self.alarms.remaining(id as usize)
    }

    /// Advance alarms by one tick
    ///
    /// Task activations and events are applied directly, callbacks are returned
    /// so that the caller can run them with access to the resources they need.
    pub fn tick(&mut self) -> Vec<Callback, N_ALARMS> {
        let mut callbacks = Vec::new();
        for action in self.alarms.tick() {
            let result = match action {
                AlarmAction::Activate(task) => self.activate(task),
                AlarmAction::SetEvent(task, mask) => self.set_event(task, mask),
                AlarmAction::Callback(cb) => {
                    callbacks.push(cb).ok();
                    Ok(())
                },
            };
            if let Err(e) = result {
                defmt::warn!("Alarm action {} failed: {}", action, e);
            }
        }
        callbacks
    }

    /// Next task to run
    pub fn next_ready(&mut self) -> Option<Task> {
        self.ready.pop_front()
    }

    #[cfg(test)]
    pub fn has_ready(&self) -> bool {
        !self.ready.is_empty()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::{START_CALCULATION, START_ROUND, STOP_TIMEOUT};

    fn drain(sched: &mut Scheduler) -> std::vec::Vec<Task> {
        core::iter::from_fn(|| sched.next_ready()).collect()
    }

    #[test]
    fn activation_is_not_duplicated() {
        let mut sched = Scheduler::new();
        sched.activate(Task::Fader).unwrap();
        sched.activate(Task::Fader).unwrap();
        sched.activate(Task::Glower).unwrap();
        assert_eq!(drain(&mut sched), vec![Task::Fader, Task::Glower]);
        assert!(!sched.has_ready());
    }

    #[test]
    fn events_wake_extended_task_once() {
        let mut sched = Scheduler::new();
        sched.set_event(Task::ReactionGame, START_ROUND).unwrap();
        sched.set_event(Task::ReactionGame, STOP_TIMEOUT).unwrap();
        assert_eq!(drain(&mut sched), vec![Task::ReactionGame]);
        assert_eq!(sched.events(Task::ReactionGame), START_ROUND | STOP_TIMEOUT);
        assert_eq!(sched.take_events(START_ROUND | STOP_TIMEOUT), Some(START_ROUND | STOP_TIMEOUT));
        assert_eq!(sched.take_events(START_ROUND), None);
    }

    #[test]
    fn events_rejected_for_basic_tasks() {
        let mut sched = Scheduler::new();
        assert_eq!(sched.set_event(Task::Fader, START_ROUND), Err(Error::NotExtendedTask));
        assert_eq!(sched.events(Task::Fader), EventMask::NONE);
        assert!(!sched.has_ready());
    }

    #[test]
    fn ready_queue_limit() {
        let mut sched = Scheduler::new();
        // Fill the queue by hand; the application only has three tasks
        for _ in 0..READY_CAPACITY {
            sched.ready.push_back(Task::Fader).unwrap();
        }
        assert_eq!(sched.activate(Task::Glower), Err(Error::ReadyQueueFull));
    }

    #[test]
    fn alarm_actions() {
        let mut sched = Scheduler::new();
        sched.set_alarm(AlarmId::Display, 2, 0).unwrap();
        sched.set_alarm(AlarmId::Timeout, 3, 0).unwrap();
        sched.set_alarm(AlarmId::Fader, 1, 1).unwrap();

        assert!(sched.tick().is_empty());
        assert_eq!(drain(&mut sched), vec![Task::Fader]);

        assert!(sched.tick().is_empty());
        assert_eq!(drain(&mut sched), vec![Task::ReactionGame, Task::Fader]);
        assert_eq!(sched.take_events(START_CALCULATION), Some(START_CALCULATION));

        assert_eq!(sched.tick().as_slice(), &[Callback::RoundTimeout]);
        assert_eq!(drain(&mut sched), vec![Task::Fader]);
        assert_eq!(sched.alarm_remaining(AlarmId::Timeout), None);
    }

    #[test]
    fn zero_delay_rejected() {
        let mut sched = Scheduler::new();
        assert_eq!(
            sched.set_alarm(AlarmId::Glower, 0, 0),
            Err(Error::Alarm(crate::os::AlarmError::ZeroDelay))
        );
    }

    #[test]
    fn cancelled_alarm_does_not_fire() {
        let mut sched = Scheduler::new();
        sched.set_alarm(AlarmId::Display, 1, 0).unwrap();
        assert_eq!(sched.cancel_alarm(AlarmId::Display), Ok(true));
        sched.tick();
        assert!(!sched.has_ready());
    }
}
