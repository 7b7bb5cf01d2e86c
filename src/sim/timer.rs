//! Cancellable deferred tasks on a virtual clock
//!
//! Engines own a [`Scheduler`] and advance it with the host's timestamps.
//! Each kind of deferred work is tracked through a [`TimerSlot`], so at most
//! one task of that kind is ever outstanding.

use crate::consts::TIME_EPSILON;

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct Task<E> {
    id: u64,
    due_at: f64,
    event: E,
}

/// Deadline-ordered task queue
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    now: f64,
    next_id: u64,
    tasks: Vec<Task<E>>,
}

impl<E> Scheduler<E> {
    pub fn new(now: f64) -> Self {
        Self {
            now,
            next_id: 1,
            tasks: Vec::new(),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Schedule `event` to fire `delay` seconds from now
    pub fn schedule(&mut self, delay: f64, event: E) -> TaskHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            due_at: self.now + delay.max(0.0),
            event,
        });
        TaskHandle(id)
    }

    /// Cancel a task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self.tasks.iter().position(|t| t.id == handle.0) {
            Some(i) => {
                self.tasks.swap_remove(i);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.id == handle.0)
    }

    /// Deadline of a pending task
    pub fn due_at(&self, handle: TaskHandle) -> Option<f64> {
        self.tasks.iter().find(|t| t.id == handle.0).map(|t| t.due_at)
    }

    /// Number of outstanding tasks
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Drop every outstanding task
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Pop the earliest task due at or before `until`.
    ///
    /// The clock moves to the task's deadline so anything it schedules is
    /// timed from the moment it fired. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: f64) -> Option<(TaskHandle, E)> {
        let next = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_at <= until + TIME_EPSILON)
            .min_by(|(_, a), (_, b)| {
                a.due_at
                    .partial_cmp(&b.due_at)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.id.cmp(&b.id))
            })
            .map(|(i, _)| i)?;
        let task = self.tasks.swap_remove(next);
        self.now = self.now.max(task.due_at);
        Some((TaskHandle(task.id), task.event))
    }

    /// Move the clock forward (never backward)
    pub fn advance_to(&mut self, now: f64) {
        self.now = self.now.max(now);
    }
}

/// Tracks the single outstanding task of one kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerSlot(Option<TaskHandle>);

impl TimerSlot {
    /// Cancel whatever this slot holds, then schedule `event`
    pub fn rearm<E>(&mut self, scheduler: &mut Scheduler<E>, delay: f64, event: E) -> TaskHandle {
        self.disarm(scheduler);
        let handle = scheduler.schedule(delay, event);
        self.0 = Some(handle);
        handle
    }

    /// Cancel the held task, if any. Idempotent.
    pub fn disarm<E>(&mut self, scheduler: &mut Scheduler<E>) {
        if let Some(handle) = self.0.take() {
            scheduler.cancel(handle);
        }
    }

    /// Forget `handle` after it fired. Returns false for a stale handle.
    pub fn settle(&mut self, handle: TaskHandle) -> bool {
        if self.0 == Some(handle) {
            self.0 = None;
            true
        } else {
            false
        }
    }

    pub fn handle(&self) -> Option<TaskHandle> {
        self.0
    }

    pub fn is_armed(&self) -> bool {
        self.0.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_deadline_order() {
        let mut s = Scheduler::new(0.0);
        s.schedule(3.0, "late");
        s.schedule(1.0, "early");
        s.schedule(1.0, "early-second");

        let fired: Vec<_> = std::iter::from_fn(|| s.pop_due(5.0).map(|(_, e)| e)).collect();
        assert_eq!(fired, vec!["early", "early-second", "late"]);
        assert_eq!(s.now(), 3.0);
    }

    #[test]
    fn test_not_due_yet() {
        let mut s = Scheduler::new(0.0);
        s.schedule(2.0, ());
        assert!(s.pop_due(1.99).is_none());
        assert!(s.pop_due(2.0).is_some());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut s = Scheduler::new(0.0);
        let h = s.schedule(1.0, ());
        assert!(s.cancel(h));
        assert!(!s.cancel(h));
        assert!(s.pop_due(10.0).is_none());
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let mut s = Scheduler::new(0.0);
        let h = s.schedule(1.0, ());
        assert!(s.pop_due(1.0).is_some());
        assert!(!s.cancel(h));
    }

    #[test]
    fn test_schedule_relative_to_fire_time() {
        let mut s = Scheduler::new(0.0);
        s.schedule(1.0, ());
        s.pop_due(10.0);
        let h = s.schedule(0.5, ());
        assert_eq!(s.due_at(h), Some(1.5));
    }

    #[test]
    fn test_clock_never_moves_back() {
        let mut s: Scheduler<()> = Scheduler::new(5.0);
        s.advance_to(3.0);
        assert_eq!(s.now(), 5.0);
        s.advance_to(6.0);
        assert_eq!(s.now(), 6.0);
    }

    #[test]
    fn test_slot_rearm_replaces_pending() {
        let mut s = Scheduler::new(0.0);
        let mut slot = TimerSlot::default();
        let first = slot.rearm(&mut s, 5.0, "idle");
        let second = slot.rearm(&mut s, 2.0, "resolve");
        assert!(!s.is_pending(first));
        assert!(s.is_pending(second));
        assert_eq!(s.pending(), 1);

        let (handle, event) = s.pop_due(10.0).unwrap();
        assert_eq!(event, "resolve");
        assert!(slot.settle(handle));
        assert!(!slot.is_armed());
    }

    #[test]
    fn test_slot_ignores_stale_handle() {
        let mut s = Scheduler::new(0.0);
        let mut slot = TimerSlot::default();
        let stale = s.schedule(1.0, ());
        slot.rearm(&mut s, 2.0, ());
        assert!(!slot.settle(stale));
        assert!(slot.is_armed());
    }

    #[test]
    fn test_slot_disarm_twice() {
        let mut s = Scheduler::new(0.0);
        let mut slot = TimerSlot::default();
        slot.rearm(&mut s, 1.0, ());
        slot.disarm(&mut s);
        slot.disarm(&mut s);
        assert_eq!(s.pending(), 0);
        assert_eq!(slot.handle(), None);
    }
}
