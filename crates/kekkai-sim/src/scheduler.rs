//! Deferred, cancellable events keyed to simulation time.
//!
//! Anything that must happen "later" (the next wave, a tank repair, a
//! chain-reaction destroy) is queued here instead of on a wall-clock
//! timer, so a terminal transition can cancel it. The queue is drained
//! once per tick; each action re-validates its targets when it runs.

use hecs::Entity;

/// Identifier returned by [`EventQueue::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    AdvanceWave,
    RestoreWaterTank,
    /// Destroy a barrier reached by a chain reaction.
    ChainDestroy { barrier: Entity },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledEvent {
    pub id: EventId,
    pub due_secs: f64,
    /// Entity whose removal cancels the event.
    pub owner: Option<Entity>,
    pub action: DeferredAction,
}

#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<ScheduledEvent>,
    next_id: u64,
}

impl EventQueue {
    pub fn schedule(
        &mut self,
        due_secs: f64,
        owner: Option<Entity>,
        action: DeferredAction,
    ) -> EventId {
        let id = EventId(self.next_id);
        self.next_id += 1;
        self.events.push(ScheduledEvent {
            id,
            due_secs,
            owner,
            action,
        });
        id
    }

    /// Returns whether the event was still pending.
    pub fn cancel(&mut self, id: EventId) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        self.events.len() != before
    }

    /// Cancel every event owned by `owner`. Returns how many were dropped.
    pub fn cancel_owner(&mut self, owner: Entity) -> usize {
        let before = self.events.len();
        self.events.retain(|e| e.owner != Some(owner));
        before - self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Remove and return every event due at `now_secs`, earliest first.
    /// Events with equal due times keep scheduling order.
    pub fn drain_due(&mut self, now_secs: f64) -> Vec<ScheduledEvent> {
        let (mut due, pending): (Vec<_>, Vec<_>) = self
            .events
            .drain(..)
            .partition(|e| e.due_secs <= now_secs);
        self.events = pending;
        due.sort_by(|a, b| a.due_secs.total_cmp(&b.due_secs).then(a.id.cmp(&b.id)));
        due
    }

    pub fn pending(&self) -> impl Iterator<Item = &ScheduledEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
