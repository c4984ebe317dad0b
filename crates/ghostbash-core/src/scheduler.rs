//! Deferred-effect scheduler, driven by the simulation clock.
//!
//! Time-delayed effects (gummy spawns, the auto lights-on, the healer's
//! comings and goings, room-completion grace) accumulate here and fire
//! inside the tick once the clock crosses their threshold. Nothing runs
//! outside the tick, so a torn-down room can always cancel its pending
//! effects before they touch replaced state: the queue is cleared on room
//! transition and restart, and keyed entries can be cancelled selectively.

use hecs::Entity;

use crate::components::Vec2;

/// A deferred mutation of the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Drop a gummy where a ghost was defeated.
    SpawnGummy { at: Vec2 },
    /// Remove a collected gummy once its collection animation is over.
    DespawnGummy { entity: Entity },
    /// Turn the lights on after the last ghost in the room is defeated.
    ForceLightsOn,
    /// Grace period expired: auto-collect leftovers and wrap up the room.
    CompleteRoom,
    /// Leave the room (next-room screen or victory).
    FinishRoom,
    HealerAppear,
    HealerHide,
}

/// Cancellation scope for scheduled effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKey {
    /// Effects tied to the current room's combat/completion flow.
    Room,
    /// The healer's appearance cycle.
    Healer,
}

impl Effect {
    pub fn key(&self) -> EffectKey {
        match self {
            Effect::HealerAppear | Effect::HealerHide => EffectKey::Healer,
            _ => EffectKey::Room,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    fires_at: f64,
    effect: Effect,
}

/// Pending deferred effects against the simulation clock.
#[derive(Debug, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `effect` to fire `delay` seconds from `now`.
    pub fn schedule(&mut self, now: f64, delay: f32, effect: Effect) {
        self.entries.push(Entry {
            fires_at: now + f64::from(delay),
            effect,
        });
    }

    /// Like [`schedule`](Self::schedule) but a no-op if an identical effect
    /// is already pending. Keeps repeat triggers (light flicking with zero
    /// ghosts left) from stacking duplicate completions.
    pub fn schedule_unique(&mut self, now: f64, delay: f32, effect: Effect) {
        if !self.entries.iter().any(|e| e.effect == effect) {
            self.schedule(now, delay, effect);
        }
    }

    /// Remove every effect due at or before `now` and return them in
    /// firing order.
    pub fn drain_due(&mut self, now: f64) -> Vec<Effect> {
        let mut due: Vec<Entry> = Vec::new();
        self.entries.retain(|e| {
            if e.fires_at <= now {
                due.push(*e);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| {
            a.fires_at
                .partial_cmp(&b.fires_at)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        due.into_iter().map(|e| e.effect).collect()
    }

    /// Cancel all pending effects in one scope.
    pub fn cancel(&mut self, key: EffectKey) {
        self.entries.retain(|e| e.effect.key() != key);
    }

    /// Cancel everything; used when a room is torn down.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an identical effect is pending (used by tests).
    pub fn has(&self, effect: Effect) -> bool {
        self.entries.iter().any(|e| e.effect == effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_only_when_due() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.0, 0.5, Effect::ForceLightsOn);

        assert!(scheduler.drain_due(0.4).is_empty());
        assert_eq!(scheduler.drain_due(0.5), vec![Effect::ForceLightsOn]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_drain_orders_by_fire_time() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.0, 1.0, Effect::CompleteRoom);
        scheduler.schedule(0.0, 0.5, Effect::ForceLightsOn);

        let due = scheduler.drain_due(2.0);
        assert_eq!(due, vec![Effect::ForceLightsOn, Effect::CompleteRoom]);
    }

    #[test]
    fn test_schedule_unique_dedups() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_unique(0.0, 1.0, Effect::CompleteRoom);
        scheduler.schedule_unique(0.0, 2.0, Effect::CompleteRoom);
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_cancel_by_key_leaves_other_scope() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.0, 1.0, Effect::HealerAppear);
        scheduler.schedule(0.0, 1.0, Effect::ForceLightsOn);

        scheduler.cancel(EffectKey::Healer);
        assert_eq!(scheduler.len(), 1);
        assert!(scheduler.has(Effect::ForceLightsOn));
        assert!(!scheduler.has(Effect::HealerAppear));
    }

    #[test]
    fn test_clear_cancels_everything() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.0, 1.0, Effect::HealerAppear);
        scheduler.schedule(0.0, 1.0, Effect::CompleteRoom);
        scheduler.clear();
        assert!(scheduler.is_empty());
    }
}
