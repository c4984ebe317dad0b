//! Discrete game events, queued for the presentation layer.
//!
//! The simulation never plays sounds or touches visuals; it records what
//! happened each tick and the boundary layer drains the queue to trigger
//! feedback externally.

use serde::{Deserialize, Serialize};

use crate::components::Vec2;

/// Something noteworthy that happened during a tick or player action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LightsOn,
    LightsOff,
    /// A melee attack connected and defeated a ghost.
    GhostDefeated { ghost: usize },
    /// A nearest-ghost attack found nothing in reach.
    AttackMissed,
    GummySpawned { id: u32, at: Vec2 },
    GummyCollected { id: u32, total: u32 },
    PlayerDamaged { remaining: u32 },
    PlayerDefeated,
    PlayerRespawned,
    PlayerHealed { health: u32 },
    HealerAppeared { at: Vec2 },
    HealerHidden,
    RoomComplete { room: usize, gummies: u32 },
    Victory { gummies: u32 },
    GameRestarted,
}

/// FIFO queue of pending events, drained once per frame by the caller.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.pending.push(event);
    }

    /// Take all pending events, oldest first.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
