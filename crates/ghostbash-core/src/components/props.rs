//! Prop components: gummy pickups and the friendly healer.

use serde::{Deserialize, Serialize};

/// A gummy bear pickup, spawned where a ghost was defeated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Gummy {
    /// Stable id within the room, in spawn order.
    pub id: u32,
    /// One-way flag; a collected gummy only waits for its despawn.
    pub collected: bool,
}

impl Gummy {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            collected: false,
        }
    }
}

/// The friendly healer character. One per room, usually hidden; pops up
/// during lights-off phases and heals a hurt player once per visit.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Healer {
    pub visible: bool,
    /// Latch: at most one heal per appearance.
    pub healed_this_visit: bool,
}

impl Healer {
    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn can_heal(&self) -> bool {
        self.visible && !self.healed_this_visit
    }
}
