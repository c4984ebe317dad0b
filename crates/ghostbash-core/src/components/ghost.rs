//! Ghost components: identity, home anchor, and the behavior state machine.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::common::Vec2;
use crate::constants::{PATROL_RETARGET_MAX, PATROL_RETARGET_MIN, PATROL_WANDER_RADIUS};

/// A ghost's stable index within its room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ghost {
    pub index: usize,
}

/// Spawn point, used as the patrol anchor and the respawn-reset position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Home(pub Vec2);

/// Terminal marker: a defeated ghost no longer participates in AI,
/// collision, or drawing. Never removed for the lifetime of the room.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Defeated;

/// Behavior state machine. Timers live inside the variants so a state
/// carries exactly the data its logic needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GhostState {
    /// Wandering near home, re-picking a target on a random interval.
    Patrol { target: Vec2, retarget_in: f32 },
    /// Stationary telegraph before committing to the chase.
    Alert { remaining: f32 },
    /// Heading straight for the player at chase speed.
    Chase,
    /// Stationary recovery after landing a hit; resumes the chase.
    Cooldown { remaining: f32 },
}

/// State machine phase without per-state data, for views and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GhostPhase {
    Patrol,
    Alert,
    Chase,
    Cooldown,
}

impl GhostPhase {
    pub fn name(self) -> &'static str {
        match self {
            Self::Patrol => "patrol",
            Self::Alert => "alert",
            Self::Chase => "chase",
            Self::Cooldown => "cooldown",
        }
    }
}

impl GhostState {
    /// Fresh patrol state with a random wander target near home.
    pub fn patrol_near(home: Vec2, rng: &mut impl Rng) -> Self {
        Self::Patrol {
            target: wander_target(home, rng),
            retarget_in: rng.gen_range(PATROL_RETARGET_MIN..PATROL_RETARGET_MAX),
        }
    }

    pub fn alert() -> Self {
        Self::Alert {
            remaining: crate::constants::ALERT_DURATION,
        }
    }

    pub fn cooldown() -> Self {
        Self::Cooldown {
            remaining: crate::constants::COOLDOWN_DURATION,
        }
    }

    pub fn phase(&self) -> GhostPhase {
        match self {
            Self::Patrol { .. } => GhostPhase::Patrol,
            Self::Alert { .. } => GhostPhase::Alert,
            Self::Chase => GhostPhase::Chase,
            Self::Cooldown { .. } => GhostPhase::Cooldown,
        }
    }
}

/// Random point within the wander radius of home, kept inside the room.
pub fn wander_target(home: Vec2, rng: &mut impl Rng) -> Vec2 {
    let offset = Vec2::new(
        rng.gen_range(-PATROL_WANDER_RADIUS..=PATROL_WANDER_RADIUS),
        rng.gen_range(-PATROL_WANDER_RADIUS..=PATROL_WANDER_RADIUS),
    );
    (home + offset).clamp_to_room()
}
