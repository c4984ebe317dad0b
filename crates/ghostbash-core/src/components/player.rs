//! Player components: marker, health, facing, and movement-related timers.

use serde::{Deserialize, Serialize};

use super::common::Vec2;
use crate::constants::{INVULNERABILITY_DURATION, KNOCKBACK_DURATION, KNOCKBACK_SPEED};

/// Marker component identifying the player entity
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Player;

/// Which way the sprite faces; flips only on horizontal movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Facing implied by a horizontal movement component, if it is large
    /// enough to count.
    pub fn from_dx(dx: f32, deadzone: f32) -> Option<Self> {
        if dx > deadzone {
            Some(Self::Right)
        } else if dx < -deadzone {
            Some(Self::Left)
        } else {
            None
        }
    }
}

/// Integer hit points, always within 0..=max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Health {
    pub fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Lose one hit point; returns the remaining total.
    pub fn damage(&mut self) -> u32 {
        self.current = self.current.saturating_sub(1);
        self.current
    }

    /// Gain one hit point, capped at max; returns the new total.
    pub fn heal(&mut self) -> u32 {
        self.current = (self.current + 1).min(self.max);
        self.current
    }

    pub fn is_dead(&self) -> bool {
        self.current == 0
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }
}

/// Post-hit damage immunity window. Always present on the player;
/// zero remaining means vulnerable.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Invulnerability {
    pub remaining: f32,
}

impl Invulnerability {
    pub fn fresh() -> Self {
        Self {
            remaining: INVULNERABILITY_DURATION,
        }
    }

    pub fn active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }
}

/// Shove applied when a ghost lands a hit. Present only while the shove
/// lasts; displaces the player directly, independent of input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Knockback {
    pub velocity: Vec2,
    pub remaining: f32,
}

impl Knockback {
    /// Knockback away from an attacker toward the victim.
    pub fn from_hit(attacker: Vec2, victim: Vec2) -> Self {
        Self {
            velocity: (victim - attacker).normalize() * KNOCKBACK_SPEED,
            remaining: KNOCKBACK_DURATION,
        }
    }
}

/// Pointer-driven destination. Present only while the player is walking
/// toward a tapped point; directional input removes it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoveTarget {
    pub target: Vec2,
}

/// Walk-cycle animation flag, derived from this tick's movement.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Walking(pub bool);
