//! Gameplay tuning constants.
//!
//! All distances are in room-percentage units (both axes run roughly 0-100),
//! all durations in seconds. Nothing here depends on screen pixels.

// ── Room bounds ─────────────────────────────────────────────────────────

/// Walkable area, in room-percentage space. The strip above `ROOM_MIN_Y`
/// is wall/decor space and the margins keep sprites fully on screen.
pub const ROOM_MIN_X: f32 = 5.0;
pub const ROOM_MAX_X: f32 = 95.0;
pub const ROOM_MIN_Y: f32 = 20.0;
pub const ROOM_MAX_Y: f32 = 85.0;

/// Largest time delta a single tick will integrate. Stalled frames (tab
/// backgrounding, debugger pauses) are capped here instead of teleporting
/// everything across the room.
pub const MAX_TICK_DT: f32 = 0.1;

// ── Player ──────────────────────────────────────────────────────────────

pub const PLAYER_SPEED: f32 = 40.0;
pub const PLAYER_MAX_HEALTH: u32 = 3;

/// Room entry point; also the respawn position.
pub const PLAYER_START_X: f32 = 50.0;
pub const PLAYER_START_Y: f32 = 70.0;

/// Horizontal movement below this does not flip the sprite.
pub const FACING_DEADZONE: f32 = 0.01;

/// Within this distance of a pointer target the player counts as arrived.
pub const ARRIVE_EPSILON: f32 = 1.0;

pub const INVULNERABILITY_DURATION: f32 = 2.0;
pub const KNOCKBACK_DURATION: f32 = 0.25;
pub const KNOCKBACK_SPEED: f32 = 60.0;

// ── Ghosts ──────────────────────────────────────────────────────────────

/// Chase speed must stay strictly below `PLAYER_SPEED`: skilled movement
/// always permits escape. The simtest harness checks this.
pub const GHOST_PATROL_SPEED: f32 = 12.0;
pub const GHOST_CHASE_SPEED: f32 = 30.0;

/// Patrol -> alert when the player comes this close.
pub const DETECTION_RADIUS: f32 = 25.0;

/// Chase stops (and contact damage applies) inside this distance.
pub const GHOST_ATTACK_RADIUS: f32 = 8.0;

/// Chase -> patrol when the player escapes beyond detection times this.
pub const CHASE_GIVE_UP_FACTOR: f32 = 1.5;

/// Stationary telegraph pause before a ghost commits to the chase.
pub const ALERT_DURATION: f32 = 1.0;

/// Stationary recovery after landing a hit; returns to chase, not patrol.
pub const COOLDOWN_DURATION: f32 = 1.5;

pub const PATROL_WANDER_RADIUS: f32 = 15.0;
pub const PATROL_RETARGET_MIN: f32 = 2.0;
pub const PATROL_RETARGET_MAX: f32 = 5.0;

// ── Interaction radii ───────────────────────────────────────────────────

pub const PICKUP_RADIUS: f32 = 8.0;
pub const HEAL_RADIUS: f32 = 12.0;

/// Maximum reach of the nearest-ghost melee attack.
pub const MELEE_RANGE: f32 = 15.0;

// ── Deferred effect delays ──────────────────────────────────────────────

/// Gummy appears a beat after the ghost pops.
pub const GUMMY_SPAWN_DELAY: f32 = 0.2;

/// Collected gummies linger for the collection animation, then despawn.
pub const GUMMY_DESPAWN_DELAY: f32 = 0.3;

/// Lights force themselves on this long after the last ghost is defeated.
pub const AUTO_LIGHTS_DELAY: f32 = 0.5;

/// Grace between the lights-on completion check passing and the room
/// actually completing, so final pickups can resolve.
pub const ROOM_COMPLETE_GRACE: f32 = 1.0;

/// Pause between auto-collecting leftovers and leaving the room.
pub const ROOM_COMPLETE_TRANSITION: f32 = 0.5;

// ── Healer ──────────────────────────────────────────────────────────────

pub const HEALER_DELAY_MIN: f32 = 5.0;
pub const HEALER_DELAY_MAX: f32 = 15.0;
pub const HEALER_VISIBLE_DURATION: f32 = 4.0;

/// After a heal the healer waves goodbye briefly before hiding.
pub const HEALER_HIDE_AFTER_HEAL: f32 = 1.5;
