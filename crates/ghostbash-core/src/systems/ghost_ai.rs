//! Ghost AI - the per-ghost patrol/alert/chase/cooldown state machine.

use hecs::World;
use log::debug;
use rand::Rng;

use crate::components::{Defeated, Ghost, GhostState, Home, Position, Vec2};
use crate::constants::{
    ARRIVE_EPSILON, CHASE_GIVE_UP_FACTOR, DETECTION_RADIUS, GHOST_ATTACK_RADIUS, GHOST_CHASE_SPEED,
    GHOST_PATROL_SPEED,
};

/// Advance every active ghost one tick.
///
/// Lights on freeze the whole machine: no movement, no transitions, no
/// timer decay. Ghosts resume from wherever they were within one tick of
/// the lights going off. Defeated ghosts never participate.
pub fn ghost_ai_system(world: &mut World, dt: f32, lights_on: bool, player_pos: Vec2) {
    if lights_on {
        return;
    }

    let mut rng = rand::thread_rng();
    let mut updates: Vec<(hecs::Entity, GhostState, Vec2)> = Vec::new();

    for (entity, (ghost, pos, state, home)) in world
        .query::<(&Ghost, &Position, &GhostState, &Home)>()
        .iter()
    {
        if world.get::<&Defeated>(entity).is_ok() {
            continue;
        }

        let (next, new_pos) = step_ghost(state, pos.0, home.0, player_pos, dt, &mut rng);
        if next.phase() != state.phase() {
            debug!(
                "ghost {} {} -> {}",
                ghost.index,
                state.phase().name(),
                next.phase().name()
            );
        }
        updates.push((entity, next, new_pos));
    }

    for (entity, state, pos) in updates {
        if let Ok(mut current) = world.get::<&mut GhostState>(entity) {
            *current = state;
        }
        if let Ok(mut current) = world.get::<&mut Position>(entity) {
            current.0 = pos;
        }
    }
}

/// One tick of the state machine for a single ghost. Pure apart from the
/// rng used for fresh patrol targets.
pub fn step_ghost(
    state: &GhostState,
    pos: Vec2,
    home: Vec2,
    player: Vec2,
    dt: f32,
    rng: &mut impl Rng,
) -> (GhostState, Vec2) {
    match *state {
        GhostState::Patrol {
            target,
            retarget_in,
        } => {
            if pos.distance(&player) < DETECTION_RADIUS {
                return (GhostState::alert(), pos);
            }
            let new_pos = step_toward(pos, target, GHOST_PATROL_SPEED * dt);
            let remaining = retarget_in - dt;
            if remaining <= 0.0 || new_pos.distance(&target) < ARRIVE_EPSILON {
                (GhostState::patrol_near(home, rng), new_pos)
            } else {
                (
                    GhostState::Patrol {
                        target,
                        retarget_in: remaining,
                    },
                    new_pos,
                )
            }
        }
        GhostState::Alert { remaining } => {
            let left = remaining - dt;
            if left <= 0.0 {
                (GhostState::Chase, pos)
            } else {
                (GhostState::Alert { remaining: left }, pos)
            }
        }
        GhostState::Chase => {
            let distance = pos.distance(&player);
            if distance > DETECTION_RADIUS * CHASE_GIVE_UP_FACTOR {
                // Lost the player; drift back to wandering near home
                return (GhostState::patrol_near(home, rng), pos);
            }
            if distance > GHOST_ATTACK_RADIUS {
                (
                    GhostState::Chase,
                    step_toward(pos, player, GHOST_CHASE_SPEED * dt),
                )
            } else {
                (GhostState::Chase, pos)
            }
        }
        GhostState::Cooldown { remaining } => {
            let left = remaining - dt;
            if left <= 0.0 {
                // Back on the hunt; the ghost keeps its target memory
                (GhostState::Chase, pos)
            } else {
                (GhostState::Cooldown { remaining: left }, pos)
            }
        }
    }
}

/// Move `from` toward `to` by at most `step`, clamped to room bounds.
fn step_toward(from: Vec2, to: Vec2, step: f32) -> Vec2 {
    let diff = to - from;
    let distance = diff.length();
    let next = if distance <= step {
        to
    } else {
        from + diff.normalize() * step
    };
    next.clamp_to_room()
}
