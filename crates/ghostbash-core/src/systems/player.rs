//! Player controller - applies input intents, movement, and hit timers.

use hecs::World;

use super::queries::player_entity;
use crate::components::{Facing, Invulnerability, Knockback, MoveTarget, Position, Vec2, Walking};
use crate::constants::{ARRIVE_EPSILON, FACING_DEADZONE, PLAYER_SPEED};
use crate::input::Intent;

/// Advance the player one tick. `dt` is already capped by the engine;
/// intents are pre-normalized by the boundary layer.
pub fn player_system(world: &mut World, dt: f32, intent: Option<Intent>) {
    let player = match player_entity(world) {
        Some(entity) => entity,
        None => return,
    };

    if let Ok(mut inv) = world.get::<&mut Invulnerability>(player) {
        inv.tick(dt);
    }

    // Knockback displaces the position directly, independent of input.
    let mut shove = None;
    let mut shove_spent = false;
    if let Ok(mut kb) = world.get::<&mut Knockback>(player) {
        shove = Some(kb.velocity * dt);
        kb.remaining -= dt;
        shove_spent = kb.remaining <= 0.0;
    }
    if let Some(delta) = shove {
        if let Ok(mut pos) = world.get::<&mut Position>(player) {
            pos.0 = (pos.0 + delta).clamp_to_room();
        }
    }
    if shove_spent {
        let _ = world.remove_one::<Knockback>(player);
    }

    // Directional input wins over pointer seeking and clears the target.
    let direction = match intent {
        Some(Intent::Direction(dir)) => {
            let _ = world.remove_one::<MoveTarget>(player);
            Some(dir)
        }
        Some(Intent::Seek(point)) => {
            let _ = world.insert_one(
                player,
                MoveTarget {
                    target: point.clamp_to_room(),
                },
            );
            None
        }
        None => None,
    };

    let mut step = Vec2::ZERO;
    let mut heading_x = 0.0;
    let mut walking = false;

    if let Some(dir) = direction {
        if dir.length() > 0.0 {
            step = dir * (PLAYER_SPEED * dt);
            heading_x = dir.x;
            walking = true;
        }
    } else {
        let target = world.get::<&MoveTarget>(player).map(|t| t.target).ok();
        if let Some(target) = target {
            let current = match world.get::<&Position>(player) {
                Ok(pos) => pos.0,
                Err(_) => return,
            };
            let diff = target - current;
            let distance = diff.length();
            if distance < ARRIVE_EPSILON {
                // Arrived: drop the target and go idle.
                let _ = world.remove_one::<MoveTarget>(player);
            } else {
                let max_step = PLAYER_SPEED * dt;
                step = if max_step >= distance {
                    diff
                } else {
                    diff.normalize() * max_step
                };
                heading_x = diff.normalize().x;
                walking = true;
            }
        }
    }

    if walking {
        if let Ok(mut pos) = world.get::<&mut Position>(player) {
            pos.0 = (pos.0 + step).clamp_to_room();
        }
        if let Some(facing) = Facing::from_dx(heading_x, FACING_DEADZONE) {
            if let Ok(mut current) = world.get::<&mut Facing>(player) {
                *current = facing;
            }
        }
    }

    if let Ok(mut flag) = world.get::<&mut Walking>(player) {
        flag.0 = walking;
    }
}
