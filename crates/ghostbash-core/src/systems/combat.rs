//! Combat resolver - melee attacks on ghosts, ghost attacks on the player,
//! healing, and the respawn reset.

use hecs::{Entity, World};
use log::{debug, info};

use super::queries::{player_entity, player_position};
use crate::components::{
    Defeated, Ghost, GhostState, Healer, Health, Home, Invulnerability, Knockback, MoveTarget,
    Position, Vec2, Walking,
};
use crate::constants::{MELEE_RANGE, PLAYER_START_X, PLAYER_START_Y};

/// Which ghost a melee attack is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackTarget {
    /// Direct hit on a specific ghost (tap/click on it).
    Ghost(usize),
    /// Swing at whichever live ghost is closest, within melee range.
    Nearest,
}

/// Result of a player melee attempt. Illegal attempts are feedback, not
/// errors: nothing in the room changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackOutcome {
    /// The swing connected; the ghost at `at` is done for.
    Defeated { ghost: usize, at: Vec2 },
    /// Nearest ghost is beyond melee range.
    TooFar,
    /// No live ghost to hit (or no such ghost index).
    NoTarget,
    /// Ghosts are intangible while the room is lit.
    LightsOn,
}

/// What a ghost attack did to the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackReport {
    pub remaining: u32,
    pub player_defeated: bool,
}

/// Resolve a player-initiated melee attack.
pub fn player_attack(world: &mut World, lights_on: bool, target: AttackTarget) -> AttackOutcome {
    if lights_on {
        return AttackOutcome::LightsOn;
    }
    let player_pos = match player_position(world) {
        Some(pos) => pos,
        None => return AttackOutcome::NoTarget,
    };

    let victim: Option<(Entity, usize, Vec2)> = match target {
        AttackTarget::Ghost(index) => {
            let mut found = None;
            for (entity, (ghost, pos)) in world.query::<(&Ghost, &Position)>().iter() {
                if ghost.index == index && world.get::<&Defeated>(entity).is_err() {
                    found = Some((entity, ghost.index, pos.0));
                    break;
                }
            }
            found
        }
        AttackTarget::Nearest => {
            let mut best: Option<(Entity, usize, Vec2, f32)> = None;
            for (entity, (ghost, pos)) in world.query::<(&Ghost, &Position)>().iter() {
                if world.get::<&Defeated>(entity).is_ok() {
                    continue;
                }
                let distance = pos.0.distance(&player_pos);
                let closer = match &best {
                    Some((_, _, _, current)) => distance < *current,
                    None => true,
                };
                if closer {
                    best = Some((entity, ghost.index, pos.0, distance));
                }
            }
            match best {
                None => return AttackOutcome::NoTarget,
                Some((_, _, _, distance)) if distance > MELEE_RANGE => {
                    return AttackOutcome::TooFar;
                }
                Some((entity, index, pos, _)) => Some((entity, index, pos)),
            }
        }
    };

    match victim {
        Some((entity, index, at)) => {
            let _ = world.insert_one(entity, Defeated);
            info!("ghost {} defeated at ({:.0}, {:.0})", index, at.x, at.y);
            AttackOutcome::Defeated { ghost: index, at }
        }
        None => AttackOutcome::NoTarget,
    }
}

/// Resolve a ghost landing a hit on the player.
///
/// Returns `None` when the hit is absorbed (player already invulnerable,
/// e.g. a second ghost touching in the same tick, or the attacker is
/// already down). Otherwise applies damage, knockback away from the
/// attacker, a fresh invulnerability window, and puts the attacker into
/// cooldown.
pub fn ghost_attack(world: &mut World, attacker: Entity) -> Option<AttackReport> {
    let player = player_entity(world)?;

    {
        let inv = world.get::<&Invulnerability>(player).ok()?;
        if inv.active() {
            return None;
        }
    }
    if world.get::<&Defeated>(attacker).is_ok() {
        return None;
    }

    let ghost_pos = world.get::<&Position>(attacker).ok()?.0;
    let player_pos = world.get::<&Position>(player).ok()?.0;

    let remaining = {
        let mut health = world.get::<&mut Health>(player).ok()?;
        health.damage()
    };
    {
        let mut inv = world.get::<&mut Invulnerability>(player).ok()?;
        *inv = Invulnerability::fresh();
    }
    let _ = world.insert_one(player, Knockback::from_hit(ghost_pos, player_pos));
    if let Ok(mut state) = world.get::<&mut GhostState>(attacker) {
        *state = GhostState::cooldown();
    }

    debug!("player hit, {} health left", remaining);
    Some(AttackReport {
        remaining,
        player_defeated: remaining == 0,
    })
}

/// Apply one point of healing, latching the healer so each appearance
/// heals at most once. Returns the new health total, or `None` when no
/// healing happened.
pub fn heal_player(world: &mut World) -> Option<u32> {
    let player = player_entity(world)?;
    let healed = {
        let mut health = world.get::<&mut Health>(player).ok()?;
        if health.is_full() {
            return None;
        }
        health.heal()
    };

    let healer = world.query::<&Healer>().iter().next().map(|(e, _)| e);
    if let Some(entity) = healer {
        if let Ok(mut h) = world.get::<&mut Healer>(entity) {
            h.healed_this_visit = true;
        }
    }

    Some(healed)
}

/// Reset after a defeat: the player returns to the room entry at full
/// health with a fresh invulnerability window, and every surviving ghost
/// goes back to patrolling at home. Defeated ghosts stay down - a respawn
/// is a local retry, not a room reset.
pub fn respawn_player(world: &mut World) {
    let mut rng = rand::thread_rng();

    if let Some(player) = player_entity(world) {
        if let Ok(mut health) = world.get::<&mut Health>(player) {
            health.current = health.max;
        }
        if let Ok(mut pos) = world.get::<&mut Position>(player) {
            pos.0 = Vec2::new(PLAYER_START_X, PLAYER_START_Y);
        }
        if let Ok(mut inv) = world.get::<&mut Invulnerability>(player) {
            *inv = Invulnerability::fresh();
        }
        if let Ok(mut walking) = world.get::<&mut Walking>(player) {
            walking.0 = false;
        }
        let _ = world.remove_one::<Knockback>(player);
        let _ = world.remove_one::<MoveTarget>(player);
    }

    let mut resets: Vec<(Entity, Vec2)> = Vec::new();
    for (entity, (_, home)) in world.query::<(&Ghost, &Home)>().iter() {
        if world.get::<&Defeated>(entity).is_err() {
            resets.push((entity, home.0));
        }
    }
    for (entity, home) in resets {
        if let Ok(mut pos) = world.get::<&mut Position>(entity) {
            pos.0 = home;
        }
        if let Ok(mut state) = world.get::<&mut GhostState>(entity) {
            *state = GhostState::patrol_near(home, &mut rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Facing, GhostPhase, Player};
    use crate::constants::{INVULNERABILITY_DURATION, PLAYER_MAX_HEALTH};

    fn spawn_player(world: &mut World, x: f32, y: f32) -> Entity {
        world.spawn((
            Player,
            Position::new(x, y),
            Facing::default(),
            Health::full(PLAYER_MAX_HEALTH),
            Invulnerability::default(),
            Walking(false),
        ))
    }

    fn spawn_ghost(world: &mut World, index: usize, x: f32, y: f32) -> Entity {
        let spawn = Vec2::new(x, y);
        world.spawn((
            Ghost { index },
            Position(spawn),
            Home(spawn),
            GhostState::Chase,
        ))
    }

    #[test]
    fn test_attack_is_noop_with_lights_on() {
        let mut world = World::new();
        spawn_player(&mut world, 50.0, 50.0);
        let ghost = spawn_ghost(&mut world, 0, 50.0, 55.0);

        let outcome = player_attack(&mut world, true, AttackTarget::Ghost(0));
        assert_eq!(outcome, AttackOutcome::LightsOn);
        assert!(world.get::<&Defeated>(ghost).is_err());
    }

    #[test]
    fn test_direct_attack_defeats_ghost() {
        let mut world = World::new();
        spawn_player(&mut world, 50.0, 50.0);
        let ghost = spawn_ghost(&mut world, 0, 50.0, 55.0);

        let outcome = player_attack(&mut world, false, AttackTarget::Ghost(0));
        assert!(matches!(outcome, AttackOutcome::Defeated { ghost: 0, .. }));
        assert!(world.get::<&Defeated>(ghost).is_ok());

        // A second swing finds nothing
        let outcome = player_attack(&mut world, false, AttackTarget::Ghost(0));
        assert_eq!(outcome, AttackOutcome::NoTarget);
    }

    #[test]
    fn test_nearest_attack_respects_range() {
        let mut world = World::new();
        spawn_player(&mut world, 50.0, 50.0);
        spawn_ghost(&mut world, 0, 50.0, 80.0); // 30 units away

        let outcome = player_attack(&mut world, false, AttackTarget::Nearest);
        assert_eq!(outcome, AttackOutcome::TooFar);
    }

    #[test]
    fn test_nearest_attack_picks_closest() {
        let mut world = World::new();
        spawn_player(&mut world, 50.0, 50.0);
        spawn_ghost(&mut world, 0, 50.0, 62.0);
        let close = spawn_ghost(&mut world, 1, 50.0, 58.0);

        let outcome = player_attack(&mut world, false, AttackTarget::Nearest);
        assert!(matches!(outcome, AttackOutcome::Defeated { ghost: 1, .. }));
        assert!(world.get::<&Defeated>(close).is_ok());
    }

    #[test]
    fn test_ghost_attack_applies_full_consequences() {
        let mut world = World::new();
        let player = spawn_player(&mut world, 50.0, 50.0);
        let ghost = spawn_ghost(&mut world, 0, 50.0, 45.0);

        let report = ghost_attack(&mut world, ghost).unwrap();
        assert_eq!(report.remaining, PLAYER_MAX_HEALTH - 1);
        assert!(!report.player_defeated);

        let inv = world.get::<&Invulnerability>(player).unwrap();
        assert_eq!(inv.remaining, INVULNERABILITY_DURATION);
        drop(inv);

        // Knockback points from ghost toward player (downward here)
        let kb = world.get::<&Knockback>(player).unwrap();
        assert!(kb.velocity.y > 0.0);
        drop(kb);

        let state = world.get::<&GhostState>(ghost).unwrap();
        assert_eq!(state.phase(), GhostPhase::Cooldown);
    }

    #[test]
    fn test_second_hit_in_same_window_is_absorbed() {
        let mut world = World::new();
        spawn_player(&mut world, 50.0, 50.0);
        let first = spawn_ghost(&mut world, 0, 50.0, 45.0);
        let second = spawn_ghost(&mut world, 1, 45.0, 50.0);

        assert!(ghost_attack(&mut world, first).is_some());
        assert!(ghost_attack(&mut world, second).is_none());

        // Second ghost is still chasing, not cooling down
        let state = world.get::<&GhostState>(second).unwrap();
        assert_eq!(state.phase(), GhostPhase::Chase);
    }

    #[test]
    fn test_fatal_hit_reports_defeat() {
        let mut world = World::new();
        let player = spawn_player(&mut world, 50.0, 50.0);
        {
            let mut health = world.get::<&mut Health>(player).unwrap();
            health.current = 1;
        }
        let ghost = spawn_ghost(&mut world, 0, 50.0, 45.0);

        let report = ghost_attack(&mut world, ghost).unwrap();
        assert_eq!(report.remaining, 0);
        assert!(report.player_defeated);
    }

    #[test]
    fn test_heal_caps_at_max_and_latches() {
        let mut world = World::new();
        let player = spawn_player(&mut world, 50.0, 50.0);
        {
            let mut health = world.get::<&mut Health>(player).unwrap();
            health.current = PLAYER_MAX_HEALTH - 1;
        }
        let mut visible = Healer::hidden();
        visible.visible = true;
        let healer = world.spawn((visible, Position::new(55.0, 50.0)));

        assert_eq!(heal_player(&mut world), Some(PLAYER_MAX_HEALTH));
        assert!(world.get::<&Healer>(healer).unwrap().healed_this_visit);

        // Already full: no further healing
        assert_eq!(heal_player(&mut world), None);
    }

    #[test]
    fn test_respawn_resets_survivors_but_not_defeated() {
        let mut world = World::new();
        let player = spawn_player(&mut world, 20.0, 30.0);
        {
            let mut health = world.get::<&mut Health>(player).unwrap();
            health.current = 0;
        }
        let survivor = spawn_ghost(&mut world, 0, 80.0, 80.0);
        {
            let mut pos = world.get::<&mut Position>(survivor).unwrap();
            pos.0 = Vec2::new(30.0, 40.0); // wandered off home
        }
        let downed = spawn_ghost(&mut world, 1, 60.0, 60.0);
        world.insert_one(downed, Defeated).unwrap();

        respawn_player(&mut world);

        let health = world.get::<&Health>(player).unwrap();
        assert_eq!(health.current, PLAYER_MAX_HEALTH);
        drop(health);
        let pos = world.get::<&Position>(player).unwrap();
        assert_eq!(pos.0, Vec2::new(PLAYER_START_X, PLAYER_START_Y));
        drop(pos);
        assert!(world.get::<&Invulnerability>(player).unwrap().active());

        // Survivor back home on patrol
        let pos = world.get::<&Position>(survivor).unwrap();
        assert_eq!(pos.0, Vec2::new(80.0, 80.0));
        drop(pos);
        let state = world.get::<&GhostState>(survivor).unwrap();
        assert_eq!(state.phase(), GhostPhase::Patrol);
        drop(state);

        // Defeated ghost stays defeated
        assert!(world.get::<&Defeated>(downed).is_ok());
    }
}
