//! Integration tests for full game sessions driven through the engine.
//!
//! Exercises: room setup -> lights -> combat -> pickups -> completion,
//! plus the defeat/respawn sub-loop. No rendering, no audio - ticks and
//! player actions only.

use ghostbash_core::components::{GhostPhase, Health, Player, Position, Vec2};
use ghostbash_core::constants::{
    GHOST_CHASE_SPEED, INVULNERABILITY_DURATION, PLAYER_MAX_HEALTH, PLAYER_SPEED, PLAYER_START_X,
    PLAYER_START_Y,
};
use ghostbash_core::engine::{GameEngine, Screen};
use ghostbash_core::events::GameEvent;
use ghostbash_core::input::Intent;
use ghostbash_core::rooms::{RoomCatalog, RoomDef};
use ghostbash_core::systems::{AttackOutcome, AttackTarget};

// ── Helpers ────────────────────────────────────────────────────────────

fn single_room(spawns: &[(f32, f32)]) -> RoomCatalog {
    two_rooms(spawns, &[])
}

fn two_rooms(first: &[(f32, f32)], second: &[(f32, f32)]) -> RoomCatalog {
    let mut rooms = vec![RoomDef {
        name: "Test Room".into(),
        theme: "test".into(),
        spawns: first.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
    }];
    if !second.is_empty() {
        rooms.push(RoomDef {
            name: "Second Room".into(),
            theme: "test".into(),
            spawns: second.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
        });
    }
    RoomCatalog::from_rooms(rooms).unwrap()
}

fn place_player(engine: &mut GameEngine, x: f32, y: f32) {
    let player = engine
        .world
        .query::<&Player>()
        .iter()
        .next()
        .map(|(entity, _)| entity)
        .unwrap();
    let mut pos = engine.world.get::<&mut Position>(player).unwrap();
    pos.0 = Vec2::new(x, y);
}

fn set_player_health(engine: &mut GameEngine, value: u32) {
    let player = engine
        .world
        .query::<&Player>()
        .iter()
        .next()
        .map(|(entity, _)| entity)
        .unwrap();
    let mut health = engine.world.get::<&mut Health>(player).unwrap();
    health.current = value;
}

/// Tick the engine in 100ms steps for `seconds`, collecting events.
fn run_for(engine: &mut GameEngine, seconds: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let steps = (seconds / 0.1).ceil() as usize;
    for _ in 0..steps {
        engine.update(0.1, None);
        events.extend(engine.drain_events());
    }
    events
}

// ── Room clearing flow ─────────────────────────────────────────────────

#[test]
fn clearing_the_room_auto_lights_and_completes() {
    let mut engine = GameEngine::with_catalog(two_rooms(&[(30.0, 30.0)], &[(60.0, 40.0)]));
    engine.start();
    engine.toggle_lights();
    engine.drain_events();

    let outcome = engine.attack(AttackTarget::Ghost(0));
    assert!(matches!(outcome, AttackOutcome::Defeated { ghost: 0, .. }));
    assert_eq!(engine.active_ghosts(), 0);
    assert!(!engine.lights_on());

    // Gummy drop (+0.2s), forced lights (+0.5s), grace (+1.0s), leave (+0.5s)
    let events = run_for(&mut engine, 2.5);

    assert!(events.contains(&GameEvent::GhostDefeated { ghost: 0 }));
    assert!(engine.lights_on());
    assert!(events.contains(&GameEvent::LightsOn));
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::GummySpawned { .. })));
    // Leftover gummy is swept up during completion
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::GummyCollected { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::RoomComplete { room: 0, .. })));
    assert_eq!(engine.screen(), Screen::RoomComplete);
    assert_eq!(engine.gummies_total(), 1);
    assert_eq!(engine.room_gummies(), 1);
}

#[test]
fn advancing_rooms_resets_room_state_but_keeps_totals() {
    let mut engine = GameEngine::with_catalog(two_rooms(&[(30.0, 30.0)], &[(60.0, 40.0)]));
    engine.start();
    engine.toggle_lights();
    engine.attack(AttackTarget::Ghost(0));
    run_for(&mut engine, 2.5);
    assert_eq!(engine.screen(), Screen::RoomComplete);

    engine.advance_room();
    assert_eq!(engine.screen(), Screen::Playing);
    assert_eq!(engine.room_index(), 1);
    assert!(engine.lights_on());
    assert_eq!(engine.active_ghosts(), 1);
    assert_eq!(engine.room_gummies(), 0);
    // Cumulative pickups survive the transition
    assert_eq!(engine.gummies_total(), 1);
    // Player is back at the entry point with full health
    let player = engine.player().unwrap();
    assert_eq!(player.at, Vec2::new(PLAYER_START_X, PLAYER_START_Y));
    assert_eq!(player.health, PLAYER_MAX_HEALTH);
}

#[test]
fn clearing_the_last_room_is_victory() {
    let mut engine = GameEngine::with_catalog(single_room(&[(30.0, 30.0)]));
    engine.start();
    engine.toggle_lights();
    engine.attack(AttackTarget::Ghost(0));

    let events = run_for(&mut engine, 2.5);

    assert_eq!(engine.screen(), Screen::Victory);
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::Victory { gummies: 1 })));
}

// ── Combat scenarios ───────────────────────────────────────────────────

#[test]
fn ghost_attack_fires_once_per_invulnerability_window() {
    let mut engine = GameEngine::with_catalog(single_room(&[(50.0, 50.0)]));
    engine.start();
    engine.toggle_lights();
    engine.drain_events();

    let mut damage_events = 0;
    let mut elapsed = 0.0f32;
    // Pin the player right next to the ghost the whole time
    while elapsed < INVULNERABILITY_DURATION - 0.2 {
        place_player(&mut engine, 50.0, 55.0);
        engine.update(0.1, None);
        elapsed += 0.1;
        for event in engine.drain_events() {
            if matches!(event, GameEvent::PlayerDamaged { .. }) {
                damage_events += 1;
            }
        }
    }

    assert_eq!(damage_events, 1);
    let player = engine.player().unwrap();
    assert_eq!(player.health, PLAYER_MAX_HEALTH - 1);
    assert!(player.invulnerable);

    // Once the window lapses, proximity hurts again
    let mut second_hit = false;
    while elapsed < INVULNERABILITY_DURATION + 0.5 {
        place_player(&mut engine, 50.0, 55.0);
        engine.update(0.1, None);
        elapsed += 0.1;
        for event in engine.drain_events() {
            if matches!(event, GameEvent::PlayerDamaged { .. }) {
                second_hit = true;
            }
        }
    }
    assert!(second_hit);
    assert_eq!(engine.player().unwrap().health, PLAYER_MAX_HEALTH - 2);
}

#[test]
fn fatal_hit_pauses_simulation_until_respawn() {
    let mut engine = GameEngine::with_catalog(single_room(&[(50.0, 50.0)]));
    engine.start();
    engine.toggle_lights();
    set_player_health(&mut engine, 1);

    place_player(&mut engine, 50.0, 55.0);
    engine.update(0.1, None);

    assert!(engine.is_defeated());
    assert_eq!(engine.player().unwrap().health, 0);
    let events = engine.drain_events();
    assert!(events.contains(&GameEvent::PlayerDefeated));

    // Paused: ticks no longer advance the clock
    let before = engine.sim_time();
    engine.update(0.1, None);
    assert_eq!(engine.sim_time(), before);

    engine.respawn();
    assert!(!engine.is_defeated());
    let player = engine.player().unwrap();
    assert_eq!(player.health, PLAYER_MAX_HEALTH);
    assert_eq!(player.at, Vec2::new(PLAYER_START_X, PLAYER_START_Y));
    assert!(player.invulnerable);
    assert!(engine
        .drain_events()
        .contains(&GameEvent::PlayerRespawned));
}

#[test]
fn respawn_resets_survivors_and_keeps_defeated_ghosts_down() {
    let mut engine = GameEngine::with_catalog(single_room(&[(30.0, 30.0), (70.0, 60.0)]));
    engine.start();
    engine.toggle_lights();

    // Bash ghost 0, then die to ghost 1
    assert!(matches!(
        engine.attack(AttackTarget::Ghost(0)),
        AttackOutcome::Defeated { .. }
    ));
    set_player_health(&mut engine, 1);
    place_player(&mut engine, 70.0, 64.0);
    engine.update(0.1, None);
    assert!(engine.is_defeated());

    engine.respawn();

    let ghosts = engine.ghosts();
    assert!(ghosts[0].defeated);
    assert!(!ghosts[1].defeated);
    assert_eq!(ghosts[1].at, Vec2::new(70.0, 60.0));
    assert_eq!(ghosts[1].phase, GhostPhase::Patrol);
    assert_eq!(engine.active_ghosts(), 1);
}

// ── Ghost AI scenarios ─────────────────────────────────────────────────

#[test]
fn patrol_to_alert_to_chase_timing() {
    let mut engine = GameEngine::with_catalog(single_room(&[(50.0, 50.0)]));
    engine.start();
    engine.toggle_lights();

    // Player 20 units away: inside detection, outside attack radius
    place_player(&mut engine, 50.0, 70.0);
    engine.update(0.1, None);
    assert_eq!(engine.ghosts()[0].phase, GhostPhase::Alert);
    let alert_pos = engine.ghosts()[0].at;

    // Telegraph holds the ghost stationary for the rest of the second
    run_for(&mut engine, 0.5);
    assert_eq!(engine.ghosts()[0].phase, GhostPhase::Alert);
    assert_eq!(engine.ghosts()[0].at, alert_pos);

    run_for(&mut engine, 0.7);
    assert_eq!(engine.ghosts()[0].phase, GhostPhase::Chase);
}

#[test]
fn lights_on_freezes_ghosts_in_place() {
    let mut engine = GameEngine::with_catalog(single_room(&[(50.0, 50.0)]));
    engine.start();
    engine.toggle_lights();
    place_player(&mut engine, 50.0, 70.0);
    run_for(&mut engine, 1.3); // alert telegraph done, chase just begun
    assert_eq!(engine.ghosts()[0].phase, GhostPhase::Chase);

    engine.toggle_lights(); // lights back on
    let frozen_at = engine.ghosts()[0].at;
    let frozen_phase = engine.ghosts()[0].phase;
    run_for(&mut engine, 1.0);
    assert_eq!(engine.ghosts()[0].at, frozen_at);
    assert_eq!(engine.ghosts()[0].phase, frozen_phase);

    // One dark tick and the chase resumes
    engine.toggle_lights();
    place_player(&mut engine, 50.0, 70.0);
    engine.update(0.1, None);
    assert!(engine.ghosts()[0].at.distance(&frozen_at) > 0.0);
}

// ── Pickups ────────────────────────────────────────────────────────────

#[test]
fn gummy_collects_exactly_once() {
    let mut engine = GameEngine::with_catalog(two_rooms(&[(60.0, 60.0)], &[(30.0, 30.0)]));
    engine.start();
    engine.toggle_lights();
    engine.attack(AttackTarget::Ghost(0));

    // Wait for the drop, then stand on it
    run_for(&mut engine, 0.3);
    assert_eq!(engine.gummies().len(), 1);
    place_player(&mut engine, 60.0, 60.0);

    let mut collected_events = 0;
    for _ in 0..5 {
        place_player(&mut engine, 60.0, 60.0);
        engine.update(0.05, None);
        for event in engine.drain_events() {
            if matches!(event, GameEvent::GummyCollected { .. }) {
                collected_events += 1;
            }
        }
    }

    assert_eq!(collected_events, 1);
    assert_eq!(engine.gummies_total(), 1);

    // Despawns after the collection animation window
    run_for(&mut engine, 0.5);
    assert!(engine.gummies().is_empty());
}

// ── Invariants ─────────────────────────────────────────────────────────

#[test]
fn positions_stay_in_bounds_under_hostile_input() {
    let mut engine = GameEngine::with_catalog(single_room(&[(50.0, 50.0)]));
    engine.start();
    engine.toggle_lights();

    let pushes = [
        Vec2::new(1.0, 0.0),
        Vec2::new(-1.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(0.0, -1.0),
        Vec2::new(0.7071, 0.7071),
    ];
    for push in pushes {
        for _ in 0..60 {
            engine.update(0.1, Some(Intent::Direction(push)));
            if engine.is_defeated() {
                engine.respawn();
            }
            let player = engine.player().unwrap();
            assert!(player.at.in_room(), "player escaped at {:?}", player.at);
            for ghost in engine.ghosts() {
                assert!(ghost.at.in_room(), "ghost escaped at {:?}", ghost.at);
            }
        }
    }
}

#[test]
fn escape_is_always_possible() {
    // The difficulty contract behind every room configuration
    assert!(GHOST_CHASE_SPEED < PLAYER_SPEED);
}
