//! Ghost Bash headless simulation harness.
//!
//! Validates gameplay invariants and full sessions without a renderer.
//! Runs entirely in-process - no graphics, no audio, no input devices.
//!
//! Usage:
//!   cargo run -p ghostbash-simtest
//!   cargo run -p ghostbash-simtest -- --verbose

use ghostbash_core::components::{GhostPhase, Health, Player, Position, Vec2};
use ghostbash_core::constants::{
    GHOST_CHASE_SPEED, GHOST_PATROL_SPEED, INVULNERABILITY_DURATION, PLAYER_MAX_HEALTH,
    PLAYER_SPEED,
};
use ghostbash_core::engine::{GameEngine, Screen};
use ghostbash_core::events::GameEvent;
use ghostbash_core::input::Intent;
use ghostbash_core::rooms::{RoomCatalog, RoomDef};
use ghostbash_core::systems::{AttackOutcome, AttackTarget};

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: String) -> Self {
        Self {
            name: name.into(),
            passed,
            detail,
        }
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Ghost Bash Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Room catalog validation
    results.extend(validate_room_catalog());

    // 2. Speed and difficulty contracts
    results.extend(validate_speed_contracts());

    // 3. Bounds invariant under scripted play
    results.extend(validate_bounds_invariant());

    // 4. Lights-on freeze behavior
    results.extend(validate_lights_freeze());

    // 5. Combat window and health clamping
    results.extend(validate_combat_window());

    // 6. Full playthrough to victory
    results.extend(validate_full_playthrough());

    // 7. Draw-order ranking
    results.extend(validate_draw_order());

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn one_ghost_room(x: f32, y: f32) -> RoomCatalog {
    let room = RoomDef {
        name: "Harness Room".into(),
        theme: "test".into(),
        spawns: vec![Vec2::new(x, y)],
    };
    match RoomCatalog::from_rooms(vec![room]) {
        Ok(catalog) => catalog,
        Err(e) => unreachable!("harness room must validate: {}", e),
    }
}

fn place_player(engine: &mut GameEngine, x: f32, y: f32) {
    let player = engine
        .world
        .query::<&Player>()
        .iter()
        .next()
        .map(|(entity, _)| entity);
    if let Some(player) = player {
        if let Ok(mut pos) = engine.world.get::<&mut Position>(player) {
            pos.0 = Vec2::new(x, y);
        }
    }
}

fn set_player_health(engine: &mut GameEngine, value: u32) {
    let player = engine
        .world
        .query::<&Player>()
        .iter()
        .next()
        .map(|(entity, _)| entity);
    if let Some(player) = player {
        if let Ok(mut health) = engine.world.get::<&mut Health>(player) {
            health.current = value;
        }
    }
}

fn run_for(engine: &mut GameEngine, seconds: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let steps = (seconds / 0.1).ceil() as usize;
    for _ in 0..steps {
        engine.update(0.1, None);
        events.extend(engine.drain_events());
    }
    events
}

// ── 1. Room catalog ─────────────────────────────────────────────────────

fn validate_room_catalog() -> Vec<TestResult> {
    println!("--- Room Catalog ---");
    let mut results = Vec::new();

    let catalog = match RoomCatalog::builtin() {
        Ok(catalog) => catalog,
        Err(e) => {
            results.push(TestResult::new(
                "catalog_load",
                false,
                format!("builtin catalog failed to load: {}", e),
            ));
            return results;
        }
    };

    results.push(TestResult::new(
        "catalog_load",
        catalog.len() == 3,
        format!("{} rooms", catalog.len()),
    ));

    let all_in_bounds = catalog
        .rooms()
        .iter()
        .all(|room| room.spawns.iter().all(|spawn| spawn.in_room()));
    results.push(TestResult::new(
        "spawns_in_bounds",
        all_in_bounds,
        "every ghost spawn inside the walkable rectangle".into(),
    ));

    let counts: Vec<usize> = catalog.rooms().iter().map(|r| r.ghost_count()).collect();
    results.push(TestResult::new(
        "ghost_counts",
        counts == vec![4, 5, 4],
        format!("per-room ghost counts {:?}", counts),
    ));

    results
}

// ── 2. Speed contracts ──────────────────────────────────────────────────

fn validate_speed_contracts() -> Vec<TestResult> {
    println!("--- Speed Contracts ---");
    let mut results = Vec::new();

    results.push(TestResult::new(
        "chase_slower_than_player",
        GHOST_CHASE_SPEED < PLAYER_SPEED,
        format!(
            "chase {} < player {} (escape always possible)",
            GHOST_CHASE_SPEED, PLAYER_SPEED
        ),
    ));

    results.push(TestResult::new(
        "patrol_slower_than_chase",
        GHOST_PATROL_SPEED < GHOST_CHASE_SPEED,
        format!(
            "patrol {} < chase {}",
            GHOST_PATROL_SPEED, GHOST_CHASE_SPEED
        ),
    ));

    results
}

// ── 3. Bounds invariant ─────────────────────────────────────────────────

fn validate_bounds_invariant() -> Vec<TestResult> {
    println!("--- Bounds Invariant ---");
    let mut results = Vec::new();

    let mut engine = match GameEngine::new() {
        Ok(engine) => engine,
        Err(e) => {
            results.push(TestResult::new(
                "bounds_sweep",
                false,
                format!("engine construction failed: {}", e),
            ));
            return results;
        }
    };
    engine.start();
    engine.toggle_lights();

    // Scripted pushes into every wall and corner, plus pointer seeks
    let pushes = [
        Vec2::new(1.0, 0.0),
        Vec2::new(-1.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(0.0, -1.0),
        Vec2::new(0.7071, -0.7071),
        Vec2::new(-0.7071, 0.7071),
    ];
    let seeks = [Vec2::new(5.0, 20.0), Vec2::new(95.0, 85.0)];

    let mut violations = 0;
    let mut ticks = 0;
    for (i, push) in pushes.iter().enumerate() {
        for _ in 0..50 {
            engine.update(0.1, Some(Intent::Direction(*push)));
            if engine.is_defeated() {
                engine.respawn();
            }
            ticks += 1;
            if let Some(player) = engine.player() {
                if !player.at.in_room() {
                    violations += 1;
                }
            }
            for ghost in engine.ghosts() {
                if !ghost.at.in_room() {
                    violations += 1;
                }
            }
        }
        engine.update(0.1, Some(Intent::Seek(seeks[i % seeks.len()])));
    }

    results.push(TestResult::new(
        "bounds_sweep",
        violations == 0,
        format!("{} ticks, {} violations", ticks, violations),
    ));

    results
}

// ── 4. Lights freeze ────────────────────────────────────────────────────

fn validate_lights_freeze() -> Vec<TestResult> {
    println!("--- Lights Freeze ---");
    let mut results = Vec::new();

    let mut engine = GameEngine::with_catalog(one_ghost_room(50.0, 50.0));
    engine.start();
    engine.toggle_lights();
    place_player(&mut engine, 50.0, 70.0);
    run_for(&mut engine, 1.3); // patrol -> alert -> chase

    let chasing = engine.ghosts()[0].phase == GhostPhase::Chase;
    results.push(TestResult::new(
        "detection_to_chase",
        chasing,
        format!("phase after telegraph: {:?}", engine.ghosts()[0].phase),
    ));

    engine.toggle_lights();
    let frozen_at = engine.ghosts()[0].at;
    run_for(&mut engine, 2.0);
    let still = engine.ghosts()[0].at;
    results.push(TestResult::new(
        "frozen_under_lights",
        still == frozen_at,
        format!("held at ({:.1}, {:.1}) for 2s", still.x, still.y),
    ));

    let attack = engine.attack(AttackTarget::Ghost(0));
    results.push(TestResult::new(
        "attack_while_lit_rejected",
        attack == AttackOutcome::LightsOn && engine.active_ghosts() == 1,
        "lit attack is a no-op".into(),
    ));

    engine.toggle_lights();
    engine.update(0.1, None);
    let moved = engine.ghosts()[0].at.distance(&frozen_at) > 0.0;
    results.push(TestResult::new(
        "resumes_within_one_tick",
        moved,
        "ghost moving again one tick after lights-off".into(),
    ));

    results
}

// ── 5. Combat window ────────────────────────────────────────────────────

fn validate_combat_window() -> Vec<TestResult> {
    println!("--- Combat Window ---");
    let mut results = Vec::new();

    let mut engine = GameEngine::with_catalog(one_ghost_room(50.0, 50.0));
    engine.start();
    engine.toggle_lights();
    engine.drain_events();

    // Hold the player on top of the ghost across one full window
    let mut first_window_hits = 0;
    let mut min_health = PLAYER_MAX_HEALTH;
    let mut elapsed = 0.0f32;
    while elapsed < INVULNERABILITY_DURATION - 0.2 {
        place_player(&mut engine, 50.0, 55.0);
        engine.update(0.1, None);
        elapsed += 0.1;
        for event in engine.drain_events() {
            if let GameEvent::PlayerDamaged { remaining } = event {
                first_window_hits += 1;
                min_health = min_health.min(remaining);
            }
        }
    }

    results.push(TestResult::new(
        "one_hit_per_window",
        first_window_hits == 1,
        format!("{} hits inside one invulnerability window", first_window_hits),
    ));
    results.push(TestResult::new(
        "damage_is_one_point",
        min_health == PLAYER_MAX_HEALTH - 1,
        format!("health after first hit: {}", min_health),
    ));

    // Grind the player down to zero: health clamps and defeat triggers
    set_player_health(&mut engine, 1);
    let mut defeated_event = false;
    for _ in 0..60 {
        place_player(&mut engine, 50.0, 55.0);
        engine.update(0.1, None);
        for event in engine.drain_events() {
            if event == GameEvent::PlayerDefeated {
                defeated_event = true;
            }
        }
        if engine.is_defeated() {
            break;
        }
    }
    let floor_health = engine.player().map(|p| p.health);
    results.push(TestResult::new(
        "defeat_at_zero",
        defeated_event && floor_health == Some(0),
        format!("defeated with health {:?}", floor_health),
    ));

    engine.respawn();
    let restored = engine.player().map(|p| p.health);
    let ghost_home = engine.ghosts()[0].at == Vec2::new(50.0, 50.0);
    let ghost_patrolling = engine.ghosts()[0].phase == GhostPhase::Patrol;
    results.push(TestResult::new(
        "respawn_round_trip",
        restored == Some(PLAYER_MAX_HEALTH) && ghost_home && ghost_patrolling,
        format!(
            "health {:?}, ghost home={} patrol={}",
            restored, ghost_home, ghost_patrolling
        ),
    ));

    results
}

// ── 6. Full playthrough ─────────────────────────────────────────────────

fn validate_full_playthrough() -> Vec<TestResult> {
    println!("--- Full Playthrough ---");
    let mut results = Vec::new();

    let mut engine = match GameEngine::new() {
        Ok(engine) => engine,
        Err(e) => {
            results.push(TestResult::new(
                "playthrough",
                false,
                format!("engine construction failed: {}", e),
            ));
            return results;
        }
    };
    let total_ghosts: u32 = engine
        .catalog()
        .rooms()
        .iter()
        .map(|r| r.ghost_count() as u32)
        .sum();

    engine.start();
    let mut victory_event = None;
    for _ in 0..engine.catalog().len() {
        engine.toggle_lights();
        let count = engine.room().map(|r| r.ghost_count()).unwrap_or(0);
        for index in 0..count {
            engine.attack(AttackTarget::Ghost(index));
        }
        // Gummy drops, forced lights, grace, transition
        for event in run_for(&mut engine, 3.0) {
            if let GameEvent::Victory { gummies } = event {
                victory_event = Some(gummies);
            }
        }
        if engine.screen() == Screen::RoomComplete {
            engine.advance_room();
        }
    }

    results.push(TestResult::new(
        "reaches_victory",
        engine.screen() == Screen::Victory,
        format!("final screen {:?}", engine.screen()),
    ));
    results.push(TestResult::new(
        "all_gummies_banked",
        victory_event == Some(total_ghosts) && engine.gummies_total() == total_ghosts,
        format!(
            "victory with {:?} of {} gummies",
            victory_event, total_ghosts
        ),
    ));

    results
}

// ── 7. Draw order ───────────────────────────────────────────────────────

fn validate_draw_order() -> Vec<TestResult> {
    println!("--- Draw Order ---");
    let mut results = Vec::new();

    let mut engine = match GameEngine::new() {
        Ok(engine) => engine,
        Err(e) => {
            results.push(TestResult::new(
                "draw_order",
                false,
                format!("engine construction failed: {}", e),
            ));
            return results;
        }
    };
    engine.start();
    engine.toggle_lights();
    run_for(&mut engine, 2.0);

    let order = engine.draw_order();
    let sorted = order.windows(2).all(|pair| pair[0].at.y <= pair[1].at.y);
    results.push(TestResult::new(
        "ascending_by_y",
        sorted && order.len() == 5, // player + 4 ghosts
        format!("{} entries, ascending={}", order.len(), sorted),
    ));

    results
}
