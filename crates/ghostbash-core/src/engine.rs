//! Game engine - owns the simulation context and sequences each tick.
//!
//! The engine is the single entry point for the boundary layer: it takes
//! time deltas and input intents, runs the systems in a fixed order, and
//! exposes read-side views plus a drained event queue. All room state
//! lives in one `hecs::World` that is replaced wholesale on every room
//! transition, so nothing can hold a stale reference into a torn-down
//! room.

use hecs::{Entity, World};
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::{
    Defeated, Facing, Ghost, GhostPhase, GhostState, Gummy, Healer, Health, Home, Invulnerability,
    Knockback, Player, Position, Vec2, Walking,
};
use crate::constants::{
    AUTO_LIGHTS_DELAY, GUMMY_DESPAWN_DELAY, GUMMY_SPAWN_DELAY, HEALER_DELAY_MAX, HEALER_DELAY_MIN,
    HEALER_HIDE_AFTER_HEAL, HEALER_VISIBLE_DURATION, MAX_TICK_DT, PLAYER_MAX_HEALTH,
    PLAYER_START_X, PLAYER_START_Y, ROOM_COMPLETE_GRACE, ROOM_COMPLETE_TRANSITION, ROOM_MAX_X,
    ROOM_MAX_Y, ROOM_MIN_X, ROOM_MIN_Y,
};
use crate::events::{EventQueue, GameEvent};
use crate::input::Intent;
use crate::rooms::{RoomCatalog, RoomDataError, RoomDef};
use crate::scheduler::{Effect, EffectKey, Scheduler};
use crate::systems::{
    active_ghost_count, collision_system, draw_order, ghost_ai_system, ghost_attack, heal_player,
    player_attack, player_position, player_system, respawn_player, AttackOutcome, AttackTarget,
    Contact, DrawEntry,
};

/// Top-level screen of the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Title,
    Playing,
    RoomComplete,
    Victory,
}

/// The whole game session: world, screens, lights, counters, and the
/// deferred-effect scheduler.
pub struct GameEngine {
    /// ECS world holding the active room's entities. Replaced on every
    /// room transition; entity handles must not be kept across one.
    pub world: World,
    catalog: RoomCatalog,
    screen: Screen,
    room_index: usize,
    lights_on: bool,
    sim_time: f64,
    gummies_total: u32,
    room_gummies: u32,
    next_gummy_id: u32,
    /// Terminal defeated condition; pauses the simulation until respawn.
    awaiting_respawn: bool,
    /// First-use hint latch; set on the first lights toggle, cleared on
    /// restart so a fresh run shows the hint again.
    tutorial_seen: bool,
    scheduler: Scheduler,
    events: EventQueue,
}

impl GameEngine {
    /// Engine with the built-in room catalog, sitting at the title screen.
    pub fn new() -> Result<Self, RoomDataError> {
        Ok(Self::with_catalog(RoomCatalog::builtin()?))
    }

    /// Engine with a custom room catalog.
    pub fn with_catalog(catalog: RoomCatalog) -> Self {
        Self {
            world: World::new(),
            catalog,
            screen: Screen::Title,
            room_index: 0,
            lights_on: true,
            sim_time: 0.0,
            gummies_total: 0,
            room_gummies: 0,
            next_gummy_id: 0,
            awaiting_respawn: false,
            tutorial_seen: false,
            scheduler: Scheduler::new(),
            events: EventQueue::new(),
        }
    }

    // ── Session flow ────────────────────────────────────────────────────

    /// Leave the title screen and begin the first room.
    pub fn start(&mut self) {
        if self.screen != Screen::Title {
            return;
        }
        self.gummies_total = 0;
        self.setup_room(0);
        self.screen = Screen::Playing;
    }

    /// Move from the room-complete screen into the next room.
    pub fn advance_room(&mut self) {
        if self.screen != Screen::RoomComplete {
            return;
        }
        let next = self.room_index + 1;
        if self.catalog.get(next).is_none() {
            return;
        }
        self.setup_room(next);
        self.screen = Screen::Playing;
    }

    /// Reset the whole session back to the first room.
    pub fn restart(&mut self) {
        self.gummies_total = 0;
        self.tutorial_seen = false;
        self.setup_room(0);
        self.screen = Screen::Playing;
        self.events.push(GameEvent::GameRestarted);
    }

    /// Recover from the defeated condition and resume the room.
    pub fn respawn(&mut self) {
        if !self.awaiting_respawn {
            return;
        }
        respawn_player(&mut self.world);
        self.awaiting_respawn = false;
        self.events.push(GameEvent::PlayerRespawned);
    }

    fn setup_room(&mut self, index: usize) {
        let room = match self.catalog.get(index) {
            Some(room) => room.clone(),
            None => return,
        };
        info!(
            "entering room {} '{}' with {} ghosts",
            index + 1,
            room.name,
            room.ghost_count()
        );

        // Replace, never patch: pending effects and entity handles from
        // the previous room die here.
        self.world = World::new();
        self.scheduler.clear();
        self.room_index = index;
        self.lights_on = true;
        self.room_gummies = 0;
        self.next_gummy_id = 0;
        self.awaiting_respawn = false;

        self.world.spawn((
            Player,
            Position::new(PLAYER_START_X, PLAYER_START_Y),
            Facing::default(),
            Health::full(PLAYER_MAX_HEALTH),
            Invulnerability::default(),
            Walking(false),
        ));

        let mut rng = rand::thread_rng();
        for (ghost_index, spawn) in room.spawns.iter().enumerate() {
            self.world.spawn((
                Ghost { index: ghost_index },
                Position(*spawn),
                Home(*spawn),
                GhostState::patrol_near(*spawn, &mut rng),
            ));
        }

        self.world.spawn((
            Healer::hidden(),
            Position::new(PLAYER_START_X, PLAYER_START_Y),
        ));
        self.schedule_healer_visit(&mut rng);
    }

    // ── Tick ────────────────────────────────────────────────────────────

    /// Advance the simulation by `dt` seconds with this frame's intent.
    ///
    /// Does nothing outside the playing screen or while awaiting respawn;
    /// the simulation clock only moves during live play, so scheduled
    /// effects cannot fire into a paused or replaced room.
    pub fn update(&mut self, dt: f32, intent: Option<Intent>) {
        if self.screen != Screen::Playing || self.awaiting_respawn {
            return;
        }
        let dt = dt.clamp(0.0, MAX_TICK_DT);
        self.sim_time += f64::from(dt);

        player_system(&mut self.world, dt, intent);

        if let Some(player_pos) = player_position(&self.world) {
            ghost_ai_system(&mut self.world, dt, self.lights_on, player_pos);
        }

        for contact in collision_system(&self.world, self.lights_on) {
            self.resolve_contact(contact);
        }

        for effect in self.scheduler.drain_due(self.sim_time) {
            self.apply_effect(effect);
        }
    }

    fn resolve_contact(&mut self, contact: Contact) {
        match contact {
            Contact::GhostAttack { ghost } => {
                if let Some(report) = ghost_attack(&mut self.world, ghost) {
                    self.events.push(GameEvent::PlayerDamaged {
                        remaining: report.remaining,
                    });
                    if report.player_defeated {
                        info!("player defeated in room {}", self.room_index + 1);
                        self.awaiting_respawn = true;
                        self.events.push(GameEvent::PlayerDefeated);
                    }
                }
            }
            Contact::GummyTouched { gummy } => self.collect_gummy(gummy),
            Contact::HealerTouched => {
                if let Some(health) = heal_player(&mut self.world) {
                    self.events.push(GameEvent::PlayerHealed { health });
                    // Wave goodbye shortly after the hug
                    self.scheduler.cancel(EffectKey::Healer);
                    self.scheduler
                        .schedule(self.sim_time, HEALER_HIDE_AFTER_HEAL, Effect::HealerHide);
                }
            }
        }
    }

    // ── Player actions ──────────────────────────────────────────────────

    /// Flip the light switch. Turning the lights on freezes the ghosts and
    /// runs the room-completion check.
    pub fn toggle_lights(&mut self) {
        if self.screen != Screen::Playing || self.awaiting_respawn {
            return;
        }
        self.lights_on = !self.lights_on;
        self.tutorial_seen = true;
        if self.lights_on {
            debug!("lights on");
            self.events.push(GameEvent::LightsOn);
            self.check_room_complete();
        } else {
            debug!("lights off");
            self.events.push(GameEvent::LightsOff);
        }
    }

    /// Swing at a ghost. Success schedules the gummy drop and, when the
    /// room is cleared, the automatic lights-on.
    pub fn attack(&mut self, target: AttackTarget) -> AttackOutcome {
        if self.screen != Screen::Playing || self.awaiting_respawn {
            return AttackOutcome::NoTarget;
        }
        let outcome = player_attack(&mut self.world, self.lights_on, target);
        match outcome {
            AttackOutcome::Defeated { ghost, at } => {
                self.events.push(GameEvent::GhostDefeated { ghost });
                self.scheduler
                    .schedule(self.sim_time, GUMMY_SPAWN_DELAY, Effect::SpawnGummy { at });
                if active_ghost_count(&self.world) == 0 {
                    self.scheduler.schedule_unique(
                        self.sim_time,
                        AUTO_LIGHTS_DELAY,
                        Effect::ForceLightsOn,
                    );
                }
            }
            AttackOutcome::TooFar => {
                self.events.push(GameEvent::AttackMissed);
            }
            AttackOutcome::NoTarget | AttackOutcome::LightsOn => {}
        }
        outcome
    }

    // ── Deferred effects ────────────────────────────────────────────────

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::SpawnGummy { at } => {
                let id = self.next_gummy_id;
                self.next_gummy_id += 1;
                self.world.spawn((Gummy::new(id), Position(at)));
                self.events.push(GameEvent::GummySpawned { id, at });
            }
            Effect::DespawnGummy { entity } => {
                let _ = self.world.despawn(entity);
            }
            Effect::ForceLightsOn => {
                if !self.lights_on {
                    self.toggle_lights();
                }
            }
            Effect::CompleteRoom => {
                if self.screen != Screen::Playing {
                    return;
                }
                // Re-verify: the player may have flicked the lights back off
                if !self.lights_on || active_ghost_count(&self.world) > 0 {
                    return;
                }
                // Sweep up whatever the player left behind
                let leftovers: Vec<Entity> = self
                    .world
                    .query::<&Gummy>()
                    .iter()
                    .filter(|(_, gummy)| !gummy.collected)
                    .map(|(entity, _)| entity)
                    .collect();
                for entity in leftovers {
                    self.collect_gummy(entity);
                }
                self.scheduler.schedule_unique(
                    self.sim_time,
                    ROOM_COMPLETE_TRANSITION,
                    Effect::FinishRoom,
                );
            }
            Effect::FinishRoom => {
                if self.screen != Screen::Playing {
                    return;
                }
                if self.catalog.is_last(self.room_index) {
                    info!("victory with {} gummies", self.gummies_total);
                    self.screen = Screen::Victory;
                    self.events.push(GameEvent::Victory {
                        gummies: self.gummies_total,
                    });
                } else {
                    self.screen = Screen::RoomComplete;
                    self.events.push(GameEvent::RoomComplete {
                        room: self.room_index,
                        gummies: self.room_gummies,
                    });
                }
            }
            Effect::HealerAppear => self.healer_appear(),
            Effect::HealerHide => self.healer_hide(),
        }
    }

    fn check_room_complete(&mut self) {
        if active_ghost_count(&self.world) == 0 {
            self.scheduler
                .schedule_unique(self.sim_time, ROOM_COMPLETE_GRACE, Effect::CompleteRoom);
        }
    }

    fn collect_gummy(&mut self, entity: Entity) {
        let id = match self.world.get::<&mut Gummy>(entity) {
            Ok(mut gummy) if !gummy.collected => {
                gummy.collected = true;
                gummy.id
            }
            _ => return,
        };
        self.gummies_total += 1;
        self.room_gummies += 1;
        self.events.push(GameEvent::GummyCollected {
            id,
            total: self.gummies_total,
        });
        self.scheduler.schedule(
            self.sim_time,
            GUMMY_DESPAWN_DELAY,
            Effect::DespawnGummy { entity },
        );
    }

    fn schedule_healer_visit(&mut self, rng: &mut impl Rng) {
        let delay = rng.gen_range(HEALER_DELAY_MIN..HEALER_DELAY_MAX);
        self.scheduler
            .schedule(self.sim_time, delay, Effect::HealerAppear);
    }

    fn healer_appear(&mut self) {
        let mut rng = rand::thread_rng();
        if self.lights_on {
            // Not while the room is lit; try again later
            self.schedule_healer_visit(&mut rng);
            return;
        }
        let at = Vec2::new(
            rng.gen_range(ROOM_MIN_X..ROOM_MAX_X),
            rng.gen_range(ROOM_MIN_Y..ROOM_MAX_Y),
        );
        let healer = self.world.query::<&Healer>().iter().next().map(|(e, _)| e);
        if let Some(entity) = healer {
            match self.world.get::<&mut Healer>(entity) {
                Ok(mut h) if !h.visible => {
                    h.visible = true;
                    h.healed_this_visit = false;
                }
                _ => return,
            }
            if let Ok(mut pos) = self.world.get::<&mut Position>(entity) {
                pos.0 = at;
            }
            self.events.push(GameEvent::HealerAppeared { at });
            self.scheduler
                .schedule(self.sim_time, HEALER_VISIBLE_DURATION, Effect::HealerHide);
        }
    }

    fn healer_hide(&mut self) {
        let healer = self.world.query::<&Healer>().iter().next().map(|(e, _)| e);
        if let Some(entity) = healer {
            let was_visible = match self.world.get::<&mut Healer>(entity) {
                Ok(mut h) if h.visible => {
                    h.visible = false;
                    h.healed_this_visit = false;
                    true
                }
                _ => false,
            };
            if was_visible {
                self.events.push(GameEvent::HealerHidden);
            }
        }
        // Line up the next visit either way
        self.scheduler.cancel(EffectKey::Healer);
        let mut rng = rand::thread_rng();
        self.schedule_healer_visit(&mut rng);
    }

    // ── Read-side views ─────────────────────────────────────────────────

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn lights_on(&self) -> bool {
        self.lights_on
    }

    pub fn room_index(&self) -> usize {
        self.room_index
    }

    /// Definition of the room currently playing.
    pub fn room(&self) -> Option<&RoomDef> {
        self.catalog.get(self.room_index)
    }

    pub fn catalog(&self) -> &RoomCatalog {
        &self.catalog
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn gummies_total(&self) -> u32 {
        self.gummies_total
    }

    pub fn room_gummies(&self) -> u32 {
        self.room_gummies
    }

    /// Whether the player is down and waiting for an explicit respawn.
    pub fn is_defeated(&self) -> bool {
        self.awaiting_respawn
    }

    pub fn tutorial_seen(&self) -> bool {
        self.tutorial_seen
    }

    /// Ghosts still participating in the room.
    pub fn active_ghosts(&self) -> usize {
        active_ghost_count(&self.world)
    }

    pub fn player(&self) -> Option<PlayerView> {
        let mut view = None;
        for (entity, (_, pos, facing, health, inv, walking)) in self
            .world
            .query::<(
                &Player,
                &Position,
                &Facing,
                &Health,
                &Invulnerability,
                &Walking,
            )>()
            .iter()
        {
            view = Some(PlayerView {
                at: pos.0,
                facing: *facing,
                walking: walking.0,
                health: health.current,
                max_health: health.max,
                invulnerable: inv.active(),
                knocked_back: self.world.get::<&Knockback>(entity).is_ok(),
            });
            break;
        }
        view
    }

    pub fn ghosts(&self) -> Vec<GhostView> {
        let mut views: Vec<GhostView> = self
            .world
            .query::<(&Ghost, &Position, &GhostState)>()
            .iter()
            .map(|(entity, (ghost, pos, state))| GhostView {
                index: ghost.index,
                at: pos.0,
                phase: state.phase(),
                defeated: self.world.get::<&Defeated>(entity).is_ok(),
            })
            .collect();
        views.sort_by_key(|view| view.index);
        views
    }

    pub fn gummies(&self) -> Vec<GummyView> {
        let mut views: Vec<GummyView> = self
            .world
            .query::<(&Gummy, &Position)>()
            .iter()
            .map(|(_, (gummy, pos))| GummyView {
                id: gummy.id,
                at: pos.0,
                collected: gummy.collected,
            })
            .collect();
        views.sort_by_key(|view| view.id);
        views
    }

    pub fn healer(&self) -> Option<HealerView> {
        self.world
            .query::<(&Healer, &Position)>()
            .iter()
            .next()
            .map(|(_, (healer, pos))| HealerView {
                at: pos.0,
                visible: healer.visible,
            })
    }

    /// Draw-order ranking for the presentation layer.
    pub fn draw_order(&self) -> Vec<DrawEntry> {
        draw_order(&self.world)
    }

    /// Take all pending event notifications, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }
}

/// Player state snapshot for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerView {
    pub at: Vec2,
    pub facing: Facing,
    pub walking: bool,
    pub health: u32,
    pub max_health: u32,
    pub invulnerable: bool,
    pub knocked_back: bool,
}

/// Ghost state snapshot for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GhostView {
    pub index: usize,
    pub at: Vec2,
    pub phase: GhostPhase,
    pub defeated: bool,
}

/// Gummy pickup snapshot for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GummyView {
    pub id: u32,
    pub at: Vec2,
    pub collected: bool,
}

/// Healer snapshot for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HealerView {
    pub at: Vec2,
    pub visible: bool,
}
