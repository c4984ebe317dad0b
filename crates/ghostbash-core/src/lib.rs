//! Ghost Bash Core - arcade room-clearing simulation engine
//!
//! A real-time simulation of a small arcade game: the player roams themed
//! rooms, flips the lights off to make ghosts tangible, bashes them in
//! melee, hoovers up the gummy bears they drop, and gets patched up by a
//! friendly mascot. Rendering, audio, and raw input handling live outside
//! this crate; the engine consumes normalized intents and publishes
//! positions, draw order, and discrete events.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System via `hecs`:
//! - **Entities**: the player, ghosts, gummy pickups, the healer
//! - **Components**: pure data (Position, Health, GhostState, ...)
//! - **Systems**: free functions that query and update components each tick
//!
//! [`engine::GameEngine`] owns the world and the session state machine
//! (title, playing, room-complete, victory) and runs the systems in a
//! fixed order per tick. Time-delayed effects run through an in-tick
//! [`scheduler::Scheduler`] keyed to the simulation clock, so a torn-down
//! room can never be mutated by a stale callback.
//!
//! All gameplay math happens in room-percentage space: both axes run
//! roughly 0-100 regardless of actual screen size.
//!
//! # Example
//!
//! ```rust,no_run
//! use ghostbash_core::prelude::*;
//!
//! let mut engine = GameEngine::new().expect("valid room data");
//! engine.start();
//!
//! loop {
//!     engine.update(1.0 / 60.0, None); // one tick per display frame
//!     for event in engine.drain_events() {
//!         // forward to sound / visual feedback
//!         let _ = event;
//!     }
//! }
//! ```

pub mod components;
pub mod constants;
pub mod engine;
pub mod events;
pub mod input;
pub mod rooms;
pub mod scheduler;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::{GameEngine, Screen};
    pub use crate::events::GameEvent;
    pub use crate::input::Intent;
    pub use crate::systems::{AttackOutcome, AttackTarget};
}
