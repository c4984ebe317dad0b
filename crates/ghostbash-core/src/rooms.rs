//! Room catalog: static definitions for the rooms the session walks through.
//!
//! Room data ships as JSON embedded in the binary and is validated on load;
//! a bad catalog is the one genuinely fallible edge of the crate.

use serde::{Deserialize, Serialize};

use crate::components::Vec2;

/// Built-in room catalog, shared with any external tooling.
const ROOMS_JSON: &str = include_str!("../../../data/rooms.json");

/// Static definition of one room. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDef {
    pub name: String,
    /// Presentation hint for decor/backdrop selection; the simulation
    /// never reads it.
    pub theme: String,
    /// Ghost spawn positions, which double as patrol anchors.
    pub spawns: Vec<Vec2>,
}

impl RoomDef {
    pub fn ghost_count(&self) -> usize {
        self.spawns.len()
    }
}

/// Ordered list of rooms, selected by index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomCatalog {
    rooms: Vec<RoomDef>,
}

impl RoomCatalog {
    /// Load and validate the built-in catalog.
    pub fn builtin() -> Result<Self, RoomDataError> {
        Self::from_json(ROOMS_JSON)
    }

    /// Parse a catalog from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, RoomDataError> {
        let rooms: Vec<RoomDef> = serde_json::from_str(json)?;
        Self::from_rooms(rooms)
    }

    /// Validate an already-built room list.
    pub fn from_rooms(rooms: Vec<RoomDef>) -> Result<Self, RoomDataError> {
        if rooms.is_empty() {
            return Err(RoomDataError::Empty);
        }
        for room in &rooms {
            if room.spawns.is_empty() {
                return Err(RoomDataError::NoGhosts {
                    room: room.name.clone(),
                });
            }
            for spawn in &room.spawns {
                if !spawn.in_room() {
                    return Err(RoomDataError::SpawnOutOfBounds {
                        room: room.name.clone(),
                        x: spawn.x,
                        y: spawn.y,
                    });
                }
            }
        }
        Ok(Self { rooms })
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RoomDef> {
        self.rooms.get(index)
    }

    pub fn rooms(&self) -> &[RoomDef] {
        &self.rooms
    }

    /// Whether `index` names the final room of the run.
    pub fn is_last(&self, index: usize) -> bool {
        index + 1 >= self.rooms.len()
    }
}

/// Room catalog loading/validation error.
#[derive(Debug)]
pub enum RoomDataError {
    Parse(serde_json::Error),
    Empty,
    NoGhosts { room: String },
    SpawnOutOfBounds { room: String, x: f32, y: f32 },
}

impl From<serde_json::Error> for RoomDataError {
    fn from(e: serde_json::Error) -> Self {
        RoomDataError::Parse(e)
    }
}

impl std::fmt::Display for RoomDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomDataError::Parse(e) => write!(f, "room catalog parse error: {}", e),
            RoomDataError::Empty => write!(f, "room catalog is empty"),
            RoomDataError::NoGhosts { room } => {
                write!(f, "room '{}' has no ghost spawns", room)
            }
            RoomDataError::SpawnOutOfBounds { room, x, y } => {
                write!(f, "room '{}' has a spawn outside bounds: ({}, {})", room, x, y)
            }
        }
    }
}

impl std::error::Error for RoomDataError {}
