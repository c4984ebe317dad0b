//! Small read-only world lookups shared by systems and the engine.

use hecs::{Entity, World};

use crate::components::{Defeated, Ghost, Player, Position, Vec2};

/// The player entity, if one exists in the current room.
pub fn player_entity(world: &World) -> Option<Entity> {
    world.query::<&Player>().iter().next().map(|(entity, _)| entity)
}

/// The player's current position.
pub fn player_position(world: &World) -> Option<Vec2> {
    world
        .query::<(&Player, &Position)>()
        .iter()
        .next()
        .map(|(_, (_, pos))| pos.0)
}

/// Number of ghosts still participating in the room.
pub fn active_ghost_count(world: &World) -> usize {
    world
        .query::<&Ghost>()
        .iter()
        .filter(|(entity, _)| world.get::<&Defeated>(*entity).is_err())
        .count()
}
