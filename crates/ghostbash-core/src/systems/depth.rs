//! Depth sorter - draw-order ranking for the presentation layer.

use hecs::World;
use serde::{Deserialize, Serialize};

use crate::components::{Defeated, Ghost, Gummy, Healer, Player, Position, Vec2};

/// What kind of entity a draw entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DrawKind {
    Player,
    Ghost { index: usize },
    Gummy { id: u32 },
    Healer,
}

/// One renderable entity with its sort position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawEntry {
    pub kind: DrawKind,
    pub at: Vec2,
}

/// Rank every active renderable entity ascending by Y, so entities lower
/// on screen draw in front. Pure function of current positions; ties keep
/// collection order (player, ghosts by index, gummies by id, healer).
pub fn draw_order(world: &World) -> Vec<DrawEntry> {
    let mut entries: Vec<DrawEntry> = Vec::new();

    for (_, (_, pos)) in world.query::<(&Player, &Position)>().iter() {
        entries.push(DrawEntry {
            kind: DrawKind::Player,
            at: pos.0,
        });
    }

    let mut ghosts: Vec<(usize, Vec2)> = Vec::new();
    for (entity, (ghost, pos)) in world.query::<(&Ghost, &Position)>().iter() {
        if world.get::<&Defeated>(entity).is_err() {
            ghosts.push((ghost.index, pos.0));
        }
    }
    ghosts.sort_by_key(|(index, _)| *index);
    entries.extend(ghosts.into_iter().map(|(index, at)| DrawEntry {
        kind: DrawKind::Ghost { index },
        at,
    }));

    let mut gummies: Vec<(u32, Vec2)> = Vec::new();
    for (_, (gummy, pos)) in world.query::<(&Gummy, &Position)>().iter() {
        if !gummy.collected {
            gummies.push((gummy.id, pos.0));
        }
    }
    gummies.sort_by_key(|(id, _)| *id);
    entries.extend(gummies.into_iter().map(|(id, at)| DrawEntry {
        kind: DrawKind::Gummy { id },
        at,
    }));

    for (_, (healer, pos)) in world.query::<(&Healer, &Position)>().iter() {
        if healer.visible {
            entries.push(DrawEntry {
                kind: DrawKind::Healer,
                at: pos.0,
            });
        }
    }

    entries.sort_by(|a, b| {
        a.at.y
            .partial_cmp(&b.at.y)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries
}
