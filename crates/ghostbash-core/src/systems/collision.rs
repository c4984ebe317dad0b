//! Collision & interaction resolver - proximity checks between the player
//! and ghosts, pickups, and the healer.
//!
//! Purely a scan: it reports what touched what this tick and the engine
//! applies the consequences. The three checks are independent and may all
//! fire within the same tick.

use hecs::{Entity, World};

use crate::components::{Defeated, Ghost, Gummy, Healer, Health, Invulnerability, Player, Position};
use crate::constants::{GHOST_ATTACK_RADIUS, HEAL_RADIUS, PICKUP_RADIUS};

/// A proximity trigger produced by the per-tick scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// A live ghost is close enough to hurt the player.
    GhostAttack { ghost: Entity },
    /// The player walked over an uncollected gummy.
    GummyTouched { gummy: Entity },
    /// The player reached the visible healer while hurt.
    HealerTouched,
}

/// Scan the room for contacts. Ghost attacks only happen in the dark and
/// only while the player is vulnerable; pickups are grabbed on touch
/// regardless of lighting; healing needs a visible healer and missing
/// health.
pub fn collision_system(world: &World, lights_on: bool) -> Vec<Contact> {
    let mut contacts = Vec::new();

    let (player_pos, invulnerable, health) = match world
        .query::<(&Player, &Position, &Invulnerability, &Health)>()
        .iter()
        .next()
    {
        Some((_, (_, pos, inv, health))) => (pos.0, inv.active(), *health),
        None => return contacts,
    };

    if !lights_on && !invulnerable {
        let mut hits: Vec<(usize, Entity)> = Vec::new();
        for (entity, (ghost, pos)) in world.query::<(&Ghost, &Position)>().iter() {
            if world.get::<&Defeated>(entity).is_ok() {
                continue;
            }
            if pos.0.distance(&player_pos) < GHOST_ATTACK_RADIUS {
                hits.push((ghost.index, entity));
            }
        }
        hits.sort_by_key(|(index, _)| *index);
        contacts.extend(
            hits.into_iter()
                .map(|(_, entity)| Contact::GhostAttack { ghost: entity }),
        );
    }

    let mut touched: Vec<(u32, Entity)> = Vec::new();
    for (entity, (gummy, pos)) in world.query::<(&Gummy, &Position)>().iter() {
        if !gummy.collected && pos.0.distance(&player_pos) < PICKUP_RADIUS {
            touched.push((gummy.id, entity));
        }
    }
    touched.sort_by_key(|(id, _)| *id);
    contacts.extend(
        touched
            .into_iter()
            .map(|(_, entity)| Contact::GummyTouched { gummy: entity }),
    );

    if !health.is_full() {
        for (_, (healer, pos)) in world.query::<(&Healer, &Position)>().iter() {
            if healer.can_heal() && pos.0.distance(&player_pos) < HEAL_RADIUS {
                contacts.push(Contact::HealerTouched);
                break;
            }
        }
    }

    contacts
}
