//! Pickup collection.

use hecs::Entity;

use kekkai_core::components::Pickup;
use kekkai_core::constants::PICKUP_RADIUS;
use kekkai_core::types::Rgb;

use crate::context::SimContext;
use crate::spawn;
use crate::systems::player;

/// Heal the player for every pickup within reach.
pub fn run(sim: &mut SimContext) {
    let player_pos = sim.player_position();
    let collected: Vec<(Entity, Pickup)> = sim
        .world
        .query::<&Pickup>()
        .iter()
        .filter(|(_, p)| p.position.distance(player_pos) < PICKUP_RADIUS)
        .map(|(e, p)| (e, *p))
        .collect();

    for (entity, pickup) in collected {
        player::heal(sim, pickup.heal);
        sim.feedback.label("RECOVER", pickup.position, Rgb(0x00ff00));
        spawn::despawn(sim, entity);
    }
}
