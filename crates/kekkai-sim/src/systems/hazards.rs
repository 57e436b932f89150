//! Hazards system: splash columns and the rooftop water tank.

use glam::DVec3;
use hecs::Entity;
use tracing::info;

use kekkai_core::components::WaterSplash;
use kekkai_core::constants::{WATER_TANK_FLOOD_SECS, WATER_TANK_MAX_HP};
use kekkai_core::events::FeedbackEvent;
use kekkai_core::types::Rgb;

use crate::context::SimContext;
use crate::scheduler::DeferredAction;
use crate::spawn;

/// Count down splash columns and remove expired ones.
pub fn run(sim: &mut SimContext) {
    let dt = sim.dt();
    let mut expired: Vec<Entity> = Vec::new();
    for (entity, splash) in sim.world.query_mut::<&mut WaterSplash>() {
        splash.remaining_secs -= dt;
        if splash.remaining_secs <= 0.0 {
            expired.push(entity);
        }
    }
    for entity in expired {
        spawn::despawn(sim, entity);
    }
}

/// Whether a point lies inside any live splash column.
pub fn in_splash(sim: &SimContext, position: DVec3) -> bool {
    sim.world.query::<&WaterSplash>().iter().any(|(_, s)| {
        let flat = DVec3::new(position.x - s.center.x, 0.0, position.z - s.center.z).length();
        flat < s.radius && position.y > s.center.y && position.y < s.center.y + s.height
    })
}

/// Damage the tank. Collapse floods the roof and queues the repair.
pub fn damage_tank(sim: &mut SimContext, amount: f64) {
    if sim.tank.destroyed {
        return;
    }
    sim.tank.hp -= amount;
    if sim.tank.hp > 0.0 {
        return;
    }

    let now = sim.now();
    sim.tank.destroyed = true;
    sim.tank.flood_until_secs = Some(now + WATER_TANK_FLOOD_SECS);
    sim.scheduler
        .schedule(now + WATER_TANK_FLOOD_SECS, None, DeferredAction::RestoreWaterTank);

    let center = sim.arena.tank_center;
    let water = sim.config.palette.water;
    info!("water tank collapsed, roof flooded");
    sim.feedback.label("TANK COLLAPSE", center, water);
    sim.feedback.particles(center, 100, water, 5.0);
    if let Some(mesh) = sim.tank.mesh {
        sim.feedback.push(FeedbackEvent::StyleMesh {
            mesh,
            color: water,
            opacity: 0.6,
        });
    }
}

/// Deferred repair after the flood drains.
pub fn restore_tank(sim: &mut SimContext) {
    if !sim.tank.destroyed {
        return;
    }
    sim.tank.destroyed = false;
    sim.tank.hp = WATER_TANK_MAX_HP;
    sim.tank.flood_until_secs = None;

    info!("water tank repaired");
    sim.feedback
        .label("TANK REPAIRED", sim.arena.tank_center, Rgb(0x00ff00));
    if let Some(mesh) = sim.tank.mesh {
        sim.feedback.push(FeedbackEvent::StyleMesh {
            mesh,
            color: Rgb(0xcccccc),
            opacity: 1.0,
        });
    }
}
