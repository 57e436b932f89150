//! Dispatch of deferred events that came due this tick.

use tracing::debug;

use kekkai_core::components::Barrier;

use crate::context::SimContext;
use crate::director;
use crate::scheduler::DeferredAction;
use crate::systems::{barrier, hazards};

pub fn run(sim: &mut SimContext) {
    for event in sim.scheduler.drain_due(sim.now()) {
        // A terminal transition earlier in this batch cancels the rest.
        if !sim.is_active() {
            break;
        }
        match event.action {
            DeferredAction::AdvanceWave => {
                if sim.mission.pending_advance == Some(event.id) {
                    director::advance_wave(sim);
                }
            }
            DeferredAction::RestoreWaterTank => hazards::restore_tank(sim),
            DeferredAction::ChainDestroy { barrier: target } => {
                let standing = sim
                    .world
                    .get::<&Barrier>(target)
                    .map(|b| !b.shrinking)
                    .unwrap_or(false);
                if standing {
                    if let Err(reason) = barrier::destroy_barrier(sim, target) {
                        debug!(%reason, "chain destroy skipped");
                    }
                }
            }
        }
    }
}
