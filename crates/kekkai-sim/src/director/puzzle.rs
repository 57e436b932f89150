//! Ordered-kill puzzle encounter.
//!
//! Three colored minions guard an invincible core. They must fall in a
//! hidden order, each kill at least [`PUZZLE_SIMULTANEOUS_SECS`] after the
//! previous one. A wrong or simultaneous kill respawns the full set and
//! restarts the sequence; the order itself never changes.

use glam::DVec3;
use hecs::Entity;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use kekkai_core::components::{Mesh, ParentLink, PuzzleCore, PuzzleMinion};
use kekkai_core::constants::{PUZZLE_MINION_COUNT, PUZZLE_MINION_OFFSETS, PUZZLE_SIMULTANEOUS_SECS};
use kekkai_core::events::FeedbackEvent;
use kekkai_core::state::PuzzleView;
use kekkai_core::types::Rgb;

use crate::context::SimContext;
use crate::spawn;
use crate::systems::combat;

#[derive(Debug, Clone)]
pub struct PuzzleState {
    pub core: Entity,
    /// Minion indices in the order they must be killed.
    pub required_order: Vec<usize>,
    pub current_step: usize,
    pub last_kill_secs: Option<f64>,
    pub offsets: Vec<DVec3>,
}

impl PuzzleState {
    pub fn is_solved(&self) -> bool {
        self.current_step >= self.required_order.len()
    }
}

/// Spawn the core and its minions with a fresh hidden order.
pub fn setup(sim: &mut SimContext) -> PuzzleState {
    let core = spawn::spawn_puzzle_core(sim);
    let offsets: Vec<DVec3> = PUZZLE_MINION_OFFSETS.iter().copied().map(DVec3::from).collect();
    let mut required_order: Vec<usize> = (0..PUZZLE_MINION_COUNT).collect();
    required_order.shuffle(&mut sim.rng);

    let state = PuzzleState {
        core,
        required_order,
        current_step: 0,
        last_kill_secs: None,
        offsets,
    };
    spawn_minions(sim, &state);
    debug!(order = ?state.required_order, "puzzle sequence set");
    state
}

fn spawn_minions(sim: &mut SimContext, state: &PuzzleState) {
    let core_position = sim
        .body_position(state.core)
        .or_else(|| sim.world.get::<&PuzzleCore>(state.core).ok().map(|c| c.home))
        .unwrap_or_default();
    for (index, offset) in state.offsets.iter().copied().enumerate() {
        spawn::spawn_puzzle_minion(sim, state.core, core_position, index, offset);
    }
}

/// Judge a minion kill against the hidden order.
pub fn on_minion_killed(sim: &mut SimContext, index: usize, position: DVec3) {
    let now = sim.now();
    let Some(state) = sim.mission.puzzle.as_mut() else {
        return;
    };
    if state.is_solved() {
        return;
    }
    let too_fast = state
        .last_kill_secs
        .is_some_and(|t| now - t < PUZZLE_SIMULTANEOUS_SECS);
    let in_order = state.required_order.get(state.current_step) == Some(&index);
    if too_fast || !in_order {
        debug!(index, too_fast, step = state.current_step, "puzzle kill rejected");
        fail(sim);
        return;
    }

    state.current_step += 1;
    state.last_kill_secs = Some(now);
    let solved = state.is_solved();
    let core = state.core;
    let step = state.current_step;

    sim.feedback
        .label(format!("SEAL {step} BROKEN"), position, Rgb(0xffee00));
    if solved {
        expose_core(sim, core);
    }
}

fn expose_core(sim: &mut SimContext, core: Entity) {
    let mesh = match sim.world.query_one_mut::<(&mut PuzzleCore, &Mesh)>(core) {
        Ok((puzzle_core, mesh)) => {
            puzzle_core.invincible = false;
            mesh.0
        }
        Err(_) => return,
    };
    info!("puzzle solved, core exposed");
    sim.feedback.push(FeedbackEvent::StyleMesh {
        mesh,
        color: sim.config.palette.highlight,
        opacity: 1.0,
    });
    sim.feedback
        .message("CORE EXPOSED", sim.config.palette.highlight);
}

/// Wrong order or simultaneous kill: respawn the full set and restart.
pub fn fail(sim: &mut SimContext) {
    let Some(state) = sim.mission.puzzle.clone() else {
        return;
    };
    let minions: Vec<Entity> = sim
        .world
        .query::<(&PuzzleMinion, &ParentLink)>()
        .iter()
        .filter(|(_, (_, link))| link.parent == state.core)
        .map(|(e, _)| e)
        .collect();
    for minion in minions {
        combat::remove_enemy(sim, minion);
    }
    if let Some(state) = sim.mission.puzzle.as_mut() {
        state.current_step = 0;
        state.last_kill_secs = None;
    }
    if sim.world.contains(state.core) {
        spawn_minions(sim, &state);
    }
    info!("puzzle sequence failed");
    sim.feedback.message("SEQUENCE FAILED", Rgb::RED);
}

/// Whether damage to the core should be ignored.
pub fn core_is_invincible(sim: &SimContext, entity: Entity) -> bool {
    sim.world
        .get::<&PuzzleCore>(entity)
        .map(|c| c.invincible)
        .unwrap_or(false)
}

pub fn view(sim: &SimContext) -> Option<PuzzleView> {
    let state = sim.mission.puzzle.as_ref()?;
    Some(PuzzleView {
        current_step: state.current_step,
        minion_count: state.required_order.len(),
        core_vulnerable: !core_is_invincible(sim, state.core),
    })
}
