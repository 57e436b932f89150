//! Scripted input for headless runs: trap the nearest enemy in a
//! barrier, then destroy it once the aim highlights it.

use glam::DVec3;

use kekkai_core::commands::PlayerCommand;
use kekkai_core::enums::GamePhase;
use kekkai_core::state::HudSnapshot;

/// Edge length of the cube barriers the autopilot draws.
const TRAP_SIZE: f64 = 4.0;

/// Decision parameters.
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Enemies farther than this from the player are ignored.
    pub reach: f64,
    /// Spiritual power kept in reserve before drawing a barrier.
    pub reserve_sp: f64,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            reach: 40.0,
            reserve_sp: 10.0,
        }
    }
}

impl Autopilot {
    /// Commands for the next tick, given the latest snapshot.
    pub fn plan(&self, snapshot: &HudSnapshot) -> Vec<PlayerCommand> {
        if snapshot.phase != GamePhase::Active {
            return Vec::new();
        }
        let highlighted = snapshot
            .barriers
            .iter()
            .any(|b| b.highlighted && !b.shrinking);
        if highlighted {
            return vec![PlayerCommand::Destroy];
        }
        if snapshot.player.sp < self.reserve_sp {
            return Vec::new();
        }

        let player = snapshot.player.position;
        let Some(target) = snapshot
            .enemies
            .iter()
            .map(|e| (e.position, e.position.distance(player)))
            .filter(|(_, d)| *d < self.reach)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(position, _)| position)
        else {
            return Vec::new();
        };

        vec![
            PlayerCommand::RequestBarrier {
                position: target,
                size: DVec3::splat(TRAP_SIZE),
                yaw: 0.0,
                ghost: false,
            },
            PlayerCommand::SetAim {
                origin: player,
                direction: target - player,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kekkai_core::enums::{BehaviorState, EnemyArchetype};
    use kekkai_core::state::{BarrierView, EnemyView};

    fn active() -> HudSnapshot {
        let mut snapshot = HudSnapshot {
            phase: GamePhase::Active,
            ..Default::default()
        };
        snapshot.player.sp = 100.0;
        snapshot
    }

    fn enemy(id: u64, position: DVec3) -> EnemyView {
        EnemyView {
            id,
            archetype: EnemyArchetype::Normal,
            state: BehaviorState::Chase,
            position,
            hp: 1.0,
            max_hp: 1.0,
            is_boss: false,
            opacity: 1.0,
            tint: None,
        }
    }

    #[test]
    fn test_traps_nearest_enemy() {
        let mut snapshot = active();
        snapshot.enemies.push(enemy(1, DVec3::new(30.0, 1.0, 0.0)));
        snapshot.enemies.push(enemy(2, DVec3::new(10.0, 1.0, 0.0)));

        let commands = Autopilot::default().plan(&snapshot);
        assert_eq!(commands.len(), 2);
        match &commands[0] {
            PlayerCommand::RequestBarrier { position, .. } => {
                assert_eq!(*position, DVec3::new(10.0, 1.0, 0.0));
            }
            other => panic!("expected barrier request, got {other:?}"),
        }
    }

    #[test]
    fn test_destroys_highlighted_barrier() {
        let mut snapshot = active();
        snapshot.enemies.push(enemy(1, DVec3::new(10.0, 1.0, 0.0)));
        snapshot.barriers.push(BarrierView {
            id: 1,
            position: DVec3::new(10.0, 1.0, 0.0),
            size: DVec3::splat(TRAP_SIZE),
            yaw: 0.0,
            scale: 1.0,
            is_ghost: false,
            is_water_cube: false,
            shrinking: false,
            highlighted: true,
        });

        let commands = Autopilot::default().plan(&snapshot);
        assert!(matches!(commands.as_slice(), [PlayerCommand::Destroy]));
    }

    #[test]
    fn test_idle_when_low_or_out_of_reach() {
        let mut snapshot = active();
        snapshot.enemies.push(enemy(1, DVec3::new(100.0, 1.0, 0.0)));
        assert!(Autopilot::default().plan(&snapshot).is_empty());

        snapshot.enemies.push(enemy(2, DVec3::new(5.0, 1.0, 0.0)));
        snapshot.player.sp = 5.0;
        assert!(Autopilot::default().plan(&snapshot).is_empty());

        snapshot.phase = GamePhase::Paused;
        snapshot.player.sp = 100.0;
        assert!(Autopilot::default().plan(&snapshot).is_empty());
    }
}
