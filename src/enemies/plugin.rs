//! Enemy plugin - registers all enemy systems.

use bevy::prelude::*;

use super::ai;
use super::animation;
use super::data::{load_enemy_definitions, EnemyRegistry};
use super::navigation::{steer_agents, NavMesh};
use super::spawning::{add_placeholder_bodies, run_spawners};
use crate::core::GameState;

/// Ordering for one enemy frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum EnemySet {
    /// State machines tick and navigation moves
    Think,
    /// Attack timelines emit keyframes and the callbacks resolve
    Animate,
    /// Deaths, corpses and new arrivals
    Lifecycle,
}

/// Enemy plugin - handles enemy data, AI, animation timelines, death and spawning.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<EnemyRegistry>()
            .init_resource::<NavMesh>()
            .add_event::<animation::AttackHitEvent>()
            .add_event::<animation::AttackCompleteEvent>()
            .add_systems(Startup, load_enemy_definitions)
            .configure_sets(
                Update,
                (EnemySet::Think, EnemySet::Animate, EnemySet::Lifecycle)
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(
                Update,
                (ai::warn_missing_animators, ai::ai_update, steer_agents)
                    .chain()
                    .in_set(EnemySet::Think),
            )
            .add_systems(
                Update,
                (
                    animation::drive_attack_timelines,
                    ai::resolve_attack_hits,
                    ai::resolve_attack_completions,
                )
                    .chain()
                    .in_set(EnemySet::Animate),
            )
            .add_systems(
                Update,
                (
                    ai::handle_enemy_death,
                    ai::despawn_dead_enemies,
                    run_spawners,
                    add_placeholder_bodies,
                )
                    .chain()
                    .in_set(EnemySet::Lifecycle),
            );
    }
}
