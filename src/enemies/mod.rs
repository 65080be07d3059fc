//! Enemies module - combat state machine, navigation, animation cues and spawning.

pub mod agent;
mod ai;
pub mod animation;
mod components;
pub mod data;
pub mod navigation;
mod plugin;
pub mod spawning;

pub use agent::{AgentState, DamageOutcome, EnemyAgent};
pub use animation::{
    with_sink, AnimFlag, AnimTrigger, AnimationSink, Animator, AttackCompleteEvent, AttackHitEvent, NullSink,
};
pub use components::*;
pub use data::{EnemyDefinition, EnemyRegistry};
pub use navigation::{NavAgent, NavMesh, WalkableRegion};
pub use plugin::{EnemyPlugin, EnemySet};
pub use spawning::{spawn_enemy, EnemySpawner};
