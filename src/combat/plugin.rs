//! Combat plugin - hitscan weapon, hit resolution and damage.

use bevy::prelude::*;

use super::systems;

/// Combat plugin - handles the player weapon and damage to enemies.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        systems::setup_combat_systems(app);
    }
}
