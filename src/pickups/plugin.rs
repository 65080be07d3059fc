//! Pickup plugin - collectibles and enemy loot.

use bevy::prelude::*;

use super::systems::{collect_on_contact, drop_loot_on_death, setup_pickup_visuals};
use crate::core::GameState;
use crate::enemies::EnemySet;

/// Pickup plugin - handles collection and loot drops.
pub struct PickupPlugin;

impl Plugin for PickupPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_pickup_visuals).add_systems(
            Update,
            (collect_on_contact, drop_loot_on_death)
                .in_set(EnemySet::Lifecycle)
                .run_if(in_state(GameState::InGame)),
        );
    }
}
