//! Player plugin - spawning, camera, and walking.

use bevy::prelude::*;

use super::controller;

/// Player plugin - handles player spawning, mouse look and movement.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        controller::setup_controller_systems(app);
    }
}
