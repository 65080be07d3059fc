//! Husk Arena - Entry Point
//!
//! Controls:
//! - WASD: Move
//! - Mouse: Look around
//! - Left click: Fire
//! - R: Reload
//! - Escape: Pause/Unpause
//! - Enter: Play again after victory or defeat

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

fn main() {
    App::new()
        // Bevy default plugins
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Husk Arena".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))

        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())

        // Our game plugin
        .add_plugins(husk_arena::HuskArenaPlugin)

        .run();
}
