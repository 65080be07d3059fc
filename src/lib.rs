//! Husk Arena - a first-person arena shooter in Bevy.
//!
//! Enemies spawn around the arena, chase the player and strike in melee.
//! The player shoots them with a hitscan weapon and collects the provisions
//! they drop; reaching the score threshold wins, running out of lives loses.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, data loading, session flow
//! - **Session**: Lives, score, invulnerability and the outcome
//! - **Player**: First-person camera and movement
//! - **Combat**: Hitscan weapon, hit resolution, damage
//! - **Enemies**: Agent state machine, animation cues, navigation, spawning
//! - **Pickups**: Collectibles and loot drops
//! - **World**: Arena construction
//! - **UI**: HUD

pub mod combat;
pub mod core;
pub mod enemies;
pub mod pickups;
pub mod player;
pub mod session;
pub mod ui;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct HuskArenaPlugin;

impl Plugin for HuskArenaPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Lives and score
            .add_plugins(session::SessionPlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // Enemy systems
            .add_plugins(enemies::EnemyPlugin)

            // Combat systems (ordered against the enemy sets)
            .add_plugins(combat::CombatPlugin)

            // Collectibles and loot
            .add_plugins(pickups::PickupPlugin)

            // Arena
            .add_plugins(world::WorldPlugin)

            // UI systems
            .add_plugins(ui::UiPlugin);
    }
}
