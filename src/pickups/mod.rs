//! Pickups module - collectibles that feed the session and weapon, and enemy loot.

mod components;
mod plugin;
mod systems;

pub use components::*;
pub use plugin::PickupPlugin;
pub use systems::{spawn_collectible, PickupVisuals};
