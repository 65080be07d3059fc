//! Player module - player entity, first-person camera, and movement.

mod components;
mod controller;
mod plugin;

pub use components::*;
pub use controller::spawn_player;
pub use plugin::PlayerPlugin;
