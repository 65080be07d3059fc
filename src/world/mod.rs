//! World module - the arena each session is played in.

mod arena;
mod plugin;

pub use arena::{ArenaDefinition, PickupPlacement, SpawnerPlacement};
pub use plugin::{setup_arena, WorldPlugin};
