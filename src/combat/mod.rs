//! Combat module - the player's hitscan weapon, body lookup, and damage.

mod plugin;
mod registry;
mod systems;
pub mod weapon;

pub use plugin::CombatPlugin;
pub use registry::EnemyBodies;
pub use systems::CombatSet;
pub use weapon::{FireOutcome, RaycastWeapon, WeaponDefinition};
