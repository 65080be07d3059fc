//! Global events used for cross-system communication.
//!
//! Damage sources never touch an enemy directly: the weapon system sends a
//! `DamageEvent`, the damage system applies it to the enemy state machine and
//! reports kills with a `DeathEvent`. Death handling and loot listen for the
//! latter independently.

use bevy::prelude::*;

/// Sent when an entity should take damage.
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageEvent {
    /// Entity receiving damage
    pub target: Entity,
    /// Entity that caused the damage
    pub source: Entity,
    /// Damage amount
    pub amount: f32,
}

/// Sent exactly once when an enemy's health reaches zero.
#[derive(Event, Debug, Clone, Copy)]
pub struct DeathEvent {
    /// Entity that died
    pub entity: Entity,
    /// Entity that killed them (if any)
    pub killed_by: Option<Entity>,
}
