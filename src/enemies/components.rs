//! Enemy-related components.

use bevy::prelude::*;
use serde::Deserialize;

/// Marker component for all enemies.
#[derive(Component)]
pub struct Enemy;

/// Enemy type identifier (matches RON file name).
#[derive(Component, Clone, Debug)]
pub struct EnemyType(pub String);

/// How much player damage one hit is worth, expressed in lives.
const DAMAGE_PER_LIFE: f32 = 10.0;

/// Per-instance combat configuration, loaded from RON data files.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EnemyStats {
    pub max_health: f32,
    /// Target closer than this wakes an idle enemy
    pub chase_range: f32,
    pub attack_range: f32,
    pub attack_damage: f32,
    /// Seconds between attack starts
    pub attack_cooldown: f32,
    /// Heading interpolation rate (per second)
    pub rotation_speed: f32,
    pub move_speed: f32,
    /// Number of interchangeable attack animations
    pub attack_variants: usize,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            chase_range: 10.0,
            attack_range: 2.0,
            attack_damage: 10.0,
            attack_cooldown: 2.0,
            rotation_speed: 10.0,
            move_speed: 3.5,
            attack_variants: 2,
        }
    }
}

impl EnemyStats {
    /// Lives taken from the player by one landed hit (at least one).
    pub fn lives_per_hit(&self) -> u32 {
        ((self.attack_damage / DAMAGE_PER_LIFE).round() as u32).max(1)
    }
}

/// Seconds a corpse stays in the world before despawning.
pub const CORPSE_LINGER_SECS: f32 = 3.0;

/// Timer for the death grace period before despawn.
#[derive(Component)]
pub struct DeathTimer(pub Timer);

impl Default for DeathTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(CORPSE_LINGER_SECS, TimerMode::Once))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lives_per_hit() {
        let mut stats = EnemyStats::default();
        assert_eq!(stats.lives_per_hit(), 1);

        stats.attack_damage = 25.0;
        assert_eq!(stats.lives_per_hit(), 3);

        // Weak hits still cost a life
        stats.attack_damage = 2.0;
        assert_eq!(stats.lives_per_hit(), 1);
    }
}
