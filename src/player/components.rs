//! Player-related components.

use bevy::prelude::*;
use serde::Deserialize;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Marker component for the player's camera.
#[derive(Component, Default)]
pub struct PlayerCamera {
    /// Current pitch angle in radians (looking up/down)
    pub pitch: f32,
}

/// Configuration for the first-person controller, loaded from `assets/data/player.ron`.
#[derive(Resource, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Mouse sensitivity multiplier
    pub mouse_sensitivity: f32,
    /// Invert Y-axis for mouse look
    pub invert_y: bool,
    /// Base movement speed in units per second
    pub move_speed: f32,
    /// Constant downward speed keeping the controller on the ground
    pub fall_speed: f32,
    /// Where the player appears when a session starts
    pub spawn_position: (f32, f32, f32),
}

impl PlayerConfig {
    pub fn spawn_point(&self) -> Vec3 {
        let (x, y, z) = self.spawn_position;
        Vec3::new(x, y, z)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 1.5,
            invert_y: false,
            move_speed: 5.0,
            fall_speed: 9.0,
            spawn_position: (0.0, 1.0, 0.0),
        }
    }
}

/// Largest pitch either way, about 80 degrees.
pub const MAX_PITCH: f32 = 1.4;

/// Pitch after applying a vertical mouse delta, clamped so the view never flips.
pub fn apply_pitch(pitch: f32, delta_y: f32, sensitivity: f32, invert_y: bool) -> f32 {
    let y_invert = if invert_y { -1.0 } else { 1.0 };
    (pitch - delta_y * sensitivity * y_invert).clamp(-MAX_PITCH, MAX_PITCH)
}

/// World-space walk direction for WASD input and the player's yaw.
pub fn walk_direction(forward: bool, back: bool, left: bool, right: bool, rotation: Quat) -> Vec3 {
    let mut direction = Vec3::ZERO;
    if forward {
        direction.z -= 1.0;
    }
    if back {
        direction.z += 1.0;
    }
    if left {
        direction.x -= 1.0;
    }
    if right {
        direction.x += 1.0;
    }

    // Only the yaw matters for walking
    let yaw = rotation.to_euler(EulerRot::YXZ).0;
    Quat::from_rotation_y(yaw) * direction.normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_is_clamped() {
        assert_eq!(apply_pitch(0.0, -10_000.0, 1.0, false), MAX_PITCH);
        assert_eq!(apply_pitch(0.0, 10_000.0, 1.0, false), -MAX_PITCH);
        assert!(apply_pitch(0.0, 100.0, 0.001, true) > 0.0);
    }

    #[test]
    fn test_walk_direction_is_normalized_and_follows_yaw() {
        let diagonal = walk_direction(true, false, false, true, Quat::IDENTITY);
        assert!((diagonal.length() - 1.0).abs() < 1e-5);

        let turned = walk_direction(true, false, false, false, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        assert!((turned - Vec3::NEG_X).length() < 1e-5);

        // Looking down does not slow walking
        let pitched = walk_direction(true, false, false, false, Quat::from_rotation_x(-1.0));
        assert!((pitched - Vec3::NEG_Z).length() < 1e-5);

        assert_eq!(walk_direction(true, true, false, false, Quat::IDENTITY), Vec3::ZERO);
    }

    #[test]
    fn test_player_config_from_ron() {
        let config: PlayerConfig = ron::from_str("(move_speed: 7.0, spawn_position: (1.0, 2.0, 3.0))").unwrap();
        assert_eq!(config.move_speed, 7.0);
        assert_eq!(config.spawn_point(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(config.mouse_sensitivity, 1.5);
    }
}
