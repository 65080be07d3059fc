//! Arena layout: floor, walls, spawners and placed pickups.

use bevy::prelude::*;
use serde::Deserialize;

use crate::enemies::{NavMesh, WalkableRegion};
use crate::pickups::Collectible;

/// One enemy spawner placed in the arena.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SpawnerPlacement {
    pub position: (f32, f32, f32),
    #[serde(default = "default_spawn_radius")]
    pub radius: f32,
    #[serde(default = "default_spawn_interval")]
    pub interval: f32,
    #[serde(default = "default_max_enemies")]
    pub max_enemies: usize,
    /// Empty means every loaded enemy type
    #[serde(default)]
    pub enemy_types: Vec<String>,
}

fn default_spawn_radius() -> f32 {
    10.0
}

fn default_spawn_interval() -> f32 {
    5.0
}

fn default_max_enemies() -> usize {
    6
}

/// A collectible lying in the arena when the session starts.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct PickupPlacement {
    pub item: Collectible,
    pub position: (f32, f32, f32),
}

/// Arena definition loaded from `assets/data/arena.ron`.
#[derive(Resource, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ArenaDefinition {
    /// Half the side length of the square floor
    pub half_extent: f32,
    pub wall_height: f32,
    pub wall_thickness: f32,
    pub floor_color: (f32, f32, f32),
    pub wall_color: (f32, f32, f32),
    pub light_intensity: f32,
    pub spawners: Vec<SpawnerPlacement>,
    pub pickups: Vec<PickupPlacement>,
}

impl Default for ArenaDefinition {
    fn default() -> Self {
        Self {
            half_extent: 20.0,
            wall_height: 3.0,
            wall_thickness: 0.5,
            floor_color: (0.25, 0.24, 0.22),
            wall_color: (0.4, 0.38, 0.35),
            light_intensity: 4_000_000.0,
            spawners: vec![SpawnerPlacement {
                position: (0.0, 0.0, -10.0),
                radius: default_spawn_radius(),
                interval: default_spawn_interval(),
                max_enemies: default_max_enemies(),
                enemy_types: Vec::new(),
            }],
            pickups: Vec::new(),
        }
    }
}

impl ArenaDefinition {
    /// Walkable surface: the whole floor, kept clear of the walls.
    pub fn navmesh(&self) -> NavMesh {
        let inner = (self.half_extent - self.wall_thickness).max(0.0);
        NavMesh::new(vec![WalkableRegion {
            min: Vec2::splat(-inner),
            max: Vec2::splat(inner),
            height: 0.0,
        }])
    }

    /// Centre and half size of the four boundary walls.
    pub fn wall_layout(&self) -> [(Vec3, Vec3); 4] {
        let h = self.half_extent;
        let half_height = self.wall_height / 2.0;
        let half_thickness = self.wall_thickness / 2.0;

        let along_x = Vec3::new(h, half_height, half_thickness);
        let along_z = Vec3::new(half_thickness, half_height, h);
        [
            (Vec3::new(0.0, half_height, -h), along_x),
            (Vec3::new(0.0, half_height, h), along_x),
            (Vec3::new(-h, half_height, 0.0), along_z),
            (Vec3::new(h, half_height, 0.0), along_z),
        ]
    }
}

pub fn to_vec3((x, y, z): (f32, f32, f32)) -> Vec3 {
    Vec3::new(x, y, z)
}

pub fn to_color((r, g, b): (f32, f32, f32)) -> Color {
    Color::srgb(r, g, b)
}
