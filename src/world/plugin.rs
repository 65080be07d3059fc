//! World plugin - arena construction for each session.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use std::path::Path;

use super::arena::{to_color, to_vec3, ArenaDefinition};
use crate::core::{load_or_default, GameState, SessionScoped, SessionSet, DATA_DIR};
use crate::enemies::EnemySpawner;
use crate::pickups::{spawn_collectible, PickupVisuals};

/// World plugin - loads the arena definition and rebuilds it on every session start.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ArenaDefinition>()
            .add_systems(Startup, load_arena_definition)
            .add_systems(OnEnter(GameState::Starting), setup_arena.in_set(SessionSet::Build));
    }
}

fn load_arena_definition(mut arena: ResMut<ArenaDefinition>) {
    *arena = load_or_default(&Path::new(DATA_DIR).join("arena.ron"));
}

/// Build the arena geometry, navigation surface, spawners and pickups.
pub fn setup_arena(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    arena: Res<ArenaDefinition>,
    visuals: Option<Res<PickupVisuals>>,
) {
    info!(
        "Building arena: {0}x{0}, {1} spawner(s), {2} pickup(s)",
        arena.half_extent * 2.0,
        arena.spawners.len(),
        arena.pickups.len()
    );

    commands.insert_resource(arena.navmesh());

    // Floor as a slab with its top face at y = 0
    let floor_depth = 0.5;
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(arena.half_extent * 2.0, floor_depth, arena.half_extent * 2.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: to_color(arena.floor_color),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::from_xyz(0.0, -floor_depth / 2.0, 0.0),
        Collider::cuboid(arena.half_extent, floor_depth / 2.0, arena.half_extent),
        SessionScoped,
    ));

    let wall_material = materials.add(StandardMaterial {
        base_color: to_color(arena.wall_color),
        ..default()
    });
    for (centre, half_size) in arena.wall_layout() {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::from_size(half_size * 2.0))),
            MeshMaterial3d(wall_material.clone()),
            Transform::from_translation(centre),
            Collider::cuboid(half_size.x, half_size.y, half_size.z),
            SessionScoped,
        ));
    }

    commands.spawn((
        PointLight {
            intensity: arena.light_intensity,
            range: arena.half_extent * 3.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(0.0, arena.wall_height * 3.0, 0.0),
        SessionScoped,
    ));

    for placement in &arena.spawners {
        commands.spawn((
            EnemySpawner::new(placement.radius, placement.interval, placement.max_enemies)
                .with_types(placement.enemy_types.clone()),
            Transform::from_translation(to_vec3(placement.position)),
            SessionScoped,
        ));
    }

    for placement in &arena.pickups {
        spawn_collectible(
            &mut commands,
            visuals.as_deref(),
            placement.item.clone(),
            to_vec3(placement.position),
        );
    }
}
