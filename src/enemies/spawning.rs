//! Enemy spawning - entity assembly and the interval spawner.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;

use super::agent::EnemyAgent;
use super::animation::{Animator, AttackTimeline};
use super::components::{Enemy, EnemyType};
use super::data::{EnemyDefinition, EnemyRegistry};
use super::navigation::{NavAgent, NavMesh};
use crate::core::{CombatRng, SessionScoped};
use crate::pickups::LootDropper;

/// How far from a random point the navmesh is searched for a walkable spot.
const NAVMESH_SAMPLE_DISTANCE: f32 = 5.0;

/// Spawn one enemy of `enemy_type` at `position`.
pub fn spawn_enemy(
    commands: &mut Commands,
    asset_server: Option<&AssetServer>,
    enemy_type: &str,
    definition: &EnemyDefinition,
    position: Vec3,
) -> Entity {
    let collider_config = definition.collider.clone().unwrap_or_default();

    let mut entity = commands.spawn((
        Enemy,
        EnemyType(enemy_type.to_string()),
        EnemyAgent::new(definition.stats.clone()),
        NavAgent::new(definition.stats.move_speed),
        Animator::default(),
        AttackTimeline::new(&definition.animation),
        Transform::from_translation(position).with_scale(Vec3::splat(definition.scale)),
        Visibility::default(),
        RigidBody::KinematicPositionBased,
        SessionScoped,
    ));

    // Origin sits on the ground, so the body is raised to stand on it
    entity.with_children(|parent| {
        parent.spawn((
            Collider::capsule_y(collider_config.half_height, collider_config.radius),
            Transform::from_xyz(0.0, collider_config.half_height + collider_config.radius, 0.0),
        ));
    });

    if !definition.loot.is_empty() {
        entity.insert(LootDropper::new(definition.loot.clone()));
    }

    if let (Some(path), Some(asset_server)) = (&definition.model_path, asset_server) {
        entity.insert(SceneRoot(asset_server.load(path.clone())));
    }

    info!("Spawned {} at {:?}", definition.name, position);
    entity.id()
}

/// Give enemies without a model a capsule mesh matching their collider.
pub fn add_placeholder_bodies(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    registry: Res<EnemyRegistry>,
    query: Query<(Entity, &EnemyType), (Added<Enemy>, Without<SceneRoot>)>,
) {
    for (entity, enemy_type) in query.iter() {
        let Some(definition) = registry.get(&enemy_type.0) else {
            continue;
        };
        let collider = definition.collider.clone().unwrap_or_default();
        let material = materials.add(StandardMaterial {
            base_color: Color::srgb(0.45, 0.4, 0.35),
            perceptual_roughness: 1.0,
            ..default()
        });

        commands.entity(entity).with_children(|parent| {
            parent.spawn((
                Mesh3d(meshes.add(Capsule3d::new(collider.radius, collider.half_height * 2.0))),
                MeshMaterial3d(material),
                Transform::from_xyz(0.0, collider.half_height + collider.radius, 0.0),
            ));
        });
    }
}

/// Periodically spawns enemies on walkable ground around itself.
#[derive(Component, Debug, Clone)]
pub struct EnemySpawner {
    pub radius: f32,
    /// Seconds between spawn attempts
    pub interval: f32,
    /// No spawns while this many enemies exist
    pub max_enemies: usize,
    /// Types picked uniformly; empty means every loaded type
    pub enemy_types: Vec<String>,
    timer: f32,
}

impl EnemySpawner {
    pub fn new(radius: f32, interval: f32, max_enemies: usize) -> Self {
        Self {
            radius,
            interval,
            max_enemies,
            enemy_types: Vec::new(),
            timer: 0.0,
        }
    }

    pub fn with_types(mut self, enemy_types: Vec<String>) -> Self {
        self.enemy_types = enemy_types;
        self
    }

    /// Advance the timer; returns true when a spawn attempt is due.
    ///
    /// The timer is frozen while the population is at its cap and restarts
    /// after every attempt, successful or not.
    pub fn tick(&mut self, dt: f32, living_enemies: usize) -> bool {
        if living_enemies >= self.max_enemies {
            return false;
        }

        self.timer += dt;
        if self.timer >= self.interval {
            self.timer = 0.0;
            return true;
        }
        false
    }

    /// Random walkable point within `radius` of `origin`, if one exists.
    pub fn pick_spawn_point<R: Rng + ?Sized>(&self, origin: Vec3, navmesh: &NavMesh, rng: &mut R) -> Option<Vec3> {
        let candidate = origin + random_in_unit_sphere(rng) * self.radius;
        navmesh.sample_position(candidate, NAVMESH_SAMPLE_DISTANCE)
    }

    fn pick_type<'a, R: Rng + ?Sized>(&'a self, registry: &'a EnemyRegistry, rng: &mut R) -> Option<&'a str> {
        if self.enemy_types.is_empty() {
            let count = registry.definitions.len();
            if count == 0 {
                return None;
            }
            registry
                .definitions
                .keys()
                .nth(rng.gen_range(0..count))
                .map(String::as_str)
        } else {
            let index = rng.gen_range(0..self.enemy_types.len());
            Some(self.enemy_types[index].as_str())
        }
    }
}

fn random_in_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let point = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if point.length_squared() <= 1.0 {
            return point;
        }
    }
}

/// Run every spawner, skipping attempts that find no walkable ground.
pub fn run_spawners(
    mut commands: Commands,
    time: Res<Time>,
    asset_server: Option<Res<AssetServer>>,
    registry: Res<EnemyRegistry>,
    navmesh: Res<NavMesh>,
    mut rng: ResMut<CombatRng>,
    mut spawners: Query<(&GlobalTransform, &mut EnemySpawner)>,
    enemies: Query<(), With<Enemy>>,
) {
    let living = enemies.iter().count();

    for (spawner_transform, mut spawner) in spawners.iter_mut() {
        if !spawner.tick(time.delta_secs(), living) {
            continue;
        }

        let Some(position) = spawner.pick_spawn_point(spawner_transform.translation(), &navmesh, &mut rng.0) else {
            debug!("No walkable point near spawner, spawn skipped");
            continue;
        };

        let Some(enemy_type) = spawner.pick_type(&registry, &mut rng.0) else {
            warn!("Spawner has no enemy types to pick from");
            continue;
        };

        match registry.require(enemy_type) {
            Ok(definition) => {
                spawn_enemy(&mut commands, asset_server.as_deref(), enemy_type, definition, position);
            }
            Err(e) => warn!("{}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::navigation::WalkableRegion;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_spawner_fires_on_interval() {
        let mut spawner = EnemySpawner::new(10.0, 5.0, 3);
        assert!(!spawner.tick(2.0, 0));
        assert!(!spawner.tick(2.0, 0));
        assert!(spawner.tick(2.0, 0));
        // Timer restarts after an attempt
        assert!(!spawner.tick(2.0, 0));
    }

    #[test]
    fn test_spawner_pauses_at_cap() {
        let mut spawner = EnemySpawner::new(10.0, 1.0, 2);
        assert!(!spawner.tick(5.0, 2));
        assert!(!spawner.tick(5.0, 3));
        assert!(spawner.tick(1.0, 1));
    }

    #[test]
    fn test_spawn_point_on_navmesh() {
        let navmesh = NavMesh::new(vec![WalkableRegion {
            min: Vec2::new(-20.0, -20.0),
            max: Vec2::new(20.0, 20.0),
            height: 0.0,
        }]);
        // Radius below the sample distance, so every candidate can snap down
        let spawner = EnemySpawner::new(4.0, 1.0, 5);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..50 {
            let point = spawner.pick_spawn_point(Vec3::ZERO, &navmesh, &mut rng).unwrap();
            assert_eq!(point.y, 0.0);
            assert!(point.x.abs() <= 4.0 && point.z.abs() <= 4.0);
        }
    }

    #[test]
    fn test_spawn_skipped_without_navmesh() {
        let spawner = EnemySpawner::new(10.0, 1.0, 5);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(spawner.pick_spawn_point(Vec3::ZERO, &NavMesh::default(), &mut rng), None);
    }

    #[test]
    fn test_pick_type_prefers_configured_types() {
        let mut registry = EnemyRegistry::default();
        registry.definitions.insert("grunt".to_string(), EnemyDefinition::default());
        let mut rng = StdRng::seed_from_u64(1);

        let any = EnemySpawner::new(1.0, 1.0, 1);
        assert_eq!(any.pick_type(&registry, &mut rng), Some("grunt"));

        let only_brute = EnemySpawner::new(1.0, 1.0, 1).with_types(vec!["brute".to_string()]);
        assert_eq!(only_brute.pick_type(&registry, &mut rng), Some("brute"));

        assert_eq!(any.pick_type(&EnemyRegistry::default(), &mut rng), None);
    }
}
