//! Pickup spawning, collection on contact, and loot drops.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::{apply_collectible, Collectible, CollectibleKind, LootDropper, LOOT_DROP_HEIGHT};
use crate::combat::RaycastWeapon;
use crate::core::{CombatRng, DeathEvent, SessionScoped};
use crate::player::Player;
use crate::session::SessionTracker;

const PICKUP_RADIUS: f32 = 0.3;

/// Shared mesh and materials for collectibles.
#[derive(Resource)]
pub struct PickupVisuals {
    mesh: Handle<Mesh>,
    provisions: Handle<StandardMaterial>,
    health: Handle<StandardMaterial>,
    ammo: Handle<StandardMaterial>,
}

impl PickupVisuals {
    fn material(&self, kind: CollectibleKind) -> Handle<StandardMaterial> {
        match kind {
            CollectibleKind::Provisions => self.provisions.clone(),
            CollectibleKind::Health => self.health.clone(),
            CollectibleKind::Ammo => self.ammo.clone(),
        }
    }
}

pub fn setup_pickup_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut emissive = |r: f32, g: f32, b: f32| {
        materials.add(StandardMaterial {
            base_color: Color::srgb(r, g, b),
            emissive: LinearRgba::rgb(r, g, b) * 0.5,
            ..default()
        })
    };

    let provisions = emissive(0.9, 0.75, 0.2);
    let health = emissive(0.85, 0.15, 0.15);
    let ammo = emissive(0.3, 0.5, 0.9);

    commands.insert_resource(PickupVisuals {
        mesh: meshes.add(Cuboid::from_length(PICKUP_RADIUS * 1.2)),
        provisions,
        health,
        ammo,
    });
}

/// Spawn a collectible as a sensor that reports contacts with the kinematic player.
pub fn spawn_collectible(
    commands: &mut Commands,
    visuals: Option<&PickupVisuals>,
    collectible: Collectible,
    position: Vec3,
) -> Entity {
    let kind = collectible.kind;
    let mut entity = commands.spawn((
        collectible,
        Transform::from_translation(position),
        Visibility::default(),
        Collider::ball(PICKUP_RADIUS),
        Sensor,
        ActiveEvents::COLLISION_EVENTS,
        ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_STATIC,
        SessionScoped,
    ));

    if let Some(visuals) = visuals {
        entity.insert((Mesh3d(visuals.mesh.clone()), MeshMaterial3d(visuals.material(kind))));
    }

    entity.id()
}

/// Collect pickups the player touches.
pub fn collect_on_contact(
    mut commands: Commands,
    mut collision_events: EventReader<CollisionEvent>,
    mut session: ResMut<SessionTracker>,
    mut player_query: Query<Option<&mut RaycastWeapon>, With<Player>>,
    collectible_query: Query<&Collectible>,
) {
    for event in collision_events.read() {
        let CollisionEvent::Started(a, b, _) = event else {
            continue;
        };

        let (pickup, other) = if collectible_query.contains(*a) {
            (*a, *b)
        } else if collectible_query.contains(*b) {
            (*b, *a)
        } else {
            continue;
        };

        let Ok(mut weapon) = player_query.get_mut(other) else {
            continue;
        };
        let Ok(collectible) = collectible_query.get(pickup) else {
            continue;
        };

        apply_collectible(collectible, &mut session, weapon.as_deref_mut());
        info!("Collected {:?} x{}", collectible.kind, collectible.value);

        // Despawned even when the session is over
        commands.entity(pickup).despawn_recursive();
    }
}

/// Roll the loot table of every enemy that just died.
pub fn drop_loot_on_death(
    mut commands: Commands,
    mut death_events: EventReader<DeathEvent>,
    mut rng: ResMut<CombatRng>,
    visuals: Option<Res<PickupVisuals>>,
    dropper_query: Query<(&LootDropper, &Transform)>,
) {
    for event in death_events.read() {
        let Ok((dropper, transform)) = dropper_query.get(event.entity) else {
            continue;
        };

        let position = transform.translation + Vec3::Y * LOOT_DROP_HEIGHT;
        for item in dropper.roll(&mut rng.0) {
            debug!("Dropped {:?} x{}", item.kind, item.value);
            spawn_collectible(&mut commands, visuals.as_deref(), item, position);
        }
    }
}
