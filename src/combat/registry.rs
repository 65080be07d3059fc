//! Collider to enemy lookup for hit resolution.
//!
//! A shot reports the collider it struck, which may be the enemy root or a
//! child body part. The registry is filled when an enemy appears, so resolving
//! a hit is a single map lookup.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use std::collections::HashMap;

use crate::enemies::EnemyAgent;

/// Maps physical bodies to the enemy that owns them.
#[derive(Resource, Default, Debug)]
pub struct EnemyBodies {
    owners: HashMap<Entity, Entity>,
}

impl EnemyBodies {
    pub fn register(&mut self, body: Entity, enemy: Entity) {
        self.owners.insert(body, enemy);
    }

    /// Owning enemy of a struck collider, if it belongs to one.
    pub fn resolve(&self, body: Entity) -> Option<Entity> {
        self.owners.get(&body).copied()
    }

    /// All registered bodies of `enemy`.
    pub fn bodies_of(&self, enemy: Entity) -> Vec<Entity> {
        self.owners
            .iter()
            .filter(|(_, owner)| **owner == enemy)
            .map(|(body, _)| *body)
            .collect()
    }

    pub fn unregister_enemy(&mut self, enemy: Entity) {
        self.owners.retain(|_, owner| *owner != enemy);
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// Register new enemies and every collider in their hierarchy.
pub fn register_enemy_bodies(
    mut bodies: ResMut<EnemyBodies>,
    new_enemies: Query<Entity, Added<EnemyAgent>>,
    children_query: Query<&Children>,
    collider_query: Query<(), With<Collider>>,
) {
    for enemy in new_enemies.iter() {
        bodies.register(enemy, enemy);

        for descendant in children_query.iter_descendants(enemy) {
            if collider_query.get(descendant).is_ok() {
                bodies.register(descendant, enemy);
            }
        }
    }
}

/// Drop entries for enemies that were despawned.
pub fn unregister_enemy_bodies(
    mut bodies: ResMut<EnemyBodies>,
    mut removed: RemovedComponents<EnemyAgent>,
) {
    for enemy in removed.read() {
        bodies.unregister_enemy(enemy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_body_parts_to_owner() {
        let mut world = World::new();
        let enemy = world.spawn_empty().id();
        let arm = world.spawn_empty().id();
        let wall = world.spawn_empty().id();

        let mut bodies = EnemyBodies::default();
        bodies.register(enemy, enemy);
        bodies.register(arm, enemy);

        assert_eq!(bodies.resolve(arm), Some(enemy));
        assert_eq!(bodies.resolve(enemy), Some(enemy));
        assert_eq!(bodies.resolve(wall), None);

        let mut owned = bodies.bodies_of(enemy);
        owned.sort();
        let mut expected = vec![enemy, arm];
        expected.sort();
        assert_eq!(owned, expected);
    }

    #[test]
    fn test_unregister_removes_all_parts() {
        let mut world = World::new();
        let first = world.spawn_empty().id();
        let first_arm = world.spawn_empty().id();
        let second = world.spawn_empty().id();

        let mut bodies = EnemyBodies::default();
        bodies.register(first, first);
        bodies.register(first_arm, first);
        bodies.register(second, second);

        bodies.unregister_enemy(first);
        assert_eq!(bodies.resolve(first_arm), None);
        assert_eq!(bodies.resolve(second), Some(second));
        assert_eq!(bodies.len(), 1);
    }
}
