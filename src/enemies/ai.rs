//! Enemy AI behavior systems.
//!
//! Thin ECS wrappers around [`EnemyAgent`]: gather the target and the
//! collaborators for each enemy, call into the state machine, and translate
//! deaths into collider / navigation / animation changes.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::agent::EnemyAgent;
use super::animation::{with_sink, Animator, AttackCompleteEvent, AttackHitEvent};
use super::components::{DeathTimer, Enemy, EnemyType};
use super::navigation::NavAgent;
use crate::combat::EnemyBodies;
use crate::core::{CombatRng, DeathEvent};
use crate::player::Player;
use crate::session::SessionTracker;

/// Report enemies that will run without animation cues.
pub fn warn_missing_animators(query: Query<(Entity, &EnemyType), (Added<EnemyAgent>, Without<Animator>)>) {
    for (entity, enemy_type) in query.iter() {
        warn!(
            "Enemy {:?} ({}) has no Animator, animation cues will be dropped",
            entity, enemy_type.0
        );
    }
}

/// Tick every enemy state machine against the player's position.
pub fn ai_update(
    time: Res<Time>,
    mut rng: ResMut<CombatRng>,
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<
        (&mut EnemyAgent, &mut Transform, &mut NavAgent, Option<&mut Animator>),
        (With<Enemy>, Without<Player>),
    >,
) {
    let Ok(player_transform) = player_query.get_single() else {
        return;
    };
    let target = player_transform.translation;
    let dt = time.delta_secs();

    for (mut agent, mut transform, mut nav, mut animator) in enemy_query.iter_mut() {
        with_sink(animator.as_deref_mut(), |sink| {
            agent.tick(dt, &mut transform, target, &mut nav, sink, &mut rng.0);
        });
    }
}

/// Hit-frame keyframes: let the attacker try to damage the player.
pub fn resolve_attack_hits(
    time: Res<Time>,
    mut hit_events: EventReader<AttackHitEvent>,
    mut session: ResMut<SessionTracker>,
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<(&mut EnemyAgent, &Transform), (With<Enemy>, Without<Player>)>,
) {
    let Ok(player_transform) = player_query.get_single() else {
        hit_events.clear();
        return;
    };

    for event in hit_events.read() {
        let Ok((mut agent, transform)) = enemy_query.get_mut(event.attacker) else {
            continue;
        };

        if agent.deal_damage(
            transform.translation,
            player_transform.translation,
            &mut session,
            time.elapsed_secs(),
        ) {
            info!("Enemy {:?} hit the player. Lives left: {}", event.attacker, session.lives());
        }
    }
}

/// End-of-clip keyframes: let the attacker pick its next state.
pub fn resolve_attack_completions(
    mut complete_events: EventReader<AttackCompleteEvent>,
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<
        (&mut EnemyAgent, &Transform, &mut NavAgent, Option<&mut Animator>),
        (With<Enemy>, Without<Player>),
    >,
) {
    let Ok(player_transform) = player_query.get_single() else {
        complete_events.clear();
        return;
    };

    for event in complete_events.read() {
        let Ok((mut agent, transform, mut nav, mut animator)) = enemy_query.get_mut(event.attacker) else {
            continue;
        };

        with_sink(animator.as_deref_mut(), |sink| {
            agent.on_attack_complete(transform.translation, player_transform.translation, &mut nav, sink);
        });
    }
}

/// Apply death entry effects and start the corpse timer.
pub fn handle_enemy_death(
    mut commands: Commands,
    mut death_events: EventReader<DeathEvent>,
    bodies: Res<EnemyBodies>,
    mut enemy_query: Query<(&EnemyAgent, &mut NavAgent, Option<&mut Animator>), With<Enemy>>,
) {
    for event in death_events.read() {
        let Ok((agent, mut nav, mut animator)) = enemy_query.get_mut(event.entity) else {
            continue;
        };

        with_sink(animator.as_deref_mut(), |sink| agent.on_death(&mut nav, sink));

        // Corpses stop blocking shots and movement
        commands.entity(event.entity).insert(DeathTimer::default());
        for body in bodies.bodies_of(event.entity) {
            commands.entity(body).insert(ColliderDisabled);
        }

        info!("Enemy {:?} died", event.entity);
    }
}

/// Despawn enemies after the corpse grace period.
pub fn despawn_dead_enemies(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut DeathTimer)>,
) {
    for (entity, mut death_timer) in query.iter_mut() {
        death_timer.0.tick(time.delta());

        if death_timer.0.finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}
