//! Combat systems - weapon handling, shot resolution and damage.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use std::path::Path;

use super::registry::{register_enemy_bodies, unregister_enemy_bodies, EnemyBodies};
use super::weapon::{FireOutcome, RaycastWeapon, WeaponDefinition};
use crate::core::{load_or_default, DamageEvent, DeathEvent, GameState, DATA_DIR};
use crate::enemies::{with_sink, AnimFlag, AnimTrigger, AnimationSink, Animator, DamageOutcome, EnemyAgent, EnemySet};
use crate::player::{Player, PlayerCamera};

/// System set ordering for combat.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatSet {
    /// Body registry upkeep
    Bookkeeping,
    /// Reloads and trigger pulls
    Weapon,
    /// Damage events applied to enemies
    Damage,
}

/// Configure combat systems.
pub fn setup_combat_systems(app: &mut App) {
    app
        .init_resource::<EnemyBodies>()
        .init_resource::<WeaponDefinition>()
        .add_systems(Startup, load_weapon_definition)
        .configure_sets(
            Update,
            (CombatSet::Bookkeeping, CombatSet::Weapon, CombatSet::Damage)
                .chain()
                .after(EnemySet::Animate)
                .before(EnemySet::Lifecycle)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            Update,
            (register_enemy_bodies, unregister_enemy_bodies).in_set(CombatSet::Bookkeeping),
        )
        .add_systems(
            Update,
            (tick_weapon_reloads, fire_weapon).chain().in_set(CombatSet::Weapon),
        )
        .add_systems(Update, apply_damage.in_set(CombatSet::Damage))
        // Returning to play re-enables the weapon
        .add_systems(OnEnter(GameState::InGame), enable_weapons);
}

fn load_weapon_definition(mut definition: ResMut<WeaponDefinition>) {
    *definition = load_or_default(&Path::new(DATA_DIR).join("weapon.ron"));
}

fn cue_reload_start(sink: &mut dyn AnimationSink) {
    sink.set_flag(AnimFlag::IsReloading, true);
    sink.set_trigger(AnimTrigger::Reload);
}

/// Clear interrupted reloads whenever gameplay (re)starts.
fn enable_weapons(mut query: Query<(&mut RaycastWeapon, Option<&mut Animator>)>) {
    for (mut weapon, mut animator) in query.iter_mut() {
        weapon.on_enable();
        with_sink(animator.as_deref_mut(), |sink| sink.set_flag(AnimFlag::IsReloading, false));
    }
}

/// Count down reloads and start one as soon as the magazine runs dry.
fn tick_weapon_reloads(time: Res<Time>, mut query: Query<(&mut RaycastWeapon, Option<&mut Animator>)>) {
    for (mut weapon, mut animator) in query.iter_mut() {
        if weapon.needs_reload() && weapon.start_reload() {
            with_sink(animator.as_deref_mut(), cue_reload_start);
        } else if weapon.tick(time.delta_secs()) {
            info!("{} reloaded", weapon.definition.name);
            with_sink(animator.as_deref_mut(), |sink| sink.set_flag(AnimFlag::IsReloading, false));
        }
    }
}

/// Handle fire / reload input and resolve shots with a single ray.
#[allow(clippy::too_many_arguments)]
fn fire_weapon(
    time: Res<Time>,
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    bodies: Res<EnemyBodies>,
    rapier_context: Query<&RapierContext>,
    camera_query: Query<&GlobalTransform, With<PlayerCamera>>,
    mut player_query: Query<(Entity, &mut RaycastWeapon, Option<&mut Animator>), With<Player>>,
    mut impulses: Query<&mut ExternalImpulse>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let Ok((player_entity, mut weapon, mut animator)) = player_query.get_single_mut() else {
        return;
    };

    if keyboard.just_pressed(KeyCode::KeyR) && weapon.request_reload() {
        with_sink(animator.as_deref_mut(), cue_reload_start);
        return;
    }

    if !mouse.pressed(MouseButton::Left) {
        return;
    }

    match weapon.try_fire(time.elapsed_secs()) {
        FireOutcome::Fired => {}
        FireOutcome::ReloadStarted => {
            with_sink(animator.as_deref_mut(), cue_reload_start);
            return;
        }
        FireOutcome::Cooling | FireOutcome::Reloading => return,
    }

    with_sink(animator.as_deref_mut(), |sink| sink.set_trigger(AnimTrigger::Shoot));

    let Ok(camera) = camera_query.get_single() else {
        warn!("No player camera, shot has no origin");
        return;
    };
    let Ok(context) = rapier_context.get_single() else {
        return;
    };

    let origin = camera.translation();
    let direction = camera.forward().as_vec3();
    let filter = QueryFilter::default()
        .exclude_sensors()
        .exclude_collider(player_entity);

    let Some((hit_entity, hit)) =
        context.cast_ray_and_get_normal(origin, direction, weapon.definition.range, true, filter)
    else {
        return;
    };

    debug!("Shot hit {:?} at {:?}", hit_entity, hit.point);

    if let Some(enemy) = bodies.resolve(hit_entity) {
        damage_events.send(DamageEvent {
            target: enemy,
            source: player_entity,
            amount: weapon.definition.damage,
        });
    }

    if let Ok(mut impulse) = impulses.get_mut(hit_entity) {
        impulse.impulse += -hit.normal * weapon.definition.impact_force;
    }
}

/// Apply damage events to enemy state machines and report kills.
fn apply_damage(
    mut damage_events: EventReader<DamageEvent>,
    mut enemy_query: Query<&mut EnemyAgent>,
    mut death_events: EventWriter<DeathEvent>,
) {
    for event in damage_events.read() {
        let Ok(mut agent) = enemy_query.get_mut(event.target) else {
            continue;
        };

        // Dead enemies report Ignored, so each kill is sent once
        if agent.take_damage(event.amount) == DamageOutcome::Killed {
            death_events.send(DeathEvent {
                entity: event.target,
                killed_by: Some(event.source),
            });
        }
    }
}
