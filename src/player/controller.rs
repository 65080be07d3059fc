//! First-person controller: player spawning, mouse look and walking.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};
use bevy_rapier3d::prelude::*;
use std::path::Path;

use super::components::*;
use crate::combat::{RaycastWeapon, WeaponDefinition};
use crate::core::{load_or_default, GameState, SessionScoped, SessionSet, DATA_DIR};
use crate::enemies::Animator;

/// Set up controller systems.
pub fn setup_controller_systems(app: &mut App) {
    app
        .init_resource::<PlayerConfig>()
        .add_systems(Startup, load_player_config)
        .add_systems(OnEnter(GameState::Starting), spawn_session_player.in_set(SessionSet::Build))
        .add_systems(OnEnter(GameState::InGame), grab_cursor)
        .add_systems(OnExit(GameState::InGame), release_cursor)
        .add_systems(
            Update,
            (mouse_look, player_movement).run_if(in_state(GameState::InGame)),
        );
}

fn load_player_config(mut config: ResMut<PlayerConfig>) {
    *config = load_or_default(&Path::new(DATA_DIR).join("player.ron"));
}

fn spawn_session_player(mut commands: Commands, config: Res<PlayerConfig>, weapon: Res<WeaponDefinition>) {
    spawn_player(&mut commands, config.spawn_point(), weapon.clone());
}

/// Grab and hide cursor when entering gameplay.
fn grab_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    }
}

/// Release cursor when leaving gameplay.
fn release_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
}

/// Yaw the player body and pitch the camera from mouse motion.
pub fn mouse_look(
    mut mouse_motion: EventReader<MouseMotion>,
    config: Res<PlayerConfig>,
    mut player_query: Query<&mut Transform, With<Player>>,
    mut camera_query: Query<(&mut Transform, &mut PlayerCamera), Without<Player>>,
) {
    let delta: Vec2 = mouse_motion.read().map(|event| event.delta).sum();
    if delta == Vec2::ZERO {
        return;
    }

    let Ok(mut player_transform) = player_query.get_single_mut() else {
        return;
    };
    let Ok((mut camera_transform, mut camera)) = camera_query.get_single_mut() else {
        return;
    };

    let sensitivity = config.mouse_sensitivity * 0.001;
    player_transform.rotate_y(-delta.x * sensitivity);

    camera.pitch = apply_pitch(camera.pitch, delta.y, sensitivity, config.invert_y);
    camera_transform.rotation = Quat::from_rotation_x(camera.pitch);
}

/// WASD walking through Rapier's character controller.
pub fn player_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    mut player_query: Query<(&Transform, &mut KinematicCharacterController), With<Player>>,
) {
    let Ok((transform, mut controller)) = player_query.get_single_mut() else {
        return;
    };

    let direction = walk_direction(
        keyboard.pressed(KeyCode::KeyW),
        keyboard.pressed(KeyCode::KeyS),
        keyboard.pressed(KeyCode::KeyA),
        keyboard.pressed(KeyCode::KeyD),
        transform.rotation,
    );

    let dt = time.delta_secs();
    let mut movement = direction * config.move_speed * dt;
    movement.y = -config.fall_speed * dt;
    controller.translation = Some(movement);
}

/// Spawn the player body with its weapon and a child camera.
pub fn spawn_player(commands: &mut Commands, position: Vec3, weapon: WeaponDefinition) -> Entity {
    info!("Spawning player at {:?} with {}", position, weapon.name);

    let player = commands
        .spawn((
            Player,
            RaycastWeapon::new(weapon),
            Animator::default(),
            Transform::from_translation(position),
            Visibility::default(),
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.5, 0.3),
            KinematicCharacterController {
                offset: CharacterLength::Absolute(0.01),
                max_slope_climb_angle: 45_f32.to_radians(),
                min_slope_slide_angle: 30_f32.to_radians(),
                snap_to_ground: Some(CharacterLength::Absolute(0.5)),
                ..default()
            },
            SessionScoped,
        ))
        .id();

    commands.entity(player).with_children(|parent| {
        parent.spawn((
            Camera3d::default(),
            PlayerCamera::default(),
            // Eye level relative to the capsule centre
            Transform::from_xyz(0.0, 0.4, 0.0),
        ));
    });

    player
}
