//! In-game HUD - lives, score, ammo and the end-of-session banner.

use bevy::prelude::*;

use crate::combat::RaycastWeapon;
use crate::core::{GameState, SessionScoped, SessionSet};
use crate::player::Player;
use crate::session::{SessionOutcome, SessionTracker};

/// Marker for the lives / score readout.
#[derive(Component)]
pub struct SessionText;

/// Marker for the ammo readout.
#[derive(Component)]
pub struct AmmoText;

/// Marker for the victory / defeat overlay.
#[derive(Component)]
struct OutcomeBanner;

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::Starting), spawn_hud.in_set(SessionSet::Build))
        .add_systems(
            Update,
            (update_session_text, update_ammo_text).run_if(in_state(GameState::InGame)),
        )
        .add_systems(OnEnter(GameState::Victory), spawn_outcome_banner)
        .add_systems(OnEnter(GameState::GameOver), spawn_outcome_banner)
        .add_systems(OnExit(GameState::Victory), cleanup_outcome_banner)
        .add_systems(OnExit(GameState::GameOver), cleanup_outcome_banner);
}

fn readout(text: &str) -> (Text, TextFont, TextColor) {
    (
        Text::new(text),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::srgb(0.85, 0.85, 0.8)),
    )
}

/// Spawn the HUD UI.
fn spawn_hud(mut commands: Commands) {
    // Readouts in the bottom-left corner
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::End,
                align_items: AlignItems::Start,
                padding: UiRect::all(Val::Px(20.0)),
                ..default()
            },
            SessionScoped,
        ))
        .with_children(|parent| {
            parent.spawn((readout(""), SessionText));
            parent.spawn((readout(""), AmmoText));
        });

    // Crosshair
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            SessionScoped,
        ))
        .with_children(|parent| {
            parent.spawn((
                Node {
                    width: Val::Px(4.0),
                    height: Val::Px(4.0),
                    ..default()
                },
                BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.5)),
            ));
        });
}

fn update_session_text(session: Res<SessionTracker>, mut text_query: Query<&mut Text, With<SessionText>>) {
    if !session.is_changed() {
        return;
    }
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };

    text.0 = format!(
        "Lives {}/{}   Score {}/{}",
        session.lives(),
        session.max_lives(),
        session.score(),
        session.config().win_threshold
    );
}

fn update_ammo_text(
    weapon_query: Query<&RaycastWeapon, (With<Player>, Changed<RaycastWeapon>)>,
    mut text_query: Query<&mut Text, With<AmmoText>>,
) {
    let Ok(weapon) = weapon_query.get_single() else {
        return;
    };
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };

    text.0 = if weapon.is_reloading() {
        format!("{}  reloading...", weapon.definition.name)
    } else {
        format!("{}  {}/{}", weapon.definition.name, weapon.current_ammo(), weapon.max_ammo())
    };
}

fn spawn_outcome_banner(mut commands: Commands, session: Res<SessionTracker>) {
    let (title, color) = match session.outcome() {
        SessionOutcome::Won => ("VICTORY", Color::srgb(0.9, 0.8, 0.3)),
        SessionOutcome::Lost => ("YOU DIED", Color::srgb(0.8, 0.2, 0.2)),
        SessionOutcome::InProgress => return,
    };

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
            OutcomeBanner,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(title),
                TextFont {
                    font_size: 72.0,
                    ..default()
                },
                TextColor(color),
            ));
            parent.spawn(readout(&format!("Score {}  -  press Enter to play again", session.score())));
        });
}

fn cleanup_outcome_banner(mut commands: Commands, query: Query<Entity, With<OutcomeBanner>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
