//! Core plugin that sets up game states, events, and session flow.

use bevy::prelude::*;

use super::events::*;
use super::rng::CombatRng;
use super::states::*;

/// Marker for entities that belong to one play-through.
///
/// Everything carrying it is despawned when a new session starts.
#[derive(Component)]
pub struct SessionScoped;

/// Ordering for the systems that rebuild a session on `OnEnter(GameState::Starting)`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionSet {
    /// Previous session entities are removed
    Cleanup,
    /// Arena, player, tracker and weapon are rebuilt
    Build,
    /// Control is handed to `InGame`
    Begin,
}

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, Starting, InGame, etc.)
/// - Global events (DamageEvent, DeathEvent)
/// - Session start / restart flow
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            .init_state::<GameState>()
            .init_resource::<CombatRng>()

            .add_event::<DamageEvent>()
            .add_event::<DeathEvent>()

            // Data files are read during Startup, so leave Loading on the first frame
            .add_systems(OnEnter(GameState::Loading), start_session)

            // Clear the previous run before the other plugins rebuild it
            .configure_sets(
                OnEnter(GameState::Starting),
                (SessionSet::Cleanup, SessionSet::Build, SessionSet::Begin).chain(),
            )
            .add_systems(OnEnter(GameState::Starting), cleanup_session.in_set(SessionSet::Cleanup))
            .add_systems(OnEnter(GameState::Starting), begin_play.in_set(SessionSet::Begin))

            .add_systems(
                Update,
                handle_pause_input.run_if(in_state(GameState::InGame).or(in_state(GameState::Paused))),
            )
            .add_systems(
                Update,
                handle_restart_input.run_if(in_state(GameState::Victory).or(in_state(GameState::GameOver))),
            );
    }
}

fn start_session(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::Starting);
}

/// Despawn everything left over from the previous session.
fn cleanup_session(mut commands: Commands, query: Query<Entity, With<SessionScoped>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

fn begin_play(mut next_state: ResMut<NextState<GameState>>) {
    info!("Session starting");
    next_state.set(GameState::InGame);
}

/// Handle Escape key to pause/unpause the game.
fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        match current_state.get() {
            GameState::InGame => next_state.set(GameState::Paused),
            GameState::Paused => next_state.set(GameState::InGame),
            _ => {}
        }
    }
}

/// Enter restarts the run from the victory / defeat screen.
fn handle_restart_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keyboard.just_pressed(KeyCode::Enter) {
        next_state.set(GameState::Starting);
    }
}
