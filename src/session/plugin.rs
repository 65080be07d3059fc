//! Session plugin - owns the tracker resource and publishes its cues.

use bevy::prelude::*;
use std::path::Path;

use super::tracker::{SessionConfig, SessionCue, SessionTracker};
use crate::core::{load_or_default, GameState, SessionSet, DATA_DIR};

/// Published for every tracker cue, with the totals after the change.
///
/// HUD and audio collaborators listen for these; the core never waits on them.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEvent {
    pub cue: SessionCue,
    pub lives: u32,
    pub score: u32,
}

/// Session plugin - tracker lifecycle, outcome transitions.
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<SessionConfig>()
            .init_resource::<SessionTracker>()
            .add_event::<SessionEvent>()
            .add_systems(Startup, load_session_config)
            .add_systems(OnEnter(GameState::Starting), reset_session.in_set(SessionSet::Build))
            // Published in every state so the final hit's cues still go out
            .add_systems(PostUpdate, (publish_session_cues, log_session_events).chain());
    }
}

fn load_session_config(mut config: ResMut<SessionConfig>) {
    *config = load_or_default(&Path::new(DATA_DIR).join("session.ron"));
}

/// Start a fresh session and restart the simulation clock.
fn reset_session(
    config: Res<SessionConfig>,
    mut tracker: ResMut<SessionTracker>,
    mut time: ResMut<Time<Virtual>>,
) {
    tracker.reset(config.clone());
    time.unpause();
    info!(
        "New session: {} lives, {} points to win",
        tracker.lives(),
        config.win_threshold
    );
}

/// Drain tracker cues into events and react to the outcome.
///
/// Winning or losing stops the simulation clock and leaves `InGame`.
fn publish_session_cues(
    mut tracker: ResMut<SessionTracker>,
    mut events: EventWriter<SessionEvent>,
    mut time: ResMut<Time<Virtual>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let cues = tracker.drain_cues();
    if cues.is_empty() {
        return;
    }

    for cue in cues {
        match cue {
            SessionCue::Won => {
                time.pause();
                next_state.set(GameState::Victory);
            }
            SessionCue::Lost => {
                time.pause();
                next_state.set(GameState::GameOver);
            }
            _ => {}
        }

        events.send(SessionEvent {
            cue,
            lives: tracker.lives(),
            score: tracker.score(),
        });
    }
}

/// Stand-in for the HUD: report session changes in the log.
fn log_session_events(mut events: EventReader<SessionEvent>) {
    for event in events.read() {
        match event.cue {
            SessionCue::Won => info!("VICTORY with {} points", event.score),
            SessionCue::Lost => info!("GAME OVER with {} points", event.score),
            cue => debug!("{:?} (lives: {}, score: {})", cue, event.lives, event.score),
        }
    }
}
