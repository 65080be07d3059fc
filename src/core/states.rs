//! Game state definitions that control the overall flow of the game.
//!
//! States determine which systems run at any given time. Enemy AI, weapon
//! handling and pickups only run while `InGame`; the session tracker decides
//! when a run ends in `Victory` or `GameOver`.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// - Start in `Loading` while data files are read
/// - `Starting` rebuilds the arena and resets the session, then hands over to `InGame`
/// - `Paused` freezes gameplay but keeps the world visible
/// - `Victory` / `GameOver` are entered once the session reaches an outcome
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading data files
    #[default]
    Loading,
    /// Fresh session is being set up
    Starting,
    /// Active gameplay
    InGame,
    /// Game is paused (overlay on gameplay)
    Paused,
    /// Score threshold reached
    Victory,
    /// Player ran out of lives
    GameOver,
}
