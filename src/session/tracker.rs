//! Session tracker - player lives, score, invulnerability and the win/lose outcome.
//!
//! The tracker is the only owner of the player's life pool. Enemies call
//! [`SessionTracker::apply_damage_to_player`] when an attack lands, pickups
//! call [`SessionTracker::apply_score`] and [`SessionTracker::heal`]. Once the
//! outcome is decided every mutator becomes a no-op, so late events (a hit
//! racing the winning pickup, say) can never change a finished session.

use bevy::prelude::*;
use serde::Deserialize;

/// Tunables for a session, loaded from `assets/data/session.ron`.
#[derive(Resource, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub max_lives: u32,
    /// Seconds after a hit during which further hits are absorbed
    pub invulnerability_window: f32,
    /// Score that wins the session
    pub win_threshold: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_lives: 5,
            invulnerability_window: 0.5,
            win_threshold: 1500,
        }
    }
}

/// How a session ended, if it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionOutcome {
    #[default]
    InProgress,
    Won,
    Lost,
}

/// Side effect requested by a tracker mutation.
///
/// Cues are queued on the tracker and published as [`super::SessionEvent`]s
/// for the HUD and audio collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCue {
    Scored { amount: u32 },
    Damaged { amount: u32 },
    /// A hit arrived during the invulnerability window
    Absorbed,
    Healed { amount: u32 },
    Won,
    Lost,
}

/// Result of a single mutator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionUpdate {
    /// Session already finished, nothing changed
    Ignored,
    /// Damage fell inside the invulnerability window
    Absorbed,
    Applied,
    /// This call decided the session
    Finished(SessionOutcome),
}

/// Process-wide session state, reset at the start of every play-through.
#[derive(Resource, Debug, Clone)]
pub struct SessionTracker {
    config: SessionConfig,
    lives: u32,
    score: u32,
    /// `None` until the player is first hit
    last_damage_time: Option<f32>,
    outcome: SessionOutcome,
    cues: Vec<SessionCue>,
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl SessionTracker {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            lives: config.max_lives,
            score: 0,
            last_damage_time: None,
            outcome: SessionOutcome::InProgress,
            cues: Vec::new(),
            config,
        }
    }

    /// Start a fresh session with `config`.
    pub fn reset(&mut self, config: SessionConfig) {
        *self = Self::new(config);
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn max_lives(&self) -> u32 {
        self.config.max_lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn outcome(&self) -> SessionOutcome {
        self.outcome
    }

    pub fn is_in_progress(&self) -> bool {
        self.outcome == SessionOutcome::InProgress
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Add to the score; reaching the win threshold ends the session as `Won`.
    ///
    /// Score arriving after the session ended is dropped.
    pub fn apply_score(&mut self, amount: u32) -> SessionUpdate {
        if !self.is_in_progress() {
            return SessionUpdate::Ignored;
        }

        self.score = self.score.saturating_add(amount);
        self.cues.push(SessionCue::Scored { amount });
        info!("+{} points. Total: {}", amount, self.score);

        if self.score >= self.config.win_threshold {
            return self.finish(SessionOutcome::Won);
        }
        SessionUpdate::Applied
    }

    /// Remove lives from the player at time `now` (seconds).
    ///
    /// Hits inside the invulnerability window are absorbed without any
    /// partial effect. Running out of lives ends the session as `Lost`.
    pub fn apply_damage_to_player(&mut self, amount: u32, now: f32) -> SessionUpdate {
        if !self.is_in_progress() {
            return SessionUpdate::Ignored;
        }

        if let Some(last) = self.last_damage_time {
            if now - last < self.config.invulnerability_window {
                debug!("Player invulnerable, hit absorbed");
                self.cues.push(SessionCue::Absorbed);
                return SessionUpdate::Absorbed;
            }
        }

        self.last_damage_time = Some(now);
        self.lives = self.lives.saturating_sub(amount);
        self.cues.push(SessionCue::Damaged { amount });
        info!("-{} live(s). Lives left: {}", amount, self.lives);

        if self.lives == 0 {
            return self.finish(SessionOutcome::Lost);
        }
        SessionUpdate::Applied
    }

    /// Restore lives, capped at the configured maximum.
    pub fn heal(&mut self, amount: u32) -> SessionUpdate {
        if !self.is_in_progress() {
            return SessionUpdate::Ignored;
        }

        self.lives = self.lives.saturating_add(amount).min(self.config.max_lives);
        self.cues.push(SessionCue::Healed { amount });
        info!("+{} live(s). Lives: {}", amount, self.lives);
        SessionUpdate::Applied
    }

    /// Take all cues queued since the last call.
    pub fn drain_cues(&mut self) -> Vec<SessionCue> {
        std::mem::take(&mut self.cues)
    }

    fn finish(&mut self, outcome: SessionOutcome) -> SessionUpdate {
        self.outcome = outcome;
        match outcome {
            SessionOutcome::Won => {
                info!("Victory!");
                self.cues.push(SessionCue::Won);
            }
            SessionOutcome::Lost => {
                info!("Game over");
                self.cues.push(SessionCue::Lost);
            }
            SessionOutcome::InProgress => {}
        }
        SessionUpdate::Finished(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(max_lives: u32, invulnerability_window: f32, win_threshold: u32) -> SessionTracker {
        SessionTracker::new(SessionConfig {
            max_lives,
            invulnerability_window,
            win_threshold,
        })
    }

    #[test]
    fn test_new_session_starts_full() {
        let session = SessionTracker::default();
        assert_eq!(session.lives(), 5);
        assert_eq!(session.score(), 0);
        assert_eq!(session.outcome(), SessionOutcome::InProgress);
    }

    #[test]
    fn test_first_hit_is_never_absorbed() {
        let mut session = tracker(5, 0.5, 1500);
        assert_eq!(session.apply_damage_to_player(1, 0.0), SessionUpdate::Applied);
        assert_eq!(session.lives(), 4);
    }

    #[test]
    fn test_invulnerability_window_absorbs_second_hit() {
        let mut session = tracker(5, 0.5, 1500);
        session.apply_damage_to_player(1, 2.0);
        assert_eq!(session.apply_damage_to_player(1, 2.3), SessionUpdate::Absorbed);
        assert_eq!(session.lives(), 4);

        // Window is measured from the last applied hit, not the absorbed one
        assert_eq!(session.apply_damage_to_player(1, 2.5), SessionUpdate::Applied);
        assert_eq!(session.lives(), 3);
    }

    #[test]
    fn test_last_life_loses_and_stays_lost() {
        let mut session = tracker(1, 0.5, 1500);
        assert_eq!(
            session.apply_damage_to_player(1, 0.0),
            SessionUpdate::Finished(SessionOutcome::Lost)
        );
        assert_eq!(session.lives(), 0);

        assert_eq!(session.apply_damage_to_player(1, 0.1), SessionUpdate::Ignored);
        assert_eq!(session.heal(1), SessionUpdate::Ignored);
        assert_eq!(session.apply_score(5000), SessionUpdate::Ignored);
        assert_eq!(session.lives(), 0);
        assert_eq!(session.outcome(), SessionOutcome::Lost);
    }

    #[test]
    fn test_damage_larger_than_lives_clamps_to_zero() {
        let mut session = tracker(3, 0.5, 1500);
        session.apply_damage_to_player(10, 0.0);
        assert_eq!(session.lives(), 0);
        assert_eq!(session.outcome(), SessionOutcome::Lost);
    }

    #[test]
    fn test_win_threshold_wins_once_and_drops_later_score() {
        let mut session = tracker(5, 0.5, 1500);
        assert_eq!(
            session.apply_score(1500),
            SessionUpdate::Finished(SessionOutcome::Won)
        );
        assert_eq!(session.apply_score(100), SessionUpdate::Ignored);
        assert_eq!(session.score(), 1500);

        let wins = session
            .drain_cues()
            .into_iter()
            .filter(|cue| *cue == SessionCue::Won)
            .count();
        assert_eq!(wins, 1);
    }

    #[test]
    fn test_late_hit_after_win_is_ignored() {
        let mut session = tracker(1, 0.5, 10);
        session.apply_score(10);
        assert_eq!(session.apply_damage_to_player(1, 5.0), SessionUpdate::Ignored);
        assert_eq!(session.lives(), 1);
        assert_eq!(session.outcome(), SessionOutcome::Won);
    }

    #[test]
    fn test_heal_is_capped_at_max_lives() {
        let mut session = tracker(5, 0.5, 1500);
        session.apply_damage_to_player(2, 0.0);
        session.heal(1);
        assert_eq!(session.lives(), 4);
        session.heal(10);
        assert_eq!(session.lives(), 5);
    }

    #[test]
    fn test_score_is_non_decreasing_while_in_progress() {
        let mut session = tracker(5, 0.5, 1500);
        let mut previous = session.score();
        for amount in [0, 10, 250, 0, 75] {
            session.apply_score(amount);
            assert!(session.score() >= previous);
            previous = session.score();
        }
        assert_eq!(session.score(), 335);
    }

    #[test]
    fn test_cues_are_drained_in_order() {
        let mut session = tracker(5, 0.5, 1500);
        session.apply_score(10);
        session.apply_damage_to_player(1, 0.0);
        session.apply_damage_to_player(1, 0.1);
        session.heal(1);

        assert_eq!(
            session.drain_cues(),
            vec![
                SessionCue::Scored { amount: 10 },
                SessionCue::Damaged { amount: 1 },
                SessionCue::Absorbed,
                SessionCue::Healed { amount: 1 },
            ]
        );
        assert!(session.drain_cues().is_empty());
    }

    #[test]
    fn test_reset_starts_a_new_session() {
        let mut session = tracker(1, 0.5, 1500);
        session.apply_damage_to_player(1, 0.0);
        session.reset(SessionConfig::default());
        assert_eq!(session.outcome(), SessionOutcome::InProgress);
        assert_eq!(session.lives(), 5);
        // Fresh session forgets the previous hit time
        assert_eq!(session.apply_damage_to_player(1, 0.1), SessionUpdate::Applied);
    }

    #[test]
    fn test_session_config_from_ron() {
        let config: SessionConfig =
            ron::from_str("(max_lives: 3, win_threshold: 200)").unwrap();
        assert_eq!(config.max_lives, 3);
        assert_eq!(config.win_threshold, 200);
        assert_eq!(config.invulnerability_window, 0.5);
    }
}
