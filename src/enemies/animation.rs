//! Animation cues and the attack timeline.
//!
//! Gameplay code never plays clips. It writes parameters into an
//! [`AnimationSink`] (speed, flags, attack variant, triggers) and the
//! animation layer reads them. During an attack the timeline calls back
//! into the state machine through [`AttackHitEvent`] and
//! [`AttackCompleteEvent`], standing in for keyframe events authored on the
//! attack clips.

use bevy::prelude::*;
use serde::Deserialize;

/// Boolean animator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimFlag {
    IsAttacking,
    IsDead,
    IsReloading,
}

/// One-shot animator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimTrigger {
    Attack,
    Reload,
    Shoot,
}

/// One-way notification surface for animation parameters.
pub trait AnimationSink {
    fn set_speed(&mut self, speed: f32);
    fn set_flag(&mut self, flag: AnimFlag, value: bool);
    fn set_attack_variant(&mut self, variant: usize);
    fn set_trigger(&mut self, trigger: AnimTrigger);
    fn reset_trigger(&mut self, trigger: AnimTrigger);
}

/// Sink for entities without an animator: every cue is dropped.
pub struct NullSink;

impl AnimationSink for NullSink {
    fn set_speed(&mut self, _speed: f32) {}
    fn set_flag(&mut self, _flag: AnimFlag, _value: bool) {}
    fn set_attack_variant(&mut self, _variant: usize) {}
    fn set_trigger(&mut self, _trigger: AnimTrigger) {}
    fn reset_trigger(&mut self, _trigger: AnimTrigger) {}
}

/// Run `apply` against `animator`, or against a [`NullSink`] when there is none.
pub fn with_sink<T>(animator: Option<&mut Animator>, apply: impl FnOnce(&mut dyn AnimationSink) -> T) -> T {
    match animator {
        Some(animator) => apply(animator),
        None => apply(&mut NullSink),
    }
}

/// Animator parameter block read by the animation layer.
#[derive(Component, Debug, Default, Clone, PartialEq)]
pub struct Animator {
    pub speed: f32,
    pub is_attacking: bool,
    pub is_dead: bool,
    pub is_reloading: bool,
    pub attack_variant: usize,
    triggers: Vec<AnimTrigger>,
}

impl Animator {
    pub fn flag(&self, flag: AnimFlag) -> bool {
        match flag {
            AnimFlag::IsAttacking => self.is_attacking,
            AnimFlag::IsDead => self.is_dead,
            AnimFlag::IsReloading => self.is_reloading,
        }
    }

    pub fn has_trigger(&self, trigger: AnimTrigger) -> bool {
        self.triggers.contains(&trigger)
    }

    /// Consume a pending trigger, returning whether it was set.
    pub fn take_trigger(&mut self, trigger: AnimTrigger) -> bool {
        let before = self.triggers.len();
        self.triggers.retain(|t| *t != trigger);
        self.triggers.len() != before
    }
}

impl AnimationSink for Animator {
    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn set_flag(&mut self, flag: AnimFlag, value: bool) {
        match flag {
            AnimFlag::IsAttacking => self.is_attacking = value,
            AnimFlag::IsDead => self.is_dead = value,
            AnimFlag::IsReloading => self.is_reloading = value,
        }
    }

    fn set_attack_variant(&mut self, variant: usize) {
        self.attack_variant = variant;
    }

    fn set_trigger(&mut self, trigger: AnimTrigger) {
        if !self.triggers.contains(&trigger) {
            self.triggers.push(trigger);
        }
    }

    fn reset_trigger(&mut self, trigger: AnimTrigger) {
        self.triggers.retain(|t| *t != trigger);
    }
}

/// Attack clip timing for an enemy type.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Length of the attack clip in seconds
    pub attack_duration: f32,
    pub attack_hit_frame: f32, // 0.0-1.0, when damage applies
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            attack_duration: 1.0,
            attack_hit_frame: 0.5,
        }
    }
}

/// Keyframe reached while advancing an attack timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimelineKeys {
    pub hit: bool,
    pub complete: bool,
}

/// Plays one attack clip at a time and reports its keyframes.
#[derive(Component, Debug, Clone)]
pub struct AttackTimeline {
    pub duration: f32,
    pub hit_frame: f32,
    elapsed: Option<f32>,
    hit_fired: bool,
}

impl AttackTimeline {
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            duration: config.attack_duration.max(f32::EPSILON),
            hit_frame: config.attack_hit_frame.clamp(0.0, 1.0),
            elapsed: None,
            hit_fired: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.elapsed.is_some()
    }

    pub fn start(&mut self) {
        self.elapsed = Some(0.0);
        self.hit_fired = false;
    }

    pub fn stop(&mut self) {
        self.elapsed = None;
        self.hit_fired = false;
    }

    /// Advance by `dt`; each keyframe is reported once per playback.
    pub fn advance(&mut self, dt: f32) -> TimelineKeys {
        let Some(elapsed) = self.elapsed.as_mut() else {
            return TimelineKeys::default();
        };
        *elapsed += dt;
        let progress = *elapsed / self.duration;

        let mut keys = TimelineKeys::default();
        if !self.hit_fired && progress >= self.hit_frame {
            self.hit_fired = true;
            keys.hit = true;
        }
        if progress >= 1.0 {
            keys.complete = true;
            self.stop();
        }
        keys
    }
}

/// Attack clip reached its hit frame.
#[derive(Event, Debug, Clone, Copy)]
pub struct AttackHitEvent {
    pub attacker: Entity,
}

/// Attack clip finished playing.
#[derive(Event, Debug, Clone, Copy)]
pub struct AttackCompleteEvent {
    pub attacker: Entity,
}

/// Start timelines on fresh attack triggers and emit their keyframes.
///
/// A cancelled attack (attacking flag cleared mid-clip) or a death stops the
/// timeline without firing the remaining keyframes.
pub fn drive_attack_timelines(
    time: Res<Time>,
    mut query: Query<(Entity, &mut Animator, &mut AttackTimeline)>,
    mut hit_events: EventWriter<AttackHitEvent>,
    mut complete_events: EventWriter<AttackCompleteEvent>,
) {
    for (entity, mut animator, mut timeline) in query.iter_mut() {
        if animator.take_trigger(AnimTrigger::Attack) {
            timeline.start();
            // The trigger fires on the frame it was set, so don't advance yet
            continue;
        }

        if !timeline.is_playing() {
            continue;
        }

        if !animator.is_attacking || animator.is_dead {
            timeline.stop();
            continue;
        }

        let keys = timeline.advance(time.delta_secs());
        if keys.hit {
            hit_events.send(AttackHitEvent { attacker: entity });
        }
        if keys.complete {
            complete_events.send(AttackCompleteEvent { attacker: entity });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triggers_are_deduplicated_and_consumed() {
        let mut animator = Animator::default();
        animator.set_trigger(AnimTrigger::Attack);
        animator.set_trigger(AnimTrigger::Attack);
        assert!(animator.has_trigger(AnimTrigger::Attack));

        assert!(animator.take_trigger(AnimTrigger::Attack));
        assert!(!animator.take_trigger(AnimTrigger::Attack));
    }

    #[test]
    fn test_reset_trigger_clears_pending() {
        let mut animator = Animator::default();
        animator.set_trigger(AnimTrigger::Attack);
        animator.set_trigger(AnimTrigger::Reload);
        animator.reset_trigger(AnimTrigger::Attack);
        assert!(!animator.has_trigger(AnimTrigger::Attack));
        assert!(animator.has_trigger(AnimTrigger::Reload));
    }

    #[test]
    fn test_flags_round_through_sink() {
        let mut animator = Animator::default();
        animator.set_flag(AnimFlag::IsDead, true);
        animator.set_flag(AnimFlag::IsReloading, true);
        assert!(animator.flag(AnimFlag::IsDead));
        assert!(animator.flag(AnimFlag::IsReloading));
        assert!(!animator.flag(AnimFlag::IsAttacking));
    }

    #[test]
    fn test_timeline_fires_hit_then_complete_once() {
        let mut timeline = AttackTimeline::new(&AnimationConfig {
            attack_duration: 1.0,
            attack_hit_frame: 0.5,
        });
        timeline.start();

        assert_eq!(timeline.advance(0.25), TimelineKeys::default());
        assert_eq!(timeline.advance(0.5), TimelineKeys { hit: true, complete: false });
        assert_eq!(timeline.advance(0.5), TimelineKeys { hit: false, complete: true });
        assert!(!timeline.is_playing());
        assert_eq!(timeline.advance(1.0), TimelineKeys::default());
    }

    #[test]
    fn test_timeline_long_frame_fires_both_keys() {
        let mut timeline = AttackTimeline::new(&AnimationConfig::default());
        timeline.start();
        assert_eq!(timeline.advance(5.0), TimelineKeys { hit: true, complete: true });
    }

    #[test]
    fn test_stopped_timeline_reports_nothing() {
        let mut timeline = AttackTimeline::new(&AnimationConfig::default());
        timeline.start();
        timeline.stop();
        assert_eq!(timeline.advance(5.0), TimelineKeys::default());
    }
}
