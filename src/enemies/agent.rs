//! Enemy combat state machine.
//!
//! One [`EnemyAgent`] owns an enemy's health, timers and attack cycle:
//!
//! ```text
//! Idle -> Chase -> PreAttack -> Attack -> (PreAttack | Chase)
//!   \________\__________\__________\______> Dead
//! ```
//!
//! The agent is ticked once per frame with the target's position. While in
//! `Attack` it waits for the animation timeline to call [`EnemyAgent::deal_damage`]
//! and [`EnemyAgent::on_attack_complete`]. Damage from the player arrives through
//! [`EnemyAgent::take_damage`] and never interrupts the cycle except by killing.

use bevy::prelude::*;
use rand::Rng;

use super::animation::{AnimFlag, AnimTrigger, AnimationSink};
use super::components::EnemyStats;
use super::navigation::NavAgent;
use crate::session::SessionTracker;

/// Time spent turning toward the target before committing to an attack.
pub const PRE_ATTACK_DURATION: f32 = 0.3;
/// Extra turning time granted when the aim check fails.
pub const PRE_ATTACK_RETRY: f32 = 0.1;
/// Maximum angle between heading and target for an attack to start.
pub const AIM_TOLERANCE_DEGREES: f32 = 15.0;
/// Target beyond `attack_range + margin` during PreAttack resumes the chase.
pub const PRE_ATTACK_ESCAPE_MARGIN: f32 = 0.5;
/// Target beyond `attack_range + margin` during Attack cancels the attack.
pub const ATTACK_CANCEL_MARGIN: f32 = 1.0;
/// Reach allowance when the hit frame lands.
pub const DEAL_DAMAGE_MARGIN: f32 = 0.5;

/// Below this squared horizontal distance the target is treated as co-located.
const MIN_HEADING_LENGTH_SQ: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentState {
    /// Waiting for the target to come within chase range.
    #[default]
    Idle,
    /// Navigating toward the target.
    Chase,
    /// Stopped, turning to face the target.
    PreAttack,
    /// Attack animation playing.
    Attack,
    /// Terminal.
    Dead,
}

/// What a call to [`EnemyAgent::take_damage`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Already dead, nothing changed
    Ignored,
    Wounded,
    /// This hit brought health to zero
    Killed,
}

/// Combat state for one enemy.
#[derive(Component, Debug, Clone)]
pub struct EnemyAgent {
    stats: EnemyStats,
    health: f32,
    state: AgentState,
    attack_cooldown_remaining: f32,
    pre_attack_remaining: f32,
    has_dealt_damage: bool,
    attack_variant: usize,
}

impl EnemyAgent {
    pub fn new(stats: EnemyStats) -> Self {
        Self {
            health: stats.max_health.max(0.0),
            stats,
            state: AgentState::Idle,
            attack_cooldown_remaining: 0.0,
            pre_attack_remaining: 0.0,
            has_dealt_damage: false,
            attack_variant: 0,
        }
    }

    pub fn stats(&self) -> &EnemyStats {
        &self.stats
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn is_dead(&self) -> bool {
        self.state == AgentState::Dead
    }

    pub fn attack_cooldown_remaining(&self) -> f32 {
        self.attack_cooldown_remaining
    }

    pub fn has_dealt_damage(&self) -> bool {
        self.has_dealt_damage
    }

    pub fn attack_variant(&self) -> usize {
        self.attack_variant
    }

    /// Advance the state machine by `dt` seconds.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        transform: &mut Transform,
        target: Vec3,
        nav: &mut NavAgent,
        anim: &mut dyn AnimationSink,
        rng: &mut R,
    ) {
        if self.is_dead() {
            return;
        }

        self.attack_cooldown_remaining = (self.attack_cooldown_remaining - dt).max(0.0);
        self.pre_attack_remaining = (self.pre_attack_remaining - dt).max(0.0);

        let distance = horizontal_distance(transform.translation, target);

        match self.state {
            AgentState::Idle => {
                if distance < self.stats.chase_range {
                    debug!("Target within {:.1}, chasing", distance);
                    self.state = AgentState::Chase;
                }
            }
            AgentState::Chase => self.chase(dt, distance, transform, target, nav, anim),
            AgentState::PreAttack => self.prepare_attack(dt, distance, transform, target, nav, anim, rng),
            AgentState::Attack => self.hold_attack(distance, nav, anim),
            AgentState::Dead => {}
        }

        if !matches!(self.state, AgentState::PreAttack | AgentState::Attack) {
            anim.set_speed(nav.velocity().length());
        }
    }

    fn chase(
        &mut self,
        dt: f32,
        distance: f32,
        transform: &mut Transform,
        target: Vec3,
        nav: &mut NavAgent,
        anim: &mut dyn AnimationSink,
    ) {
        nav.resume();
        nav.set_destination(target);
        rotate_towards(transform, target, self.stats.rotation_speed, dt);

        if distance <= self.stats.attack_range && self.attack_cooldown_remaining <= 0.0 {
            self.enter_pre_attack(nav, anim);
        }
    }

    fn enter_pre_attack(&mut self, nav: &mut NavAgent, anim: &mut dyn AnimationSink) {
        self.state = AgentState::PreAttack;
        self.pre_attack_remaining = PRE_ATTACK_DURATION;
        nav.stop();
        anim.set_speed(0.0);
    }

    #[allow(clippy::too_many_arguments)]
    fn prepare_attack<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        distance: f32,
        transform: &mut Transform,
        target: Vec3,
        nav: &mut NavAgent,
        anim: &mut dyn AnimationSink,
        rng: &mut R,
    ) {
        nav.stop();
        anim.set_speed(0.0);
        rotate_towards(transform, target, self.stats.rotation_speed, dt);

        if distance > self.stats.attack_range + PRE_ATTACK_ESCAPE_MARGIN {
            self.state = AgentState::Chase;
            return;
        }

        if self.pre_attack_remaining <= 0.0 {
            if facing_angle_degrees(transform, target) < AIM_TOLERANCE_DEGREES {
                self.start_attack(anim, rng);
            } else {
                self.pre_attack_remaining = PRE_ATTACK_RETRY;
            }
        }
    }

    fn start_attack<R: Rng + ?Sized>(&mut self, anim: &mut dyn AnimationSink, rng: &mut R) {
        self.state = AgentState::Attack;
        self.attack_cooldown_remaining = self.stats.attack_cooldown;
        self.has_dealt_damage = false;
        self.attack_variant = pick_variant(rng, self.stats.attack_variants);

        debug!("Starting attack variant {}", self.attack_variant);
        anim.set_flag(AnimFlag::IsAttacking, true);
        anim.set_attack_variant(self.attack_variant);
        anim.set_trigger(AnimTrigger::Attack);
    }

    fn hold_attack(&mut self, distance: f32, nav: &mut NavAgent, anim: &mut dyn AnimationSink) {
        nav.stop();
        anim.set_speed(0.0);

        if distance > self.stats.attack_range + ATTACK_CANCEL_MARGIN {
            debug!("Target escaped mid-attack ({:.1}), cancelling", distance);
            anim.set_flag(AnimFlag::IsAttacking, false);
            anim.reset_trigger(AnimTrigger::Attack);
            self.state = AgentState::Chase;
            self.has_dealt_damage = false;
        }
    }

    /// Hit-frame callback: damage the player at most once per attack.
    ///
    /// Returns whether the hit landed. A target that stepped out of reach
    /// before the hit frame takes nothing and the attack stays unspent.
    pub fn deal_damage(
        &mut self,
        position: Vec3,
        target: Vec3,
        session: &mut SessionTracker,
        now: f32,
    ) -> bool {
        if self.is_dead() || self.has_dealt_damage {
            return false;
        }

        let distance = horizontal_distance(position, target);
        if distance > self.stats.attack_range + DEAL_DAMAGE_MARGIN {
            debug!("Target out of reach at hit frame (distance {:.2})", distance);
            return false;
        }

        self.has_dealt_damage = true;
        session.apply_damage_to_player(self.stats.lives_per_hit(), now);
        true
    }

    /// End-of-clip callback: chain into another attack or resume the chase.
    pub fn on_attack_complete(
        &mut self,
        position: Vec3,
        target: Vec3,
        nav: &mut NavAgent,
        anim: &mut dyn AnimationSink,
    ) {
        if self.is_dead() {
            return;
        }

        anim.set_flag(AnimFlag::IsAttacking, false);
        self.has_dealt_damage = false;

        let distance = horizontal_distance(position, target);
        if distance <= self.stats.attack_range && self.attack_cooldown_remaining <= 0.0 {
            self.enter_pre_attack(nav, anim);
        } else {
            self.state = AgentState::Chase;
        }
    }

    /// Apply incoming damage; health is clamped at zero and death is final.
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome::Ignored;
        }

        self.health = (self.health - amount.max(0.0)).max(0.0);
        debug!("Enemy took {} damage. Health: {}/{}", amount, self.health, self.stats.max_health);

        if self.health <= 0.0 {
            self.state = AgentState::Dead;
            DamageOutcome::Killed
        } else {
            DamageOutcome::Wounded
        }
    }

    /// Death entry effects on the agent's collaborators.
    pub fn on_death(&self, nav: &mut NavAgent, anim: &mut dyn AnimationSink) {
        nav.disable();
        anim.set_flag(AnimFlag::IsDead, true);
        anim.set_flag(AnimFlag::IsAttacking, false);
        anim.reset_trigger(AnimTrigger::Attack);
    }
}

/// Pick an attack animation uniformly from `0..variants`.
pub fn pick_variant<R: Rng + ?Sized>(rng: &mut R, variants: usize) -> usize {
    if variants <= 1 {
        0
    } else {
        rng.gen_range(0..variants)
    }
}

/// Distance on the XZ plane.
pub fn horizontal_distance(from: Vec3, to: Vec3) -> f32 {
    Vec2::new(to.x - from.x, to.z - from.z).length()
}

/// Turn `transform` toward `target` around the vertical axis.
///
/// Interpolates by `rotation_speed * dt` (capped at a full snap) and skips
/// the tick when the target is effectively on top of the agent. Returns
/// whether a rotation was applied.
pub fn rotate_towards(transform: &mut Transform, target: Vec3, rotation_speed: f32, dt: f32) -> bool {
    let mut direction = target - transform.translation;
    direction.y = 0.0;
    if direction.length_squared() < MIN_HEADING_LENGTH_SQ {
        return false;
    }

    let target_rotation = Transform::IDENTITY.looking_to(direction, Vec3::Y).rotation;
    let t = (rotation_speed * dt).clamp(0.0, 1.0);
    transform.rotation = transform.rotation.slerp(target_rotation, t);
    true
}

/// Angle in degrees between the agent's forward and the target, ignoring height.
pub fn facing_angle_degrees(transform: &Transform, target: Vec3) -> f32 {
    let mut direction = target - transform.translation;
    direction.y = 0.0;
    if direction.length_squared() < MIN_HEADING_LENGTH_SQ {
        return 0.0;
    }

    let mut forward = transform.forward().as_vec3();
    forward.y = 0.0;
    if forward.length_squared() < f32::EPSILON {
        return 0.0;
    }

    forward.angle_between(direction).to_degrees()
}
