//! Hitscan weapon state: ammo, fire rate and the reload countdown.

use bevy::prelude::*;
use serde::Deserialize;

/// Weapon tuning loaded from `assets/data/weapon.ron`.
#[derive(Resource, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WeaponDefinition {
    pub name: String,
    pub damage: f32,
    /// Maximum ray length in world units
    pub range: f32,
    /// Rounds per second
    pub fire_rate: f32,
    /// Impulse applied to struck dynamic bodies
    pub impact_force: f32,
    pub max_ammo: u32,
    /// Seconds a reload takes
    pub reload_time: f32,
}

impl Default for WeaponDefinition {
    fn default() -> Self {
        Self {
            name: "Service Pistol".to_string(),
            damage: 25.0,
            range: 100.0,
            fire_rate: 10.0,
            impact_force: 30.0,
            max_ammo: 12,
            reload_time: 1.5,
        }
    }
}

/// Result of a trigger pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// A round was spent; cast the shot.
    Fired,
    /// Still inside the fire-rate interval
    Cooling,
    /// Reload in progress
    Reloading,
    /// Magazine was empty; a reload began instead of firing
    ReloadStarted,
}

/// Player-held hitscan weapon.
#[derive(Component, Debug, Clone)]
pub struct RaycastWeapon {
    pub definition: WeaponDefinition,
    current_ammo: u32,
    is_reloading: bool,
    reload_remaining: f32,
    next_fire_time: f32,
}

impl RaycastWeapon {
    pub fn new(definition: WeaponDefinition) -> Self {
        Self {
            current_ammo: definition.max_ammo,
            is_reloading: false,
            reload_remaining: 0.0,
            next_fire_time: 0.0,
            definition,
        }
    }

    pub fn current_ammo(&self) -> u32 {
        self.current_ammo
    }

    pub fn max_ammo(&self) -> u32 {
        self.definition.max_ammo
    }

    pub fn is_reloading(&self) -> bool {
        self.is_reloading
    }

    /// True when the magazine is empty and no reload is running yet.
    pub fn needs_reload(&self) -> bool {
        !self.is_reloading && self.current_ammo == 0
    }

    /// Try to fire at time `now` (seconds).
    pub fn try_fire(&mut self, now: f32) -> FireOutcome {
        if self.is_reloading {
            return FireOutcome::Reloading;
        }
        if self.current_ammo == 0 {
            self.start_reload();
            return FireOutcome::ReloadStarted;
        }
        if now < self.next_fire_time {
            return FireOutcome::Cooling;
        }

        self.current_ammo -= 1;
        self.next_fire_time = now + 1.0 / self.definition.fire_rate.max(f32::EPSILON);
        FireOutcome::Fired
    }

    /// Player-requested reload; refused while reloading or with a full magazine.
    pub fn request_reload(&mut self) -> bool {
        if self.is_reloading || self.current_ammo >= self.definition.max_ammo {
            return false;
        }
        self.start_reload();
        true
    }

    /// Begin the reload countdown. Returns false if one is already running.
    pub fn start_reload(&mut self) -> bool {
        if self.is_reloading {
            return false;
        }
        debug!("Reloading {}", self.definition.name);
        self.is_reloading = true;
        self.reload_remaining = self.definition.reload_time;
        true
    }

    /// Count down an active reload. Returns true on the tick it completes.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.is_reloading {
            return false;
        }

        self.reload_remaining = (self.reload_remaining - dt).max(0.0);
        if self.reload_remaining <= 0.0 {
            self.current_ammo = self.definition.max_ammo;
            self.is_reloading = false;
            return true;
        }
        false
    }

    /// Weapon (re)enabled: clear any reload that was interrupted.
    pub fn on_enable(&mut self) {
        self.is_reloading = false;
        self.reload_remaining = 0.0;
    }

    /// Add rounds from a pickup, capped at the magazine size.
    pub fn add_ammo(&mut self, amount: u32) {
        self.current_ammo = self.current_ammo.saturating_add(amount).min(self.definition.max_ammo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weapon(max_ammo: u32) -> RaycastWeapon {
        RaycastWeapon::new(WeaponDefinition {
            max_ammo,
            fire_rate: 4.0,
            reload_time: 1.5,
            ..WeaponDefinition::default()
        })
    }

    #[test]
    fn test_fire_spends_ammo_and_respects_fire_rate() {
        let mut weapon = weapon(12);
        assert_eq!(weapon.try_fire(0.0), FireOutcome::Fired);
        assert_eq!(weapon.current_ammo(), 11);

        assert_eq!(weapon.try_fire(0.1), FireOutcome::Cooling);
        assert_eq!(weapon.current_ammo(), 11);

        assert_eq!(weapon.try_fire(0.25), FireOutcome::Fired);
        assert_eq!(weapon.current_ammo(), 10);
    }

    #[test]
    fn test_empty_magazine_reloads_instead_of_firing() {
        let mut weapon = weapon(1);
        assert_eq!(weapon.try_fire(0.0), FireOutcome::Fired);
        assert!(weapon.needs_reload());

        assert_eq!(weapon.try_fire(1.0), FireOutcome::ReloadStarted);
        assert_eq!(weapon.current_ammo(), 0);
        assert!(weapon.is_reloading());
        assert_eq!(weapon.try_fire(1.1), FireOutcome::Reloading);
    }

    #[test]
    fn test_reload_refills_after_reload_time() {
        let mut weapon = weapon(3);
        weapon.try_fire(0.0);
        assert!(weapon.request_reload());

        assert!(!weapon.tick(1.0));
        assert!(weapon.is_reloading());
        assert!(weapon.tick(0.6));
        assert!(!weapon.is_reloading());
        assert_eq!(weapon.current_ammo(), 3);
    }

    #[test]
    fn test_manual_reload_refused_when_full_or_reloading() {
        let mut weapon = weapon(3);
        assert!(!weapon.request_reload());

        weapon.try_fire(0.0);
        assert!(weapon.request_reload());
        assert!(!weapon.request_reload());
    }

    #[test]
    fn test_on_enable_clears_stuck_reload() {
        let mut weapon = weapon(2);
        weapon.try_fire(0.0);
        weapon.request_reload();

        weapon.on_enable();
        assert!(!weapon.is_reloading());
        // Interrupted reload does not refill
        assert_eq!(weapon.current_ammo(), 1);
        assert_eq!(weapon.try_fire(10.0), FireOutcome::Fired);
    }

    #[test]
    fn test_ammo_stays_in_bounds() {
        let mut weapon = weapon(5);
        for i in 0..40 {
            weapon.try_fire(i as f32);
            weapon.tick(0.5);
            assert!(weapon.current_ammo() <= weapon.max_ammo());
        }

        weapon.add_ammo(100);
        assert_eq!(weapon.current_ammo(), 5);
    }

    #[test]
    fn test_weapon_definition_from_ron() {
        let definition: WeaponDefinition = ron::from_str("(name: \"Carbine\", max_ammo: 30)").unwrap();
        assert_eq!(definition.name, "Carbine");
        assert_eq!(definition.max_ammo, 30);
        assert_eq!(definition.damage, 25.0);
    }
}
