//! Collectibles and loot tables.

use bevy::prelude::*;
use rand::Rng;
use serde::Deserialize;

use crate::combat::RaycastWeapon;
use crate::session::{SessionTracker, SessionUpdate};

/// Rounds granted per point of an ammo collectible's value.
pub const AMMO_PER_VALUE: u32 = 5;

/// Height above a corpse at which loot appears.
pub const LOOT_DROP_HEIGHT: f32 = 0.5;

/// What a collectible gives the player.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectibleKind {
    /// Counts towards the score
    Provisions,
    /// Restores lives
    Health,
    /// Refills the weapon magazine
    Ammo,
}

/// A pickup lying in the arena.
#[derive(Component, Deserialize, Debug, Clone, PartialEq)]
pub struct Collectible {
    pub kind: CollectibleKind,
    #[serde(default = "default_value")]
    pub value: u32,
}

fn default_value() -> u32 {
    1
}

impl Collectible {
    pub fn new(kind: CollectibleKind, value: u32) -> Self {
        Self { kind, value }
    }
}

/// Apply a collected item to the session and the player's weapon.
///
/// Returns what the session reported; ammo pickups always report
/// [`SessionUpdate::Applied`] when a weapon is present.
pub fn apply_collectible(
    collectible: &Collectible,
    session: &mut SessionTracker,
    weapon: Option<&mut RaycastWeapon>,
) -> SessionUpdate {
    match collectible.kind {
        CollectibleKind::Provisions => session.apply_score(collectible.value),
        CollectibleKind::Health => session.heal(collectible.value),
        CollectibleKind::Ammo => {
            let Some(weapon) = weapon else {
                warn!("Ammo collected but the player has no weapon");
                return SessionUpdate::Ignored;
            };
            weapon.add_ammo(collectible.value.saturating_mul(AMMO_PER_VALUE));
            debug!("Ammo: {}/{}", weapon.current_ammo(), weapon.max_ammo());
            SessionUpdate::Applied
        }
    }
}

/// One entry of a loot table.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LootDrop {
    pub item: Collectible,
    /// Percent chance in `[0, 100]`
    pub chance: f32,
}

/// Loot table carried by an enemy, rolled once when it dies.
#[derive(Component, Debug, Clone, Default)]
pub struct LootDropper {
    pub drops: Vec<LootDrop>,
}

impl LootDropper {
    pub fn new(drops: Vec<LootDrop>) -> Self {
        Self { drops }
    }

    /// Roll every entry independently and return the items that dropped.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Collectible> {
        self.drops
            .iter()
            .filter(|drop| rng.gen_range(0.0..100.0) <= drop.chance)
            .map(|drop| drop.item.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::WeaponDefinition;
    use crate::session::{SessionConfig, SessionOutcome};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tracker() -> SessionTracker {
        SessionTracker::new(SessionConfig {
            max_lives: 5,
            invulnerability_window: 0.5,
            win_threshold: 300,
        })
    }

    #[test]
    fn test_provisions_add_score() {
        let mut session = tracker();
        let provisions = Collectible::new(CollectibleKind::Provisions, 100);
        assert_eq!(apply_collectible(&provisions, &mut session, None), SessionUpdate::Applied);
        assert_eq!(session.score(), 100);
    }

    #[test]
    fn test_provisions_can_win_the_session() {
        let mut session = tracker();
        let provisions = Collectible::new(CollectibleKind::Provisions, 300);
        apply_collectible(&provisions, &mut session, None);
        assert_eq!(session.outcome(), SessionOutcome::Won);

        // Score collected after winning is dropped
        assert_eq!(apply_collectible(&provisions, &mut session, None), SessionUpdate::Ignored);
        assert_eq!(session.score(), 300);
    }

    #[test]
    fn test_health_heals_up_to_max() {
        let mut session = tracker();
        session.apply_damage_to_player(2, 0.0);
        apply_collectible(&Collectible::new(CollectibleKind::Health, 10), &mut session, None);
        assert_eq!(session.lives(), 5);
    }

    #[test]
    fn test_ammo_refills_weapon_scaled_and_capped() {
        let mut session = tracker();
        let mut weapon = RaycastWeapon::new(WeaponDefinition {
            max_ammo: 12,
            ..WeaponDefinition::default()
        });
        for i in 0..10 {
            weapon.try_fire(i as f32);
        }
        assert_eq!(weapon.current_ammo(), 2);

        let ammo = Collectible::new(CollectibleKind::Ammo, 1);
        apply_collectible(&ammo, &mut session, Some(&mut weapon));
        assert_eq!(weapon.current_ammo(), 7);

        apply_collectible(&ammo, &mut session, Some(&mut weapon));
        assert_eq!(weapon.current_ammo(), 12);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_ammo_without_weapon_is_ignored() {
        let mut session = tracker();
        let ammo = Collectible::new(CollectibleKind::Ammo, 3);
        assert_eq!(apply_collectible(&ammo, &mut session, None), SessionUpdate::Ignored);
    }

    #[test]
    fn test_loot_roll_respects_extreme_chances() {
        let dropper = LootDropper::new(vec![
            LootDrop {
                item: Collectible::new(CollectibleKind::Provisions, 50),
                chance: 100.0,
            },
            LootDrop {
                item: Collectible::new(CollectibleKind::Health, 1),
                chance: -1.0,
            },
        ]);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let items = dropper.roll(&mut rng);
            assert_eq!(items, vec![Collectible::new(CollectibleKind::Provisions, 50)]);
        }
    }

    #[test]
    fn test_loot_roll_is_roughly_proportional() {
        let dropper = LootDropper::new(vec![LootDrop {
            item: Collectible::new(CollectibleKind::Ammo, 1),
            chance: 25.0,
        }]);

        let mut rng = StdRng::seed_from_u64(42);
        let dropped: usize = (0..4000).map(|_| dropper.roll(&mut rng).len()).sum();
        assert!((800..1200).contains(&dropped), "dropped {dropped} of 4000");
    }

    #[test]
    fn test_collectible_from_ron() {
        let item: Collectible = ron::from_str("(kind: Ammo)").unwrap();
        assert_eq!(item, Collectible::new(CollectibleKind::Ammo, 1));
    }
}
