//! Shared random source for gameplay rolls.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Random source for attack variants, loot rolls and spawn points.
///
/// Kept as a resource so tests and replays can seed it.
#[derive(Resource)]
pub struct CombatRng(pub StdRng);

impl CombatRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for CombatRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}
