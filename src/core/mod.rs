//! Core game module - states, events, data loading and fundamental systems.
//!
//! This module provides the foundation that all other game systems build upon.

mod data;
mod events;
mod plugin;
mod rng;
mod states;

pub use data::*;
pub use events::*;
pub use plugin::{CorePlugin, SessionScoped, SessionSet};
pub use rng::CombatRng;
pub use states::*;
