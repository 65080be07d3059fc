//! Session module - lives, score, invulnerability and the win/lose outcome.

mod plugin;
mod tracker;

pub use plugin::{SessionEvent, SessionPlugin};
pub use tracker::*;
