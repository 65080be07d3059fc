//! UI module - heads-up display.

mod hud;
mod plugin;

pub use hud::{AmmoText, SessionText};
pub use plugin::UiPlugin;
