//! Capabilities the engine depends on but does not implement: movement, the
//! quest-state oracle, game state and actions, static game data and the
//! sibling automation plugins.

pub mod interfaces;
pub mod services;
pub mod sim;
pub mod sync;

#[cfg(test)]
mod tests;

pub use interfaces::*;
pub use services::*;
pub use sync::*;
