pub mod priority;
pub mod quest_controller;
pub mod stuck;
pub mod types;
pub mod walker;


pub use priority::*;
pub use quest_controller::*;
pub use stuck::*;
pub use types::*;
pub use walker::{StepResolution, resolve_step, skip_reason};
