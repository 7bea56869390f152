//! Per-task behaviour and the factories that produce each task.

pub mod craft;
pub mod dive;
pub mod duty;
pub mod gather;
pub mod gear;
pub mod interact;
pub mod lifestream;
pub mod movement;
pub mod wait;

pub use craft::*;
pub use dive::*;
pub use duty::*;
pub use gather::*;
pub use gear::*;
pub use interact::*;
pub use lifestream::*;
pub use movement::*;
pub use wait::*;
