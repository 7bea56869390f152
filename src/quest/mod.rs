pub mod class_job;
pub mod element_id;
pub mod progress;
pub mod registry;
pub mod types;

#[cfg(test)]
mod tests;

pub use class_job::*;
pub use element_id::*;
pub use progress::*;
pub use registry::*;
pub use types::*;
