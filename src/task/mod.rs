pub mod executor;
pub mod factory;
pub mod queue;
pub mod steps;
pub mod types;


pub use executor::*;
pub use factory::*;
pub use queue::*;
pub use types::*;
