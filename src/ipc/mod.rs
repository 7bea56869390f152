//! Calls other tools make into the quest controller.
//!
//! Requests are sent from any thread or task through an [`IpcClient`] and
//! answered on the tick thread by [`IpcServer::drain`], so the controller's
//! state is only ever touched from one place.

pub mod client;
pub mod server;
pub mod types;

#[cfg(test)]
mod tests;

pub use client::*;
pub use server::*;
pub use types::*;
