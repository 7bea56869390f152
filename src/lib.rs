//! # Questline
//!
//! Drives a game character through declarative quest plans.
//!
//! Quest plans are JSON files describing sequences of steps (move here,
//! interact there, craft N items, equip gear, dive, wait). Each step compiles
//! into a short list of tasks that run one at a time on a single tick-driven
//! queue, coordinating with sibling automation plugins through injected
//! capability traits.
//!
//! ## Architecture Overview
//!
//! - **[`quest`]**: Quest plan data model, element ids and the registry loader
//! - **[`task`]**: Task sum type, per-task executors, step compiler and the task queue
//! - **[`controller`]**: Quest selection, step walking, priority list and run state
//! - **[`external`]**: Capabilities provided by the host and sibling plugins
//! - **[`ipc`]**: Request channel other tools use to drive the controller
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use questline::config::QuestlineConfig;
//! use questline::controller::QuestController;
//! use questline::external::{Services, sim::SimulatedGame};
//! use questline::quest::{ElementId, QuestRegistry, QuestSource};
//! use std::sync::Arc;
//! use std::time::Instant;
//!
//! let mut registry = QuestRegistry::new().with_directory("quests", QuestSource::UserDirectory);
//! registry.reload();
//!
//! let game = Arc::new(SimulatedGame::new());
//! let mut controller =
//!     QuestController::new(registry, Services::from_single(game), QuestlineConfig::default());
//! controller.start_quest(ElementId::Quest(1), true, "manual", Instant::now())?;
//! loop {
//!     controller.tick(Instant::now());
//!     if !controller.is_running() {
//!         break;
//!     }
//! }
//! # Ok::<(), questline::controller::ControllerError>(())
//! ```

/// Quest plan model and loading.
pub mod quest;

/// Tasks, their executors and the queue that runs them.
pub mod task;

/// Top-level quest state machine.
pub mod controller;

/// Injected game and plugin capabilities.
pub mod external;

/// Outward request channel.
pub mod ipc;

/// TOML configuration.
pub mod config;

/// Environment constants and path utilities.
///
/// Centralizes all hardcoded paths and directory names used throughout
/// the application for easier maintenance and consistency.
pub mod env;

// CLI module for command-line interface
pub mod cli;

pub use config::QuestlineConfig;
pub use controller::{ControllerError, ControllerEvent, ControllerState, QuestController};
pub use external::Services;
pub use ipc::{IpcClient, IpcServer, ipc_channel};
pub use quest::{ElementId, Quest, QuestRegistry};
pub use task::{StepCompiler, Task, TaskError, TaskQueue};
