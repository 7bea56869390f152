//! CLI-specific functionality
//!
//! This module contains argument parsing, configuration discovery and the
//! reports printed by the offline subcommands.

pub mod args;
pub mod config;
pub mod report;

pub use args::{Args, ExecutionMode, ListConfig, PlanConfig, RegistryOptions};
pub use config::ConfigDiscovery;
pub use report::{
    QuestPlan, QuestSummary, ValidationReport, load_registry, plan_quest, quest_summaries,
    validate_registry,
};
