//! Names and paths shared across the crate.
//!
//! Kept in one place so the config discovery, the registry and the CLI agree
//! on where things live.

use std::path::{Path, PathBuf};

/// Per-user application directory name
pub const QUESTLINE_DIR_NAME: &str = ".questline";

/// Configuration file name inside [`QUESTLINE_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration file name looked up directly in the working directory
pub const LOCAL_CONFIG_FILE_NAME: &str = "questline.toml";

/// System-wide configuration file (Unix-like systems)
pub const SYSTEM_CONFIG_FILE: &str = "/etc/questline/config.toml";

/// Default filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "questline=info";

/// Quest plan files and directories
pub mod quests {
    /// Quest directory inside the application directory
    pub const QUESTS_DIR_NAME: &str = "quests";

    /// Extension of quest plan files
    pub const QUEST_FILE_EXTENSION: &str = "json";
}

/// Outward IPC naming
pub mod ipc {
    /// Prefix of every exported priority list
    pub const PRIORITY_EXPORT_PREFIX: &str = "qst:priority:";

    /// Separator between ids inside an encoded priority list
    pub const PRIORITY_SEPARATOR: char = ';';

    /// Prefix added to the reason of a stop requested over IPC
    pub const STOP_REASON_PREFIX: &str = "IPC";
}

/// Build the application directory path in a home directory
pub fn user_dir_path(home_dir: &Path) -> PathBuf {
    home_dir.join(QUESTLINE_DIR_NAME)
}

/// Build config file path in user's home directory
pub fn user_config_file_path(home_dir: &Path) -> PathBuf {
    user_dir_path(home_dir).join(CONFIG_FILE_NAME)
}

/// Build the user quest directory path
pub fn user_quests_dir_path(home_dir: &Path) -> PathBuf {
    user_dir_path(home_dir).join(quests::QUESTS_DIR_NAME)
}

/// Build local config file path in current directory
pub fn local_config_file_path(current_dir: &Path) -> PathBuf {
    current_dir.join(QUESTLINE_DIR_NAME).join(CONFIG_FILE_NAME)
}
