//! Command line argument parsing
//!
//! Subcommands:
//! - `list`: List the quest plans found in the quest directory
//! - `validate`: Load every plan and compile every step, reporting problems
//! - `plan`: Show the tasks each step of one quest compiles to
//! - `priority encode` / `priority decode`: Convert priority list strings
//! - `show-config`: Show configuration discovery information
//! - `init-config`: Write a default user configuration file

use crate::quest::ElementId;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug)]
pub enum ExecutionMode {
    List(ListConfig),
    Validate(RegistryOptions),
    Plan(PlanConfig),
    EncodePriority(Vec<ElementId>),
    DecodePriority(String),
    ShowConfig,
    InitConfig,
}

/// Where to find the configuration and the quest plans
#[derive(Debug, Clone, Default)]
pub struct RegistryOptions {
    pub config_override: Option<PathBuf>,
    pub quest_dir_override: Option<PathBuf>,
}

#[derive(Debug)]
pub struct ListConfig {
    pub options: RegistryOptions,
    pub include_disabled: bool,
}

#[derive(Debug)]
pub struct PlanConfig {
    pub options: RegistryOptions,
    pub quest_id: ElementId,
    pub sequence: Option<u8>,
    pub json: bool,
}

#[derive(Debug, Parser)]
#[command(name = "questline")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Loads, checks and compiles declarative quest plans")]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List quest plans
    List {
        /// Configuration file path
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
        /// Quest directory (overrides the configured one)
        #[arg(short = 'q', long = "quests")]
        quests: Option<PathBuf>,
        /// Also list disabled plans
        #[arg(short = 'a', long = "all")]
        all: bool,
    },
    /// Load every plan and compile every step
    Validate {
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
        #[arg(short = 'q', long = "quests")]
        quests: Option<PathBuf>,
    },
    /// Show the tasks each step of a quest compiles to
    Plan {
        /// Quest id, e.g. 1234 or L123
        quest_id: String,
        /// Only this sequence
        #[arg(short = 's', long = "sequence")]
        sequence: Option<u8>,
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
        #[arg(short = 'q', long = "quests")]
        quests: Option<PathBuf>,
        /// Print JSON instead of text
        #[arg(long = "json")]
        json: bool,
    },
    /// Encode or decode priority list strings
    Priority {
        #[command(subcommand)]
        action: PriorityCommand,
    },
    /// Show configuration discovery information
    ShowConfig,
    /// Write a default configuration file to the user directory
    InitConfig,
}

#[derive(Debug, Subcommand)]
pub enum PriorityCommand {
    /// Encode quest ids into an importable string
    Encode {
        /// Quest ids in priority order
        #[arg(required = true)]
        quest_ids: Vec<String>,
    },
    /// Decode an exported priority string
    Decode { encoded: String },
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn mode(&self) -> Result<ExecutionMode, String> {
        match &self.command {
            Some(Commands::List {
                config,
                quests,
                all,
            }) => Ok(ExecutionMode::List(ListConfig {
                options: Self::registry_options(config, quests),
                include_disabled: *all,
            })),
            Some(Commands::Validate { config, quests }) => Ok(ExecutionMode::Validate(
                Self::registry_options(config, quests),
            )),
            Some(Commands::Plan {
                quest_id,
                sequence,
                config,
                quests,
                json,
            }) => Ok(ExecutionMode::Plan(PlanConfig {
                options: Self::registry_options(config, quests),
                quest_id: Self::parse_quest_id(quest_id)?,
                sequence: *sequence,
                json: *json,
            })),
            Some(Commands::Priority {
                action: PriorityCommand::Encode { quest_ids },
            }) => quest_ids
                .iter()
                .map(|id| Self::parse_quest_id(id))
                .collect::<Result<Vec<_>, _>>()
                .map(ExecutionMode::EncodePriority),
            Some(Commands::Priority {
                action: PriorityCommand::Decode { encoded },
            }) => Ok(ExecutionMode::DecodePriority(encoded.clone())),
            Some(Commands::ShowConfig) => Ok(ExecutionMode::ShowConfig),
            Some(Commands::InitConfig) => Ok(ExecutionMode::InitConfig),
            None => Err(
                "No command specified. Use 'questline --help' to see available commands."
                    .to_string(),
            ),
        }
    }

    fn registry_options(config: &Option<PathBuf>, quests: &Option<PathBuf>) -> RegistryOptions {
        RegistryOptions {
            config_override: config.clone(),
            quest_dir_override: quests.clone(),
        }
    }

    fn parse_quest_id(raw: &str) -> Result<ElementId, String> {
        raw.parse().map_err(|e| format!("{}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_command() {
        let args = Args::try_parse_from(["questline", "plan", "L12", "-s", "3", "--json"]).unwrap();
        let mode = args.mode().unwrap();

        if let ExecutionMode::Plan(config) = mode {
            assert_eq!(config.quest_id, ElementId::Leve(12));
            assert_eq!(config.sequence, Some(3));
            assert!(config.json);
            assert!(config.options.quest_dir_override.is_none());
        } else {
            panic!("Expected Plan mode");
        }
    }

    #[test]
    fn test_plan_rejects_bad_quest_id() {
        let args = Args::try_parse_from(["questline", "plan", "nope"]).unwrap();
        assert!(args.mode().is_err());
    }

    #[test]
    fn test_list_command() {
        let args =
            Args::try_parse_from(["questline", "list", "--quests", "/srv/quests", "--all"]).unwrap();

        if let ExecutionMode::List(config) = args.mode().unwrap() {
            assert!(config.include_disabled);
            assert_eq!(
                config.options.quest_dir_override,
                Some(PathBuf::from("/srv/quests"))
            );
        } else {
            panic!("Expected List mode");
        }
    }

    #[test]
    fn test_priority_commands() {
        let args = Args::try_parse_from(["questline", "priority", "encode", "1", "A3x2"]).unwrap();
        match args.mode().unwrap() {
            ExecutionMode::EncodePriority(ids) => assert_eq!(
                ids,
                vec![
                    ElementId::Quest(1),
                    ElementId::AlliedSocietyDaily {
                        society: 3,
                        rank: 2
                    }
                ]
            ),
            other => panic!("Expected EncodePriority, got {:?}", other),
        }

        let args = Args::try_parse_from(["questline", "priority", "encode", "1", "bad"]).unwrap();
        assert!(args.mode().is_err());

        assert!(Args::try_parse_from(["questline", "priority", "encode"]).is_err());

        let args =
            Args::try_parse_from(["questline", "priority", "decode", "qst:priority:MTsy"]).unwrap();
        assert!(matches!(args.mode().unwrap(), ExecutionMode::DecodePriority(_)));
    }

    #[test]
    fn test_no_command_error() {
        let args = Args { command: None };
        assert!(args.mode().is_err());
    }
}
