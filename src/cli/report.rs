//! What the offline subcommands print: quest listings, validation results and
//! compiled step plans.

use crate::cli::args::RegistryOptions;
use crate::cli::config::ConfigDiscovery;
use crate::config::QuestlineConfig;
use crate::quest::{ElementId, Quest, QuestRegistry, QuestSource};
use crate::task::StepCompiler;
use anyhow::{Context, anyhow};
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

/// Load the configuration and every quest plan the options point at
pub fn load_registry(options: &RegistryOptions) -> anyhow::Result<(QuestlineConfig, QuestRegistry)> {
    let config = ConfigDiscovery::load(options.config_override.as_deref())
        .context("Failed to load configuration")?;
    let quest_dir = options
        .quest_dir_override
        .clone()
        .or_else(|| ConfigDiscovery::quest_directory(&config))
        .ok_or_else(|| anyhow!("No quest directory configured"))?;

    info!("Loading quests from {}", quest_dir.display());
    let mut registry = QuestRegistry::new().with_directory(quest_dir, QuestSource::UserDirectory);
    registry.reload();
    for issue in registry.load_issues() {
        warn!("{}", issue);
    }
    Ok((config, registry))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestSummary {
    pub id: ElementId,
    pub name: String,
    pub sequences: usize,
    pub steps: usize,
    pub disabled: bool,
}

impl fmt::Display for QuestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>6}  {} ({} sequences, {} steps)",
            self.id.to_string(),
            self.name,
            self.sequences,
            self.steps
        )?;
        if self.disabled {
            write!(f, " [disabled]")?;
        }
        Ok(())
    }
}

/// Quests sorted by id
pub fn quest_summaries(registry: &QuestRegistry, include_disabled: bool) -> Vec<QuestSummary> {
    let mut summaries: Vec<QuestSummary> = registry
        .all_quests()
        .filter(|quest| include_disabled || !quest.is_disabled())
        .map(|quest| QuestSummary {
            id: quest.id,
            name: quest.name.clone(),
            sequences: quest.root.quest_sequence.len(),
            steps: quest.all_sequences().map(|s| s.steps.len()).sum(),
            disabled: quest.is_disabled(),
        })
        .collect();
    summaries.sort_by_key(|summary| summary.id);
    summaries
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub quests_checked: usize,
    pub steps_checked: usize,
    pub problems: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Compile every step of every enabled quest and collect what fails
pub fn validate_registry(registry: &QuestRegistry, compiler: &StepCompiler) -> ValidationReport {
    let mut report = ValidationReport {
        problems: registry.load_issues().to_vec(),
        ..Default::default()
    };

    let mut quests: Vec<&Quest> = registry.all_quests().filter(|q| !q.is_disabled()).collect();
    quests.sort_by_key(|quest| quest.id);

    for quest in quests {
        report.quests_checked += 1;
        if quest.root.quest_sequence.is_empty() {
            report
                .problems
                .push(format!("Quest {}: no sequences", quest.id));
        }
        for sequence in quest.all_sequences() {
            for (index, step) in sequence.steps.iter().enumerate() {
                report.steps_checked += 1;
                if let Err(e) = compiler.compile(quest, sequence, step) {
                    report.problems.push(format!(
                        "Quest {} sequence {} step {}: {}",
                        quest.id, sequence.sequence, index, e
                    ));
                }
            }
        }
    }
    report
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepPlan {
    pub step: usize,
    pub interaction_type: String,
    pub tasks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequencePlan {
    pub sequence: u8,
    pub steps: Vec<StepPlan>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestPlan {
    pub quest_id: ElementId,
    pub name: String,
    pub sequences: Vec<SequencePlan>,
}

impl fmt::Display for QuestPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Quest {} ({})", self.quest_id, self.name)?;
        for sequence in &self.sequences {
            writeln!(f, "  Sequence {}", sequence.sequence)?;
            for step in &sequence.steps {
                write!(f, "    {:>2}. {}", step.step, step.interaction_type)?;
                if let Some(comment) = &step.comment {
                    write!(f, " // {}", comment)?;
                }
                writeln!(f)?;
                match &step.error {
                    Some(error) => writeln!(f, "        error: {}", error)?,
                    None if step.tasks.is_empty() => writeln!(f, "        (nothing to do)")?,
                    None => writeln!(f, "        {}", step.tasks.join(" -> "))?,
                }
            }
        }
        Ok(())
    }
}

/// Compile one quest, optionally a single sequence of it
pub fn plan_quest(
    registry: &QuestRegistry,
    compiler: &StepCompiler,
    quest_id: ElementId,
    only_sequence: Option<u8>,
) -> anyhow::Result<QuestPlan> {
    let quest = registry
        .try_get_quest(&quest_id)
        .ok_or_else(|| anyhow!("Unknown quest {}", quest_id))?;

    let sequences: Vec<SequencePlan> = quest
        .all_sequences()
        .filter(|sequence| only_sequence.is_none_or(|wanted| sequence.sequence == wanted))
        .map(|sequence| SequencePlan {
            sequence: sequence.sequence,
            steps: sequence
                .steps
                .iter()
                .enumerate()
                .map(|(index, step)| {
                    let (tasks, error) = match compiler.compile(quest, sequence, step) {
                        Ok(tasks) => (tasks.iter().map(ToString::to_string).collect(), None),
                        Err(e) => (Vec::new(), Some(e.to_string())),
                    };
                    StepPlan {
                        step: index,
                        interaction_type: step.interaction_type.to_string(),
                        tasks,
                        error,
                        comment: step.comment.clone(),
                    }
                })
                .collect(),
        })
        .collect();

    if let Some(wanted) = only_sequence
        && sequences.is_empty()
    {
        return Err(anyhow!("Quest {} has no sequence {}", quest_id, wanted));
    }

    Ok(QuestPlan {
        quest_id,
        name: quest.name.clone(),
        sequences,
    })
}
