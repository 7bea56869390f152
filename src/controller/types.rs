use crate::quest::{ElementId, InteractionType, Position};
use crate::task::FactoryError;
use anyhow::Result;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What a running controller is working through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunMode {
    /// One quest, then go idle
    SingleQuest,
    /// The priority list first, then whatever the game reports as current
    Automatic,
    /// A one-off gathering request from outside
    Gathering,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Running(RunMode),
    /// Stopped by a failed condition; the reason is shown to the user
    Stopped { reason: String },
}

impl ControllerState {
    pub fn is_running(&self) -> bool {
        matches!(self, ControllerState::Running(_))
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerState::Idle => write!(f, "Idle"),
            ControllerState::Running(mode) => write!(f, "Running ({:?})", mode),
            ControllerState::Stopped { reason } => write!(f, "Stopped: {}", reason),
        }
    }
}

/// Where the controller believes the player stands
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestProgress {
    pub quest_id: ElementId,
    pub sequence: u8,
    pub step: usize,
}

impl QuestProgress {
    pub fn new(quest_id: ElementId, sequence: u8) -> Self {
        Self {
            quest_id,
            sequence,
            step: 0,
        }
    }
}

impl fmt::Display for QuestProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "quest {} sequence {} step {}",
            self.quest_id, self.sequence, self.step
        )
    }
}

/// Snapshot of the current step for outside callers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StepData {
    pub quest_id: ElementId,
    pub sequence: u8,
    pub step: usize,
    pub interaction_type: InteractionType,
    pub position: Option<Position>,
    pub territory_id: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("Unknown quest {0}")]
    UnknownQuest(ElementId),
    #[error("Quest {0} is disabled")]
    QuestDisabled(ElementId),
    #[error("No quest selected")]
    NoQuestSelected,
    #[error("Quest {quest_id} has no steps for sequence {sequence}")]
    NoSequence { quest_id: ElementId, sequence: u8 },
    #[error("Unable to compile step {step} of quest {quest_id}: {source}")]
    Compile {
        quest_id: ElementId,
        step: usize,
        #[source]
        source: FactoryError,
    },
}

/// Events emitted as a run progresses
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    Started {
        run_id: Uuid,
        quest_id: Option<ElementId>,
        mode: RunMode,
        reason: String,
    },
    StepQueued {
        progress: QuestProgress,
        tasks: Vec<String>,
    },
    StepCompleted {
        progress: QuestProgress,
    },
    /// The game reported a different sequence than the one being worked on
    SequenceChanged {
        quest_id: ElementId,
        from: u8,
        to: u8,
    },
    QuestCompleted {
        quest_id: ElementId,
    },
    Stopped {
        reason: String,
        failed: bool,
    },
}

/// Handler for controller events
pub trait ControllerEventHandler {
    fn handle_event(&self, event: &ControllerEvent) -> Result<()>;
}

/// Simple event handler that logs events
pub struct LoggingEventHandler;

impl ControllerEventHandler for LoggingEventHandler {
    fn handle_event(&self, event: &ControllerEvent) -> Result<()> {
        match event {
            ControllerEvent::Started {
                run_id,
                quest_id,
                mode,
                reason,
            } => match quest_id {
                Some(quest_id) => info!(
                    "Run {} started ({:?}) on quest {}: {}",
                    run_id, mode, quest_id, reason
                ),
                None => info!("Run {} started ({:?}): {}", run_id, mode, reason),
            },
            ControllerEvent::StepQueued { progress, tasks } => {
                info!("Queued {}: {}", progress, tasks.join(", "));
            }
            ControllerEvent::StepCompleted { progress } => {
                debug!("Completed {}", progress);
            }
            ControllerEvent::SequenceChanged { quest_id, from, to } => {
                info!("Quest {} sequence {} -> {}", quest_id, from, to);
            }
            ControllerEvent::QuestCompleted { quest_id } => {
                info!("Quest {} completed", quest_id);
            }
            ControllerEvent::Stopped { reason, failed } => {
                if *failed {
                    warn!("Stopped: {}", reason);
                } else {
                    info!("Stopped: {}", reason);
                }
            }
        }
        Ok(())
    }
}
