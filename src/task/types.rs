use crate::config::QuestlineConfig;
use crate::external::{IpcError, Services};
use crate::quest::{ClassJob, ElementId, GatheredItem, InteractionType, ItemQuality, Position};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;

/// One compiled unit of work.
///
/// Tasks are plain values produced fresh by the step compiler; all transient
/// execution state lives in the [`TaskExecutor`](crate::task::TaskExecutor)
/// bound to the task.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Task {
    Unmount,
    MoveTo {
        data_id: Option<u32>,
        position: Position,
        territory_id: u16,
        stop_distance: f32,
        fly: bool,
        sprint: bool,
    },
    WaitForNearDataId {
        data_id: u32,
    },
    Interact {
        data_id: u32,
    },
    AcceptQuest {
        quest_id: ElementId,
        data_id: u32,
    },
    CompleteQuest {
        quest_id: ElementId,
        data_id: u32,
    },
    Craft {
        quest_id: ElementId,
        item_id: u32,
        item_count: u32,
        quality: ItemQuality,
    },
    Gather {
        gathering_point_id: Option<u32>,
        items: Vec<GatheredItem>,
    },
    Dive,
    EquipRecommended,
    EquipItem {
        item_id: u32,
    },
    UnequipItem {
        item_id: u32,
    },
    UpdateGearset {
        target_class: Option<ClassJob>,
    },
    CreateGearset {
        target_class: Option<ClassJob>,
    },
    Duty {
        quest_id: ElementId,
        content_finder_condition_id: u32,
        enabled: bool,
    },
    SinglePlayerDuty {
        quest_id: ElementId,
        sequence: u8,
    },
    EnableCombatAi {
        passive: bool,
    },
    DisableCombatAi,
    WaitForProgress {
        quest_id: ElementId,
        sequence: u8,
        interruptible: bool,
    },
    Wait {
        duration: Duration,
    },
    LifestreamTeleport {
        destination: String,
    },
    WaitLifestream,
}

impl Task {
    /// Short variant name, used in logs and diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Task::Unmount => "Unmount",
            Task::MoveTo { .. } => "MoveTo",
            Task::WaitForNearDataId { .. } => "WaitForNearDataId",
            Task::Interact { .. } => "Interact",
            Task::AcceptQuest { .. } => "AcceptQuest",
            Task::CompleteQuest { .. } => "CompleteQuest",
            Task::Craft { .. } => "Craft",
            Task::Gather { .. } => "Gather",
            Task::Dive => "Dive",
            Task::EquipRecommended => "EquipRecommended",
            Task::EquipItem { .. } => "EquipItem",
            Task::UnequipItem { .. } => "UnequipItem",
            Task::UpdateGearset { .. } => "UpdateGearset",
            Task::CreateGearset { .. } => "CreateGearset",
            Task::Duty { .. } => "Duty",
            Task::SinglePlayerDuty { .. } => "SinglePlayerDuty",
            Task::EnableCombatAi { .. } => "EnableCombatAi",
            Task::DisableCombatAi => "DisableCombatAi",
            Task::WaitForProgress { .. } => "WaitForProgress",
            Task::Wait { .. } => "Wait",
            Task::LifestreamTeleport { .. } => "LifestreamTeleport",
            Task::WaitLifestream => "WaitLifestream",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Unmount => write!(f, "Unmount"),
            Task::MoveTo {
                data_id, position, ..
            } => match data_id {
                Some(data_id) => write!(
                    f,
                    "MoveTo({}: {:.2}, {:.2}, {:.2})",
                    data_id, position.x, position.y, position.z
                ),
                None => write!(
                    f,
                    "MoveTo({:.2}, {:.2}, {:.2})",
                    position.x, position.y, position.z
                ),
            },
            Task::WaitForNearDataId { data_id } => write!(f, "WaitObj({})", data_id),
            Task::Interact { data_id } => write!(f, "Interact({})", data_id),
            Task::AcceptQuest { quest_id, .. } => write!(f, "AcceptQuest({})", quest_id),
            Task::CompleteQuest { quest_id, .. } => write!(f, "CompleteQuest({})", quest_id),
            Task::Craft {
                item_id,
                item_count,
                quality,
                ..
            } => match quality {
                ItemQuality::Any => write!(f, "Craft {}x {}", item_count, item_id),
                quality => write!(f, "Craft {}x {} ({:?})", item_count, item_id, quality),
            },
            Task::Gather { items, .. } => {
                let items: Vec<String> = items
                    .iter()
                    .map(|i| format!("{}x {}", i.item_count, i.item_id))
                    .collect();
                write!(f, "Gather({})", items.join(", "))
            }
            Task::Dive => write!(f, "Dive"),
            Task::EquipRecommended => write!(f, "EquipRecommended"),
            Task::EquipItem { item_id } => write!(f, "Equip({})", item_id),
            Task::UnequipItem { item_id } => write!(f, "Unequip({})", item_id),
            Task::UpdateGearset { target_class } => match target_class {
                Some(class_job) => write!(f, "UpdateGearset({})", class_job),
                None => write!(f, "UpdateGearset(current)"),
            },
            Task::CreateGearset { target_class } => match target_class {
                Some(class_job) => write!(f, "CreateGearset({})", class_job),
                None => write!(f, "CreateGearset(current)"),
            },
            Task::Duty {
                content_finder_condition_id,
                ..
            } => write!(f, "Duty({})", content_finder_condition_id),
            Task::SinglePlayerDuty { quest_id, sequence } => {
                write!(f, "SinglePlayerDuty({}, {})", quest_id, sequence)
            }
            Task::EnableCombatAi { passive } => write!(f, "CombatAi(on, passive: {})", passive),
            Task::DisableCombatAi => write!(f, "CombatAi(off)"),
            Task::WaitForProgress {
                quest_id, sequence, ..
            } => write!(f, "WaitProgress({}, {})", quest_id, sequence),
            Task::Wait { duration } => write!(f, "Wait({:?})", duration),
            Task::LifestreamTeleport { destination } => write!(f, "Aethernet({})", destination),
            Task::WaitLifestream => write!(f, "WaitLifestream"),
        }
    }
}

/// Result of one successful `update` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskProgress {
    StillRunning,
    TaskComplete,
}

/// Lifecycle of an executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutorState {
    NotStarted,
    /// Started; updates report still-running until `until` has passed
    AwaitingDelay { until: Instant },
    Running,
    Done,
    Failed { reason: String },
}

impl ExecutorState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutorState::Done | ExecutorState::Failed { .. })
    }
}

/// Failure raised by an executor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("{0}")]
    Failed(String),
    #[error(transparent)]
    Ipc(#[from] IpcError),
    #[error("Cannot {operation} task '{task}' in state {state}")]
    Lifecycle {
        task: String,
        operation: &'static str,
        state: String,
    },
}

impl TaskError {
    pub fn failed(reason: impl Into<String>) -> Self {
        TaskError::Failed(reason.into())
    }
}

/// Errors raised while compiling a step into tasks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactoryError {
    #[error("No task factory handles interaction type '{interaction_type}'")]
    UnsupportedInteraction { interaction_type: InteractionType },
    #[error("Step with interaction type '{interaction_type}' is missing {field}")]
    MissingField {
        interaction_type: InteractionType,
        field: &'static str,
    },
}

/// Everything an executor may look at while it runs
pub struct TaskContext<'a> {
    pub now: Instant,
    pub services: &'a Services,
    pub config: &'a QuestlineConfig,
}

impl<'a> TaskContext<'a> {
    pub fn new(now: Instant, services: &'a Services, config: &'a QuestlineConfig) -> Self {
        Self {
            now,
            services,
            config,
        }
    }
}
