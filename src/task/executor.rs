use crate::config::TimingConfig;
use crate::external::Catalog;
use crate::task::steps::*;
use crate::task::types::*;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Per-task transient state, one variant per behaviour
#[derive(Debug)]
enum Behaviour {
    Unmount(UnmountStep),
    MoveTo(MoveToStep),
    WaitForNearDataId(WaitForNearDataIdStep),
    Interact(InteractStep),
    Craft(CraftStep),
    Gather(GatherStep),
    Dive(DiveStep),
    EquipRecommended(EquipRecommendedStep),
    ItemEquip(ItemEquipStep),
    Gearset(GearsetStep),
    Duty(DutyStep),
    CombatAi(CombatAiStep),
    WaitForProgress(WaitForProgressStep),
    Wait(WaitStep),
    LifestreamTeleport(LifestreamTeleportStep),
    WaitLifestream(WaitLifestreamStep),
}

impl Behaviour {
    fn for_task(task: &Task) -> Self {
        match task {
            Task::Unmount => Behaviour::Unmount(UnmountStep::default()),
            Task::MoveTo {
                data_id,
                position,
                stop_distance,
                fly,
                sprint,
                ..
            } => Behaviour::MoveTo(MoveToStep::new(
                *data_id,
                *position,
                *stop_distance,
                *fly,
                *sprint,
            )),
            Task::WaitForNearDataId { data_id } => {
                Behaviour::WaitForNearDataId(WaitForNearDataIdStep::new(*data_id))
            }
            Task::Interact { data_id } => {
                Behaviour::Interact(InteractStep::new(*data_id, InteractTarget::Object))
            }
            Task::AcceptQuest { quest_id, data_id } => Behaviour::Interact(InteractStep::new(
                *data_id,
                InteractTarget::Accept(*quest_id),
            )),
            Task::CompleteQuest { quest_id, data_id } => Behaviour::Interact(InteractStep::new(
                *data_id,
                InteractTarget::Complete(*quest_id),
            )),
            Task::Craft {
                quest_id,
                item_id,
                item_count,
                quality,
            } => Behaviour::Craft(CraftStep::new(*quest_id, *item_id, *item_count, *quality)),
            Task::Gather {
                gathering_point_id,
                items,
            } => Behaviour::Gather(GatherStep::new(*gathering_point_id, items.clone())),
            Task::Dive => Behaviour::Dive(DiveStep::default()),
            Task::EquipRecommended => {
                Behaviour::EquipRecommended(EquipRecommendedStep::default())
            }
            Task::EquipItem { item_id } => Behaviour::ItemEquip(ItemEquipStep::equip(*item_id)),
            Task::UnequipItem { item_id } => {
                Behaviour::ItemEquip(ItemEquipStep::unequip(*item_id))
            }
            Task::UpdateGearset { target_class } => {
                Behaviour::Gearset(GearsetStep::update_existing(*target_class))
            }
            Task::CreateGearset { target_class } => {
                Behaviour::Gearset(GearsetStep::create(*target_class))
            }
            Task::Duty {
                content_finder_condition_id,
                enabled,
                ..
            } => Behaviour::Duty(DutyStep::new(*content_finder_condition_id, *enabled)),
            Task::SinglePlayerDuty { .. } => Behaviour::CombatAi(CombatAiStep::for_solo_duty()),
            Task::EnableCombatAi { passive } => {
                Behaviour::CombatAi(CombatAiStep::enable(*passive))
            }
            Task::DisableCombatAi => Behaviour::CombatAi(CombatAiStep::disable()),
            Task::WaitForProgress {
                quest_id, sequence, ..
            } => Behaviour::WaitForProgress(WaitForProgressStep::new(*quest_id, *sequence)),
            Task::Wait { duration } => Behaviour::Wait(WaitStep::new(*duration)),
            Task::LifestreamTeleport { destination } => Behaviour::LifestreamTeleport(
                LifestreamTeleportStep::new(destination.clone()),
            ),
            Task::WaitLifestream => Behaviour::WaitLifestream(WaitLifestreamStep),
        }
    }

    fn start(&mut self, ctx: &TaskContext) -> Result<bool, TaskError> {
        match self {
            Behaviour::Unmount(step) => step.start(ctx),
            Behaviour::MoveTo(step) => step.start(ctx),
            Behaviour::WaitForNearDataId(step) => step.start(ctx),
            Behaviour::Interact(step) => step.start(ctx),
            Behaviour::Craft(step) => step.start(ctx),
            Behaviour::Gather(step) => step.start(ctx),
            Behaviour::Dive(step) => step.start(ctx),
            Behaviour::EquipRecommended(step) => step.start(ctx),
            Behaviour::ItemEquip(step) => step.start(ctx),
            Behaviour::Gearset(step) => step.start(ctx),
            Behaviour::Duty(step) => step.start(ctx),
            Behaviour::CombatAi(step) => step.start(ctx),
            Behaviour::WaitForProgress(step) => step.start(ctx),
            Behaviour::Wait(step) => step.start(ctx),
            Behaviour::LifestreamTeleport(step) => step.start(ctx),
            Behaviour::WaitLifestream(step) => step.start(ctx),
        }
    }

    fn update(&mut self, ctx: &TaskContext) -> Result<TaskProgress, TaskError> {
        match self {
            Behaviour::Unmount(step) => step.update(ctx),
            Behaviour::MoveTo(step) => step.update(ctx),
            Behaviour::WaitForNearDataId(step) => step.update(ctx),
            Behaviour::Interact(step) => step.update(ctx),
            Behaviour::Craft(step) => step.update(ctx),
            Behaviour::Gather(step) => step.update(ctx),
            Behaviour::Dive(step) => step.update(ctx),
            Behaviour::EquipRecommended(step) => step.update(ctx),
            Behaviour::ItemEquip(step) => step.update(ctx),
            Behaviour::Gearset(step) => step.update(ctx),
            Behaviour::Duty(step) => step.update(ctx),
            Behaviour::CombatAi(step) => step.update(ctx),
            Behaviour::WaitForProgress(step) => step.update(ctx),
            Behaviour::Wait(step) => step.update(ctx),
            Behaviour::LifestreamTeleport(step) => step.update(ctx),
            Behaviour::WaitLifestream(step) => step.update(ctx),
        }
    }

    fn debug_state(&self) -> Option<String> {
        match self {
            Behaviour::MoveTo(step) => step.debug_state(),
            Behaviour::Interact(step) => step.debug_state(),
            Behaviour::Craft(step) => step.debug_state(),
            Behaviour::Gather(step) => step.debug_state(),
            Behaviour::Dive(step) => step.debug_state(),
            Behaviour::ItemEquip(step) => step.debug_state(),
            Behaviour::Wait(step) => step.debug_state(),
            _ => None,
        }
    }
}

/// Drives exactly one [`Task`] through `start`, any number of `update`s, and
/// into `Done` or `Failed`. Never reused for another task.
#[derive(Debug)]
pub struct TaskExecutor {
    task: Task,
    state: ExecutorState,
    behaviour: Behaviour,
}

impl TaskExecutor {
    pub fn new(task: Task) -> Self {
        let behaviour = Behaviour::for_task(&task);
        Self {
            task,
            state: ExecutorState::NotStarted,
            behaviour,
        }
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn state(&self) -> &ExecutorState {
        &self.state
    }

    pub fn is_started(&self) -> bool {
        self.state != ExecutorState::NotStarted
    }

    /// Minimum wait between a successful start and the first real update
    pub fn start_delay(&self, timings: &TimingConfig) -> Option<Duration> {
        match self.task {
            Task::Dive
            | Task::UpdateGearset { .. }
            | Task::CreateGearset { .. }
            | Task::WaitLifestream => Some(timings.default_task_delay()),
            _ => None,
        }
    }

    /// Whether combat damage should abort this task
    pub fn should_interrupt_on_damage(&self) -> bool {
        match self.task {
            Task::MoveTo { .. }
            | Task::Interact { .. }
            | Task::AcceptQuest { .. }
            | Task::CompleteQuest { .. }
            | Task::Gather { .. }
            | Task::EquipRecommended
            | Task::EquipItem { .. }
            | Task::UnequipItem { .. }
            | Task::Wait { .. } => true,
            Task::WaitForProgress { interruptible, .. } => interruptible,
            _ => false,
        }
    }

    /// `true` means the task needs ticking, `false` that it is already done
    pub fn start(&mut self, ctx: &TaskContext) -> Result<bool, TaskError> {
        if self.state != ExecutorState::NotStarted {
            return Err(self.lifecycle_error("start"));
        }

        debug!("Starting task {}", self.task);
        match self.behaviour.start(ctx) {
            Ok(true) => {
                self.state = match self.start_delay(&ctx.config.timings) {
                    Some(delay) => ExecutorState::AwaitingDelay {
                        until: ctx.now + delay,
                    },
                    None => ExecutorState::Running,
                };
                Ok(true)
            }
            Ok(false) => {
                info!("Task {} has nothing to do", self.task);
                self.state = ExecutorState::Done;
                Ok(false)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub fn update(&mut self, ctx: &TaskContext) -> Result<TaskProgress, TaskError> {
        match self.state {
            ExecutorState::AwaitingDelay { until } if ctx.now < until => {
                return Ok(TaskProgress::StillRunning);
            }
            ExecutorState::AwaitingDelay { .. } | ExecutorState::Running => {}
            _ => return Err(self.lifecycle_error("update")),
        }

        self.state = ExecutorState::Running;
        match self.behaviour.update(ctx) {
            Ok(TaskProgress::TaskComplete) => {
                info!("Task {} complete", self.task);
                self.state = ExecutorState::Done;
                Ok(TaskProgress::TaskComplete)
            }
            Ok(TaskProgress::StillRunning) => Ok(TaskProgress::StillRunning),
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Offer a game toast to the task; returns true when it reacted
    pub fn on_error_toast(&mut self, message: &str, catalog: &dyn Catalog) -> bool {
        match &mut self.behaviour {
            Behaviour::ItemEquip(step) => step.on_error_toast(message, catalog),
            _ => false,
        }
    }

    pub fn debug_state(&self) -> Option<String> {
        self.behaviour.debug_state()
    }

    fn fail(&mut self, error: TaskError) -> TaskError {
        warn!("Task {} failed: {}", self.task, error);
        self.state = ExecutorState::Failed {
            reason: error.to_string(),
        };
        error
    }

    fn lifecycle_error(&self, operation: &'static str) -> TaskError {
        TaskError::Lifecycle {
            task: self.task.to_string(),
            operation,
            state: format!("{:?}", self.state),
        }
    }
}
