use crate::config::QuestlineConfig;
use crate::controller::priority::*;
use crate::controller::stuck::*;
use crate::controller::types::*;
use crate::controller::walker::{self, StepResolution};
use crate::external::{DialogueAutomationSync, HighlightTracker, Services};
use crate::quest::{ClassJob, ElementId, GatheredItem, QuestRegistry};
use crate::task::*;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Reason used when a damage signal aborts the current task
pub const DAMAGE_INTERRUPT_REASON: &str = "Interrupted by damage";

/// Top-level state machine: picks the quest and step to run, compiles the
/// step into tasks and drives the task queue once per host tick.
///
/// Everything here runs on the tick thread. Outside callers reach it through
/// [`IpcServer`](crate::ipc::IpcServer), which drains their requests between
/// ticks.
pub struct QuestController {
    registry: QuestRegistry,
    services: Services,
    config: QuestlineConfig,
    compiler: StepCompiler,
    queue: TaskQueue,
    state: ControllerState,
    progress: Option<QuestProgress>,
    priority: PriorityList,
    stuck_policy: Box<dyn StuckPolicy>,
    waiting_since: Option<Instant>,
    dialogue_sync: DialogueAutomationSync,
    highlight: HighlightTracker,
    run_id: Option<Uuid>,
    event_handlers: Vec<Box<dyn ControllerEventHandler + Send + Sync>>,
}

impl QuestController {
    pub fn new(registry: QuestRegistry, services: Services, config: QuestlineConfig) -> Self {
        let stuck_policy = stuck_policy_from_config(&config.general);
        let highlight = HighlightTracker::new(config.timings.highlight_interval());
        Self {
            registry,
            services,
            config,
            compiler: StepCompiler::default(),
            queue: TaskQueue::new(),
            state: ControllerState::Idle,
            progress: None,
            priority: PriorityList::new(),
            stuck_policy,
            waiting_since: None,
            dialogue_sync: DialogueAutomationSync::new(),
            highlight,
            run_id: None,
            event_handlers: Vec::new(),
        }
    }

    pub fn with_compiler(mut self, compiler: StepCompiler) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn with_stuck_policy(mut self, policy: impl StuckPolicy + 'static) -> Self {
        debug!("Using stuck policy '{}'", policy.name());
        self.stuck_policy = Box::new(policy);
        self
    }

    pub fn add_event_handler(&mut self, handler: Box<dyn ControllerEventHandler + Send + Sync>) {
        self.event_handlers.push(handler);
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn run_id(&self) -> Option<Uuid> {
        self.run_id
    }

    pub fn registry(&self) -> &QuestRegistry {
        &self.registry
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn config(&self) -> &QuestlineConfig {
        &self.config
    }

    pub fn queue(&self) -> &TaskQueue {
        &self.queue
    }

    pub fn current_executor(&self) -> Option<&TaskExecutor> {
        self.queue.current_executor()
    }

    pub fn current_progress(&self) -> Option<&QuestProgress> {
        self.progress.as_ref()
    }

    pub fn current_quest_id(&self) -> Option<ElementId> {
        self.progress.as_ref().map(|progress| progress.quest_id)
    }

    pub fn current_step_data(&self) -> Option<StepData> {
        let progress = self.progress.as_ref()?;
        let quest = self.registry.try_get_quest(&progress.quest_id)?;
        let step = quest.find_step(progress.sequence, progress.step)?;
        Some(StepData {
            quest_id: progress.quest_id,
            sequence: progress.sequence,
            step: progress.step,
            interaction_type: step.interaction_type.clone(),
            position: step.position,
            territory_id: step.territory_id,
        })
    }

    /// Point the controller at `quest_id`, at the sequence the game reports
    pub fn set_next_quest(&mut self, quest_id: ElementId) -> Result<(), ControllerError> {
        let quest = self
            .registry
            .try_get_quest(&quest_id)
            .ok_or(ControllerError::UnknownQuest(quest_id))?;
        if quest.is_disabled() {
            return Err(ControllerError::QuestDisabled(quest_id));
        }

        let sequence = self.services.oracle.quest_sequence(&quest_id);
        info!(
            "Next quest: {} ({}), sequence {}",
            quest_id, quest.name, sequence
        );
        self.queue.abort_all("quest switched");
        self.progress = Some(QuestProgress::new(quest_id, sequence));
        self.waiting_since = None;
        Ok(())
    }

    /// Run the selected quest, then keep going through the priority list
    pub fn start(&mut self, reason: &str, now: Instant) -> Result<(), ControllerError> {
        if self.progress.is_none() {
            let next = self
                .next_automatic_quest()
                .ok_or(ControllerError::NoQuestSelected)?;
            self.set_next_quest(next)?;
        }
        self.begin(RunMode::Automatic, reason, now)
    }

    /// Run the selected quest only
    pub fn start_single_quest(&mut self, reason: &str, now: Instant) -> Result<(), ControllerError> {
        if self.progress.is_none() {
            return Err(ControllerError::NoQuestSelected);
        }
        self.begin(RunMode::SingleQuest, reason, now)
    }

    pub fn start_quest(
        &mut self,
        quest_id: ElementId,
        single: bool,
        reason: &str,
        now: Instant,
    ) -> Result<(), ControllerError> {
        self.set_next_quest(quest_id)?;
        if single {
            self.start_single_quest(reason, now)
        } else {
            self.start(reason, now)
        }
    }

    /// Gather `quantity` of an item at a gathering point, outside any quest
    pub fn start_gathering(
        &mut self,
        gathering_point_id: u32,
        item_id: u32,
        class_job: ClassJob,
        quantity: u32,
        collectability: u16,
    ) -> bool {
        if !class_job.is_gatherer() {
            warn!("Cannot gather item {} as {}", item_id, class_job);
            return false;
        }
        if quantity == 0 {
            warn!("Refusing to gather zero of item {}", item_id);
            return false;
        }

        self.queue.abort_all("gathering requested");
        let reason = format!("Gathering {}x {}", quantity, item_id);
        self.enter_running(RunMode::Gathering, &reason, None);
        self.queue.enqueue([Task::Gather {
            gathering_point_id: Some(gathering_point_id),
            items: vec![GatheredItem {
                item_id,
                item_count: quantity,
                collectability,
                class_job: Some(class_job),
            }],
        }]);
        true
    }

    /// Stop on request; the controller goes back to idle
    pub fn stop(&mut self, reason: &str) {
        if !self.is_running() && self.queue.is_empty() {
            return;
        }
        info!("Stopping: {}", reason);
        self.cleanup(reason);
        self.state = ControllerState::Idle;
        self.emit(ControllerEvent::Stopped {
            reason: reason.to_string(),
            failed: false,
        });
    }

    /// Abort everything and stay stopped with `reason` until the next start
    pub fn stop_all_due_to_condition_failed(&mut self, reason: &str) {
        warn!("Stopping due to failed condition: {}", reason);
        self.cleanup(reason);
        self.state = ControllerState::Stopped {
            reason: reason.to_string(),
        };
        self.emit(ControllerEvent::Stopped {
            reason: reason.to_string(),
            failed: true,
        });
    }

    /// Damage signal from the game; returns true when it stopped the run
    pub fn on_damage_taken(&mut self) -> bool {
        let interrupt = self
            .queue
            .current_executor()
            .is_some_and(TaskExecutor::should_interrupt_on_damage);
        if !interrupt {
            debug!("Damage taken, current task keeps running");
            return false;
        }
        self.stop_all_due_to_condition_failed(DAMAGE_INTERRUPT_REASON);
        true
    }

    /// Forward a game toast to the current task; true when it reacted
    pub fn on_error_toast(&mut self, message: &str) -> bool {
        let catalog = self.services.catalog.clone();
        self.queue
            .current_executor_mut()
            .is_some_and(|executor| executor.on_error_toast(message, catalog.as_ref()))
    }

    /// Drop every loaded plan and read the quest directories again
    pub fn reload_registry(&mut self) {
        self.stop("Reloading quests");
        self.progress = None;
        self.registry.reload();
        info!("Loaded {} quests", self.registry.count());
    }

    /// One host tick
    pub fn tick(&mut self, now: Instant) {
        self.dialogue_sync.tick(
            self.is_running(),
            self.config.general.configure_text_advance,
            &self.services,
        );
        if self.config.advanced.highlight_selected_npc {
            let target = if self.is_running() {
                self.current_step_data()
                    .and_then(|data| self.step_data_id(&data))
            } else {
                None
            };
            self.highlight.tick(now, target, &self.services);
        }

        let ControllerState::Running(mode) = self.state else {
            return;
        };

        if self.queue.is_empty() {
            if let Err(e) = self.advance(mode, now) {
                error!("Unable to continue: {}", e);
                self.stop_all_due_to_condition_failed(&e.to_string());
                return;
            }
            if !self.is_running() {
                return;
            }
        }

        let ctx = TaskContext::new(now, &self.services, &self.config);
        match self.queue.tick(&ctx) {
            Ok(QueueStatus::Drained) => self.on_step_drained(mode),
            Ok(QueueStatus::Busy | QueueStatus::Empty) => {}
            Err(failure) => {
                error!("Task failed: {}", failure);
                self.stop_all_due_to_condition_failed(&failure.error.to_string());
            }
        }
    }

    // Priority list

    pub fn priority_quests(&self) -> &[ElementId] {
        self.priority.as_slice()
    }

    /// Unknown quests are ignored, but still reported as success
    pub fn add_quest_priority(&mut self, quest_id: ElementId) -> bool {
        if !self.registry.is_known_quest(&quest_id) {
            debug!("Ignoring unknown quest {} for the priority list", quest_id);
            return true;
        }
        self.priority.add(quest_id)
    }

    pub fn insert_quest_priority(&mut self, index: usize, quest_id: ElementId) -> bool {
        if !self.registry.is_known_quest(&quest_id) {
            debug!("Ignoring unknown quest {} for the priority list", quest_id);
            return true;
        }
        self.priority.insert(index, quest_id)
    }

    pub fn remove_quest_priority(&mut self, quest_id: &ElementId) -> bool {
        self.priority.remove(quest_id)
    }

    pub fn clear_quest_priority(&mut self) {
        self.priority.clear();
    }

    /// Replace the priority list; returns how many quests were kept
    pub fn import_quest_priority(&mut self, quests: Vec<ElementId>) -> usize {
        let (known, unknown): (Vec<_>, Vec<_>) = quests
            .into_iter()
            .partition(|quest_id| self.registry.is_known_quest(quest_id));
        if !unknown.is_empty() {
            warn!("Skipping {} unknown quest(s) on import", unknown.len());
        }
        self.priority.replace(known);
        self.priority.len()
    }

    pub fn import_encoded_quest_priority(&mut self, encoded: &str) -> Result<usize, PriorityCodecError> {
        let quests = decode_priority(encoded)?;
        Ok(self.import_quest_priority(quests))
    }

    pub fn export_quest_priority(&self) -> String {
        self.priority.encode()
    }

    fn begin(&mut self, mode: RunMode, reason: &str, now: Instant) -> Result<(), ControllerError> {
        self.queue.abort_all(reason);
        let quest_id = self.current_quest_id();
        self.enter_running(mode, reason, quest_id);

        if let Err(e) = self.advance(mode, now) {
            self.stop_all_due_to_condition_failed(&e.to_string());
            return Err(e);
        }
        Ok(())
    }

    fn enter_running(&mut self, mode: RunMode, reason: &str, quest_id: Option<ElementId>) {
        let run_id = Uuid::new_v4();
        info!("Starting run {} ({:?}): {}", run_id, mode, reason);
        self.run_id = Some(run_id);
        self.state = ControllerState::Running(mode);
        self.waiting_since = None;
        self.emit(ControllerEvent::Started {
            run_id,
            quest_id,
            mode,
            reason: reason.to_string(),
        });
    }

    /// Called with an empty queue: re-read the game's view of the quest and
    /// queue the next step, or finish the quest
    fn advance(&mut self, mode: RunMode, now: Instant) -> Result<(), ControllerError> {
        if mode == RunMode::Gathering {
            self.stop("Gathering complete");
            return Ok(());
        }
        let Some(mut progress) = self.progress.clone() else {
            return Err(ControllerError::NoQuestSelected);
        };

        let oracle = self.services.oracle.clone();
        if oracle.is_quest_complete(&progress.quest_id) && !oracle.is_quest_accepted(&progress.quest_id)
        {
            return self.on_quest_completed(progress.quest_id, mode);
        }

        let actual = oracle.quest_sequence(&progress.quest_id);
        if actual != progress.sequence {
            info!(
                "Quest {} is at sequence {}, expected {}",
                progress.quest_id, actual, progress.sequence
            );
            self.emit(ControllerEvent::SequenceChanged {
                quest_id: progress.quest_id,
                from: progress.sequence,
                to: actual,
            });
            progress.sequence = actual;
            progress.step = 0;
            self.waiting_since = None;
        }

        let quest = self
            .registry
            .try_get_quest(&progress.quest_id)
            .ok_or(ControllerError::UnknownQuest(progress.quest_id))?;
        let sequence =
            quest
                .find_sequence(progress.sequence)
                .ok_or(ControllerError::NoSequence {
                    quest_id: progress.quest_id,
                    sequence: progress.sequence,
                })?;

        let mut from = progress.step;
        loop {
            match walker::resolve_step(quest, sequence, from, &self.services) {
                StepResolution::Step(index) => {
                    let tasks = self
                        .compiler
                        .compile(quest, sequence, &sequence.steps[index])
                        .map_err(|source| ControllerError::Compile {
                            quest_id: progress.quest_id,
                            step: index,
                            source,
                        })?;
                    if tasks.is_empty() {
                        debug!("Step {} has nothing to run", index);
                        from = index + 1;
                        continue;
                    }

                    progress.step = index;
                    let names = tasks.iter().map(ToString::to_string).collect();
                    self.queue.enqueue(tasks);
                    self.waiting_since = None;
                    self.progress = Some(progress.clone());
                    self.emit(ControllerEvent::StepQueued {
                        progress,
                        tasks: names,
                    });
                    return Ok(());
                }
                StepResolution::EndOfSequence => {
                    let last_step = sequence.steps.len().checked_sub(1);
                    progress.step = sequence.steps.len();
                    self.progress = Some(progress);
                    self.wait_for_sequence_change(last_step, now);
                    return Ok(());
                }
            }
        }
    }

    fn wait_for_sequence_change(&mut self, last_step: Option<usize>, now: Instant) {
        let waiting_since = *self.waiting_since.get_or_insert(now);
        if !self.stuck_policy.should_refresh(waiting_since, now) {
            return;
        }
        self.waiting_since = None;

        let game = &self.services.game;
        if game.is_in_combat() || game.is_occupied() {
            return;
        }
        if let (Some(last_step), Some(progress)) = (last_step, self.progress.as_mut()) {
            info!(
                "No progress on quest {} sequence {}, repeating step {}",
                progress.quest_id, progress.sequence, last_step
            );
            progress.step = last_step;
        }
    }

    fn on_step_drained(&mut self, mode: RunMode) {
        if mode == RunMode::Gathering {
            self.stop("Gathering complete");
            return;
        }
        let Some(progress) = self.progress.as_mut() else {
            return;
        };
        let completed = progress.clone();
        progress.step += 1;
        self.waiting_since = None;
        self.emit(ControllerEvent::StepCompleted {
            progress: completed,
        });
    }

    fn on_quest_completed(&mut self, quest_id: ElementId, mode: RunMode) -> Result<(), ControllerError> {
        info!("Quest {} is complete", quest_id);
        self.emit(ControllerEvent::QuestCompleted { quest_id });
        self.priority.remove(&quest_id);
        self.progress = None;

        if mode == RunMode::SingleQuest {
            self.stop(&format!("Quest {} complete", quest_id));
            return Ok(());
        }
        match self.next_automatic_quest() {
            Some(next) => self.set_next_quest(next),
            None => {
                self.stop("No more quests to run");
                Ok(())
            }
        }
    }

    /// First runnable quest from the priority list, else the game's current one
    fn next_automatic_quest(&self) -> Option<ElementId> {
        let oracle = &self.services.oracle;
        let runnable = |quest_id: &ElementId| {
            self.registry
                .try_get_quest(quest_id)
                .is_some_and(|quest| !quest.is_disabled())
                && !oracle.is_quest_complete(quest_id)
                && !oracle.is_quest_locked(quest_id)
                && !oracle.is_quest_unobtainable(quest_id)
        };

        self.priority
            .iter()
            .find(|quest_id| runnable(quest_id))
            .copied()
            .or_else(|| {
                oracle
                    .current_quest()
                    .map(|(quest_id, _)| quest_id)
                    .filter(|quest_id| runnable(quest_id))
            })
    }

    fn step_data_id(&self, data: &StepData) -> Option<u32> {
        self.registry
            .try_get_quest(&data.quest_id)?
            .find_step(data.sequence, data.step)?
            .data_id
    }

    fn cleanup(&mut self, reason: &str) {
        self.queue.abort_all(reason);
        self.waiting_since = None;
        self.services.optional(self.services.combat_ai.disable_ai());
        self.dialogue_sync.release(&self.services);
    }

    fn emit(&self, event: ControllerEvent) {
        for handler in &self.event_handlers {
            if let Err(e) = handler.handle_event(&event) {
                error!("Event handler error: {}", e);
            }
        }
    }
}
