use crate::quest::{ElementId, InteractionType, Quest, QuestSequence, QuestStep};
use crate::task::factory::TaskFactory;
use crate::task::types::*;
use std::time::Instant;
use tracing::debug;

/// Talk-to-an-object steps: plain interactions, quest accept and turn-in
pub struct InteractFactory;

impl TaskFactory for InteractFactory {
    fn name(&self) -> &'static str {
        "InteractFactory"
    }

    fn create_task(
        &self,
        quest: &Quest,
        _sequence: &QuestSequence,
        step: &QuestStep,
    ) -> Result<Option<Task>, FactoryError> {
        let interaction_type = &step.interaction_type;
        if !matches!(
            interaction_type,
            InteractionType::Interact | InteractionType::AcceptQuest | InteractionType::CompleteQuest
        ) {
            return Ok(None);
        }

        let data_id = step.data_id.ok_or_else(|| FactoryError::MissingField {
            interaction_type: interaction_type.clone(),
            field: "DataId",
        })?;

        Ok(Some(match interaction_type {
            InteractionType::AcceptQuest => Task::AcceptQuest {
                quest_id: quest.id,
                data_id,
            },
            InteractionType::CompleteQuest => Task::CompleteQuest {
                quest_id: quest.id,
                data_id,
            },
            _ => Task::Interact { data_id },
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractTarget {
    Object,
    Accept(ElementId),
    Complete(ElementId),
}

#[derive(Debug)]
pub struct InteractStep {
    data_id: u32,
    target: InteractTarget,
    attempts: u32,
    interacted: bool,
    retry_at: Option<Instant>,
}

impl InteractStep {
    pub fn new(data_id: u32, target: InteractTarget) -> Self {
        Self {
            data_id,
            target,
            attempts: 0,
            interacted: false,
            retry_at: None,
        }
    }

    fn interact(&mut self, ctx: &TaskContext) {
        self.attempts += 1;
        self.interacted = ctx.services.actions.interact(self.data_id);
        self.retry_at = Some(ctx.now + ctx.config.timings.retry_interval());
        debug!(
            "Interaction with {} (attempt {}): {}",
            self.data_id, self.attempts, self.interacted
        );
    }

    fn is_done(&self, ctx: &TaskContext) -> bool {
        let oracle = &ctx.services.oracle;
        match self.target {
            InteractTarget::Object => {
                self.interacted && self.retry_at.is_none_or(|at| ctx.now >= at)
            }
            InteractTarget::Accept(quest_id) => oracle.is_quest_accepted(&quest_id),
            InteractTarget::Complete(quest_id) => oracle.is_quest_complete(&quest_id),
        }
    }

    pub fn start(&mut self, ctx: &TaskContext) -> Result<bool, TaskError> {
        let oracle = &ctx.services.oracle;
        match self.target {
            InteractTarget::Accept(quest_id) if oracle.is_quest_accepted(&quest_id) => {
                return Ok(false);
            }
            InteractTarget::Complete(quest_id) if oracle.is_quest_complete(&quest_id) => {
                return Ok(false);
            }
            _ => {}
        }
        self.interact(ctx);
        Ok(true)
    }

    pub fn update(&mut self, ctx: &TaskContext) -> Result<TaskProgress, TaskError> {
        if ctx.services.game.is_occupied() {
            return Ok(TaskProgress::StillRunning);
        }
        if self.is_done(ctx) {
            return Ok(TaskProgress::TaskComplete);
        }
        if self.retry_at.is_some_and(|at| ctx.now < at) {
            return Ok(TaskProgress::StillRunning);
        }

        if self.attempts >= ctx.config.timings.max_interact_attempts {
            return Err(TaskError::failed(match self.target {
                InteractTarget::Object => format!("Unable to interact with {}", self.data_id),
                InteractTarget::Accept(quest_id) => format!("Unable to accept quest {}", quest_id),
                InteractTarget::Complete(quest_id) => {
                    format!("Unable to complete quest {}", quest_id)
                }
            }));
        }
        self.interact(ctx);
        Ok(TaskProgress::StillRunning)
    }

    pub fn debug_state(&self) -> Option<String> {
        Some(format!("attempts: {}", self.attempts))
    }
}
