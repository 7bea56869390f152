use crate::quest::{ElementId, InteractionType, Quest, QuestSequence, QuestStep};
use crate::task::factory::TaskFactory;
use crate::task::types::*;
use std::time::{Duration, Instant};

/// Steps the player (or the game) completes on their own
pub struct WaitFactory;

impl TaskFactory for WaitFactory {
    fn name(&self) -> &'static str {
        "WaitFactory"
    }

    fn create_task(
        &self,
        quest: &Quest,
        sequence: &QuestSequence,
        step: &QuestStep,
    ) -> Result<Option<Task>, FactoryError> {
        Ok(match step.interaction_type {
            InteractionType::WaitForManualProgress | InteractionType::Instruction => {
                Some(Task::WaitForProgress {
                    quest_id: quest.id,
                    sequence: sequence.sequence,
                    interruptible: quest.root.interruptible,
                })
            }
            InteractionType::Wait => {
                let seconds = step.delay_seconds.ok_or(FactoryError::MissingField {
                    interaction_type: InteractionType::Wait,
                    field: "DelaySeconds",
                })?;
                Some(Task::Wait {
                    duration: Duration::from_secs(u64::from(seconds)),
                })
            }
            _ => None,
        })
    }
}

/// Completes once the quest is no longer on `sequence`
#[derive(Debug)]
pub struct WaitForProgressStep {
    quest_id: ElementId,
    sequence: u8,
}

impl WaitForProgressStep {
    pub fn new(quest_id: ElementId, sequence: u8) -> Self {
        Self { quest_id, sequence }
    }

    pub fn start(&mut self, _ctx: &TaskContext) -> Result<bool, TaskError> {
        Ok(true)
    }

    pub fn update(&mut self, ctx: &TaskContext) -> Result<TaskProgress, TaskError> {
        let oracle = &ctx.services.oracle;
        if oracle.is_quest_complete(&self.quest_id)
            || oracle.quest_sequence(&self.quest_id) != self.sequence
        {
            Ok(TaskProgress::TaskComplete)
        } else {
            Ok(TaskProgress::StillRunning)
        }
    }
}

#[derive(Debug)]
pub struct WaitStep {
    duration: Duration,
    until: Option<Instant>,
}

impl WaitStep {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            until: None,
        }
    }

    pub fn start(&mut self, ctx: &TaskContext) -> Result<bool, TaskError> {
        if self.duration.is_zero() {
            return Ok(false);
        }
        self.until = Some(ctx.now + self.duration);
        Ok(true)
    }

    pub fn update(&mut self, ctx: &TaskContext) -> Result<TaskProgress, TaskError> {
        match self.until {
            Some(until) if ctx.now < until => Ok(TaskProgress::StillRunning),
            _ => Ok(TaskProgress::TaskComplete),
        }
    }

    pub fn debug_state(&self) -> Option<String> {
        Some(format!("{:?}", self.duration))
    }
}
