use crate::quest::{InteractionType, Quest, QuestSequence, QuestStep};
use crate::task::factory::TaskFactory;
use crate::task::types::*;
use std::time::Instant;
use tracing::info;

pub struct DiveFactory;

impl TaskFactory for DiveFactory {
    fn name(&self) -> &'static str {
        "DiveFactory"
    }

    fn create_task(
        &self,
        _quest: &Quest,
        _sequence: &QuestSequence,
        step: &QuestStep,
    ) -> Result<Option<Task>, FactoryError> {
        Ok((step.interaction_type == InteractionType::Dive).then_some(Task::Dive))
    }
}

/// Dives from the surface. Runs behind the default start delay; each failed
/// check re-issues the dive and waits the same delay again.
#[derive(Debug, Default)]
pub struct DiveStep {
    attempts: u32,
    retry_at: Option<Instant>,
}

impl DiveStep {
    pub fn start(&mut self, ctx: &TaskContext) -> Result<bool, TaskError> {
        let game = &ctx.services.game;
        if game.is_diving() {
            return Ok(false);
        }
        if game.is_swimming() || game.is_mounted() {
            ctx.services.actions.dive();
            return Ok(true);
        }
        Err(TaskError::failed("You aren't swimming, so we can't dive."))
    }

    pub fn update(&mut self, ctx: &TaskContext) -> Result<TaskProgress, TaskError> {
        if ctx.services.game.is_diving() {
            return Ok(TaskProgress::TaskComplete);
        }
        if self.retry_at.is_some_and(|at| ctx.now < at) {
            return Ok(TaskProgress::StillRunning);
        }

        if self.attempts >= ctx.config.timings.max_dive_attempts {
            return Err(TaskError::failed("Please dive manually."));
        }
        self.attempts += 1;
        info!("Not diving yet, retrying (attempt {})", self.attempts);
        ctx.services.actions.dive();
        self.retry_at = Some(ctx.now + ctx.config.timings.default_task_delay());
        Ok(TaskProgress::StillRunning)
    }

    pub fn debug_state(&self) -> Option<String> {
        Some(format!("attempts: {}", self.attempts))
    }
}
