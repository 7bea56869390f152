use crate::external::{MovementKind, NavigationRequest};
use crate::quest::{InteractionType, Position, Quest, QuestSequence, QuestStep};
use crate::task::factory::TaskFactory;
use crate::task::types::*;
use std::time::Instant;
use tracing::{debug, info};

pub const DEFAULT_STOP_DISTANCE: f32 = 3.0;
pub const WALK_TO_STOP_DISTANCE: f32 = 0.25;

/// Moves to the step's position, or waits for its target to load when the
/// step has no position
pub struct MoveFactory;

impl TaskFactory for MoveFactory {
    fn name(&self) -> &'static str {
        "MoveFactory"
    }

    fn create_task(
        &self,
        _quest: &Quest,
        _sequence: &QuestSequence,
        step: &QuestStep,
    ) -> Result<Option<Task>, FactoryError> {
        if let Some(position) = step.position {
            let default_distance = if step.interaction_type == InteractionType::WalkTo {
                WALK_TO_STOP_DISTANCE
            } else {
                DEFAULT_STOP_DISTANCE
            };
            return Ok(Some(Task::MoveTo {
                data_id: step.data_id,
                position,
                territory_id: step.territory_id,
                stop_distance: step.stop_distance.unwrap_or(default_distance),
                fly: step.fly,
                sprint: step.sprint.unwrap_or(true),
            }));
        }

        let needs_target = matches!(
            step.interaction_type,
            InteractionType::Interact | InteractionType::AcceptQuest | InteractionType::CompleteQuest
        );
        Ok(match step.data_id {
            Some(data_id) if needs_target => Some(Task::WaitForNearDataId { data_id }),
            _ => None,
        })
    }
}

#[derive(Debug, Default)]
pub struct UnmountStep {
    attempts: u32,
    retry_at: Option<Instant>,
}

impl UnmountStep {
    pub fn start(&mut self, ctx: &TaskContext) -> Result<bool, TaskError> {
        if !ctx.services.game.is_mounted() {
            return Ok(false);
        }
        ctx.services.actions.unmount();
        self.retry_at = Some(ctx.now + ctx.config.timings.retry_interval());
        Ok(true)
    }

    pub fn update(&mut self, ctx: &TaskContext) -> Result<TaskProgress, TaskError> {
        if !ctx.services.game.is_mounted() {
            return Ok(TaskProgress::TaskComplete);
        }
        if self.retry_at.is_some_and(|at| ctx.now < at) {
            return Ok(TaskProgress::StillRunning);
        }

        if self.attempts >= ctx.config.timings.max_interact_attempts {
            return Err(TaskError::failed("Unable to unmount"));
        }
        self.attempts += 1;
        ctx.services.actions.unmount();
        self.retry_at = Some(ctx.now + ctx.config.timings.retry_interval());
        Ok(TaskProgress::StillRunning)
    }
}

#[derive(Debug)]
pub struct MoveToStep {
    request: NavigationRequest,
    attempts: u32,
}

impl MoveToStep {
    pub fn new(
        data_id: Option<u32>,
        position: Position,
        stop_distance: f32,
        fly: bool,
        sprint: bool,
    ) -> Self {
        let kind = if data_id.is_some() {
            MovementKind::DataId
        } else {
            MovementKind::Position
        };
        Self {
            request: NavigationRequest {
                kind,
                data_id,
                position,
                stop_distance,
                fly,
                sprint,
            },
            attempts: 0,
        }
    }

    fn arrived(&self, ctx: &TaskContext) -> bool {
        ctx.services
            .game
            .player_position()
            .is_some_and(|p| p.distance(&self.request.position) <= self.request.stop_distance)
    }

    pub fn start(&mut self, ctx: &TaskContext) -> Result<bool, TaskError> {
        if self.arrived(ctx) {
            debug!("Already within {} of destination", self.request.stop_distance);
            return Ok(false);
        }
        ctx.services.movement.navigate_to(&self.request)?;
        Ok(true)
    }

    pub fn update(&mut self, ctx: &TaskContext) -> Result<TaskProgress, TaskError> {
        if ctx.services.movement.is_pathfinding() {
            return Ok(TaskProgress::StillRunning);
        }
        if self.arrived(ctx) {
            return Ok(TaskProgress::TaskComplete);
        }

        if self.attempts >= ctx.config.timings.max_movement_attempts {
            let p = self.request.position;
            return Err(TaskError::failed(format!(
                "Unable to reach {:.2}, {:.2}, {:.2}",
                p.x, p.y, p.z
            )));
        }
        self.attempts += 1;
        info!("Movement stopped short of destination, retrying");
        ctx.services.movement.navigate_to(&self.request)?;
        Ok(TaskProgress::StillRunning)
    }

    pub fn debug_state(&self) -> Option<String> {
        (self.attempts > 0).then(|| format!("attempts: {}", self.attempts))
    }
}

#[derive(Debug)]
pub struct WaitForNearDataIdStep {
    data_id: u32,
}

impl WaitForNearDataIdStep {
    pub fn new(data_id: u32) -> Self {
        Self { data_id }
    }

    pub fn start(&mut self, _ctx: &TaskContext) -> Result<bool, TaskError> {
        Ok(true)
    }

    pub fn update(&mut self, ctx: &TaskContext) -> Result<TaskProgress, TaskError> {
        match ctx.services.game.object_position(self.data_id) {
            Some(_) => Ok(TaskProgress::TaskComplete),
            None => Err(TaskError::failed(
                "Object not found or too far away, no position so we can't move",
            )),
        }
    }
}
