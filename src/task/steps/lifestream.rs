use crate::quest::{Quest, QuestSequence, QuestStep};
use crate::task::factory::TaskFactory;
use crate::task::types::*;
use tracing::info;

/// Steps with an aethernet shortcut teleport first and wait for it to land
pub struct AethernetShortcutFactory;

impl TaskFactory for AethernetShortcutFactory {
    fn name(&self) -> &'static str {
        "AethernetShortcutFactory"
    }

    fn create_all_tasks(
        &self,
        _quest: &Quest,
        _sequence: &QuestSequence,
        step: &QuestStep,
    ) -> Result<Vec<Task>, FactoryError> {
        Ok(match &step.aethernet_shortcut {
            Some(destination) => vec![
                Task::LifestreamTeleport {
                    destination: destination.clone(),
                },
                Task::WaitLifestream,
            ],
            None => Vec::new(),
        })
    }
}

#[derive(Debug)]
pub struct LifestreamTeleportStep {
    destination: String,
}

impl LifestreamTeleportStep {
    pub fn new(destination: String) -> Self {
        Self { destination }
    }

    pub fn start(&mut self, ctx: &TaskContext) -> Result<bool, TaskError> {
        if !ctx
            .services
            .lifestream
            .aethernet_teleport(&self.destination)?
        {
            return Err(TaskError::failed(format!(
                "Unable to use aethernet shortcut to {}",
                self.destination
            )));
        }
        info!("Teleporting to {}", self.destination);
        Ok(true)
    }

    pub fn update(&mut self, _ctx: &TaskContext) -> Result<TaskProgress, TaskError> {
        Ok(TaskProgress::TaskComplete)
    }
}

/// Waits, after the default start delay, until the teleport helper is idle
#[derive(Debug, Default)]
pub struct WaitLifestreamStep;

impl WaitLifestreamStep {
    pub fn start(&mut self, _ctx: &TaskContext) -> Result<bool, TaskError> {
        Ok(true)
    }

    pub fn update(&mut self, ctx: &TaskContext) -> Result<TaskProgress, TaskError> {
        if ctx.services.lifestream.is_busy()? {
            Ok(TaskProgress::StillRunning)
        } else {
            Ok(TaskProgress::TaskComplete)
        }
    }
}
