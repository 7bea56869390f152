use crate::external::interfaces::*;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Every collaborator the engine talks to, injected at construction
#[derive(Clone)]
pub struct Services {
    pub movement: Arc<dyn Movement>,
    pub oracle: Arc<dyn QuestStateOracle>,
    pub game: Arc<dyn GameState>,
    pub actions: Arc<dyn GameActions>,
    pub catalog: Arc<dyn Catalog>,
    pub crafting: Arc<dyn CraftingIpc>,
    pub dialogue: Arc<dyn DialogueIpc>,
    pub combat_ai: Arc<dyn CombatAiIpc>,
    pub instance_runner: Arc<dyn InstanceRunnerIpc>,
    pub lifestream: Arc<dyn LifestreamIpc>,
    pub gearset: Arc<dyn GearsetIpc>,
    pub gathering: Arc<dyn GatheringIpc>,
    reported_unavailable: Arc<Mutex<HashSet<&'static str>>>,
}

impl Services {
    /// Bundle one object that implements every capability
    pub fn from_single<T>(backend: Arc<T>) -> Self
    where
        T: Movement
            + QuestStateOracle
            + GameState
            + GameActions
            + Catalog
            + CraftingIpc
            + DialogueIpc
            + CombatAiIpc
            + InstanceRunnerIpc
            + LifestreamIpc
            + GearsetIpc
            + GatheringIpc
            + 'static,
    {
        Self {
            movement: backend.clone(),
            oracle: backend.clone(),
            game: backend.clone(),
            actions: backend.clone(),
            catalog: backend.clone(),
            crafting: backend.clone(),
            dialogue: backend.clone(),
            combat_ai: backend.clone(),
            instance_runner: backend.clone(),
            lifestream: backend.clone(),
            gearset: backend.clone(),
            gathering: backend,
            reported_unavailable: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Turn an optional-plugin result into `None`. Unavailability is logged
    /// once per plugin, call failures every time.
    pub fn optional<T>(&self, result: Result<T, IpcError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(IpcError::Unavailable { plugin }) => {
                self.report_unavailable(plugin);
                None
            }
            Err(e) => {
                warn!("{}, skipping", e);
                None
            }
        }
    }

    /// Log that `plugin` is missing, at most once per plugin
    pub fn report_unavailable(&self, plugin: &'static str) {
        let first_time = match self.reported_unavailable.lock() {
            Ok(mut reported) => reported.insert(plugin),
            Err(_) => true,
        };
        if first_time {
            warn!("{} is not available, skipping features that depend on it", plugin);
        }
    }
}
