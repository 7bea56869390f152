use crate::quest::{ClassJob, ElementId, ItemQuality, Position, QuestProgressInfo};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a call into a sibling plugin
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IpcError {
    /// The plugin is not installed or not loaded; treat the feature as absent
    #[error("{plugin} is not available")]
    Unavailable { plugin: &'static str },
    #[error("{plugin} call failed: {message}")]
    CallFailed {
        plugin: &'static str,
        message: String,
    },
}

impl IpcError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, IpcError::Unavailable { .. })
    }
}

/// How the movement service should treat the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    Position,
    DataId,
    Landing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationRequest {
    pub kind: MovementKind,
    pub data_id: Option<u32>,
    pub position: Position,
    pub stop_distance: f32,
    pub fly: bool,
    pub sprint: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatherRequest {
    pub gathering_point_id: Option<u32>,
    pub item_id: u32,
    pub class_job: Option<ClassJob>,
    pub quantity: u32,
    pub collectability: u16,
}

/// Path-finding and movement
pub trait Movement: Send + Sync {
    fn navigate_to(&self, request: &NavigationRequest) -> Result<(), IpcError>;
    fn is_pathfinding(&self) -> bool;
    fn reset_pathfinding(&self);
}

/// What the game reports as quest state
pub trait QuestStateOracle: Send + Sync {
    /// Quest the game considers current, with its sequence
    fn current_quest(&self) -> Option<(ElementId, u8)>;
    fn is_quest_accepted(&self, id: &ElementId) -> bool;
    fn is_quest_complete(&self, id: &ElementId) -> bool;
    fn is_quest_locked(&self, id: &ElementId) -> bool;
    fn is_ready_to_accept(&self, id: &ElementId) -> bool;
    fn is_quest_unobtainable(&self, _id: &ElementId) -> bool {
        false
    }
    fn quest_progress_info(&self, id: &ElementId) -> Option<QuestProgressInfo>;

    /// Sequence the plan should run for `id`: the live one when accepted, else 0
    fn quest_sequence(&self, id: &ElementId) -> u8 {
        if self.is_quest_accepted(id) {
            self.quest_progress_info(id).map(|p| p.sequence).unwrap_or(0)
        } else {
            0
        }
    }
}

/// Read-only character and world state
pub trait GameState: Send + Sync {
    fn is_logged_in(&self) -> bool;
    fn is_in_combat(&self) -> bool;
    fn is_mounted(&self) -> bool;
    fn is_swimming(&self) -> bool;
    fn is_diving(&self) -> bool;
    /// Talking, in a cutscene, crafting or otherwise unable to act
    fn is_occupied(&self) -> bool;
    fn is_crafting(&self) -> bool;
    fn is_crafting_log_open(&self) -> bool;
    fn current_class(&self) -> ClassJob;
    fn territory_id(&self) -> u16;
    fn player_position(&self) -> Option<Position>;
    /// Position of a nearby object with `data_id`, if it is loaded
    fn object_position(&self, data_id: u32) -> Option<Position>;
    fn item_count(&self, item_id: u32, quality: ItemQuality) -> u32;
    fn is_item_equipped(&self, item_id: u32) -> bool;
    fn is_recommended_gear_equipped(&self) -> bool;
    fn is_gearset_system_available(&self) -> bool;
    fn current_gearset(&self) -> Option<u8>;
    fn gearset_for_class(&self, class_job: ClassJob) -> Option<u8>;
}

/// Side-effecting game actions
pub trait GameActions: Send + Sync {
    fn unmount(&self) -> bool;
    fn dive(&self) -> bool;
    fn interact(&self, data_id: u32) -> bool;
    fn equip_item(&self, item_id: u32) -> bool;
    fn unequip_item(&self, item_id: u32) -> bool;
    fn equip_recommended_gear(&self) -> bool;
    fn update_gearset(&self, gearset_id: u8) -> bool;
    fn create_gearset(&self) -> bool;
    fn close_crafting_log(&self);
    fn highlight_object(&self, data_id: Option<u32>);
}

/// Read-only game data tables
pub trait Catalog: Send + Sync {
    fn recipe_for(&self, item_id: u32, crafter: ClassJob) -> Option<u16>;
    fn is_craftable(&self, item_id: u32) -> bool;
    fn is_equipment(&self, item_id: u32) -> bool;
    fn territory_for_cfc(&self, content_finder_condition_id: u32) -> Option<u16>;
    /// Localised text of a game log message, used to recognise toasts
    fn log_message(&self, id: u32) -> Option<String>;
}

/// Crafting automation plugin
pub trait CraftingIpc: Send + Sync {
    fn craft_item(&self, item_id: u32, recipe_id: u16, quantity: u32) -> Result<bool, IpcError>;
    fn is_busy(&self) -> Result<bool, IpcError>;
    fn stop(&self) -> Result<(), IpcError>;
}

/// Dialogue-skipping automation plugin
pub trait DialogueIpc: Send + Sync {
    fn is_in_external_control(&self) -> Result<bool, IpcError>;
    fn enable_external_control(&self, label: &str) -> Result<bool, IpcError>;
    fn disable_external_control(&self, label: &str) -> Result<bool, IpcError>;
}

/// Combat AI toggler
pub trait CombatAiIpc: Send + Sync {
    fn is_supported(&self) -> bool;
    fn enable_ai(&self, passive: bool) -> Result<(), IpcError>;
    fn disable_ai(&self) -> Result<(), IpcError>;
}

/// Automatic instanced-duty runner
pub trait InstanceRunnerIpc: Send + Sync {
    fn has_path(&self, territory_id: u16) -> Result<bool, IpcError>;
    fn run(&self, territory_id: u16, loops: u32, bare_mode: bool) -> Result<(), IpcError>;
    fn is_stopped(&self) -> Result<bool, IpcError>;
    fn stop(&self) -> Result<(), IpcError>;
}

/// Aethernet teleport helper
pub trait LifestreamIpc: Send + Sync {
    fn aethernet_teleport(&self, destination: &str) -> Result<bool, IpcError>;
    fn is_busy(&self) -> Result<bool, IpcError>;
}

/// Third-party gearset manager
pub trait GearsetIpc: Send + Sync {
    fn update_gearset(&self) -> Result<bool, IpcError>;
    fn is_busy(&self) -> Result<bool, IpcError>;
}

/// Gathering automation
pub trait GatheringIpc: Send + Sync {
    fn gather(&self, request: &GatherRequest) -> Result<bool, IpcError>;
    fn is_busy(&self) -> Result<bool, IpcError>;
}
