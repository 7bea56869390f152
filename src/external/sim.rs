//! In-memory game used by tests and by the `plan` dry run.
//!
//! Every capability trait is implemented over one [`SimState`]. Actions
//! apply their effect immediately where the effect is obvious (unmounting,
//! closing the crafting log) and are otherwise only recorded, leaving the
//! caller to move the world forward by editing the state.

use crate::external::interfaces::*;
use crate::quest::{ClassJob, ElementId, ItemQuality, Position, QuestProgressInfo};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Default)]
pub struct SimQuest {
    pub accepted: bool,
    pub complete: bool,
    pub locked: bool,
    pub ready_to_accept: bool,
    pub sequence: u8,
    pub class_job: Option<ClassJob>,
}

#[derive(Debug, Clone)]
pub struct SimPlugins {
    pub crafting: bool,
    pub dialogue: bool,
    pub combat_ai: bool,
    pub instance_runner: bool,
    pub lifestream: bool,
    pub gearset: bool,
    pub gathering: bool,
}

impl Default for SimPlugins {
    fn default() -> Self {
        Self {
            crafting: true,
            dialogue: true,
            combat_ai: true,
            instance_runner: true,
            lifestream: true,
            gearset: true,
            gathering: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimState {
    pub logged_in: bool,
    pub in_combat: bool,
    pub mounted: bool,
    pub swimming: bool,
    pub diving: bool,
    pub occupied: bool,
    pub crafting: bool,
    pub crafting_log_open: bool,
    pub class_job: ClassJob,
    pub territory_id: u16,
    pub player_position: Option<Position>,
    pub objects: HashMap<u32, Position>,
    /// Owned items as (normal quality, high quality)
    pub inventory: HashMap<u32, (u32, u32)>,
    pub equipped: HashSet<u32>,
    pub recommended_gear_equipped: bool,
    pub gearset_system_available: bool,
    pub current_gearset: Option<u8>,
    pub gearsets: HashMap<ClassJob, u8>,
    pub max_gearsets: usize,

    pub quests: HashMap<ElementId, SimQuest>,
    pub current_quest: Option<ElementId>,

    pub recipes: HashMap<(u32, ClassJob), u16>,
    pub equipment: HashSet<u32>,
    pub cfc_territories: HashMap<u32, u16>,
    pub log_messages: HashMap<u32, String>,

    pub plugins: SimPlugins,
    pub pathfinding: bool,
    /// Arrive at the destination as soon as navigation is requested
    pub instant_movement: bool,
    pub dive_succeeds: bool,
    pub equip_succeeds: bool,
    pub crafting_busy: bool,
    pub dialogue_controller: Option<String>,
    pub combat_ai: Option<bool>,
    pub instance_runner_paths: HashSet<u16>,
    pub instance_running: bool,
    pub lifestream_busy: bool,
    pub gearset_plugin_busy: bool,
    pub gathering_busy: bool,
    pub highlighted: Option<u32>,

    /// Every side effect, in the order it was requested
    pub action_log: Vec<String>,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            logged_in: true,
            in_combat: false,
            mounted: false,
            swimming: false,
            diving: false,
            occupied: false,
            crafting: false,
            crafting_log_open: false,
            class_job: ClassJob::Gladiator,
            territory_id: 132,
            player_position: Some(Position::default()),
            objects: HashMap::new(),
            inventory: HashMap::new(),
            equipped: HashSet::new(),
            recommended_gear_equipped: true,
            gearset_system_available: true,
            current_gearset: Some(0),
            gearsets: HashMap::from([(ClassJob::Gladiator, 0)]),
            max_gearsets: 100,
            quests: HashMap::new(),
            current_quest: None,
            recipes: HashMap::new(),
            equipment: HashSet::new(),
            cfc_territories: HashMap::new(),
            log_messages: HashMap::new(),
            plugins: SimPlugins::default(),
            pathfinding: false,
            instant_movement: true,
            dive_succeeds: true,
            equip_succeeds: true,
            crafting_busy: false,
            dialogue_controller: None,
            combat_ai: None,
            instance_runner_paths: HashSet::new(),
            instance_running: false,
            lifestream_busy: false,
            gearset_plugin_busy: false,
            gathering_busy: false,
            highlighted: None,
            action_log: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SimulatedGame {
    state: Mutex<SimState>,
}

impl SimulatedGame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: SimState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_quest(&self, id: ElementId, quest: SimQuest) {
        self.state().quests.insert(id, quest);
    }

    /// Accept `id` at `sequence`, or move an accepted quest to `sequence`
    pub fn set_quest_sequence(&self, id: ElementId, sequence: u8) {
        let mut state = self.state();
        let quest = state.quests.entry(id).or_default();
        quest.accepted = true;
        quest.sequence = sequence;
    }

    pub fn complete_quest(&self, id: ElementId) {
        let mut state = self.state();
        let quest = state.quests.entry(id).or_default();
        quest.accepted = false;
        quest.complete = true;
    }

    pub fn add_items(&self, item_id: u32, normal: u32, high: u32) {
        let mut state = self.state();
        let entry = state.inventory.entry(item_id).or_default();
        entry.0 += normal;
        entry.1 += high;
    }

    pub fn action_log(&self) -> Vec<String> {
        self.state().action_log.clone()
    }

    fn record(&self, action: String) {
        self.state().action_log.push(action);
    }

    fn plugin(&self, name: &'static str, available: impl Fn(&SimPlugins) -> bool) -> Result<(), IpcError> {
        if available(&self.state().plugins) {
            Ok(())
        } else {
            Err(IpcError::Unavailable { plugin: name })
        }
    }
}

impl Movement for SimulatedGame {
    fn navigate_to(&self, request: &NavigationRequest) -> Result<(), IpcError> {
        self.record(format!(
            "navigate:{},{},{}",
            request.position.x, request.position.y, request.position.z
        ));
        let mut state = self.state();
        if state.instant_movement {
            state.player_position = Some(request.position);
        } else {
            state.pathfinding = true;
        }
        Ok(())
    }

    fn is_pathfinding(&self) -> bool {
        self.state().pathfinding
    }

    fn reset_pathfinding(&self) {
        self.state().pathfinding = false;
    }
}

impl QuestStateOracle for SimulatedGame {
    fn current_quest(&self) -> Option<(ElementId, u8)> {
        let state = self.state();
        let id = state.current_quest?;
        let sequence = state.quests.get(&id).map(|q| q.sequence).unwrap_or(0);
        Some((id, sequence))
    }

    fn is_quest_accepted(&self, id: &ElementId) -> bool {
        self.state().quests.get(id).is_some_and(|q| q.accepted)
    }

    fn is_quest_complete(&self, id: &ElementId) -> bool {
        self.state().quests.get(id).is_some_and(|q| q.complete)
    }

    fn is_quest_locked(&self, id: &ElementId) -> bool {
        self.state().quests.get(id).is_some_and(|q| q.locked)
    }

    fn is_ready_to_accept(&self, id: &ElementId) -> bool {
        self.state()
            .quests
            .get(id)
            .is_some_and(|q| q.ready_to_accept && !q.accepted && !q.complete)
    }

    fn quest_progress_info(&self, id: &ElementId) -> Option<QuestProgressInfo> {
        let state = self.state();
        let quest = state.quests.get(id).filter(|q| q.accepted)?;
        let mut info = QuestProgressInfo::new(*id, quest.sequence);
        info.class_job = quest.class_job;
        Some(info)
    }
}

impl GameState for SimulatedGame {
    fn is_logged_in(&self) -> bool {
        self.state().logged_in
    }

    fn is_in_combat(&self) -> bool {
        self.state().in_combat
    }

    fn is_mounted(&self) -> bool {
        self.state().mounted
    }

    fn is_swimming(&self) -> bool {
        self.state().swimming
    }

    fn is_diving(&self) -> bool {
        self.state().diving
    }

    fn is_occupied(&self) -> bool {
        self.state().occupied
    }

    fn is_crafting(&self) -> bool {
        self.state().crafting
    }

    fn is_crafting_log_open(&self) -> bool {
        self.state().crafting_log_open
    }

    fn current_class(&self) -> ClassJob {
        self.state().class_job
    }

    fn territory_id(&self) -> u16 {
        self.state().territory_id
    }

    fn player_position(&self) -> Option<Position> {
        self.state().player_position
    }

    fn object_position(&self, data_id: u32) -> Option<Position> {
        self.state().objects.get(&data_id).copied()
    }

    fn item_count(&self, item_id: u32, quality: ItemQuality) -> u32 {
        let (normal, high) = self
            .state()
            .inventory
            .get(&item_id)
            .copied()
            .unwrap_or_default();
        match quality {
            ItemQuality::Any => normal + high,
            ItemQuality::NQ => normal,
            ItemQuality::HQ => high,
        }
    }

    fn is_item_equipped(&self, item_id: u32) -> bool {
        self.state().equipped.contains(&item_id)
    }

    fn is_recommended_gear_equipped(&self) -> bool {
        self.state().recommended_gear_equipped
    }

    fn is_gearset_system_available(&self) -> bool {
        self.state().gearset_system_available
    }

    fn current_gearset(&self) -> Option<u8> {
        self.state().current_gearset
    }

    fn gearset_for_class(&self, class_job: ClassJob) -> Option<u8> {
        self.state().gearsets.get(&class_job).copied()
    }
}

impl GameActions for SimulatedGame {
    fn unmount(&self) -> bool {
        self.record("unmount".to_string());
        let mut state = self.state();
        let was_mounted = state.mounted;
        state.mounted = false;
        was_mounted
    }

    fn dive(&self) -> bool {
        self.record("dive".to_string());
        let mut state = self.state();
        if state.dive_succeeds {
            state.diving = true;
            state.mounted = false;
        }
        true
    }

    fn interact(&self, data_id: u32) -> bool {
        self.record(format!("interact:{}", data_id));
        true
    }

    fn equip_item(&self, item_id: u32) -> bool {
        self.record(format!("equip:{}", item_id));
        let mut state = self.state();
        if state.equip_succeeds {
            state.equipped.insert(item_id);
        }
        true
    }

    fn unequip_item(&self, item_id: u32) -> bool {
        self.record(format!("unequip:{}", item_id));
        let mut state = self.state();
        if state.equip_succeeds {
            state.equipped.remove(&item_id);
        }
        true
    }

    fn equip_recommended_gear(&self) -> bool {
        self.record("equip-recommended".to_string());
        let mut state = self.state();
        if state.equip_succeeds {
            state.recommended_gear_equipped = true;
        }
        true
    }

    fn update_gearset(&self, gearset_id: u8) -> bool {
        self.record(format!("update-gearset:{}", gearset_id));
        true
    }

    fn create_gearset(&self) -> bool {
        self.record("create-gearset".to_string());
        let mut state = self.state();
        if state.gearsets.len() >= state.max_gearsets {
            return false;
        }
        let next_id = state.gearsets.values().max().map(|id| id + 1).unwrap_or(0);
        let class_job = state.class_job;
        state.gearsets.insert(class_job, next_id);
        state.current_gearset = Some(next_id);
        true
    }

    fn close_crafting_log(&self) {
        self.record("close-crafting-log".to_string());
        self.state().crafting_log_open = false;
    }

    fn highlight_object(&self, data_id: Option<u32>) {
        self.state().highlighted = data_id;
    }
}

impl Catalog for SimulatedGame {
    fn recipe_for(&self, item_id: u32, crafter: ClassJob) -> Option<u16> {
        self.state().recipes.get(&(item_id, crafter)).copied()
    }

    fn is_craftable(&self, item_id: u32) -> bool {
        self.state().recipes.keys().any(|(id, _)| *id == item_id)
    }

    fn is_equipment(&self, item_id: u32) -> bool {
        self.state().equipment.contains(&item_id)
    }

    fn territory_for_cfc(&self, content_finder_condition_id: u32) -> Option<u16> {
        self.state()
            .cfc_territories
            .get(&content_finder_condition_id)
            .copied()
    }

    fn log_message(&self, id: u32) -> Option<String> {
        self.state().log_messages.get(&id).cloned()
    }
}

impl CraftingIpc for SimulatedGame {
    fn craft_item(&self, item_id: u32, recipe_id: u16, quantity: u32) -> Result<bool, IpcError> {
        self.plugin("Artisan", |p| p.crafting)?;
        self.record(format!("craft:{}:{}x{}", item_id, recipe_id, quantity));
        let mut state = self.state();
        state.crafting_busy = true;
        state.crafting_log_open = true;
        Ok(true)
    }

    fn is_busy(&self) -> Result<bool, IpcError> {
        self.plugin("Artisan", |p| p.crafting)?;
        Ok(self.state().crafting_busy)
    }

    fn stop(&self) -> Result<(), IpcError> {
        self.plugin("Artisan", |p| p.crafting)?;
        self.state().crafting_busy = false;
        Ok(())
    }
}

impl DialogueIpc for SimulatedGame {
    fn is_in_external_control(&self) -> Result<bool, IpcError> {
        self.plugin("TextAdvance", |p| p.dialogue)?;
        Ok(self.state().dialogue_controller.is_some())
    }

    fn enable_external_control(&self, label: &str) -> Result<bool, IpcError> {
        self.plugin("TextAdvance", |p| p.dialogue)?;
        let mut state = self.state();
        if state.dialogue_controller.is_some() {
            return Ok(false);
        }
        state.dialogue_controller = Some(label.to_string());
        Ok(true)
    }

    fn disable_external_control(&self, label: &str) -> Result<bool, IpcError> {
        self.plugin("TextAdvance", |p| p.dialogue)?;
        let mut state = self.state();
        if state.dialogue_controller.as_deref() != Some(label) {
            return Ok(false);
        }
        state.dialogue_controller = None;
        Ok(true)
    }
}

impl CombatAiIpc for SimulatedGame {
    fn is_supported(&self) -> bool {
        self.state().plugins.combat_ai
    }

    fn enable_ai(&self, passive: bool) -> Result<(), IpcError> {
        self.plugin("BossMod", |p| p.combat_ai)?;
        self.record(format!("combat-ai:on:{}", passive));
        self.state().combat_ai = Some(passive);
        Ok(())
    }

    fn disable_ai(&self) -> Result<(), IpcError> {
        self.plugin("BossMod", |p| p.combat_ai)?;
        let mut state = self.state();
        if state.combat_ai.take().is_some() {
            state.action_log.push("combat-ai:off".to_string());
        }
        Ok(())
    }
}

impl InstanceRunnerIpc for SimulatedGame {
    fn has_path(&self, territory_id: u16) -> Result<bool, IpcError> {
        self.plugin("AutoDuty", |p| p.instance_runner)?;
        Ok(self.state().instance_runner_paths.contains(&territory_id))
    }

    fn run(&self, territory_id: u16, loops: u32, bare_mode: bool) -> Result<(), IpcError> {
        self.plugin("AutoDuty", |p| p.instance_runner)?;
        self.record(format!("auto-duty:{}:{}:{}", territory_id, loops, bare_mode));
        self.state().instance_running = true;
        Ok(())
    }

    fn is_stopped(&self) -> Result<bool, IpcError> {
        self.plugin("AutoDuty", |p| p.instance_runner)?;
        Ok(!self.state().instance_running)
    }

    fn stop(&self) -> Result<(), IpcError> {
        self.plugin("AutoDuty", |p| p.instance_runner)?;
        self.state().instance_running = false;
        Ok(())
    }
}

impl LifestreamIpc for SimulatedGame {
    fn aethernet_teleport(&self, destination: &str) -> Result<bool, IpcError> {
        self.plugin("Lifestream", |p| p.lifestream)?;
        self.record(format!("aethernet:{}", destination));
        self.state().lifestream_busy = true;
        Ok(true)
    }

    fn is_busy(&self) -> Result<bool, IpcError> {
        self.plugin("Lifestream", |p| p.lifestream)?;
        Ok(self.state().lifestream_busy)
    }
}

impl GearsetIpc for SimulatedGame {
    fn update_gearset(&self) -> Result<bool, IpcError> {
        self.plugin("Stylist", |p| p.gearset)?;
        self.record("stylist-update".to_string());
        let mut state = self.state();
        state.gearset_plugin_busy = true;
        state.recommended_gear_equipped = true;
        Ok(true)
    }

    fn is_busy(&self) -> Result<bool, IpcError> {
        self.plugin("Stylist", |p| p.gearset)?;
        Ok(self.state().gearset_plugin_busy)
    }
}

impl GatheringIpc for SimulatedGame {
    fn gather(&self, request: &GatherRequest) -> Result<bool, IpcError> {
        self.plugin("GatherBuddy", |p| p.gathering)?;
        self.record(format!("gather:{}x{}", request.item_id, request.quantity));
        self.state().gathering_busy = true;
        Ok(true)
    }

    fn is_busy(&self) -> Result<bool, IpcError> {
        self.plugin("GatherBuddy", |p| p.gathering)?;
        Ok(self.state().gathering_busy)
    }
}
