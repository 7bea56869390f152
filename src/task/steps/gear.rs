use crate::config::GearsetUpdateSource;
use crate::external::Catalog;
use crate::quest::{ClassJob, InteractionType, Quest, QuestSequence, QuestStep};
use crate::task::factory::TaskFactory;
use crate::task::types::*;
use std::time::Instant;
use tracing::{debug, info};

/// Log message shown when the armoury chest has no room for removed gear
pub const ARMOURY_FULL_LOG_MESSAGE: u32 = 709;

/// Puts on recommended gear before any step that may involve fighting
pub struct EquipBeforeDutyFactory;

impl TaskFactory for EquipBeforeDutyFactory {
    fn name(&self) -> &'static str {
        "EquipBeforeDutyFactory"
    }

    fn create_task(
        &self,
        _quest: &Quest,
        _sequence: &QuestSequence,
        step: &QuestStep,
    ) -> Result<Option<Task>, FactoryError> {
        Ok(matches!(
            step.interaction_type,
            InteractionType::Duty | InteractionType::SinglePlayerDuty | InteractionType::Combat
        )
        .then_some(Task::EquipRecommended))
    }
}

pub struct EquipFactory;

impl TaskFactory for EquipFactory {
    fn name(&self) -> &'static str {
        "EquipFactory"
    }

    fn create_task(
        &self,
        _quest: &Quest,
        _sequence: &QuestSequence,
        step: &QuestStep,
    ) -> Result<Option<Task>, FactoryError> {
        let item_id = || {
            step.item_id.ok_or_else(|| FactoryError::MissingField {
                interaction_type: step.interaction_type.clone(),
                field: "ItemId",
            })
        };
        Ok(match step.interaction_type {
            InteractionType::EquipItem => Some(Task::EquipItem { item_id: item_id()? }),
            InteractionType::UnequipItem => Some(Task::UnequipItem { item_id: item_id()? }),
            InteractionType::EquipRecommended => Some(Task::EquipRecommended),
            _ => None,
        })
    }
}

pub struct GearsetFactory;

impl TaskFactory for GearsetFactory {
    fn name(&self) -> &'static str {
        "GearsetFactory"
    }

    fn create_task(
        &self,
        _quest: &Quest,
        _sequence: &QuestSequence,
        step: &QuestStep,
    ) -> Result<Option<Task>, FactoryError> {
        let target_class = step.target_class;
        Ok(match step.interaction_type {
            InteractionType::UpdateGearset => Some(Task::UpdateGearset { target_class }),
            InteractionType::CreateGearset => Some(Task::CreateGearset { target_class }),
            _ => None,
        })
    }
}

#[derive(Debug, Default)]
pub struct EquipRecommendedStep {
    used_stylist: bool,
    attempts: u32,
    retry_at: Option<Instant>,
    settle_until: Option<Instant>,
}

impl EquipRecommendedStep {
    fn equip_vanilla(&mut self, ctx: &TaskContext) -> Result<(), TaskError> {
        if !ctx.services.actions.equip_recommended_gear() {
            return Err(TaskError::failed("Unable to equip recommended gear."));
        }
        self.retry_at = Some(ctx.now + ctx.config.timings.retry_interval());
        Ok(())
    }

    pub fn start(&mut self, ctx: &TaskContext) -> Result<bool, TaskError> {
        if ctx.services.game.is_in_combat() {
            debug!("In combat, not touching gear");
            return Ok(false);
        }

        if ctx.config.general.gearset_update_source == GearsetUpdateSource::Stylist {
            match ctx.services.optional(ctx.services.gearset.update_gearset()) {
                Some(true) => {
                    self.used_stylist = true;
                    self.retry_at = Some(ctx.now + ctx.config.timings.retry_interval());
                    return Ok(true);
                }
                Some(false) => {
                    info!("Gearset plugin refused to update, using recommended gear instead");
                }
                None => {}
            }
        }

        self.equip_vanilla(ctx)?;
        Ok(true)
    }

    pub fn update(&mut self, ctx: &TaskContext) -> Result<TaskProgress, TaskError> {
        if self.used_stylist
            && ctx.services.optional(ctx.services.gearset.is_busy()) == Some(true)
        {
            return Ok(TaskProgress::StillRunning);
        }

        if !ctx.services.game.is_recommended_gear_equipped() {
            self.settle_until = None;
            if self.retry_at.is_some_and(|at| ctx.now < at) {
                return Ok(TaskProgress::StillRunning);
            }
            self.attempts += 1;
            if self.attempts >= ctx.config.timings.max_equip_attempts {
                return Err(TaskError::failed("Unable to equip recommended gear."));
            }
            self.equip_vanilla(ctx)?;
            return Ok(TaskProgress::StillRunning);
        }

        let settle_until = *self
            .settle_until
            .get_or_insert(ctx.now + ctx.config.timings.retry_interval());
        if ctx.now >= settle_until {
            Ok(TaskProgress::TaskComplete)
        } else {
            Ok(TaskProgress::StillRunning)
        }
    }
}

/// Equips or removes a single item, re-checking at the retry interval
#[derive(Debug)]
pub struct ItemEquipStep {
    item_id: u32,
    equip: bool,
    attempts: u32,
    retry_at: Option<Instant>,
    exhausted: bool,
}

impl ItemEquipStep {
    pub fn equip(item_id: u32) -> Self {
        Self::new(item_id, true)
    }

    pub fn unequip(item_id: u32) -> Self {
        Self::new(item_id, false)
    }

    fn new(item_id: u32, equip: bool) -> Self {
        Self {
            item_id,
            equip,
            attempts: 0,
            retry_at: None,
            exhausted: false,
        }
    }

    fn satisfied(&self, ctx: &TaskContext) -> bool {
        ctx.services.game.is_item_equipped(self.item_id) == self.equip
    }

    fn act(&mut self, ctx: &TaskContext) {
        let actions = &ctx.services.actions;
        if self.equip {
            actions.equip_item(self.item_id);
        } else {
            actions.unequip_item(self.item_id);
        }
        self.retry_at = Some(ctx.now + ctx.config.timings.retry_interval());
    }

    fn failure(&self) -> TaskError {
        if self.equip {
            TaskError::failed("Unable to equip gear.")
        } else {
            TaskError::failed("Unable to unequip gear.")
        }
    }

    pub fn start(&mut self, ctx: &TaskContext) -> Result<bool, TaskError> {
        if !ctx.services.catalog.is_equipment(self.item_id) {
            return Err(TaskError::failed("Not a piece of equipment"));
        }
        if self.satisfied(ctx) {
            return Ok(false);
        }
        self.act(ctx);
        Ok(true)
    }

    pub fn update(&mut self, ctx: &TaskContext) -> Result<TaskProgress, TaskError> {
        let satisfied = self.satisfied(ctx);
        if self.exhausted && !satisfied {
            return Err(self.failure());
        }
        if self.retry_at.is_some_and(|at| ctx.now < at) {
            return Ok(TaskProgress::StillRunning);
        }
        if satisfied {
            return Ok(TaskProgress::TaskComplete);
        }

        self.attempts += 1;
        if self.attempts >= ctx.config.timings.max_equip_attempts {
            return Err(self.failure());
        }
        self.act(ctx);
        Ok(TaskProgress::StillRunning)
    }

    /// An armoury-full toast means removing gear cannot succeed
    pub fn on_error_toast(&mut self, message: &str, catalog: &dyn Catalog) -> bool {
        if self.equip {
            return false;
        }
        let armoury_full = catalog
            .log_message(ARMOURY_FULL_LOG_MESSAGE)
            .is_some_and(|text| text == message);
        if armoury_full {
            self.exhausted = true;
        }
        armoury_full
    }

    pub fn debug_state(&self) -> Option<String> {
        Some(format!("attempts: {}", self.attempts))
    }
}

/// Saves the current gear into a gearset, or creates one. Runs behind the
/// default start delay so the game can persist the change.
#[derive(Debug)]
pub struct GearsetStep {
    target_class: Option<ClassJob>,
    create: bool,
}

impl GearsetStep {
    pub fn update_existing(target_class: Option<ClassJob>) -> Self {
        Self {
            target_class,
            create: false,
        }
    }

    pub fn create(target_class: Option<ClassJob>) -> Self {
        Self {
            target_class,
            create: true,
        }
    }

    fn check_preconditions(ctx: &TaskContext) -> Result<(), TaskError> {
        let game = &ctx.services.game;
        if !game.is_logged_in() {
            return Err(TaskError::failed("Player is not logged in"));
        }
        if !game.is_gearset_system_available() {
            return Err(TaskError::failed("Gearset system is not available"));
        }
        if game.is_in_combat() {
            return Err(TaskError::failed("Cannot update gearset while in combat"));
        }
        Ok(())
    }

    pub fn start(&mut self, ctx: &TaskContext) -> Result<bool, TaskError> {
        Self::check_preconditions(ctx)?;
        if self.create {
            self.start_create(ctx)
        } else {
            self.start_update(ctx)
        }
    }

    fn start_update(&self, ctx: &TaskContext) -> Result<bool, TaskError> {
        let game = &ctx.services.game;
        let gearset_id = match self.target_class {
            Some(class_job) => game.gearset_for_class(class_job).ok_or_else(|| {
                TaskError::failed(format!("No gearset found for {}", class_job))
            })?,
            None => game
                .current_gearset()
                .ok_or_else(|| TaskError::failed("No gearset is currently equipped"))?,
        };

        if !ctx.services.actions.update_gearset(gearset_id) {
            return Err(TaskError::failed(format!(
                "Failed to update gearset {}",
                gearset_id
            )));
        }
        info!("Updated gearset {}", gearset_id);
        Ok(true)
    }

    fn start_create(&self, ctx: &TaskContext) -> Result<bool, TaskError> {
        let game = &ctx.services.game;
        let current = game.current_class();
        let target = self.target_class.unwrap_or(current);
        if game.gearset_for_class(target).is_some() {
            debug!("{} already has a gearset", target);
            return Ok(false);
        }
        if target != current {
            return Err(TaskError::failed(format!(
                "Cannot create a gearset for {} while playing {}",
                target, current
            )));
        }

        if !ctx.services.actions.create_gearset() {
            return Err(TaskError::failed(
                "Failed to create gearset - all slots may be full",
            ));
        }
        info!("Created gearset for {}", target);
        Ok(true)
    }

    pub fn update(&mut self, _ctx: &TaskContext) -> Result<TaskProgress, TaskError> {
        Ok(TaskProgress::TaskComplete)
    }
}
