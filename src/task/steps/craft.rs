use crate::quest::{ClassJob, ElementId, InteractionType, ItemQuality, Quest, QuestSequence, QuestStep};
use crate::task::factory::TaskFactory;
use crate::task::types::*;
use tracing::{debug, info};

/// Craft steps: get off the mount, then hand the craft to the crafting plugin
pub struct CraftFactory;

impl TaskFactory for CraftFactory {
    fn name(&self) -> &'static str {
        "CraftFactory"
    }

    fn create_all_tasks(
        &self,
        quest: &Quest,
        _sequence: &QuestSequence,
        step: &QuestStep,
    ) -> Result<Vec<Task>, FactoryError> {
        if step.interaction_type != InteractionType::Craft {
            return Ok(Vec::new());
        }

        let missing = |field| FactoryError::MissingField {
            interaction_type: InteractionType::Craft,
            field,
        };
        let item_id = step.item_id.ok_or_else(|| missing("ItemId"))?;
        let item_count = step.item_count.ok_or_else(|| missing("ItemCount"))?;

        Ok(vec![
            Task::Unmount,
            Task::Craft {
                quest_id: quest.id,
                item_id,
                item_count,
                quality: step.item_quality,
            },
        ])
    }
}

#[derive(Debug)]
pub struct CraftStep {
    quest_id: ElementId,
    item_id: u32,
    item_count: u32,
    quality: ItemQuality,
    last_owned: u32,
}

impl CraftStep {
    pub fn new(quest_id: ElementId, item_id: u32, item_count: u32, quality: ItemQuality) -> Self {
        Self {
            quest_id,
            item_id,
            item_count,
            quality,
            last_owned: 0,
        }
    }

    fn owned(&mut self, ctx: &TaskContext) -> u32 {
        self.last_owned = ctx.services.game.item_count(self.item_id, self.quality);
        self.last_owned
    }

    /// Recipe for the class the quest was accepted on, else the current
    /// class, else whichever crafter has one
    fn resolve_recipe(&self, ctx: &TaskContext) -> Option<u16> {
        let catalog = &ctx.services.catalog;
        let quest_class = ctx
            .services
            .oracle
            .quest_progress_info(&self.quest_id)
            .and_then(|info| info.class_job)
            .filter(ClassJob::is_crafter);
        let current_class = Some(ctx.services.game.current_class()).filter(ClassJob::is_crafter);

        [quest_class, current_class]
            .into_iter()
            .flatten()
            .find_map(|class_job| catalog.recipe_for(self.item_id, class_job))
            .or_else(|| {
                ClassJob::CRAFTERS
                    .iter()
                    .find_map(|class_job| catalog.recipe_for(self.item_id, *class_job))
            })
    }

    pub fn start(&mut self, ctx: &TaskContext) -> Result<bool, TaskError> {
        let owned = self.owned(ctx);
        if owned >= self.item_count {
            info!(
                "Already own {}/{} of item {}",
                owned, self.item_count, self.item_id
            );
            return Ok(false);
        }

        if !ctx.services.catalog.is_craftable(self.item_id) {
            return Err(TaskError::failed(format!(
                "Item {} is not craftable",
                self.item_id
            )));
        }
        let recipe_id = self.resolve_recipe(ctx).ok_or_else(|| {
            TaskError::failed(format!(
                "Unable to determine recipe for item {}",
                self.item_id
            ))
        })?;

        let remaining = self.item_count - owned;
        debug!(
            "Crafting {}x item {} with recipe {}",
            remaining, self.item_id, recipe_id
        );
        if !ctx
            .services
            .crafting
            .craft_item(self.item_id, recipe_id, remaining)?
        {
            return Err(TaskError::failed(format!(
                "Failed to start craft for recipe {}",
                recipe_id
            )));
        }
        Ok(true)
    }

    pub fn update(&mut self, ctx: &TaskContext) -> Result<TaskProgress, TaskError> {
        let busy = ctx.services.crafting.is_busy()?;
        let owned = self.owned(ctx);
        if busy || owned < self.item_count || ctx.services.game.is_crafting() {
            return Ok(TaskProgress::StillRunning);
        }

        if ctx.services.game.is_crafting_log_open() {
            ctx.services.actions.close_crafting_log();
            return Ok(TaskProgress::StillRunning);
        }
        Ok(TaskProgress::TaskComplete)
    }

    pub fn debug_state(&self) -> Option<String> {
        Some(format!("{}/{}", self.last_owned, self.item_count))
    }
}
