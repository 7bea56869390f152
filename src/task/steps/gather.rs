use crate::external::GatherRequest;
use crate::quest::{GatheredItem, InteractionType, ItemQuality, Quest, QuestSequence, QuestStep};
use crate::task::factory::TaskFactory;
use crate::task::types::*;

pub struct GatherFactory;

impl TaskFactory for GatherFactory {
    fn name(&self) -> &'static str {
        "GatherFactory"
    }

    fn create_task(
        &self,
        _quest: &Quest,
        _sequence: &QuestSequence,
        step: &QuestStep,
    ) -> Result<Option<Task>, FactoryError> {
        if step.interaction_type != InteractionType::Gather {
            return Ok(None);
        }
        if step.items_to_gather.is_empty() {
            return Err(FactoryError::MissingField {
                interaction_type: InteractionType::Gather,
                field: "ItemsToGather",
            });
        }
        Ok(Some(Task::Gather {
            gathering_point_id: step.data_id,
            items: step.items_to_gather.clone(),
        }))
    }
}

/// Gathers each listed item in turn until the inventory holds enough
#[derive(Debug)]
pub struct GatherStep {
    gathering_point_id: Option<u32>,
    items: Vec<GatheredItem>,
    /// Item last handed to the gathering plugin and how many we owned then
    requested: Option<(u32, u32)>,
}

impl GatherStep {
    pub fn new(gathering_point_id: Option<u32>, items: Vec<GatheredItem>) -> Self {
        Self {
            gathering_point_id,
            items,
            requested: None,
        }
    }

    fn next_missing(&self, ctx: &TaskContext) -> Option<(GatheredItem, u32)> {
        self.items.iter().find_map(|item| {
            let owned = ctx.services.game.item_count(item.item_id, ItemQuality::Any);
            (owned < item.item_count).then(|| (item.clone(), owned))
        })
    }

    fn request(&mut self, item: &GatheredItem, owned: u32, ctx: &TaskContext) -> Result<(), TaskError> {
        let request = GatherRequest {
            gathering_point_id: self.gathering_point_id,
            item_id: item.item_id,
            class_job: item.class_job,
            quantity: item.item_count - owned,
            collectability: item.collectability,
        };
        if !ctx.services.gathering.gather(&request)? {
            return Err(TaskError::failed(format!(
                "Unable to start gathering item {}",
                item.item_id
            )));
        }
        self.requested = Some((item.item_id, owned));
        Ok(())
    }

    pub fn start(&mut self, ctx: &TaskContext) -> Result<bool, TaskError> {
        let Some((item, owned)) = self.next_missing(ctx) else {
            return Ok(false);
        };
        self.request(&item, owned, ctx)?;
        Ok(true)
    }

    pub fn update(&mut self, ctx: &TaskContext) -> Result<TaskProgress, TaskError> {
        if ctx.services.gathering.is_busy()? {
            return Ok(TaskProgress::StillRunning);
        }
        let Some((item, owned)) = self.next_missing(ctx) else {
            return Ok(TaskProgress::TaskComplete);
        };

        if let Some((last_item, last_owned)) = self.requested
            && last_item == item.item_id
            && owned <= last_owned
        {
            return Err(TaskError::failed(format!(
                "Unable to gather item {}",
                item.item_id
            )));
        }
        self.request(&item, owned, ctx)?;
        Ok(TaskProgress::StillRunning)
    }

    pub fn debug_state(&self) -> Option<String> {
        self.requested.map(|(item_id, _)| format!("gathering {}", item_id))
    }
}
