//! Picks the next step of a sequence to run.
//!
//! Steps whose outcome already holds in the game (the character is already
//! in the right zone, the items are already in the bag, the quest is already
//! accepted) are skipped so a run can resume anywhere inside a sequence.

use crate::external::Services;
use crate::quest::{InteractionType, Quest, QuestSequence, QuestStep};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResolution {
    /// Run the step at this index
    Step(usize),
    /// Every remaining step was run or skipped; wait for the game to move on
    EndOfSequence,
}

/// First step at or after `from` that still has to be done
pub fn resolve_step(
    quest: &Quest,
    sequence: &QuestSequence,
    from: usize,
    services: &Services,
) -> StepResolution {
    for (index, step) in sequence.steps.iter().enumerate().skip(from) {
        match skip_reason(quest, step, services) {
            Some(reason) => info!(
                "Skipping step {} of quest {} sequence {}: {}",
                index, quest.id, sequence.sequence, reason
            ),
            None => return StepResolution::Step(index),
        }
    }
    StepResolution::EndOfSequence
}

/// Why `step` can be skipped, if it can
pub fn skip_reason(quest: &Quest, step: &QuestStep, services: &Services) -> Option<&'static str> {
    let conditions = &step.skip_conditions;
    if conditions.never {
        return None;
    }

    let oracle = &services.oracle;
    let game = &services.game;

    if step.interaction_type == InteractionType::AcceptQuest && oracle.is_quest_accepted(&quest.id)
    {
        return Some("quest already accepted");
    }

    let territory_id = game.territory_id();
    if conditions.in_territory.contains(&territory_id) {
        return Some("in skipped territory");
    }
    if !conditions.not_in_territory.is_empty()
        && !conditions.not_in_territory.contains(&territory_id)
    {
        return Some("not in required territory");
    }

    if !conditions.quests_completed.is_empty()
        && conditions
            .quests_completed
            .iter()
            .all(|id| oracle.is_quest_complete(id))
    {
        return Some("required quests completed");
    }
    if !conditions.quests_accepted.is_empty()
        && conditions
            .quests_accepted
            .iter()
            .all(|id| oracle.is_quest_accepted(id))
    {
        return Some("required quests accepted");
    }

    if let Some(item) = &conditions.item
        && game.item_count(item.item_id, item.quality) >= item.minimum_count
    {
        return Some("enough items owned");
    }

    None
}
