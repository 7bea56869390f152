use crate::quest::{InteractionType, Quest, QuestSequence, QuestStep};
use crate::task::factory::TaskFactory;
use crate::task::types::*;
use tracing::{debug, info, warn};

/// Duty, solo-duty and combat steps. Each waits for the quest sequence to
/// move on, since none of them has a completion signal of its own.
pub struct DutyFactory;

impl TaskFactory for DutyFactory {
    fn name(&self) -> &'static str {
        "DutyFactory"
    }

    fn create_all_tasks(
        &self,
        quest: &Quest,
        sequence: &QuestSequence,
        step: &QuestStep,
    ) -> Result<Vec<Task>, FactoryError> {
        let wait = Task::WaitForProgress {
            quest_id: quest.id,
            sequence: sequence.sequence,
            interruptible: false,
        };

        Ok(match step.interaction_type {
            InteractionType::Duty => {
                let options =
                    step.duty_options
                        .as_ref()
                        .ok_or_else(|| FactoryError::MissingField {
                            interaction_type: InteractionType::Duty,
                            field: "DutyOptions",
                        })?;
                vec![
                    Task::Duty {
                        quest_id: quest.id,
                        content_finder_condition_id: options.content_finder_condition_id,
                        enabled: options.enabled,
                    },
                    wait,
                ]
            }
            InteractionType::SinglePlayerDuty => vec![
                Task::SinglePlayerDuty {
                    quest_id: quest.id,
                    sequence: sequence.sequence,
                },
                wait,
                Task::DisableCombatAi,
            ],
            InteractionType::Combat => vec![
                Task::EnableCombatAi { passive: false },
                wait,
                Task::DisableCombatAi,
            ],
            _ => Vec::new(),
        })
    }
}

/// Hands an instanced duty to the instance runner when it is configured to
/// run it; otherwise the player runs it and this task finishes at once.
#[derive(Debug)]
pub struct DutyStep {
    content_finder_condition_id: u32,
    enabled: bool,
    automatic: bool,
}

impl DutyStep {
    pub fn new(content_finder_condition_id: u32, enabled: bool) -> Self {
        Self {
            content_finder_condition_id,
            enabled,
            automatic: false,
        }
    }

    /// Territory to run when the runner should take this duty
    fn configured_territory(&self, ctx: &TaskContext) -> Result<Option<u16>, TaskError> {
        let duties = &ctx.config.duties;
        let cfc = self.content_finder_condition_id;
        if !duties.run_instanced_content_with_auto_duty
            || duties.blacklisted_duty_cfc_ids.contains(&cfc)
        {
            return Ok(None);
        }
        let Some(territory_id) = ctx.services.catalog.territory_for_cfc(cfc) else {
            warn!("No territory known for duty {}", cfc);
            return Ok(None);
        };
        if duties.whitelisted_duty_cfc_ids.contains(&cfc) {
            return Ok(Some(territory_id));
        }
        if !self.enabled {
            return Ok(None);
        }

        let has_path = ctx
            .services
            .optional(ctx.services.instance_runner.has_path(territory_id));
        Ok((has_path == Some(true)).then_some(territory_id))
    }

    pub fn start(&mut self, ctx: &TaskContext) -> Result<bool, TaskError> {
        let Some(territory_id) = self.configured_territory(ctx)? else {
            info!(
                "Duty {} has to be completed manually",
                self.content_finder_condition_id
            );
            return Ok(false);
        };

        let bare_mode = !ctx.config.duties.disable_auto_duty_bare_mode;
        let started = ctx
            .services
            .optional(ctx.services.instance_runner.run(territory_id, 1, bare_mode));
        self.automatic = started.is_some();
        Ok(self.automatic)
    }

    pub fn update(&mut self, ctx: &TaskContext) -> Result<TaskProgress, TaskError> {
        // a runner that cannot be asked is treated as stopped
        let stopped = ctx.services.instance_runner.is_stopped().unwrap_or(true);
        if stopped {
            Ok(TaskProgress::TaskComplete)
        } else {
            Ok(TaskProgress::StillRunning)
        }
    }
}

/// Switches combat AI on or off; instant, and skipped when the plugin is
/// missing
#[derive(Debug)]
pub struct CombatAiStep {
    enable: Option<bool>,
    only_for_solo_duties: bool,
}

impl CombatAiStep {
    pub fn enable(passive: bool) -> Self {
        Self {
            enable: Some(passive),
            only_for_solo_duties: false,
        }
    }

    pub fn disable() -> Self {
        Self {
            enable: None,
            only_for_solo_duties: false,
        }
    }

    pub fn for_solo_duty() -> Self {
        Self {
            enable: Some(false),
            only_for_solo_duties: true,
        }
    }

    pub fn start(&mut self, ctx: &TaskContext) -> Result<bool, TaskError> {
        if self.only_for_solo_duties
            && !ctx.config.single_player_duties.run_solo_instances_with_boss_mod
        {
            debug!("Solo duties are not run with combat AI");
            return Ok(false);
        }

        let combat_ai = &ctx.services.combat_ai;
        let result = match self.enable {
            Some(passive) => combat_ai.enable_ai(passive),
            None => combat_ai.disable_ai(),
        };
        ctx.services.optional(result);
        Ok(false)
    }

    pub fn update(&mut self, _ctx: &TaskContext) -> Result<TaskProgress, TaskError> {
        Ok(TaskProgress::TaskComplete)
    }
}

