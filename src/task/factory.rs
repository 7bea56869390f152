use crate::quest::{Quest, QuestSequence, QuestStep};
use crate::task::steps::*;
use crate::task::types::*;
use tracing::debug;

/// Translates a declarative step into tasks.
///
/// Factories are pure: they only look at their inputs. A factory that does
/// not handle the step's interaction type returns nothing.
pub trait TaskFactory: Send + Sync {
    fn name(&self) -> &'static str;

    /// Single-task factories override this
    fn create_task(
        &self,
        _quest: &Quest,
        _sequence: &QuestSequence,
        _step: &QuestStep,
    ) -> Result<Option<Task>, FactoryError> {
        Ok(None)
    }

    /// Composite factories override this to emit an ordered list
    fn create_all_tasks(
        &self,
        quest: &Quest,
        sequence: &QuestSequence,
        step: &QuestStep,
    ) -> Result<Vec<Task>, FactoryError> {
        Ok(self
            .create_task(quest, sequence, step)?
            .into_iter()
            .collect())
    }
}

/// Compiles a step into the ordered task list the queue will run.
///
/// Prelude factories (teleport, movement, gear) all contribute, in
/// registration order. Interaction factories are tried in priority order and
/// the first one that produces anything wins.
pub struct StepCompiler {
    preludes: Vec<Box<dyn TaskFactory>>,
    interactions: Vec<Box<dyn TaskFactory>>,
}

impl Default for StepCompiler {
    fn default() -> Self {
        Self {
            preludes: vec![
                Box::new(AethernetShortcutFactory),
                Box::new(MoveFactory),
                Box::new(EquipBeforeDutyFactory),
            ],
            interactions: vec![
                Box::new(InteractFactory),
                Box::new(CraftFactory),
                Box::new(GatherFactory),
                Box::new(DiveFactory),
                Box::new(EquipFactory),
                Box::new(GearsetFactory),
                Box::new(DutyFactory),
                Box::new(WaitFactory),
            ],
        }
    }
}

impl StepCompiler {
    /// Compiler with no factories at all
    pub fn empty() -> Self {
        Self {
            preludes: Vec::new(),
            interactions: Vec::new(),
        }
    }

    pub fn with_prelude(mut self, factory: impl TaskFactory + 'static) -> Self {
        self.preludes.push(Box::new(factory));
        self
    }

    pub fn with_interaction(mut self, factory: impl TaskFactory + 'static) -> Self {
        self.interactions.push(Box::new(factory));
        self
    }

    pub fn compile(
        &self,
        quest: &Quest,
        sequence: &QuestSequence,
        step: &QuestStep,
    ) -> Result<Vec<Task>, FactoryError> {
        let mut tasks = Vec::new();
        for factory in &self.preludes {
            tasks.extend(factory.create_all_tasks(quest, sequence, step)?);
        }

        let mut handled = false;
        for factory in &self.interactions {
            let created = factory.create_all_tasks(quest, sequence, step)?;
            if !created.is_empty() {
                debug!(
                    "{} compiled {} step into {} task(s)",
                    factory.name(),
                    step.interaction_type,
                    created.len()
                );
                tasks.extend(created);
                handled = true;
                break;
            }
        }

        if !handled && !step.interaction_type.is_no_op() {
            return Err(FactoryError::UnsupportedInteraction {
                interaction_type: step.interaction_type.clone(),
            });
        }

        Ok(tasks)
    }
}
