use questline::config::QuestlineConfig;
use questline::controller::{
    ControllerEvent, ControllerEventHandler, ControllerState, DAMAGE_INTERRUPT_REASON,
    QuestController, decode_priority, encode_priority,
};
use questline::external::Services;
use questline::external::sim::SimulatedGame;
use questline::quest::{
    ClassJob, ElementId, InteractionType, Quest, QuestRegistry, QuestRoot, QuestSequence,
    QuestSource, QuestStep,
};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Default)]
struct EventLog(Mutex<Vec<String>>);

struct SharedLog(Arc<EventLog>);

impl ControllerEventHandler for SharedLog {
    fn handle_event(&self, event: &ControllerEvent) -> anyhow::Result<()> {
        let line = match event {
            ControllerEvent::Started { mode, .. } => format!("started {:?}", mode),
            ControllerEvent::StepQueued { tasks, .. } => format!("queued {}", tasks.join(",")),
            ControllerEvent::StepCompleted { progress } => format!("completed {}", progress),
            ControllerEvent::SequenceChanged { from, to, .. } => format!("sequence {}->{}", from, to),
            ControllerEvent::QuestCompleted { quest_id } => format!("quest {} done", quest_id),
            ControllerEvent::Stopped { reason, failed } => format!("stopped {} {}", failed, reason),
        };
        self.0.0.lock().unwrap().push(line);
        Ok(())
    }
}

fn single_step_quest(id: u16, step: QuestStep) -> Quest {
    Quest {
        id: ElementId::Quest(id),
        name: format!("Quest {}", id),
        root: QuestRoot {
            quest_sequence: vec![QuestSequence {
                sequence: 1,
                comment: None,
                steps: vec![step],
            }],
            ..Default::default()
        },
        source: QuestSource::Inline,
    }
}

fn step(interaction_type: InteractionType) -> QuestStep {
    QuestStep {
        interaction_type,
        ..Default::default()
    }
}

fn setup(quests: Vec<Quest>) -> (Arc<SimulatedGame>, QuestController, Arc<EventLog>) {
    let sim = Arc::new(SimulatedGame::new());
    let mut registry = QuestRegistry::new();
    for quest in quests {
        sim.set_quest_sequence(quest.id, 1);
        registry.insert(quest);
    }
    let mut controller = QuestController::new(
        registry,
        Services::from_single(sim.clone()),
        QuestlineConfig::default(),
    );
    let log = Arc::new(EventLog::default());
    controller.add_event_handler(Box::new(SharedLog(log.clone())));
    (sim, controller, log)
}

#[test]
fn test_scenario_craft_quest() {
    let mut craft = step(InteractionType::Craft);
    craft.item_id = Some(100);
    craft.item_count = Some(5);
    let (sim, mut controller, log) = setup(vec![single_step_quest(1, craft)]);
    sim.state().recipes.insert((100, ClassJob::Carpenter), 7);

    let start = Instant::now();
    controller
        .start_quest(ElementId::Quest(1), true, "scenario", start)
        .unwrap();
    assert_eq!(
        controller.queue().remaining_task_names(),
        vec!["Unmount", "Craft 5x 100"]
    );

    controller.tick(start);
    sim.add_items(100, 5, 0);
    sim.state().crafting_busy = false;
    controller.tick(start + Duration::from_secs(1));
    controller.tick(start + Duration::from_secs(2));
    assert!(controller.queue().is_empty());

    let log = log.0.lock().unwrap();
    assert_eq!(log[0], "started SingleQuest");
    assert_eq!(log[1], "queued Unmount,Craft 5x 100");
    assert_eq!(log[2], "completed quest 1 sequence 1 step 0");
}

#[test]
fn test_scenario_dive_on_land() {
    let (_sim, mut controller, log) = setup(vec![single_step_quest(1, step(InteractionType::Dive))]);

    let start = Instant::now();
    controller
        .start_quest(ElementId::Quest(1), true, "scenario", start)
        .unwrap();
    controller.tick(start);

    assert_eq!(
        controller.state(),
        &ControllerState::Stopped {
            reason: "You aren't swimming, so we can't dive.".to_string()
        }
    );
    assert!(controller.queue().is_empty());
    assert_eq!(
        log.0.lock().unwrap().last().map(String::as_str),
        Some("stopped true You aren't swimming, so we can't dive.")
    );
}

#[test]
fn test_scenario_update_gearset_without_gearset() {
    let (sim, mut controller, _log) =
        setup(vec![single_step_quest(1, step(InteractionType::UpdateGearset))]);
    sim.state().current_gearset = None;
    let gearsets_before = sim.state().gearsets.clone();

    let start = Instant::now();
    controller
        .start_quest(ElementId::Quest(1), true, "scenario", start)
        .unwrap();
    controller.tick(start);

    assert_eq!(
        controller.state(),
        &ControllerState::Stopped {
            reason: "No gearset is currently equipped".to_string()
        }
    );
    assert_eq!(sim.state().gearsets, gearsets_before);
    assert!(!sim.action_log().iter().any(|a| a.starts_with("update-gearset")));
}

#[test]
fn test_damage_interrupts_waiting_but_not_crafting() {
    let mut wait = step(InteractionType::Wait);
    wait.delay_seconds = Some(30);
    let mut craft = step(InteractionType::Craft);
    craft.item_id = Some(100);
    craft.item_count = Some(1);
    let (sim, mut controller, _log) =
        setup(vec![single_step_quest(1, craft), single_step_quest(2, wait)]);
    sim.state().recipes.insert((100, ClassJob::Carpenter), 7);

    let start = Instant::now();
    controller
        .start_quest(ElementId::Quest(1), true, "scenario", start)
        .unwrap();
    controller.tick(start);
    assert!(!controller.on_damage_taken());
    assert!(controller.is_running());

    controller
        .start_quest(ElementId::Quest(2), true, "scenario", start)
        .unwrap();
    controller.tick(start);
    assert!(controller.on_damage_taken());
    assert_eq!(
        controller.state(),
        &ControllerState::Stopped {
            reason: DAMAGE_INTERRUPT_REASON.to_string()
        }
    );
}

#[test]
fn test_scenario_priority_round_trip() {
    let quests = (1..=4)
        .map(|id| single_step_quest(id, step(InteractionType::WaitForManualProgress)))
        .collect();
    let (_sim, mut controller, _log) = setup(quests);
    let [q1, q2, q3, q4] = [1, 2, 3, 4].map(ElementId::Quest);

    let imported = controller
        .import_encoded_quest_priority(&encode_priority(&[q1, q2, q3]))
        .unwrap();
    assert_eq!(imported, 3);
    assert!(controller.insert_quest_priority(1, q4));
    assert_eq!(controller.priority_quests(), &[q1, q4, q2, q3]);

    assert!(controller.add_quest_priority(q2));
    assert!(controller.remove_quest_priority(&ElementId::Quest(77)));
    assert_eq!(controller.priority_quests(), &[q1, q4, q2, q3]);

    let exported = controller.export_quest_priority();
    assert_eq!(decode_priority(&exported).unwrap(), vec![q1, q4, q2, q3]);
}
