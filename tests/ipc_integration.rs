use questline::config::QuestlineConfig;
use questline::controller::{ControllerState, QuestController};
use questline::external::Services;
use questline::external::sim::SimulatedGame;
use questline::ipc::{IpcChannelError, ipc_channel};
use questline::quest::{
    ElementId, InteractionType, Quest, QuestRegistry, QuestRoot, QuestSequence, QuestSource,
    QuestStep,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

fn wait_quest(id: u16) -> Quest {
    Quest {
        id: ElementId::Quest(id),
        name: format!("Quest {}", id),
        root: QuestRoot {
            quest_sequence: vec![QuestSequence {
                sequence: 0,
                comment: None,
                steps: vec![QuestStep {
                    interaction_type: InteractionType::Wait,
                    delay_seconds: Some(60),
                    ..Default::default()
                }],
            }],
            ..Default::default()
        },
        source: QuestSource::Inline,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_requests_are_answered_on_the_tick_thread() {
    let (client, mut server) = ipc_channel();
    let done = Arc::new(AtomicBool::new(false));

    let tick_done = done.clone();
    let tick_thread = thread::spawn(move || {
        let sim = Arc::new(SimulatedGame::new());
        let mut registry = QuestRegistry::new();
        registry.insert(wait_quest(1));
        registry.insert(wait_quest(2));
        let mut controller =
            QuestController::new(registry, Services::from_single(sim), QuestlineConfig::default());

        while !tick_done.load(Ordering::SeqCst) {
            let now = Instant::now();
            server.drain(&mut controller, now);
            controller.tick(now);
            thread::sleep(Duration::from_millis(5));
        }
        controller
    });

    assert_eq!(client.add_quest_priority("2").await, Ok(true));
    assert_eq!(client.start_quest("1").await, Ok(true));
    assert_eq!(client.is_running().await, Ok(true));
    assert_eq!(client.current_quest_id().await, Ok(Some("1".to_string())));

    let exported = client.export_quest_priority().await.unwrap();
    assert!(exported.starts_with("qst:priority:"));

    assert_eq!(client.stop("integration test").await, Ok(true));
    assert_eq!(client.is_running().await, Ok(false));

    done.store(true, Ordering::SeqCst);
    let controller = tick_thread.join().unwrap();
    assert_eq!(
        controller.state(),
        &ControllerState::Stopped {
            reason: "IPC: integration test".to_string()
        }
    );
    assert_eq!(controller.priority_quests(), &[ElementId::Quest(2)]);

    drop(controller);
    assert_eq!(client.is_running().await, Err(IpcChannelError::Closed));
}
