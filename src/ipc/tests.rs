#[cfg(test)]
mod tests {
    use crate::config::QuestlineConfig;
    use crate::controller::{ControllerState, QuestController, StepData, encode_priority};
    use crate::external::Services;
    use crate::external::sim::SimulatedGame;
    use crate::ipc::*;
    use crate::quest::*;
    use std::future::Future;
    use std::sync::Arc;
    use std::time::Instant;

    const Q1: ElementId = ElementId::Quest(1);
    const Q2: ElementId = ElementId::Quest(2);
    const Q3: ElementId = ElementId::Quest(3);

    struct Harness {
        sim: Arc<SimulatedGame>,
        controller: QuestController,
        client: IpcClient,
        server: IpcServer,
    }

    impl Harness {
        fn new() -> Self {
            let sim = Arc::new(SimulatedGame::new());
            let mut registry = QuestRegistry::new();
            for id in [Q1, Q2, Q3] {
                registry.insert(Quest {
                    id,
                    name: format!("Quest {}", id),
                    root: QuestRoot {
                        quest_sequence: vec![QuestSequence {
                            sequence: 0,
                            comment: None,
                            steps: vec![QuestStep {
                                interaction_type: InteractionType::Wait,
                                delay_seconds: Some(5),
                                ..Default::default()
                            }],
                        }],
                        ..Default::default()
                    },
                    source: QuestSource::Inline,
                });
            }
            let controller = QuestController::new(
                registry,
                Services::from_single(sim.clone()),
                QuestlineConfig::default(),
            );
            let (client, server) = ipc_channel();
            Self {
                sim,
                controller,
                client,
                server,
            }
        }

        /// Runs `request` while the tick thread drains the channel
        async fn call<T>(&mut self, request: impl Future<Output = T>) -> T {
            let server = &mut self.server;
            let controller = &mut self.controller;
            let (result, _) = tokio::join!(request, async {
                tokio::task::yield_now().await;
                server.drain(controller, Instant::now())
            });
            result
        }
    }

    #[tokio::test]
    async fn test_start_and_query_quest() {
        let mut h = Harness::new();
        let client = h.client.clone();

        assert_eq!(h.call(client.is_running()).await, Ok(false));
        assert_eq!(h.call(client.current_quest_id()).await, Ok(None));

        assert_eq!(h.call(client.start_single_quest("2")).await, Ok(true));
        assert_eq!(h.call(client.is_running()).await, Ok(true));
        assert_eq!(
            h.call(client.current_quest_id()).await,
            Ok(Some("2".to_string()))
        );
        assert_eq!(
            h.call(client.current_step_data()).await,
            Ok(Some(StepData {
                quest_id: Q2,
                sequence: 0,
                step: 0,
                interaction_type: InteractionType::Wait,
                position: None,
                territory_id: 0,
            }))
        );
    }

    #[tokio::test]
    async fn test_start_rejects_bad_ids() {
        let mut h = Harness::new();
        let client = h.client.clone();

        assert_eq!(h.call(client.start_quest("not a quest")).await, Ok(false));
        assert_eq!(h.call(client.start_quest("99")).await, Ok(false));
        assert_eq!(h.controller.state(), &ControllerState::Idle);
    }

    #[tokio::test]
    async fn test_stop_uses_label() {
        let mut h = Harness::new();
        let client = h.client.clone();

        h.call(client.start_quest("1")).await.unwrap();
        assert_eq!(h.call(client.stop("other tool")).await, Ok(true));
        assert_eq!(
            h.controller.state(),
            &ControllerState::Stopped {
                reason: "IPC: other tool".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_quest_state_queries() {
        let mut h = Harness::new();
        let client = h.client.clone();
        h.sim.complete_quest(Q1);
        h.sim.set_quest_sequence(Q2, 3);
        h.sim.state().quests.entry(Q3).or_default().ready_to_accept = true;

        assert_eq!(h.call(client.is_quest_complete("1")).await, Ok(true));
        assert_eq!(h.call(client.is_quest_accepted("2")).await, Ok(true));
        assert_eq!(h.call(client.is_ready_to_accept_quest("3")).await, Ok(true));
        assert_eq!(h.call(client.is_quest_locked("3")).await, Ok(false));
        assert_eq!(h.call(client.is_quest_unobtainable("3")).await, Ok(false));

        assert_eq!(h.call(client.is_quest_locked("99")).await, Ok(true));
        assert_eq!(h.call(client.is_quest_complete("x")).await, Ok(false));
    }

    #[tokio::test]
    async fn test_priority_calls() {
        let mut h = Harness::new();
        let client = h.client.clone();
        let encoded = encode_priority(&[Q1, Q2]);

        assert_eq!(h.call(client.import_quest_priority(&encoded)).await, Ok(true));
        assert_eq!(h.call(client.insert_quest_priority(1, "3")).await, Ok(true));
        assert_eq!(h.controller.priority_quests(), &[Q1, Q3, Q2]);

        assert_eq!(h.call(client.insert_quest_priority(-1, "3")).await, Ok(false));
        assert_eq!(h.call(client.add_quest_priority("99")).await, Ok(true));
        assert_eq!(h.call(client.add_quest_priority("1")).await, Ok(true));
        assert_eq!(h.controller.priority_quests(), &[Q1, Q3, Q2]);

        assert_eq!(
            h.call(client.export_quest_priority()).await,
            Ok(encode_priority(&[Q1, Q3, Q2]))
        );
        assert_eq!(h.call(client.import_quest_priority("garbage")).await, Ok(false));
        assert_eq!(h.controller.priority_quests(), &[Q1, Q3, Q2]);

        assert_eq!(h.call(client.clear_quest_priority()).await, Ok(true));
        assert!(h.controller.priority_quests().is_empty());
    }

    #[tokio::test]
    async fn test_start_gathering() {
        let mut h = Harness::new();
        let client = h.client.clone();

        assert_eq!(h.call(client.start_gathering(1, 20, 1, 3)).await, Ok(false));
        assert_eq!(h.call(client.start_gathering(1, 20, 16, -1)).await, Ok(false));
        assert_eq!(h.call(client.start_gathering(1, 20, 200, 3)).await, Ok(false));
        assert_eq!(
            h.call(client.start_gathering_complex(1, 20, 17, 3, 500)).await,
            Ok(true)
        );
        assert!(h.controller.is_running());
    }

    #[tokio::test]
    async fn test_closed_server() {
        let Harness { client, server, .. } = Harness::new();
        drop(server);
        assert_eq!(client.is_running().await, Err(IpcChannelError::Closed));
    }

    #[tokio::test]
    async fn test_drain_counts_requests() {
        let mut h = Harness::new();
        let first = h.client.clone();
        let second = h.client.clone();

        let pending = tokio::spawn(async move {
            let (a, b) = tokio::join!(first.is_running(), second.export_quest_priority());
            (a, b)
        });
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        assert_eq!(h.server.drain(&mut h.controller, Instant::now()), 2);

        let (running, exported) = pending.await.unwrap();
        assert_eq!(running, Ok(false));
        assert_eq!(exported, Ok("qst:priority:".to_string()));
    }
}
