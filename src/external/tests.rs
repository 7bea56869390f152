#[cfg(test)]
mod tests {
    use crate::external::sim::SimulatedGame;
    use crate::external::*;
    use crate::quest::{ElementId, ItemQuality};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn sim_services() -> (Arc<SimulatedGame>, Services) {
        let sim = Arc::new(SimulatedGame::new());
        let services = Services::from_single(sim.clone());
        (sim, services)
    }

    #[test]
    fn test_optional_plugin_failures_map_to_none() {
        let (sim, services) = sim_services();
        sim.state().plugins.combat_ai = false;

        let result = services.optional(services.combat_ai.enable_ai(false));
        assert_eq!(result, None);

        let failure: Result<(), IpcError> = Err(IpcError::CallFailed {
            plugin: "BossMod",
            message: "boom".to_string(),
        });
        assert_eq!(services.optional(failure), None);
        assert_eq!(services.optional(Ok::<_, IpcError>(7)), Some(7));
    }

    #[test]
    fn test_oracle_sequence_defaults_to_zero_when_not_accepted() {
        let (sim, services) = sim_services();
        let quest = ElementId::Quest(10);

        assert_eq!(services.oracle.quest_sequence(&quest), 0);

        sim.set_quest_sequence(quest, 4);
        assert_eq!(services.oracle.quest_sequence(&quest), 4);

        sim.complete_quest(quest);
        assert!(services.oracle.is_quest_complete(&quest));
        assert_eq!(services.oracle.quest_sequence(&quest), 0);
    }

    #[test]
    fn test_item_count_respects_quality() {
        let (sim, services) = sim_services();
        sim.add_items(100, 2, 3);

        assert_eq!(services.game.item_count(100, ItemQuality::Any), 5);
        assert_eq!(services.game.item_count(100, ItemQuality::NQ), 2);
        assert_eq!(services.game.item_count(100, ItemQuality::HQ), 3);
        assert_eq!(services.game.item_count(101, ItemQuality::Any), 0);
    }

    #[test]
    fn test_dialogue_sync_takes_and_releases_control() {
        let (sim, services) = sim_services();
        let mut sync = DialogueAutomationSync::new();

        sync.tick(true, true, &services);
        assert!(sync.is_holding_control());
        assert_eq!(
            sim.state().dialogue_controller.as_deref(),
            Some(DIALOGUE_CONTROL_LABEL)
        );

        sync.tick(false, true, &services);
        assert!(!sync.is_holding_control());
        assert!(sim.state().dialogue_controller.is_none());
    }

    #[test]
    fn test_dialogue_sync_respects_foreign_control_and_config() {
        let (sim, services) = sim_services();
        let mut sync = DialogueAutomationSync::new();

        sync.tick(true, false, &services);
        assert!(!sync.is_holding_control());

        sim.state().dialogue_controller = Some("someone-else".to_string());
        sync.tick(true, true, &services);
        assert!(!sync.is_holding_control());

        sync.tick(false, true, &services);
        assert_eq!(
            sim.state().dialogue_controller.as_deref(),
            Some("someone-else")
        );
    }

    #[test]
    fn test_dialogue_sync_without_plugin() {
        let (sim, services) = sim_services();
        sim.state().plugins.dialogue = false;
        let mut sync = DialogueAutomationSync::new();

        sync.tick(true, true, &services);
        assert!(!sync.is_holding_control());
    }

    #[test]
    fn test_highlight_tracker_interval_and_occupied() {
        let (sim, services) = sim_services();
        let mut tracker = HighlightTracker::new(Duration::from_millis(300));
        let start = Instant::now();

        assert!(tracker.tick(start, Some(7), &services));
        assert_eq!(sim.state().highlighted, Some(7));

        assert!(!tracker.tick(start + Duration::from_millis(100), Some(8), &services));
        assert_eq!(sim.state().highlighted, Some(7));

        sim.state().occupied = true;
        assert!(tracker.tick(start + Duration::from_millis(300), Some(8), &services));
        assert_eq!(sim.state().highlighted, None);
        assert_eq!(tracker.highlighted(), None);

        sim.state().occupied = false;
        assert!(tracker.tick(start + Duration::from_millis(600), Some(8), &services));
        assert_eq!(tracker.highlighted(), Some(8));
    }
}
