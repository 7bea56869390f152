#[cfg(test)]
mod tests {
    use crate::quest::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    const CRAFT_QUEST: &str = r#"{
        "Author": "Liza",
        "QuestSequence": [
            {
                "Sequence": 1,
                "Steps": [
                    {
                        "InteractionType": "Craft",
                        "TerritoryId": 132,
                        "ItemId": 100,
                        "ItemCount": 5,
                        "ItemQuality": "HQ"
                    }
                ]
            },
            {
                "Sequence": 255,
                "Steps": [
                    {
                        "DataId": 1000100,
                        "Position": { "X": 1.5, "Y": 0.0, "Z": -3.25 },
                        "TerritoryId": 132,
                        "InteractionType": "CompleteQuest"
                    }
                ]
            }
        ]
    }"#;

    fn write_quest(dir: &std::path::Path, file_name: &str, content: &str) {
        fs::write(dir.join(file_name), content).unwrap();
    }

    #[test]
    fn test_element_id_parsing() {
        assert_eq!("1234".parse::<ElementId>().unwrap(), ElementId::Quest(1234));
        assert_eq!("L123".parse::<ElementId>().unwrap(), ElementId::Leve(123));
        assert_eq!(
            "S5".parse::<ElementId>().unwrap(),
            ElementId::SatisfactionSupply(5)
        );
        assert_eq!(
            "A3x2".parse::<ElementId>().unwrap(),
            ElementId::AlliedSocietyDaily {
                society: 3,
                rank: 2
            }
        );
        assert_eq!("U42".parse::<ElementId>().unwrap(), ElementId::UnlockLink(42));
        assert_eq!(" 77 ".parse::<ElementId>().unwrap(), ElementId::Quest(77));

        assert!("".parse::<ElementId>().is_err());
        assert!("Lx".parse::<ElementId>().is_err());
        assert!("A3".parse::<ElementId>().is_err());
        assert!("70000".parse::<ElementId>().is_err());
    }

    #[test]
    fn test_element_id_display_matches_parse_format() {
        for raw in ["1234", "L123", "S5", "A3x2", "U42"] {
            let id: ElementId = raw.parse().unwrap();
            assert_eq!(id.to_string(), raw);
        }
        assert!(ElementId::Quest(1).is_quest());
        assert!(!ElementId::Leve(1).is_quest());
    }

    #[test]
    fn test_quest_root_deserialization() {
        let root: QuestRoot = serde_json::from_str(CRAFT_QUEST).unwrap();

        assert_eq!(root.author, vec!["Liza".to_string()]);
        assert!(!root.disabled);
        assert!(root.interruptible);
        assert_eq!(root.quest_sequence.len(), 2);

        let craft = &root.quest_sequence[0].steps[0];
        assert_eq!(craft.interaction_type, InteractionType::Craft);
        assert_eq!(craft.item_id, Some(100));
        assert_eq!(craft.item_count, Some(5));
        assert_eq!(craft.item_quality, ItemQuality::HQ);
        assert!(craft.position.is_none());

        let turn_in = &root.quest_sequence[1];
        assert_eq!(turn_in.sequence, QUEST_COMPLETE_SEQUENCE);
        assert_eq!(
            turn_in.steps[0].position,
            Some(Position::new(1.5, 0.0, -3.25))
        );
    }

    #[test]
    fn test_author_list_and_unknown_interaction() {
        let root: QuestRoot = serde_json::from_str(
            r#"{
                "Author": ["a", "b"],
                "Interruptible": false,
                "LastChecked": { "Username": "a", "Date": "2024-05-01" },
                "QuestSequence": [
                    { "Sequence": 0, "Steps": [ { "InteractionType": "FlyToTheMoon" } ] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(root.author.len(), 2);
        assert!(!root.interruptible);
        assert_eq!(
            root.quest_sequence[0].steps[0].interaction_type,
            InteractionType::Unknown("FlyToTheMoon".to_string())
        );
        assert_eq!(root.last_checked.to_string(), "2024-05-01 by a");
        assert_eq!(
            root.last_checked
                .days_since(NaiveDate::from_ymd_opt(2024, 5, 11).unwrap()),
            Some(10)
        );
    }

    #[test]
    fn test_skip_conditions_deserialization() {
        let step: QuestStep = serde_json::from_str(
            r#"{
                "InteractionType": "Interact",
                "SkipConditions": {
                    "InTerritory": [128],
                    "QuestsCompleted": ["65", "L3"],
                    "Item": { "ItemId": 5, "MinimumCount": 2 }
                }
            }"#,
        )
        .unwrap();

        let skip = &step.skip_conditions;
        assert!(!skip.is_empty());
        assert!(!skip.never);
        assert_eq!(skip.in_territory, vec![128]);
        assert_eq!(
            skip.quests_completed,
            vec![ElementId::Quest(65), ElementId::Leve(3)]
        );
        assert_eq!(skip.item.as_ref().unwrap().quality, ItemQuality::Any);
    }

    #[test]
    fn test_class_job_lookup() {
        assert_eq!(ClassJob::from_id(8), Some(ClassJob::Carpenter));
        assert_eq!(ClassJob::from_id(42), Some(ClassJob::Pictomancer));
        assert_eq!(ClassJob::from_id(43), None);
        assert!(ClassJob::Culinarian.is_crafter());
        assert!(!ClassJob::Miner.is_crafter());
        assert!(ClassJob::Fisher.is_gatherer());
        assert_eq!(ClassJob::Weaver.crafter_index(), Some(5));
        assert_eq!(ClassJob::Paladin.crafter_index(), None);
    }

    #[test]
    fn test_registry_loads_recursively_and_ignores_unkeyed_files() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("A Realm Reborn").join("MSQ");
        fs::create_dir_all(&nested).unwrap();

        write_quest(dir.path(), "100_Crafty_Business.json", CRAFT_QUEST);
        write_quest(&nested, "L5_Leve.json", r#"{ "Author": "x", "QuestSequence": [] }"#);
        write_quest(
            &nested,
            "101_Disabled.json",
            r#"{ "Author": "x", "Disabled": true }"#,
        );
        write_quest(dir.path(), "schema.json", "{}");
        write_quest(dir.path(), "notes.txt", "nothing here");

        let mut registry =
            QuestRegistry::new().with_directory(dir.path(), QuestSource::UserDirectory);
        registry.reload();

        assert!(registry.load_issues().is_empty());
        assert!(registry.is_known_quest(&ElementId::Quest(100)));
        assert!(registry.is_known_quest(&ElementId::Leve(5)));
        assert!(registry.is_known_quest(&ElementId::Quest(101)));
        assert_eq!(registry.count(), 2);

        let quest = registry.try_get_quest(&ElementId::Quest(100)).unwrap();
        assert_eq!(quest.name, "Crafty Business");
        assert_eq!(quest.source, QuestSource::UserDirectory);
        assert!(quest.find_sequence(1).is_some());
        assert!(quest.find_sequence(2).is_none());
        assert_eq!(
            quest.find_step(255, 0).unwrap().interaction_type,
            InteractionType::CompleteQuest
        );
    }

    #[test]
    fn test_registry_reports_broken_file() {
        let dir = TempDir::new().unwrap();
        write_quest(dir.path(), "1_Good.json", r#"{ "Author": "x" }"#);
        write_quest(dir.path(), "2_Broken.json", "{ not json");

        let mut registry =
            QuestRegistry::new().with_directory(dir.path(), QuestSource::UserDirectory);
        registry.reload();

        assert_eq!(registry.load_issues().len(), 1);
        assert!(registry.load_issues()[0].contains("2_Broken.json"));
        // files sorted before the broken one are kept
        assert!(registry.is_known_quest(&ElementId::Quest(1)));
        assert!(!registry.is_known_quest(&ElementId::Quest(2)));
    }

    #[test]
    fn test_registry_indexes_duties() {
        let dir = TempDir::new().unwrap();
        write_quest(
            dir.path(),
            "300_Dungeon.json",
            r#"{
                "Author": "x",
                "QuestSequence": [
                    { "Sequence": 2, "Steps": [
                        { "InteractionType": "Duty", "DutyOptions": { "ContentFinderConditionId": 4, "LowPriority": true } }
                    ] },
                    { "Sequence": 3, "Steps": [
                        { "InteractionType": "Duty", "DutyOptions": { "ContentFinderConditionId": 9 } }
                    ] }
                ]
            }"#,
        );

        let mut registry = QuestRegistry::new();
        registry
            .load_from_directory(dir.path(), QuestSource::ProjectDirectory)
            .unwrap();

        let duty = registry.duty_by_cfc(9).unwrap();
        assert_eq!(duty.quest_id, ElementId::Quest(300));
        assert_eq!(duty.sequence, 3);
        assert_eq!(registry.low_priority_duties().len(), 1);
        assert_eq!(registry.low_priority_duties()[0].content_finder_condition_id, 4);
        assert!(registry.duty_by_cfc(1).is_none());
    }

    #[test]
    fn test_quest_progress_rendering() {
        let info = QuestProgressInfo::new(ElementId::Quest(1), 3)
            .with_variables([0x12, 0, 3, 0x20, 0, 0]);

        assert_eq!(info.to_string(), "QW: 18(2) 0    3(3) 32    0 0");
        assert!(info.tooltip().starts_with("00010010\n00000000\n"));
        assert_eq!(info.tooltip().lines().count(), 6);
    }
}
