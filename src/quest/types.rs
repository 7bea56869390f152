use crate::quest::class_job::ClassJob;
use crate::quest::element_id::ElementId;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Sequence number the game reports once a quest only needs to be turned in
pub const QUEST_COMPLETE_SEQUENCE: u8 = 255;

/// A loaded quest plan together with where it came from
#[derive(Clone, Debug)]
pub struct Quest {
    pub id: ElementId,
    pub name: String,
    pub root: QuestRoot,
    pub source: QuestSource,
}

/// Where a quest plan was loaded from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestSource {
    /// Plans shipped alongside the binary
    ProjectDirectory,
    /// Plans the user dropped into their own quest directory
    UserDirectory,
    /// Plans constructed in memory
    Inline,
}

/// Root object of a quest plan file
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct QuestRoot {
    #[serde(default, deserialize_with = "string_or_list")]
    pub author: Vec<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default = "default_true")]
    pub interruptible: bool,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub last_checked: LastChecked,
    #[serde(default)]
    pub quest_sequence: Vec<QuestSequence>,
}

/// One numbered phase of a quest
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct QuestSequence {
    pub sequence: u8,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub steps: Vec<QuestStep>,
}

/// One discrete interaction inside a sequence
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct QuestStep {
    pub interaction_type: InteractionType,
    pub data_id: Option<u32>,
    pub position: Option<Position>,
    pub territory_id: u16,
    pub stop_distance: Option<f32>,
    pub fly: bool,
    pub sprint: Option<bool>,
    pub item_id: Option<u32>,
    pub item_count: Option<u32>,
    pub item_quality: ItemQuality,
    pub target_class: Option<ClassJob>,
    pub duty_options: Option<DutyOptions>,
    pub items_to_gather: Vec<GatheredItem>,
    pub aethernet_shortcut: Option<String>,
    pub delay_seconds: Option<u32>,
    pub comment: Option<String>,
    pub skip_conditions: SkipConditions,
}

/// What a step asks the character to do.
///
/// Stored as a plain string in quest files. Names this engine does not know
/// are preserved in [`InteractionType::Unknown`] so the step compiler can
/// report them instead of silently skipping the step.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum InteractionType {
    #[default]
    None,
    WalkTo,
    Interact,
    AcceptQuest,
    CompleteQuest,
    Craft,
    Gather,
    Dive,
    EquipItem,
    UnequipItem,
    EquipRecommended,
    UpdateGearset,
    CreateGearset,
    Duty,
    SinglePlayerDuty,
    Combat,
    WaitForManualProgress,
    Instruction,
    Wait,
    Unknown(String),
}

const NAMED_INTERACTIONS: [InteractionType; 19] = [
    InteractionType::None,
    InteractionType::WalkTo,
    InteractionType::Interact,
    InteractionType::AcceptQuest,
    InteractionType::CompleteQuest,
    InteractionType::Craft,
    InteractionType::Gather,
    InteractionType::Dive,
    InteractionType::EquipItem,
    InteractionType::UnequipItem,
    InteractionType::EquipRecommended,
    InteractionType::UpdateGearset,
    InteractionType::CreateGearset,
    InteractionType::Duty,
    InteractionType::SinglePlayerDuty,
    InteractionType::Combat,
    InteractionType::WaitForManualProgress,
    InteractionType::Instruction,
    InteractionType::Wait,
];

impl InteractionType {
    pub fn as_str(&self) -> &str {
        match self {
            InteractionType::None => "None",
            InteractionType::WalkTo => "WalkTo",
            InteractionType::Interact => "Interact",
            InteractionType::AcceptQuest => "AcceptQuest",
            InteractionType::CompleteQuest => "CompleteQuest",
            InteractionType::Craft => "Craft",
            InteractionType::Gather => "Gather",
            InteractionType::Dive => "Dive",
            InteractionType::EquipItem => "EquipItem",
            InteractionType::UnequipItem => "UnequipItem",
            InteractionType::EquipRecommended => "EquipRecommended",
            InteractionType::UpdateGearset => "UpdateGearset",
            InteractionType::CreateGearset => "CreateGearset",
            InteractionType::Duty => "Duty",
            InteractionType::SinglePlayerDuty => "SinglePlayerDuty",
            InteractionType::Combat => "Combat",
            InteractionType::WaitForManualProgress => "WaitForManualProgress",
            InteractionType::Instruction => "Instruction",
            InteractionType::Wait => "Wait",
            InteractionType::Unknown(name) => name,
        }
    }

    /// Interaction types that need no task of their own beyond movement
    pub fn is_no_op(&self) -> bool {
        matches!(self, InteractionType::None | InteractionType::WalkTo)
    }
}

impl From<String> for InteractionType {
    fn from(value: String) -> Self {
        NAMED_INTERACTIONS
            .iter()
            .find(|candidate| candidate.as_str() == value)
            .cloned()
            .unwrap_or(InteractionType::Unknown(value))
    }
}

impl From<InteractionType> for String {
    fn from(value: InteractionType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// World position in game units
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Required item quality when counting owned items
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ItemQuality {
    #[default]
    Any,
    NQ,
    HQ,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct DutyOptions {
    pub content_finder_condition_id: u32,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub low_priority: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct GatheredItem {
    pub item_id: u32,
    pub item_count: u32,
    #[serde(default)]
    pub collectability: u16,
    #[serde(default)]
    pub class_job: Option<ClassJob>,
}

/// Conditions under which a step is considered already done
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct SkipConditions {
    /// Never skip, even when another condition would match
    pub never: bool,
    pub in_territory: Vec<u16>,
    pub not_in_territory: Vec<u16>,
    pub quests_completed: Vec<ElementId>,
    pub quests_accepted: Vec<ElementId>,
    pub item: Option<SkipItemCondition>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct SkipItemCondition {
    pub item_id: u32,
    pub minimum_count: u32,
    #[serde(default)]
    pub quality: ItemQuality,
}

impl SkipConditions {
    pub fn is_empty(&self) -> bool {
        self.in_territory.is_empty()
            && self.not_in_territory.is_empty()
            && self.quests_completed.is_empty()
            && self.quests_accepted.is_empty()
            && self.item.is_none()
    }
}

/// Who last verified a quest plan, and when
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct LastChecked {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl LastChecked {
    pub fn to_date(&self) -> Option<NaiveDate> {
        self.date
            .as_deref()
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
    }

    /// Days elapsed between the check and `today`
    pub fn days_since(&self, today: NaiveDate) -> Option<i64> {
        self.to_date().map(|date| (today - date).num_days())
    }
}

impl fmt::Display for LastChecked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.date, &self.username) {
            (Some(date), Some(username)) => write!(f, "{} by {}", date, username),
            (Some(date), None) => write!(f, "{}", date),
            (None, Some(username)) => write!(f, "by {}", username),
            (None, None) => Ok(()),
        }
    }
}

impl Quest {
    pub fn find_sequence(&self, sequence: u8) -> Option<&QuestSequence> {
        self.root
            .quest_sequence
            .iter()
            .find(|candidate| candidate.sequence == sequence)
    }

    pub fn all_sequences(&self) -> impl Iterator<Item = &QuestSequence> {
        self.root.quest_sequence.iter()
    }

    pub fn is_disabled(&self) -> bool {
        self.root.disabled
    }

    /// Step at `(sequence, step)` if both exist
    pub fn find_step(&self, sequence: u8, step: usize) -> Option<&QuestStep> {
        self.find_sequence(sequence).and_then(|s| s.find_step(step))
    }
}

impl QuestSequence {
    pub fn find_step(&self, step: usize) -> Option<&QuestStep> {
        self.steps.get(step)
    }
}

fn default_true() -> bool {
    true
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(author) => vec![author],
        OneOrMany::Many(authors) => authors,
    })
}

impl Default for QuestRoot {
    fn default() -> Self {
        Self {
            author: Vec::new(),
            disabled: false,
            interruptible: true,
            comment: None,
            last_checked: LastChecked::default(),
            quest_sequence: Vec::new(),
        }
    }
}
