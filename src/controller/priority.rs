use crate::env::ipc::{PRIORITY_EXPORT_PREFIX, PRIORITY_SEPARATOR};
use crate::quest::{ElementId, ElementIdError};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PriorityCodecError {
    #[error("Priority list must start with 'qst:priority:'")]
    MissingPrefix,
    #[error("Priority list is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Priority list is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    InvalidId(#[from] ElementIdError),
}

/// Ordered list of quests to run before anything the game suggests.
///
/// Every mutation is idempotent: adding a quest already on the list and
/// removing one that is not both succeed without changing anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityList {
    quests: Vec<ElementId>,
}

impl PriorityList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, quest_id: &ElementId) -> bool {
        self.quests.contains(quest_id)
    }

    pub fn add(&mut self, quest_id: ElementId) -> bool {
        if !self.contains(&quest_id) {
            self.quests.push(quest_id);
        }
        true
    }

    /// Insert at `index`; false only when `index` is past the end
    pub fn insert(&mut self, index: usize, quest_id: ElementId) -> bool {
        if self.contains(&quest_id) {
            return true;
        }
        if index > self.quests.len() {
            return false;
        }
        self.quests.insert(index, quest_id);
        true
    }

    pub fn remove(&mut self, quest_id: &ElementId) -> bool {
        self.quests.retain(|candidate| candidate != quest_id);
        true
    }

    pub fn clear(&mut self) {
        self.quests.clear();
    }

    /// Replace the whole list, dropping duplicates
    pub fn replace(&mut self, quests: impl IntoIterator<Item = ElementId>) {
        self.quests.clear();
        for quest_id in quests {
            self.add(quest_id);
        }
    }

    pub fn as_slice(&self) -> &[ElementId] {
        &self.quests
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementId> {
        self.quests.iter()
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }

    pub fn encode(&self) -> String {
        encode_priority(&self.quests)
    }
}

/// `qst:priority:` followed by the base64 of the ids joined with `;`
pub fn encode_priority(quests: &[ElementId]) -> String {
    let joined = quests
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(&PRIORITY_SEPARATOR.to_string());
    format!("{}{}", PRIORITY_EXPORT_PREFIX, STANDARD.encode(joined))
}

pub fn decode_priority(encoded: &str) -> Result<Vec<ElementId>, PriorityCodecError> {
    let payload = encoded
        .trim()
        .strip_prefix(PRIORITY_EXPORT_PREFIX)
        .ok_or(PriorityCodecError::MissingPrefix)?;
    let decoded = String::from_utf8(STANDARD.decode(payload.trim())?)?;

    decoded
        .split(PRIORITY_SEPARATOR)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<ElementId>().map_err(PriorityCodecError::from))
        .collect()
}
