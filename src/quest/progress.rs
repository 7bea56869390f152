use crate::quest::class_job::ClassJob;
use crate::quest::element_id::ElementId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw per-quest progress as reported by the quest-state oracle.
///
/// `variables` holds the six quest-work bytes. Combat objectives usually
/// count kills in a low nibble and reset it to 0 when the sequence advances.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct QuestProgressInfo {
    pub id: ElementId,
    pub sequence: u8,
    pub flags: u16,
    pub variables: Vec<u8>,
    pub is_hidden: bool,
    pub class_job: Option<ClassJob>,
}

impl QuestProgressInfo {
    pub fn new(id: ElementId, sequence: u8) -> Self {
        Self {
            id,
            sequence,
            flags: 0,
            variables: vec![0; 6],
            is_hidden: false,
            class_job: None,
        }
    }

    pub fn with_variables(mut self, variables: impl Into<Vec<u8>>) -> Self {
        self.variables = variables.into();
        self
    }

    pub fn with_class_job(mut self, class_job: ClassJob) -> Self {
        self.class_job = Some(class_job);
        self
    }

    /// One zero-padded binary line per variable byte
    pub fn tooltip(&self) -> String {
        self.variables
            .iter()
            .map(|byte| format!("{:08b}\n", byte))
            .collect()
    }
}

impl fmt::Display for QuestProgressInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut repr = String::new();
        for (i, byte) in self.variables.iter().enumerate() {
            repr.push_str(&byte.to_string());
            let low = byte & 0x0F;
            if low != 0 {
                repr.push_str(&format!("({})", low));
            }
            repr.push(' ');
            if i % 2 == 1 {
                repr.push_str("   ");
            }
        }
        write!(f, "QW: {}", repr.trim())
    }
}
