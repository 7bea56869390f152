use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Stable identifier for anything the engine can run: regular quests and the
/// synthetic ids used for content that is not a numbered quest.
///
/// The string form is what quest files, priority lists and the outward IPC
/// surface use:
///
/// | Kind | Example |
/// |---|---|
/// | quest | `1234` |
/// | leve | `L123` |
/// | satisfaction supply npc | `S5` |
/// | allied society daily | `A3x2` |
/// | unlock link | `U42` |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ElementId {
    Quest(u16),
    Leve(u16),
    SatisfactionSupply(u32),
    AlliedSocietyDaily { society: u8, rank: u8 },
    UnlockLink(u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElementIdError {
    #[error("Invalid element id '{0}'")]
    Invalid(String),
}

impl ElementId {
    /// Whether this id refers to a regular, numbered quest
    pub fn is_quest(&self) -> bool {
        matches!(self, ElementId::Quest(_))
    }
}

impl FromStr for ElementId {
    type Err = ElementIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ElementIdError::Invalid(value.to_string());
        let value = value.trim();

        if let Some(rest) = value.strip_prefix('L') {
            return rest.parse().map(ElementId::Leve).map_err(|_| invalid());
        }
        if let Some(rest) = value.strip_prefix('S') {
            return rest
                .parse()
                .map(ElementId::SatisfactionSupply)
                .map_err(|_| invalid());
        }
        if let Some(rest) = value.strip_prefix('U') {
            return rest.parse().map(ElementId::UnlockLink).map_err(|_| invalid());
        }
        if let Some(rest) = value.strip_prefix('A') {
            let (society, rank) = rest.split_once('x').ok_or_else(invalid)?;
            return Ok(ElementId::AlliedSocietyDaily {
                society: society.parse().map_err(|_| invalid())?,
                rank: rank.parse().map_err(|_| invalid())?,
            });
        }

        value.parse().map(ElementId::Quest).map_err(|_| invalid())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementId::Quest(id) => write!(f, "{}", id),
            ElementId::Leve(id) => write!(f, "L{}", id),
            ElementId::SatisfactionSupply(id) => write!(f, "S{}", id),
            ElementId::AlliedSocietyDaily { society, rank } => write!(f, "A{}x{}", society, rank),
            ElementId::UnlockLink(id) => write!(f, "U{}", id),
        }
    }
}

impl TryFrom<String> for ElementId {
    type Error = ElementIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ElementId> for String {
    fn from(value: ElementId) -> Self {
        value.to_string()
    }
}
