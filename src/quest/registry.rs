use crate::quest::element_id::ElementId;
use crate::quest::types::*;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors raised while loading quest plan files
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse quest file '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Quest file '{path}' has an invalid quest id '{id}'")]
    InvalidQuestId { path: PathBuf, id: String },
}

/// A duty step the registry knows how to reach by content finder condition
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DutyReference {
    pub content_finder_condition_id: u32,
    pub quest_id: ElementId,
    pub sequence: u8,
}

/// Read-only collection of quest plans, loaded once and replaced on reload
#[derive(Debug, Default)]
pub struct QuestRegistry {
    quests: HashMap<ElementId, Quest>,
    content_finder_conditions: HashMap<u32, DutyReference>,
    low_priority_duties: Vec<DutyReference>,
    directories: Vec<(PathBuf, QuestSource)>,
    load_issues: Vec<String>,
}

fn quest_file_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9]+)_(.+)\.json$").expect("quest file pattern is a valid regex")
    })
}

impl QuestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directory to be scanned on every reload
    pub fn with_directory(mut self, path: impl Into<PathBuf>, source: QuestSource) -> Self {
        self.directories.push((path.into(), source));
        self
    }

    /// Drop everything and scan all registered directories again.
    ///
    /// A directory that fails part-way keeps the quests loaded before the
    /// failure; the error is logged and kept in [`QuestRegistry::load_issues`].
    pub fn reload(&mut self) {
        self.quests.clear();
        self.load_issues.clear();

        let directories = self.directories.clone();
        for (path, source) in directories {
            if !path.exists() {
                debug!("Quest directory {} does not exist, skipping", path.display());
                continue;
            }
            if let Err(e) = self.load_from_directory(&path, source) {
                error!(
                    "Failed to load all quests from {} (some may have been loaded): {}",
                    path.display(),
                    e
                );
                self.load_issues.push(e.to_string());
            }
        }

        self.rebuild_duty_index();
        info!("Loaded {} quests in total", self.quests.len());
    }

    /// Load every `<id>_<name>.json` below `path`, recursively
    pub fn load_from_directory(
        &mut self,
        path: &Path,
        source: QuestSource,
    ) -> Result<usize, RegistryError> {
        let entries = fs::read_dir(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        paths.sort();

        let mut loaded = 0;
        for entry in paths {
            if entry.is_dir() {
                loaded += self.load_from_directory(&entry, source)?;
            } else if let Some(quest) = Self::load_file(&entry, source)? {
                debug!("Loaded quest {} from {}", quest.id, entry.display());
                self.quests.insert(quest.id, quest);
                loaded += 1;
            }
        }
        self.rebuild_duty_index();
        Ok(loaded)
    }

    /// Parse a single quest file; `Ok(None)` for files that are not quest plans
    pub fn load_file(path: &Path, source: QuestSource) -> Result<Option<Quest>, RegistryError> {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return Ok(None);
        };
        if !file_name.ends_with(".json") {
            return Ok(None);
        }
        let Some(captures) = quest_file_pattern().captures(file_name) else {
            debug!("Ignoring {}: no quest id in file name", file_name);
            return Ok(None);
        };

        let raw_id = &captures[1];
        let id: ElementId = raw_id.parse().map_err(|_| RegistryError::InvalidQuestId {
            path: path.to_path_buf(),
            id: raw_id.to_string(),
        })?;

        let content = fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let root: QuestRoot =
            serde_json::from_str(&content).map_err(|source| RegistryError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Some(Quest {
            id,
            name: captures[2].replace('_', " "),
            root,
            source,
        }))
    }

    /// Add or replace a quest built in memory
    pub fn insert(&mut self, quest: Quest) {
        if self.quests.insert(quest.id, quest).is_some() {
            warn!("Replaced an already registered quest");
        }
        self.rebuild_duty_index();
    }

    pub fn try_get_quest(&self, id: &ElementId) -> Option<&Quest> {
        self.quests.get(id)
    }

    pub fn is_known_quest(&self, id: &ElementId) -> bool {
        self.quests.contains_key(id)
    }

    /// Number of quests that are not disabled
    pub fn count(&self) -> usize {
        self.quests.values().filter(|q| !q.is_disabled()).count()
    }

    pub fn all_quests(&self) -> impl Iterator<Item = &Quest> {
        self.quests.values()
    }

    pub fn duty_by_cfc(&self, content_finder_condition_id: u32) -> Option<&DutyReference> {
        self.content_finder_conditions
            .get(&content_finder_condition_id)
    }

    pub fn low_priority_duties(&self) -> &[DutyReference] {
        &self.low_priority_duties
    }

    pub fn load_issues(&self) -> &[String] {
        &self.load_issues
    }

    fn rebuild_duty_index(&mut self) {
        self.content_finder_conditions.clear();
        self.low_priority_duties.clear();

        let mut quests: Vec<&Quest> = self.quests.values().collect();
        quests.sort_by_key(|q| q.id);

        for quest in quests {
            for sequence in quest.all_sequences() {
                for step in &sequence.steps {
                    if step.interaction_type != InteractionType::Duty {
                        continue;
                    }
                    let Some(options) = &step.duty_options else {
                        continue;
                    };
                    let reference = DutyReference {
                        content_finder_condition_id: options.content_finder_condition_id,
                        quest_id: quest.id,
                        sequence: sequence.sequence,
                    };
                    if options.low_priority {
                        self.low_priority_duties.push(reference.clone());
                    }
                    self.content_finder_conditions
                        .insert(options.content_finder_condition_id, reference);
                }
            }
        }
    }
}
