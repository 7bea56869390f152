use serde::{Deserialize, Serialize};
use std::fmt;

/// Character class or job, numbered the way the game numbers them
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ClassJob {
    Adventurer = 0,
    Gladiator = 1,
    Pugilist = 2,
    Marauder = 3,
    Lancer = 4,
    Archer = 5,
    Conjurer = 6,
    Thaumaturge = 7,
    Carpenter = 8,
    Blacksmith = 9,
    Armorer = 10,
    Goldsmith = 11,
    Leatherworker = 12,
    Weaver = 13,
    Alchemist = 14,
    Culinarian = 15,
    Miner = 16,
    Botanist = 17,
    Fisher = 18,
    Paladin = 19,
    Monk = 20,
    Warrior = 21,
    Dragoon = 22,
    Bard = 23,
    WhiteMage = 24,
    BlackMage = 25,
    Arcanist = 26,
    Summoner = 27,
    Scholar = 28,
    Rogue = 29,
    Ninja = 30,
    Machinist = 31,
    DarkKnight = 32,
    Astrologian = 33,
    Samurai = 34,
    RedMage = 35,
    BlueMage = 36,
    Gunbreaker = 37,
    Dancer = 38,
    Reaper = 39,
    Sage = 40,
    Viper = 41,
    Pictomancer = 42,
}

const ALL: [ClassJob; 43] = [
    ClassJob::Adventurer,
    ClassJob::Gladiator,
    ClassJob::Pugilist,
    ClassJob::Marauder,
    ClassJob::Lancer,
    ClassJob::Archer,
    ClassJob::Conjurer,
    ClassJob::Thaumaturge,
    ClassJob::Carpenter,
    ClassJob::Blacksmith,
    ClassJob::Armorer,
    ClassJob::Goldsmith,
    ClassJob::Leatherworker,
    ClassJob::Weaver,
    ClassJob::Alchemist,
    ClassJob::Culinarian,
    ClassJob::Miner,
    ClassJob::Botanist,
    ClassJob::Fisher,
    ClassJob::Paladin,
    ClassJob::Monk,
    ClassJob::Warrior,
    ClassJob::Dragoon,
    ClassJob::Bard,
    ClassJob::WhiteMage,
    ClassJob::BlackMage,
    ClassJob::Arcanist,
    ClassJob::Summoner,
    ClassJob::Scholar,
    ClassJob::Rogue,
    ClassJob::Ninja,
    ClassJob::Machinist,
    ClassJob::DarkKnight,
    ClassJob::Astrologian,
    ClassJob::Samurai,
    ClassJob::RedMage,
    ClassJob::BlueMage,
    ClassJob::Gunbreaker,
    ClassJob::Dancer,
    ClassJob::Reaper,
    ClassJob::Sage,
    ClassJob::Viper,
    ClassJob::Pictomancer,
];

impl ClassJob {
    /// Disciples of the Hand, in recipe-table order
    pub const CRAFTERS: [ClassJob; 8] = [
        ClassJob::Carpenter,
        ClassJob::Blacksmith,
        ClassJob::Armorer,
        ClassJob::Goldsmith,
        ClassJob::Leatherworker,
        ClassJob::Weaver,
        ClassJob::Alchemist,
        ClassJob::Culinarian,
    ];

    pub fn from_id(id: u8) -> Option<Self> {
        ALL.get(id as usize).copied()
    }

    pub fn id(&self) -> u8 {
        *self as u8
    }

    pub fn is_crafter(&self) -> bool {
        (8..=15).contains(&self.id())
    }

    pub fn is_gatherer(&self) -> bool {
        (16..=18).contains(&self.id())
    }

    /// Index into a per-crafter table such as a recipe lookup row
    pub fn crafter_index(&self) -> Option<usize> {
        self.is_crafter().then(|| (self.id() - 8) as usize)
    }
}

impl fmt::Display for ClassJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
