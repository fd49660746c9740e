use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, FromRepr};

use crate::names::{NameError, search_block};

/// Locations an affect can modify (`APPLY_*`).
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumCount,
    FromRepr,
)]
#[repr(u8)]
pub enum ApplyType {
    #[default]
    None = 0,
    Strength = 1,
    Dexterity = 2,
    HealthRegen = 3,
    Charisma = 4,
    Greatness = 5,
    MoveRegen = 6,
    ManaRegen = 7,
    Intelligence = 8,
    Wits = 9,
    Age = 10,
    MaxMove = 11,
    ResistPhysical = 12,
    Block = 13,
    HealOverTime = 14,
    MaxHealth = 15,
    MaxMana = 16,
    ToHit = 17,
    Dodge = 18,
    Inventory = 19,
    MaxBlood = 20,
    BonusPhysical = 21,
    BonusMagical = 22,
    BonusHealing = 23,
    ResistMagical = 24,
    Crafting = 25,
}

const APPLY_NAMES: [&str; ApplyType::COUNT] = [
    "NONE",
    "STRENGTH",
    "DEXTERITY",
    "HEALTH-REGEN",
    "CHARISMA",
    "GREATNESS",
    "MOVE-REGEN",
    "MANA-REGEN",
    "INTELLIGENCE",
    "WITS",
    "AGE",
    "MAX-MOVE",
    "RESIST-PHYSICAL",
    "BLOCK",
    "HEAL-OVER-TIME",
    "MAX-HEALTH",
    "MAX-MANA",
    "TO-HIT",
    "DODGE",
    "INVENTORY",
    "MAX-BLOOD",
    "BONUS-PHYSICAL",
    "BONUS-MAGICAL",
    "BONUS-HEALING",
    "RESIST-MAGICAL",
    "CRAFTING",
];

impl ApplyType {
    pub fn name(self) -> &'static str {
        APPLY_NAMES[self as usize]
    }

    /// Case-insensitive lookup, abbreviations allowed.
    pub fn from_name(name: &str) -> Result<Self, NameError> {
        search_block(name, &APPLY_NAMES, false)
            .and_then(|i| Self::from_repr(i as u8))
            .ok_or_else(|| NameError::Unknown {
                kind: "apply type",
                name: name.to_string(),
            })
    }

    /// The primary attribute this apply modifies, if any.
    pub fn attribute(self) -> Option<Attribute> {
        match self {
            Self::Strength => Some(Attribute::Strength),
            Self::Dexterity => Some(Attribute::Dexterity),
            Self::Charisma => Some(Attribute::Charisma),
            Self::Greatness => Some(Attribute::Greatness),
            Self::Intelligence => Some(Attribute::Intelligence),
            Self::Wits => Some(Attribute::Wits),
            _ => None,
        }
    }
}

/// Primary attributes (`STRENGTH` .. `WITS`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumCount, FromRepr,
)]
#[repr(u8)]
pub enum Attribute {
    Strength = 0,
    Dexterity = 1,
    Charisma = 2,
    Greatness = 3,
    Intelligence = 4,
    Wits = 5,
}
