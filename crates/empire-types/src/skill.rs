use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, FromRepr};

use crate::names::{NameError, search_block};

/// Highest level any skill can be set to.
pub const CLASS_SKILL_CAP: i32 = 100;

/// Skill trees players advance in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumCount, FromRepr,
)]
#[repr(u8)]
pub enum Skill {
    Battle = 0,
    Empire = 1,
    HighSorcery = 2,
    NaturalMagic = 3,
    Stealth = 4,
    Survival = 5,
    Trade = 6,
    Vampire = 7,
}

const SKILL_NAMES: [&str; Skill::COUNT] = [
    "Battle",
    "Empire",
    "High Sorcery",
    "Natural Magic",
    "Stealth",
    "Survival",
    "Trade",
    "Vampire",
];

impl Skill {
    pub fn name(self) -> &'static str {
        SKILL_NAMES[self as usize]
    }

    /// Exact names win over abbreviations, so "e" is Empire only when no
    /// skill is literally called "e".
    pub fn from_name(name: &str) -> Result<Self, NameError> {
        let name = name.trim();
        search_block(name, &SKILL_NAMES, true)
            .or_else(|| search_block(name, &SKILL_NAMES, false))
            .and_then(|i| Self::from_repr(i as u8))
            .ok_or_else(|| NameError::Unknown {
                kind: "skill",
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name_and_prefix() {
        assert_eq!(Skill::from_name("trade"), Ok(Skill::Trade));
        assert_eq!(Skill::from_name("high"), Ok(Skill::HighSorcery));
        assert_eq!(Skill::from_name(" Natural Magic "), Ok(Skill::NaturalMagic));
        assert!(Skill::from_name("cooking").is_err());
        assert!(Skill::from_name("").is_err());
    }
}
