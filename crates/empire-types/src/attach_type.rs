use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, FromRepr};

/// Which kind of entity a trigger prototype attaches to (`*_TRIGGER` in `dg_scripts.h`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumCount, FromRepr,
)]
#[repr(u8)]
pub enum AttachType {
    Mob = 0,
    Obj = 1,
    Wld = 2,
    /// Room-template trigger; runs as a room trigger.
    Rmt = 3,
    /// Adventure-zone trigger; runs as a room trigger.
    Adv = 4,
    Veh = 5,
    /// Empire scripts have globals but no command interpreter.
    Emp = 6,
}

impl AttachType {
    /// The class a trigger actually executes as.
    pub fn effective(self) -> Self {
        match self {
            Self::Rmt | Self::Adv => Self::Wld,
            other => other,
        }
    }

    /// Command-stem prefix used by `%send%`, `%echo%` and friends.
    pub fn command_prefix(self) -> Option<char> {
        match self.effective() {
            Self::Mob => Some('m'),
            Self::Obj => Some('o'),
            Self::Wld => Some('w'),
            Self::Veh => Some('v'),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Mob => "Mobile",
            Self::Obj => "Object",
            Self::Wld => "Room",
            Self::Rmt => "Room template",
            Self::Adv => "Adventure",
            Self::Veh => "Vehicle",
            Self::Emp => "Empire",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn count() {
        assert_eq!(AttachType::COUNT, 7);
    }

    #[test]
    fn discriminants() {
        assert_eq!(AttachType::Mob as u8, 0);
        assert_eq!(AttachType::Veh as u8, 5);
    }

    #[test]
    fn room_classes_collapse() {
        assert_eq!(AttachType::Rmt.effective(), AttachType::Wld);
        assert_eq!(AttachType::Adv.effective(), AttachType::Wld);
        assert_eq!(AttachType::Adv.command_prefix(), Some('w'));
        assert_eq!(AttachType::Emp.command_prefix(), None);
    }

    #[test]
    fn round_trip() {
        for a in AttachType::iter() {
            assert_eq!(AttachType::from_repr(a as u8), Some(a));
        }
    }
}
