use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, FromRepr};

use crate::names::search_block;

/// Directions (`dirs[]`). The first eight are map directions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumCount, FromRepr,
)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
    Northwest = 4,
    Northeast = 5,
    Southwest = 6,
    Southeast = 7,
    Up = 8,
    Down = 9,
    Fore = 10,
    Starboard = 11,
    Port = 12,
    Aft = 13,
}

/// Directions that move across the flat map.
pub const NUM_2D_DIRS: usize = 8;

const DIR_NAMES: [&str; Direction::COUNT] = [
    "north",
    "east",
    "south",
    "west",
    "northwest",
    "northeast",
    "southwest",
    "southeast",
    "up",
    "down",
    "fore",
    "starboard",
    "port",
    "aft",
];

impl Direction {
    pub fn name(self) -> &'static str {
        DIR_NAMES[self as usize]
    }

    /// Parses a full or abbreviated direction name.
    pub fn parse(arg: &str) -> Option<Self> {
        search_block(arg, &DIR_NAMES, false).and_then(|i| Self::from_repr(i as u8))
    }

    /// Map offset `(dx, dy)`; non-map directions do not shift.
    pub fn shift(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
            Self::West => (-1, 0),
            Self::Northwest => (-1, 1),
            Self::Northeast => (1, 1),
            Self::Southwest => (-1, -1),
            Self::Southeast => (1, -1),
            _ => (0, 0),
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::Northwest => Self::Southeast,
            Self::Northeast => Self::Southwest,
            Self::Southwest => Self::Northeast,
            Self::Southeast => Self::Northwest,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Fore => Self::Aft,
            Self::Aft => Self::Fore,
            Self::Starboard => Self::Port,
            Self::Port => Self::Starboard,
        }
    }

    pub fn is_map_dir(self) -> bool {
        (self as usize) < NUM_2D_DIRS
    }
}
