use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, FromRepr};

/// Object item types (`ITEM_*`). Gaps are retired types kept for file compatibility.
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
pub enum ItemType {
    #[default]
    Undefined = 0,
    Weapon = 1,
    Worn = 2,
    Other = 3,
    Container = 4,
    DrinkCon = 5,
    Food = 6,
    Boat = 7,
    Portal = 8,
    Board = 9,
    Corpse = 10,
    Coins = 11,
    Mail = 14,
    Wealth = 15,
    Cart = 16,
    Ship = 17,
    Helm = 18,
    Window = 19,
    MissileWeapon = 20,
    Arrow = 21,
    Instrument = 22,
    Shield = 23,
    Pack = 24,
    Potion = 25,
    Poison = 26,
    Armor = 27,
    Book = 28,
}

impl ItemType {
    /// Builder-facing name as scripts see it in `%obj.type%`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Undefined => "UNDEFINED",
            Self::Weapon => "WEAPON",
            Self::Worn => "WORN",
            Self::Other => "OTHER",
            Self::Container => "CONTAINER",
            Self::DrinkCon => "DRINKCON",
            Self::Food => "FOOD",
            Self::Boat => "BOAT",
            Self::Portal => "PORTAL",
            Self::Board => "*BOARD",
            Self::Corpse => "*CORPSE",
            Self::Coins => "COINS",
            Self::Mail => "*MAIL",
            Self::Wealth => "WEALTH",
            Self::Cart => "CART",
            Self::Ship => "*SHIP",
            Self::Helm => "*HELM",
            Self::Window => "*WINDOW",
            Self::MissileWeapon => "MISSILE_WEAPON",
            Self::Arrow => "ARROW",
            Self::Instrument => "INSTRUMENT",
            Self::Shield => "SHIELD",
            Self::Pack => "PACK",
            Self::Potion => "POTION",
            Self::Poison => "POISON",
            Self::Armor => "ARMOR",
            Self::Book => "BOOK",
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, Self::Container | Self::Corpse)
    }
}
