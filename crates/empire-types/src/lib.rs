pub mod names;

pub mod affect_flags;
pub mod apply_type;
pub mod attach_type;
pub mod condition;
pub mod direction;
pub mod item_type;
pub mod material;
pub mod mob_flags;
pub mod obj_flags;
pub mod player_flags;
pub mod position;
pub mod sex;
pub mod skill;
pub mod terrain;
pub mod trigger_flags;
pub mod wear_pos;

pub use affect_flags::AffFlags;
pub use apply_type::{ApplyType, Attribute};
pub use attach_type::AttachType;
pub use condition::{Condition, Sky, UNLIMITED};
pub use direction::{Direction, NUM_2D_DIRS};
pub use item_type::ItemType;
pub use material::Material;
pub use mob_flags::MobFlags;
pub use names::{NameError, NamedFlags, search_block};
pub use obj_flags::ObjFlags;
pub use player_flags::{BonusTraits, PlayerFlags, Preferences};
pub use position::{Position, REGEN_BY_POS};
pub use sex::Sex;
pub use skill::{CLASS_SKILL_CAP, Skill};
pub use terrain::{BuildingFlags, ExitFlags, Injuries, SectorFlags, VehicleFlags};
pub use trigger_flags::{MobTriggers, ObjTriggers, VehTriggers, WldTriggers, parse_flag_letters};
pub use wear_pos::{MoveType, WearPos};
