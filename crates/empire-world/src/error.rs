use crate::entity::{RoomVnum, TrigVnum};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error("stale or unknown {0} handle")]
    StaleHandle(&'static str),
    #[error("no such room {0}")]
    UnknownRoom(RoomVnum),
    #[error("no such trigger {0}")]
    UnknownTrigger(TrigVnum),
    #[error("no such {kind} prototype {vnum}")]
    UnknownPrototype { kind: &'static str, vnum: i32 },
    #[error("illegal variable name '{0}'")]
    IllegalVarName(String),
    #[error("players cannot hold triggers")]
    PlayerScript,
}
