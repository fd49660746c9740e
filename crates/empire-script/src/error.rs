use empire_world::WorldError;

/// Why a built-in or interpreter command did nothing. The driver turns these
/// into `script_log` lines; none of them stop the trigger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("{0} w/o an arg")]
    MissingArg(&'static str),
    #[error("{cmd} invalid {what}")]
    Invalid { cmd: &'static str, what: String },
    #[error("{0}")]
    Other(String),
    #[error(transparent)]
    World(#[from] WorldError),
}

impl ScriptError {
    pub fn invalid(cmd: &'static str, what: impl Into<String>) -> Self {
        Self::Invalid {
            cmd,
            what: what.into(),
        }
    }
}

/// A malformed trigger definition file.
#[derive(Debug, thiserror::Error)]
pub enum TriggerFileError {
    #[error("line {line}: {msg}")]
    Parse { line: usize, msg: String },
}

pub(crate) fn parse_err(line_num: usize, msg: impl Into<String>) -> TriggerFileError {
    TriggerFileError::Parse {
        line: line_num + 1,
        msg: msg.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(ScriptError::MissingArg("set").to_string(), "set w/o an arg");
        assert_eq!(
            ScriptError::invalid("attach", "id arg").to_string(),
            "attach invalid id arg"
        );
        assert_eq!(parse_err(0, "bad").to_string(), "line 1: bad");
    }
}
