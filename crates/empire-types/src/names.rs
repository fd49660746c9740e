/// A script or builder supplied a name that is not in the target vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("unknown {kind} '{name}'")]
    Unknown { kind: &'static str, name: String },
}

/// Finds `arg` in a name table, case-insensitively.
///
/// With `exact == false` the argument may be an abbreviation of the entry
/// (the first entry it abbreviates wins). Empty arguments never match.
pub fn search_block(arg: &str, list: &[&str], exact: bool) -> Option<usize> {
    if arg.is_empty() {
        return None;
    }
    if exact {
        return list.iter().position(|entry| entry.eq_ignore_ascii_case(arg));
    }
    list.iter().position(|entry| {
        entry.len() >= arg.len()
            && entry.is_char_boundary(arg.len())
            && entry[..arg.len()].eq_ignore_ascii_case(arg)
    })
}

/// A flag set whose bits are named by position in a static table.
pub trait NamedFlags: Sized + Copy {
    const KIND: &'static str;
    const NAMES: &'static [&'static str];

    /// The flag for bit `idx`, if that bit is defined.
    fn from_index(idx: usize) -> Option<Self>;

    /// All bits currently set, as raw positions.
    fn indices(self) -> Vec<usize>;

    /// Looks up a single flag by (possibly abbreviated) name.
    fn from_script_name(name: &str) -> Result<Self, NameError> {
        search_block(name, Self::NAMES, false)
            .and_then(Self::from_index)
            .ok_or_else(|| NameError::Unknown {
                kind: Self::KIND,
                name: name.to_string(),
            })
    }

    /// Space-separated names of the set bits, or "none".
    fn display_names(self) -> String {
        let names: Vec<&str> = self
            .indices()
            .into_iter()
            .filter_map(|i| Self::NAMES.get(i).copied())
            .collect();
        if names.is_empty() {
            "none".to_string()
        } else {
            names.join(" ")
        }
    }
}

/// Implements [`NamedFlags`] for a `bitflags` type with a `u32` repr.
#[macro_export]
macro_rules! named_flags {
    ($ty:ty, $kind:literal, $names:expr) => {
        impl $crate::names::NamedFlags for $ty {
            const KIND: &'static str = $kind;
            const NAMES: &'static [&'static str] = $names;

            fn from_index(idx: usize) -> Option<Self> {
                if idx >= 32 || idx >= Self::NAMES.len() {
                    return None;
                }
                Self::from_bits(1u32 << idx)
            }

            fn indices(self) -> Vec<usize> {
                (0..32).filter(|i| self.bits() & (1u32 << i) != 0).collect()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: &[&str] = &["north", "east", "south", "west", "northwest"];

    #[test]
    fn exact_lookup_ignores_case() {
        assert_eq!(search_block("EAST", LIST, true), Some(1));
        assert_eq!(search_block("eas", LIST, true), None);
    }

    #[test]
    fn abbreviation_takes_first_match() {
        assert_eq!(search_block("no", LIST, false), Some(0));
        assert_eq!(search_block("northw", LIST, false), Some(4));
        assert_eq!(search_block("up", LIST, false), None);
    }

    #[test]
    fn empty_never_matches() {
        assert_eq!(search_block("", LIST, false), None);
    }
}
