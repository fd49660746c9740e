use crate::error::WorldError;
use crate::value::Value;

/// One script variable. Context 0 is visible to every caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Var {
    pub name: String,
    pub value: Value,
    pub context: i64,
}

impl Var {
    fn visible_to(&self, context: i64) -> bool {
        self.context == 0 || self.context == context
    }

    fn named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// An ordered variable list; index 0 is the head, new entries are prepended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarList {
    vars: Vec<Var>,
}

impl VarList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the first entry with this name if it is visible to
    /// `context`, otherwise prepends a new entry scoped to `context`.
    pub fn set(&mut self, name: &str, value: Value, context: i64) -> Result<(), WorldError> {
        if name.contains('.') {
            return Err(WorldError::IllegalVarName(name.to_string()));
        }
        match self.vars.iter_mut().find(|v| v.named(name)) {
            Some(var) if var.visible_to(context) => var.value = value,
            _ => self.vars.insert(
                0,
                Var {
                    name: name.to_string(),
                    value,
                    context,
                },
            ),
        }
        Ok(())
    }

    /// First entry with this name visible to `context`.
    pub fn get(&self, name: &str, context: i64) -> Option<&Var> {
        self.vars
            .iter()
            .find(|v| v.named(name) && v.visible_to(context))
    }

    /// First entry with this name in any context.
    pub fn find_any(&self, name: &str) -> Option<&Var> {
        self.vars.iter().find(|v| v.named(name))
    }

    /// Removes every entry with this name visible to `context`, including
    /// context-0 defaults other callers may rely on.
    pub fn remove(&mut self, name: &str, context: i64) -> bool {
        let before = self.vars.len();
        self.vars.retain(|v| !(v.named(name) && v.visible_to(context)));
        self.vars.len() != before
    }

    /// Removes only the first entry with this name visible to `context`.
    pub fn remove_first(&mut self, name: &str, context: i64) -> bool {
        match self
            .vars
            .iter()
            .position(|v| v.named(name) && v.visible_to(context))
        {
            Some(i) => {
                self.vars.remove(i);
                true
            }
            None => false,
        }
    }

    /// Removes the first entry with this name regardless of context.
    pub fn remove_any(&mut self, name: &str) -> bool {
        match self.vars.iter().position(|v| v.named(name)) {
            Some(i) => {
                self.vars.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.vars.clear();
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Var> {
        self.vars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(v: Option<&Var>) -> Option<String> {
        v.map(|v| v.value.to_string())
    }

    #[test]
    fn context_scoping() {
        let mut vars = VarList::new();
        vars.set("x", "1".into(), 5).expect("set");
        assert_eq!(vars.get("x", 7), None);
        assert_eq!(text(vars.get("x", 5)), Some("1".into()));

        vars.set("x", "2".into(), 0).expect("set");
        assert_eq!(text(vars.get("x", 7)), Some("2".into()));
        // the default was prepended, so it now wins for context 5 as well
        assert_eq!(text(vars.get("x", 5)), Some("2".into()));
        assert_eq!(vars.len(), 2);
        assert_eq!(vars.iter().map(|v| v.context).collect::<Vec<_>>(), vec![0, 5]);
    }

    #[test]
    fn set_overwrites_visible_entry() {
        let mut vars = VarList::new();
        vars.set("count", "1".into(), 0).expect("set");
        vars.set("COUNT", "2".into(), 9).expect("set");
        assert_eq!(vars.len(), 1);
        assert_eq!(text(vars.get("count", 0)), Some("2".into()));
    }

    #[test]
    fn set_only_checks_first_match() {
        let mut vars = VarList::new();
        vars.set("x", "default".into(), 0).expect("set");
        vars.set("x", "mine".into(), 3).expect("set");
        // head is still the context-0 entry, so it gets overwritten
        assert_eq!(vars.len(), 1);
        assert_eq!(text(vars.find_any("x")), Some("mine".into()));
    }

    #[test]
    fn dotted_names_are_rejected() {
        let mut vars = VarList::new();
        assert!(vars.set("a.b", "1".into(), 0).is_err());
        assert!(vars.is_empty());
    }

    #[test]
    fn remove_takes_context_zero_defaults_too() {
        let mut vars = VarList::new();
        vars.set("x", "default".into(), 0).expect("set");
        let mut other = VarList::new();
        other.set("x", "theirs".into(), 3).expect("set");
        vars.vars.extend(other.vars);

        assert!(vars.remove("x", 7));
        // context 3's entry is not visible to 7 and survives
        assert_eq!(text(vars.get("x", 3)), Some("theirs".into()));
        assert_eq!(vars.get("x", 7), None);
    }

    #[test]
    fn remove_first_leaves_the_rest() {
        let mut vars = VarList::new();
        vars.vars.push(Var {
            name: "x".into(),
            value: "a".into(),
            context: 0,
        });
        vars.vars.push(Var {
            name: "x".into(),
            value: "b".into(),
            context: 0,
        });
        assert!(vars.remove_first("x", 4));
        assert_eq!(text(vars.get("x", 4)), Some("b".into()));
    }

    #[test]
    fn last_prepended_wins() {
        let mut vars = VarList::new();
        vars.set("x", "old".into(), 2).expect("set");
        vars.set("x", "new".into(), 8).expect("set");
        assert_eq!(text(vars.find_any("x")), Some("new".into()));
    }
}
