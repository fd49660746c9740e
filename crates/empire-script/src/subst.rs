//! `%var.field(arg)%` substitution.

use empire_world::World;

use crate::builtins::process_eval;
use crate::exec::Exec;
use crate::fields::find_replacement;

/// Expands every `%...%` reference in `line`.
///
/// `%%` is a literal percent and a trailing lone `%` is dropped. A dot inside
/// a field resolves what has been read so far into the temporary `tmpvr` and
/// continues from there, so `%actor.fighting.name%` walks two hops. Text in
/// parentheses is substituted on its own before the field sees it. Output
/// stops at the configured budget.
pub fn var_subst(world: &mut World, ex: &Exec, line: &str) -> String {
    if !line.contains('%') {
        return line.to_string();
    }
    let chars: Vec<char> = line.chars().collect();
    let mut left = world.config.output_budget;
    let mut out = String::with_capacity(line.len());
    let mut paren = 0i32;
    let mut i = 0;

    while i < chars.len() && left > 0 {
        while i < chars.len() && chars[i] != '%' && left > 0 {
            out.push(chars[i]);
            i += 1;
            left -= 1;
        }
        if i >= chars.len() || left == 0 {
            break;
        }
        i += 1;
        if i >= chars.len() {
            break;
        }
        if chars[i] == '%' {
            out.push('%');
            i += 1;
            left -= 1;
            continue;
        }

        let start = i;
        while i < chars.len() && chars[i] != '%' && chars[i] != '.' {
            i += 1;
        }
        let mut var: String = chars[start..i].iter().collect();
        let mut field = String::new();
        let mut subfield = String::new();

        if i < chars.len() && chars[i] == '.' {
            i += 1;
            let mut dots = 0;
            let mut field_open = true;
            while i < chars.len() && (chars[i] != '%' || paren > 0 || dots > 0) {
                let c = chars[i];
                i += 1;
                if dots > 0 {
                    dots = 0;
                    let repl = find_replacement(world, ex, &var, &field, &subfield);
                    if !repl.is_empty() {
                        process_eval(world, ex, &format!("eval tmpvr {repl}"));
                        var = "tmpvr".to_string();
                        field = c.to_string();
                        // A later hop never sees an earlier hop's subfield,
                        // so `%a.b(x).c%` calls `c` with no argument.
                        subfield.clear();
                        field_open = true;
                    }
                    continue;
                }
                match c {
                    '(' => {
                        paren += 1;
                        field_open = false;
                    }
                    ')' => {
                        paren -= 1;
                        field_open = false;
                    }
                    _ if paren > 0 => subfield.push(c),
                    '.' => {
                        dots += 1;
                        field_open = false;
                    }
                    _ if field_open => field.push(c),
                    _ => {}
                }
            }
        }
        // closing '%'
        i += 1;

        if !subfield.is_empty() {
            subfield = var_subst(world, ex, &subfield);
        }
        let repl = find_replacement(world, ex, &var, &field, &subfield);
        let taken: String = repl.chars().take(left).collect();
        left -= taken.chars().count();
        out.push_str(&taken);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use empire_world::Value;

    #[test]
    fn lines_without_percent_are_untouched() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        for line in ["say hello", "", "  spaced  out  ", "a.b(c)"] {
            assert_eq!(var_subst(&mut fx.world, &ex, line), line);
        }
    }

    #[test]
    fn doubled_percent_is_literal() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        assert_eq!(var_subst(&mut fx.world, &ex, "100%% done"), "100% done");
        assert_eq!(var_subst(&mut fx.world, &ex, "trailing %"), "trailing ");
    }

    #[test]
    fn locals_and_unknowns() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        ex.set_local(&mut fx.world, "who", Value::from("Bob"));
        assert_eq!(var_subst(&mut fx.world, &ex, "hi %who%!"), "hi Bob!");
        assert_eq!(var_subst(&mut fx.world, &ex, "hi %nobody%!"), "hi !");
        assert_eq!(var_subst(&mut fx.world, &ex, "%who.strlen%"), "3");
    }

    #[test]
    fn subfields_are_substituted_first() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        ex.set_local(&mut fx.world, "word", Value::from("banana"));
        ex.set_local(&mut fx.world, "ch", Value::from("n"));
        assert_eq!(var_subst(&mut fx.world, &ex, "%word.index_of(%ch%)%"), "3");
    }

    #[test]
    fn each_hop_starts_without_a_subfield() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        ex.set_local(&mut fx.world, "word", Value::from("1ab"));
        assert_eq!(var_subst(&mut fx.world, &ex, "%word.index_of(1)%"), "1");
        // `contains` gets an empty needle, not the `1` from the first hop
        assert_eq!(var_subst(&mut fx.world, &ex, "%word.index_of(1).contains%"), "0");
        assert_eq!(var_subst(&mut fx.world, &ex, "%word.index_of(1).contains(1)%"), "1");
    }

    #[test]
    fn dotted_chains_walk_entities() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        let uid = fx.player_uid();
        ex.set_local(&mut fx.world, "actor", Value::from(uid.as_str()));
        let room = var_subst(&mut fx.world, &ex, "%actor.room.name%");
        assert_eq!(room, "Town Square");
    }

    #[test]
    fn output_respects_budget() {
        let mut fx = Fixture::new();
        fx.world.config.output_budget = 8;
        let ex = fx.exec_on_mob(&["nop"]);
        ex.set_local(&mut fx.world, "long", Value::from("abcdefghijkl"));
        assert_eq!(var_subst(&mut fx.world, &ex, "x %long%"), "x abcdef");
    }
}
