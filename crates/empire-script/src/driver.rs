//! The line-by-line trigger interpreter.

use empire_world::{EntityRef, TrigId, World};

use crate::builtins::{Flow, run_builtin};
use crate::exec::Exec;
use crate::expr::{eval_expr, eval_op, process_if};
use crate::interp::command_interpreter;
use crate::log::script_log;
use crate::subst::var_subst;

/// Whether a run starts at the top or picks up after a `wait`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    New,
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverResult {
    /// What the trigger `return`ed; 1 unless it said otherwise.
    pub ret_val: i32,
    /// The owner was extracted by its own script. Callers must not touch it.
    pub owner_purged: bool,
}

impl DriverResult {
    fn ret(ret_val: i32) -> Self {
        Self {
            ret_val,
            owner_purged: false,
        }
    }
}

/// Case-insensitive `strn_cmp(line, kw, kw.len()) == 0`.
fn starts(line: &str, kw: &str) -> bool {
    line.get(..kw.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(kw))
}

fn line(lines: &[String], i: usize) -> &str {
    lines[i].trim_start()
}

/// The `end` closing the `if` at `from`, skipping nested blocks. Falls back
/// to the last line.
fn find_end(lines: &[String], from: usize) -> usize {
    let last = lines.len().saturating_sub(1);
    if from >= last {
        return from;
    }
    let mut c = from + 1;
    while c < last {
        let p = line(lines, c);
        if starts(p, "if ") {
            c = find_end(lines, c);
        } else if starts(p, "end") {
            return c;
        }
        c += 1;
    }
    c.min(last)
}

/// Where a false `if` continues: the first `elseif` whose condition holds,
/// an `else`, or the closing `end`. Entering a branch deepens the trigger.
fn find_else_end(world: &mut World, ex: &Exec, lines: &[String], from: usize) -> usize {
    let last = lines.len().saturating_sub(1);
    if from >= last {
        return from;
    }
    let mut c = from + 1;
    while c < last {
        let p = line(lines, c);
        if starts(p, "if ") {
            c = find_end(lines, c);
        } else if starts(p, "elseif ") {
            if process_if(world, ex, &p[7..]) {
                adjust_depth(world, ex, 1);
                return c;
            }
        } else if starts(p, "else") {
            adjust_depth(world, ex, 1);
            return c;
        } else if starts(p, "end") {
            return c;
        }
        c += 1;
    }
    c.min(last)
}

/// The `done` closing the `while` or `switch` at `from`.
fn find_done(lines: &[String], from: usize) -> usize {
    let last = lines.len().saturating_sub(1);
    if from >= last {
        return from;
    }
    let mut c = from + 1;
    while c < last {
        let p = line(lines, c);
        if starts(p, "while ") || starts(p, "switch ") {
            c = find_done(lines, c);
        } else if starts(p, "done") {
            return c;
        }
        c += 1;
    }
    c.min(last)
}

/// The `case` matching the switch value, else `default` or `done`.
fn find_case(world: &mut World, ex: &Exec, lines: &[String], from: usize, cond: &str) -> usize {
    let value = eval_expr(world, ex, cond);
    let last = lines.len().saturating_sub(1);
    if from >= last {
        return from;
    }
    let mut c = from + 1;
    while c < last {
        let p = line(lines, c);
        if starts(p, "while ") || starts(p, "switch") {
            c = find_done(lines, c);
        } else if starts(p, "case ") {
            let hit = eval_op("==", &value, &p[5..]);
            if !hit.is_empty() && !hit.starts_with('0') {
                return c;
            }
        } else if starts(p, "default") || starts(p, "done") {
            return c;
        }
        c += 1;
    }
    c.min(last)
}

fn depth(world: &World, ex: &Exec) -> i32 {
    world.trigger(ex.owner, ex.trig).map_or(0, |t| t.depth)
}

fn adjust_depth(world: &mut World, ex: &Exec, delta: i32) {
    if let Some(t) = world.trigger_mut(ex.owner, ex.trig) {
        t.depth += delta;
    }
}

fn vnum(world: &World, ex: &Exec) -> i32 {
    ex.label(world).1
}

/// Runs trigger `trig` on `owner` until it finishes, halts or waits.
pub fn script_driver(world: &mut World, owner: EntityRef, trig: TrigId, mode: Mode) -> DriverResult {
    if world.script_depth > world.config.max_script_depth {
        script_log(world, "Triggers recursed beyond maximum allowed depth.");
        return DriverResult::ret(1);
    }
    let Some(ex) = Exec::new(world, owner, trig) else {
        return DriverResult::ret(1);
    };
    world.script_depth += 1;
    let result = run(world, &ex, mode);
    world.script_depth -= 1;
    result
}

/// What ended the main loop.
enum Stop {
    Finished,
    Suspended,
    Purged,
}

fn run(world: &mut World, ex: &Exec, mode: Mode) -> DriverResult {
    let mut ret_val = 1;
    let Some(t) = world.trigger_mut(ex.owner, ex.trig) else {
        return DriverResult::ret(ret_val);
    };
    let lines = t.proto.commands.clone();
    let start = match mode {
        Mode::New => {
            t.depth = 1;
            t.loops = 0;
            t.loop_origins.clear();
            0
        }
        Mode::Restart => {
            t.wait_event = None;
            match t.curr_state.take() {
                Some(resume) => resume,
                None => return DriverResult::ret(ret_val),
            }
        }
    };
    if mode == Mode::New {
        if let Some(sc) = world.script_mut(ex.owner) {
            sc.context = 0;
        }
    }
    let ceiling = world.config.loop_ceiling(world.max_inventory_size);

    let mut i = start;
    let mut stop = Stop::Finished;
    while i < lines.len() && depth(world, ex) > 0 {
        let p = line(&lines, i);

        if p.starts_with('*') {
            // comment
        } else if starts(p, "if ") {
            if process_if(world, ex, &p[3..]) {
                adjust_depth(world, ex, 1);
            } else {
                i = find_else_end(world, ex, &lines, i);
            }
        } else if starts(p, "elseif ") || starts(p, "else") {
            if depth(world, ex) == 1 {
                let msg = format!("Trigger VNum {} has 'else' without 'if'.", vnum(world, ex));
                script_log(world, &msg);
            } else {
                i = find_end(&lines, i);
                adjust_depth(world, ex, -1);
            }
        } else if starts(p, "while ") {
            let done = find_done(&lines, i);
            if done == i || !starts(line(&lines, done), "done") {
                let msg = format!("Trigger VNum {} has 'while' without 'done'.", vnum(world, ex));
                script_log(world, &msg);
                break;
            }
            if process_if(world, ex, &p[6..]) {
                if let Some(t) = world.trigger_mut(ex.owner, ex.trig) {
                    t.loop_origins.insert(done, i);
                }
            } else {
                i = done;
            }
        } else if starts(p, "switch ") {
            i = find_case(world, ex, &lines, i, &p[7..]);
        } else if starts(p, "end") {
            if depth(world, ex) == 1 {
                let msg = format!("Trigger VNum {} has 'end' without 'if'.", vnum(world, ex));
                script_log(world, &msg);
            } else {
                adjust_depth(world, ex, -1);
            }
        } else if starts(p, "done") {
            let origin = world
                .trigger(ex.owner, ex.trig)
                .and_then(|t| t.loop_origins.get(&i).copied());
            if let Some(origin) = origin {
                let cond = line(&lines, origin);
                if process_if(world, ex, &cond[6..]) {
                    i = origin;
                    let loops = world.trigger_mut(ex.owner, ex.trig).map_or(0, |t| {
                        t.loops += 1;
                        t.loops
                    });
                    if loops >= ceiling {
                        let msg = format!("Trigger VNum {} has looped {loops} times!!!", vnum(world, ex));
                        script_log(world, &msg);
                        break;
                    }
                }
            }
            // otherwise this ends a switch or a finished loop
        } else if starts(p, "break") {
            i = find_done(&lines, i);
        } else if starts(p, "case") {
            // falls through to the next case body
        } else {
            let cmd = var_subst(world, ex, p);
            match run_builtin(world, ex, &cmd) {
                Some(Flow::Next) => {}
                Some(Flow::Return(n)) => ret_val = n,
                Some(Flow::Halt) => break,
                Some(Flow::Wait(spec)) => {
                    let delay = spec.delay(world.pulse());
                    let event = world.schedule_wait(ex.owner, ex.trig, delay);
                    if let Some(t) = world.trigger_mut(ex.owner, ex.trig) {
                        t.wait_event = Some(event);
                        t.curr_state = Some(i + 1);
                    }
                    stop = Stop::Suspended;
                    break;
                }
                None => command_interpreter(world, ex, &cmd),
            }
            if !world.is_alive(ex.owner) {
                stop = Stop::Purged;
                break;
            }
            if !ex.is_live(world) {
                // detached by its own command
                break;
            }
        }
        i += 1;
    }

    match stop {
        Stop::Suspended => DriverResult::ret(ret_val),
        Stop::Purged => DriverResult {
            ret_val,
            owner_purged: true,
        },
        Stop::Finished => {
            if let Some(t) = world.trigger_mut(ex.owner, ex.trig) {
                t.vars.clear();
                t.depth = 0;
                t.curr_state = None;
                t.loop_origins.clear();
            }
            DriverResult::ret(ret_val)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use empire_world::Value;

    fn lines(src: &[&str]) -> Vec<String> {
        src.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn scanners_skip_nested_blocks() {
        let src = lines(&[
            "if 1",
            "  if 0",
            "  end",
            "end",
            "while 1",
            "  switch 2",
            "  done",
            "done",
        ]);
        assert_eq!(find_end(&src, 0), 3);
        assert_eq!(find_done(&src, 4), 7);
        assert_eq!(find_done(&src, 5), 6);
        // unterminated blocks run to the last line
        let open = lines(&["if 1", "nop", "nop"]);
        assert_eq!(find_end(&open, 0), 2);
    }

    #[test]
    fn if_elseif_else() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&[
            "set n 2",
            "if %n% == 1",
            "  set r one",
            "elseif %n% == 2",
            "  set r two",
            "  global r",
            "else",
            "  set r other",
            "  global r",
            "end",
        ]);
        let result = script_driver(&mut fx.world, ex.owner, ex.trig, Mode::New);
        assert_eq!(result.ret_val, 1);
        let sc = fx.world.script(ex.owner).expect("script");
        assert_eq!(sc.global_vars.find_any("r").map(|v| v.value.clone()), Some(Value::from("two")));
        assert_eq!(fx.world.trigger(ex.owner, ex.trig).map(|t| t.depth), Some(0));
    }

    #[test]
    fn while_and_switch() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&[
            "set i 0",
            "set total 0",
            "while %i% < 5",
            "  eval i %i% + 1",
            "  switch %i%",
            "    case 2",
            "    case 4",
            "      eval total %total% + 10",
            "      break",
            "    default",
            "      eval total %total% + 1",
            "  done",
            "done",
            "global total",
        ]);
        script_driver(&mut fx.world, ex.owner, ex.trig, Mode::New);
        let sc = fx.world.script(ex.owner).expect("script");
        assert_eq!(sc.global_vars.find_any("total").map(|v| v.value.clone()), Some(Value::Integer(23)));
    }

    #[test]
    fn return_value_and_halt() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["return 0", "halt", "set after yes", "global after"]);
        let result = script_driver(&mut fx.world, ex.owner, ex.trig, Mode::New);
        assert_eq!(result.ret_val, 0);
        assert!(fx.world.script(ex.owner).expect("script").global_vars.is_empty());
    }

    #[test]
    fn stray_else_and_end_are_logged() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["else", "end", "set x 1", "global x"]);
        script_driver(&mut fx.world, ex.owner, ex.trig, Mode::New);
        let errors: Vec<&String> = fx.world.script_errors.iter().collect();
        assert!(errors.iter().any(|e| e.contains("has 'else' without 'if'")));
        assert!(errors.iter().any(|e| e.contains("has 'end' without 'if'")));
        assert!(fx.world.script(ex.owner).expect("script").global_vars.find_any("x").is_some());
    }

    #[test]
    fn runaway_loop_is_cut_off() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["while 1", "  nop", "done", "set after 1", "global after"]);
        script_driver(&mut fx.world, ex.owner, ex.trig, Mode::New);
        assert!(fx.world.script_errors.iter().any(|e| e.contains("has looped 300 times!!!")));
        let t = fx.world.trigger(ex.owner, ex.trig).expect("trigger");
        assert_eq!(t.depth, 0);
        assert!(t.vars.is_empty());
        assert!(fx.world.script(ex.owner).expect("script").global_vars.is_empty());
    }

    #[test]
    fn while_without_done_aborts() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["while 1", "  nop"]);
        script_driver(&mut fx.world, ex.owner, ex.trig, Mode::New);
        assert!(fx.world.script_errors.iter().any(|e| e.contains("has 'while' without 'done'")));
    }

    #[test]
    fn recursion_cap() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["set x 1", "global x"]);
        fx.world.script_depth = fx.world.config.max_script_depth + 1;
        let result = script_driver(&mut fx.world, ex.owner, ex.trig, Mode::New);
        assert_eq!(result.ret_val, 1);
        assert!(fx.world.script_errors.iter().any(|e| e.contains("recursed beyond maximum")));
        assert!(fx.world.script(ex.owner).expect("script").global_vars.is_empty());
        assert_eq!(fx.world.script_depth, fx.world.config.max_script_depth + 1);
    }

    #[test]
    fn wait_suspends_and_restart_resumes() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["set x 1", "wait 3", "global x"]);
        script_driver(&mut fx.world, ex.owner, ex.trig, Mode::New);
        let t = fx.world.trigger(ex.owner, ex.trig).expect("trigger");
        assert!(t.is_running());
        assert_eq!(t.curr_state, Some(2));
        assert!(t.wait_event.is_some());
        assert_eq!(fx.world.script_depth, 0);

        script_driver(&mut fx.world, ex.owner, ex.trig, Mode::Restart);
        let sc = fx.world.script(ex.owner).expect("script");
        assert_eq!(sc.global_vars.find_any("x").map(|v| v.value.clone()), Some(Value::Integer(1)));
        assert!(!fx.world.trigger(ex.owner, ex.trig).expect("trigger").is_running());
    }

    #[test]
    fn self_purge_stops_silently() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["mpurge", "set x 1"]);
        let errors = fx.world.script_errors.len();
        let result = script_driver(&mut fx.world, ex.owner, ex.trig, Mode::New);
        assert!(result.owner_purged);
        assert!(!fx.world.is_alive(ex.owner));
        assert_eq!(fx.world.script_errors.len(), errors);
    }
}
