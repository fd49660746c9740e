//! Loader for trigger definition files.
//!
//! Each trigger is a block:
//!
//! ```text
//! #1000
//! Town crier greeting~
//! 0 g 100
//! ~
//! msend %actor% Welcome to town.
//! ~
//! ```
//!
//! The third line is `<attach class> <type letters> [narg]`. A `$` line ends
//! the file early. Blank command lines are dropped.

use std::iter::{Enumerate, Peekable};
use std::rc::Rc;
use std::str::Lines;

use empire_types::{AttachType, parse_flag_letters};
use empire_world::{TriggerProto, World};

use crate::error::{TriggerFileError, parse_err};

type LineIter<'a> = Peekable<Enumerate<Lines<'a>>>;

/// Parses every trigger block in `input`.
pub fn parse_trigger_file(input: &str) -> Result<Vec<TriggerProto>, TriggerFileError> {
    let mut lines: LineIter<'_> = input.lines().enumerate().peekable();
    let mut protos = Vec::new();

    while let Some((line_num, raw)) = lines.next() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line == "$" || line == "$~" {
            break;
        }
        let vnum = line
            .strip_prefix('#')
            .and_then(|v| v.trim().parse().ok())
            .ok_or_else(|| parse_err(line_num, format!("expected #<vnum>, got: {line}")))?;
        protos.push(parse_block(&mut lines, vnum, line_num)?);
    }
    Ok(protos)
}

/// Parses `input` and installs every prototype into `world`.
pub fn load_triggers(world: &mut World, input: &str) -> Result<usize, TriggerFileError> {
    let protos = parse_trigger_file(input)?;
    let count = protos.len();
    for proto in protos {
        if world.trig_protos.contains_key(&proto.vnum) {
            log::warn!("trigger {} defined twice; keeping the later one", proto.vnum);
        }
        world.add_trigger_proto(proto);
    }
    log::info!("loaded {count} triggers");
    Ok(count)
}

fn parse_block(lines: &mut LineIter<'_>, vnum: i32, start: usize) -> Result<TriggerProto, TriggerFileError> {
    let (name, _) = read_tilde_string(lines, start)?;
    let name = name.join(" ");

    let (header_num, header) = lines
        .next()
        .ok_or_else(|| parse_err(start, format!("trigger {vnum}: missing type line")))?;
    let (attach, types, narg) = parse_header(header, header_num)?;

    let (arglist, _) = read_tilde_string(lines, header_num)?;
    let arglist = arglist.join("\n");

    let (commands, _) = read_tilde_string(lines, header_num)?;
    let commands: Vec<String> = commands
        .into_iter()
        .filter(|c| !c.trim().is_empty())
        .collect();

    Ok(TriggerProto {
        vnum,
        name,
        attach,
        types,
        narg,
        arglist,
        commands: Rc::from(commands),
    })
}

fn parse_header(line: &str, line_num: usize) -> Result<(AttachType, u32, i32), TriggerFileError> {
    let mut words = line.split_whitespace();
    let class = words
        .next()
        .and_then(|w| w.parse::<u8>().ok())
        .and_then(AttachType::from_repr)
        .ok_or_else(|| parse_err(line_num, format!("bad attach class in: {line}")))?;
    let flags = words
        .next()
        .ok_or_else(|| parse_err(line_num, "missing trigger type flags"))?;
    let types = parse_flag_letters(flags)
        .ok_or_else(|| parse_err(line_num, format!("bad trigger type flags: {flags}")))?;
    let narg = match words.next() {
        Some(n) => n
            .parse()
            .map_err(|_| parse_err(line_num, format!("bad numeric argument: {n}")))?,
        None => 0,
    };
    Ok((class, types, narg))
}

/// Reads lines up to and including the one ending in `~`. Text before the
/// tilde on that line is kept. Returns the lines and the closing line number.
fn read_tilde_string(lines: &mut LineIter<'_>, after: usize) -> Result<(Vec<String>, usize), TriggerFileError> {
    let mut out = Vec::new();
    let mut last = after;
    for (line_num, raw) in lines.by_ref() {
        last = line_num;
        let line = raw.trim_end();
        if let Some(body) = line.strip_suffix('~') {
            if !body.is_empty() {
                out.push(body.to_string());
            }
            return Ok((out, line_num));
        }
        out.push(line.to_string());
    }
    Err(parse_err(last, "unterminated string (missing '~')"))
}
