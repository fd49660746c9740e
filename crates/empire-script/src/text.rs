//! Argument splitting and the string helpers scripts can apply to any value.

use std::cmp::Ordering;

/// Words `one_argument` skips over.
const FILL_WORDS: &[&str] = &["in", "from", "with", "the", "on", "at", "to"];

/// The stock command table, in lookup order. `mudcommand` returns the first
/// entry a value abbreviates.
pub const STOCK_COMMANDS: &[&str] = &[
    "north", "east", "south", "west", "northeast", "northwest", "southeast", "southwest", "up",
    "down", "at", "attach", "ask", "bash", "buy", "cast", "close", "consider", "detach", "drink",
    "drop", "eat", "emote", "enter", "equipment", "examine", "exit", "follow", "get", "give",
    "gossip", "help", "hit", "hold", "inventory", "kill", "kick", "lead", "light", "look", "mount",
    "open", "order", "pick", "put", "quaff", "quit", "remove", "rest", "say", "score", "sell",
    "shout", "sit", "sleep", "stand", "steal", "tell", "time", "wake", "wear", "weather", "where",
    "who", "wield", "write",
];

pub fn skip_spaces(text: &str) -> &str {
    text.trim_start()
}

/// First whitespace-delimited word and the unconsumed remainder.
pub fn any_one_arg(text: &str) -> (&str, &str) {
    let text = skip_spaces(text);
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    (&text[..end], &text[end..])
}

/// Like [`any_one_arg`] but skips fill words ("the", "at", ...).
pub fn one_argument(mut text: &str) -> (&str, &str) {
    loop {
        let (word, rest) = any_one_arg(text);
        if !FILL_WORDS.iter().any(|f| f.eq_ignore_ascii_case(word)) {
            return (word, rest);
        }
        text = rest;
    }
}

pub fn two_arguments(text: &str) -> (&str, &str, &str) {
    let (first, rest) = one_argument(text);
    let (second, rest) = one_argument(rest);
    (first, second, rest)
}

/// First word, then everything after it with leading space removed.
pub fn half_chop(text: &str) -> (&str, &str) {
    let (first, rest) = any_one_arg(text);
    (first, skip_spaces(rest))
}

/// Case-insensitive ordering.
pub fn str_cmp(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

/// Case-insensitive comparison of at most `n` leading bytes.
pub fn strn_cmp(a: &str, b: &str, n: usize) -> Ordering {
    let a = &a.as_bytes()[..a.len().min(n)];
    let b = &b.as_bytes()[..b.len().min(n)];
    a.iter()
        .map(u8::to_ascii_lowercase)
        .cmp(b.iter().map(u8::to_ascii_lowercase))
}

/// Whether `arg` is a non-empty, case-insensitive prefix of `full`.
pub fn is_abbrev(arg: &str, full: &str) -> bool {
    !arg.is_empty()
        && arg.len() <= full.len()
        && arg
            .bytes()
            .zip(full.bytes())
            .all(|(a, b)| a.eq_ignore_ascii_case(&b))
}

/// Byte offset of `needle` in `hay`, case-insensitively.
///
/// A failed partial match resumes where it stopped rather than one past
/// where it started, so some overlapping matches are missed.
pub fn str_str(hay: &str, needle: &str) -> Option<usize> {
    let cs = hay.as_bytes();
    let ct = needle.as_bytes();
    if ct.is_empty() {
        return None;
    }
    let mut i = 0;
    while i < cs.len() {
        while i < cs.len() && !cs[i].eq_ignore_ascii_case(&ct[0]) {
            i += 1;
        }
        let start = i;
        let mut t = 0;
        while t < ct.len() && i < cs.len() && cs[i].eq_ignore_ascii_case(&ct[t]) {
            t += 1;
            i += 1;
        }
        if t == ct.len() {
            return Some(start);
        }
    }
    None
}

/// `sub` occurs in `text` as a whole word or phrase.
pub fn is_substring(sub: &str, text: &str) -> bool {
    let Some(at) = str_str(text, sub) else {
        return false;
    };
    let bytes = text.as_bytes();
    let boundary = |b: u8| b.is_ascii_whitespace() || b.is_ascii_punctuation();
    let end = at + sub.len();
    (at == 0 || boundary(bytes[at - 1])) && (end == bytes.len() || boundary(bytes[end]))
}

/// Uppercases the first character.
pub fn cap(text: &str) -> String {
    empire_world::world::capitalize(text)
}

/// The indefinite article for `text`.
pub fn ana(text: &str) -> &'static str {
    match text.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

/// Applies a string helper to a variable's value. `None` when `field` is not
/// a helper. `process` needs substitution and is handled by the resolver.
pub fn text_field(value: &str, field: &str, subfield: &str) -> Option<String> {
    let out = match field.to_ascii_lowercase().as_str() {
        "strlen" => value.len().to_string(),
        "trim" => value.trim().to_string(),
        "contains" => flag(str_str(value, subfield).is_some()),
        "car" => any_one_arg(value).0.to_string(),
        "cdr" => {
            let first = value.find(char::is_whitespace).unwrap_or(value.len());
            skip_spaces(&value[first..]).to_string()
        }
        "cap" => cap(value),
        "ana" => ana(value).to_string(),
        "index_of" => match subfield.chars().next() {
            Some(c) => value
                .chars()
                .position(|v| v == c)
                .map_or(0, |i| i + 1)
                .to_string(),
            None => "0".to_string(),
        },
        "mudcommand" => STOCK_COMMANDS
            .iter()
            .find(|cmd| strn_cmp(cmd, value, value.len()) == Ordering::Equal)
            .map_or_else(String::new, |cmd| cmd.to_string()),
        _ => return None,
    };
    Some(out)
}

/// Script truth as text.
pub fn flag(b: bool) -> String {
    if b { "1" } else { "0" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments() {
        assert_eq!(any_one_arg("  set x 5"), ("set", " x 5"));
        assert_eq!(one_argument("at the guard"), ("guard", ""));
        assert_eq!(two_arguments("eval total %a% + 1"), ("eval", "total", " %a% + 1"));
        assert_eq!(half_chop("send  }12 hello there"), ("send", "}12 hello there"));
        assert_eq!(any_one_arg("   "), ("", ""));
    }

    #[test]
    fn comparisons() {
        assert_eq!(str_cmp("ABC", "abc"), Ordering::Equal);
        assert_eq!(str_cmp("ab", "abc"), Ordering::Less);
        assert_eq!(str_cmp("b", "abc"), Ordering::Greater);
        assert_eq!(strn_cmp("northeast", "NORTH", 5), Ordering::Equal);
    }

    #[test]
    fn abbreviations() {
        assert!(is_abbrev("fu", "full"));
        assert!(is_abbrev("FULL", "full"));
        assert!(!is_abbrev("", "full"));
        assert!(!is_abbrev("fx", "full"));
        assert!(!is_abbrev("fullest", "full"));
        assert!(!is_abbrev("mobile", "mob"));
    }

    #[test]
    fn substring_search() {
        assert_eq!(str_str("The Guard", "guard"), Some(4));
        assert_eq!(str_str("abc", ""), None);
        assert_eq!(str_str("aaab", "aab"), None);
        assert!(is_substring("guard", "the city guard."));
        assert!(!is_substring("guard", "the guardsman"));
    }

    #[test]
    fn helpers() {
        assert_eq!(text_field("  hi there ", "trim", ""), Some("hi there".into()));
        assert_eq!(text_field("hello", "strlen", ""), Some("5".into()));
        assert_eq!(text_field("one two three", "car", ""), Some("one".into()));
        assert_eq!(text_field("one  two three", "cdr", ""), Some("two three".into()));
        assert_eq!(text_field("Hello World", "contains", "WORLD"), Some("1".into()));
        assert_eq!(text_field("apple", "ana", ""), Some("an".into()));
        assert_eq!(text_field("pear", "ana", ""), Some("a".into()));
        assert_eq!(text_field("sword", "cap", ""), Some("Sword".into()));
        assert_eq!(text_field("banana", "index_of", "n"), Some("3".into()));
        assert_eq!(text_field("banana", "index_of", "z"), Some("0".into()));
        assert_eq!(text_field("nort", "mudcommand", ""), Some("north".into()));
        assert_eq!(text_field("zzz", "mudcommand", ""), Some(String::new()));
        assert_eq!(text_field("x", "level", ""), None);
    }
}
