use std::borrow::Cow;
use std::fmt;

use crate::uid::Uid;

/// A script value. Scripts only ever see text; the tag records what the
/// text already is so callers can skip re-parsing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    Text(String),
    Uid(Uid),
}

impl Value {
    /// Classifies text without changing how it renders: only the canonical
    /// spelling of an integer becomes `Integer`, so `"05"` stays text.
    pub fn from_text(text: &str) -> Self {
        if let Some(uid) = Uid::parse(text) {
            if uid.to_string() == text {
                return Self::Uid(uid);
            }
        }
        match text.parse::<i64>() {
            Ok(n) if n.to_string() == text => Self::Integer(n),
            _ => Self::Text(text.to_string()),
        }
    }

    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Integer(n) => Cow::Owned(n.to_string()),
            Self::Text(s) => Cow::Borrowed(s),
            Self::Uid(u) => Cow::Owned(u.to_string()),
        }
    }

    pub fn as_int(&self) -> i64 {
        match self {
            Self::Integer(n) => *n,
            Self::Text(s) => atoi(s),
            Self::Uid(_) => 0,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Uid(u) => write!(f, "{u}"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<Uid> for Value {
    fn from(u: Uid) -> Self {
        Self::Uid(u)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::from_text(s)
    }
}

/// C `atoi`: leading whitespace, optional sign, then as many digits as
/// follow. Anything unparsable is 0; overflow saturates.
pub fn atoi(text: &str) -> i64 {
    let s = text.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut n: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        n = n.saturating_mul(10).saturating_add((b - b'0') as i64);
    }
    if negative { -n } else { n }
}

/// True if `text` is an optional `-` followed by digits, up to the end or
/// the first whitespace. The empty string counts as a number.
pub fn is_num(text: &str) -> bool {
    let s = text.strip_prefix('-').unwrap_or(text);
    for b in s.bytes() {
        if b.is_ascii_whitespace() {
            return true;
        }
        if !b.is_ascii_digit() {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify() {
        assert_eq!(Value::from_text("42"), Value::Integer(42));
        assert_eq!(Value::from_text("-7"), Value::Integer(-7));
        assert_eq!(Value::from_text("05"), Value::Text("05".into()));
        assert_eq!(Value::from_text("}10000001"), Value::Uid(Uid(10_000_001)));
        assert_eq!(Value::from_text("} 12"), Value::Text("} 12".into()));
        assert_eq!(Value::from_text(""), Value::Text(String::new()));
    }

    #[test]
    fn rendering_is_lossless() {
        for s in ["05", "abc", "-0", "}42", "12 apples", ""] {
            assert_eq!(Value::from_text(s).to_string(), s);
        }
    }

    #[test]
    fn c_atoi() {
        assert_eq!(atoi("  12abc"), 12);
        assert_eq!(atoi("-5"), -5);
        assert_eq!(atoi("+3"), 3);
        assert_eq!(atoi("abc"), 0);
        assert_eq!(atoi(""), 0);
        assert_eq!(atoi("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn numeric_test() {
        assert!(is_num("123"));
        assert!(is_num("-4"));
        assert!(is_num("12 apples"));
        assert!(is_num(""));
        assert!(!is_num("abc"));
        assert!(!is_num("1.5"));
        // leading whitespace ends the digit run at once
        assert!(is_num(" 5"));
        assert!(is_num(" abc"));
    }
}
