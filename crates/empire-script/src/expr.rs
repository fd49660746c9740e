//! The infix expression evaluator behind `if`, `while`, `eval` and `switch`.
//!
//! Everything is text. Operands that both look numeric compare and compute as
//! integers; anything else compares as case-insensitive text.

use std::cmp::Ordering;

use empire_world::value::{atoi, is_num};
use empire_world::World;

use crate::exec::Exec;
use crate::subst::var_subst;
use crate::text::{flag, is_abbrev, is_substring, str_cmp};

/// Operator spellings in the order the splitter tries them. Each spelling is
/// tried against every token before the next spelling is considered.
pub const OPERATORS: &[&str] = &[
    "||", "&&", "==", "!=", "<=", ">=", "<", ">", "/=", "~=", "-", "+", "//", "/", "*", "!",
];

/// Index of the `"` closing the quote opened at `start`, skipping escapes.
/// Unterminated quotes end at the last byte.
pub fn matching_quote(s: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < s.len() && s[i] != b'"' {
        if s[i] == b'\\' {
            i += 1;
        }
        i += 1;
    }
    if i >= s.len() { s.len().saturating_sub(1) } else { i }
}

/// Index of the `)` closing the paren opened at `start`. Quotes are opaque.
/// Unbalanced input ends at the start of the last character.
pub fn matching_paren(s: &[u8], start: usize) -> usize {
    let mut depth = 1;
    let mut i = start + 1;
    while i < s.len() && depth > 0 {
        match s[i] {
            b'(' => depth += 1,
            b')' => depth -= 1,
            b'"' => i = matching_quote(s, i),
            _ => {}
        }
        i += 1;
    }
    let mut end = i.saturating_sub(1).min(s.len().saturating_sub(1));
    while end > start && is_continuation(s[end]) {
        end -= 1;
    }
    end
}

fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}

/// Byte offsets where tokens begin. Parenthesized groups, quoted strings and
/// runs of letters, digits and spaces are single tokens; any other character
/// is a token of its own.
pub fn token_starts(expr: &str) -> Vec<usize> {
    let s = expr.as_bytes();
    let mut starts = Vec::new();
    let mut i = 0;
    while i < s.len() {
        if is_continuation(s[i]) {
            i += 1;
            continue;
        }
        starts.push(i);
        match s[i] {
            b'(' => i = matching_paren(s, i) + 1,
            b'"' => i = matching_quote(s, i) + 1,
            c if c.is_ascii_alphanumeric() => {
                i += 1;
                while i < s.len() && (s[i].is_ascii_alphanumeric() || s[i].is_ascii_whitespace()) {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    starts
}

/// Applies one operator to two already-evaluated operands.
pub fn eval_op(op: &str, lhs: &str, rhs: &str) -> String {
    let lhs = lhs.trim();
    let rhs = rhs.trim();
    let falsy = |s: &str| s.is_empty() || s.starts_with('0');
    let numeric = is_num(lhs) && is_num(rhs);
    let (l, r) = (atoi(lhs), atoi(rhs));

    match op {
        "||" => flag(!(falsy(lhs) && falsy(rhs))),
        "&&" => flag(!(falsy(lhs) || falsy(rhs))),
        "==" => flag(if numeric { l == r } else { str_cmp(lhs, rhs) == Ordering::Equal }),
        "!=" => flag(if numeric { l != r } else { str_cmp(lhs, rhs) != Ordering::Equal }),
        "<=" => flag(if numeric { l <= r } else { str_cmp(lhs, rhs) != Ordering::Greater }),
        // Text operands reuse the `<=` ordering test; scripts in the wild rely on it.
        ">=" => flag(if numeric { l >= r } else { str_cmp(lhs, rhs) != Ordering::Greater }),
        "<" => flag(if numeric { l < r } else { str_cmp(lhs, rhs) == Ordering::Less }),
        ">" => flag(if numeric { l > r } else { str_cmp(lhs, rhs) == Ordering::Greater }),
        "/=" => flag(is_abbrev(rhs, lhs)),
        "~=" => flag(is_substring(rhs, lhs)),
        "*" => l.wrapping_mul(r).to_string(),
        "//" => if r == 0 { 0 } else { l.wrapping_rem(r) }.to_string(),
        "/" => if r == 0 { 0 } else { l.wrapping_div(r) }.to_string(),
        "+" => l.wrapping_add(r).to_string(),
        "-" => l.wrapping_sub(r).to_string(),
        "!" => flag(if is_num(rhs) { r == 0 } else { rhs.is_empty() }),
        _ => "0".to_string(),
    }
}

/// Splits `expr` at the first operator found and evaluates both sides.
/// `None` when the expression holds no operator outside parens and quotes.
fn eval_lhs_op_rhs(world: &mut World, ex: &Exec, expr: &str) -> Option<String> {
    let starts = token_starts(expr);
    let bytes = expr.as_bytes();
    for op in OPERATORS {
        let Some(&at) = starts
            .iter()
            .find(|&&t| bytes[t..].starts_with(op.as_bytes()))
        else {
            continue;
        };
        let lhs = eval_expr(world, ex, &expr[..at]);
        let rhs = eval_expr(world, ex, &expr[at + op.len()..]);
        return Some(eval_op(op, &lhs, &rhs));
    }
    None
}

/// Evaluates an expression to its text result.
pub fn eval_expr(world: &mut World, ex: &Exec, expr: &str) -> String {
    let expr = expr.trim_start_matches(' ');
    if let Some(result) = eval_lhs_op_rhs(world, ex, expr) {
        return result;
    }
    if expr.starts_with('(') {
        let close = matching_paren(expr.as_bytes(), 0);
        let inner = if close > 0 { &expr[1..close] } else { "" };
        return eval_expr(world, ex, inner);
    }
    var_subst(world, ex, expr)
}

/// Whether a condition holds: anything but an empty or `0`-led result.
pub fn process_if(world: &mut World, ex: &Exec, cond: &str) -> bool {
    let result = eval_expr(world, ex, cond);
    let result = result.trim_start();
    !(result.is_empty() || result.starts_with('0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    fn eval(expr: &str) -> String {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        eval_expr(&mut fx.world, &ex, expr)
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(eval("2 + 3 * 4"), "14");
        assert_eq!(eval("(2 + 3) * 4"), "20");
        assert_eq!(eval("10 // 4"), "2");
        assert_eq!(eval("7 / 2"), "3");
    }

    #[test]
    fn string_and_numeric_equality() {
        assert_eq!(eval("abc == abc"), "1");
        assert_eq!(eval("ABC == abc"), "1");
        assert_eq!(eval("5 == 05"), "1");
        assert_eq!(eval("abc == 5"), "0");
        assert_eq!(eval("abc != 5"), "1");
    }

    #[test]
    fn abbreviation_and_word_search() {
        assert_eq!(eval("full /= fu"), "1");
        assert_eq!(eval("fu /= full"), "0");
        assert_eq!(eval("full /= full"), "1");
        assert_eq!(eval("full /= fx"), "0");
        assert_eq!(eval("the city guard ~= city"), "1");
        assert_eq!(eval("the cityguard ~= city"), "0");
    }

    #[test]
    fn division_by_zero_is_zero() {
        assert_eq!(eval("5 / 0"), "0");
        assert_eq!(eval("5 // 0"), "0");
    }

    #[test]
    fn logic() {
        assert_eq!(eval("1 && 0"), "0");
        assert_eq!(eval("1 || 0"), "1");
        assert_eq!(eval("!0"), "1");
        assert_eq!(eval("!5"), "0");
        assert_eq!(eval("!abc"), "0");
    }

    #[test]
    fn text_greater_equal_uses_less_equal_ordering() {
        // "b" sorts after "a", yet `>=` reports false for text operands.
        assert_eq!(eval_op(">=", "b", "a"), "0");
        assert_eq!(eval_op(">=", "a", "b"), "1");
        assert_eq!(eval_op("<=", "a", "b"), "1");
        assert_eq!(eval_op(">=", "3", "2"), "1");
    }

    #[test]
    fn operands_are_trimmed_and_empty_is_numeric() {
        assert_eq!(eval_op("==", "  7 ", "7"), "1");
        assert_eq!(eval_op("==", "", "0"), "1");
        assert_eq!(eval_op("&&", "", "1"), "0");
    }

    #[test]
    fn equal_spellings_associate_to_the_right() {
        assert_eq!(eval("10 - 2 - 3"), "11");
        assert_eq!(eval("2 * 3 + 1"), "7");
    }

    #[test]
    fn quotes_and_parens_hide_operators() {
        let s = b"(a (b) \")\") c";
        assert_eq!(matching_paren(s, 0), 10);
        assert_eq!(token_starts("ab + (c-d)"), vec![0, 3, 4, 5]);
        assert_eq!(token_starts("\"a+b\""), vec![0]);
    }

    #[test]
    fn accented_text_stays_whole() {
        assert_eq!(token_starts("é+1"), vec![0, 2, 3]);
        assert_eq!(token_starts("(é"), vec![0]);
        assert_eq!(eval("Zoë == Zoë"), "1");
        assert_eq!(eval("Zoë ~= ë"), "0");
        assert_eq!(eval("(é"), "");
        assert_eq!(eval("(ab"), "a");
        assert_eq!(matching_paren("(é".as_bytes(), 0), 1);
    }
}
