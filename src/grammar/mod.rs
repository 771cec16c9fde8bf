//! Grammar combinators: pure functions over a `&str` prefix that report how
//! much of it they matched, modeled on spec §4.1.
//!
//! Each matcher is a small `Fn(&str) -> MatchResult`. Composing matchers
//! (`and`, `or`, `longest`, ...) builds larger matchers out of smaller ones
//! without any of them touching scanner state; the [`crate::lexer::Scanner`]
//! is the only thing that owns position/line/column.
//!
//! Grounded on `creative-forest-lang-pt`'s production-combinator model
//! (`Union`, `Concat`, `LookAhead`, `Nullable` in its `production/` tree):
//! that crate is the pack's other grammar-combinator library. Its machinery
//! is far heavier than this module needs (it builds cached, first-set-aware
//! parser objects generic over token/node types); here the only contract a
//! matcher needs is "how much input did you consume", so matchers are plain
//! boxed closures rather than trait objects implementing a parser interface.

pub mod productions;

use std::fmt;

/// The outcome of running a matcher against a string prefix.
///
/// `length` is always populated, including on failure: a failing `and`
/// reports how much of its sequence it matched before the failing child, so
/// `or`/`longest` can rank alternatives by "most input covered".
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub success: bool,
    pub length: usize,
    pub line_breaks: u32,
    pub last_line_break_end: usize,
}

impl fmt::Debug for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            write!(f, "Match({} bytes)", self.length)
        } else {
            write!(f, "NoMatch(covered {} bytes)", self.length)
        }
    }
}

impl MatchResult {
    pub const NONE: MatchResult = MatchResult {
        success: false,
        length: 0,
        line_breaks: 0,
        last_line_break_end: 0,
    };

    /// The *empty* success: zero-length match, used by `optional`/`zeroOrMore`.
    pub const EMPTY: MatchResult = MatchResult {
        success: true,
        length: 0,
        line_breaks: 0,
        last_line_break_end: 0,
    };

    pub fn ok(length: usize) -> Self {
        Self {
            success: true,
            length,
            line_breaks: 0,
            last_line_break_end: 0,
        }
    }

    pub fn ok_with_breaks(length: usize, line_breaks: u32, last_line_break_end: usize) -> Self {
        Self {
            success: true,
            length,
            line_breaks,
            last_line_break_end,
        }
    }

    pub fn fail(length_covered: usize) -> Self {
        Self {
            success: false,
            length: length_covered,
            line_breaks: 0,
            last_line_break_end: 0,
        }
    }

    fn combine_breaks(self, other: MatchResult) -> (u32, usize) {
        if other.line_breaks > 0 {
            (
                self.line_breaks + other.line_breaks,
                self.length + other.last_line_break_end,
            )
        } else {
            (self.line_breaks, self.last_line_break_end)
        }
    }
}

/// A matcher: recognizes a prefix of `input` and reports how much it ate.
pub type Matcher<'m> = Box<dyn Fn(&str) -> MatchResult + 'm>;

/// Matches the literal string `lexeme` at the start of the input.
pub fn literal<'m>(lexeme: &'static str) -> Matcher<'m> {
    Box::new(move |input: &str| {
        if input.starts_with(lexeme) {
            MatchResult::ok(lexeme.len())
        } else {
            MatchResult::NONE
        }
    })
}

/// Matches a single `char` satisfying `pred`.
pub fn char_matching<'m>(pred: impl Fn(char) -> bool + 'm) -> Matcher<'m> {
    Box::new(move |input: &str| match input.chars().next() {
        Some(c) if pred(c) => MatchResult::ok(c.len_utf8()),
        _ => MatchResult::NONE,
    })
}

/// Sequences matchers: all must succeed in order; line-break counters and
/// lengths accumulate. Fails as soon as a child fails, carrying the combined
/// length matched so far (including the failing child's partial length).
pub fn and<'m>(parts: Vec<Matcher<'m>>) -> Matcher<'m> {
    Box::new(move |input: &str| {
        let mut total = MatchResult::EMPTY;
        for part in &parts {
            let rest = &input[total.length..];
            let res = part(rest);
            let (breaks, last_end) = total.combine_breaks(res);
            let new_length = total.length + res.length;
            if !res.success {
                return MatchResult::fail(new_length);
            }
            total = MatchResult::ok_with_breaks(new_length, breaks, last_end);
        }
        total
    })
}

/// First-match-wins alternation. On total failure, returns the alternative
/// that consumed the most input (ties keep the first).
pub fn or<'m>(alts: Vec<Matcher<'m>>) -> Matcher<'m> {
    Box::new(move |input: &str| {
        let mut best_failure: Option<MatchResult> = None;
        for alt in &alts {
            let res = alt(input);
            if res.success {
                return res;
            }
            best_failure = Some(match best_failure {
                Some(best) if best.length >= res.length => best,
                _ => res,
            });
        }
        best_failure.unwrap_or(MatchResult::NONE)
    })
}

/// Like [`or`], but among the alternatives that succeed, prefers the one
/// that consumed the most input. Used to disambiguate identifier vs keyword.
pub fn longest<'m>(alts: Vec<Matcher<'m>>) -> Matcher<'m> {
    Box::new(move |input: &str| {
        let mut best: Option<MatchResult> = None;
        let mut best_failure: Option<MatchResult> = None;
        for alt in &alts {
            let res = alt(input);
            if res.success {
                best = Some(match best {
                    Some(b) if b.length >= res.length => b,
                    _ => res,
                });
            } else {
                best_failure = Some(match best_failure {
                    Some(b) if b.length >= res.length => b,
                    _ => res,
                });
            }
        }
        best.or(best_failure).unwrap_or(MatchResult::NONE)
    })
}

/// Zero or more repetitions of `part`. Always succeeds (possibly empty).
pub fn zero_or_more<'m>(part: Matcher<'m>) -> Matcher<'m> {
    Box::new(move |input: &str| {
        let mut total = MatchResult::EMPTY;
        loop {
            let rest = &input[total.length..];
            if rest.is_empty() {
                break;
            }
            let res = part(rest);
            if !res.success || res.length == 0 {
                break;
            }
            let (breaks, last_end) = total.combine_breaks(res);
            total = MatchResult::ok_with_breaks(total.length + res.length, breaks, last_end);
        }
        total
    })
}

/// One or more repetitions of `part`.
pub fn one_or_more<'m>(part: Matcher<'m>) -> Matcher<'m> {
    Box::new(move |input: &str| {
        let first = part(input);
        if !first.success {
            return MatchResult::fail(first.length);
        }
        let rest_matcher = zero_or_more_ref(&part);
        let rest = rest_matcher(&input[first.length..]);
        let (breaks, last_end) = first.combine_breaks(rest);
        MatchResult::ok_with_breaks(first.length + rest.length, breaks, last_end)
    })
}

fn zero_or_more_ref<'a>(part: &'a Matcher<'a>) -> impl Fn(&str) -> MatchResult + 'a {
    move |input: &str| {
        let mut total = MatchResult::EMPTY;
        loop {
            let rest = &input[total.length..];
            if rest.is_empty() {
                break;
            }
            let res = part(rest);
            if !res.success || res.length == 0 {
                break;
            }
            let (breaks, last_end) = total.combine_breaks(res);
            total = MatchResult::ok_with_breaks(total.length + res.length, breaks, last_end);
        }
        total
    }
}

/// `part`, or the empty success if `part` fails.
pub fn optional<'m>(part: Matcher<'m>) -> Matcher<'m> {
    Box::new(move |input: &str| {
        let res = part(input);
        if res.success {
            res
        } else {
            MatchResult::EMPTY
        }
    })
}

/// Succeeds with `a`'s result iff `b` would fail to match the same input.
pub fn but_not<'m>(a: Matcher<'m>, b: Matcher<'m>) -> Matcher<'m> {
    Box::new(move |input: &str| {
        let res = a(input);
        if !res.success {
            return res;
        }
        if b(input).success {
            MatchResult::fail(0)
        } else {
            res
        }
    })
}

/// Succeeds with `a`'s result iff `b` would fail on the input following `a`'s
/// match (negative lookahead).
pub fn lookahead_not<'m>(a: Matcher<'m>, b: Matcher<'m>) -> Matcher<'m> {
    Box::new(move |input: &str| {
        let res = a(input);
        if !res.success {
            return res;
        }
        if b(&input[res.length..]).success {
            MatchResult::fail(res.length)
        } else {
            res
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_matches_prefix_only() {
        let m = literal("true");
        assert!(m("true false").success);
        assert_eq!(m("true false").length, 4);
        assert!(!m("tru").success);
    }

    #[test]
    fn and_fails_carrying_partial_length() {
        let m = and(vec![literal("a"), literal("b"), literal("c")]);
        let res = m("abx");
        assert!(!res.success);
        assert_eq!(res.length, 2, "matched 'ab' before failing on 'c'");
    }

    #[test]
    fn or_picks_first_success() {
        let m = or(vec![literal("null"), literal("nu")]);
        assert_eq!(m("null").length, 4);
    }

    #[test]
    fn or_on_total_failure_returns_most_input_covered() {
        let m = or(vec![literal("abcd"), literal("ab")]);
        let res = m("abx");
        assert!(!res.success);
        assert_eq!(res.length, 2, "'ab' covered more than the failed 'abcd' attempt's 0");
    }

    #[test]
    fn longest_prefers_longer_success_over_shorter() {
        let m = longest(vec![literal("tru"), literal("true")]);
        assert_eq!(m("true").length, 4);
    }

    #[test]
    fn zero_or_more_never_fails() {
        let m = zero_or_more(char_matching(|c| c == ' '));
        assert_eq!(m("abc").length, 0);
        assert_eq!(m("   abc").length, 3);
    }

    #[test]
    fn one_or_more_requires_at_least_one() {
        let m = one_or_more(char_matching(|c| c.is_ascii_digit()));
        assert!(!m("abc").success);
        assert_eq!(m("123abc").length, 3);
    }

    #[test]
    fn but_not_excludes_keyword_match() {
        let ident = char_matching(|c| c.is_ascii_alphabetic());
        let m = but_not(ident, literal("n"));
        assert!(!m("null").success);
    }

    #[test]
    fn lookahead_not_blocks_when_follow_matches() {
        let digit = char_matching(|c| c.is_ascii_digit());
        let m = lookahead_not(literal("0"), digit);
        assert!(!m("01").success, "\\0 followed by a digit must fail");
        assert!(m("0x").success);
    }
}
