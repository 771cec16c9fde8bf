//! JSON5 lexical productions built from the combinators in [`super`].
//!
//! Character classification follows the ECMA-404/JSON5 grammar; Unicode
//! identifier classes use the `unicode-ident` crate (the crate `syn` and
//! `proc-macro2` use) rather than a hand-rolled category table. ASCII
//! punctuators and digits go through a small const lookup table first, a
//! LUT fast path backed by a full Unicode classifier for the slow path.

use super::{and, char_matching, literal, longest, one_or_more, optional, or, zero_or_more};
use super::{Matcher, MatchResult};

/// ASCII fast-path classification table, indexed by byte value.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum AsciiClass {
    Other,
    Whitespace,
    LineTerminator,
    Digit,
    IdentStart,
    IdentPart,
    Punctuator,
}

const fn classify_ascii(b: u8) -> AsciiClass {
    match b {
        b'\n' | b'\r' => AsciiClass::LineTerminator,
        b' ' | b'\t' | 0x0b | 0x0c => AsciiClass::Whitespace,
        b'0'..=b'9' => AsciiClass::Digit,
        b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' => AsciiClass::IdentStart,
        b'{' | b'}' | b'[' | b']' | b':' | b',' => AsciiClass::Punctuator,
        _ => AsciiClass::Other,
    }
}

const ASCII_LUT: [AsciiClass; 128] = {
    let mut table = [AsciiClass::Other; 128];
    let mut i = 0;
    while i < 128 {
        table[i] = classify_ascii(i as u8);
        i += 1;
    }
    table
};

fn ascii_class(c: char) -> AsciiClass {
    if (c as u32) < 128 {
        ASCII_LUT[c as usize]
    } else {
        AsciiClass::Other
    }
}

/// `WhiteSpace` production: Tab, VT, FF, Space, NBSP, BOM, any Unicode
/// "Space_Separator" category char.
pub fn is_whitespace(c: char) -> bool {
    matches!(ascii_class(c), AsciiClass::Whitespace)
        || matches!(c, '\u{a0}' | '\u{feff}')
        || c.is_whitespace() && !is_line_terminator(c)
}

/// `LineTerminator` production: LF, CR, LS, PS.
pub fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// `IdentifierStart`: Unicode ID_Start, plus `$` `_`.
pub fn is_identifier_start(c: char) -> bool {
    c == '$' || c == '_' || unicode_ident::is_xid_start(c)
}

/// `IdentifierPart`: Unicode ID_Continue, plus `$` `_`, ZWNJ, ZWJ.
pub fn is_identifier_part(c: char) -> bool {
    c == '$'
        || c == '_'
        || c == '\u{200c}'
        || c == '\u{200d}'
        || unicode_ident::is_xid_continue(c)
}

/// Matches a run of `WhiteSpace` characters (possibly empty).
pub fn whitespace<'m>() -> Matcher<'m> {
    zero_or_more(char_matching(is_whitespace))
}

/// Matches a single `LineTerminatorSequence`: any `LineTerminator`, with
/// `\r\n` treated as one sequence rather than two.
pub fn line_terminator_sequence<'m>() -> Matcher<'m> {
    or(vec![
        literal("\r\n"),
        char_matching(is_line_terminator),
    ])
}

/// Matches a `SingleLineComment`: `//` up to (not including) a line
/// terminator or end of input.
pub fn single_line_comment<'m>() -> Matcher<'m> {
    Box::new(|input: &str| {
        if !input.starts_with("//") {
            return MatchResult::NONE;
        }
        let body = &input[2..];
        let end = body
            .char_indices()
            .find(|(_, c)| is_line_terminator(*c))
            .map(|(i, _)| i)
            .unwrap_or(body.len());
        MatchResult::ok(2 + end)
    })
}

/// Matches a `MultiLineComment`: `/* ... */`, counting embedded line
/// breaks so the scanner's line/column bookkeeping stays correct. Fails
/// (without consuming) if the close marker is never found; the caller is
/// responsible for turning that into `UnexpectedEndOfComment`.
pub fn multi_line_comment<'m>() -> Matcher<'m> {
    Box::new(|input: &str| {
        if !input.starts_with("/*") {
            return MatchResult::NONE;
        }
        match input[2..].find("*/") {
            Some(rel_end) => {
                let body = &input[2..2 + rel_end];
                let line_breaks = body.matches(|c| is_line_terminator(c)).count() as u32;
                let last_break = body.rfind(is_line_terminator);
                let last_line_break_end = match last_break {
                    Some(idx) => {
                        let c = body[idx..].chars().next().unwrap();
                        2 + idx + c.len_utf8()
                    }
                    None => 0,
                };
                MatchResult::ok_with_breaks(2 + rel_end + 2, line_breaks, last_line_break_end)
            }
            None => MatchResult::fail(input.len()),
        }
    })
}

/// Matches an `IdentifierName`: `IdentifierStart IdentifierPart*`.
pub fn identifier_name<'m>() -> Matcher<'m> {
    and(vec![
        char_matching(is_identifier_start),
        zero_or_more(char_matching(is_identifier_part)),
    ])
}

/// Matches one of the reserved literal keywords, longest-match first so
/// `nu` can't shadow `null`.
pub fn keyword_literal<'m>() -> Matcher<'m> {
    longest(vec![
        literal("true"),
        literal("false"),
        literal("null"),
    ])
}

fn digit() -> impl Fn(char) -> bool {
    |c: char| matches!(ascii_class(c), AsciiClass::Digit)
}

fn hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// Matches a `DecimalDigits` run: one or more ASCII digits.
pub fn decimal_digits<'m>() -> Matcher<'m> {
    one_or_more(char_matching(digit()))
}

/// Matches a JSON5 integer part: `0`, or a non-zero digit followed by any
/// number of further digits. Leading zeros are explicitly excluded — `01`
/// must scan as the single-digit integer `0` followed by a second, separate
/// numeric literal `1`, not as one two-digit lexeme.
fn integer_part<'m>() -> Matcher<'m> {
    let is_digit = digit();
    Box::new(move |input: &str| match input.chars().next() {
        Some('0') => MatchResult::ok(1),
        Some(c) if is_digit(c) => {
            let rest_len: usize = input[c.len_utf8()..]
                .chars()
                .take_while(|&c| is_digit(c))
                .map(char::len_utf8)
                .sum();
            MatchResult::ok(c.len_utf8() + rest_len)
        }
        _ => MatchResult::fail(0),
    })
}

/// Matches a JSON5 `NumericLiteral`: optional sign, then a hex literal or a
/// decimal literal (with optional fraction and exponent), or `Infinity`/`NaN`.
pub fn numeric_literal<'m>() -> Matcher<'m> {
    Box::new(|input: &str| {
        let sign_len = match input.chars().next() {
            Some('+') | Some('-') => 1,
            _ => 0,
        };
        let rest = &input[sign_len..];

        let special = longest(vec![literal("Infinity"), literal("NaN")])(rest);
        if special.success {
            return MatchResult::ok(sign_len + special.length);
        }

        if rest.starts_with("0x") || rest.starts_with("0X") {
            let hex_body_len = rest[2..]
                .char_indices()
                .take_while(|(_, c)| hex_digit(*c))
                .count();
            return if hex_body_len > 0 {
                MatchResult::ok(sign_len + 2 + hex_body_len)
            } else {
                MatchResult::fail(sign_len + 2)
            };
        }

        let int_matcher = integer_part();
        let int_res = int_matcher(rest);
        let int_len = if int_res.success { int_res.length } else { 0 };

        let after_int = &rest[int_len..];
        let frac_matcher = optional(and(vec![literal("."), optional_digits()]));
        let frac_res = frac_matcher(after_int);
        let frac_len = frac_res.length;

        if int_len == 0 && frac_len == 0 {
            return MatchResult::fail(sign_len);
        }
        if int_len == 0 && !after_int.starts_with('.') {
            return MatchResult::fail(sign_len);
        }

        let after_frac = &rest[int_len + frac_len..];
        let exp_matcher = optional(exponent_part());
        let exp_res = exp_matcher(after_frac);

        MatchResult::ok(sign_len + int_len + frac_len + exp_res.length)
    })
}

fn optional_digits<'m>() -> Matcher<'m> {
    zero_or_more(char_matching(digit()))
}

fn exponent_part<'m>() -> Matcher<'m> {
    and(vec![
        or(vec![literal("e"), literal("E")]),
        optional(or(vec![literal("+"), literal("-")])),
        decimal_digits(),
    ])
}

/// Matches a JSON5 `StringLiteral` body (the content between, but not
/// including, the matching `'`/`"` delimiters), tracking embedded line
/// continuations as line breaks. Does not validate escape sequences beyond
/// recognizing that a backslash consumes the following character — the
/// scanner itself reports `InvalidEscapeCharacter`/`InvalidUnicode` for
/// specific bad escapes as it reads, since that diagnosis needs the escape's
/// identity, not just "did something follow the backslash".
pub fn string_literal<'m>(quote: char) -> Matcher<'m> {
    Box::new(move |input: &str| {
        let mut len = 0usize;
        let mut line_breaks = 0u32;
        let mut last_line_break_end = 0usize;
        let mut chars = input.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if c == quote {
                return MatchResult::ok_with_breaks(i, line_breaks, last_line_break_end);
            }
            if is_line_terminator(c) && c != '\u{2028}' && c != '\u{2029}' {
                return MatchResult::fail(i);
            }
            if c == '\\' {
                match chars.next() {
                    Some((j, next)) => {
                        if is_line_terminator(next) {
                            line_breaks += 1;
                            last_line_break_end = j + next.len_utf8();
                        }
                        len = j + next.len_utf8();
                        continue;
                    }
                    None => return MatchResult::fail(input.len()),
                }
            }
            len = i + c.len_utf8();
        }
        MatchResult::fail(len)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_matches_tabs_and_spaces_but_not_newline() {
        let m = whitespace();
        assert_eq!(m("  \tx").length, 3);
        assert_eq!(m("\nx").length, 0, "newline is a line terminator, not whitespace");
    }

    #[test]
    fn line_terminator_sequence_treats_crlf_as_one() {
        let m = line_terminator_sequence();
        assert_eq!(m("\r\nx").length, 2);
        assert_eq!(m("\nx").length, 1);
    }

    #[test]
    fn single_line_comment_stops_before_newline() {
        let m = single_line_comment();
        let res = m("// hello\nrest");
        assert!(res.success);
        assert_eq!(res.length, 8);
    }

    #[test]
    fn multi_line_comment_counts_embedded_breaks() {
        let m = multi_line_comment();
        let res = m("/* a\nb\nc */x");
        assert!(res.success);
        assert_eq!(res.line_breaks, 2);
    }

    #[test]
    fn multi_line_comment_fails_without_close_marker() {
        let m = multi_line_comment();
        let res = m("/* unterminated");
        assert!(!res.success);
    }

    #[test]
    fn identifier_name_rejects_leading_digit() {
        let m = identifier_name();
        assert!(!m("9abc").success);
        assert!(m("_abc9 ").success);
    }

    #[test]
    fn numeric_literal_matches_hex() {
        let m = numeric_literal();
        let res = m("0x1F rest");
        assert!(res.success);
        assert_eq!(res.length, 4);
    }

    #[test]
    fn numeric_literal_matches_leading_dot_and_exponent() {
        let m = numeric_literal();
        assert_eq!(m(".5e10,").length, 5);
        assert_eq!(m("+Infinity,").length, 9);
        assert_eq!(m("-NaN,").length, 4);
    }

    #[test]
    fn numeric_literal_matches_plain_integer() {
        let m = numeric_literal();
        assert_eq!(m("42,").length, 2);
    }

    #[test]
    fn numeric_literal_stops_at_leading_zero_instead_of_matching_01_whole() {
        let m = numeric_literal();
        // "01" is two numeric literals, not one: the first stops right
        // after the leading zero.
        let res = m("01,");
        assert!(res.success);
        assert_eq!(res.length, 1);
    }

    #[test]
    fn string_literal_stops_at_matching_quote() {
        let m = string_literal('"');
        let res = m(r#"hello\"world" rest"#);
        assert!(res.success);
        assert_eq!(res.length, r#"hello\"world"#.len());
    }

    #[test]
    fn string_literal_fails_on_bare_newline() {
        let m = string_literal('"');
        let res = m("abc\ndef\"");
        assert!(!res.success);
    }
}
