//! The fault-tolerant parser driver: a hand-written recursive-descent
//! parser that drives a [`Visitor`] over a token stream and never throws on
//! malformed input — every recoverable problem becomes an [`Error`] pushed
//! onto an accumulator, and parsing continues.
//!
//! Grounded on apollo-parser's `parser/mod.rs` `Parser`: an error
//! accumulator fed by `push_err`, a `bump`/`expect` vocabulary for moving
//! through tokens, and "no exception is ever thrown for malformed input" as
//! the rule this module exists to uphold. The recovery follow-sets and the
//! scan-error-to-parse-error mapping are new — GraphQL's grammar doesn't
//! need them in this shape — but are written in the same accumulate-and-
//! continue style.

use crate::error::{map_scan_error, Error, ParseErrorCode};
use crate::lexer::TokenKind;
use crate::limit::LimitTracker;
use crate::scanner::{create_scanner, Scanner};
use crate::value::Value;

/// Streaming callbacks fired as the parser walks a document. All have
/// empty default bodies so a visitor only needs to implement the handful
/// it cares about — the value materializer ([`crate::value::parse`]) and
/// the tree builder ([`crate::tree::parse_tree`]) are both just `Visitor`
/// implementations.
#[allow(unused_variables)]
pub trait Visitor {
    fn on_object_begin(&mut self, offset: usize, length: usize) {}
    fn on_object_property(&mut self, name: &str, offset: usize, length: usize) {}
    fn on_object_end(&mut self, offset: usize, length: usize) {}
    fn on_array_begin(&mut self, offset: usize, length: usize) {}
    fn on_array_end(&mut self, offset: usize, length: usize) {}
    fn on_literal_value(&mut self, value: Value, offset: usize, length: usize) {}
    /// Fired instead of [`Visitor::on_literal_value`] when a value was
    /// expected but none was found (a property with no colon, a property
    /// whose colon has no value after it) — distinct from a real literal so
    /// a tree-building visitor can close the construct without attaching a
    /// value child, matching the "value child is absent on incomplete
    /// input" data model.
    fn on_value_missing(&mut self, offset: usize) {}
    fn on_separator(&mut self, character: char, offset: usize, length: usize) {}
    fn on_comment(&mut self, offset: usize, length: usize) {}
    fn on_error(&mut self, error: ParseErrorCode, offset: usize, length: usize) {}
}

/// Options controlling parse strictness. Orthogonal flags rather than a
/// builder consumed once on a single parser value — JSON5 callers just want
/// a couple of independent toggles.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Reject `//` and `/* */` comments instead of accepting them silently.
    pub disallow_comments: bool,
    /// Treat a document containing only whitespace/comments as valid
    /// (producing `Value::Null`) rather than a `ValueExpected` error.
    pub allow_empty_content: bool,
}

const FOLLOW_OBJECT: &[TokenKind] = &[TokenKind::CommaToken, TokenKind::CloseBraceToken];
const FOLLOW_ARRAY: &[TokenKind] = &[TokenKind::CommaToken, TokenKind::CloseBracketToken];

struct Parser<'a, 'v> {
    scanner: Scanner<'a>,
    visitor: &'v mut dyn Visitor,
    errors: Vec<Error>,
    options: ParseOptions,
    current: TokenKind,
    depth: LimitTracker,
    tokens: LimitTracker,
}

impl<'a, 'v> Parser<'a, 'v> {
    fn new(text: &'a str, visitor: &'v mut dyn Visitor, options: ParseOptions) -> Self {
        Self {
            scanner: create_scanner(text, false),
            visitor,
            errors: Vec::new(),
            options,
            current: TokenKind::Unknown,
            depth: LimitTracker::new(1000),
            tokens: LimitTracker::new(1_000_000),
        }
    }

    fn push_err(&mut self, code: ParseErrorCode, offset: usize, length: usize) {
        tracing::debug!(code = %code, offset, length, "json5 parse error recovered");
        self.visitor.on_error(code, offset, length);
        self.errors.push(Error::new(code, offset, length));
    }

    fn push_err_at_current(&mut self, code: ParseErrorCode) {
        let offset = self.scanner.token_offset();
        let length = self.scanner.token_length().max(1);
        self.push_err(code, offset, length);
    }

    /// Advances to the next substantive token, silently consuming
    /// whitespace/line-break trivia, forwarding comments to the visitor
    /// (and rejecting them if disallowed), and resyncing past unscannable
    /// characters one at a time.
    fn bump(&mut self) -> TokenKind {
        loop {
            let kind = self.scanner.scan();
            self.tokens.consume();
            if self.tokens.limited() {
                self.current = TokenKind::Eof;
                return TokenKind::Eof;
            }

            if let Some(code) = map_scan_error(self.scanner.token_error()) {
                self.push_err_at_current(code);
            }

            match kind {
                TokenKind::Trivia | TokenKind::LineBreakTrivia => continue,
                TokenKind::LineCommentTrivia | TokenKind::BlockCommentTrivia => {
                    let offset = self.scanner.token_offset();
                    let length = self.scanner.token_length();
                    self.visitor.on_comment(offset, length);
                    if self.options.disallow_comments {
                        self.push_err(ParseErrorCode::InvalidCommentToken, offset, length);
                    }
                    continue;
                }
                TokenKind::Unknown => continue,
                other => {
                    self.current = other;
                    return other;
                }
            }
        }
    }

    /// Skips a balanced `open`/`close` run without materializing anything,
    /// used once the recursion limit is hit so a pathological document
    /// can't grow the call stack further.
    fn skip_balanced(&mut self, open: TokenKind, close: TokenKind) {
        let mut depth = 1usize;
        loop {
            match self.current {
                k if k == open => depth += 1,
                k if k == close => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                TokenKind::Eof => return,
                _ => {}
            }
            self.bump();
        }
    }

    fn resync_to(&mut self, follow: &[TokenKind]) {
        while self.current != TokenKind::Eof && !follow.contains(&self.current) {
            self.bump();
        }
    }

    fn is_value_start(kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::OpenBraceToken
                | TokenKind::OpenBracketToken
                | TokenKind::StringLiteral
                | TokenKind::NumericLiteral
                | TokenKind::Identifier
        )
    }

    /// Emits a synthesized `null` literal at the current (zero-width)
    /// position so a visitor's notion of "a value was here" stays
    /// consistent even when the grammar expected one and found none —
    /// without this, a tree-building visitor would be left with a
    /// property or array slot that's never closed.
    fn emit_missing_value(&mut self) {
        let offset = self.scanner.token_offset();
        self.visitor.on_literal_value(Value::Null, offset, 0);
    }

    /// Parses a value starting at `self.current` (not yet consumed) and
    /// leaves `self.current` on the token immediately following it.
    fn parse_value(&mut self) {
        match self.current {
            TokenKind::OpenBraceToken => self.parse_object(),
            TokenKind::OpenBracketToken => self.parse_array(),
            TokenKind::StringLiteral => {
                let text = self.scanner.token_value().to_string();
                let offset = self.scanner.token_offset();
                let length = self.scanner.token_length();
                self.bump();
                self.visitor.on_literal_value(Value::String(text), offset, length);
            }
            TokenKind::NumericLiteral => {
                let text = self.scanner.token_value().to_string();
                let offset = self.scanner.token_offset();
                let length = self.scanner.token_length();
                self.bump();
                match parse_number(&text) {
                    Some(n) => self.visitor.on_literal_value(Value::Number(n), offset, length),
                    None => {
                        self.push_err(ParseErrorCode::InvalidNumberFormat, offset, length);
                        self.visitor.on_literal_value(Value::Number(f64::NAN), offset, length);
                    }
                }
            }
            TokenKind::Identifier => {
                let text = self.scanner.token_value().to_string();
                let offset = self.scanner.token_offset();
                let length = self.scanner.token_length();
                self.bump();
                let value = match text.as_str() {
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    "null" => Value::Null,
                    _ => {
                        self.push_err(ParseErrorCode::InvalidSymbol, offset, length);
                        Value::Null
                    }
                };
                self.visitor.on_literal_value(value, offset, length);
            }
            _ => {
                self.push_err_at_current(ParseErrorCode::ValueExpected);
                self.emit_missing_value();
            }
        }
    }

    fn parse_object(&mut self) {
        let open_offset = self.scanner.token_offset();
        let open_length = self.scanner.token_length();
        self.visitor.on_object_begin(open_offset, open_length);

        self.depth.consume();
        if self.depth.limited() {
            self.bump();
            self.skip_balanced(TokenKind::OpenBraceToken, TokenKind::CloseBraceToken);
            let end_offset = self.scanner.token_offset();
            let end_length = self.scanner.token_length();
            self.visitor.on_object_end(end_offset, end_length);
            self.depth.release();
            return;
        }

        self.bump(); // past '{'

        if self.current != TokenKind::CloseBraceToken {
            loop {
                match self.current {
                    TokenKind::StringLiteral | TokenKind::Identifier => {
                        let name = self.scanner.token_value().to_string();
                        let offset = self.scanner.token_offset();
                        let length = self.scanner.token_length();
                        self.visitor.on_object_property(&name, offset, length);
                        self.bump();
                    }
                    _ => {
                        // No property name here at all: skip straight to
                        // the next `,` or `}` at this nesting depth rather
                        // than attempting a colon/value parse over
                        // whatever happens to follow.
                        self.push_err_at_current(ParseErrorCode::PropertyNameExpected);
                        self.resync_to(FOLLOW_OBJECT);
                        if self.current == TokenKind::CommaToken {
                            let offset = self.scanner.token_offset();
                            let length = self.scanner.token_length();
                            self.visitor.on_separator(',', offset, length);
                            self.bump();
                            if matches!(self.current, TokenKind::CloseBraceToken | TokenKind::Eof)
                            {
                                break;
                            }
                            continue;
                        }
                        break;
                    }
                };

                let colon_present = if self.current == TokenKind::ColonToken {
                    let offset = self.scanner.token_offset();
                    let length = self.scanner.token_length();
                    self.visitor.on_separator(':', offset, length);
                    self.bump();
                    true
                } else {
                    self.push_err_at_current(ParseErrorCode::ColonExpected);
                    false
                };

                if colon_present {
                    if Self::is_value_start(self.current) {
                        self.parse_value();
                    } else {
                        self.push_err_at_current(ParseErrorCode::ValueExpected);
                        self.visitor.on_value_missing(self.scanner.token_offset());
                    }
                } else {
                    // Colon missing: don't attempt a value parse at all for
                    // this property, just signal that its value is absent.
                    self.visitor.on_value_missing(self.scanner.token_offset());
                }

                match self.current {
                    TokenKind::CommaToken => {
                        let offset = self.scanner.token_offset();
                        let length = self.scanner.token_length();
                        self.visitor.on_separator(',', offset, length);
                        self.bump();
                        if matches!(self.current, TokenKind::CloseBraceToken | TokenKind::Eof) {
                            break;
                        }
                        continue;
                    }
                    TokenKind::CloseBraceToken | TokenKind::Eof => break,
                    TokenKind::StringLiteral | TokenKind::Identifier => {
                        // Another property follows directly: missing comma,
                        // but don't discard the property key that's sitting
                        // right there in the lookahead.
                        self.push_err_at_current(ParseErrorCode::CommaExpected);
                        continue;
                    }
                    _ => {
                        self.push_err_at_current(ParseErrorCode::CommaExpected);
                        self.resync_to(FOLLOW_OBJECT);
                        if self.current == TokenKind::CommaToken {
                            let offset = self.scanner.token_offset();
                            let length = self.scanner.token_length();
                            self.visitor.on_separator(',', offset, length);
                            self.bump();
                            if matches!(self.current, TokenKind::CloseBraceToken | TokenKind::Eof)
                            {
                                break;
                            }
                            continue;
                        }
                        break;
                    }
                }
            }
        }

        let (end_offset, end_length) = if self.current == TokenKind::CloseBraceToken {
            let span = (self.scanner.token_offset(), self.scanner.token_length());
            self.bump();
            span
        } else {
            self.push_err_at_current(ParseErrorCode::CloseBraceExpected);
            (self.scanner.token_offset(), 0)
        };

        self.visitor.on_object_end(end_offset, end_length);
        self.depth.release();
    }

    fn parse_array(&mut self) {
        let open_offset = self.scanner.token_offset();
        let open_length = self.scanner.token_length();
        self.visitor.on_array_begin(open_offset, open_length);

        self.depth.consume();
        if self.depth.limited() {
            self.bump();
            self.skip_balanced(TokenKind::OpenBracketToken, TokenKind::CloseBracketToken);
            let end_offset = self.scanner.token_offset();
            let end_length = self.scanner.token_length();
            self.visitor.on_array_end(end_offset, end_length);
            self.depth.release();
            return;
        }

        self.bump(); // past '['

        if self.current != TokenKind::CloseBracketToken {
            loop {
                if Self::is_value_start(self.current) {
                    self.parse_value();
                } else {
                    self.push_err_at_current(ParseErrorCode::ValueExpected);
                    self.emit_missing_value();
                }

                match self.current {
                    TokenKind::CommaToken => {
                        let offset = self.scanner.token_offset();
                        let length = self.scanner.token_length();
                        self.visitor.on_separator(',', offset, length);
                        self.bump();
                        if matches!(self.current, TokenKind::CloseBracketToken | TokenKind::Eof) {
                            break;
                        }
                        continue;
                    }
                    TokenKind::CloseBracketToken | TokenKind::Eof => break,
                    k if Self::is_value_start(k) => {
                        // Another value follows directly: missing comma,
                        // but don't discard the value that's already here.
                        self.push_err_at_current(ParseErrorCode::CommaExpected);
                        continue;
                    }
                    _ => {
                        self.push_err_at_current(ParseErrorCode::CommaExpected);
                        self.resync_to(FOLLOW_ARRAY);
                        if self.current == TokenKind::CommaToken {
                            let offset = self.scanner.token_offset();
                            let length = self.scanner.token_length();
                            self.visitor.on_separator(',', offset, length);
                            self.bump();
                            if matches!(
                                self.current,
                                TokenKind::CloseBracketToken | TokenKind::Eof
                            ) {
                                break;
                            }
                            continue;
                        }
                        break;
                    }
                }
            }
        }

        let (end_offset, end_length) = if self.current == TokenKind::CloseBracketToken {
            let span = (self.scanner.token_offset(), self.scanner.token_length());
            self.bump();
            span
        } else {
            self.push_err_at_current(ParseErrorCode::CloseBracketExpected);
            (self.scanner.token_offset(), 0)
        };

        self.visitor.on_array_end(end_offset, end_length);
        self.depth.release();
    }
}

/// Parses a JSON5 numeric literal's raw text into an `f64`, including the
/// extended forms (`0x..` hex, `Infinity`, `NaN`, leading/trailing `.`).
fn parse_number(text: &str) -> Option<f64> {
    let (sign, rest) = match text.as_bytes().first() {
        Some(b'+') => (1.0, &text[1..]),
        Some(b'-') => (-1.0, &text[1..]),
        _ => (1.0, text),
    };
    if rest == "Infinity" {
        return Some(sign * f64::INFINITY);
    }
    if rest == "NaN" {
        return Some(f64::NAN);
    }
    if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).ok().map(|v| sign * v as f64);
    }
    rest.parse::<f64>().ok().map(|v| sign * v)
}

/// Walks `text`, driving `visitor`'s callbacks and returning every error
/// recovered along the way.
#[tracing::instrument(skip(text, visitor))]
pub fn visit(text: &str, visitor: &mut dyn Visitor, options: ParseOptions) -> Vec<Error> {
    let mut parser = Parser::new(text, visitor, options);
    parser.bump();

    if parser.current == TokenKind::Eof {
        if !options.allow_empty_content {
            parser.push_err_at_current(ParseErrorCode::ValueExpected);
        }
    } else {
        parser.parse_value();
        if parser.current != TokenKind::Eof {
            parser.push_err_at_current(ParseErrorCode::EndOfFileExpected);
        }
    }

    if !parser.errors.is_empty() {
        tracing::warn!(count = parser.errors.len(), "json5 document had recoverable errors");
    }
    parser.errors
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullVisitor;
    impl Visitor for NullVisitor {}

    fn errors_for(text: &str, options: ParseOptions) -> Vec<Error> {
        let mut v = NullVisitor;
        visit(text, &mut v, options)
    }

    #[test]
    fn clean_document_has_no_errors() {
        assert!(errors_for(r#"{ "a": 1, "b": [1, 2] }"#, ParseOptions::default()).is_empty());
    }

    #[test]
    fn missing_colon_reports_colon_expected() {
        let errs = errors_for(r#"{ "a" 1 }"#, ParseOptions::default());
        assert!(errs.iter().any(|e| e.code == ParseErrorCode::ColonExpected));
    }

    #[test]
    fn missing_comma_in_array_recovers() {
        let errs = errors_for("[ 1 2, 3 ]", ParseOptions::default());
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, ParseErrorCode::CommaExpected);
    }

    #[test]
    fn unclosed_object_reports_close_brace_expected() {
        let errs = errors_for(r#"{ "a": 1 "#, ParseOptions::default());
        assert!(errs.iter().any(|e| e.code == ParseErrorCode::CloseBraceExpected));
    }

    #[test]
    fn disallowed_comment_is_reported_but_does_not_stop_parsing() {
        let errs = errors_for("// hi\n1", ParseOptions { disallow_comments: true, ..Default::default() });
        assert!(errs.iter().any(|e| e.code == ParseErrorCode::InvalidCommentToken));
    }

    #[test]
    fn empty_content_is_an_error_unless_allowed() {
        assert!(!errors_for("", ParseOptions::default()).is_empty());
        assert!(errors_for("", ParseOptions { allow_empty_content: true, ..Default::default() }).is_empty());
    }
}
