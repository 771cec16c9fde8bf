//! Error types shared by the scanner and the parser.
//!
//! Errors here are data, never control flow: nothing in this crate panics or
//! throws on malformed input. The scanner attaches at most one [`ScanError`]
//! to the token that carries it; the parser appends [`Error`] values to a
//! caller-visible list and keeps going.

use std::fmt;

/// A lexical error attached to a single token.
///
/// At most one of these is ever recorded per token; the scanner still emits
/// a token (partial recovery) alongside the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanError {
    #[default]
    None,
    UnexpectedEndOfComment,
    UnexpectedEndOfString,
    UnexpectedEndOfNumber,
    InvalidUnicode,
    InvalidEscapeCharacter,
    InvalidCharacter,
}

impl ScanError {
    pub fn is_none(&self) -> bool {
        matches!(self, ScanError::None)
    }
}

/// A closed set of reasons the parser can fail to make progress on a
/// construct. Carried alongside an `{offset, length}` span in [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorCode {
    InvalidSymbol,
    InvalidNumberFormat,
    PropertyNameExpected,
    ValueExpected,
    ColonExpected,
    CommaExpected,
    CloseBraceExpected,
    CloseBracketExpected,
    EndOfFileExpected,
    InvalidCommentToken,
    UnexpectedEndOfComment,
    UnexpectedEndOfString,
    UnexpectedEndOfNumber,
    InvalidUnicode,
    InvalidEscapeCharacter,
    InvalidCharacter,
}

impl fmt::Display for ParseErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ParseErrorCode::InvalidSymbol => "invalid symbol",
            ParseErrorCode::InvalidNumberFormat => "invalid number format",
            ParseErrorCode::PropertyNameExpected => "property name expected",
            ParseErrorCode::ValueExpected => "value expected",
            ParseErrorCode::ColonExpected => "colon expected",
            ParseErrorCode::CommaExpected => "comma expected",
            ParseErrorCode::CloseBraceExpected => "'}' expected",
            ParseErrorCode::CloseBracketExpected => "']' expected",
            ParseErrorCode::EndOfFileExpected => "end of file expected",
            ParseErrorCode::InvalidCommentToken => "comments are not allowed",
            ParseErrorCode::UnexpectedEndOfComment => "unexpected end of comment",
            ParseErrorCode::UnexpectedEndOfString => "unexpected end of string",
            ParseErrorCode::UnexpectedEndOfNumber => "unexpected end of number",
            ParseErrorCode::InvalidUnicode => "invalid unicode sequence",
            ParseErrorCode::InvalidEscapeCharacter => "invalid escape character",
            ParseErrorCode::InvalidCharacter => "invalid character",
        };
        f.write_str(msg)
    }
}

/// A single parse error, `{code, offset, length}` in source-code (UTF-8 byte)
/// units. Line/column are recomputable from `offset` via [`crate::get_location`]
/// and are deliberately not cached here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{code} at {offset}..{}", offset + length)]
pub struct Error {
    pub code: ParseErrorCode,
    pub offset: usize,
    pub length: usize,
}

impl Error {
    pub fn new(code: ParseErrorCode, offset: usize, length: usize) -> Self {
        Self {
            code,
            offset,
            length,
        }
    }
}

/// Maps a token's [`ScanError`] onto the [`ParseErrorCode`] the parser
/// reports for it, per the scan-error forwarding table.
pub(crate) fn map_scan_error(err: ScanError) -> Option<ParseErrorCode> {
    match err {
        ScanError::None => None,
        ScanError::UnexpectedEndOfComment => Some(ParseErrorCode::UnexpectedEndOfComment),
        ScanError::UnexpectedEndOfString => Some(ParseErrorCode::UnexpectedEndOfString),
        ScanError::UnexpectedEndOfNumber => Some(ParseErrorCode::UnexpectedEndOfNumber),
        ScanError::InvalidUnicode => Some(ParseErrorCode::InvalidUnicode),
        ScanError::InvalidEscapeCharacter => Some(ParseErrorCode::InvalidEscapeCharacter),
        ScanError::InvalidCharacter => Some(ParseErrorCode::InvalidCharacter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_span() {
        let err = Error::new(ParseErrorCode::CommaExpected, 10, 1);
        assert_eq!(err.to_string(), "comma expected at 10..11");
    }

    #[test]
    fn scan_error_mapping_is_total_over_non_none_variants() {
        assert_eq!(map_scan_error(ScanError::None), None);
        assert_eq!(
            map_scan_error(ScanError::InvalidCharacter),
            Some(ParseErrorCode::InvalidCharacter)
        );
    }
}
