//! A restartable character cursor over a `&str`.
//!
//! Grounded on apollo-parser's `lexer/cursor.rs` (`CharIndices`-based
//! peeking), but that `Cursor` is consumed once per parse. The scanner here
//! needs to jump to an arbitrary byte offset and resume scanning from there
//! (an editor calling `set_position` after an edit), so this cursor is
//! built around `first`/`second`/`bump` over a live `&str` slice rather
//! than an iterator walked start to finish.
pub(crate) struct Cursor<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(source: &'a str, pos: usize) -> Self {
        debug_assert!(source.is_char_boundary(pos));
        Self { source, pos }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Looks at the current character without consuming it.
    pub(crate) fn first(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Looks one character past the current one.
    pub(crate) fn second(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    /// Consumes and returns the current character.
    pub(crate) fn bump(&mut self) -> Option<char> {
        let c = self.first()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Advances the cursor by `bytes`, as reported by a grammar matcher.
    pub(crate) fn advance_bytes(&mut self, bytes: usize) {
        self.pos += bytes;
        debug_assert!(self.source.is_char_boundary(self.pos));
    }

    /// Jumps the cursor to an arbitrary byte offset.
    pub(crate) fn set_pos(&mut self, pos: usize) {
        debug_assert!(self.source.is_char_boundary(pos));
        self.pos = pos;
    }
}
