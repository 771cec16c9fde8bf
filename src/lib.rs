//! A fault-tolerant JSON5 scanner, parser, and tree builder.
//!
//! Built the way editor tooling needs JSON parsed: malformed input never
//! raises, it produces the best-effort value plus a list of recovered
//! errors. Four independent entry points share one scanner/parser core:
//!
//! - [`create_scanner`] — a restartable token-level scanner, for syntax
//!   highlighting or incremental re-lexing after an edit.
//! - [`parse`] — straight to a [`Value`] tree.
//! - [`parse_tree`] — an offset-addressed [`Node`] arena, for tooling that
//!   needs to map a cursor position back to a construct.
//! - [`visit`] — the raw streaming callbacks, for callers building their own
//!   projection of the document.
//!
//! [`get_location`] and the `find_node_at_*`/`get_node_*` family answer
//! "what's at this cursor position" without the caller reimplementing the
//! grammar's structural bookkeeping.

mod error;
mod grammar;
mod lexer;
mod limit;
mod location;
mod parser;
mod scanner;
mod tree;
mod value;

pub use error::{Error, ParseErrorCode, ScanError};
pub use lexer::{Token, TokenKind};
pub use location::{get_location, Location, PatternSegment, PreviousNode, PreviousNodeKind};
pub use parser::{visit, ParseOptions, Visitor};
pub use scanner::{create_scanner, Scanner};
pub use tree::{get_node_path, get_node_value, parse_tree, Node, NodeId, Segment};
pub use value::{parse, Value};

/// Finds the descendant of `root` at `path`, following object properties by
/// name and array elements by index. `None` on a miss (unknown property,
/// out-of-range index, or a segment kind that doesn't match the node it's
/// applied to).
pub fn find_node_at_location(root: &Node, path: &[Segment]) -> Option<NodeId> {
    root.find_at_location(path)
}

/// Binary-descends to the innermost node whose span contains `offset`.
/// `include_right_bound` also matches a node whose span ends exactly at
/// `offset`, for "what's at the cursor right after a closing token" queries.
pub fn find_node_at_offset(root: &Node, offset: usize, include_right_bound: bool) -> Option<NodeId> {
    root.find_at_offset(offset, include_right_bound)
}
