//! Cursor-position queries: "where in the document's structure does this
//! byte offset sit" (`get_location`), plus the path-matching helper used to
//! ask "am I inside `dependencies.*`" without hand-rolling segment
//! comparisons.
//!
//! Grounded on the same streaming [`Visitor`] the materializer and tree
//! builder use — `get_location` is itself just a [`Visitor`] that tracks a
//! path stack and stops updating once it has passed the query offset, the
//! same incremental-state style as [`crate::value::parse`]'s `Materializer`.

use crate::parser::{visit, ParseOptions, Visitor};
use crate::tree::Segment;
use crate::value::Value;

/// The kind of construct [`PreviousNode`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviousNodeKind {
    Property,
    String,
    Number,
    Bool,
    Null,
}

/// The most recent complete key or literal token strictly before the query
/// offset. Deliberately not a [`crate::tree::Node`] — `get_location` never
/// builds a tree, so this only carries what the scan itself observed.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviousNode {
    pub kind: PreviousNodeKind,
    pub offset: usize,
    pub length: usize,
}

/// A single element of a glob-like pattern passed to [`Location::matches`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    Exact(Segment),
    /// `*`: matches exactly one path segment, of either kind.
    One,
    /// `**`: matches zero or more contiguous path segments.
    Any,
}

/// The semantic location of a byte offset within a document: the path of
/// property names / array indices from the root down to the construct the
/// offset sits inside, whether that offset is in an object's key slot, and
/// the nearest preceding complete token.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub path: Vec<Segment>,
    pub previous_node: Option<PreviousNode>,
    pub is_at_property_key: bool,
}

impl Location {
    /// Glob-like match against `self.path`: `PatternSegment::One` consumes
    /// exactly one path segment, `PatternSegment::Any` consumes zero or more.
    pub fn matches(&self, pattern: &[PatternSegment]) -> bool {
        matches_from(&self.path, pattern)
    }
}

fn matches_from(path: &[Segment], pattern: &[PatternSegment]) -> bool {
    match pattern.first() {
        None => path.is_empty(),
        Some(PatternSegment::Exact(expected)) => match path.first() {
            Some(actual) if actual == expected => matches_from(&path[1..], &pattern[1..]),
            _ => false,
        },
        Some(PatternSegment::One) => {
            !path.is_empty() && matches_from(&path[1..], &pattern[1..])
        }
        Some(PatternSegment::Any) => {
            // `**` may consume any prefix of what remains, including none.
            (0..=path.len()).any(|n| matches_from(&path[n..], &pattern[1..]))
        }
    }
}

struct LocationWalker {
    target: usize,
    segments: Vec<Segment>,
    previous_node: Option<PreviousNode>,
    is_at_property_key: bool,
    /// Once the target offset has been passed, further callbacks must not
    /// perturb the recorded state — the walk still runs to completion
    /// (this is just a `Visitor`, it doesn't get to abort `visit`), but
    /// every callback checks this first.
    settled: bool,
}

impl LocationWalker {
    fn new(target: usize) -> Self {
        Self {
            target,
            segments: Vec::new(),
            previous_node: None,
            is_at_property_key: false,
            settled: false,
        }
    }

    fn settle_if_past(&mut self, offset: usize) {
        if self.target <= offset {
            self.settled = true;
        }
    }
}

impl Visitor for LocationWalker {
    fn on_object_begin(&mut self, offset: usize, _length: usize) {
        if self.settled {
            return;
        }
        self.previous_node = None;
        self.is_at_property_key = self.target > offset;
        self.segments.push(Segment::Property(String::new()));
        self.settle_if_past(offset);
    }

    fn on_object_property(&mut self, name: &str, offset: usize, length: usize) {
        if self.settled {
            return;
        }
        if let Some(last) = self.segments.last_mut() {
            *last = Segment::Property(name.to_string());
        }
        self.previous_node = Some(PreviousNode {
            kind: PreviousNodeKind::Property,
            offset,
            length,
        });
        self.settle_if_past(offset + length);
    }

    fn on_object_end(&mut self, offset: usize, _length: usize) {
        if self.settled {
            return;
        }
        self.segments.pop();
        self.settle_if_past(offset);
    }

    fn on_array_begin(&mut self, offset: usize, _length: usize) {
        if self.settled {
            return;
        }
        self.previous_node = None;
        self.segments.push(Segment::Index(0));
        self.settle_if_past(offset);
    }

    fn on_array_end(&mut self, offset: usize, _length: usize) {
        if self.settled {
            return;
        }
        self.segments.pop();
        self.settle_if_past(offset);
    }

    fn on_literal_value(&mut self, value: Value, offset: usize, length: usize) {
        if self.settled {
            return;
        }
        let kind = match value {
            Value::Bool(_) => PreviousNodeKind::Bool,
            Value::Number(_) => PreviousNodeKind::Number,
            Value::String(_) => PreviousNodeKind::String,
            Value::Null => PreviousNodeKind::Null,
            // Arrays/objects report through begin/end, not a literal.
            Value::Array(_) | Value::Object(_) => return,
        };
        self.previous_node = Some(PreviousNode { kind, offset, length });
        self.settle_if_past(offset + length);
    }

    fn on_separator(&mut self, character: char, offset: usize, _length: usize) {
        if self.settled {
            return;
        }
        match character {
            ',' => {
                self.previous_node = None;
                match self.segments.last_mut() {
                    Some(Segment::Index(i)) => *i += 1,
                    Some(last @ Segment::Property(_)) => {
                        *last = Segment::Property(String::new());
                        self.is_at_property_key = true;
                    }
                    None => {}
                }
            }
            ':' => self.is_at_property_key = false,
            _ => {}
        }
        self.settle_if_past(offset);
    }
}

/// Finds the semantic location of `offset` within `text`: the path down to
/// the construct it sits inside, whether it's in a property's key slot, and
/// the nearest complete token before it.
pub fn get_location(text: &str, offset: usize) -> Location {
    let mut walker = LocationWalker::new(offset);
    let _ = visit(text, &mut walker, ParseOptions::default());
    Location {
        path: walker.segments,
        previous_node: walker.previous_node,
        is_at_property_key: walker.is_at_property_key,
    }
}
