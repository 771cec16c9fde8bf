//! The typed tree builder: materializes a document into an arena of
//! [`Node`]s addressed by index, each carrying an optional parent link.
//!
//! Rather than a lossless CST — a `rowan`-style green/red tree preserves
//! every whitespace and comment token so the tree round-trips to source
//! text, a strictly larger contract than this crate needs (insignificant
//! whitespace is explicitly not preserved) — this module is a from-scratch
//! arena built incrementally by a `Parser`-driven `Visitor`, the same
//! construction style as [`crate::value::parse`].

use crate::parser::{visit, ParseOptions, Visitor};
use crate::value::Value;
use crate::Error;

/// An index into a [`Node`] arena. Stable for the lifetime of the tree that
/// produced it; indices from one tree are meaningless against another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// A path segment used by [`find_node_at_location`]/[`get_node_path`]: an
/// object property name or an array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Property(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq)]
enum NodeKind {
    Object,
    Array,
    Property,
    String(String),
    Number(f64),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    offset: usize,
    length: usize,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// For a `Property` node, the offset of its `:` separator, if one was
    /// found. `None` on a property recovered without a colon.
    colon_offset: Option<usize>,
}

/// A node in the parsed tree. Borrowed from a [`Node`] tree's backing arena;
/// all queries that walk the tree (parent, children, path) go through
/// `NodeId` indices rather than owned subtrees.
pub struct Node {
    arena: Vec<NodeData>,
    root: NodeId,
}

impl Node {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn offset(&self, id: NodeId) -> usize {
        self.arena[id.0].offset
    }

    pub fn node_length(&self, id: NodeId) -> usize {
        self.arena[id.0].length
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.arena[id.0].children
    }

    pub fn is_object(&self, id: NodeId) -> bool {
        matches!(self.arena[id.0].kind, NodeKind::Object)
    }

    pub fn is_array(&self, id: NodeId) -> bool {
        matches!(self.arena[id.0].kind, NodeKind::Array)
    }

    pub fn is_property(&self, id: NodeId) -> bool {
        matches!(self.arena[id.0].kind, NodeKind::Property)
    }

    /// The offset of a property's `:` separator, if it had one.
    pub fn colon_offset(&self, id: NodeId) -> Option<usize> {
        self.arena[id.0].colon_offset
    }

    /// The property name, for a `Property` node's first child (a `String`
    /// node, per invariant: a property's first child is always its key).
    pub fn property_name(&self, id: NodeId) -> Option<&str> {
        if !self.is_property(id) {
            return None;
        }
        let key_id = *self.arena[id.0].children.first()?;
        match &self.arena[key_id.0].kind {
            NodeKind::String(s) => Some(s),
            _ => None,
        }
    }

    /// Finds the descendant at `path`, following object properties by name
    /// and array elements by index.
    pub fn find_at_location(&self, path: &[Segment]) -> Option<NodeId> {
        let mut current = self.root;
        for segment in path {
            current = self.step(current, segment)?;
        }
        Some(current)
    }

    fn step(&self, id: NodeId, segment: &Segment) -> Option<NodeId> {
        match segment {
            Segment::Property(name) => {
                if !self.is_object(id) {
                    return None;
                }
                self.children(id).iter().find_map(|&prop_id| {
                    if self.property_name(prop_id) == Some(name.as_str()) {
                        self.arena[prop_id.0].children.get(1).copied()
                    } else {
                        None
                    }
                })
            }
            Segment::Index(i) => {
                if !self.is_array(id) {
                    return None;
                }
                self.children(id).get(*i).copied()
            }
        }
    }

    /// Finds the innermost node whose span contains `offset`. When
    /// `include_right_bound` is set, a node whose span ends exactly at
    /// `offset` is still considered a match (useful for "what's at the
    /// cursor" queries right after a closing token).
    pub fn find_at_offset(&self, offset: usize, include_right_bound: bool) -> Option<NodeId> {
        self.find_at_offset_from(self.root, offset, include_right_bound)
    }

    fn find_at_offset_from(
        &self,
        id: NodeId,
        offset: usize,
        include_right_bound: bool,
    ) -> Option<NodeId> {
        let data = &self.arena[id.0];
        let end = data.offset + data.length;
        let contains = offset >= data.offset
            && (offset < end || (include_right_bound && offset == end));
        if !contains {
            return None;
        }

        let children = &data.children;
        let idx = children.partition_point(|&child| {
            let c = &self.arena[child.0];
            c.offset + c.length <= offset
        });
        if let Some(&child) = children.get(idx) {
            if let Some(found) =
                self.find_at_offset_from(child, offset, include_right_bound)
            {
                return Some(found);
            }
        }
        Some(id)
    }

    /// Reconstructs the path from the root down to `id`.
    pub fn path_to(&self, id: NodeId) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            match self.arena[parent.0].kind {
                NodeKind::Array => {
                    let index = self.children(parent).iter().position(|&c| c == current);
                    if let Some(index) = index {
                        segments.push(Segment::Index(index));
                    }
                }
                NodeKind::Property => {
                    if let Some(name) = self.property_name(parent) {
                        segments.push(Segment::Property(name.to_string()));
                    }
                }
                _ => {}
            }
            current = parent;
        }
        segments.reverse();
        segments
    }

    /// Rebuilds the [`Value`] rooted at `id`.
    pub fn value_at(&self, id: NodeId) -> Value {
        match &self.arena[id.0].kind {
            NodeKind::Null => Value::Null,
            NodeKind::Bool(b) => Value::Bool(*b),
            NodeKind::Number(n) => Value::Number(*n),
            NodeKind::String(s) => Value::String(s.clone()),
            NodeKind::Array => Value::Array(
                self.children(id).iter().map(|&c| self.value_at(c)).collect(),
            ),
            NodeKind::Object => Value::Object(
                self.children(id)
                    .iter()
                    .filter_map(|&prop_id| {
                        let name = self.property_name(prop_id)?.to_string();
                        let value_id = *self.arena[prop_id.0].children.get(1)?;
                        Some((name, self.value_at(value_id)))
                    })
                    .collect(),
            ),
        }
    }
}

struct TreeBuilder {
    arena: Vec<NodeData>,
    stack: Vec<NodeId>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            arena: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn push(&mut self, kind: NodeKind, offset: usize, length: usize) -> NodeId {
        let parent = self.stack.last().copied();
        let id = NodeId(self.arena.len());
        self.arena.push(NodeData {
            kind,
            offset,
            length,
            parent,
            children: Vec::new(),
            colon_offset: None,
        });
        if let Some(parent) = parent {
            self.arena[parent.0].children.push(id);
        }
        id
    }

    fn set_span(&mut self, id: NodeId, offset: usize, length: usize) {
        self.arena[id.0].offset = offset;
        self.arena[id.0].length = length;
    }
}

impl Visitor for TreeBuilder {
    fn on_object_begin(&mut self, offset: usize, _length: usize) {
        let id = self.push(NodeKind::Object, offset, 0);
        self.stack.push(id);
    }

    fn on_object_property(&mut self, name: &str, offset: usize, length: usize) {
        let prop_id = self.push(NodeKind::Property, offset, length);
        self.push_key(prop_id, name, offset, length);
        self.stack.push(prop_id);
    }

    fn on_object_end(&mut self, offset: usize, length: usize) {
        if let Some(prop_id) = self.current_open_property() {
            self.stack.pop();
            self.close(prop_id);
        }
        if let Some(obj_id) = self.stack.pop() {
            self.set_span(obj_id, self.arena[obj_id.0].offset, offset + length - self.arena[obj_id.0].offset);
        }
    }

    fn on_array_begin(&mut self, offset: usize, _length: usize) {
        let id = self.push(NodeKind::Array, offset, 0);
        self.stack.push(id);
    }

    fn on_array_end(&mut self, offset: usize, length: usize) {
        if let Some(arr_id) = self.stack.pop() {
            self.set_span(arr_id, self.arena[arr_id.0].offset, offset + length - self.arena[arr_id.0].offset);
        }
    }

    fn on_literal_value(&mut self, value: Value, offset: usize, length: usize) {
        let kind = match value {
            Value::Null => NodeKind::Null,
            Value::Bool(b) => NodeKind::Bool(b),
            Value::Number(n) => NodeKind::Number(n),
            Value::String(s) => NodeKind::String(s),
            Value::Array(_) | Value::Object(_) => return, // built via begin/end callbacks
        };
        self.push(kind, offset, length);
        self.close_if_property();
    }

    fn on_value_missing(&mut self, _offset: usize) {
        // No value child to attach: close the property (if one is open)
        // with just its key, leaving the value child absent.
        self.close_if_property();
    }

    fn on_separator(&mut self, character: char, offset: usize, _length: usize) {
        if character == ':' {
            if let Some(prop_id) = self.current_open_property() {
                self.arena[prop_id.0].colon_offset = Some(offset);
            }
        }
    }
    fn on_comment(&mut self, _offset: usize, _length: usize) {}
    fn on_error(&mut self, _error: crate::error::ParseErrorCode, _offset: usize, _length: usize) {}
}

impl TreeBuilder {
    fn push_key(&mut self, _prop_id: NodeId, name: &str, offset: usize, length: usize) {
        self.push(NodeKind::String(name.to_string()), offset, length);
    }

    fn current_open_property(&self) -> Option<NodeId> {
        self.stack.last().copied().filter(|&id| self.arena[id.0].kind == NodeKind::Property)
    }

    fn close(&mut self, prop_id: NodeId) {
        if let Some(&value_id) = self.arena[prop_id.0].children.get(1) {
            let value = &self.arena[value_id.0];
            let end = value.offset + value.length;
            let start = self.arena[prop_id.0].offset;
            self.set_span(prop_id, start, end.saturating_sub(start));
        }
    }

    fn close_if_property(&mut self) {
        if let Some(prop_id) = self.current_open_property() {
            self.stack.pop();
            self.close(prop_id);
        }
    }
}

impl PartialEq for NodeKind {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Parses `text` into a [`Node`] tree, returning recovered errors alongside.
pub fn parse_tree(text: &str, options: ParseOptions) -> (Node, Vec<Error>) {
    let mut builder = TreeBuilder::new();
    let errors = visit(text, &mut builder, options);
    // The root is always the first node pushed, since nothing can be
    // pushed before the top-level value's own begin/literal callback.
    let root = NodeId(0);
    let node = Node {
        arena: if builder.arena.is_empty() {
            vec![NodeData {
                kind: NodeKind::Null,
                offset: 0,
                length: 0,
                parent: None,
                children: Vec::new(),
                colon_offset: None,
            }]
        } else {
            builder.arena
        },
        root,
    };
    (node, errors)
}

/// The path from the tree's root to `node` (module-level convenience
/// mirroring [`Node::path_to`]).
pub fn get_node_path(tree: &Node, node: NodeId) -> Vec<Segment> {
    tree.path_to(node)
}

/// Rebuilds the [`Value`] at `node` (module-level convenience mirroring
/// [`Node::value_at`]).
pub fn get_node_value(tree: &Node, node: NodeId) -> Value {
    tree.value_at(node)
}
