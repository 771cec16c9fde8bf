//! The value materializer: turns a document straight into a [`Value`] tree,
//! skipping the intermediate [`crate::tree::Node`] arena entirely.
//!
//! Implemented as a small stack-based [`crate::parser::Visitor`] — the
//! cheapest possible consumer of the streaming parser, and the shape
//! spec.md's §4.5 describes directly: a stack of in-progress containers,
//! popped on `on_*_end` and attached to whatever is now on top.

use crate::parser::{visit, ParseOptions, Visitor};
use crate::Error;

/// A materialized JSON5 value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// JSON5 numbers may be `NaN`/`Infinity`/`-Infinity`, which `serde_json`-
    /// style number types can't represent, so this stores an `f64` directly.
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a property by name on an object value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

enum Frame {
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
}

struct Materializer {
    stack: Vec<Frame>,
    pending_key: Option<String>,
    root: Option<Value>,
}

impl Materializer {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            pending_key: None,
            root: None,
        }
    }

    fn attach(&mut self, value: Value) {
        match self.stack.last_mut() {
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Object(entries)) => {
                let key = self.pending_key.take().unwrap_or_default();
                // Later occurrences overwrite earlier ones, in place, so
                // property order reflects first appearance.
                match entries.iter_mut().find(|(k, _)| *k == key) {
                    Some(entry) => entry.1 = value,
                    None => entries.push((key, value)),
                }
            }
            None => self.root = Some(value),
        }
    }
}

impl Visitor for Materializer {
    fn on_object_begin(&mut self, _offset: usize, _length: usize) {
        self.stack.push(Frame::Object(Vec::new()));
    }

    fn on_object_property(&mut self, name: &str, _offset: usize, _length: usize) {
        self.pending_key = Some(name.to_string());
    }

    fn on_object_end(&mut self, _offset: usize, _length: usize) {
        if let Some(Frame::Object(entries)) = self.stack.pop() {
            self.attach(Value::Object(entries));
        }
    }

    fn on_array_begin(&mut self, _offset: usize, _length: usize) {
        self.stack.push(Frame::Array(Vec::new()));
    }

    fn on_array_end(&mut self, _offset: usize, _length: usize) {
        if let Some(Frame::Array(items)) = self.stack.pop() {
            self.attach(Value::Array(items));
        }
    }

    fn on_literal_value(&mut self, value: Value, _offset: usize, _length: usize) {
        self.attach(value);
    }

    fn on_value_missing(&mut self, _offset: usize) {
        self.attach(Value::Null);
    }

    fn on_separator(&mut self, _character: char, _offset: usize, _length: usize) {}
    fn on_comment(&mut self, _offset: usize, _length: usize) {}
    fn on_error(&mut self, _error: crate::error::ParseErrorCode, _offset: usize, _length: usize) {}
}

/// Parses `text` into a [`Value`], accumulating any recovered errors
/// instead of stopping at the first one.
pub fn parse(text: &str, options: ParseOptions) -> (Value, Vec<Error>) {
    let mut materializer = Materializer::new();
    let errors = visit(text, &mut materializer, options);
    (materializer.root.unwrap_or(Value::Null), errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_nested_object_and_array() {
        let (value, errors) = parse(r#"{ a: [1, 2, 'x'], b: true }"#, ParseOptions::default());
        assert!(errors.is_empty());
        assert_eq!(
            value,
            Value::Object(vec![
                (
                    "a".to_string(),
                    Value::Array(vec![
                        Value::Number(1.0),
                        Value::Number(2.0),
                        Value::String("x".to_string())
                    ])
                ),
                ("b".to_string(), Value::Bool(true)),
            ])
        );
    }

    #[test]
    fn recovers_from_missing_comma() {
        let (value, errors) = parse("[ 1 2, 3 ]", ParseOptions::default());
        assert!(!errors.is_empty());
        assert_eq!(
            value,
            Value::Array(vec![
                Value::Number(1.0),
                Value::Number(2.0),
                Value::Number(3.0)
            ])
        );
    }

    #[test]
    fn get_looks_up_object_property() {
        let (value, _) = parse(r#"{ "k": 42 }"#, ParseOptions::default());
        assert_eq!(value.get("k").and_then(Value::as_f64), Some(42.0));
    }

    #[test]
    fn duplicate_keys_keep_first_position_but_last_value() {
        let (value, _) = parse(r#"{ "a": 1, "b": 2, "a": 3 }"#, ParseOptions::default());
        assert_eq!(
            value.as_object().map(|o| o.to_vec()),
            Some(vec![
                ("a".to_string(), Value::Number(3.0)),
                ("b".to_string(), Value::Number(2.0)),
            ])
        );
    }
}
