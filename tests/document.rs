use json5_tolerant::{
    create_scanner, find_node_at_location, get_location, get_node_value, parse, parse_tree,
    ParseErrorCode, ParseOptions, PatternSegment, Segment, TokenKind, Value,
};

#[test]
fn scanner_tokenizes_keyword_literals() {
    let mut s = create_scanner("true false null", false);
    assert_eq!(s.scan(), TokenKind::Identifier);
    assert_eq!(s.token_value(), "true");
    assert_eq!(s.scan(), TokenKind::Trivia);
    assert_eq!(s.scan(), TokenKind::Identifier);
    assert_eq!(s.token_value(), "false");
    assert_eq!(s.scan(), TokenKind::Trivia);
    assert_eq!(s.scan(), TokenKind::Identifier);
    assert_eq!(s.token_value(), "null");
    assert_eq!(s.scan(), TokenKind::Eof);
}

#[test]
fn every_token_rescans_identically_after_set_position() {
    let text = r#"{ "foo": [1, 2.5, true, null] }"#;
    let mut s = create_scanner(text, true);
    let mut tokens = Vec::new();
    loop {
        let kind = s.scan();
        if kind == TokenKind::Eof {
            break;
        }
        tokens.push((kind, s.token_offset(), s.token_length(), s.token_value().to_string()));
    }

    for (kind, offset, length, value) in tokens {
        let mut rescan = create_scanner(text, true);
        rescan.set_position(offset);
        let rescanned_kind = rescan.scan();
        assert_eq!(rescanned_kind, kind, "offset {offset}");
        assert_eq!(rescan.token_length(), length, "offset {offset}");
        assert_eq!(rescan.token_value(), value, "offset {offset}");
    }
}

#[test]
fn parse_tree_handles_nested_objects_and_special_numbers() {
    let text = r#"{ 'foo': { 'bar': NaN, "car": +0x1 } }"#;
    let (tree, errors) = parse_tree(text, ParseOptions::default());
    assert!(errors.is_empty());

    let bar_path = vec![Segment::Property("foo".to_string()), Segment::Property("bar".to_string())];
    let bar = find_node_at_location(&tree, &bar_path).expect("bar resolves");
    assert!(matches!(get_node_value(&tree, bar), Value::Number(n) if n.is_nan()));

    let car_path = vec![Segment::Property("foo".to_string()), Segment::Property("car".to_string())];
    let car = find_node_at_location(&tree, &car_path).expect("car resolves");
    assert_eq!(get_node_value(&tree, car), Value::Number(1.0));
}

#[test]
fn missing_property_name_is_reported_and_recovered() {
    let (value, errors) = parse(r#"{ : 1 }"#, ParseOptions::default());
    assert!(errors.iter().any(|e| e.code == ParseErrorCode::PropertyNameExpected));
    // No property name means nothing to attach the `1` to: the stray
    // `: 1` is skipped wholesale rather than materializing as `("", 1)`.
    assert_eq!(value.as_object().map(|o| o.len()), Some(0));
}

#[test]
fn missing_colon_reports_exactly_one_error_and_no_value_attempt() {
    let (value, errors) = parse(r#"{"prp1":{""}}"#, ParseOptions::default());
    let colon_errors =
        errors.iter().filter(|e| e.code == ParseErrorCode::ColonExpected).count();
    assert_eq!(colon_errors, 1);
    assert!(!errors.iter().any(|e| e.code == ParseErrorCode::ValueExpected));

    let prp1 = value.get("prp1").expect("prp1 present");
    // The empty-named property inside recovers with no value attached.
    assert_eq!(prp1.get(""), Some(&Value::Null));
}

#[test]
fn missing_comma_in_array_is_reported_once_and_recovers_every_element() {
    let (value, errors) = parse("[ 1 2, 3 ]", ParseOptions::default());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ParseErrorCode::CommaExpected);
    assert_eq!(
        value,
        Value::Array(vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)])
    );
}

#[test]
fn get_location_reports_path_and_property_key_state() {
    let text = "{ dependencies: { fo: 1 } }";
    let offset = text.find("fo").unwrap() + 1;
    let loc = get_location(text, offset);

    assert_eq!(
        loc.path,
        vec![
            Segment::Property("dependencies".to_string()),
            Segment::Property("fo".to_string())
        ]
    );
    assert!(loc.is_at_property_key);
    assert!(loc.matches(&[PatternSegment::Exact(Segment::Property("dependencies".to_string()))]));
    assert!(!loc.matches(&[
        PatternSegment::Exact(Segment::Property("dependencies".to_string())),
        PatternSegment::One
    ]));
}

#[test]
fn disallowed_comments_are_reported_without_aborting_the_parse() {
    let text = "// a leading comment\n{ \"a\": 1 }";
    let (value, errors) = parse(text, ParseOptions { disallow_comments: true, ..Default::default() });
    assert!(errors.iter().any(|e| e.code == ParseErrorCode::InvalidCommentToken));
    assert_eq!(value.get("a"), Some(&Value::Number(1.0)));
}

#[test]
fn two_disallowed_comments_each_get_their_own_error() {
    let text = "/* leading */{ \"a\": 1, /* trailing */ \"b\": 2 }";
    let (value, errors) = parse(text, ParseOptions { disallow_comments: true, ..Default::default() });
    let comment_errors =
        errors.iter().filter(|e| e.code == ParseErrorCode::InvalidCommentToken).count();
    assert_eq!(comment_errors, 2);
    assert_eq!(value.get("a"), Some(&Value::Number(1.0)));
    assert_eq!(value.get("b"), Some(&Value::Number(2.0)));
}

#[test]
fn every_node_offset_and_length_stays_within_the_document() {
    let text = r#"{ "a": [1, { "b": "two" }, 3], "c": NaN }"#;
    let (tree, errors) = parse_tree(text, ParseOptions::default());
    assert!(errors.is_empty());

    fn check(tree: &json5_tolerant::Node, id: json5_tolerant::NodeId, text_len: usize) {
        let end = tree.offset(id) + tree.node_length(id);
        assert!(end <= text_len);
        for &child in tree.children(id) {
            let child_end = tree.offset(child) + tree.node_length(child);
            assert!(tree.offset(child) >= tree.offset(id));
            assert!(child_end <= end);
            check(tree, child, text_len);
        }
    }
    check(&tree, tree.root(), text.len());
}
