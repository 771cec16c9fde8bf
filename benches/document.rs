use criterion::*;
use json5_tolerant::{parse, parse_tree, ParseOptions};

fn clean_document() -> String {
    let mut entries = String::from("{\n");
    for i in 0..200 {
        entries.push_str(&format!(
            "  \"field_{i}\": {{ \"id\": {i}, \"name\": \"item-{i}\", \"tags\": [\"a\", \"b\", \"c\"], \"active\": true }},\n"
        ));
    }
    entries.push_str("  \"trailing\": null\n}\n");
    entries
}

fn malformed_document() -> String {
    // Missing commas and a dangling property: forces the recovery paths on
    // every iteration rather than the happy path `clean_document` exercises.
    let mut entries = String::from("{\n");
    for i in 0..200 {
        entries.push_str(&format!("  \"field_{i}\": {{ \"id\": {i} \"name\": \"item-{i}\" }}\n"));
    }
    entries.push_str("  \"trailing\":\n");
    entries
}

fn bench_parse_clean(c: &mut Criterion) {
    let text = clean_document();
    c.bench_function("parse_clean_document", move |b| {
        b.iter(|| {
            let (value, errors) = parse(black_box(&text), ParseOptions::default());
            assert!(errors.is_empty());
            black_box(value);
        })
    });
}

fn bench_parse_tree_clean(c: &mut Criterion) {
    let text = clean_document();
    c.bench_function("parse_tree_clean_document", move |b| {
        b.iter(|| {
            let (tree, errors) = parse_tree(black_box(&text), ParseOptions::default());
            assert!(errors.is_empty());
            black_box(tree);
        })
    });
}

fn bench_parse_malformed(c: &mut Criterion) {
    let text = malformed_document();
    c.bench_function("parse_malformed_document", move |b| {
        b.iter(|| {
            let (value, errors) = parse(black_box(&text), ParseOptions::default());
            black_box((value, errors));
        })
    });
}

criterion_group!(benches, bench_parse_clean, bench_parse_tree_clean, bench_parse_malformed);
criterion_main!(benches);
