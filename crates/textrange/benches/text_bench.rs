use criterion::{Criterion, black_box, criterion_group, criterion_main};

use dom::{Document, parse_document};
use textrange::{FindOptions, Position, SearchTerm, TextRange, inner_text};

fn build_document() -> Document {
    let mut html = String::new();
    for i in 0..200 {
        html.push_str(&format!(
            "<p>paragraph {i} with  some   collapsible text <b>and</b> markup</p>"
        ));
    }
    html.push_str("<table><tr><td>a</td><td>b</td></tr></table>");
    parse_document(&html)
}

fn bench_inner_text(c: &mut Criterion) {
    let doc = build_document();
    c.bench_function("inner_text", |b| {
        b.iter(|| black_box(inner_text(&doc, doc.root())))
    });
}

fn bench_find_text(c: &mut Criterion) {
    let doc = build_document();
    c.bench_function("find_text_literal", |b| {
        b.iter(|| {
            let mut range = TextRange::collapsed_at(Position::new(doc.root(), 0));
            black_box(
                range
                    .find_text(&doc, SearchTerm::Literal("markup"), &FindOptions::default())
                    .unwrap(),
            )
        })
    });
}

criterion_group!(benches, bench_inner_text, bench_find_text);
criterion_main!(benches);
