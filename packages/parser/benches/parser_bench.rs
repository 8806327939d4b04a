use criterion::{black_box, criterion_group, criterion_main, Criterion};
use folio_parser::{parse_document, serialize_document, IDGenerator};

fn parse_short_article(c: &mut Criterion) {
    let source = r#"
        <h1>Release notes</h1>
        <p>This week we shipped <span style="font-weight: bold">faster exports</span>.</p>
        <img src="cover.png" data-align="center">
    "#;

    c.bench_function("parse_short_article", |b| {
        b.iter(|| parse_document(black_box(source), &mut IDGenerator::from_seed("bench")))
    });
}

fn parse_long_article(c: &mut Criterion) {
    let section = r#"
        <div class="card" style="padding: 24px; border-radius: 12px; background-color: #f8fafc">
            <h2>Section</h2>
            <p>Intro with <span style="color: #2563eb">colour</span> and
               <span style="background-color: #fef08a; padding: 2px 4px; border-radius: 4px">highlight</span>.</p>
            <ul><li><p>first</p></li><li><p>second</p></li></ul>
            <pre><code class="language-rust">fn main() { println!("hi"); }</code></pre>
        </div>
    "#;
    let source = section.repeat(50);

    c.bench_function("parse_long_article", |b| {
        b.iter(|| parse_document(black_box(&source), &mut IDGenerator::from_seed("bench")))
    });
}

fn serialize_long_article(c: &mut Criterion) {
    let section = r#"<div style="padding: 16px"><p>a <span style="color: red">b</span> c</p></div>"#;
    let doc = parse_document(&section.repeat(100), &mut IDGenerator::from_seed("bench"));

    c.bench_function("serialize_long_article", |b| {
        b.iter(|| serialize_document(black_box(&doc)))
    });
}

criterion_group!(
    benches,
    parse_short_article,
    parse_long_article,
    serialize_long_article
);
criterion_main!(benches);
