use criterion::{black_box, criterion_group, criterion_main, Criterion};
use folio_editor::{from_wire, to_wire, BlockKind, Body};
use serde_json::{Map, Value};

fn sample_wire(blocks: usize) -> Value {
    let elements: Vec<Value> = (1..=blocks)
        .map(|n| {
            let (key, value) = match n % 4 {
                0 => (format!("header{}", n), "Section heading".to_string()),
                1 => (
                    format!("text{}", n),
                    "Some paragraph text with a color#336699".to_string(),
                ),
                2 => (
                    format!("media{}", n),
                    "https://cdn.example.com/a.png | image | media_0 | image/png".to_string(),
                ),
                _ => (format!("divider{}", n), format!("divider{}", n)),
            };
            let mut element = Map::new();
            element.insert(key, Value::String(value));
            Value::Object(element)
        })
        .collect();
    Value::Array(elements)
}

fn decode_body(c: &mut Criterion) {
    let wire = sample_wire(200);

    c.bench_function("decode_body_200", |b| b.iter(|| from_wire(black_box(&wire))));
}

fn encode_body(c: &mut Criterion) {
    let body = from_wire(&sample_wire(200));

    c.bench_function("encode_body_200", |b| b.iter(|| to_wire(black_box(&body))));
}

fn append_blocks(c: &mut Criterion) {
    c.bench_function("append_100_blocks", |b| {
        b.iter(|| {
            let mut body = Body::new();
            for kind in BlockKind::ALL.iter().cycle().take(100) {
                body.append(*kind).unwrap();
            }
            black_box(body)
        })
    });
}

criterion_group!(benches, decode_body, encode_body, append_blocks);
criterion_main!(benches);
