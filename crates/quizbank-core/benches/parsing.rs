use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizbank_core::parser::{parse_bank, validate_bank};

fn generate_bank_json(n: usize) -> String {
    let questions: Vec<serde_json::Value> = (0..n)
        .map(|i| {
            serde_json::json!({
                "ksa": format!("K{}", i % 12),
                "question": format!("Which requirement applies in scenario {i}?"),
                "choices": [
                    "A. Notify the physician",
                    "B. Document in the record",
                    "C. Inform the resident representative",
                    "D. No action required"
                ],
                "correct_answers": if i % 4 == 0 { vec!["A", "C"] } else { vec!["B"] },
                "explanation": "Facilities must act promptly and document.",
                "regulations": [
                    { "id": "F580", "section": "483.10(g)(14)", "title": "Notification of Changes" }
                ]
            })
        })
        .collect();
    serde_json::to_string_pretty(&questions).unwrap()
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_bank");

    let small = generate_bank_json(10);
    let medium = generate_bank_json(200);
    let large = generate_bank_json(2000);
    let wrapped = format!(r#"{{"questions": {medium}}}"#);

    group.bench_function("10_questions", |b| {
        b.iter(|| parse_bank(black_box(small.as_bytes())))
    });

    group.bench_function("200_questions", |b| {
        b.iter(|| parse_bank(black_box(medium.as_bytes())))
    });

    group.bench_function("2000_questions", |b| {
        b.iter(|| parse_bank(black_box(large.as_bytes())))
    });

    group.bench_function("200_wrapped", |b| {
        b.iter(|| parse_bank(black_box(wrapped.as_bytes())))
    });

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let bank = parse_bank(generate_bank_json(2000).as_bytes()).unwrap();
    c.bench_function("validate_2000", |b| {
        b.iter(|| validate_bank(black_box(&bank)))
    });
}

criterion_group!(benches, bench_parse, bench_validate);
criterion_main!(benches);
