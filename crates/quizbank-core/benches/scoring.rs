use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use quizbank_core::model::Question;
use quizbank_core::scoring::score;
use quizbank_core::session::Attempt;

fn make_bank(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| Question {
            ksa: Some(format!("K{}", i % 12)),
            question: format!("Question number {i}?"),
            choices: vec![
                "A. Resident rights".into(),
                "B. Infection control".into(),
                "C. Care planning".into(),
                "D. Dietary services".into(),
            ],
            correct_answers: if i % 3 == 0 {
                vec!["A".into(), "C".into()]
            } else {
                vec!["B".into()]
            },
            explanation: "See the cited regulation.".into(),
            regulations: None,
        })
        .collect()
}

fn answered_attempt(count: usize, bank_len: usize) -> Attempt {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let mut attempt = Attempt::start_with_rng(count, bank_len, start, &mut rng).unwrap();
    for position in 0..attempt.len() {
        let letters: &[&str] = if position % 2 == 0 { &["B"] } else { &["A", "C"] };
        attempt.submit_answer(position, letters).unwrap();
    }
    attempt
}

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score");
    let bank = make_bank(500);
    let completed = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap() + Duration::minutes(95);

    for count in [10, 35, 140] {
        let attempt = answered_attempt(count, bank.len());
        group.bench_function(format!("{count}_questions"), |b| {
            b.iter(|| score(black_box(&attempt), black_box(&bank), completed))
        });
    }

    group.finish();
}

fn bench_start(c: &mut Criterion) {
    let now = Utc::now();
    c.bench_function("start_140_of_5000", |b| {
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| Attempt::start_with_rng(black_box(140), 5000, now, &mut rng))
    });
}

criterion_group!(benches, bench_score, bench_start);
criterion_main!(benches);
