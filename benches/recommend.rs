//! Query-path benchmark: full recommend() over a synthetic catalog with a
//! pre-warmed environment. Run with `cargo bench --bench recommend`.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use giftrec::{Engine, EngineConfig, Lexicon, MemorySource, RawProductRow};

const TITLES: [&str; 8] = [
    "스텐 텀블러 보온 보냉",
    "무향 핸드크림 저자극",
    "무드등 수면등 조명",
    "가습기 미니 데스크",
    "세라믹 머그컵",
    "다이어리 먼슬리 플래너",
    "블루투스 스피커 우드",
    "핸드타월 선물세트",
];

fn synthetic_rows(n: usize) -> Vec<RawProductRow> {
    (0..n)
        .map(|i| RawProductRow {
            product_id: Some(i as u64 + 1),
            title: format!("{} {}", TITLES[i % TITLES.len()], i / TITLES.len()),
            price: 10_000 + (i as u64 % 50) * 1_000,
            rating: 3.5 + (i % 15) as f32 * 0.1,
            popularity: (i as u64 * 37) % 10_000,
            tags: vec!["선물".into(), "실용".into()],
            category_path: vec!["리빙".into()],
            ..RawProductRow::default()
        })
        .collect()
}

fn warmed_engine(n: usize) -> Engine {
    let engine = Engine::new(
        Arc::new(MemorySource::new(synthetic_rows(n))),
        Lexicon::default(),
        EngineConfig::default(),
    )
    .expect("engine init");
    engine.force_reload().expect("environment build");
    engine
}

fn bench_recommend(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend");
    for &n in &[200usize, 1_000, 4_000] {
        let engine = warmed_engine(n);
        group.bench_with_input(BenchmarkId::new("soft_budget", n), &engine, |b, engine| {
            b.iter(|| {
                engine
                    .recommend("여사친 생일 3만 이하, 향 강한 건 싫어", 8, false)
                    .expect("recommend")
            })
        });
        group.bench_with_input(BenchmarkId::new("hard_budget", n), &engine, |b, engine| {
            b.iter(|| {
                engine
                    .recommend("집들이 5만원대 무드등", 8, true)
                    .expect("recommend")
            })
        });
    }
    group.finish();
}

fn bench_environment_build(c: &mut Criterion) {
    c.bench_function("environment_build_1000", |b| {
        let engine = warmed_engine(1_000);
        b.iter(|| engine.force_reload().expect("rebuild"))
    });
}

criterion_group!(benches, bench_recommend, bench_environment_build);
criterion_main!(benches);
