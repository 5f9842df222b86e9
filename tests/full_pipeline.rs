//! End-to-end pipeline tests over a probe-format JSONL catalog: load →
//! normalize → vector space → slots → scoring → dedup → MMR → reasons.

use std::io::Write;
use std::sync::Arc;

use giftrec::{Engine, EngineConfig, JsonlDirSource, Lexicon};

const FRAGRANCE_QUERY: &str = "여사친 생일 3만 이하, 향 강한 건 싫어";

fn write_catalog(dir: &std::path::Path) {
    let mut part1 = std::fs::File::create(dir.join("part_0001.jsonl")).unwrap();
    writeln!(
        part1,
        r#"{{"ok": true, "path": ["뷰티"], "link": "https://shop.example/beauty", "products": []}}"#
    )
    .unwrap();
    writeln!(
        part1,
        r#"{{"ok": true, "path": ["뷰티"], "link": "https://shop.example/beauty", "products": [{{"prod_name": "무향 핸드크림", "price": "25,000", "rating_weighted": "4.7", "review_count": "3200", "tags": "무향/저자극/보습"}}, {{"prod_name": "로즈 향수 미니어처", "price": "28,000", "rating_weighted": "4.5", "review_count": "5000", "tags": "프래그런스/진한 향"}}]}}"#
    )
    .unwrap();

    let mut part2 = std::fs::File::create(dir.join("part_0002.jsonl")).unwrap();
    writeln!(
        part2,
        r#"{{"ok": true, "path": ["리빙", "주방"], "link": "https://shop.example/kitchen", "products": [{{"prod_name": "스텐 텀블러", "price": "29,000", "rating_weighted": "4.6", "review_count": "2100", "tags": "보온/보냉"}}]}}"#
    )
    .unwrap();
    writeln!(
        part2,
        r#"{{"ok": false, "products": [{{"prod_name": "응답 실패 페이지 상품"}}]}}"#
    )
    .unwrap();
    writeln!(
        part2,
        r#"{{"ok": true, "path": ["리빙"], "link": "https://shop.example/living", "products": [{{"prod_name": "무드등 수면등", "price": "52,000", "rating_weighted": "4.8", "review_count": "8000", "tags": "조명/무드"}}, {{"prod_name": "가습기 미니", "price": "23,000", "rating_weighted": "4.3", "review_count": "1200", "tags": "데스크/실용"}}]}}"#
    )
    .unwrap();
}

fn engine_over_tempdir() -> (tempfile::TempDir, Engine) {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let engine = Engine::new(
        Arc::new(JsonlDirSource::new(dir.path())),
        Lexicon::default(),
        EngineConfig::default(),
    )
    .unwrap();
    (dir, engine)
}

#[test]
fn fragrance_query_over_jsonl_catalog() {
    let (_dir, engine) = engine_over_tempdir();
    let rec = engine.recommend(FRAGRANCE_QUERY, 10, false).unwrap();

    assert_eq!(rec.slots.budget_max, Some(30_000));
    assert_eq!(rec.slots.occasion.as_deref(), Some("생일"));
    assert_eq!(rec.slots.relation.as_deref(), Some("여사친"));
    assert_eq!(rec.slots.forbidden, vec!["향".to_string()]);

    assert!(!rec.items.is_empty());
    // The scented item never survives the forbidden filter.
    assert!(rec.items.iter().all(|i| i.item.title != "로즈 향수 미니어처"));

    let cream = rec
        .items
        .iter()
        .find(|i| i.item.title == "무향 핸드크림")
        .expect("fragrance-free item in results");
    assert!(!cream.budget_outside);
    assert!(cream.reason.contains("금기 충족"));
    assert_eq!(cream.item.category_path, vec!["뷰티".to_string()]);
    assert_eq!(cream.item.link, "https://shop.example/beauty");
}

#[test]
fn hard_budget_excludes_what_soft_mode_penalizes() {
    let (_dir, engine) = engine_over_tempdir();

    let soft = engine.recommend(FRAGRANCE_QUERY, 10, false).unwrap();
    let lamp_soft = soft
        .items
        .iter()
        .find(|i| i.item.title == "무드등 수면등")
        .expect("over-budget item present in soft mode");
    assert!(lamp_soft.budget_outside);

    let hard = engine.recommend(FRAGRANCE_QUERY, 10, true).unwrap();
    assert!(hard.items.iter().all(|i| i.item.title != "무드등 수면등"));
    assert!(!hard.items.is_empty());
}

#[test]
fn results_are_capped_by_top_k_and_first_is_best() {
    let (_dir, engine) = engine_over_tempdir();
    let rec = engine.recommend("실용적인 리빙 선물", 2, false).unwrap();
    assert!(rec.items.len() <= 2);
    assert_eq!(rec.applied_top_k, 2);
    if rec.items.len() == 2 {
        assert!(rec.items[0].score >= rec.items[1].score - 1e-6);
    }
}

#[test]
fn recommendation_serializes_for_the_boundary_layer() {
    let (_dir, engine) = engine_over_tempdir();
    let rec = engine.recommend(FRAGRANCE_QUERY, 3, false).unwrap();
    let json = serde_json::to_value(&rec).unwrap();
    assert!(json["items"].is_array());
    assert_eq!(json["slots"]["budget_max"], 30_000);
    assert_eq!(json["applied_top_k"], 3);
    let first = &json["items"][0];
    assert!(first["title"].is_string());
    assert!(first["reason"].is_string());
    assert!(first["score"].is_number());
}

#[tokio::test(flavor = "multi_thread")]
async fn warm_up_then_query() {
    let (_dir, engine) = engine_over_tempdir();
    engine.warm_up();
    engine.warm_up();
    let rec = engine.recommend("집들이 무드등", 5, false).unwrap();
    assert!(!rec.items.is_empty());
    assert_eq!(rec.slots.occasion.as_deref(), Some("집들이"));
}
