//! Benchmark for catalog loading and full rolls

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use franchise_events_core::{
    Catalog, CatalogSources, Difficulty, EventEngine, RollRequest, Roster, SeasonStage,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};

const STAGES: [&str; 6] = [
    "pre-season",
    "regular-season",
    "playoffs",
    "off-season",
    "any",
    "regular-season-end",
];

/// Create a catalog about the size of a real one
fn create_test_sources() -> CatalogSources {
    let event = |id: i32| -> Value {
        let weight = (id % 10) as f64 / 20.0;
        let mut raw = json!({
            "id": id,
            "title": format!("{{QB1}} event {}", id),
            "description": "{target} is in the headlines",
            "impact": "",
            "category": "media",
            "difficulty_weights": {
                "cupcake": weight, "rookie": weight, "pro": weight,
                "all-madden": weight, "diabolical": weight
            },
            "season_stages": [STAGES[id as usize % STAGES.len()]],
            "target_options": ["QB1", "WR1", "HB1"],
        });
        if id % 3 == 0 {
            raw["options"] = json!([
                {"description": "Back {target}", "impact": "+2 morale"},
                {"description": "Bench {target}", "impact": [
                    {"impact": "{target} sulks", "weight": 0.7},
                    {"impact": "{target} responds", "weight": 0.3}
                ]}
            ]);
        } else {
            raw["impact"] = json!("{target} -1 AWR");
        }
        raw
    };

    CatalogSources {
        standard: (1..=300).map(event).collect(),
        unrealistic: (1000..1100).map(event).collect(),
        custom: Vec::new(),
    }
}

fn create_roster() -> Roster {
    [("QB1", "Joe Burrow"), ("WR1", "Ja'Marr Chase"), ("HB1", "Chase Brown")]
        .into_iter()
        .collect()
}

fn benchmark_catalog_load(c: &mut Criterion) {
    let sources = create_test_sources();
    c.bench_function("catalog_load_400", |b| {
        b.iter(|| black_box(Catalog::load(black_box(&sources)).unwrap()))
    });
}

fn benchmark_roll(c: &mut Criterion) {
    let engine = EventEngine::from_sources(&create_test_sources()).unwrap();
    let roster = create_roster();
    let request = RollRequest::new(Difficulty::AllMadden, SeasonStage::RegularSeasonMid)
        .with_unrealistic(true);
    let mut rng = StdRng::seed_from_u64(7);

    c.bench_function("roll_and_resolve", |b| {
        b.iter(|| {
            let rolled = engine.roll_with(black_box(&request), &roster, &mut rng).unwrap();
            black_box(rolled)
        })
    });

    // Choice-time redraw on an option event
    let rolled = engine.resolve_by_id(3, &roster).unwrap();
    c.bench_function("choose_random_leaf", |b| {
        b.iter(|| black_box(rolled.choose_with(&[1], &roster, &mut rng).unwrap()))
    });
}

criterion_group!(benches, benchmark_catalog_load, benchmark_roll);
criterion_main!(benches);
