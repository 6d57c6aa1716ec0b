//! Property tests for catalog validation

use proptest::prelude::*;
use serde_json::{json, Map, Value};

use crate::catalog::{validate_entry, Catalog, CatalogSources, EventOption, Impact, OptionOutcome};
use crate::config::{Difficulty, SeasonStage, StageSet};
use crate::error::PoolKind;

// ═══════════════════════════════════════════════════════════════════════════
// Strategy generators for property tests
// ═══════════════════════════════════════════════════════════════════════════

const KNOWN_TAGS: [&str; 10] = [
    "any",
    "pre-season",
    "regular-season",
    "regular-season-start",
    "regular-season-mid",
    "regular-season-end",
    "playoffs",
    "post-season",
    "off-season",
    "Regular Season Mid",
];

const UNKNOWN_TAGS: [&str; 3] = ["halftime", "preseason", "PRE-SEASON"];

/// Weight map over a random subset of the difficulty labels, sometimes with a stray key
fn weights_strategy() -> impl Strategy<Value = (Value, bool)> {
    (
        prop::collection::vec(any::<bool>(), 5),
        prop::collection::vec(0.0..=1.0f64, 5),
        any::<bool>(),
    )
        .prop_map(|(present, values, stray)| {
            let mut map = Map::new();
            for ((difficulty, keep), value) in Difficulty::ALL.iter().zip(&present).zip(&values) {
                if *keep {
                    map.insert(difficulty.label().to_string(), json!(value));
                }
            }
            if stray {
                map.insert("easy".to_string(), json!(0.5));
            }
            let valid = present.iter().all(|p| *p) && !stray;
            (Value::Object(map), valid)
        })
}

fn stages_strategy() -> impl Strategy<Value = (Vec<String>, bool)> {
    (
        prop::collection::vec(prop::sample::select(KNOWN_TAGS.to_vec()), 0..=3),
        prop::collection::vec(prop::sample::select(UNKNOWN_TAGS.to_vec()), 0..=1),
    )
        .prop_map(|(known, unknown)| {
            let valid = !known.is_empty() && unknown.is_empty();
            let tags = known.into_iter().chain(unknown).map(str::to_string).collect();
            (tags, valid)
        })
}

/// Option tree up to three levels deep; leaves are plain or weighted impacts
fn option_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        "[a-z]{1,8}".prop_map(|impact| json!({"description": "leaf", "impact": impact})),
        prop::collection::vec(("[a-z]{1,8}", 0.1..=5.0f64), 1..=3).prop_map(|entries| {
            let impact: Vec<Value> = entries
                .into_iter()
                .map(|(text, weight)| json!({"impact": text, "weight": weight}))
                .collect();
            json!({"description": "random leaf", "impact": impact})
        }),
    ];
    leaf.prop_recursive(3, 12, 3, |inner| {
        prop::collection::vec(inner, 1..=3)
            .prop_map(|children| json!({"description": "branch", "options": children}))
    })
}

fn entry(id: i32, weights: Value, stages: &[String], options: Vec<Value>) -> Value {
    let mut raw = json!({
        "id": id,
        "title": "Title",
        "description": "Description",
        "impact": "",
        "category": "misc",
        "difficulty_weights": weights,
        "season_stages": stages,
    });
    if !options.is_empty() {
        raw["options"] = Value::Array(options);
    }
    raw
}

fn full_weights() -> Value {
    json!({"cupcake": 0.2, "rookie": 0.2, "pro": 0.2, "all-madden": 0.2, "diabolical": 0.2})
}

fn assert_leaves_well_formed(options: &[EventOption]) {
    for option in options {
        assert!(!option.description.is_empty());
        match &option.outcome {
            OptionOutcome::Impact(Impact::Plain(text)) => assert!(!text.trim().is_empty()),
            OptionOutcome::Impact(Impact::Random(entries)) => {
                assert!(!entries.is_empty());
                assert!(entries.iter().all(|e| e.weight >= 0.0));
            }
            OptionOutcome::Branch(children) => {
                assert!(!children.is_empty());
                assert_leaves_well_formed(children);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Property Tests
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    /// An entry loads only with a complete weight map and known, non-empty stages
    #[test]
    fn prop_weights_and_stages_gate_validation(
        (weights, weights_ok) in weights_strategy(),
        (stages, stages_ok) in stages_strategy()
    ) {
        let raw = entry(1, weights, &stages, Vec::new());
        match validate_entry(PoolKind::Standard, 0, &raw) {
            Ok(event) => {
                prop_assert!(weights_ok && stages_ok);
                for difficulty in Difficulty::ALL {
                    let w = event.weight(difficulty);
                    prop_assert!((0.0..=1.0).contains(&w));
                }
                prop_assert!(!event.stages.is_empty());
                prop_assert!(event.stages.iter().all(|s| SeasonStage::ALL.contains(&s)));
            }
            Err(err) => {
                prop_assert!(!(weights_ok && stages_ok));
                prop_assert_eq!(err.event_id, Some(1));
                let field_ok = err.field == "difficulty_weights" || err.field == "season_stages";
                prop_assert!(field_ok);
            }
        }
    }

    /// Every leaf of a validated option tree has a description and a usable impact
    #[test]
    fn prop_option_leaves_well_formed(
        options in prop::collection::vec(option_strategy(), 1..=4)
    ) {
        let raw = entry(3, full_weights(), &["any".to_string()], options.clone());
        let event = validate_entry(PoolKind::Standard, 0, &raw).unwrap();
        prop_assert_eq!(event.options.len(), options.len());
        assert_leaves_well_formed(&event.options);
        prop_assert!(event.scenario_count() >= event.options.len() as u64);
    }

    /// Combined pool length is the sum of both pools and ids never collide
    #[test]
    fn prop_combined_pool_length(
        standard in 0..=20usize,
        unrealistic in 0..=20usize
    ) {
        let any = ["any".to_string()];
        let sources = CatalogSources {
            standard: (0..standard).map(|i| entry(i as i32, full_weights(), &any, Vec::new())).collect(),
            unrealistic: (0..unrealistic)
                .map(|i| entry(1000 + i as i32, full_weights(), &any, Vec::new()))
                .collect(),
            custom: Vec::new(),
        };
        let catalog = Catalog::load(&sources).unwrap();

        let combined = catalog.pool(true);
        prop_assert_eq!(combined.len(), standard + unrealistic);
        prop_assert_eq!(catalog.pool(false).len(), standard);

        let mut ids: Vec<i32> = combined.iter().map(|e| e.id).collect();
        let in_order = ids.clone();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), combined.len());
        // standard first
        prop_assert!(in_order.iter().take(standard).all(|id| *id < 1000));
    }
}

#[test]
fn test_group_tags_expand_to_canonical_stages() {
    let raw = entry(9, full_weights(), &["regular-season".to_string()], Vec::new());
    let event = validate_entry(PoolKind::Standard, 0, &raw).unwrap();
    let expected: StageSet = [
        SeasonStage::RegularSeasonStart,
        SeasonStage::RegularSeasonMid,
        SeasonStage::RegularSeasonEnd,
    ]
    .into_iter()
    .collect();
    assert_eq!(event.stages, expected);
}
