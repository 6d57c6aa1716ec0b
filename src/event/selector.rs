//! Event selection logic
//!
//! Two distinct draws live here. Event selection gates every eligible event
//! with its own acceptance roll and then picks uniformly among the accepted
//! ones, so a weight only decides whether an event enters the draw. Random
//! impacts use a single draw proportional to relative weight.

use crate::catalog::Event;
use crate::config::Difficulty;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

/// Acceptance pass: keep each event whose independent roll in [0, 1) falls below its weight
pub fn accept_candidates<'a, R: Rng + ?Sized>(
    eligible: &'a [Arc<Event>],
    difficulty: Difficulty,
    rng: &mut R,
) -> Vec<&'a Arc<Event>> {
    let mut accepted = Vec::with_capacity(eligible.len());
    for event in eligible {
        if rng.gen::<f64>() < event.weight(difficulty) {
            accepted.push(event);
        }
    }
    accepted
}

/// Two-stage selection: acceptance pass, then a uniform pick among the accepted.
///
/// `None` means no event this roll, which is a normal outcome.
pub fn select_event<R: Rng + ?Sized>(
    eligible: &[Arc<Event>],
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<Arc<Event>> {
    let accepted = accept_candidates(eligible, difficulty, rng);
    let chosen = accepted.choose(rng).map(|event| Arc::clone(event));
    log::debug!(
        "selection at {}: {} eligible, {} accepted, chose {:?}",
        difficulty,
        eligible.len(),
        accepted.len(),
        chosen.as_ref().map(|e| e.id)
    );
    chosen
}

/// Single draw with probability proportional to weight.
///
/// Zero-weight items are never chosen. Returns `None` for an empty slice or a
/// non-positive total weight.
pub fn weighted_pick<'a, T, R, F>(items: &'a [T], weight: F, rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
    F: Fn(&T) -> f64,
{
    let total_weight: f64 = items.iter().map(&weight).filter(|w| *w > 0.0).sum();
    if items.is_empty() || total_weight <= 0.0 {
        return None;
    }

    let mut random_value = rng.gen::<f64>() * total_weight;

    for item in items {
        let w = weight(item);
        if w <= 0.0 {
            continue;
        }
        if random_value < w {
            return Some(item);
        }
        random_value -= w;
    }

    // Float drift: fall back to the last positive-weight item
    items.iter().rev().find(|item| weight(*item) > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EventDraws, EventOption};
    use crate::config::{DifficultyWeights, StageSet};
    use crate::error::PoolKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn event(id: i32, weight: f64) -> Arc<Event> {
        Arc::new(Event {
            id,
            pool: PoolKind::Standard,
            title: format!("Event {}", id),
            description: String::new(),
            impact: String::new(),
            category: "misc".to_string(),
            weights: DifficultyWeights::uniform(weight),
            stages: StageSet::all(),
            options: Vec::<EventOption>::new(),
            adult_content: false,
            is_temporary: false,
            draws: EventDraws::default(),
        })
    }

    #[test]
    fn test_weighted_pick_skips_zero_weight() {
        let mut rng = StdRng::seed_from_u64(7);
        let items = vec![(1, 0.0), (2, 1.0), (3, 0.0)];
        for _ in 0..500 {
            let picked = weighted_pick(&items, |(_, w)| *w, &mut rng).unwrap();
            assert_eq!(picked.0, 2);
        }
        let zeros = vec![(1, 0.0), (2, 0.0)];
        assert!(weighted_pick(&zeros, |(_, w)| *w, &mut rng).is_none());
    }

    #[test]
    fn test_weighted_pick_follows_relative_weight() {
        let mut rng = StdRng::seed_from_u64(8);
        let outcomes = [("reports", 3.0), ("sits out", 1.0)];
        let mut reports = 0u32;
        for _ in 0..8_000 {
            if weighted_pick(&outcomes, |(_, w)| *w, &mut rng).unwrap().0 == "reports" {
                reports += 1;
            }
        }
        let share = reports as f64 / 8_000.0;
        assert!((0.70..=0.80).contains(&share), "share {}", share);

        let empty: [(&str, f64); 0] = [];
        assert!(weighted_pick(&empty, |(_, w)| *w, &mut rng).is_none());
    }

    #[test]
    fn test_certain_event_always_selected() {
        let mut rng = StdRng::seed_from_u64(1);
        let eligible = vec![event(1, 1.0)];
        for _ in 0..200 {
            assert_eq!(select_event(&eligible, Difficulty::Cupcake, &mut rng).unwrap().id, 1);
        }
    }

    #[test]
    fn test_zero_weight_never_selected() {
        let mut rng = StdRng::seed_from_u64(2);
        let eligible = vec![event(1, 0.0)];
        for _ in 0..200 {
            assert!(select_event(&eligible, Difficulty::Pro, &mut rng).is_none());
        }
    }

    #[test]
    fn test_empty_pool_is_none() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(select_event(&[], Difficulty::Pro, &mut rng).is_none());
    }

    #[test]
    fn test_weight_is_read_at_requested_difficulty() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut weights = DifficultyWeights::uniform(0.0);
        weights.set(Difficulty::Diabolical, 1.0);
        let mut only_hard = (*event(9, 0.0)).clone();
        only_hard.weights = weights;
        let eligible = vec![Arc::new(only_hard)];

        assert!(select_event(&eligible, Difficulty::Rookie, &mut rng).is_none());
        assert_eq!(
            select_event(&eligible, Difficulty::Diabolical, &mut rng).map(|e| e.id),
            Some(9)
        );
    }
}
