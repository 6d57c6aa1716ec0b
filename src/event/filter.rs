//! Eligibility filtering
//!
//! Deterministic: the same pool and stage always give the same ordered
//! subsequence. Stage labels must already be canonical [`SeasonStage`] values.

use crate::catalog::Event;
use crate::config::SeasonStage;
use std::sync::Arc;

/// Per-roll eligibility gates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    pub stage: SeasonStage,
    pub adult_content: bool,
}

impl Eligibility {
    pub fn new(stage: SeasonStage) -> Self {
        Self {
            stage,
            adult_content: false,
        }
    }

    #[inline]
    pub fn admits(&self, event: &Event) -> bool {
        event.allows_stage(self.stage) && (self.adult_content || !event.adult_content)
    }
}

/// Events whose season stages contain `stage`, in pool order
pub fn filter(pool: &[Arc<Event>], stage: SeasonStage) -> Vec<Arc<Event>> {
    pool.iter()
        .filter(|event| event.allows_stage(stage))
        .cloned()
        .collect()
}

/// Stage and content gates together, in pool order
pub fn filter_with(pool: &[Arc<Event>], eligibility: &Eligibility) -> Vec<Arc<Event>> {
    let eligible: Vec<_> = pool
        .iter()
        .filter(|event| eligibility.admits(event))
        .cloned()
        .collect();
    log::debug!(
        "{} of {} events eligible at {}",
        eligible.len(),
        pool.len(),
        eligibility.stage
    );
    eligible
}
