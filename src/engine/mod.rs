//! Event engine - one roll is filter, then select, then resolve
//!
//! The engine holds no session state. Difficulty, stage and roster arrive
//! with every call; the only shared value is the current catalog snapshot.

use crate::catalog::{Catalog, CatalogSources, CatalogStore};
use crate::config::{Difficulty, SeasonStage};
use crate::error::{EventError, Result};
use crate::event::{filter_with, select_event, Eligibility};
use crate::resolve::{resolve, RolledEvent, Roster};
use rand::Rng;
use std::sync::Arc;

/// Parameters of a single roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollRequest {
    pub difficulty: Difficulty,
    pub stage: SeasonStage,
    pub include_unrealistic: bool,
    pub adult_content: bool,
}

impl RollRequest {
    pub fn new(difficulty: Difficulty, stage: SeasonStage) -> Self {
        Self {
            difficulty,
            stage,
            include_unrealistic: false,
            adult_content: false,
        }
    }

    /// Build from caller-facing labels; unknown labels are config errors
    pub fn from_labels(difficulty: &str, stage: &str) -> Result<Self> {
        Ok(Self::new(difficulty.parse()?, SeasonStage::canonicalize(stage)?))
    }

    pub fn with_unrealistic(mut self, enabled: bool) -> Self {
        self.include_unrealistic = enabled;
        self
    }

    pub fn with_adult_content(mut self, enabled: bool) -> Self {
        self.adult_content = enabled;
        self
    }

    pub fn eligibility(&self) -> Eligibility {
        Eligibility {
            stage: self.stage,
            adult_content: self.adult_content,
        }
    }
}

pub struct EventEngine {
    catalog: CatalogStore,
}

impl EventEngine {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: CatalogStore::new(catalog),
        }
    }

    pub fn from_sources(sources: &CatalogSources) -> Result<Self> {
        Ok(Self::new(Catalog::load(sources)?))
    }

    pub fn catalog(&self) -> Arc<Catalog> {
        self.catalog.snapshot()
    }

    /// Validate and swap in new catalog content; rolls in flight keep their snapshot
    pub fn reload(&self, sources: &CatalogSources) -> Result<()> {
        self.catalog.reload(sources)
    }

    /// Roll with the thread-local generator. `Ok(None)` means no event this roll.
    pub fn roll(&self, request: &RollRequest, roster: &Roster) -> Result<Option<RolledEvent>> {
        self.roll_with(request, roster, &mut rand::thread_rng())
    }

    pub fn roll_with<R: Rng + ?Sized>(
        &self,
        request: &RollRequest,
        roster: &Roster,
        rng: &mut R,
    ) -> Result<Option<RolledEvent>> {
        let catalog = self.catalog.snapshot();
        let pool = catalog.pool(request.include_unrealistic);
        let eligible = filter_with(&pool, &request.eligibility());

        match select_event(&eligible, request.difficulty, rng) {
            Some(event) => resolve(event, roster, rng).map(Some),
            None => Ok(None),
        }
    }

    /// Resolve a specific event regardless of stage, weight or content gates
    pub fn resolve_by_id(&self, id: i32, roster: &Roster) -> Result<RolledEvent> {
        self.resolve_by_id_with(id, roster, &mut rand::thread_rng())
    }

    pub fn resolve_by_id_with<R: Rng + ?Sized>(&self, id: i32, roster: &Roster, rng: &mut R) -> Result<RolledEvent> {
        let event = self
            .catalog
            .snapshot()
            .get(id)
            .cloned()
            .ok_or(EventError::EventNotFound(id))?;
        resolve(event, roster, rng)
    }
}
