//! Event catalog: validated, immutable collections of events
//!
//! A [`Catalog`] is built once from raw collections and never mutated.
//! Reloading custom content builds a fresh catalog and swaps it into a
//! [`CatalogStore`], so a roll holding the previous snapshot finishes against
//! consistent data.

mod model;
mod validate;

#[cfg(test)]
mod property_tests;

pub use model::*;
pub use validate::validate_entry;

use crate::config::{load_events_file, EventsFile};
use crate::error::{PoolKind, Result, SchemaError};
use ahash::AHashMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// Raw collections a catalog is built from
#[derive(Debug, Clone, Default)]
pub struct CatalogSources {
    pub standard: Vec<Value>,
    pub unrealistic: Vec<Value>,
    /// User-authored events, merged into the standard pool
    pub custom: Vec<Value>,
}

impl CatalogSources {
    pub fn from_events_file(file: EventsFile) -> Self {
        Self {
            standard: file.events.unwrap_or_default(),
            unrealistic: file.unrealistic_events.unwrap_or_default(),
            custom: Vec::new(),
        }
    }

    /// Read the standard file and, optionally, a separate unrealistic file.
    ///
    /// Both files may carry either collection; entries are concatenated.
    pub fn from_files(standard: impl AsRef<Path>, unrealistic: Option<&Path>) -> Result<Self> {
        let mut sources = Self::from_events_file(load_events_file(standard)?);
        if let Some(path) = unrealistic {
            let extra = load_events_file(path)?;
            sources.standard.extend(extra.events.unwrap_or_default());
            sources
                .unrealistic
                .extend(extra.unrealistic_events.unwrap_or_default());
        }
        Ok(sources)
    }

    pub fn with_custom(mut self, custom: Vec<Value>) -> Self {
        self.custom = custom;
        self
    }

    fn entries(&self) -> impl Iterator<Item = (PoolKind, usize, &Value)> {
        tagged(PoolKind::Standard, &self.standard)
            .chain(tagged(PoolKind::Custom, &self.custom))
            .chain(tagged(PoolKind::Unrealistic, &self.unrealistic))
    }
}

fn tagged(pool: PoolKind, entries: &[Value]) -> impl Iterator<Item = (PoolKind, usize, &Value)> {
    entries
        .iter()
        .enumerate()
        .map(move |(index, raw)| (pool, index, raw))
}

/// Catalog built in inspection mode, with every entry that was skipped
#[derive(Debug, Clone)]
pub struct CatalogReport {
    pub catalog: Catalog,
    pub issues: Vec<SchemaError>,
}

impl CatalogReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Validated events, standard pool first
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    standard: Vec<Arc<Event>>,
    unrealistic: Vec<Arc<Event>>,
    index: AHashMap<i32, Arc<Event>>,
}

impl Catalog {
    /// Strict load: the first schema violation fails the whole catalog
    pub fn load(sources: &CatalogSources) -> Result<Catalog> {
        let mut catalog = Catalog::default();
        for (pool, index, raw) in sources.entries() {
            let event = validate_entry(pool, index, raw)?;
            catalog.insert(event, index)?;
        }
        log::info!(
            "loaded catalog: {} standard, {} unrealistic events",
            catalog.standard.len(),
            catalog.unrealistic.len()
        );
        Ok(catalog)
    }

    /// Inspection load: malformed entries are skipped and reported, never dropped silently
    pub fn inspect(sources: &CatalogSources) -> CatalogReport {
        let mut catalog = Catalog::default();
        let mut issues = Vec::new();
        for (pool, index, raw) in sources.entries() {
            let outcome = validate_entry(pool, index, raw).and_then(|event| catalog.insert(event, index));
            if let Err(issue) = outcome {
                log::warn!("skipping catalog entry: {}", issue);
                issues.push(issue);
            }
        }
        CatalogReport { catalog, issues }
    }

    fn insert(&mut self, event: Event, index: usize) -> std::result::Result<(), SchemaError> {
        if let Some(existing) = self.index.get(&event.id) {
            return Err(SchemaError::new(
                event.pool,
                Some(event.id),
                index,
                "id",
                format!("duplicate id, already used by {} event", existing.pool),
            ));
        }
        let event = Arc::new(event);
        self.index.insert(event.id, Arc::clone(&event));
        match event.pool {
            PoolKind::Standard | PoolKind::Custom => self.standard.push(event),
            PoolKind::Unrealistic => self.unrealistic.push(event),
        }
        Ok(())
    }

    /// Standard events alone, or standard followed by unrealistic
    pub fn pool(&self, include_unrealistic: bool) -> Vec<Arc<Event>> {
        let mut pool = self.standard.clone();
        if include_unrealistic {
            pool.extend(self.unrealistic.iter().cloned());
        }
        pool
    }

    pub fn get(&self, id: i32) -> Option<&Arc<Event>> {
        self.index.get(&id)
    }

    pub fn standard(&self) -> &[Arc<Event>] {
        &self.standard
    }

    pub fn unrealistic(&self) -> &[Arc<Event>] {
        &self.unrealistic
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Shared handle to the current catalog snapshot
#[derive(Debug, Default)]
pub struct CatalogStore {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// Snapshot for one roll; unaffected by later swaps
    pub fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&self.current.read())
    }

    /// Install a new catalog, returning the one it replaced
    pub fn replace(&self, catalog: Catalog) -> Arc<Catalog> {
        let next = Arc::new(catalog);
        let mut guard = self.current.write();
        std::mem::replace(&mut *guard, next)
    }

    /// Validate new sources fully, then swap. On failure the current catalog stays.
    pub fn reload(&self, sources: &CatalogSources) -> Result<()> {
        let catalog = Catalog::load(sources)?;
        let previous = self.replace(catalog);
        log::info!("catalog reloaded ({} events before swap)", previous.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EventError;
    use serde_json::json;

    fn raw_event(id: i32, stages: &[&str]) -> Value {
        json!({
            "id": id,
            "title": format!("Event {}", id),
            "description": "Something happens",
            "impact": "Nothing",
            "category": "misc",
            "difficulty_weights": {"cupcake": 0.5, "rookie": 0.5, "pro": 0.5, "all-madden": 0.5, "diabolical": 0.5},
            "season_stages": stages
        })
    }

    fn sources() -> CatalogSources {
        CatalogSources {
            standard: vec![raw_event(1, &["any"]), raw_event(2, &["pre-season"])],
            unrealistic: vec![raw_event(100, &["any"])],
            custom: vec![raw_event(50, &["off-season"])],
        }
    }

    #[test]
    fn test_pool_ordering_and_merge() {
        let catalog = Catalog::load(&sources()).unwrap();
        let ids = |pool: Vec<Arc<Event>>| pool.iter().map(|e| e.id).collect::<Vec<_>>();
        assert_eq!(ids(catalog.pool(false)), vec![1, 2, 50]);
        assert_eq!(ids(catalog.pool(true)), vec![1, 2, 50, 100]);
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.get(50).unwrap().pool, PoolKind::Custom);
    }

    #[test]
    fn test_duplicate_id_across_pools_fails_strict_load() {
        let mut sources = sources();
        sources.unrealistic.push(raw_event(2, &["any"]));
        match Catalog::load(&sources) {
            Err(EventError::Schema(err)) => {
                assert_eq!(err.event_id, Some(2));
                assert_eq!(err.field, "id");
                assert_eq!(err.pool, PoolKind::Unrealistic);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_inspect_skips_and_reports() {
        let mut sources = sources();
        sources.standard.push(json!({"id": 3, "title": "No weights"}));
        sources.unrealistic.push(raw_event(1, &["any"]));

        let report = Catalog::inspect(&sources);
        assert_eq!(report.issues.len(), 2);
        assert_eq!(report.issues[0].event_id, Some(3));
        assert_eq!(report.issues[1].field, "id");
        assert_eq!(report.catalog.len(), 4);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_store_swap_keeps_old_snapshot() {
        let store = CatalogStore::new(Catalog::load(&sources()).unwrap());
        let before = store.snapshot();

        let replacement = CatalogSources {
            standard: vec![raw_event(7, &["any"])],
            ..Default::default()
        };
        store.reload(&replacement).unwrap();

        assert_eq!(before.len(), 4);
        assert_eq!(store.snapshot().len(), 1);
        assert!(store.snapshot().get(7).is_some());
    }

    #[test]
    fn test_failed_reload_keeps_current() {
        let store = CatalogStore::new(Catalog::load(&sources()).unwrap());
        let broken = CatalogSources {
            standard: vec![json!({"id": 9})],
            ..Default::default()
        };
        assert!(store.reload(&broken).is_err());
        assert_eq!(store.snapshot().len(), 4);
    }
}
