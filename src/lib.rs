//! Franchise Events Core - weighted random event engine for franchise mode
//!
//! Given a difficulty, a season stage and a roster, the engine picks an event
//! from a validated catalog, substitutes roster names into its text, lets the
//! caller choose among its options, and hands back a record for the season
//! history.
//!
//! ```no_run
//! use franchise_events_core::{CatalogSources, EventEngine, RollRequest, Settings};
//!
//! # fn main() -> franchise_events_core::Result<()> {
//! let engine = EventEngine::from_sources(&CatalogSources::from_files("events.json", None)?)?;
//! let settings = Settings::load("franchise.json")?;
//! if let Some(rolled) = engine.roll(&settings.roll_request()?, &settings.roster())? {
//!     println!("{}: {}", rolled.title, rolled.description);
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod history;
pub mod resolve;

pub use catalog::{Catalog, CatalogReport, CatalogSources, CatalogStore, Event};
pub use config::{Difficulty, SeasonStage, Settings};
pub use engine::{EventEngine, RollRequest};
pub use error::{EventError, Result, SchemaError};
pub use history::{HistoryRecord, HistoryStore, JsonlHistory, MemoryHistory};
pub use resolve::{PresentedOption, ResolvedEvent, RolledEvent, Roster};

use once_cell::sync::OnceCell;
use std::sync::Arc;

// ============================================================================
// Shared Engine
// ============================================================================

/// Process-wide engine for hosts that load the catalog once at startup
static SHARED_ENGINE: OnceCell<Arc<EventEngine>> = OnceCell::new();

/// Load the shared engine, or swap new content into it if already loaded.
///
/// The catalog is validated in full before anything is replaced.
pub fn init_engine(sources: &CatalogSources) -> Result<Arc<EventEngine>> {
    let mut built = false;
    let engine = SHARED_ENGINE.get_or_try_init(|| {
        built = true;
        EventEngine::from_sources(sources).map(Arc::new)
    })?;
    // Callers that lost the race still get their content applied
    if !built {
        engine.reload(sources)?;
    }
    Ok(Arc::clone(engine))
}

/// The shared engine, if [`init_engine`] has been called
pub fn shared_engine() -> Option<Arc<EventEngine>> {
    SHARED_ENGINE.get().cloned()
}
