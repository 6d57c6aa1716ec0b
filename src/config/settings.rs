//! Franchise session settings
//!
//! The settings file mirrors what the franchise front end persists between
//! sessions: chosen difficulty, content toggles, the current point in the
//! season and the roster used to fill event placeholders.

use super::{Difficulty, SeasonStage};
use crate::engine::RollRequest;
use crate::error::Result;
use crate::resolve::Roster;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Coach roles accepted in the `coaches` table
pub const COACH_ROLES: [&str; 3] = ["HC", "OC", "DC"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FranchiseInfo {
    pub team_name: String,
    pub current_week: u32,
    pub current_year: i32,
    /// Stage label, canonical or display form
    pub season_stage: String,
}

impl Default for FranchiseInfo {
    fn default() -> Self {
        Self {
            team_name: String::new(),
            current_week: 1,
            current_year: 2025,
            season_stage: SeasonStage::PreSeason.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub unrealistic_events_enabled: bool,
    pub adult_content_enabled: bool,
    pub franchise_info: FranchiseInfo,
    /// Position (`QB1`, `WR2`, ...) to player name
    pub roster: BTreeMap<String, String>,
    /// Coach role (`HC`, `OC`, `DC`) to coach name
    pub coaches: BTreeMap<String, String>,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&text)?;
        log::debug!(
            "loaded settings from {} ({} roster entries)",
            path.as_ref().display(),
            settings.roster.len()
        );
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Canonical stage of the current franchise week
    pub fn season_stage(&self) -> Result<SeasonStage> {
        SeasonStage::canonicalize(&self.franchise_info.season_stage)
    }

    /// Players and coaches merged into one lookup table; coaches win on clash
    pub fn roster(&self) -> Roster {
        self.roster
            .iter()
            .chain(self.coaches.iter().filter(|(role, _)| COACH_ROLES.contains(&role.as_str())))
            .map(|(role, name)| (role.clone(), name.clone()))
            .collect()
    }

    /// Per-roll parameters for the current point in the season
    pub fn roll_request(&self) -> Result<RollRequest> {
        Ok(RollRequest {
            difficulty: self.difficulty,
            stage: self.season_stage()?,
            include_unrealistic: self.unrealistic_events_enabled,
            adult_content: self.adult_content_enabled,
        })
    }
}
