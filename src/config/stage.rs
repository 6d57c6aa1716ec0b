//! Season stages and catalog stage tags

use crate::error::{EventError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical phases of a simulated season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeasonStage {
    PreSeason,
    RegularSeasonStart,
    RegularSeasonMid,
    RegularSeasonEnd,
    PostSeason,
    OffSeason,
}

impl Default for SeasonStage {
    fn default() -> Self {
        SeasonStage::PreSeason
    }
}

impl SeasonStage {
    pub const ALL: [SeasonStage; 6] = [
        SeasonStage::PreSeason,
        SeasonStage::RegularSeasonStart,
        SeasonStage::RegularSeasonMid,
        SeasonStage::RegularSeasonEnd,
        SeasonStage::PostSeason,
        SeasonStage::OffSeason,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SeasonStage::PreSeason => "pre-season",
            SeasonStage::RegularSeasonStart => "regular-season-start",
            SeasonStage::RegularSeasonMid => "regular-season-mid",
            SeasonStage::RegularSeasonEnd => "regular-season-end",
            SeasonStage::PostSeason => "post-season",
            SeasonStage::OffSeason => "off-season",
        }
    }

    /// Map a caller-facing label onto its canonical stage.
    ///
    /// Accepts the canonical kebab-case names and the display labels used by
    /// franchise save files (`Pre-Season`, `Regular Season Mid`, ...). Any other
    /// label is a configuration error, never a silent "no events".
    pub fn canonicalize(label: &str) -> Result<SeasonStage> {
        let stage = match label.trim() {
            "pre-season" | "Pre-Season" => SeasonStage::PreSeason,
            "regular-season-start" | "Regular Season Start" => SeasonStage::RegularSeasonStart,
            "regular-season-mid" | "Regular Season Mid" => SeasonStage::RegularSeasonMid,
            "regular-season-end" | "Regular Season End" => SeasonStage::RegularSeasonEnd,
            "post-season" | "Post-Season" => SeasonStage::PostSeason,
            "off-season" | "Off-Season" => SeasonStage::OffSeason,
            other => {
                return Err(EventError::config(format!(
                    "unknown season stage `{}`",
                    other
                )))
            }
        };
        Ok(stage)
    }

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for SeasonStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Set of canonical stages an event may be rolled in
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StageSet(u8);

impl StageSet {
    pub const EMPTY: StageSet = StageSet(0);

    pub fn all() -> Self {
        SeasonStage::ALL.into_iter().collect()
    }

    #[inline]
    pub fn contains(self, stage: SeasonStage) -> bool {
        self.0 & stage.bit() != 0
    }

    pub fn insert(&mut self, stage: SeasonStage) {
        self.0 |= stage.bit();
    }

    pub fn union(self, other: StageSet) -> StageSet {
        StageSet(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = SeasonStage> {
        SeasonStage::ALL
            .into_iter()
            .filter(move |stage| self.contains(*stage))
    }

    /// Expand one catalog stage tag into canonical stages.
    ///
    /// Catalog data also uses group tags: `any`, `regular-season`, `playoffs`
    /// and `offseason`. Returns `None` for tags outside the recognized set.
    pub fn from_tag(tag: &str) -> Option<StageSet> {
        let set: StageSet = match tag {
            "any" => StageSet::all(),
            "regular-season" => [
                SeasonStage::RegularSeasonStart,
                SeasonStage::RegularSeasonMid,
                SeasonStage::RegularSeasonEnd,
            ]
            .into_iter()
            .collect(),
            "playoffs" => SeasonStage::PostSeason.into(),
            "offseason" => SeasonStage::OffSeason.into(),
            other => SeasonStage::canonicalize(other).ok()?.into(),
        };
        Some(set)
    }
}

impl From<SeasonStage> for StageSet {
    fn from(stage: SeasonStage) -> Self {
        StageSet(stage.bit())
    }
}

impl FromIterator<SeasonStage> for StageSet {
    fn from_iter<I: IntoIterator<Item = SeasonStage>>(iter: I) -> Self {
        let mut set = StageSet::EMPTY;
        for stage in iter {
            set.insert(stage);
        }
        set
    }
}

impl fmt::Debug for StageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(SeasonStage::label)).finish()
    }
}
