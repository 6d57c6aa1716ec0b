//! Roster lookup table

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every position slot a franchise roster can fill, depth order within each position
#[rustfmt::skip]
pub const ALL_POSITIONS: [&str; 45] = [
    "QB1", "QB2",
    "RB1", "RB2", "RB3", "FB1",
    "WR1", "WR2", "WR3", "WR4",
    "TE1", "TE2",
    "LT1", "LT2", "LG1", "LG2", "C1", "C2", "RG1", "RG2", "RT1", "RT2",
    "LE1", "LE2", "DT1", "DT2", "DT3", "RE1", "RE2",
    "LOLB1", "LOLB2", "MLB1", "MLB2", "ROLB1", "ROLB2",
    "CB1", "CB2", "CB3", "CB4", "FS1", "FS2", "SS1", "SS2",
    "K1", "P1",
];

/// Role (position or staff slot) to display name
///
/// Blank names count as unfilled, so a cleared roster slot never renders as an
/// empty string inside event text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster(BTreeMap<String, String>);

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, role: impl Into<String>, name: impl Into<String>) {
        self.0.insert(role.into(), name.into());
    }

    pub fn get(&self, role: &str) -> Option<&str> {
        self.0
            .get(role)
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
    }

    pub fn is_filled(&self, role: &str) -> bool {
        self.get(role).is_some()
    }

    /// `Name (ROLE)`, the form targets are shown in
    pub fn display(&self, role: &str) -> Option<String> {
        self.get(role).map(|name| format!("{} ({})", name, role))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Roster {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(role, name)| (role.into(), name.into()))
                .collect(),
        )
    }
}
