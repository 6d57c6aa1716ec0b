//! Raw event records as authored in catalog JSON
//!
//! Every field is optional at this level so that validation can report exactly
//! which one is missing instead of failing with a bare serde message.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Event entry as it appears in an events file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventConfig {
    pub id: Option<Value>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub impact: Option<String>,
    pub category: Option<String>,
    pub difficulty_weights: Option<BTreeMap<String, Value>>,
    pub season_stages: Option<Vec<String>>,
    pub options: Option<Vec<OptionConfig>>,
    #[serde(default)]
    pub adult_content: bool,
    pub is_temporary: Option<bool>,
    pub target_options: Option<Vec<String>>,
    pub target_impacts: Option<BTreeMap<String, String>>,
    pub trainer_options: Option<Vec<String>>,
    pub trainer_impacts: Option<BTreeMap<String, String>>,
    pub result_options: Option<Vec<ResultOptionConfig>>,
    pub matchups: Option<Vec<MatchupConfig>>,
    /// Opponent names bound to `{opponent_team}`
    pub opponent_teams: Option<Vec<String>>,
    /// Remaining fields; `<name>_options` string lists become pick lists
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// User-facing choice inside a branching event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionConfig {
    pub description: Option<String>,
    pub impact: Option<ImpactConfig>,
    /// Legacy random-impact form: impact text mapped to its weight
    pub impact_random_options: Option<BTreeMap<String, f64>>,
    pub options: Option<Vec<OptionConfig>>,
    pub is_temporary: Option<bool>,
}

/// Impact of an option: fixed text or a weighted list to draw from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImpactConfig {
    Text(String),
    Weighted(Vec<WeightedImpactConfig>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedImpactConfig {
    pub impact: String,
    pub weight: f64,
}

/// Event-level weighted outcome bound to `{result}` and `{impact_text}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultOptionConfig {
    pub result: Option<String>,
    pub impact_text: Option<String>,
    pub probability: Option<f64>,
}

/// Position pairing bound to `{position1}` and `{opponent_position}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchupConfig {
    pub position1: Option<String>,
    pub opponent_position: Option<String>,
}

/// Raw collections keyed by pool name, as stored on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unrealistic_events: Option<Vec<Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_config_from_json() {
        let json = r#"{
            "id": 7,
            "title": "Holdout",
            "description": "{target} wants a new deal",
            "category": "contract",
            "difficulty_weights": {"pro": 0.3},
            "season_stages": ["pre-season"],
            "target_options": ["QB1", "WR1"],
            "games_options": ["1", "2"],
            "options": [
                {"description": "Pay him", "impact": "Cap hit"},
                {"description": "Wait", "impact": [
                    {"impact": "He reports", "weight": 0.7},
                    {"impact": "He sits", "weight": 0.3}
                ]}
            ]
        }"#;

        let event: EventConfig = serde_json::from_str(json).unwrap();
        assert_eq!(event.title.as_deref(), Some("Holdout"));
        assert!(event.extra.contains_key("games_options"));

        let options = event.options.unwrap();
        assert!(matches!(options[0].impact, Some(ImpactConfig::Text(_))));
        match &options[1].impact {
            Some(ImpactConfig::Weighted(list)) => assert_eq!(list.len(), 2),
            other => panic!("expected weighted impact, got {:?}", other),
        }
    }

    #[test]
    fn test_legacy_random_impact_map() {
        let json = r#"{"description": "Gamble", "impact_random_options": {"Win": 2.0, "Lose": 1.0}}"#;
        let option: OptionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(option.impact_random_options.unwrap().len(), 2);
        assert!(option.impact.is_none());
    }
}
