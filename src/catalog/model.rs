//! Validated catalog model
//!
//! These types only exist once a raw entry has passed schema validation, so
//! the rest of the engine can match on them exhaustively instead of probing
//! for optional fields.

use crate::config::{Difficulty, DifficultyWeights, SeasonStage, StageSet};
use crate::error::PoolKind;
use crate::resolve::ALL_POSITIONS;
use std::collections::BTreeMap;

/// A catalog event, immutable for the lifetime of its catalog snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: i32,
    pub pool: PoolKind,
    pub title: String,
    pub description: String,
    /// Event-level impact template; empty for purely branching events
    pub impact: String,
    pub category: String,
    pub weights: DifficultyWeights,
    pub stages: StageSet,
    pub options: Vec<EventOption>,
    pub adult_content: bool,
    pub is_temporary: bool,
    pub draws: EventDraws,
}

impl Event {
    #[inline]
    pub fn weight(&self, difficulty: Difficulty) -> f64 {
        self.weights.get(difficulty)
    }

    #[inline]
    pub fn allows_stage(&self, stage: SeasonStage) -> bool {
        self.stages.contains(stage)
    }

    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    /// Walk an option path from the event root.
    ///
    /// Returns the option at the end of the path, or the index at which the
    /// walk left the tree.
    pub fn option_at(&self, path: &[usize]) -> Result<&EventOption, usize> {
        let mut siblings = &self.options;
        let mut current = None;
        for (depth, &index) in path.iter().enumerate() {
            let option = siblings.get(index).ok_or(depth)?;
            current = Some(option);
            siblings = match &option.outcome {
                OptionOutcome::Branch(children) => children,
                OptionOutcome::Impact(_) => &EMPTY_OPTIONS,
            };
        }
        current.ok_or(0)
    }

    /// Number of distinct outcomes this event can produce
    pub fn scenario_count(&self) -> u64 {
        let mut count = self.draws.scenario_count();
        if self.has_options() {
            count = count.saturating_mul(self.options.iter().map(EventOption::scenario_count).sum());
        }
        count
    }
}

static EMPTY_OPTIONS: Vec<EventOption> = Vec::new();

/// A node of an event's choice tree
#[derive(Debug, Clone, PartialEq)]
pub struct EventOption {
    pub description: String,
    pub is_temporary: bool,
    pub outcome: OptionOutcome,
}

impl EventOption {
    pub fn is_leaf(&self) -> bool {
        matches!(self.outcome, OptionOutcome::Impact(_))
    }

    pub fn children(&self) -> &[EventOption] {
        match &self.outcome {
            OptionOutcome::Branch(children) => children,
            OptionOutcome::Impact(_) => &[],
        }
    }

    fn scenario_count(&self) -> u64 {
        match &self.outcome {
            OptionOutcome::Impact(Impact::Plain(_)) => 1,
            OptionOutcome::Impact(Impact::Random(entries)) => entries.len() as u64,
            OptionOutcome::Branch(children) => children.iter().map(Self::scenario_count).sum(),
        }
    }
}

/// What choosing an option leads to
#[derive(Debug, Clone, PartialEq)]
pub enum OptionOutcome {
    Impact(Impact),
    Branch(Vec<EventOption>),
}

/// Impact of a leaf option
#[derive(Debug, Clone, PartialEq)]
pub enum Impact {
    Plain(String),
    /// Exactly one entry is drawn, proportional to weight, each time the leaf is chosen
    Random(Vec<WeightedImpact>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightedImpact {
    pub text: String,
    pub weight: f64,
}

/// Secondary random sub-selections settled once per roll
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventDraws {
    pub target: TargetDraw,
    /// Role to impact text, bound to `{impact_text}` for the drawn target
    pub target_impacts: BTreeMap<String, String>,
    pub trainer: Option<TrainerDraw>,
    pub picks: Vec<PickList>,
    pub results: Vec<ResultOutcome>,
    pub matchups: Option<MatchupDraw>,
}

impl EventDraws {
    fn scenario_count(&self) -> u64 {
        let target = match &self.target {
            TargetDraw::None | TargetDraw::NotApplicable => 1,
            TargetDraw::AllPlayers => ALL_POSITIONS.len() as u64,
            TargetDraw::Roles(roles) => roles.len() as u64,
        };
        let trainer = self.trainer.as_ref().map_or(1, |t| t.options.len() as u64);
        let results = (self.results.len() as u64).max(1);
        let matchups = self.matchups.as_ref().map_or(1, MatchupDraw::scenario_count);
        self.picks
            .iter()
            .map(|p| p.values.len() as u64)
            .fold(target * trainer * results * matchups, u64::saturating_mul)
    }
}

/// How the `{target}` placeholder is chosen
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TargetDraw {
    #[default]
    None,
    /// Bound to the literal `N/A`
    NotApplicable,
    /// Any standard position that is filled on the roster
    AllPlayers,
    /// One of the listed roles that is filled on the roster
    Roles(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainerDraw {
    pub options: Vec<String>,
    pub impacts: BTreeMap<String, String>,
}

/// Uniform pick bound to `{name}`
#[derive(Debug, Clone, PartialEq)]
pub struct PickList {
    pub name: String,
    pub values: Vec<String>,
}

/// Player callout pairings and the opponent they face
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchupDraw {
    pub pairs: Vec<Matchup>,
    pub opponent_teams: Vec<String>,
}

impl MatchupDraw {
    fn scenario_count(&self) -> u64 {
        (self.pairs.len() as u64).max(1) * (self.opponent_teams.len() as u64).max(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Matchup {
    pub position1: String,
    pub opponent_position: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultOutcome {
    pub result: String,
    pub impact_text: String,
    pub weight: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(description: &str, impact: Impact) -> EventOption {
        EventOption {
            description: description.to_string(),
            is_temporary: false,
            outcome: OptionOutcome::Impact(impact),
        }
    }

    fn event_with_options(options: Vec<EventOption>) -> Event {
        Event {
            id: 1,
            pool: PoolKind::Standard,
            title: "T".to_string(),
            description: "D".to_string(),
            impact: String::new(),
            category: "misc".to_string(),
            weights: DifficultyWeights::uniform(0.5),
            stages: StageSet::all(),
            options,
            adult_content: false,
            is_temporary: false,
            draws: EventDraws::default(),
        }
    }

    fn sample_tree() -> Event {
        let random = Impact::Random(vec![
            WeightedImpact {
                text: "Y1".to_string(),
                weight: 0.9,
            },
            WeightedImpact {
                text: "Y2".to_string(),
                weight: 0.1,
            },
        ]);
        event_with_options(vec![
            leaf("A", Impact::Plain("X".to_string())),
            EventOption {
                description: "B".to_string(),
                is_temporary: false,
                outcome: OptionOutcome::Branch(vec![
                    leaf("B1", random),
                    leaf("B2", Impact::Plain("Z".to_string())),
                ]),
            },
        ])
    }

    #[test]
    fn test_option_at_walks_tree() {
        let event = sample_tree();
        assert_eq!(event.option_at(&[0]).unwrap().description, "A");
        assert_eq!(event.option_at(&[1, 1]).unwrap().description, "B2");
        assert!(!event.option_at(&[1]).unwrap().is_leaf());
        assert_eq!(event.option_at(&[2]), Err(0));
        assert_eq!(event.option_at(&[1, 5]), Err(1));
        assert_eq!(event.option_at(&[0, 0]), Err(1));
        assert_eq!(event.option_at(&[]), Err(0));
    }

    #[test]
    fn test_scenario_count_sums_leaf_outcomes() {
        // A: 1, B1: 2 random impacts, B2: 1
        assert_eq!(sample_tree().scenario_count(), 4);
    }

    #[test]
    fn test_scenario_count_multiplies_draws() {
        let mut event = sample_tree();
        event.draws.target = TargetDraw::Roles(vec!["QB1".to_string(), "QB2".to_string()]);
        event.draws.picks.push(PickList {
            name: "games".to_string(),
            values: vec!["1".to_string(), "2".to_string(), "4".to_string()],
        });
        assert_eq!(event.scenario_count(), 2 * 3 * 4);
    }

    #[test]
    fn test_scenario_count_includes_matchups() {
        let mut event = sample_tree();
        let pair = |p: &str, o: &str| Matchup {
            position1: p.to_string(),
            opponent_position: o.to_string(),
        };
        event.draws.matchups = Some(MatchupDraw {
            pairs: vec![pair("WR1", "CB1"), pair("TE1", "SS1")],
            opponent_teams: vec!["Steelers".to_string(), "Ravens".to_string(), "Browns".to_string()],
        });
        assert_eq!(event.scenario_count(), 2 * 3 * 4);
    }
}
