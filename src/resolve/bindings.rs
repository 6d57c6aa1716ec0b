//! Per-roll placeholder bindings
//!
//! Events may declare secondary random sub-selections (a target player, a
//! trainer, pick lists, matchups, weighted result outcomes). Each is settled once when
//! the event is rolled and bound to a placeholder name, so every template of
//! that roll, including option impacts resolved later, sees the same values.

use super::roster::{Roster, ALL_POSITIONS};
use super::template::substitute;
use crate::catalog::{Event, TargetDraw};
use crate::event::weighted_pick;
use ahash::AHashMap;
use rand::seq::SliceRandom;
use rand::Rng;

pub const TARGET: &str = "target";
pub const TRAINER: &str = "trainer";
pub const TRAINER_IMPACT: &str = "trainer_impact";
pub const RESULT: &str = "result";
pub const IMPACT_TEXT: &str = "impact_text";
pub const POSITION1: &str = "position1";
pub const OPPONENT_POSITION: &str = "opponent_position";
pub const OPPONENT_TEAM: &str = "opponent_team";

/// Rendered form of a not-applicable target
pub const NOT_APPLICABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Binding {
    Value(String),
    /// Drawn from roles none of which are filled; names them for the error
    Unfilled(String),
}

/// Placeholder values settled for one roll
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: AHashMap<String, Binding>,
    target_role: Option<String>,
}

impl Bindings {
    /// Settle every random sub-selection the event declares
    pub fn draw<R: Rng + ?Sized>(event: &Event, roster: &Roster, rng: &mut R) -> Result<Self, String> {
        let draws = &event.draws;
        let mut bindings = Bindings::default();

        match &draws.target {
            TargetDraw::None => {}
            TargetDraw::NotApplicable => bindings.set(TARGET, NOT_APPLICABLE),
            TargetDraw::AllPlayers => {
                let filled: Vec<&str> = ALL_POSITIONS
                    .iter()
                    .copied()
                    .filter(|role| roster.is_filled(role))
                    .collect();
                bindings.bind_target(&filled, "all-players", roster, rng);
            }
            TargetDraw::Roles(roles) => {
                let filled: Vec<&str> = roles
                    .iter()
                    .map(String::as_str)
                    .filter(|role| roster.is_filled(role))
                    .collect();
                bindings.bind_target(&filled, &roles.join("|"), roster, rng);
            }
        }

        for pick in &draws.picks {
            if let Some(value) = pick.values.choose(rng) {
                log::debug!("event {}: {} = {}", event.id, pick.name, value);
                bindings.set(&pick.name, value);
            }
        }

        if let Some(matchups) = &draws.matchups {
            if let Some(pair) = matchups.pairs.choose(rng) {
                log::debug!(
                    "event {}: matchup {} vs {}",
                    event.id,
                    pair.position1,
                    pair.opponent_position
                );
                bindings.set(POSITION1, &pair.position1);
                bindings.set(OPPONENT_POSITION, &pair.opponent_position);
            }
            if let Some(team) = matchups.opponent_teams.choose(rng) {
                bindings.set(OPPONENT_TEAM, team);
            }
        }

        let mut derived: Vec<(&str, &str)> = Vec::new();

        if let Some(trainer) = &draws.trainer {
            if let Some(name) = trainer.options.choose(rng) {
                bindings.set(TRAINER, name);
                let impact = trainer.impacts.get(name).map_or("", String::as_str);
                derived.push((TRAINER_IMPACT, impact));
            }
        }

        let target_impact = bindings
            .target_role
            .as_deref()
            .and_then(|role| draws.target_impacts.get(role));
        if let Some(impact) = target_impact {
            derived.push((IMPACT_TEXT, impact.as_str()));
        }

        if let Some(outcome) = weighted_pick(&draws.results, |o| o.weight, rng) {
            bindings.set(RESULT, &outcome.result);
            if target_impact.is_none() {
                derived.push((IMPACT_TEXT, outcome.impact_text.as_str()));
            }
        }

        // Derived texts may mention the drawn values, e.g. "{target} gains +2 SPD"
        let mut resolved = Vec::with_capacity(derived.len());
        for (name, template) in derived {
            resolved.push((name, bindings.render(template, roster)?));
        }
        for (name, text) in resolved {
            bindings.set(name, &text);
        }

        Ok(bindings)
    }

    fn bind_target<R: Rng + ?Sized>(
        &mut self,
        filled: &[&str],
        label: &str,
        roster: &Roster,
        rng: &mut R,
    ) {
        let drawn = filled
            .choose(rng)
            .and_then(|role| roster.display(role).map(|display| (*role, display)));
        match drawn {
            Some((role, display)) => {
                self.set(TARGET, &display);
                self.target_role = Some(role.to_string());
            }
            None => {
                self.values
                    .insert(TARGET.to_string(), Binding::Unfilled(label.to_string()));
            }
        }
    }

    fn set(&mut self, name: &str, value: &str) {
        self.values
            .insert(name.to_string(), Binding::Value(value.to_string()));
    }

    /// Bound value, or the roster entry of the same name
    pub fn lookup<'a>(&'a self, name: &str, roster: &'a Roster) -> Result<Option<&'a str>, String> {
        match self.values.get(name) {
            Some(Binding::Value(value)) => Ok(Some(value.as_str())),
            Some(Binding::Unfilled(roles)) => Err(roles.clone()),
            None => Ok(roster.get(name)),
        }
    }

    /// Substitute a template; `Err` carries the role that could not be filled
    pub fn render(&self, template: &str, roster: &Roster) -> Result<String, String> {
        substitute(template, |name| self.lookup(name, roster))
    }

    /// Rendered `{target}`, if the event drew one
    pub fn target(&self) -> Option<&str> {
        self.get(TARGET)
    }

    /// Roster role behind the drawn target
    pub fn target_role(&self) -> Option<&str> {
        self.target_role.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(Binding::Value(value)) => Some(value.as_str()),
            _ => None,
        }
    }
}
