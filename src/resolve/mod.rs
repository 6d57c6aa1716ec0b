//! Resolution engine
//!
//! Turns a selected [`Event`] into text a caller can show. Rolling settles the
//! per-roll bindings and substitutes the title, description and every option
//! description. Option impacts stay unresolved until a leaf is chosen; a
//! random impact is drawn fresh on each [`RolledEvent::choose`] call.

mod bindings;
mod roster;
mod template;


pub use bindings::{
    Bindings, IMPACT_TEXT, NOT_APPLICABLE, OPPONENT_POSITION, OPPONENT_TEAM, POSITION1, RESULT, TARGET,
    TRAINER, TRAINER_IMPACT,
};
pub use roster::*;
pub use template::{placeholders, substitute};

use crate::catalog::{Event, EventOption, Impact, OptionOutcome};
use crate::error::{EventError, Result};
use crate::event::weighted_pick;
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;

/// Descriptions of the options chosen, root first
pub type OptionTrail = SmallVec<[String; 4]>;

// ============================================================================
// Rolled event
// ============================================================================

/// An option as shown to the user, description already substituted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresentedOption {
    pub description: String,
    pub is_leaf: bool,
    pub options: Vec<PresentedOption>,
}

/// A selected event with its bindings settled, awaiting acceptance or a choice
#[derive(Debug, Clone)]
pub struct RolledEvent {
    event: Arc<Event>,
    bindings: Bindings,
    pub title: String,
    pub description: String,
    /// Event-level impact; empty for events that only branch
    pub impact: String,
    pub options: Vec<PresentedOption>,
}

/// Settle bindings and substitute every shown template.
///
/// All or nothing: a missing roster role fails the whole roll.
pub fn resolve<R: Rng + ?Sized>(event: Arc<Event>, roster: &Roster, rng: &mut R) -> Result<RolledEvent> {
    let event_id = event.id;
    let bindings = Bindings::draw(&event, roster, rng).map_err(|role| placeholder(event_id, role))?;
    let render = |template: &str| {
        bindings
            .render(template, roster)
            .map_err(|role| placeholder(event_id, role))
    };

    let title = render(&event.title)?;
    let description = render(&event.description)?;
    let impact = render(&event.impact)?;
    let options = present(&event.options, &render)?;

    Ok(RolledEvent {
        event,
        bindings,
        title,
        description,
        impact,
        options,
    })
}

fn present<F>(options: &[EventOption], render: &F) -> Result<Vec<PresentedOption>>
where
    F: Fn(&str) -> Result<String>,
{
    options
        .iter()
        .map(|option| {
            Ok(PresentedOption {
                description: render(&option.description)?,
                is_leaf: option.is_leaf(),
                options: present(option.children(), render)?,
            })
        })
        .collect()
}

fn placeholder(event_id: i32, role: String) -> EventError {
    EventError::Placeholder { event_id, role }
}

impl RolledEvent {
    pub fn event(&self) -> &Arc<Event> {
        &self.event
    }

    pub fn id(&self) -> i32 {
        self.event.id
    }

    pub fn has_options(&self) -> bool {
        self.event.has_options()
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Rendered `{target}` drawn for this roll
    pub fn selected_target(&self) -> Option<&str> {
        self.bindings.target()
    }

    /// Accept an event that offers no choice
    pub fn accept(&self) -> Result<ResolvedEvent> {
        if self.has_options() {
            return Err(self.path_error(&[], "event requires an option choice"));
        }
        Ok(self.finish(self.impact.clone(), OptionTrail::new(), self.event.is_temporary))
    }

    /// Choose the leaf at `path` using the thread-local generator
    pub fn choose(&self, path: &[usize], roster: &Roster) -> Result<ResolvedEvent> {
        self.choose_with(path, roster, &mut rand::thread_rng())
    }

    /// Choose the leaf at `path`.
    ///
    /// Only the chosen leaf is evaluated. A random impact is drawn on every
    /// call, so choosing the same leaf twice may give different text.
    pub fn choose_with<R: Rng + ?Sized>(
        &self,
        path: &[usize],
        roster: &Roster,
        rng: &mut R,
    ) -> Result<ResolvedEvent> {
        if !self.has_options() {
            return Err(self.path_error(path, "event has no options"));
        }
        if path.is_empty() {
            return Err(self.path_error(path, "empty path"));
        }

        let leaf = self
            .event
            .option_at(path)
            .map_err(|depth| self.path_error(path, format!("no option at depth {}", depth)))?;
        let template = match &leaf.outcome {
            OptionOutcome::Branch(_) => {
                return Err(self.path_error(path, "path ends at a branch, not a leaf"));
            }
            OptionOutcome::Impact(Impact::Plain(text)) => text.as_str(),
            OptionOutcome::Impact(Impact::Random(entries)) => {
                let drawn = weighted_pick(entries, |entry| entry.weight, rng)
                    .ok_or_else(|| self.path_error(path, "random impact has no positive weight"))?;
                log::debug!("event {}: random impact drew {:?}", self.event.id, drawn.text);
                drawn.text.as_str()
            }
        };

        let impact = self
            .bindings
            .render(template, roster)
            .map_err(|role| placeholder(self.event.id, role))?;
        Ok(self.finish(impact, self.trail(path), leaf.is_temporary))
    }

    fn trail(&self, path: &[usize]) -> OptionTrail {
        let mut trail = OptionTrail::new();
        let mut level = &self.options;
        for &index in path {
            match level.get(index) {
                Some(option) => {
                    trail.push(option.description.clone());
                    level = &option.options;
                }
                None => break,
            }
        }
        trail
    }

    fn finish(&self, impact: String, option_path: OptionTrail, is_temporary: bool) -> ResolvedEvent {
        ResolvedEvent {
            event_id: self.event.id,
            title: self.title.clone(),
            description: self.description.clone(),
            impact,
            option_path,
            category: self.event.category.clone(),
            selected_target: self.selected_target().map(str::to_string),
            is_temporary,
        }
    }

    fn path_error(&self, path: &[usize], reason: impl Into<String>) -> EventError {
        EventError::OptionPath {
            event_id: self.event.id,
            path: path.to_vec(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Resolved event
// ============================================================================

/// Final outcome of a roll: every template substituted, every draw settled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedEvent {
    pub event_id: i32,
    pub title: String,
    pub description: String,
    pub impact: String,
    /// Chosen option descriptions, root first; empty for events without options
    pub option_path: OptionTrail,
    pub category: String,
    pub selected_target: Option<String>,
    pub is_temporary: bool,
}
