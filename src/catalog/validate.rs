//! Schema validation: raw catalog entries to validated events

use super::model::{
    Event, EventDraws, EventOption, Impact, Matchup, MatchupDraw, OptionOutcome, PickList,
    ResultOutcome, TargetDraw, TrainerDraw, WeightedImpact,
};
use crate::config::{
    Difficulty, DifficultyWeights, EventConfig, ImpactConfig, MatchupConfig, OptionConfig,
    ResultOptionConfig, StageSet,
};
use crate::error::{PoolKind, SchemaError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

/// Raw keys that are never treated as `<name>_options` pick lists
const RESERVED_OPTION_KEYS: [&str; 5] = [
    "options",
    "target_options",
    "trainer_options",
    "result_options",
    "impact_random_options",
];

/// Where an entry sits, so every error can name it
struct Entry {
    pool: PoolKind,
    index: usize,
    id: Option<i32>,
}

impl Entry {
    fn err(&self, field: impl Into<String>, reason: impl Into<String>) -> SchemaError {
        SchemaError::new(self.pool, self.id, self.index, field, reason)
    }
}

/// Read an entry's id without requiring the rest of it to be well formed
pub(crate) fn entry_id(raw: &Value) -> Option<i32> {
    match raw.get("id")? {
        Value::Number(n) => n.as_i64().and_then(|id| i32::try_from(id).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Validate one raw entry into an [`Event`]
pub fn validate_entry(pool: PoolKind, index: usize, raw: &Value) -> Result<Event, SchemaError> {
    let entry = Entry {
        pool,
        index,
        id: entry_id(raw),
    };

    let config: EventConfig =
        serde_json::from_value(raw.clone()).map_err(|e| match malformed_field(raw) {
            Some((field, reason)) => entry.err(field, reason),
            None => entry.err("<entry>", format!("malformed record: {}", e)),
        })?;

    let id = match (&config.id, entry.id) {
        (None, _) => return Err(entry.err("id", "missing required field")),
        (Some(_), None) => return Err(entry.err("id", "must be an integer")),
        (Some(_), Some(id)) => id,
    };

    let title = required_text(&entry, "title", config.title)?;
    let description = required_text(&entry, "description", config.description)?;
    let category = config
        .category
        .ok_or_else(|| entry.err("category", "missing required field"))?;
    let weights = difficulty_weights(&entry, config.difficulty_weights)?;
    let stages = season_stages(&entry, config.season_stages)?;

    let is_temporary = config.is_temporary.unwrap_or(false);
    let options = match config.options {
        Some(raw_options) => raw_options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                validate_option(&entry, &format!("options[{}]", i), option, is_temporary, None)
            })
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let draws = EventDraws {
        target: target_draw(&entry, config.target_options)?,
        target_impacts: config.target_impacts.unwrap_or_default(),
        trainer: trainer_draw(&entry, config.trainer_options, config.trainer_impacts)?,
        picks: pick_lists(&entry, &config.extra)?,
        results: result_outcomes(&entry, config.result_options)?,
        matchups: matchup_draw(&entry, config.matchups, config.opponent_teams)?,
    };

    Ok(Event {
        id,
        pool,
        title,
        description,
        impact: config.impact.unwrap_or_default(),
        category,
        weights,
        stages,
        options,
        adult_content: config.adult_content,
        is_temporary,
        draws,
    })
}

// ============================================================================
// Type diagnostics
// ============================================================================

/// Serde error text if `value` does not deserialize as `T`
fn type_mismatch<T: DeserializeOwned>(value: &Value) -> Option<String> {
    serde_json::from_value::<T>(value.clone())
        .err()
        .map(|e| e.to_string())
}

/// Locate the field that made a record fail to deserialize
fn malformed_field(raw: &Value) -> Option<(String, String)> {
    let Some(object) = raw.as_object() else {
        return Some(("<entry>".to_string(), "entry is not an object".to_string()));
    };
    for (key, value) in object {
        let at = |reason: String| (key.clone(), reason);
        let found = match key.as_str() {
            "title" | "description" | "impact" | "category" => {
                type_mismatch::<Option<String>>(value).map(at)
            }
            "difficulty_weights" => type_mismatch::<Option<BTreeMap<String, Value>>>(value).map(at),
            "season_stages" | "target_options" | "trainer_options" | "opponent_teams" => {
                type_mismatch::<Option<Vec<String>>>(value).map(at)
            }
            "target_impacts" | "trainer_impacts" => {
                type_mismatch::<Option<BTreeMap<String, String>>>(value).map(at)
            }
            "is_temporary" => type_mismatch::<Option<bool>>(value).map(at),
            "adult_content" => type_mismatch::<bool>(value).map(at),
            "result_options" => type_mismatch::<Option<Vec<ResultOptionConfig>>>(value).map(at),
            "matchups" => type_mismatch::<Option<Vec<MatchupConfig>>>(value).map(at),
            "options" => malformed_options(value, key),
            _ => None,
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

fn malformed_options(value: &Value, path: &str) -> Option<(String, String)> {
    let Some(options) = value.as_array() else {
        return type_mismatch::<Option<Vec<OptionConfig>>>(value).map(|reason| (path.to_string(), reason));
    };
    for (i, option) in options.iter().enumerate() {
        let field = format!("{}[{}]", path, i);
        let Some(object) = option.as_object() else {
            return Some((field, "option is not an object".to_string()));
        };
        for (key, value) in object {
            let at = |reason: String| (format!("{}.{}", field, key), reason);
            let found = match key.as_str() {
                "description" => type_mismatch::<Option<String>>(value).map(at),
                "is_temporary" => type_mismatch::<Option<bool>>(value).map(at),
                "impact_random_options" => {
                    type_mismatch::<Option<BTreeMap<String, f64>>>(value).map(at)
                }
                "impact" => match value {
                    Value::Null | Value::String(_) => None,
                    Value::Array(list) => malformed_weighted(list, &format!("{}.impact", field)),
                    _ => Some(at("must be text or a list of weighted impacts".to_string())),
                },
                "options" => malformed_options(value, &format!("{}.options", field)),
                _ => None,
            };
            if found.is_some() {
                return found;
            }
        }
    }
    None
}

fn malformed_weighted(list: &[Value], path: &str) -> Option<(String, String)> {
    for (j, item) in list.iter().enumerate() {
        let field = format!("{}[{}]", path, j);
        let Some(object) = item.as_object() else {
            return Some((field, "weighted impact is not an object".to_string()));
        };
        let checks = [
            ("impact", object.get("impact").map(type_mismatch::<String>)),
            ("weight", object.get("weight").map(type_mismatch::<f64>)),
        ];
        for (key, check) in checks {
            let reason = match check {
                None => Some("missing required field".to_string()),
                Some(mismatch) => mismatch,
            };
            if let Some(reason) = reason {
                return Some((format!("{}.{}", field, key), reason));
            }
        }
    }
    None
}

// ============================================================================
// Field validation
// ============================================================================

fn required_text(entry: &Entry, field: &str, value: Option<String>) -> Result<String, SchemaError> {
    match value {
        None => Err(entry.err(field, "missing required field")),
        Some(text) if text.trim().is_empty() => Err(entry.err(field, "must not be empty")),
        Some(text) => Ok(text),
    }
}

fn difficulty_weights(
    entry: &Entry,
    raw: Option<BTreeMap<String, Value>>,
) -> Result<DifficultyWeights, SchemaError> {
    const FIELD: &str = "difficulty_weights";
    let raw = raw.ok_or_else(|| entry.err(FIELD, "missing required field"))?;

    if let Some(unknown) = raw
        .keys()
        .find(|key| key.parse::<Difficulty>().is_err())
    {
        return Err(entry.err(FIELD, format!("unrecognized difficulty `{}`", unknown)));
    }

    let mut weights = DifficultyWeights::default();
    for difficulty in Difficulty::ALL {
        let value = raw
            .get(difficulty.label())
            .ok_or_else(|| entry.err(FIELD, format!("missing weight for `{}`", difficulty)))?;
        let weight = value
            .as_f64()
            .ok_or_else(|| entry.err(FIELD, format!("weight for `{}` is not a number", difficulty)))?;
        if !(0.0..=1.0).contains(&weight) {
            return Err(entry.err(
                FIELD,
                format!("weight {} for `{}` is outside [0, 1]", weight, difficulty),
            ));
        }
        weights.set(difficulty, weight);
    }
    Ok(weights)
}

fn season_stages(entry: &Entry, raw: Option<Vec<String>>) -> Result<StageSet, SchemaError> {
    const FIELD: &str = "season_stages";
    let tags = raw.ok_or_else(|| entry.err(FIELD, "missing required field"))?;
    if tags.is_empty() {
        return Err(entry.err(FIELD, "must list at least one stage"));
    }

    tags.iter().try_fold(StageSet::EMPTY, |set, tag| {
        StageSet::from_tag(tag)
            .map(|stages| set.union(stages))
            .ok_or_else(|| entry.err(FIELD, format!("unknown stage tag `{}`", tag)))
    })
}

fn validate_option(
    entry: &Entry,
    field: &str,
    raw: &OptionConfig,
    inherited_temporary: bool,
    inherited_random: Option<&Impact>,
) -> Result<EventOption, SchemaError> {
    let description = match raw.description.as_deref() {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        Some(_) => return Err(entry.err(format!("{}.description", field), "must not be empty")),
        None => {
            return Err(entry.err(
                format!("{}.description", field),
                "missing required field",
            ))
        }
    };
    let is_temporary = raw.is_temporary.unwrap_or(inherited_temporary);

    let outcome = match raw.options.as_deref() {
        Some(children) if !children.is_empty() => {
            if raw.impact.is_some() {
                return Err(entry.err(
                    field,
                    "option has both nested options and an impact",
                ));
            }
            // A branch may carry a random impact for children that set none
            let own_random = match &raw.impact_random_options {
                Some(map) => Some(weighted_impacts(
                    entry,
                    &format!("{}.impact_random_options", field),
                    map.iter().map(|(text, weight)| (text.as_str(), *weight)),
                )?),
                None => None,
            };
            let random = own_random.as_ref().or(inherited_random);
            let children = children
                .iter()
                .enumerate()
                .map(|(i, child)| {
                    validate_option(
                        entry,
                        &format!("{}.options[{}]", field, i),
                        child,
                        is_temporary,
                        random,
                    )
                })
                .collect::<Result<Vec<_>, _>>()?;
            OptionOutcome::Branch(children)
        }
        _ => OptionOutcome::Impact(option_impact(entry, field, raw, inherited_random)?),
    };

    Ok(EventOption {
        description,
        is_temporary,
        outcome,
    })
}

fn option_impact(
    entry: &Entry,
    field: &str,
    raw: &OptionConfig,
    inherited_random: Option<&Impact>,
) -> Result<Impact, SchemaError> {
    let impact_field = format!("{}.impact", field);
    match (&raw.impact, &raw.impact_random_options) {
        (Some(_), Some(_)) => Err(entry.err(
            impact_field,
            "both `impact` and `impact_random_options` given",
        )),
        (None, None) => inherited_random
            .cloned()
            .ok_or_else(|| entry.err(impact_field, "leaf option has no impact")),
        (Some(ImpactConfig::Text(text)), None) => {
            if text.trim().is_empty() {
                Err(entry.err(impact_field, "must not be empty"))
            } else {
                Ok(Impact::Plain(text.clone()))
            }
        }
        (Some(ImpactConfig::Weighted(list)), None) => weighted_impacts(
            entry,
            &impact_field,
            list.iter().map(|w| (w.impact.as_str(), w.weight)),
        ),
        (None, Some(map)) => weighted_impacts(
            entry,
            &format!("{}.impact_random_options", field),
            map.iter().map(|(text, weight)| (text.as_str(), *weight)),
        ),
    }
}

fn weighted_impacts<'a>(
    entry: &Entry,
    field: &str,
    items: impl Iterator<Item = (&'a str, f64)>,
) -> Result<Impact, SchemaError> {
    let mut entries = Vec::new();
    for (text, weight) in items {
        if text.trim().is_empty() {
            return Err(entry.err(field, "random impact text must not be empty"));
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(entry.err(field, format!("weight {} must be a non-negative number", weight)));
        }
        entries.push(WeightedImpact {
            text: text.to_string(),
            weight,
        });
    }
    if entries.is_empty() {
        return Err(entry.err(field, "random impact list is empty"));
    }
    if entries.iter().all(|e| e.weight == 0.0) {
        return Err(entry.err(field, "all random impact weights are zero"));
    }
    Ok(Impact::Random(entries))
}

fn target_draw(entry: &Entry, raw: Option<Vec<String>>) -> Result<TargetDraw, SchemaError> {
    let roles = match raw {
        None => return Ok(TargetDraw::None),
        Some(roles) => roles,
    };
    if roles.is_empty() {
        return Err(entry.err("target_options", "must not be empty"));
    }
    if roles.iter().any(|r| r.trim().is_empty()) {
        return Err(entry.err("target_options", "role must not be empty"));
    }
    if let [only] = roles.as_slice() {
        if only.eq_ignore_ascii_case("n/a") {
            return Ok(TargetDraw::NotApplicable);
        }
        if only == "all-players" {
            return Ok(TargetDraw::AllPlayers);
        }
    }
    Ok(TargetDraw::Roles(roles))
}

fn trainer_draw(
    entry: &Entry,
    options: Option<Vec<String>>,
    impacts: Option<BTreeMap<String, String>>,
) -> Result<Option<TrainerDraw>, SchemaError> {
    match options {
        None => Ok(None),
        Some(options) if options.is_empty() => {
            Err(entry.err("trainer_options", "must not be empty"))
        }
        Some(options) => Ok(Some(TrainerDraw {
            options,
            impacts: impacts.unwrap_or_default(),
        })),
    }
}

fn pick_lists(entry: &Entry, extra: &BTreeMap<String, Value>) -> Result<Vec<PickList>, SchemaError> {
    let mut picks = Vec::new();
    for (key, value) in extra {
        let name = match key.strip_suffix("_options") {
            Some(name) if !RESERVED_OPTION_KEYS.contains(&key.as_str()) && !name.is_empty() => name,
            _ => continue,
        };
        let items = value
            .as_array()
            .ok_or_else(|| entry.err(key.as_str(), "must be a list"))?;
        if items.is_empty() {
            return Err(entry.err(key.as_str(), "must not be empty"));
        }
        let values = items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                _ => Err(entry.err(key.as_str(), "entries must be strings or numbers")),
            })
            .collect::<Result<Vec<_>, _>>()?;
        picks.push(PickList {
            name: name.to_string(),
            values,
        });
    }
    Ok(picks)
}

fn matchup_draw(
    entry: &Entry,
    matchups: Option<Vec<MatchupConfig>>,
    opponent_teams: Option<Vec<String>>,
) -> Result<Option<MatchupDraw>, SchemaError> {
    if matchups.is_none() && opponent_teams.is_none() {
        return Ok(None);
    }

    let mut pairs = Vec::new();
    if let Some(raw) = matchups {
        if raw.is_empty() {
            return Err(entry.err("matchups", "must not be empty"));
        }
        for (i, matchup) in raw.into_iter().enumerate() {
            let field = format!("matchups[{}]", i);
            pairs.push(Matchup {
                position1: required_text(entry, &format!("{}.position1", field), matchup.position1)?,
                opponent_position: required_text(
                    entry,
                    &format!("{}.opponent_position", field),
                    matchup.opponent_position,
                )?,
            });
        }
    }

    let opponent_teams = match opponent_teams {
        Some(teams) if teams.is_empty() => {
            return Err(entry.err("opponent_teams", "must not be empty"));
        }
        Some(teams) => teams,
        None => Vec::new(),
    };
    Ok(Some(MatchupDraw {
        pairs,
        opponent_teams,
    }))
}

fn result_outcomes(
    entry: &Entry,
    raw: Option<Vec<ResultOptionConfig>>,
) -> Result<Vec<ResultOutcome>, SchemaError> {
    let raw = match raw {
        None => return Ok(Vec::new()),
        Some(raw) => raw,
    };
    if raw.is_empty() {
        return Err(entry.err("result_options", "must not be empty"));
    }

    let mut outcomes = Vec::with_capacity(raw.len());
    for (i, option) in raw.into_iter().enumerate() {
        let field = format!("result_options[{}]", i);
        let result = option
            .result
            .ok_or_else(|| entry.err(format!("{}.result", field), "missing required field"))?;
        let impact_text = option
            .impact_text
            .ok_or_else(|| entry.err(format!("{}.impact_text", field), "missing required field"))?;
        let weight = option.probability.unwrap_or(1.0);
        if !weight.is_finite() || weight < 0.0 {
            return Err(entry.err(
                format!("{}.probability", field),
                format!("{} must be a non-negative number", weight),
            ));
        }
        outcomes.push(ResultOutcome {
            result,
            impact_text,
            weight,
        });
    }
    if outcomes.iter().all(|o| o.weight == 0.0) {
        return Err(entry.err("result_options", "all probabilities are zero"));
    }
    Ok(outcomes)
}
