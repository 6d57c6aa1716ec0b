//! Placeholder scanning and substitution
//!
//! A placeholder is `{name}` where `name` is made of ASCII letters, digits and
//! underscores. Anything else in braces is left as literal text.

use once_cell::sync::Lazy;
use regex::Regex;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("placeholder pattern is valid"));

/// Placeholder names referenced by a template, in order of appearance
pub fn placeholders(template: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Replace every placeholder using `lookup`.
///
/// `lookup` returns `Ok(Some(value))` to substitute, `Ok(None)` when the name is
/// unknown, or `Err(role)` when the name is known but cannot be filled. Either
/// failure aborts the whole substitution and yields the role to report; no
/// partially substituted text is ever returned.
pub fn substitute<'a, F>(template: &str, mut lookup: F) -> Result<String, String>
where
    F: FnMut(&str) -> Result<Option<&'a str>, String>,
{
    let mut output = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let (whole, name) = match (caps.get(0), caps.get(1)) {
            (Some(whole), Some(name)) => (whole, name.as_str()),
            _ => continue,
        };
        let value = lookup(name)?.ok_or_else(|| name.to_string())?;
        output.push_str(&template[last..whole.start()]);
        output.push_str(value);
        last = whole.end();
    }

    output.push_str(&template[last..]);
    Ok(output)
}
